//! CPU-side mesh buffers: flat, interleaved float data ready for GPU
//! upload, built one triangle at a time with tangent-space generation.

use math::Vec3;

use crate::vertex::{Tri2D, Tri3D, Vert2D, Vert3D};

/// UV determinants below this are treated as degenerate.
const DEGENERATE_UV_EPS: f32 = 1e-8;

/// Flat interleaved 3D mesh data (stride [`Vert3D::STRIDE`]).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData3D {
    pub data: Vec<f32>,
    pub triangles: u32,
}

impl MeshData3D {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the buffer holds at least one full triangle.
    pub fn is_valid(&self) -> bool {
        self.triangles > 0 && self.data.len() == self.triangles as usize * 3 * Vert3D::STRIDE
    }

    /// Append a triangle, computing per-vertex tangents from the UV
    /// gradient before packing.
    pub fn add_triangle(&mut self, mut tri: Tri3D) {
        let (tangent, bitangent) = triangle_tangent(&tri);
        for vert in tri.v.iter_mut() {
            vert.tangent = orthogonalized_tangent(vert.normal, tangent, bitangent);
        }
        for vert in &tri.v {
            vert.write_into(&mut self.data);
        }
        self.triangles += 1;
    }
}

/// Flat interleaved 2D mesh data (stride [`Vert2D::STRIDE`]).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData2D {
    pub data: Vec<f32>,
    pub triangles: u32,
}

impl MeshData2D {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.triangles > 0 && self.data.len() == self.triangles as usize * 3 * Vert2D::STRIDE
    }

    pub fn add_triangle(&mut self, tri: Tri2D) {
        for vert in &tri.v {
            vert.write_into(&mut self.data);
        }
        self.triangles += 1;
    }
}

/// Face tangent/bitangent from the 2x2 system relating edge vectors to
/// UV deltas. Degenerate parameterisations (zero determinant) fall back
/// to an arbitrary basis instead of producing NaN.
fn triangle_tangent(tri: &Tri3D) -> (Vec3, Vec3) {
    let edge1 = tri.v[1].position - tri.v[0].position;
    let edge2 = tri.v[2].position - tri.v[0].position;
    let s1 = tri.v[1].uv.x - tri.v[0].uv.x;
    let t1 = tri.v[1].uv.y - tri.v[0].uv.y;
    let s2 = tri.v[2].uv.x - tri.v[0].uv.x;
    let t2 = tri.v[2].uv.y - tri.v[0].uv.y;

    let det = s1 * t2 - s2 * t1;
    if det.abs() < DEGENERATE_UV_EPS {
        let normal = tri.v[0].normal;
        let tangent = fallback_tangent(normal);
        return (tangent, normal.cross(tangent));
    }

    let r = 1.0 / det;
    let tangent = (edge1 * t2 - edge2 * t1) * r;
    let bitangent = (edge2 * s1 - edge1 * s2) * r;
    (tangent, bitangent)
}

/// Gram-Schmidt the face tangent against the vertex normal and fold the
/// handedness sign (from `dot(cross(n, t), b)`) into the stored vector.
fn orthogonalized_tangent(normal: Vec3, tangent: Vec3, bitangent: Vec3) -> Vec3 {
    let t = (tangent - normal * normal.dot(tangent)).normalized();
    let t = if t.length2() == 0.0 { fallback_tangent(normal) } else { t };
    let handedness = if normal.cross(t).dot(bitangent) < 0.0 { -1.0 } else { 1.0 };
    t * handedness
}

/// Arbitrary unit tangent orthogonal to `normal`.
fn fallback_tangent(normal: Vec3) -> Vec3 {
    let axis = if normal.x.abs() < 0.9 {
        Vec3::new(1.0, 0.0, 0.0)
    } else {
        Vec3::new(0.0, 1.0, 0.0)
    };
    (axis - normal * normal.dot(axis)).normalized()
}

#[cfg(test)]
mod tests {
    use super::*;
    use math::Vec2;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    fn tri(positions: [[f32; 3]; 3], uvs: [[f32; 2]; 3], normal: [f32; 3]) -> Tri3D {
        let n = Vec3::new(normal[0], normal[1], normal[2]);
        let mut t = Tri3D::default();
        for i in 0..3 {
            t.v[i] = Vert3D::new(
                Vec3::new(positions[i][0], positions[i][1], positions[i][2]),
                Vec2::new(uvs[i][0], uvs[i][1]),
                n,
            );
        }
        t
    }

    #[test]
    fn canonical_unit_uv_tangent_is_x_axis() {
        let mut mesh = MeshData3D::new();
        mesh.add_triangle(tri(
            [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            [0.0, 0.0, 1.0],
        ));
        // Tangent occupies the last 3 floats of the first vertex.
        let tangent = &mesh.data[14..17];
        assert!(approx(tangent[0], 1.0));
        assert!(approx(tangent[1], 0.0));
        assert!(approx(tangent[2], 0.0));
    }

    #[test]
    fn degenerate_uvs_produce_finite_tangent() {
        let mut mesh = MeshData3D::new();
        mesh.add_triangle(tri(
            [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            [[0.5, 0.5], [0.5, 0.5], [0.5, 0.5]],
            [0.0, 0.0, 1.0],
        ));
        assert!(mesh.data.iter().all(|f| f.is_finite()));
        let tangent = Vec3::new(mesh.data[14], mesh.data[15], mesh.data[16]);
        assert!(approx(tangent.length(), 1.0));
    }

    #[test]
    fn buffer_length_tracks_triangle_count() {
        let mut mesh = MeshData3D::new();
        let t = tri(
            [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            [0.0, 0.0, 1.0],
        );
        mesh.add_triangle(t);
        mesh.add_triangle(t);
        assert_eq!(mesh.triangles, 2);
        assert_eq!(mesh.data.len(), 2 * 3 * Vert3D::STRIDE);
        assert!(mesh.is_valid());
    }
}
