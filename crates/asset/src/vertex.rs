//! Interleaved vertex layouts shared by the CPU mesh builders and the
//! GPU attribute-pointer setup. The stride constants here must stay in
//! lockstep with the layouts declared at buffer-bind time.

use math::{Vec2, Vec3};

/// 3D vertex: position.xyzw, uv.xyw, rgb.xyzw, normal.xyz, tangent.xyz.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vert3D {
    pub position: Vec3,
    pub uv: Vec2,
    pub rgb: Vec3,
    pub normal: Vec3,
    pub tangent: Vec3,
}

impl Vert3D {
    /// Floats per vertex in the packed GPU buffer.
    pub const STRIDE: usize = 17;

    pub fn new(position: Vec3, uv: Vec2, normal: Vec3) -> Self {
        Self {
            position,
            uv,
            rgb: Vec3::new(1.0, 1.0, 1.0),
            normal,
            tangent: Vec3::ZERO,
        }
    }

    /// Append the packed field order to a flat buffer.
    pub fn write_into(&self, out: &mut Vec<f32>) {
        out.extend_from_slice(&[
            self.position.x,
            self.position.y,
            self.position.z,
            self.position.w,
            self.uv.x,
            self.uv.y,
            self.uv.w,
            self.rgb.x,
            self.rgb.y,
            self.rgb.z,
            self.rgb.w,
            self.normal.x,
            self.normal.y,
            self.normal.z,
            self.tangent.x,
            self.tangent.y,
            self.tangent.z,
        ]);
    }
}

/// 2D vertex: position.xy, uv.xy.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vert2D {
    pub position: Vec2,
    pub uv: Vec2,
}

impl Vert2D {
    /// Floats per vertex in the packed GPU buffer.
    pub const STRIDE: usize = 4;

    pub fn new(position: Vec2, uv: Vec2) -> Self {
        Self { position, uv }
    }

    pub fn write_into(&self, out: &mut Vec<f32>) {
        out.extend_from_slice(&[self.position.x, self.position.y, self.uv.x, self.uv.y]);
    }
}

/// Triangle of 3D vertices; ephemeral, consumed into a mesh's flat buffer.
#[derive(Clone, Copy, Debug, Default)]
pub struct Tri3D {
    pub v: [Vert3D; 3],
}

/// Triangle of 2D vertices.
#[derive(Clone, Copy, Debug, Default)]
pub struct Tri2D {
    pub v: [Vert2D; 3],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strides_match_packed_field_order() {
        let mut buf = Vec::new();
        Vert3D::default().write_into(&mut buf);
        assert_eq!(buf.len(), Vert3D::STRIDE);

        buf.clear();
        Vert2D::default().write_into(&mut buf);
        assert_eq!(buf.len(), Vert2D::STRIDE);
    }
}
