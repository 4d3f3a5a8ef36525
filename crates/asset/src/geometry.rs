//! Raw geometry sources: fetched OBJ text and built-in primitives.

use std::path::Path;

use anyhow::{Context, Result};
use math::Vec2;

use crate::mesh::{MeshData2D, MeshData3D};
use crate::obj;
use crate::vertex::{Tri2D, Vert2D};

/// Raw OBJ text, kept around so parsed output can be rebuilt without
/// another fetch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    pub text: String,
}

impl Geometry {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Read OBJ text from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read geometry: {}", path.as_ref().display()))?;
        Ok(Self { text })
    }

    /// Parse the held text into interleaved 3D mesh data.
    pub fn parse(&self) -> Result<MeshData3D> {
        obj::load_obj_from_str(&self.text)
    }

    /// Built-in unit quad for the 2D pipeline: 2 triangles, 6 vertices,
    /// UVs spanning [0,1] with the origin at the top-left.
    pub fn quad() -> MeshData2D {
        let corners = [
            // (position, uv)
            ([0.0, 0.0], [0.0, 1.0]),
            ([1.0, 0.0], [1.0, 1.0]),
            ([1.0, 1.0], [1.0, 0.0]),
            ([0.0, 1.0], [0.0, 0.0]),
        ];
        let vert = |i: usize| {
            let (p, uv) = corners[i];
            Vert2D::new(Vec2::new(p[0], p[1]), Vec2::new(uv[0], uv[1]))
        };

        let mut mesh = MeshData2D::new();
        mesh.add_triangle(Tri2D { v: [vert(0), vert(1), vert(2)] });
        mesh.add_triangle(Tri2D { v: [vert(0), vert(2), vert(3)] });
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vertex::Vert2D;

    #[test]
    fn quad_is_two_triangles_of_stride_four() {
        let quad = Geometry::quad();
        assert_eq!(quad.triangles, 2);
        assert_eq!(quad.data.len(), 2 * 3 * Vert2D::STRIDE);
        assert!(quad.is_valid());
    }

    #[test]
    fn geometry_text_parses() {
        let geo = Geometry::from_text(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n",
        );
        let mesh = geo.parse().expect("parse");
        assert_eq!(mesh.triangles, 1);
    }
}
