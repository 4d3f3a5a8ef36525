//! Asset loading/parsers: OBJ geometry with tangent generation,
//! interleaved vertex layouts, and RGBA8 textures.

pub mod geometry;
pub mod mesh;
pub mod obj;
pub mod texture;
pub mod vertex;

pub use geometry::Geometry;
pub use mesh::{MeshData2D, MeshData3D};
pub use texture::TextureData;
pub use vertex::{Tri2D, Tri3D, Vert2D, Vert3D};
