//! Renderer: GPU-context abstraction with an OpenGL (glow) backend,
//! templated GLSL shaders, mesh resources with shared-upload caches, and
//! the per-frame submission paths for 3D and 2D meshes.

use thiserror::Error;

pub mod animated;
pub mod cache;
pub mod gl;
pub mod gpu;
pub mod material;
pub mod mesh2d;
pub mod mesh3d;
pub mod shader;
pub mod target;

#[cfg(test)]
pub(crate) mod testutil;

pub use animated::AnimatedMesh3D;
pub use cache::{ReferenceGeometry, ResourceCache};
pub use gl::GlDevice;
pub use gpu::{BufferId, GpuContext, ProgramId, RenderTargetId, TextureId, VaoId, VertexAttr};
pub use material::Material;
pub use mesh2d::Mesh2D;
pub use mesh3d::Mesh3D;
pub use shader::{Shader, ShaderRegistry, ShaderSource, ShaderStage};
pub use target::RenderTexture;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{stage} shader '{name}' failed to compile: {log}")]
    ShaderCompile {
        name: String,
        stage: &'static str,
        log: String,
    },
    #[error("program '{name}' failed to link: {log}")]
    ProgramLink { name: String, log: String },
    #[error("shader template '{0}' was never registered")]
    UnknownShader(String),
    #[error("render target is incomplete")]
    IncompleteRenderTarget,
    #[error("animation frame has {got} floats, primary mesh has {expected}")]
    FrameMismatch { expected: usize, got: usize },
    #[error("GPU error: {0}")]
    Gpu(String),
}
