//! GPU-context abstraction: the exact capability set the engine core
//! consumes from the graphics backend. The windowing layer owns context
//! creation and hands the core a `&mut dyn GpuContext`.
//!
//! Handles are opaque ids; the backend maps them to native objects.
//! All calls are synchronous relative to the calling tick.

use asset::TextureData;

use crate::RenderError;

/// Handle to an uploaded vertex buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BufferId(pub u32);

/// Handle to a vertex-array object (attribute layout + buffer binding).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VaoId(pub u32);

/// Handle to an uploaded texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Handle to a compiled-and-linked shader program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProgramId(pub u32);

/// Handle to an offscreen framebuffer with a colour texture attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RenderTargetId(pub u32);

/// One vertex attribute inside an interleaved float buffer. Offsets and
/// strides are in floats, not bytes.
#[derive(Clone, Copy, Debug)]
pub struct VertexAttr {
    pub location: u32,
    pub components: i32,
    pub offset: usize,
}

pub trait GpuContext {
    // Buffers / vertex arrays
    fn create_buffer(&mut self, data: &[f32]) -> BufferId;
    /// Sub-range update; `offset` in floats from the start of the buffer.
    fn update_buffer(&mut self, buffer: BufferId, offset: usize, data: &[f32]);
    fn create_vertex_array(
        &mut self,
        buffer: BufferId,
        stride: usize,
        attrs: &[VertexAttr],
    ) -> VaoId;
    fn bind_vertex_array(&mut self, vao: VaoId);

    // Textures
    fn create_texture(&mut self, texture: &TextureData) -> TextureId;
    fn bind_texture(&mut self, unit: u32, texture: TextureId);

    // Programs & uniforms (string keys must match the GLSL declarations;
    // backends cache name -> location per program)
    fn create_program(
        &mut self,
        name: &str,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<ProgramId, RenderError>;
    fn use_program(&mut self, program: ProgramId);
    fn set_uniform_f32(&mut self, program: ProgramId, name: &str, value: f32);
    fn set_uniform_i32(&mut self, program: ProgramId, name: &str, value: i32);
    fn set_uniform_vec2(&mut self, program: ProgramId, name: &str, value: [f32; 2]);
    fn set_uniform_vec3(&mut self, program: ProgramId, name: &str, value: [f32; 3]);
    fn set_uniform_vec4(&mut self, program: ProgramId, name: &str, value: [f32; 4]);
    fn set_uniform_mat2(&mut self, program: ProgramId, name: &str, value: [f32; 4]);
    fn set_uniform_mat4(&mut self, program: ProgramId, name: &str, value: [f32; 16]);

    // Render targets
    fn create_render_target(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<RenderTargetId, RenderError>;
    fn render_target_texture(&self, target: RenderTargetId) -> TextureId;
    /// `None` restores the default framebuffer.
    fn bind_render_target(&mut self, target: Option<RenderTargetId>);

    // Pipeline state & draws
    fn set_depth_test(&mut self, enabled: bool);
    fn set_blend(&mut self, enabled: bool);
    fn clear(&mut self, r: f32, g: f32, b: f32, a: f32);
    /// Non-indexed triangle-list draw; `first`/`count` in vertices.
    fn draw_triangles(&mut self, first: i32, count: i32);
}
