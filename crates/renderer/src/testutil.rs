//! Recording GPU backend for unit tests. Every call is appended to an
//! event log so tests can assert on ordering (draw sequence, blend
//! toggles) and on which handles were touched.

use std::collections::HashMap;

use asset::TextureData;

use crate::gpu::{
    BufferId, GpuContext, ProgramId, RenderTargetId, TextureId, VaoId, VertexAttr,
};
use crate::RenderError;

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    CreateBuffer(BufferId, usize),
    UpdateBuffer(BufferId, usize, usize),
    CreateVertexArray(VaoId, BufferId),
    BindVertexArray(VaoId),
    CreateTexture(TextureId),
    BindTexture(u32, TextureId),
    CreateProgram(ProgramId, String),
    UseProgram(ProgramId),
    Uniform(String),
    CreateRenderTarget(RenderTargetId),
    BindRenderTarget(Option<RenderTargetId>),
    SetDepthTest(bool),
    SetBlend(bool),
    Clear,
    Draw { first: i32, count: i32 },
}

#[derive(Default)]
pub struct MockDevice {
    next_id: u32,
    pub events: Vec<Event>,
    pub buffers: HashMap<BufferId, Vec<f32>>,
    target_textures: HashMap<RenderTargetId, TextureId>,
}

impl MockDevice {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    /// Vertex array bound before each draw, in draw order.
    pub fn draw_order(&self) -> Vec<VaoId> {
        let mut bound = None;
        let mut order = Vec::new();
        for event in &self.events {
            match event {
                Event::BindVertexArray(vao) => bound = Some(*vao),
                Event::Draw { .. } => order.push(bound.expect("draw without vertex array")),
                _ => {}
            }
        }
        order
    }

    /// Whether blending was enabled at the time of the `i`th draw.
    pub fn blend_at_draw(&self, i: usize) -> bool {
        let mut blend = false;
        let mut seen = 0;
        for event in &self.events {
            match event {
                Event::SetBlend(on) => blend = *on,
                Event::Draw { .. } => {
                    if seen == i {
                        return blend;
                    }
                    seen += 1;
                }
                _ => {}
            }
        }
        panic!("fewer than {} draws recorded", i + 1);
    }

    pub fn uniform_names(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Uniform(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl GpuContext for MockDevice {
    fn create_buffer(&mut self, data: &[f32]) -> BufferId {
        let id = BufferId(self.next());
        self.buffers.insert(id, data.to_vec());
        self.events.push(Event::CreateBuffer(id, data.len()));
        id
    }

    fn update_buffer(&mut self, buffer: BufferId, offset: usize, data: &[f32]) {
        if let Some(stored) = self.buffers.get_mut(&buffer) {
            stored[offset..offset + data.len()].copy_from_slice(data);
        }
        self.events.push(Event::UpdateBuffer(buffer, offset, data.len()));
    }

    fn create_vertex_array(
        &mut self,
        buffer: BufferId,
        _stride: usize,
        _attrs: &[VertexAttr],
    ) -> VaoId {
        let id = VaoId(self.next());
        self.events.push(Event::CreateVertexArray(id, buffer));
        id
    }

    fn bind_vertex_array(&mut self, vao: VaoId) {
        self.events.push(Event::BindVertexArray(vao));
    }

    fn create_texture(&mut self, _texture: &TextureData) -> TextureId {
        let id = TextureId(self.next());
        self.events.push(Event::CreateTexture(id));
        id
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureId) {
        self.events.push(Event::BindTexture(unit, texture));
    }

    fn create_program(
        &mut self,
        name: &str,
        _vertex_src: &str,
        _fragment_src: &str,
    ) -> Result<ProgramId, RenderError> {
        let id = ProgramId(self.next());
        self.events.push(Event::CreateProgram(id, name.to_string()));
        Ok(id)
    }

    fn use_program(&mut self, program: ProgramId) {
        self.events.push(Event::UseProgram(program));
    }

    fn set_uniform_f32(&mut self, _program: ProgramId, name: &str, _value: f32) {
        self.events.push(Event::Uniform(name.to_string()));
    }

    fn set_uniform_i32(&mut self, _program: ProgramId, name: &str, _value: i32) {
        self.events.push(Event::Uniform(name.to_string()));
    }

    fn set_uniform_vec2(&mut self, _program: ProgramId, name: &str, _value: [f32; 2]) {
        self.events.push(Event::Uniform(name.to_string()));
    }

    fn set_uniform_vec3(&mut self, _program: ProgramId, name: &str, _value: [f32; 3]) {
        self.events.push(Event::Uniform(name.to_string()));
    }

    fn set_uniform_vec4(&mut self, _program: ProgramId, name: &str, _value: [f32; 4]) {
        self.events.push(Event::Uniform(name.to_string()));
    }

    fn set_uniform_mat2(&mut self, _program: ProgramId, name: &str, _value: [f32; 4]) {
        self.events.push(Event::Uniform(name.to_string()));
    }

    fn set_uniform_mat4(&mut self, _program: ProgramId, name: &str, _value: [f32; 16]) {
        self.events.push(Event::Uniform(name.to_string()));
    }

    fn create_render_target(
        &mut self,
        _width: u32,
        _height: u32,
    ) -> Result<RenderTargetId, RenderError> {
        let target = RenderTargetId(self.next());
        let texture = TextureId(self.next());
        self.target_textures.insert(target, texture);
        self.events.push(Event::CreateRenderTarget(target));
        Ok(target)
    }

    fn render_target_texture(&self, target: RenderTargetId) -> TextureId {
        self.target_textures[&target]
    }

    fn bind_render_target(&mut self, target: Option<RenderTargetId>) {
        self.events.push(Event::BindRenderTarget(target));
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.events.push(Event::SetDepthTest(enabled));
    }

    fn set_blend(&mut self, enabled: bool) {
        self.events.push(Event::SetBlend(enabled));
    }

    fn clear(&mut self, _r: f32, _g: f32, _b: f32, _a: f32) {
        self.events.push(Event::Clear);
    }

    fn draw_triangles(&mut self, first: i32, count: i32) {
        self.events.push(Event::Draw { first, count });
    }
}
