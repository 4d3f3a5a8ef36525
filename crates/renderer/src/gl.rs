//! OpenGL backend for [`GpuContext`] built on glow.
//!
//! Matrices arrive as row-major float arrays and are uploaded without
//! transposing; the GLSL sources multiply accordingly, so no conversion
//! happens on either side.

use std::collections::HashMap;

use asset::TextureData;
use glow::HasContext;

use crate::RenderError;
use crate::gpu::{
    BufferId, GpuContext, ProgramId, RenderTargetId, TextureId, VaoId, VertexAttr,
};

struct GlRenderTarget {
    framebuffer: glow::Framebuffer,
    texture: TextureId,
    width: u32,
    height: u32,
}

pub struct GlDevice {
    gl: glow::Context,
    next_id: u32,
    buffers: HashMap<u32, glow::Buffer>,
    vaos: HashMap<u32, glow::VertexArray>,
    textures: HashMap<u32, glow::Texture>,
    programs: HashMap<u32, glow::Program>,
    targets: HashMap<u32, GlRenderTarget>,
    // name -> location, resolved once per program
    uniform_locations: HashMap<(u32, String), Option<glow::NativeUniformLocation>>,
}

impl GlDevice {
    pub fn new(gl: glow::Context) -> Self {
        Self {
            gl,
            next_id: 1,
            buffers: HashMap::new(),
            vaos: HashMap::new(),
            textures: HashMap::new(),
            programs: HashMap::new(),
            targets: HashMap::new(),
            uniform_locations: HashMap::new(),
        }
    }

    fn alloc_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn location(&mut self, program: ProgramId, name: &str) -> Option<glow::NativeUniformLocation> {
        let key = (program.0, name.to_owned());
        if let Some(loc) = self.uniform_locations.get(&key) {
            return loc.clone();
        }
        let native = self.programs[&program.0];
        let loc = unsafe { self.gl.get_uniform_location(native, name) };
        if loc.is_none() {
            log::debug!("Uniform '{}' not found (program {})", name, program.0);
        }
        self.uniform_locations.insert(key, loc.clone());
        loc
    }

    fn compile_stage(
        &self,
        name: &str,
        stage: &'static str,
        kind: u32,
        source: &str,
    ) -> Result<glow::Shader, RenderError> {
        unsafe {
            let shader = self
                .gl
                .create_shader(kind)
                .map_err(RenderError::Gpu)?;
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
            if !self.gl.get_shader_compile_status(shader) {
                let log = self.gl.get_shader_info_log(shader);
                log::error!("{} shader '{}' compilation error: {}", stage, name, log);
                self.gl.delete_shader(shader);
                return Err(RenderError::ShaderCompile {
                    name: name.to_owned(),
                    stage,
                    log,
                });
            }
            Ok(shader)
        }
    }
}

impl GpuContext for GlDevice {
    fn create_buffer(&mut self, data: &[f32]) -> BufferId {
        let id = self.alloc_id();
        unsafe {
            let buffer = self.gl.create_buffer().expect("create_buffer failed");
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(data),
                glow::DYNAMIC_DRAW,
            );
            self.buffers.insert(id, buffer);
        }
        BufferId(id)
    }

    fn update_buffer(&mut self, buffer: BufferId, offset: usize, data: &[f32]) {
        let native = self.buffers[&buffer.0];
        unsafe {
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(native));
            self.gl.buffer_sub_data_u8_slice(
                glow::ARRAY_BUFFER,
                (offset * 4) as i32,
                bytemuck::cast_slice(data),
            );
        }
    }

    fn create_vertex_array(
        &mut self,
        buffer: BufferId,
        stride: usize,
        attrs: &[VertexAttr],
    ) -> VaoId {
        let id = self.alloc_id();
        let native_buf = self.buffers[&buffer.0];
        unsafe {
            let vao = self
                .gl
                .create_vertex_array()
                .expect("create_vertex_array failed");
            self.gl.bind_vertex_array(Some(vao));
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(native_buf));
            for attr in attrs {
                self.gl.enable_vertex_attrib_array(attr.location);
                self.gl.vertex_attrib_pointer_f32(
                    attr.location,
                    attr.components,
                    glow::FLOAT,
                    false,
                    (stride * 4) as i32,
                    (attr.offset * 4) as i32,
                );
            }
            self.gl.bind_vertex_array(None);
            self.vaos.insert(id, vao);
        }
        VaoId(id)
    }

    fn bind_vertex_array(&mut self, vao: VaoId) {
        let native = self.vaos[&vao.0];
        unsafe {
            self.gl.bind_vertex_array(Some(native));
        }
    }

    fn create_texture(&mut self, texture: &TextureData) -> TextureId {
        let id = self.alloc_id();
        unsafe {
            let native = self.gl.create_texture().expect("create_texture failed");
            self.gl.bind_texture(glow::TEXTURE_2D, Some(native));
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                texture.width as i32,
                texture.height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(&texture.data)),
            );
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::LINEAR as i32,
            );
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::LINEAR as i32,
            );
            self.gl.bind_texture(glow::TEXTURE_2D, None);
            self.textures.insert(id, native);
        }
        TextureId(id)
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureId) {
        let native = self.textures[&texture.0];
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, Some(native));
        }
    }

    fn create_program(
        &mut self,
        name: &str,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<ProgramId, RenderError> {
        let vs = self.compile_stage(name, "vertex", glow::VERTEX_SHADER, vertex_src)?;
        let fs = match self.compile_stage(name, "fragment", glow::FRAGMENT_SHADER, fragment_src) {
            Ok(fs) => fs,
            Err(e) => {
                unsafe { self.gl.delete_shader(vs) };
                return Err(e);
            }
        };

        let id = self.alloc_id();
        unsafe {
            let program = self.gl.create_program().map_err(RenderError::Gpu)?;
            self.gl.attach_shader(program, vs);
            self.gl.attach_shader(program, fs);
            self.gl.link_program(program);
            self.gl.detach_shader(program, vs);
            self.gl.detach_shader(program, fs);
            self.gl.delete_shader(vs);
            self.gl.delete_shader(fs);

            if !self.gl.get_program_link_status(program) {
                let log = self.gl.get_program_info_log(program);
                log::error!("Program '{}' linking error: {}", name, log);
                self.gl.delete_program(program);
                return Err(RenderError::ProgramLink {
                    name: name.to_owned(),
                    log,
                });
            }
            self.programs.insert(id, program);
        }
        log::info!("Linked shader program '{}'", name);
        Ok(ProgramId(id))
    }

    fn use_program(&mut self, program: ProgramId) {
        let native = self.programs[&program.0];
        unsafe {
            self.gl.use_program(Some(native));
        }
    }

    fn set_uniform_f32(&mut self, program: ProgramId, name: &str, value: f32) {
        if let Some(loc) = self.location(program, name) {
            unsafe { self.gl.uniform_1_f32(Some(&loc), value) };
        }
    }

    fn set_uniform_i32(&mut self, program: ProgramId, name: &str, value: i32) {
        if let Some(loc) = self.location(program, name) {
            unsafe { self.gl.uniform_1_i32(Some(&loc), value) };
        }
    }

    fn set_uniform_vec2(&mut self, program: ProgramId, name: &str, value: [f32; 2]) {
        if let Some(loc) = self.location(program, name) {
            unsafe { self.gl.uniform_2_f32(Some(&loc), value[0], value[1]) };
        }
    }

    fn set_uniform_vec3(&mut self, program: ProgramId, name: &str, value: [f32; 3]) {
        if let Some(loc) = self.location(program, name) {
            unsafe {
                self.gl
                    .uniform_3_f32(Some(&loc), value[0], value[1], value[2])
            };
        }
    }

    fn set_uniform_vec4(&mut self, program: ProgramId, name: &str, value: [f32; 4]) {
        if let Some(loc) = self.location(program, name) {
            unsafe {
                self.gl
                    .uniform_4_f32(Some(&loc), value[0], value[1], value[2], value[3])
            };
        }
    }

    fn set_uniform_mat2(&mut self, program: ProgramId, name: &str, value: [f32; 4]) {
        if let Some(loc) = self.location(program, name) {
            unsafe {
                self.gl
                    .uniform_matrix_2_f32_slice(Some(&loc), false, &value)
            };
        }
    }

    fn set_uniform_mat4(&mut self, program: ProgramId, name: &str, value: [f32; 16]) {
        if let Some(loc) = self.location(program, name) {
            unsafe {
                self.gl
                    .uniform_matrix_4_f32_slice(Some(&loc), false, &value)
            };
        }
    }

    fn create_render_target(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<RenderTargetId, RenderError> {
        let texture = self.create_texture(&TextureData::new_rgba8(
            width,
            height,
            vec![0; (width * height * 4) as usize],
        ));
        let id = self.alloc_id();
        unsafe {
            let framebuffer = self.gl.create_framebuffer().map_err(RenderError::Gpu)?;
            self.gl.bind_framebuffer(glow::FRAMEBUFFER, Some(framebuffer));
            self.gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                glow::TEXTURE_2D,
                Some(self.textures[&texture.0]),
                0,
            );
            if self.gl.check_framebuffer_status(glow::FRAMEBUFFER) != glow::FRAMEBUFFER_COMPLETE {
                self.gl.bind_framebuffer(glow::FRAMEBUFFER, None);
                self.gl.delete_framebuffer(framebuffer);
                return Err(RenderError::IncompleteRenderTarget);
            }
            self.gl.bind_framebuffer(glow::FRAMEBUFFER, None);
            self.targets.insert(
                id,
                GlRenderTarget {
                    framebuffer,
                    texture,
                    width,
                    height,
                },
            );
        }
        Ok(RenderTargetId(id))
    }

    fn render_target_texture(&self, target: RenderTargetId) -> TextureId {
        self.targets[&target.0].texture
    }

    fn bind_render_target(&mut self, target: Option<RenderTargetId>) {
        unsafe {
            match target {
                Some(t) => {
                    let rt = &self.targets[&t.0];
                    self.gl.bind_framebuffer(glow::FRAMEBUFFER, Some(rt.framebuffer));
                    self.gl.viewport(0, 0, rt.width as i32, rt.height as i32);
                }
                None => {
                    self.gl.bind_framebuffer(glow::FRAMEBUFFER, None);
                }
            }
        }
    }

    fn set_depth_test(&mut self, enabled: bool) {
        unsafe {
            if enabled {
                self.gl.enable(glow::DEPTH_TEST);
            } else {
                self.gl.disable(glow::DEPTH_TEST);
            }
        }
    }

    fn set_blend(&mut self, enabled: bool) {
        unsafe {
            if enabled {
                self.gl.enable(glow::BLEND);
                self.gl
                    .blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
            } else {
                self.gl.disable(glow::BLEND);
            }
        }
    }

    fn clear(&mut self, r: f32, g: f32, b: f32, a: f32) {
        unsafe {
            self.gl.clear_color(r, g, b, a);
            self.gl
                .clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    fn draw_triangles(&mut self, first: i32, count: i32) {
        unsafe {
            self.gl.draw_arrays(glow::TRIANGLES, first, count);
        }
    }
}
