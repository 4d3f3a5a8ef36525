use anyhow::Result;
use asset::{Geometry, MeshData2D, Vert2D};
use log::warn;
use math::{Mat2, Vec2, Vec3};
use scene::Camera2D;

use crate::cache::ResourceCache;
use crate::gpu::{BufferId, GpuContext, TextureId, VaoId, VertexAttr};
use crate::shader::Shader;

/// Layout of one 2D vertex: xy position, xy uv.
const ATTRS_2D: [VertexAttr; 2] = [
    VertexAttr { location: 0, components: 2, offset: 0 },
    VertexAttr { location: 1, components: 2, offset: 2 },
];

/// Textured 2D mesh for sprites and UI. Always drawn blended, in
/// submission order, with depth testing off.
pub struct Mesh2D {
    pub data: Vec<f32>,
    pub triangles: u32,
    pub texture: TextureId,
    pub position: Vec2,
    /// Rotation in radians, counter-clockwise.
    pub rotation: f32,
    pub scale: Vec2,
    /// rgb in xyz, alpha in w.
    pub tint: Vec3,
    vbo: Option<BufferId>,
    vao: Option<VaoId>,
}

impl Mesh2D {
    pub fn from_data(data: MeshData2D, texture: TextureId) -> Self {
        Self {
            data: data.data,
            triangles: data.triangles,
            texture,
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
            tint: Vec3::with_w(1.0, 1.0, 1.0, 1.0),
            vbo: None,
            vao: None,
        }
    }

    /// Unit quad showing a texture loaded through the cache.
    pub fn make(
        device: &mut dyn GpuContext,
        cache: &mut ResourceCache,
        texture_path: &str,
    ) -> Result<Self> {
        let texture = cache.texture(device, texture_path)?;
        let mut mesh = Self::from_data(Geometry::quad(), texture);
        mesh.load(device);
        Ok(mesh)
    }

    /// Unit quad with an already uploaded texture.
    pub fn quad(device: &mut dyn GpuContext, texture: TextureId) -> Self {
        let mut mesh = Self::from_data(Geometry::quad(), texture);
        mesh.load(device);
        mesh
    }

    pub fn load(&mut self, device: &mut dyn GpuContext) {
        if self.vao.is_some() {
            return;
        }
        let vbo = device.create_buffer(&self.data);
        let vao = device.create_vertex_array(vbo, Vert2D::STRIDE, &ATTRS_2D);
        self.vbo = Some(vbo);
        self.vao = Some(vao);
    }

    pub fn vao(&self) -> Option<VaoId> {
        self.vao
    }

    /// Draw a batch of 2D meshes in submission order.
    pub fn render_all(
        device: &mut dyn GpuContext,
        shader: &Shader,
        camera: &Camera2D,
        meshes: &[&Mesh2D],
        time: f32,
    ) {
        let p = shader.program;
        device.use_program(p);
        device.set_depth_test(false);
        device.set_blend(true);

        device.set_uniform_vec2(p, "camera.position", [camera.position.x, camera.position.y]);
        device.set_uniform_f32(p, "camera.zoom", camera.zoom);
        device.set_uniform_f32(p, "u_time", time);
        device.set_uniform_i32(p, "diffuse", 0);

        for &mesh in meshes {
            let Some(vao) = mesh.vao else {
                warn!("skipping unloaded 2D mesh");
                continue;
            };
            device.bind_vertex_array(vao);
            device.set_uniform_vec2(p, "mesh.translation", [mesh.position.x, mesh.position.y]);
            device.set_uniform_mat2(p, "mesh.rotation", Mat2::rotation(mesh.rotation).to_array());
            device.set_uniform_vec2(p, "mesh.scale", [mesh.scale.x, mesh.scale.y]);
            device.set_uniform_vec4(
                p,
                "mesh.tint",
                [mesh.tint.x, mesh.tint.y, mesh.tint.z, mesh.tint.w],
            );
            device.bind_texture(0, mesh.texture);
            device.draw_triangles(0, (mesh.triangles * 3) as i32);
        }

        device.set_blend(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::ShaderRegistry;
    use crate::testutil::{Event, MockDevice};
    use asset::TextureData;

    #[test]
    fn quad_draws_six_vertices() {
        let mut device = MockDevice::new();
        let texture = device.create_texture(&TextureData::solid([255; 4]));
        let mesh = Mesh2D::quad(&mut device, texture);

        let registry = ShaderRegistry::with_builtins();
        let shader = Shader::link(
            &mut device,
            &registry,
            "flat2d",
            "mesh2d.vert",
            "mesh2d.frag",
            &[],
            0,
        )
        .expect("link");

        Mesh2D::render_all(&mut device, &shader, &Camera2D::default(), &[&mesh], 0.0);
        assert!(device.events.contains(&Event::Draw { first: 0, count: 6 }));
        assert!(device.blend_at_draw(0));
    }

    #[test]
    fn meshes_draw_in_submission_order() {
        let mut device = MockDevice::new();
        let texture = device.create_texture(&TextureData::solid([255; 4]));
        let a = Mesh2D::quad(&mut device, texture);
        let b = Mesh2D::quad(&mut device, texture);

        let registry = ShaderRegistry::with_builtins();
        let shader = Shader::link(
            &mut device,
            &registry,
            "flat2d",
            "mesh2d.vert",
            "mesh2d.frag",
            &[],
            0,
        )
        .expect("link");

        Mesh2D::render_all(&mut device, &shader, &Camera2D::default(), &[&b, &a], 1.5);
        assert_eq!(device.draw_order(), vec![b.vao().unwrap(), a.vao().unwrap()]);
    }

    #[test]
    fn make_surfaces_missing_texture_errors() {
        let mut device = MockDevice::new();
        let mut cache = ResourceCache::new();
        assert!(Mesh2D::make(&mut device, &mut cache, "missing.png").is_err());
    }
}
