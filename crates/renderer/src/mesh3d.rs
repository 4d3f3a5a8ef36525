use std::cmp::Ordering;

use anyhow::Result;
use asset::{MeshData3D, Vert3D};
use log::{debug, warn};
use math::{Mat4, Vec3};
use scene::{Camera3D, DirectionalLight, PointLight};

use crate::cache::{ReferenceGeometry, ResourceCache};
use crate::gpu::{BufferId, GpuContext, VaoId, VertexAttr};
use crate::material::Material;
use crate::shader::Shader;

/// Interleaved layout of one 3D vertex: xyzw position, uvw, rgba colour,
/// normal, tangent. Matches the attribute declarations in the 3D shaders.
const ATTRS_3D: [VertexAttr; 5] = [
    VertexAttr { location: 0, components: 4, offset: 0 },
    VertexAttr { location: 1, components: 3, offset: 4 },
    VertexAttr { location: 2, components: 4, offset: 7 },
    VertexAttr { location: 3, components: 3, offset: 11 },
    VertexAttr { location: 4, components: 3, offset: 14 },
];

/// A renderable 3D mesh: CPU vertex data, GPU handles once loaded, and
/// the per-instance transform, tint and material state.
pub struct Mesh3D {
    pub data: Vec<f32>,
    pub triangles: u32,
    pub material: Material,
    pub position: Vec3,
    /// Euler angles in radians, applied X then Y then Z.
    pub rotation: Vec3,
    pub scale: Vec3,
    /// rgb in xyz, alpha in w. Alpha below 1 routes the mesh through the
    /// transparent pass.
    pub tint: Vec3,
    pub render_transparent: bool,
    vbo: Option<BufferId>,
    vao: Option<VaoId>,
}

impl Mesh3D {
    pub fn from_data(data: MeshData3D, material: Material) -> Self {
        Self {
            data: data.data,
            triangles: data.triangles,
            material,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::new(1.0, 1.0, 1.0),
            tint: Vec3::with_w(1.0, 1.0, 1.0, 1.0),
            render_transparent: false,
            vbo: None,
            vao: None,
        }
    }

    /// Build a mesh from cached geometry, uploading only when the cache
    /// has no GPU-side reference for this key yet.
    pub fn make(
        device: &mut dyn GpuContext,
        cache: &mut ResourceCache,
        key: &str,
        material: Material,
    ) -> Result<Self> {
        if let Some(reference) = cache.reference_geometry(key) {
            debug!("sharing uploaded geometry for {key}");
            let mut mesh = Self::from_data(MeshData3D::new(), material);
            mesh.triangles = reference.triangles;
            mesh.vbo = Some(reference.vbo);
            mesh.vao = Some(reference.vao);
            return Ok(mesh);
        }

        let mut mesh = Self::from_data(cache.mesh_data(key)?, material);
        mesh.load(device);
        if let (Some(vbo), Some(vao)) = (mesh.vbo, mesh.vao) {
            cache.insert_reference_geometry(
                key,
                ReferenceGeometry { vbo, vao, triangles: mesh.triangles },
            );
        }
        Ok(mesh)
    }

    /// Upload vertex data and build the attribute layout. Idempotent.
    pub fn load(&mut self, device: &mut dyn GpuContext) {
        if self.vao.is_some() {
            return;
        }
        let vbo = device.create_buffer(&self.data);
        let vao = device.create_vertex_array(vbo, Vert3D::STRIDE, &ATTRS_3D);
        self.vbo = Some(vbo);
        self.vao = Some(vao);
    }

    pub fn is_loaded(&self) -> bool {
        self.vao.is_some()
    }

    pub fn vbo(&self) -> Option<BufferId> {
        self.vbo
    }

    pub fn vao(&self) -> Option<VaoId> {
        self.vao
    }

    /// Overwrite part of the uploaded vertex buffer, mirroring the change
    /// into the CPU copy when one is held. `offset` in floats.
    pub fn set_raw_vertex_data(
        &mut self,
        device: &mut dyn GpuContext,
        offset: usize,
        data: &[f32],
    ) {
        let Some(vbo) = self.vbo else {
            warn!("set_raw_vertex_data on unloaded mesh");
            return;
        };
        if offset + data.len() <= self.data.len() {
            self.data[offset..offset + data.len()].copy_from_slice(data);
        }
        device.update_buffer(vbo, offset, data);
    }

    pub fn transform(&self) -> Mat4 {
        Mat4::scale(self.scale.x, self.scale.y, self.scale.z)
            .mul(&Mat4::rotation_x(self.rotation.x))
            .mul(&Mat4::rotation_y(self.rotation.y))
            .mul(&Mat4::rotation_z(self.rotation.z))
            .mul(&Mat4::translation(self.position.x, self.position.y, self.position.z))
    }

    pub fn is_transparent(&self) -> bool {
        self.render_transparent || self.tint.w != 1.0
    }

    /// Draw a batch of meshes with shared camera and lighting state.
    /// Opaque meshes first, then transparent ones farthest-to-nearest
    /// with blending enabled.
    pub fn render_all(
        device: &mut dyn GpuContext,
        shader: &Shader,
        camera: &Camera3D,
        dir_light: &DirectionalLight,
        point_lights: &[PointLight],
        meshes: &[&Mesh3D],
        time: f32,
    ) {
        let p = shader.program;
        device.use_program(p);
        device.set_depth_test(true);

        device.set_uniform_mat4(p, "camera.view", camera.view().to_array());
        device.set_uniform_mat4(p, "camera.projection", camera.projection().to_array());
        device.set_uniform_vec3(p, "viewPos", v3(camera.position));
        device.set_uniform_f32(p, "u_time", time);

        device.set_uniform_vec3(p, "dirLight.direction", v3(dir_light.direction));
        device.set_uniform_vec3(p, "dirLight.ambient", v3(dir_light.ambient));
        device.set_uniform_vec3(p, "dirLight.diffuse", v3(dir_light.diffuse));
        device.set_uniform_vec3(p, "dirLight.specular", v3(dir_light.specular));

        if point_lights.len() > shader.max_lights {
            warn!(
                "{} point lights submitted, shader '{}' compiled for {}",
                point_lights.len(),
                shader.name,
                shader.max_lights
            );
        }
        let light_count = point_lights.len().min(shader.max_lights);
        device.set_uniform_i32(p, "numlights", light_count as i32);
        for (i, light) in point_lights.iter().take(light_count).enumerate() {
            let names = shader.point_light_names(i);
            device.set_uniform_vec3(p, &names.position, v3(light.position));
            device.set_uniform_vec3(p, &names.ambient, v3(light.ambient));
            device.set_uniform_vec3(p, &names.diffuse, v3(light.diffuse));
            device.set_uniform_vec3(p, &names.specular, v3(light.specular));
            device.set_uniform_f32(p, &names.constant, light.constant);
            device.set_uniform_f32(p, &names.linear, light.linear);
            device.set_uniform_f32(p, &names.quadratic, light.quadratic);
        }

        device.set_uniform_i32(p, "material.diffuse", 0);
        device.set_uniform_i32(p, "material.specular", 1);
        device.set_uniform_i32(p, "material.normal", 2);
        device.set_uniform_i32(p, "material.parallax", 3);

        let mut transparent: Vec<&Mesh3D> = Vec::new();
        for &mesh in meshes {
            if mesh.is_transparent() {
                transparent.push(mesh);
            } else {
                mesh.draw(device, shader);
            }
        }

        if transparent.is_empty() {
            return;
        }
        transparent.sort_by(|a, b| {
            let da = (a.position - camera.position).length2();
            let db = (b.position - camera.position).length2();
            db.partial_cmp(&da).unwrap_or(Ordering::Equal)
        });
        device.set_blend(true);
        for mesh in transparent {
            mesh.draw(device, shader);
        }
        device.set_blend(false);
    }

    fn draw(&self, device: &mut dyn GpuContext, shader: &Shader) {
        let Some(vao) = self.vao else {
            warn!("skipping unloaded mesh");
            return;
        };
        let p = shader.program;
        device.bind_vertex_array(vao);

        let model = self.transform();
        device.set_uniform_mat4(p, "mesh.transform", model.to_array());
        device.set_uniform_mat4(p, "mesh.inverseTransform", model.rigid_inverse().to_array());
        device.set_uniform_vec4(
            p,
            "mesh.tint",
            [self.tint.x, self.tint.y, self.tint.z, self.tint.w],
        );
        device.set_uniform_vec2(
            p,
            "mesh.scaleUV",
            [self.material.uv_scale.x, self.material.uv_scale.y],
        );
        device.set_uniform_f32(p, "material.shininess", self.material.shininess);
        device.set_uniform_f32(p, "material.parallaxScale", self.material.parallax_scale);

        device.bind_texture(0, self.material.diffuse);
        device.bind_texture(1, self.material.specular);
        device.bind_texture(2, self.material.normal);
        device.bind_texture(3, self.material.parallax);

        device.draw_triangles(0, (self.triangles * 3) as i32);
    }
}

fn v3(v: Vec3) -> [f32; 3] {
    [v.x, v.y, v.z]
}
