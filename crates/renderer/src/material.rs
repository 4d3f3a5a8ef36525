use asset::TextureData;
use math::Vec2;

use crate::gpu::{GpuContext, TextureId};

/// Surface description: four texture slots plus Phong parameters.
/// Unset slots hold 1x1 solid-colour placeholders so sampling always
/// works; a flat normal map and black parallax map are no-ops.
#[derive(Clone, Copy, Debug)]
pub struct Material {
    pub diffuse: TextureId,
    pub specular: TextureId,
    pub normal: TextureId,
    pub parallax: TextureId,
    pub shininess: f32,
    pub parallax_scale: f32,
    pub uv_scale: Vec2,
}

impl Material {
    pub const DEFAULT_DIFFUSE: [u8; 4] = [255, 255, 255, 255];
    pub const DEFAULT_SPECULAR: [u8; 4] = [128, 128, 128, 255];
    pub const DEFAULT_NORMAL: [u8; 4] = [128, 128, 255, 255];
    pub const DEFAULT_PARALLAX: [u8; 4] = [0, 0, 0, 255];

    /// Material with placeholder textures in every slot.
    pub fn new(device: &mut dyn GpuContext) -> Self {
        Self {
            diffuse: device.create_texture(&TextureData::solid(Self::DEFAULT_DIFFUSE)),
            specular: device.create_texture(&TextureData::solid(Self::DEFAULT_SPECULAR)),
            normal: device.create_texture(&TextureData::solid(Self::DEFAULT_NORMAL)),
            parallax: device.create_texture(&TextureData::solid(Self::DEFAULT_PARALLAX)),
            shininess: 32.0,
            parallax_scale: 0.05,
            uv_scale: Vec2::new(1.0, 1.0),
        }
    }
}
