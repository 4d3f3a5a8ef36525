//! Texture loading: RGBA8 images from PNG files plus 1x1 solid-colour
//! placeholders for unset material slots.

use std::path::Path;

use anyhow::Result;

/// Texture data in CPU-friendly format before GPU upload.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureData {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl TextureData {
    /// Create a new RGBA8 texture with given dimensions.
    pub fn new_rgba8(width: u32, height: u32, data: Vec<u8>) -> Self {
        assert_eq!(
            data.len(),
            (width * height * 4) as usize,
            "Data size doesn't match RGBA8 format"
        );
        Self { data, width, height }
    }

    /// 1x1 solid colour, the default bound to unused material slots so
    /// sampling never breaks.
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self::new_rgba8(1, 1, rgba.to_vec())
    }

    /// Load texture from a PNG file.
    pub fn load_png<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path)
            .map_err(|e| anyhow::anyhow!("Failed to open image {:?}: {}", path, e))?;

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        let data = rgba.into_raw();

        log::info!("Loaded texture {:?} ({}x{})", path, width, height);
        Ok(Self::new_rgba8(width, height, data))
    }

    /// Check that the byte count matches the dimensions.
    pub fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.data.len() == (self.width * self.height * 4) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_placeholder_is_one_pixel() {
        let tex = TextureData::solid([255, 0, 255, 255]);
        assert_eq!((tex.width, tex.height), (1, 1));
        assert_eq!(tex.data, vec![255, 0, 255, 255]);
        assert!(tex.is_valid());
    }

    #[test]
    fn size_mismatch_is_invalid() {
        let tex = TextureData {
            data: vec![0; 3],
            width: 1,
            height: 1,
        };
        assert!(!tex.is_valid());
    }
}
