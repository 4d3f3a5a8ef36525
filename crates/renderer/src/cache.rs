use std::collections::HashMap;

use anyhow::Result;
use asset::{Geometry, MeshData3D, TextureData};
use log::debug;

use crate::gpu::{BufferId, GpuContext, TextureId, VaoId};

/// GPU-side handles for geometry that has already been uploaded once.
/// Meshes built from a reference share the same buffer and vertex array.
#[derive(Clone, Copy, Debug)]
pub struct ReferenceGeometry {
    pub vbo: BufferId,
    pub vao: VaoId,
    pub triangles: u32,
}

/// Keyed cache for everything fetched from disk or uploaded to the GPU.
///
/// Geometry resolves through three tiers: a reference hit hands back shared
/// GPU handles, a parsed hit rebuilds GPU buffers without re-parsing, and a
/// raw-text hit re-parses without touching the disk. Texture references are
/// shared by default; geometry references are opt-in because meshes built
/// from the same reference also share any later vertex edits.
pub struct ResourceCache {
    pub use_texture_reference_cache: bool,
    pub use_geometry_reference_cache: bool,
    texts: HashMap<String, Geometry>,
    parsed: HashMap<String, MeshData3D>,
    references: HashMap<String, ReferenceGeometry>,
    images: HashMap<String, TextureData>,
    texture_refs: HashMap<String, TextureId>,
    parses: usize,
}

impl ResourceCache {
    pub fn new() -> Self {
        Self {
            use_texture_reference_cache: true,
            use_geometry_reference_cache: false,
            texts: HashMap::new(),
            parsed: HashMap::new(),
            references: HashMap::new(),
            images: HashMap::new(),
            texture_refs: HashMap::new(),
            parses: 0,
        }
    }

    /// How many times geometry text has actually been run through the
    /// parser. Cache hits do not increment this.
    pub fn parse_count(&self) -> usize {
        self.parses
    }

    /// Seed raw geometry text under a key without touching the disk.
    pub fn preload_text(&mut self, key: &str, geometry: Geometry) {
        self.texts.insert(key.to_string(), geometry);
    }

    pub fn reference_geometry(&self, key: &str) -> Option<ReferenceGeometry> {
        if self.use_geometry_reference_cache {
            self.references.get(key).copied()
        } else {
            None
        }
    }

    /// Record uploaded handles for a key. First upload wins; later calls
    /// for the same key are ignored so existing meshes keep their handles.
    pub fn insert_reference_geometry(&mut self, key: &str, reference: ReferenceGeometry) {
        self.references
            .entry(key.to_string())
            .or_insert(reference);
    }

    /// Parsed vertex data for a key, fetching and parsing only on miss.
    pub fn mesh_data(&mut self, key: &str) -> Result<MeshData3D> {
        if let Some(mesh) = self.parsed.get(key) {
            debug!("geometry cache hit (parsed): {key}");
            return Ok(mesh.clone());
        }
        let geometry = match self.texts.get(key) {
            Some(geometry) => {
                debug!("geometry cache hit (text): {key}");
                geometry.clone()
            }
            None => {
                let geometry = Geometry::from_path(key)?;
                self.texts.insert(key.to_string(), geometry.clone());
                geometry
            }
        };
        let mesh = geometry.parse()?;
        self.parses += 1;
        self.parsed.insert(key.to_string(), mesh.clone());
        Ok(mesh)
    }

    /// GPU texture for an image path. With the texture reference cache on
    /// (the default), repeated requests share one texture object.
    pub fn texture(&mut self, device: &mut dyn GpuContext, path: &str) -> Result<TextureId> {
        if self.use_texture_reference_cache {
            if let Some(&id) = self.texture_refs.get(path) {
                debug!("texture cache hit: {path}");
                return Ok(id);
            }
        }
        let id = match self.images.get(path) {
            Some(data) => {
                debug!("texture cache hit (decoded): {path}");
                device.create_texture(data)
            }
            None => {
                let data = TextureData::load_png(path)?;
                let id = device.create_texture(&data);
                self.images.insert(path.to_string(), data);
                id
            }
        };
        if self.use_texture_reference_cache {
            self.texture_refs.insert(path.to_string(), id);
        }
        Ok(id)
    }

    /// Seed decoded texture data under a key without touching the disk.
    pub fn preload_image(&mut self, key: &str, data: TextureData) {
        self.images.insert(key.to_string(), data);
    }
}

impl Default for ResourceCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE_OBJ: &str = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
f 1 2 3
";

    #[test]
    fn mesh_data_parses_once_per_key() {
        let mut cache = ResourceCache::new();
        cache.preload_text("tri.obj", Geometry::from_text(TRIANGLE_OBJ));

        let first = cache.mesh_data("tri.obj").unwrap();
        let second = cache.mesh_data("tri.obj").unwrap();
        assert_eq!(cache.parse_count(), 1);
        assert_eq!(first.triangles, 1);
        assert_eq!(first.data, second.data);
    }

    #[test]
    fn reference_lookup_respects_flag() {
        let mut cache = ResourceCache::new();
        let reference = ReferenceGeometry {
            vbo: BufferId(7),
            vao: VaoId(8),
            triangles: 12,
        };
        cache.insert_reference_geometry("cube.obj", reference);

        assert!(cache.reference_geometry("cube.obj").is_none());
        cache.use_geometry_reference_cache = true;
        let hit = cache.reference_geometry("cube.obj").unwrap();
        assert_eq!(hit.vbo, BufferId(7));
        assert_eq!(hit.triangles, 12);
    }

    #[test]
    fn first_reference_insert_wins() {
        let mut cache = ResourceCache::new();
        cache.use_geometry_reference_cache = true;
        cache.insert_reference_geometry(
            "a.obj",
            ReferenceGeometry { vbo: BufferId(1), vao: VaoId(1), triangles: 1 },
        );
        cache.insert_reference_geometry(
            "a.obj",
            ReferenceGeometry { vbo: BufferId(2), vao: VaoId(2), triangles: 2 },
        );
        assert_eq!(cache.reference_geometry("a.obj").unwrap().vbo, BufferId(1));
    }

    #[test]
    fn texture_reference_cache_shares_one_texture() {
        let mut device = crate::testutil::MockDevice::new();
        let mut cache = ResourceCache::new();
        cache.preload_image("white.png", TextureData::solid([255; 4]));

        let a = cache.texture(&mut device, "white.png").unwrap();
        let b = cache.texture(&mut device, "white.png").unwrap();
        assert_eq!(a, b);

        // sharing off: same decoded image, fresh GPU object
        cache.use_texture_reference_cache = false;
        let c = cache.texture(&mut device, "white.png").unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn missing_geometry_file_is_an_error() {
        let mut cache = ResourceCache::new();
        assert!(cache.mesh_data("no/such/file.obj").is_err());
    }
}
