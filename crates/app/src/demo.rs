//! Headless pipeline dry run: resolves the built-in shader templates,
//! parses the embedded cube, and spins the camera through a fixed number
//! of ticks. Exercises everything except the GPU upload and draw.

use anyhow::Result;
use asset::Geometry;
use math::Vec3;
use renderer::{ResourceCache, ShaderRegistry};
use scene::Camera3D;

use crate::scheduler::Scheduler;

pub(crate) const CUBE_OBJ: &str = "\
v -0.5 -0.5 -0.5
v  0.5 -0.5 -0.5
v  0.5  0.5 -0.5
v -0.5  0.5 -0.5
v -0.5 -0.5  0.5
v  0.5 -0.5  0.5
v  0.5  0.5  0.5
v -0.5  0.5  0.5
f 1 2 3 4
f 6 5 8 7
f 5 1 4 8
f 2 6 7 3
f 4 3 7 8
f 5 6 2 1
";

pub fn run_headless(fps: u32, ticks: u32, width: u32, height: u32) -> Result<()> {
    let registry = ShaderRegistry::with_builtins();
    let vert = registry.source_with_params("mesh3d.vert", &[])?;
    let frag = registry.source_with_params(
        "mesh3d.frag",
        &[("maxLights", "4"), ("normalMap", "1")],
    )?;
    log::info!(
        "resolved shader templates: {} + {} lines of GLSL",
        vert.lines().count(),
        frag.lines().count()
    );

    let mut cache = ResourceCache::new();
    cache.preload_text("cube.obj", Geometry::from_text(CUBE_OBJ));
    let cube = cache.mesh_data("cube.obj")?;
    log::info!(
        "parsed cube: {} triangles, {} floats ({} parse)",
        cube.triangles,
        cube.data.len(),
        cache.parse_count()
    );

    let mut camera = Camera3D::new(70.0, width as f32 / height as f32, 0.1, 100.0);
    let scheduler = Scheduler::new(fps)?;
    let mut remaining = ticks.max(1);
    let mut angle = 0.0f32;
    scheduler.run(|control, dt| {
        angle += dt;
        camera.rotation.y = angle;
        camera.position = Vec3::new(angle.sin() * 3.0, 0.0, -angle.cos() * 3.0);
        let view = camera.view().to_array();
        let projection = camera.projection().to_array();
        debug_assert!(view.iter().chain(&projection).all(|f| f.is_finite()));

        remaining -= 1;
        if remaining == 0 {
            control.terminate(format!("dry run complete after {ticks} ticks"));
        }
        Ok(())
    })
}
