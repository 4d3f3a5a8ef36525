//! SDL2 window with a core-profile GL context driving the real backend.
//! Enabled with the `sdl` feature; shows a spinning lit cube.

use anyhow::Result;
use asset::Geometry;
use math::Vec3;
use renderer::{GlDevice, GpuContext, Material, Mesh3D, ResourceCache, Shader, ShaderRegistry};
use scene::{Camera3D, DirectionalLight, PointLight};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use crate::demo::CUBE_OBJ;
use crate::scheduler::Scheduler;

pub fn run_windowed(fps: u32, width: u32, height: u32) -> Result<()> {
    let sdl = sdl2::init().map_err(anyhow::Error::msg)?;
    let video = sdl.video().map_err(anyhow::Error::msg)?;
    let gl_attr = video.gl_attr();
    gl_attr.set_context_profile(sdl2::video::GLProfile::Core);
    gl_attr.set_context_version(3, 3);

    let window = video
        .window("Veles3D", width, height)
        .opengl()
        .position_centered()
        .build()?;
    let _gl_context = window.gl_create_context().map_err(anyhow::Error::msg)?;
    let gl = unsafe {
        glow::Context::from_loader_function(|s| video.gl_get_proc_address(s) as *const _)
    };
    let mut device = GlDevice::new(gl);

    let registry = ShaderRegistry::with_builtins();
    let shader = Shader::link(
        &mut device,
        &registry,
        "scene",
        "mesh3d.vert",
        "mesh3d.frag",
        &[("version", "330 core")],
        8,
    )?;

    let mut cache = ResourceCache::new();
    cache.preload_text("cube.obj", Geometry::from_text(CUBE_OBJ));
    let material = Material::new(&mut device);
    let mut cube = Mesh3D::make(&mut device, &mut cache, "cube.obj", material)?;
    cube.position = Vec3::new(0.0, 0.0, 3.0);

    let camera = Camera3D::new(70.0, width as f32 / height as f32, 0.1, 100.0);
    let sun = DirectionalLight::default();
    let lights: [PointLight; 0] = [];

    let mut event_pump = sdl.event_pump().map_err(anyhow::Error::msg)?;
    let scheduler = Scheduler::new(fps)?;
    let mut time = 0.0f32;
    scheduler.run(|control, dt| {
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown { keycode: Some(Keycode::Escape), .. } => {
                    control.terminate("window closed");
                }
                _ => {}
            }
        }

        time += dt;
        cube.rotation.y = time;
        cube.rotation.x = time * 0.6;

        device.clear(0.05, 0.05, 0.08, 1.0);
        Mesh3D::render_all(&mut device, &shader, &camera, &sun, &lights, &[&cube], time);
        window.gl_swap_window();
        Ok(())
    })
}
