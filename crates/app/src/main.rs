//! Entry point for Veles3D. Headless pipeline dry run by default; build
//! with `--features sdl` for a windowed demo.

use anyhow::Result;

mod demo;
mod scheduler;
#[cfg(feature = "sdl")]
mod window;

fn parse_fps_arg() -> u32 {
    // Accept: --fps=N, default 60
    for arg in std::env::args() {
        if let Some(val) = arg.strip_prefix("--fps=") {
            if let Ok(fps) = val.parse::<u32>() {
                return fps;
            }
            eprintln!("[warn] Bad --fps value '{val}', falling back to 60.");
        }
    }
    60
}

#[cfg(not(feature = "sdl"))]
fn parse_ticks_arg() -> u32 {
    // Accept: --ticks=N, default 120
    for arg in std::env::args() {
        if let Some(val) = arg.strip_prefix("--ticks=") {
            if let Ok(ticks) = val.parse::<u32>() {
                return ticks.max(1);
            }
        }
    }
    120
}

fn parse_size_args() -> (u32, u32) {
    let mut w: Option<u32> = None;
    let mut h: Option<u32> = None;

    for arg in std::env::args() {
        if let Some(v) = arg.strip_prefix("--size=") {
            if let Some((sw, sh)) = v.split_once('x').or_else(|| v.split_once('X')) {
                if let (Ok(pw), Ok(ph)) = (sw.parse::<u32>(), sh.parse::<u32>()) {
                    w = Some(pw);
                    h = Some(ph);
                }
            }
        } else if let Some(v) = arg.strip_prefix("--width=") {
            if let Ok(pw) = v.parse::<u32>() {
                w = Some(pw);
            }
        } else if let Some(v) = arg.strip_prefix("--height=") {
            if let Ok(ph) = v.parse::<u32>() {
                h = Some(ph);
            }
        }
    }

    (w.unwrap_or(1280).max(1), h.unwrap_or(720).max(1))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let fps = parse_fps_arg();
    let (width, height) = parse_size_args();
    log::info!("Starting Veles3D. fps={fps}, size={width}x{height}");

    #[cfg(feature = "sdl")]
    window::run_windowed(fps, width, height)?;

    #[cfg(not(feature = "sdl"))]
    demo::run_headless(fps, parse_ticks_arg(), width, height)?;

    log::info!("Graceful shutdown. Bye!");
    Ok(())
}
