//! Fixed-timestep tick loop. Every tick sees the same `dt` (1/fps); the
//! loop sleeps away whatever real time is left in the frame.

use std::time::{Duration, Instant};

use anyhow::{bail, Result};

/// Handed to the tick callback so it can stop the loop cooperatively.
#[derive(Debug, Default)]
pub struct Control {
    stop: Option<String>,
}

impl Control {
    /// Request shutdown after the current tick. The first message wins.
    pub fn terminate(&mut self, message: impl Into<String>) {
        if self.stop.is_none() {
            self.stop = Some(message.into());
        }
    }

    pub fn is_terminated(&self) -> bool {
        self.stop.is_some()
    }
}

pub struct Scheduler {
    fps: u32,
    frame: Duration,
}

impl Scheduler {
    pub fn new(fps: u32) -> Result<Self> {
        if fps == 0 {
            bail!("scheduler fps must be positive, got {fps}");
        }
        Ok(Self {
            fps,
            frame: Duration::from_secs_f64(1.0 / f64::from(fps)),
        })
    }

    /// Simulation step per tick, in seconds.
    pub fn dt(&self) -> f32 {
        1.0 / self.fps as f32
    }

    /// Run until the callback terminates or errors.
    pub fn run<F>(&self, mut tick: F) -> Result<()>
    where
        F: FnMut(&mut Control, f32) -> Result<()>,
    {
        let mut control = Control::default();
        loop {
            let start = Instant::now();
            tick(&mut control, self.dt())?;
            if let Some(message) = control.stop.take() {
                log::info!("{message}");
                return Ok(());
            }
            let elapsed = start.elapsed();
            if elapsed < self.frame {
                std::thread::sleep(self.frame - elapsed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_fps_is_rejected() {
        assert!(Scheduler::new(0).is_err());
    }

    #[test]
    fn dt_is_frame_reciprocal() {
        let scheduler = Scheduler::new(60).unwrap();
        assert!((scheduler.dt() - 1.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn loop_stops_on_terminate() {
        let scheduler = Scheduler::new(1000).unwrap();
        let mut ticks = 0;
        scheduler
            .run(|control, _dt| {
                ticks += 1;
                if ticks == 3 {
                    control.terminate("done");
                }
                Ok(())
            })
            .unwrap();
        assert_eq!(ticks, 3);
    }

    #[test]
    fn tick_error_propagates() {
        let scheduler = Scheduler::new(1000).unwrap();
        let result = scheduler.run(|_control, _dt| bail!("boom"));
        assert!(result.is_err());
    }
}
