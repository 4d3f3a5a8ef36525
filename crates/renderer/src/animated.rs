use log::warn;

use crate::gpu::GpuContext;
use crate::mesh3d::Mesh3D;
use crate::RenderError;

/// Keyframe-animated mesh: one uploaded primary mesh whose vertex buffer
/// is rewritten each tick from a ring of frame meshes. Frames must share
/// the primary's exact vertex layout and count so raw floats can be
/// blended component-wise.
pub struct AnimatedMesh3D {
    pub mesh: Mesh3D,
    frames: Vec<Mesh3D>,
    /// Seconds each frame holds before advancing.
    pub frame_time: f32,
    pub start_frame: usize,
    pub end_frame: usize,
    pub interpolate_vertices: bool,
    pub interpolate_tint: bool,
    current: usize,
    elapsed: f32,
    scratch: Vec<f32>,
}

impl AnimatedMesh3D {
    pub fn new(mesh: Mesh3D, frame_time: f32) -> Self {
        let scratch = vec![0.0; mesh.data.len()];
        Self {
            mesh,
            frames: Vec::new(),
            frame_time,
            start_frame: 0,
            end_frame: 0,
            interpolate_vertices: true,
            interpolate_tint: false,
            current: 0,
            elapsed: 0.0,
            scratch,
        }
    }

    /// Append a keyframe. The frame's vertex data must be the same length
    /// as the primary mesh's.
    pub fn add_frame(&mut self, frame: Mesh3D) -> Result<(), RenderError> {
        if frame.data.len() != self.mesh.data.len() {
            return Err(RenderError::FrameMismatch {
                expected: self.mesh.data.len(),
                got: frame.data.len(),
            });
        }
        self.frames.push(frame);
        self.end_frame = self.frames.len() - 1;
        Ok(())
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn current_frame(&self) -> usize {
        self.current
    }

    fn next_frame(&self) -> usize {
        if self.current >= self.end_frame {
            self.start_frame
        } else {
            self.current + 1
        }
    }

    /// Step the animation clock by `dt` seconds and push the resulting
    /// vertex data into the primary mesh's GPU buffer.
    pub fn advance(&mut self, device: &mut dyn GpuContext, dt: f32) {
        if self.frames.len() < 2 {
            return;
        }
        if self.start_frame >= self.frames.len() || self.end_frame >= self.frames.len() {
            warn!("animation frame window out of range, skipping");
            return;
        }
        if self.current < self.start_frame || self.current > self.end_frame {
            self.current = self.start_frame;
        }

        self.elapsed += dt;
        if self.elapsed >= self.frame_time {
            self.current = self.next_frame();
            self.elapsed = 0.0;
            let frame = &self.frames[self.current];
            if self.interpolate_tint {
                self.mesh.tint = frame.tint;
            }
            self.scratch.copy_from_slice(&frame.data);
            self.mesh.set_raw_vertex_data(device, 0, &self.scratch);
            return;
        }

        let t = self.elapsed / self.frame_time;
        let next = self.next_frame();
        if self.interpolate_tint {
            self.mesh.tint = self.frames[self.current].tint.lerp(self.frames[next].tint, t);
        }
        if !self.interpolate_vertices {
            return;
        }
        let a = &self.frames[self.current].data;
        let b = &self.frames[next].data;
        for ((out, &x), &y) in self.scratch.iter_mut().zip(a).zip(b) {
            *out = x + (y - x) * t;
        }
        self.mesh.set_raw_vertex_data(device, 0, &self.scratch);
    }
}
