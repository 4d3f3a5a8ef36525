use crate::gpu::{GpuContext, RenderTargetId, TextureId};
use crate::RenderError;

/// Offscreen colour target. Bind it, draw a scene into it, then use the
/// attached texture on any mesh (mirrors, portals, postprocessing).
#[derive(Clone, Copy, Debug)]
pub struct RenderTexture {
    pub target: RenderTargetId,
    pub texture: TextureId,
    pub width: u32,
    pub height: u32,
}

impl RenderTexture {
    pub fn new(
        device: &mut dyn GpuContext,
        width: u32,
        height: u32,
    ) -> Result<Self, RenderError> {
        let target = device.create_render_target(width, height)?;
        let texture = device.render_target_texture(target);
        Ok(Self { target, texture, width, height })
    }

    /// Route subsequent draws into this target.
    pub fn bind(&self, device: &mut dyn GpuContext) {
        device.bind_render_target(Some(self.target));
    }

    /// Restore the default framebuffer.
    pub fn unbind(device: &mut dyn GpuContext) {
        device.bind_render_target(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{Event, MockDevice};

    #[test]
    fn bind_and_unbind_route_through_the_target() {
        let mut device = MockDevice::new();
        let rt = RenderTexture::new(&mut device, 256, 256).expect("target");

        rt.bind(&mut device);
        RenderTexture::unbind(&mut device);

        assert!(device.events.contains(&Event::BindRenderTarget(Some(rt.target))));
        assert_eq!(*device.events.last().unwrap(), Event::BindRenderTarget(None));
        assert_eq!(device.render_target_texture(rt.target), rt.texture);
    }
}
