use crate::coords::Viewport;
use crate::device::{Gpu, GpuFrame};

/// Per-frame inputs every flush needs besides the target itself.
///
/// `surface_format` is the format of the target about to be drawn into; a
/// flush refuses to run if it differs from the one its shader cache was built
/// for.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub viewport: Viewport,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        viewport: Viewport,
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            viewport,
        }
    }

    /// Context for drawing into `gpu`'s swapchain at its current size.
    pub fn for_window(gpu: &'a Gpu<'_>) -> Self {
        Self::new(gpu.device(), gpu.queue(), gpu.surface_format(), gpu.viewport())
    }
}

/// Where a flush records its pass.
///
/// Passes load the existing attachment contents; clearing is up to the caller.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, color_view: &'a wgpu::TextureView) -> Self {
        Self { encoder, color_view }
    }

    pub fn for_frame(frame: &'a mut GpuFrame) -> Self {
        Self::new(&mut frame.encoder, &frame.view)
    }
}
