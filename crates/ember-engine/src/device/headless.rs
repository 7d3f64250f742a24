use anyhow::Result;

use super::{DeviceRequest, adapter};

/// Adapter, device and queue without a surface.
///
/// Used for off-screen rendering and by tests; callers render into their own
/// textures. Creation fails on machines without any usable adapter, which tests
/// treat as "skip".
pub struct HeadlessGpu {
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl HeadlessGpu {
    /// Opens a device with [`DeviceRequest::downlevel`] limits.
    pub async fn new() -> Result<Self> {
        Self::with_request(&DeviceRequest::downlevel()).await
    }

    pub async fn with_request(request: &DeviceRequest) -> Result<Self> {
        let instance = adapter::instance();
        let (adapter, device, queue) =
            adapter::open_device(&instance, None, request, "ember-engine headless device").await?;

        Ok(Self {
            adapter,
            device,
            queue,
        })
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
}
