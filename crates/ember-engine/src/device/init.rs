/// What to ask of the adapter when opening a device.
#[derive(Debug, Clone)]
pub struct DeviceRequest {
    pub power_preference: wgpu::PowerPreference,
    pub features: wgpu::Features,
    pub limits: wgpu::Limits,
}

impl DeviceRequest {
    /// Limits that GLES and WebGL2 class backends can also satisfy.
    pub fn downlevel() -> Self {
        Self {
            limits: wgpu::Limits::downlevel_defaults(),
            ..Self::default()
        }
    }
}

impl Default for DeviceRequest {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::HighPerformance,
            features: wgpu::Features::empty(),
            limits: wgpu::Limits::default(),
        }
    }
}

/// Settings for a window-bound [`Gpu`](super::Gpu).
#[derive(Debug, Clone)]
pub struct GpuInit {
    pub device: DeviceRequest,

    /// Pick an sRGB swapchain format when the surface offers one.
    pub prefer_srgb: bool,

    pub present_mode: wgpu::PresentMode,

    /// Replaced by the surface's first supported mode when unsupported.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Frames the presentation engine may queue; a hint only.
    pub frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            device: DeviceRequest::default(),
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            frame_latency: 2,
        }
    }
}
