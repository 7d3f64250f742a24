//! GPU device + surface management.
//!
//! - [`Gpu`]: adapter, device and queue bound to a winit window, with the
//!   swapchain configure/resize/acquire/present cycle.
//! - [`HeadlessGpu`]: the same without a surface, for off-screen work and tests.

mod adapter;
mod frame;
mod gpu;
mod headless;
mod init;
mod surface;

pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use headless::HeadlessGpu;
pub use init::{DeviceRequest, GpuInit};
pub use surface::SurfaceErrorAction;
