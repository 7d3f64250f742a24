use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;

use super::GpuInit;

/// What the frame loop should do after a failed frame acquisition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// The surface was (or will be, on the next resize) configured again.
    Reconfigured,
    /// Drop this frame and try the next one.
    SkipFrame,
    /// Out of memory; the application should shut down.
    Fatal,
}

/// Builds the swapchain configuration for a surface with `caps` at `size`.
pub(super) fn configuration(
    caps: &wgpu::SurfaceCapabilities,
    init: &GpuInit,
    size: PhysicalSize<u32>,
) -> Result<wgpu::SurfaceConfiguration> {
    let srgb = init
        .prefer_srgb
        .then(|| caps.formats.iter().copied().find(|f| f.is_srgb()))
        .flatten();
    let format = srgb
        .or_else(|| caps.formats.first().copied())
        .context("no supported surface formats")?;

    let alpha_mode = init
        .alpha_mode
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto);

    Ok(wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: size.width.max(1),
        height: size.height.max(1),
        present_mode: init.present_mode,
        alpha_mode,
        view_formats: vec![],
        desired_maximum_frame_latency: init.frame_latency,
    })
}

/// Maps a surface error to an action; `reconfigure` runs for lost or outdated
/// surfaces unless the window is minimized.
pub(super) fn classify_surface_error(
    err: wgpu::SurfaceError,
    size: PhysicalSize<u32>,
    reconfigure: impl FnOnce(),
) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
            // wgpu cannot configure a 0x0 surface; the next resize will do it.
            if size.width > 0 && size.height > 0 {
                reconfigure();
            }
            SurfaceErrorAction::Reconfigured
        }
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(formats: &[wgpu::TextureFormat], alpha: &[wgpu::CompositeAlphaMode]) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats: formats.to_vec(),
            present_modes: vec![wgpu::PresentMode::Fifo],
            alpha_modes: alpha.to_vec(),
            usages: wgpu::TextureUsages::RENDER_ATTACHMENT,
        }
    }

    fn classify(err: wgpu::SurfaceError, w: u32, h: u32) -> (SurfaceErrorAction, bool) {
        let mut reconfigured = false;
        let action = classify_surface_error(err, PhysicalSize::new(w, h), || reconfigured = true);
        (action, reconfigured)
    }

    #[test]
    fn srgb_format_is_preferred() {
        let caps = caps(
            &[wgpu::TextureFormat::Bgra8Unorm, wgpu::TextureFormat::Bgra8UnormSrgb],
            &[wgpu::CompositeAlphaMode::Opaque],
        );
        let config = configuration(&caps, &GpuInit::default(), PhysicalSize::new(640, 480)).unwrap();
        assert_eq!(config.format, wgpu::TextureFormat::Bgra8UnormSrgb);
        assert_eq!((config.width, config.height), (640, 480));

        let linear = GpuInit {
            prefer_srgb: false,
            ..GpuInit::default()
        };
        let config = configuration(&caps, &linear, PhysicalSize::new(640, 480)).unwrap();
        assert_eq!(config.format, wgpu::TextureFormat::Bgra8Unorm);
    }

    #[test]
    fn unsupported_alpha_mode_falls_back() {
        let caps = caps(
            &[wgpu::TextureFormat::Rgba8Unorm],
            &[wgpu::CompositeAlphaMode::Opaque],
        );
        let init = GpuInit {
            alpha_mode: Some(wgpu::CompositeAlphaMode::PreMultiplied),
            ..GpuInit::default()
        };
        let config = configuration(&caps, &init, PhysicalSize::new(1, 1)).unwrap();
        assert_eq!(config.alpha_mode, wgpu::CompositeAlphaMode::Opaque);
    }

    #[test]
    fn surface_without_formats_is_an_error() {
        let caps = caps(&[], &[]);
        assert!(configuration(&caps, &GpuInit::default(), PhysicalSize::new(1, 1)).is_err());
    }

    #[test]
    fn lost_surface_is_reconfigured() {
        assert_eq!(
            classify(wgpu::SurfaceError::Lost, 640, 480),
            (SurfaceErrorAction::Reconfigured, true)
        );
    }

    #[test]
    fn minimized_window_defers_reconfigure() {
        assert_eq!(
            classify(wgpu::SurfaceError::Outdated, 0, 0),
            (SurfaceErrorAction::Reconfigured, false)
        );
    }

    #[test]
    fn out_of_memory_is_fatal() {
        assert_eq!(
            classify(wgpu::SurfaceError::OutOfMemory, 640, 480).0,
            SurfaceErrorAction::Fatal
        );
    }

    #[test]
    fn timeout_skips_frame() {
        assert_eq!(
            classify(wgpu::SurfaceError::Timeout, 640, 480).0,
            SurfaceErrorAction::SkipFrame
        );
    }
}
