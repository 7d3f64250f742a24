/// Render-target area in physical pixels.
///
/// Carried by `RenderCtx` and applied by every batch flush, so the frame loop
/// decides the drawable size instead of a process-wide setting.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Builds a viewport from a framebuffer size.
    #[inline]
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(width as f32, height as f32)
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sized_viewport_is_invalid() {
        assert!(!Viewport::from_size(0, 480).is_valid());
        assert!(!Viewport::from_size(640, 0).is_valid());
    }

    #[test]
    fn framebuffer_size_is_valid() {
        let vp = Viewport::from_size(640, 480);
        assert!(vp.is_valid());
        assert_eq!(vp, Viewport::new(640.0, 480.0));
    }

    #[test]
    fn non_finite_viewport_is_invalid() {
        assert!(!Viewport::new(f32::INFINITY, 10.0).is_valid());
        assert!(!Viewport::new(10.0, f32::NAN).is_valid());
    }
}
