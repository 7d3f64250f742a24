/// Straight-alpha RGBA color, components in `0.0..=1.0`.
///
/// Serves as a clear color and as the value of `vec4<f32>` color uniforms.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ColorRgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ColorRgba {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque gray with all three channels at `level`.
    #[inline]
    pub const fn gray(level: f32) -> Self {
        Self::new(level, level, level, 1.0)
    }

    /// Channels in uniform-buffer order.
    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<ColorRgba> for wgpu::Color {
    fn from(c: ColorRgba) -> Self {
        let [r, g, b, a] = c.to_array().map(f64::from);
        wgpu::Color { r, g, b, a }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gray_is_opaque() {
        assert_eq!(ColorRgba::gray(0.5).to_array(), [0.5, 0.5, 0.5, 1.0]);
    }

    #[test]
    fn converts_to_wgpu_clear_color() {
        let c: wgpu::Color = ColorRgba::new(0.25, 0.5, 0.75, 1.0).into();
        assert_eq!((c.r, c.g, c.b, c.a), (0.25, 0.5, 0.75, 1.0));
    }
}
