use ouroboros::self_referencing;

use ember_engine::coords::ColorRgba;
use ember_engine::device::{Gpu, GpuFrame};
use ember_engine::render::batcher::{Batchers, ColoredVertex, FlushStats, PositionVertex};
use ember_engine::render::shader::{ShaderCache, ShaderKind};
use ember_engine::render::{RenderCtx, RenderError, RenderTarget};

/// Shader kinds the demo draws with.
pub const SHADERS: [ShaderKind; 2] = [
    ShaderKind::AbsolutePositionWithSolidColor,
    ShaderKind::TransformVWithColoredVertex,
];

const SOLID_GRAY: ColorRgba = ColorRgba::gray(0.5);

// Two triangles over a quad listed as (tr, br, bl, tl).
const QUAD_INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

const LEFT_SQUARE: [PositionVertex; 4] = [
    PositionVertex::new(-0.8, 0.5, 0.0),
    PositionVertex::new(-0.8, -0.5, 0.0),
    PositionVertex::new(-0.4, -0.5, 0.0),
    PositionVertex::new(-0.4, 0.5, 0.0),
];

const RIGHT_SQUARE: [PositionVertex; 4] = [
    PositionVertex::new(0.4, 0.5, 0.0),
    PositionVertex::new(0.4, -0.5, 0.0),
    PositionVertex::new(0.8, -0.5, 0.0),
    PositionVertex::new(0.8, 0.5, 0.0),
];

const CENTER_SQUARE: [ColoredVertex; 4] = [
    ColoredVertex::new([0.25, 0.25, 0.0], [1.0, 0.2, 0.2]),
    ColoredVertex::new([0.25, -0.25, 0.0], [0.2, 1.0, 0.2]),
    ColoredVertex::new([-0.25, -0.25, 0.0], [0.2, 0.2, 1.0]),
    ColoredVertex::new([-0.25, 0.25, 0.0], [1.0, 1.0, 0.2]),
];

/// Shader cache plus the batchers that borrow it.
#[self_referencing]
pub struct Scene {
    cache: ShaderCache,

    #[borrows(cache)]
    #[covariant]
    batchers: Batchers<'this>,
}

impl Scene {
    /// Compiles the demo's shaders for `gpu`'s surface and sets the static uniforms.
    pub fn create(gpu: &Gpu<'_>) -> Result<Self, RenderError> {
        let cache = ShaderCache::new(gpu.device(), gpu.surface_format(), &SHADERS)?;
        cache.set_uniform(
            ShaderKind::AbsolutePositionWithSolidColor,
            "rgba_color",
            SOLID_GRAY,
        )?;

        Scene::try_new(cache, |cache| Batchers::new(cache))
    }

    /// Queues the frame's geometry and flushes it into `frame`.
    ///
    /// `angle` is the center square's rotation in radians.
    pub fn render(
        &mut self,
        gpu: &Gpu<'_>,
        frame: &mut GpuFrame,
        angle: f32,
    ) -> Result<FlushStats, RenderError> {
        let ctx = RenderCtx::for_window(gpu);

        self.with_mut(|fields| {
            fields.cache.set_uniform(
                ShaderKind::TransformVWithColoredVertex,
                "transform",
                rotation_z(angle),
            )?;

            let solid = fields.batchers.absolute_position_with_solid_color()?;
            solid.queue_draw(&QUAD_INDICES, &LEFT_SQUARE)?;
            solid.queue_draw(&QUAD_INDICES, &RIGHT_SQUARE)?;

            fields
                .batchers
                .transform_v_with_colored_vertex()?
                .queue_draw(&QUAD_INDICES, &CENTER_SQUARE)?;

            let mut target = RenderTarget::for_frame(frame);
            fields.batchers.draw_everything(&ctx, &mut target)
        })
    }
}

/// Column-major rotation about the z axis.
fn rotation_z(angle: f32) -> [[f32; 4]; 4] {
    let (s, c) = angle.sin_cos();
    [
        [c, s, 0.0, 0.0],
        [-s, c, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(m: [[f32; 4]; 4], v: [f32; 4]) -> [f32; 4] {
        let mut out = [0.0; 4];
        for (col, &x) in m.iter().zip(v.iter()) {
            for (o, c) in out.iter_mut().zip(col.iter()) {
                *o += c * x;
            }
        }
        out
    }

    #[test]
    fn rotation_turns_x_towards_y() {
        let r = apply(rotation_z(std::f32::consts::FRAC_PI_2), [1.0, 0.0, 0.0, 1.0]);
        assert!(r[0].abs() < 1e-6);
        assert!((r[1] - 1.0).abs() < 1e-6);
        assert_eq!(r[3], 1.0);
    }

    #[test]
    fn zero_angle_is_identity() {
        let v = [0.3, -0.7, 0.0, 1.0];
        assert_eq!(apply(rotation_z(0.0), v), v);
    }

    #[test]
    fn squares_are_disjoint_in_x() {
        let max_left = LEFT_SQUARE.iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
        let min_right = RIGHT_SQUARE.iter().map(|v| v.position[0]).fold(f32::MAX, f32::min);
        assert!(max_left < min_right);
    }
}
