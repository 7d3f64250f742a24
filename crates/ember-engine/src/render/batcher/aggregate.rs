use crate::render::shader::{ShaderCache, ShaderKind};
use crate::render::{RenderCtx, RenderError, RenderTarget};

use super::typed::{Batcher, FlushStats};
use super::vertex::{ColoredVertex, PositionVertex, ShaderVertex};

/// One [`Batcher`] per kind the cache was built with.
///
/// Batchers never share staging data. Kinds missing from the cache have no
/// batcher; asking for one is an [`RenderError::UnknownShader`].
pub struct Batchers<'c> {
    absolute_position_with_solid_color: Option<Batcher<'c, PositionVertex>>,
    absolute_position_with_colored_vertex: Option<Batcher<'c, ColoredVertex>>,
    transform_v_with_colored_vertex: Option<Batcher<'c, ColoredVertex>>,
}

impl<'c> Batchers<'c> {
    pub fn new(cache: &'c ShaderCache) -> Result<Self, RenderError> {
        Ok(Self {
            absolute_position_with_solid_color: batcher_for(
                cache,
                ShaderKind::AbsolutePositionWithSolidColor,
            )?,
            absolute_position_with_colored_vertex: batcher_for(
                cache,
                ShaderKind::AbsolutePositionWithColoredVertex,
            )?,
            transform_v_with_colored_vertex: batcher_for(
                cache,
                ShaderKind::TransformVWithColoredVertex,
            )?,
        })
    }

    pub fn absolute_position_with_solid_color(
        &mut self,
    ) -> Result<&mut Batcher<'c, PositionVertex>, RenderError> {
        self.absolute_position_with_solid_color
            .as_mut()
            .ok_or(RenderError::UnknownShader(ShaderKind::AbsolutePositionWithSolidColor))
    }

    pub fn absolute_position_with_colored_vertex(
        &mut self,
    ) -> Result<&mut Batcher<'c, ColoredVertex>, RenderError> {
        self.absolute_position_with_colored_vertex
            .as_mut()
            .ok_or(RenderError::UnknownShader(ShaderKind::AbsolutePositionWithColoredVertex))
    }

    pub fn transform_v_with_colored_vertex(
        &mut self,
    ) -> Result<&mut Batcher<'c, ColoredVertex>, RenderError> {
        self.transform_v_with_colored_vertex
            .as_mut()
            .ok_or(RenderError::UnknownShader(ShaderKind::TransformVWithColoredVertex))
    }

    /// True when no batcher has anything staged.
    pub fn is_empty(&self) -> bool {
        self.absolute_position_with_solid_color
            .as_ref()
            .is_none_or(|b| b.is_empty())
            && self
                .absolute_position_with_colored_vertex
                .as_ref()
                .is_none_or(|b| b.is_empty())
            && self
                .transform_v_with_colored_vertex
                .as_ref()
                .is_none_or(|b| b.is_empty())
    }

    /// Flushes every batcher in [`ShaderKind::ALL`] order.
    ///
    /// Stops at the first failing batcher; later ones keep their staged data.
    pub fn draw_everything(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
    ) -> Result<FlushStats, RenderError> {
        let mut total = FlushStats::default();

        if let Some(b) = self.absolute_position_with_solid_color.as_mut() {
            total += b.draw_everything(ctx, target)?;
        }
        if let Some(b) = self.absolute_position_with_colored_vertex.as_mut() {
            total += b.draw_everything(ctx, target)?;
        }
        if let Some(b) = self.transform_v_with_colored_vertex.as_mut() {
            total += b.draw_everything(ctx, target)?;
        }

        Ok(total)
    }
}

fn batcher_for<'c, V: ShaderVertex>(
    cache: &'c ShaderCache,
    kind: ShaderKind,
) -> Result<Option<Batcher<'c, V>>, RenderError> {
    if !cache.contains(kind) {
        return Ok(None);
    }
    Batcher::new(cache, kind).map(Some)
}
