use std::ops::AddAssign;

use crate::render::shader::{ShaderCache, ShaderKind};
use crate::render::{RenderCtx, RenderError, RenderTarget};

use super::buffer::GrowableBuffer;
use super::staging::StagingBuffer;
use super::vertex::{check_layout, ShaderVertex};

/// What a flush submitted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlushStats {
    pub draw_calls: u32,
    pub index_count: u32,
    pub vertex_count: u32,
}

impl AddAssign for FlushStats {
    fn add_assign(&mut self, rhs: Self) {
        self.draw_calls += rhs.draw_calls;
        self.index_count += rhs.index_count;
        self.vertex_count += rhs.vertex_count;
    }
}

/// Batches draw requests for one shader kind.
///
/// Borrows the [`ShaderCache`] that owns its program; owns its staging data and
/// the GPU vertex/index buffers it uploads into.
pub struct Batcher<'c, V: ShaderVertex> {
    kind: ShaderKind,
    cache: &'c ShaderCache,
    staging: StagingBuffer<V>,
    vertex_buffer: GrowableBuffer,
    index_buffer: GrowableBuffer,
}

impl<'c, V: ShaderVertex> Batcher<'c, V> {
    /// Binds a batcher to `kind`.
    ///
    /// Fails when `kind` is not in `cache`, or when `V` does not match the
    /// vertex layout the shader declares.
    pub fn new(cache: &'c ShaderCache, kind: ShaderKind) -> Result<Self, RenderError> {
        let program = cache.get_shader_program(kind)?;
        check_layout::<V>(kind, program.vertex_layout())?;

        Ok(Self {
            kind,
            cache,
            staging: StagingBuffer::new(),
            vertex_buffer: GrowableBuffer::new("ember batch vbo", wgpu::BufferUsages::VERTEX),
            index_buffer: GrowableBuffer::new("ember batch ibo", wgpu::BufferUsages::INDEX),
        })
    }

    pub fn kind(&self) -> ShaderKind {
        self.kind
    }

    /// Stages one draw request; no GPU work happens here.
    ///
    /// `indices` are zero-based into `vertices` and are rebased onto the
    /// vertices already staged this frame.
    pub fn queue_draw(&mut self, indices: &[u32], vertices: &[V]) -> Result<(), RenderError> {
        self.staging.push(indices, vertices)
    }

    pub fn staged_vertices(&self) -> &[V] {
        self.staging.vertices()
    }

    pub fn staged_indices(&self) -> &[u32] {
        self.staging.indices()
    }

    pub fn is_empty(&self) -> bool {
        self.staging.is_empty()
    }

    /// Uploads everything staged and draws it with a single indexed draw call.
    ///
    /// Does nothing when no indices are staged (staged vertices are still
    /// discarded). Geometry and the program's current uniform values are
    /// copied on `target`'s encoder ahead of the pass, so several flushes into
    /// one encoder each draw what was staged for them. On error nothing is
    /// cleared.
    pub fn draw_everything(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
    ) -> Result<FlushStats, RenderError> {
        if self.staging.indices().is_empty() {
            self.staging.clear();
            return Ok(FlushStats::default());
        }

        let program = self.cache.get_shader_program(self.kind)?;
        if ctx.surface_format != self.cache.surface_format() {
            return Err(RenderError::TargetFormatMismatch {
                kind: self.kind,
                expected: self.cache.surface_format(),
                actual: ctx.surface_format,
            });
        }

        let overflow = || RenderError::IndexOverflow {
            vertex_count: self.staging.vertex_count(),
            index_count: self.staging.indices().len(),
        };
        let index_count = u32::try_from(self.staging.indices().len()).map_err(|_| overflow())?;
        let vertex_count = u32::try_from(self.staging.vertex_count()).map_err(|_| overflow())?;

        let vertex_bytes: &[u8] = bytemuck::cast_slice(self.staging.vertices());
        let index_bytes: &[u8] = bytemuck::cast_slice(self.staging.indices());
        program.record_uniforms(ctx.device, target.encoder);
        let vertex_buffer = self.vertex_buffer.upload(ctx.device, target.encoder, vertex_bytes);
        let index_buffer = self.index_buffer.upload(ctx.device, target.encoder, index_bytes);

        {
            let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("ember batch pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if ctx.viewport.is_valid() {
                rpass.set_viewport(0.0, 0.0, ctx.viewport.width, ctx.viewport.height, 0.0, 1.0);
            }
            rpass.set_pipeline(program.pipeline());
            if let Some(bind_group) = program.bind_group() {
                rpass.set_bind_group(0, bind_group, &[]);
            }
            rpass.set_vertex_buffer(0, vertex_buffer.slice(..vertex_bytes.len() as u64));
            rpass.set_index_buffer(
                index_buffer.slice(..index_bytes.len() as u64),
                wgpu::IndexFormat::Uint32,
            );
            rpass.draw_indexed(0..index_count, 0, 0..1);
        }

        let stats = FlushStats {
            draw_calls: 1,
            index_count,
            vertex_count,
        };
        log::trace!("{} flush: {stats:?}", self.kind);

        self.staging.clear();
        Ok(stats)
    }
}
