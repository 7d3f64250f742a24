use std::cell::Cell;

use crate::render::RenderError;
use crate::render::upload::record_upload;

use super::compile::{CompiledShader, FRAGMENT_ENTRY, VERTEX_ENTRY};
use super::uniform::resolve_slot;
use super::{ShaderKind, UniformDecl, UniformType, UniformValue, VertexLayout};

/// One compiled shader linked into a render pipeline.
///
/// Owns the pipeline, the bind group exposing its uniforms, and one GPU buffer
/// per declared uniform. Only [`ShaderCache`](super::ShaderCache) creates
/// programs; dropping it releases all of them.
///
/// Uniform values live on the CPU until a flush records them into the GPU
/// buffers ahead of its pass, so a draw sees the values current when it was
/// flushed.
pub struct ShaderProgram {
    kind: ShaderKind,
    pipeline: wgpu::RenderPipeline,

    /// `None` for shaders without uniforms.
    bind_group: Option<wgpu::BindGroup>,

    uniforms: Vec<UniformDecl>,
    /// Parallel to `uniforms`.
    uniform_values: Vec<Cell<UniformValue>>,
    /// Parallel to `uniforms`.
    uniform_buffers: Vec<wgpu::Buffer>,

    vertex_layout: VertexLayout,
}

impl ShaderProgram {
    /// Creates the GPU objects for `compiled`, targeting `surface_format`.
    ///
    /// Fails with [`RenderError::Link`] when the format cannot take a blended
    /// color attachment or when wgpu rejects any of the objects.
    pub(super) fn link(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        compiled: CompiledShader,
    ) -> Result<Self, RenderError> {
        let kind = compiled.kind();
        check_target_format(kind, device, surface_format)?;

        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
        let program = Self::create(device, surface_format, compiled);
        match pollster::block_on(scope.pop()) {
            None => Ok(program),
            Some(err) => Err(RenderError::Link {
                kind,
                reason: err.to_string(),
            }),
        }
    }

    fn create(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        compiled: CompiledShader,
    ) -> Self {
        let kind = compiled.kind();
        let (source, uniforms, vertex_layout) = compiled.into_parts();

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(kind.name()),
            source: wgpu::ShaderSource::Wgsl(source),
        });

        let layout_entries: Vec<wgpu::BindGroupLayoutEntry> = uniforms
            .iter()
            .map(|u| wgpu::BindGroupLayoutEntry {
                binding: u.binding,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: std::num::NonZeroU64::new(u.ty.byte_size()),
                },
                count: None,
            })
            .collect();

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("ember uniform bgl"),
            entries: &layout_entries,
        });

        let uniform_values = uniforms
            .iter()
            .map(|u| Cell::new(UniformValue::zeroed(u.ty)))
            .collect();
        let uniform_buffers: Vec<wgpu::Buffer> = uniforms
            .iter()
            .map(|u| {
                device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some(u.name.as_str()),
                    size: u.ty.byte_size(),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                })
            })
            .collect();

        let bind_group = (!uniforms.is_empty()).then(|| {
            let entries: Vec<wgpu::BindGroupEntry> = uniforms
                .iter()
                .zip(&uniform_buffers)
                .map(|(u, buffer)| wgpu::BindGroupEntry {
                    binding: u.binding,
                    resource: buffer.as_entire_binding(),
                })
                .collect();

            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("ember uniform bind group"),
                layout: &bind_group_layout,
                entries: &entries,
            })
        });

        let layouts = [&bind_group_layout];
        let bind_group_layouts: &[&wgpu::BindGroupLayout] =
            if uniforms.is_empty() { &[] } else { &layouts };

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("ember pipeline layout"),
            bind_group_layouts,
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(kind.name()),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some(VERTEX_ENTRY),
                compilation_options: Default::default(),
                buffers: &[vertex_layout.buffer_layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some(FRAGMENT_ENTRY),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Self {
            kind,
            pipeline,
            bind_group,
            uniforms,
            uniform_values,
            uniform_buffers,
            vertex_layout,
        }
    }

    pub fn kind(&self) -> ShaderKind {
        self.kind
    }

    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.bind_group.as_ref()
    }

    pub fn uniform_names(&self) -> impl Iterator<Item = &str> {
        self.uniforms.iter().map(|u| u.name.as_str())
    }

    pub fn uniform_type(&self, name: &str) -> Option<UniformType> {
        self.uniforms.iter().find(|u| u.name == name).map(|u| u.ty)
    }

    pub fn vertex_layout(&self) -> &VertexLayout {
        &self.vertex_layout
    }

    /// Value uniform `name` currently holds on the CPU side.
    pub fn uniform_value(&self, name: &str) -> Option<UniformValue> {
        let slot = self.uniforms.iter().position(|u| u.name == name)?;
        Some(self.uniform_values[slot].get())
    }

    /// Replaces the value of uniform `name`.
    ///
    /// Takes effect for flushes recorded after this call; other programs'
    /// slots are untouched.
    pub(super) fn write_uniform(&self, name: &str, value: UniformValue) -> Result<(), RenderError> {
        let slot = resolve_slot(self.kind, &self.uniforms, name, &value)?;
        self.uniform_values[slot].set(value);
        Ok(())
    }

    /// Records the current uniform values into the GPU buffers on `encoder`.
    ///
    /// Must precede the pass that draws with this program.
    pub(crate) fn record_uniforms(&self, device: &wgpu::Device, encoder: &mut wgpu::CommandEncoder) {
        for (value, buffer) in self.uniform_values.iter().zip(&self.uniform_buffers) {
            record_upload(device, encoder, buffer, value.get().as_bytes());
        }
    }
}

/// Rejects formats the pipeline's blended color target cannot use.
///
/// Checked against the guaranteed format features, which is what wgpu
/// validates against unless adapter-specific format features are enabled.
fn check_target_format(
    kind: ShaderKind,
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
) -> Result<(), RenderError> {
    let features = format.guaranteed_format_features(device.features());
    let reason = if !features
        .allowed_usages
        .contains(wgpu::TextureUsages::RENDER_ATTACHMENT)
    {
        format!("{format:?} cannot be rendered to")
    } else if !features
        .flags
        .contains(wgpu::TextureFormatFeatureFlags::BLENDABLE)
    {
        format!("{format:?} does not support alpha blending")
    } else {
        return Ok(());
    };
    Err(RenderError::Link { kind, reason })
}
