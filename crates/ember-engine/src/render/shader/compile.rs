//! CPU stage of a shader program: WGSL parse, validation and reflection.

use std::borrow::Cow;

use naga::valid::{Capabilities, ValidationFlags, Validator};

use crate::render::RenderError;

use super::{ShaderKind, UniformType};

pub(crate) const VERTEX_ENTRY: &str = "vs_main";
pub(crate) const FRAGMENT_ENTRY: &str = "fs_main";

/// A uniform slot declared by a shader (`var<uniform>` in bind group 0).
#[derive(Debug, Clone, PartialEq)]
pub struct UniformDecl {
    pub name: String,
    pub binding: u32,
    pub ty: UniformType,
}

/// Vertex buffer layout expected by a shader's vertex entry point.
///
/// Attributes are tightly packed in `@location` order.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexLayout {
    pub stride: u64,
    pub attributes: Vec<wgpu::VertexAttribute>,
}

impl VertexLayout {
    pub fn buffer_layout(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }
}

/// Validated WGSL module plus what the linker needs to know about it.
#[derive(Debug, Clone)]
pub struct CompiledShader {
    kind: ShaderKind,
    source: Cow<'static, str>,
    uniforms: Vec<UniformDecl>,
    vertex_layout: VertexLayout,
}

impl CompiledShader {
    /// Compiles the built-in source of `kind`.
    pub fn compile(kind: ShaderKind) -> Result<Self, RenderError> {
        Self::compile_source(kind, kind.source())
    }

    /// Compiles arbitrary WGSL under the identity of `kind`.
    ///
    /// Syntax and validation failures become [`RenderError::Compile`] carrying
    /// naga's source-annotated diagnostic. Modules that compile but cannot be
    /// bound by the cache (missing entry points, unsupported uniform or vertex
    /// input types) become [`RenderError::Link`].
    pub fn compile_source(
        kind: ShaderKind,
        source: impl Into<Cow<'static, str>>,
    ) -> Result<Self, RenderError> {
        let source = source.into();

        let module = naga::front::wgsl::parse_str(&source).map_err(|e| RenderError::Compile {
            kind,
            diagnostic: e.emit_to_string(&source),
        })?;

        Validator::new(ValidationFlags::all(), Capabilities::empty())
            .validate(&module)
            .map_err(|e| RenderError::Compile {
                kind,
                diagnostic: e.emit_to_string(&source),
            })?;

        if !has_entry_point(&module, naga::ShaderStage::Fragment, FRAGMENT_ENTRY) {
            return Err(link_error(kind, format!("missing fragment entry point `{FRAGMENT_ENTRY}`")));
        }

        let uniforms = reflect_uniforms(kind, &module)?;
        let vertex_layout = reflect_vertex_layout(kind, &module)?;

        Ok(Self {
            kind,
            source,
            uniforms,
            vertex_layout,
        })
    }

    pub fn kind(&self) -> ShaderKind {
        self.kind
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Declared uniforms, ordered by binding.
    pub fn uniforms(&self) -> &[UniformDecl] {
        &self.uniforms
    }

    pub fn vertex_layout(&self) -> &VertexLayout {
        &self.vertex_layout
    }

    pub(super) fn into_parts(self) -> (Cow<'static, str>, Vec<UniformDecl>, VertexLayout) {
        (self.source, self.uniforms, self.vertex_layout)
    }
}

fn link_error(kind: ShaderKind, reason: String) -> RenderError {
    RenderError::Link { kind, reason }
}

fn has_entry_point(module: &naga::Module, stage: naga::ShaderStage, name: &str) -> bool {
    module
        .entry_points
        .iter()
        .any(|ep| ep.stage == stage && ep.name == name)
}

fn reflect_uniforms(kind: ShaderKind, module: &naga::Module) -> Result<Vec<UniformDecl>, RenderError> {
    let mut uniforms = Vec::new();

    for (_, var) in module.global_variables.iter() {
        if !matches!(var.space, naga::AddressSpace::Uniform) {
            continue;
        }

        let name = var.name.clone().unwrap_or_default();
        let Some(binding) = var.binding.as_ref() else {
            return Err(link_error(kind, format!("uniform `{name}` has no binding")));
        };
        if binding.group != 0 {
            return Err(link_error(
                kind,
                format!(
                    "uniform `{name}` is in bind group {}; only group 0 is supported",
                    binding.group
                ),
            ));
        }

        let ty = uniform_type(&module.types[var.ty].inner).ok_or_else(|| {
            link_error(
                kind,
                format!("uniform `{name}` has an unsupported type (expected vec4<f32> or mat4x4<f32>)"),
            )
        })?;

        uniforms.push(UniformDecl {
            name,
            binding: binding.binding,
            ty,
        });
    }

    uniforms.sort_by_key(|u| u.binding);
    Ok(uniforms)
}

fn uniform_type(inner: &naga::TypeInner) -> Option<UniformType> {
    match *inner {
        naga::TypeInner::Vector {
            size: naga::VectorSize::Quad,
            scalar,
        } if scalar == naga::Scalar::F32 => Some(UniformType::Vec4),
        naga::TypeInner::Matrix {
            columns: naga::VectorSize::Quad,
            rows: naga::VectorSize::Quad,
            scalar,
        } if scalar == naga::Scalar::F32 => Some(UniformType::Mat4),
        _ => None,
    }
}

fn reflect_vertex_layout(kind: ShaderKind, module: &naga::Module) -> Result<VertexLayout, RenderError> {
    let entry = module
        .entry_points
        .iter()
        .find(|ep| ep.stage == naga::ShaderStage::Vertex && ep.name == VERTEX_ENTRY)
        .ok_or_else(|| link_error(kind, format!("missing vertex entry point `{VERTEX_ENTRY}`")))?;

    let mut inputs: Vec<(u32, wgpu::VertexFormat)> = Vec::new();
    for arg in &entry.function.arguments {
        match &arg.binding {
            Some(naga::Binding::Location { location, .. }) => {
                inputs.push((*location, vertex_format(kind, &module.types[arg.ty].inner)?));
            }
            Some(naga::Binding::BuiltIn(_)) => {}
            None => {
                // Struct argument: its members carry the bindings.
                if let naga::TypeInner::Struct { members, .. } = &module.types[arg.ty].inner {
                    for member in members {
                        if let Some(naga::Binding::Location { location, .. }) = &member.binding {
                            inputs.push((*location, vertex_format(kind, &module.types[member.ty].inner)?));
                        }
                    }
                }
            }
        }
    }

    inputs.sort_by_key(|(location, _)| *location);

    let mut offset = 0;
    let mut attributes = Vec::with_capacity(inputs.len());
    for (location, format) in inputs {
        attributes.push(wgpu::VertexAttribute {
            format,
            offset,
            shader_location: location,
        });
        offset += format.size();
    }

    Ok(VertexLayout {
        stride: offset,
        attributes,
    })
}

fn vertex_format(kind: ShaderKind, inner: &naga::TypeInner) -> Result<wgpu::VertexFormat, RenderError> {
    match *inner {
        naga::TypeInner::Scalar(scalar) if scalar == naga::Scalar::F32 => Ok(wgpu::VertexFormat::Float32),
        naga::TypeInner::Vector { size, scalar } if scalar == naga::Scalar::F32 => Ok(match size {
            naga::VectorSize::Bi => wgpu::VertexFormat::Float32x2,
            naga::VectorSize::Tri => wgpu::VertexFormat::Float32x3,
            naga::VectorSize::Quad => wgpu::VertexFormat::Float32x4,
        }),
        _ => Err(link_error(
            kind,
            "vertex inputs must be f32 or vec2/vec3/vec4<f32>".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOLID: ShaderKind = ShaderKind::AbsolutePositionWithSolidColor;

    fn attr(format: wgpu::VertexFormat, offset: u64, location: u32) -> wgpu::VertexAttribute {
        wgpu::VertexAttribute {
            format,
            offset,
            shader_location: location,
        }
    }

    #[test]
    fn every_builtin_kind_compiles() {
        for kind in ShaderKind::ALL {
            let compiled = CompiledShader::compile(kind)
                .unwrap_or_else(|e| panic!("{kind} should compile: {e}"));
            assert_eq!(compiled.kind(), kind);
        }
    }

    #[test]
    fn solid_color_declares_rgba_color() {
        let compiled = CompiledShader::compile(SOLID).unwrap();
        assert_eq!(
            compiled.uniforms(),
            &[UniformDecl {
                name: "rgba_color".to_string(),
                binding: 0,
                ty: UniformType::Vec4,
            }]
        );
        assert_eq!(
            compiled.vertex_layout(),
            &VertexLayout {
                stride: 12,
                attributes: vec![attr(wgpu::VertexFormat::Float32x3, 0, 0)],
            }
        );
    }

    #[test]
    fn colored_vertex_layout_is_reflected_from_struct_input() {
        let compiled = CompiledShader::compile(ShaderKind::AbsolutePositionWithColoredVertex).unwrap();
        assert!(compiled.uniforms().is_empty());
        assert_eq!(
            compiled.vertex_layout(),
            &VertexLayout {
                stride: 24,
                attributes: vec![
                    attr(wgpu::VertexFormat::Float32x3, 0, 0),
                    attr(wgpu::VertexFormat::Float32x3, 12, 1),
                ],
            }
        );
    }

    #[test]
    fn transform_shader_declares_mat4() {
        let compiled = CompiledShader::compile(ShaderKind::TransformVWithColoredVertex).unwrap();
        assert_eq!(compiled.uniforms().len(), 1);
        assert_eq!(compiled.uniforms()[0].name, "transform");
        assert_eq!(compiled.uniforms()[0].ty, UniformType::Mat4);
    }

    #[test]
    fn syntax_error_reports_kind_and_diagnostic() {
        let err = CompiledShader::compile_source(SOLID, "@vertex fn vs_main( -> {").unwrap_err();
        let RenderError::Compile { kind, diagnostic } = &err else {
            panic!("expected a compile error, got {err:?}");
        };
        assert_eq!(*kind, SOLID);
        assert!(!diagnostic.is_empty());
        assert!(err.to_string().contains("absolute_position_with_solid_color"));
    }

    #[test]
    fn type_error_is_a_compile_error() {
        let src = r#"
@vertex
fn vs_main(@location(0) p: vec3<f32>) -> @builtin(position) vec4<f32> {
    return p;
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0);
}
"#;
        let err = CompiledShader::compile_source(SOLID, src).unwrap_err();
        assert!(matches!(err, RenderError::Compile { .. }), "{err:?}");
    }

    #[test]
    fn scalar_uniform_is_a_link_error() {
        let src = r#"
@group(0) @binding(0) var<uniform> scale: f32;

@vertex
fn vs_main(@location(0) p: vec3<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(p * scale, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0);
}
"#;
        let err = CompiledShader::compile_source(SOLID, src).unwrap_err();
        assert!(matches!(err, RenderError::Link { ref reason, .. } if reason.contains("scale")));
    }

    #[test]
    fn uniform_outside_group_zero_is_a_link_error() {
        let src = r#"
@group(1) @binding(0) var<uniform> tint: vec4<f32>;

@vertex
fn vs_main(@location(0) p: vec3<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(p, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return tint;
}
"#;
        let err = CompiledShader::compile_source(SOLID, src).unwrap_err();
        assert!(matches!(err, RenderError::Link { ref reason, .. } if reason.contains("group 1")));
    }

    #[test]
    fn missing_vertex_entry_is_a_link_error() {
        let src = r#"
@vertex
fn main(@location(0) p: vec3<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(p, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0);
}
"#;
        let err = CompiledShader::compile_source(SOLID, src).unwrap_err();
        assert!(matches!(err, RenderError::Link { ref reason, .. } if reason.contains("vs_main")));
    }

    #[test]
    fn vertex_inputs_are_packed_in_location_order() {
        let src = r#"
@vertex
fn vs_main(@location(1) uv: vec2<f32>, @location(0) p: vec4<f32>, @builtin(vertex_index) i: u32) -> @builtin(position) vec4<f32> {
    return p + vec4<f32>(uv, 0.0, f32(i));
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0);
}
"#;
        let compiled = CompiledShader::compile_source(SOLID, src).unwrap();
        assert_eq!(
            compiled.vertex_layout(),
            &VertexLayout {
                stride: 24,
                attributes: vec![
                    attr(wgpu::VertexFormat::Float32x4, 0, 0),
                    attr(wgpu::VertexFormat::Float32x2, 16, 1),
                ],
            }
        );
    }
}
