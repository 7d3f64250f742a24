use std::fmt;

use crate::coords::ColorRgba;
use crate::render::RenderError;

use super::{ShaderKind, UniformDecl};

/// WGSL types a uniform slot may declare.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UniformType {
    /// `vec4<f32>`, typically an RGBA color.
    Vec4,
    /// `mat4x4<f32>`, column-major.
    Mat4,
}

impl UniformType {
    /// Size of the slot's GPU buffer.
    pub const fn byte_size(self) -> u64 {
        match self {
            UniformType::Vec4 => 16,
            UniformType::Mat4 => 64,
        }
    }
}

impl fmt::Display for UniformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UniformType::Vec4 => "vec4<f32>",
            UniformType::Mat4 => "mat4x4<f32>",
        })
    }
}

/// Value written into a uniform slot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformValue {
    Vec4([f32; 4]),
    /// Columns of a column-major matrix.
    Mat4([[f32; 4]; 4]),
}

impl UniformValue {
    /// All-zero value of type `ty`; what a slot holds before its first set.
    pub const fn zeroed(ty: UniformType) -> Self {
        match ty {
            UniformType::Vec4 => UniformValue::Vec4([0.0; 4]),
            UniformType::Mat4 => UniformValue::Mat4([[0.0; 4]; 4]),
        }
    }

    pub const fn ty(&self) -> UniformType {
        match self {
            UniformValue::Vec4(_) => UniformType::Vec4,
            UniformValue::Mat4(_) => UniformType::Mat4,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            UniformValue::Vec4(v) => bytemuck::bytes_of(v),
            UniformValue::Mat4(m) => bytemuck::bytes_of(m),
        }
    }
}

impl From<[f32; 4]> for UniformValue {
    fn from(v: [f32; 4]) -> Self {
        UniformValue::Vec4(v)
    }
}

impl From<ColorRgba> for UniformValue {
    fn from(c: ColorRgba) -> Self {
        UniformValue::Vec4(c.to_array())
    }
}

impl From<[[f32; 4]; 4]> for UniformValue {
    fn from(m: [[f32; 4]; 4]) -> Self {
        UniformValue::Mat4(m)
    }
}

/// Finds the slot `name` in `decls` and checks that `value` fits it.
///
/// Returns the slot's position in `decls`.
pub(super) fn resolve_slot(
    kind: ShaderKind,
    decls: &[UniformDecl],
    name: &str,
    value: &UniformValue,
) -> Result<usize, RenderError> {
    let (slot, decl) = decls
        .iter()
        .enumerate()
        .find(|(_, d)| d.name == name)
        .ok_or_else(|| RenderError::UndeclaredUniform {
            kind,
            name: name.to_string(),
        })?;

    if decl.ty != value.ty() {
        return Err(RenderError::UniformTypeMismatch {
            kind,
            name: name.to_string(),
            expected: decl.ty,
            actual: value.ty(),
        });
    }

    Ok(slot)
}
