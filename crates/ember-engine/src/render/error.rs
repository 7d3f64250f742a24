use thiserror::Error;

use super::shader::{ShaderKind, UniformType};

/// Errors raised by the shader cache and batchers.
///
/// `Compile` and `Link` are configuration errors surfaced while building a
/// [`ShaderCache`](super::shader::ShaderCache). Everything else is a contract
/// violation by the caller; none of them is retried.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("shader {kind} failed to compile:\n{diagnostic}")]
    Compile { kind: ShaderKind, diagnostic: String },

    #[error("shader {kind} failed to link: {reason}")]
    Link { kind: ShaderKind, reason: String },

    #[error("unknown shader identifier {0}: it was not requested when the cache was built")]
    UnknownShader(ShaderKind),

    #[error("uniform `{name}` is not declared by shader {kind}")]
    UndeclaredUniform { kind: ShaderKind, name: String },

    #[error("uniform `{name}` of shader {kind} is {expected}, got a {actual} value")]
    UniformTypeMismatch {
        kind: ShaderKind,
        name: String,
        expected: UniformType,
        actual: UniformType,
    },

    #[error("vertex layout mismatch for shader {kind}: {detail}")]
    VertexLayoutMismatch { kind: ShaderKind, detail: String },

    #[error("index {index} out of range for a draw request with {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("batch of {vertex_count} vertices and {index_count} indices no longer fits 32-bit counts")]
    IndexOverflow { vertex_count: usize, index_count: usize },

    #[error("shader {kind} was linked for {expected:?} but the target is {actual:?}")]
    TargetFormatMismatch {
        kind: ShaderKind,
        expected: wgpu::TextureFormat,
        actual: wgpu::TextureFormat,
    },
}
