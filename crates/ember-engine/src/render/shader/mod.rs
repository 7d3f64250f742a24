//! Shader programs and the cache that owns them.
//!
//! A program goes through two stages:
//! - [`CompiledShader`]: WGSL parsed and validated by naga on the CPU, with
//!   uniforms and vertex inputs reflected from the module.
//! - [`ShaderProgram`]: the compiled shader linked into a wgpu render pipeline,
//!   plus one GPU buffer per declared uniform.
//!
//! [`ShaderCache`] holds at most one program per [`ShaderKind`].

mod cache;
mod compile;
mod kind;
mod program;
mod uniform;

pub use cache::ShaderCache;
pub use compile::{CompiledShader, UniformDecl, VertexLayout};
pub use kind::ShaderKind;
pub use program::ShaderProgram;
pub use uniform::{UniformType, UniformValue};
