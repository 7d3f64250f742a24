//! GPU rendering subsystem.
//!
//! - [`shader`]: compiled + linked programs keyed by [`shader::ShaderKind`],
//!   owned by a [`shader::ShaderCache`] that also scopes uniform writes.
//! - [`batcher`]: per-shader staging of draw requests, flushed as one indexed
//!   draw call per shader kind.
//!
//! Convention: vertex positions arrive in clip space; the only screen-space
//! input is the viewport carried by [`RenderCtx`].

mod ctx;
mod error;
mod upload;

pub mod batcher;
pub mod shader;

pub use ctx::{RenderCtx, RenderTarget};
pub use error::RenderError;
