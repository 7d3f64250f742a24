//! Ember engine crate.
//!
//! Owns the GPU-side pieces used by applications: a shader cache keyed by
//! [`render::shader::ShaderKind`], per-shader draw batchers, and the device
//! and logging plumbing they run on.

pub mod coords;
pub mod device;
pub mod logging;
pub mod render;
