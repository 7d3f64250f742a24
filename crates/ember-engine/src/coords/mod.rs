//! Small value types shared by the device layer and renderers.
//!
//! Geometry handed to batchers is already in clip space; the only screen-space
//! quantity is the [`Viewport`], which is passed explicitly per frame.

mod color;
mod viewport;

pub use color::ColorRgba;
pub use viewport::Viewport;
