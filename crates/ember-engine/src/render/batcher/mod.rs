//! Draw batching.
//!
//! Each [`Batcher`] is bound to one shader kind and accumulates draw requests
//! (local indices + vertices) in CPU staging buffers. A flush uploads the
//! combined data and issues exactly one indexed draw call, so N requests per
//! frame cost one GPU draw per shader kind.
//!
//! State per batcher: empty until `queue_draw`, accumulating until
//! `draw_everything`, then empty again.

mod aggregate;
mod buffer;
mod staging;
mod typed;
mod vertex;

pub use aggregate::Batchers;
pub use staging::StagingBuffer;
pub use typed::{Batcher, FlushStats};
pub use vertex::{ColoredVertex, PositionVertex, ShaderVertex};
