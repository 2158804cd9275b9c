//! Growable work buffers with pooled slot reuse.
//!
//! [`WorkBuffer`] is a scratch container for pipelines that churn through
//! many short-lived elements per pass (mesh generation is the motivating
//! case). Popped and removed elements stay parked in their backing slots,
//! so a later pooled append hands the same instance back out instead of
//! allocating a fresh one.

pub mod buffer;
pub mod error;
pub mod stats;

pub use buffer::{WorkBuffer, DEFAULT_GROW_SIZE};
pub use error::{Error, Result};
pub use stats::PoolStats;
