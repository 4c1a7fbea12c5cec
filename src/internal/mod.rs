//! Internal implementation details.

pub(crate) mod circular;
pub(crate) mod singleton_build;
pub(crate) mod thread_cache;

pub use circular::ResolutionPanic;
pub(crate) use circular::{raise, run_producer, ResolutionGuard};
