//! Runtime for batches of binding headers.

pub mod executor;
pub mod scheduler;

pub use executor::{RunSummary, Runtime, RuntimeConfig};
pub use scheduler::{PriorityScheduler, WorkItem};
