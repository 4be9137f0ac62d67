//! Adaptive dispatch of a module's job list.
//!
//! Jobs run one ordinal at a time. While every job succeeds they go through a
//! bounded worker pool; a failure switches the next job to serialized
//! execution, and a second consecutive failure aborts the run.

mod mode;
mod pool;
mod progress;
mod run;

pub use mode::{ExecutionMode, Transition};
pub use pool::WorkerPool;
pub use progress::RunProgress;
pub use run::{DispatchController, RunSummary};
