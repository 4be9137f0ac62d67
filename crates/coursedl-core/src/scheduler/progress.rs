//! Progress events for a module run.
//!
//! One event is emitted per processed ordinal, including failed ones and the
//! one that triggered an abort.

use super::mode::ExecutionMode;

/// Snapshot after one ordinal was processed (CLI-friendly).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunProgress {
    pub module: String,
    pub ordinal: u32,
    /// Ordinals processed so far in this run.
    pub processed: usize,
    /// Jobs in the module's list.
    pub total: usize,
    /// Mode the ordinal was dispatched in.
    pub mode: ExecutionMode,
    pub succeeded: bool,
}
