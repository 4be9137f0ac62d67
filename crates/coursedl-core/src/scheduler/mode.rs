//! Execution mode state machine.

use std::fmt;

/// How the next job is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Submitted to the worker pool.
    #[default]
    Parallel,
    /// Executed directly, bypassing the pool.
    Sequential,
}

/// What the controller does after an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Process the next ordinal in the given mode.
    Continue(ExecutionMode),
    /// Stop; remaining ordinals stay unprocessed.
    Abort,
}

impl ExecutionMode {
    pub fn after(self, succeeded: bool) -> Transition {
        match (self, succeeded) {
            (_, true) => Transition::Continue(ExecutionMode::Parallel),
            (ExecutionMode::Parallel, false) => Transition::Continue(ExecutionMode::Sequential),
            (ExecutionMode::Sequential, false) => Transition::Abort,
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Parallel => f.write_str("parallel"),
            ExecutionMode::Sequential => f.write_str("sequential"),
        }
    }
}
