//! Jobs and their per-job outcomes.

use crate::job_source::SourcePosition;

/// One remote video to acquire, immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// 1-based position within the module's job list.
    pub ordinal: u32,
    pub url: String,
    pub source_position: Option<SourcePosition>,
}

/// Terminal status of one processed job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    Succeeded { attempt: u32 },
    NoSuitableFormat,
    FailedAfterRetries { attempts: u32 },
    UnexpectedError { message: String },
}

/// Result of processing one job, as recorded in the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    pub ordinal: u32,
    /// Ordinal-prefixed title, e.g. `Aula 03 - Intro`.
    pub label: String,
    pub source_position: Option<SourcePosition>,
    pub status: OutcomeStatus,
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.status, OutcomeStatus::Succeeded { .. })
    }

    /// Attempt number for successful outcomes.
    pub fn succeeded_attempt(&self) -> Option<u32> {
        match self.status {
            OutcomeStatus::Succeeded { attempt } => Some(attempt),
            _ => None,
        }
    }
}
