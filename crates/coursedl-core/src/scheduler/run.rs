//! Drive a job list through the execution mode state machine.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc::Sender;

use super::mode::{ExecutionMode, Transition};
use super::pool::{run_direct, WorkerPool};
use super::progress::RunProgress;
use crate::executor::JobRunner;
use crate::job::{Job, JobOutcome, OutcomeStatus};
use crate::ledger::ModuleLedger;
use crate::naming::{normalize_title, FALLBACK_TITLE};

/// Per-run trace of dispatch decisions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Mode each processed ordinal was dispatched in, in ordinal order.
    pub modes: Vec<ExecutionMode>,
    /// Ordinal whose failure stopped the run.
    pub aborted_at: Option<u32>,
}

impl RunSummary {
    pub fn processed(&self) -> usize {
        self.modes.len()
    }

    pub fn aborted(&self) -> bool {
        self.aborted_at.is_some()
    }
}

/// Dispatches one module's jobs, one ordinal at a time.
///
/// In `Parallel` mode a job goes through the worker pool; the controller
/// still waits for its outcome before moving on, so a single job is in
/// flight at any instant and outcomes land in ordinal order.
pub struct DispatchController {
    runner: Arc<dyn JobRunner>,
    pool: WorkerPool,
}

impl DispatchController {
    pub fn new(runner: Arc<dyn JobRunner>, capacity: usize) -> Self {
        Self {
            runner,
            pool: WorkerPool::new(capacity),
        }
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Processes `jobs` (ordinals `1..`) into `ledger` until the list is
    /// exhausted or a `Sequential` job fails.
    pub async fn run(
        &self,
        ledger: &mut ModuleLedger,
        jobs: &[Job],
        progress: Option<&Sender<RunProgress>>,
    ) -> Result<RunSummary> {
        let mut mode = ExecutionMode::Parallel;
        let mut summary = RunSummary::default();
        let target_dir = ledger.download_dir.clone();

        for job in jobs {
            tracing::debug!(module = %ledger.module_name, ordinal = job.ordinal, %mode, "dispatching");
            let runner = Arc::clone(&self.runner);
            let dispatched = match mode {
                ExecutionMode::Parallel => {
                    self.pool.submit(runner, job.clone(), target_dir.clone()).await
                }
                ExecutionMode::Sequential => {
                    run_direct(runner, job.clone(), target_dir.clone()).await
                }
            };
            let outcome = dispatched.unwrap_or_else(|e| {
                tracing::error!(ordinal = job.ordinal, "job task failed: {:#}", e);
                JobOutcome {
                    ordinal: job.ordinal,
                    label: normalize_title(FALLBACK_TITLE, job.ordinal),
                    source_position: job.source_position.clone(),
                    status: OutcomeStatus::UnexpectedError {
                        message: format!("{:#}", e),
                    },
                }
            });
            let succeeded = outcome.is_success();

            summary.modes.push(mode);
            ledger.push(outcome)?;
            if let Some(tx) = progress {
                let _ = tx
                    .send(RunProgress {
                        module: ledger.module_name.clone(),
                        ordinal: job.ordinal,
                        processed: summary.processed(),
                        total: ledger.total_jobs,
                        mode,
                        succeeded,
                    })
                    .await;
            }

            match mode.after(succeeded) {
                Transition::Continue(next) => {
                    if next != mode {
                        tracing::info!(
                            module = %ledger.module_name,
                            ordinal = job.ordinal,
                            "switching from {} to {} dispatch",
                            mode,
                            next
                        );
                    }
                    mode = next;
                }
                Transition::Abort => {
                    tracing::warn!(
                        module = %ledger.module_name,
                        ordinal = job.ordinal,
                        "sequential retry failed; aborting run"
                    );
                    summary.aborted_at = Some(job.ordinal);
                    break;
                }
            }
        }

        Ok(summary)
    }
}
