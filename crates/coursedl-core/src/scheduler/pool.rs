//! Bounded worker pool for blocking job execution.
//!
//! Each submission holds one permit for as long as its job runs on the
//! blocking thread pool, so at most `capacity` jobs execute at once.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::executor::JobRunner;
use crate::job::{Job, JobOutcome};

#[derive(Debug, Clone)]
pub struct WorkerPool {
    capacity: usize,
    permits: Arc<Semaphore>,
}

impl WorkerPool {
    /// Create a pool with the given capacity (at least 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            permits: Arc::new(Semaphore::new(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Run `job` on a pool worker and wait for its outcome.
    pub async fn submit(
        &self,
        runner: Arc<dyn JobRunner>,
        job: Job,
        target_dir: PathBuf,
    ) -> Result<JobOutcome> {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .context("worker pool closed")?;
        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            runner.run(&job, &target_dir)
        })
        .await
        .map_err(|e| anyhow::anyhow!("job task join: {}", e))
    }
}

/// Run `job` on a blocking thread without taking a pool slot.
pub(super) async fn run_direct(
    runner: Arc<dyn JobRunner>,
    job: Job,
    target_dir: PathBuf,
) -> Result<JobOutcome> {
    tokio::task::spawn_blocking(move || runner.run(&job, &target_dir))
        .await
        .map_err(|e| anyhow::anyhow!("job task join: {}", e))
}
