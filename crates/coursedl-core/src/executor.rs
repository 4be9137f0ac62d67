//! Performs one job: extract metadata, select a format, download with retry.

use std::path::Path;
use std::sync::Arc;

use crate::config::CourseConfig;
use crate::fetcher::{DownloadRequest, Fetcher};
use crate::format::{format_spec, select_format};
use crate::job::{Job, JobOutcome, OutcomeStatus};
use crate::naming::{normalize_title, FALLBACK_TITLE};
use crate::retry::{run_with_retry, RetryError, RetryPolicy, Sleeper, ThreadSleeper};

/// Anything that can turn a job into an outcome. The dispatch controller and
/// the reconciler only see this trait, so tests can script outcomes.
pub trait JobRunner: Send + Sync {
    /// Never fails: every problem is folded into the returned outcome.
    fn run(&self, job: &Job, target_dir: &Path) -> JobOutcome;
}

enum AttemptResult {
    Downloaded,
    NoFormat,
}

/// yt-dlp style executor over a [`Fetcher`].
pub struct JobExecutor<F> {
    fetcher: F,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
    output_extension: String,
}

impl<F: Fetcher> JobExecutor<F> {
    pub fn new(fetcher: F, policy: RetryPolicy) -> Self {
        Self {
            fetcher,
            policy,
            sleeper: Arc::new(ThreadSleeper),
            output_extension: "mp4".to_string(),
        }
    }

    pub fn from_config(fetcher: F, cfg: &CourseConfig) -> Self {
        Self::new(fetcher, cfg.retry_policy()).with_output_extension(&cfg.output_extension)
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn with_output_extension(mut self, ext: &str) -> Self {
        self.output_extension = ext.trim_start_matches('.').to_string();
        self
    }

    pub fn execute(&self, job: &Job, target_dir: &Path) -> JobOutcome {
        let mut label = normalize_title(FALLBACK_TITLE, job.ordinal);

        let result = run_with_retry(&self.policy, self.sleeper.as_ref(), |attempt| {
            tracing::debug!(ordinal = job.ordinal, attempt, url = %job.url, "extracting metadata");
            let meta = self.fetcher.extract_metadata(&job.url)?;
            label = normalize_title(meta.title.as_deref().unwrap_or(FALLBACK_TITLE), job.ordinal);

            let Some(format_id) = select_format(&meta.formats) else {
                return Ok(AttemptResult::NoFormat);
            };
            let request = DownloadRequest {
                url: job.url.clone(),
                format_spec: format_spec(format_id),
                output_stem: target_dir.join(&label),
                merge_extension: self.output_extension.clone(),
            };
            self.fetcher.download(&request)?;
            Ok(AttemptResult::Downloaded)
        });

        let status = match result {
            Ok((AttemptResult::Downloaded, attempt)) => {
                tracing::info!(ordinal = job.ordinal, attempt, "downloaded {}", label);
                OutcomeStatus::Succeeded { attempt }
            }
            Ok((AttemptResult::NoFormat, _)) => {
                tracing::warn!(ordinal = job.ordinal, "no format at or below 720p for {}", label);
                OutcomeStatus::NoSuitableFormat
            }
            Err(RetryError::Exhausted { attempts, last }) => {
                tracing::warn!(ordinal = job.ordinal, attempts, error = %last, "giving up on {}", label);
                OutcomeStatus::FailedAfterRetries { attempts }
            }
            Err(RetryError::Fatal { attempt, error }) => {
                tracing::error!(ordinal = job.ordinal, attempt, error = %error, "unexpected error for {}", label);
                OutcomeStatus::UnexpectedError {
                    message: error.message().to_string(),
                }
            }
        };

        JobOutcome {
            ordinal: job.ordinal,
            label,
            source_position: job.source_position.clone(),
            status,
        }
    }
}

impl<F: Fetcher> JobRunner for JobExecutor<F> {
    fn run(&self, job: &Job, target_dir: &Path) -> JobOutcome {
        self.execute(job, target_dir)
    }
}
