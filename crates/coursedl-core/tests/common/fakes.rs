//! Scripted fetcher, in-memory job source and recording sleeper.
//!
//! The fetcher is scripted per URL: each call to `extract_metadata` consumes
//! the next step for that URL. URLs without a script (or with an exhausted
//! one) succeed with a 720p format titled after the URL's last path segment.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use coursedl_core::fetcher::{DownloadRequest, Fetcher, FormatCandidate, VideoMetadata};
use coursedl_core::job_source::{JobEntry, JobSource, SourcePosition};
use coursedl_core::retry::{FetchError, Sleeper};

#[derive(Debug, Clone)]
pub enum Step {
    /// Metadata and download both succeed.
    Succeed,
    /// Download fails with a transient error.
    Transient,
    /// Metadata lists only formats above 720p.
    TooTall,
    /// Metadata extraction fails in an unclassified way.
    Crash,
}

#[derive(Default)]
struct Script {
    steps: HashMap<String, VecDeque<Step>>,
    pending: HashMap<String, Step>,
    calls: Vec<String>,
    downloads: Vec<DownloadRequest>,
}

#[derive(Clone, Default)]
pub struct ScriptedFetcher {
    inner: Arc<Mutex<Script>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, url: &str, steps: &[Step]) -> &Self {
        self.inner
            .lock()
            .unwrap()
            .steps
            .insert(url.to_string(), steps.iter().cloned().collect());
        self
    }

    /// URLs passed to `extract_metadata`, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn downloads(&self) -> Vec<DownloadRequest> {
        self.inner.lock().unwrap().downloads.clone()
    }
}

fn title_for(url: &str) -> String {
    url.rsplit('/').next().unwrap_or("video").to_string()
}

fn format(id: &str, height: u32) -> FormatCandidate {
    FormatCandidate {
        format_id: id.to_string(),
        height,
        has_video: true,
    }
}

impl Fetcher for ScriptedFetcher {
    fn extract_metadata(&self, url: &str) -> Result<VideoMetadata, FetchError> {
        let mut script = self.inner.lock().unwrap();
        script.calls.push(url.to_string());
        let step = script
            .steps
            .get_mut(url)
            .and_then(|q| q.pop_front())
            .unwrap_or(Step::Succeed);
        let formats = match step {
            Step::Crash => return Err(FetchError::Unexpected(format!("cannot parse {}", url))),
            Step::TooTall => vec![format("137", 1080)],
            Step::Succeed | Step::Transient => vec![format("136", 720), format("135", 480)],
        };
        script.pending.insert(url.to_string(), step);
        Ok(VideoMetadata {
            title: Some(title_for(url)),
            formats,
        })
    }

    fn download(&self, request: &DownloadRequest) -> Result<(), FetchError> {
        let mut script = self.inner.lock().unwrap();
        script.downloads.push(request.clone());
        match script.pending.remove(&request.url) {
            Some(Step::Transient) => Err(FetchError::Transient(format!(
                "HTTP Error 503 for {}",
                request.url
            ))),
            _ => {
                let file = format!(
                    "{}.{}",
                    request.output_stem.display(),
                    request.merge_extension
                );
                std::fs::write(&file, b"video")
                    .map_err(|e| FetchError::Unexpected(e.to_string()))?;
                Ok(())
            }
        }
    }
}

/// Job lists held in memory, keyed by list path; positions are `A2`, `A3`, ...
#[derive(Default)]
pub struct MemorySource {
    lists: Mutex<HashMap<PathBuf, Vec<Option<String>>>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `urls` as rows 2.. of the list at `path`; `None` is a blank cell.
    pub fn set(&self, path: &Path, urls: &[Option<&str>]) {
        self.lists.lock().unwrap().insert(
            path.to_path_buf(),
            urls.iter().map(|u| u.map(str::to_string)).collect(),
        );
    }
}

impl JobSource for MemorySource {
    fn list_jobs(&self, job_list: &Path) -> Result<Vec<JobEntry>> {
        let lists = self.lists.lock().unwrap();
        let rows = lists
            .get(job_list)
            .ok_or_else(|| anyhow::anyhow!("no such job list: {}", job_list.display()))?;
        Ok(rows
            .iter()
            .enumerate()
            .filter_map(|(i, url)| {
                url.as_ref().map(|u| JobEntry {
                    url: u.clone(),
                    position: SourcePosition::new(format!("A{}", i + 2)),
                })
            })
            .collect())
    }

    fn resolve_url(&self, job_list: &Path, position: &SourcePosition) -> Result<Option<String>> {
        let lists = self.lists.lock().unwrap();
        let Some(rows) = lists.get(job_list) else {
            return Ok(None);
        };
        let row: usize = position.as_str().trim_start_matches('A').parse()?;
        Ok(row
            .checked_sub(2)
            .and_then(|i| rows.get(i))
            .cloned()
            .flatten())
    }
}

#[derive(Default)]
pub struct RecordingSleeper(Mutex<Vec<Duration>>);

impl RecordingSleeper {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.0.lock().unwrap().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, d: Duration) {
        self.0.lock().unwrap().push(d);
    }
}
