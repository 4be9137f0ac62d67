use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::retry::RetryPolicy;

/// File name of the per-run config, placed in the base download directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Upper bound for the derived worker pool capacity.
const MAX_DEFAULT_CONCURRENCY: usize = 8;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per job (including the first).
    pub max_attempts: u32,
    /// Fixed delay in seconds between attempts.
    pub backoff_secs: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_secs: 2.0,
        }
    }
}

/// Run configuration loaded from `<base_dir>/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseConfig {
    /// yt-dlp executable (name on PATH or absolute path).
    pub ytdlp_location: PathBuf,
    /// ffmpeg used by yt-dlp to merge video and audio. None = let yt-dlp find it.
    #[serde(default)]
    pub ffmpeg_location: Option<PathBuf>,
    /// Container extension for merged downloads.
    #[serde(default = "default_output_extension")]
    pub output_extension: String,
    /// Fragments fetched concurrently by yt-dlp within one download.
    #[serde(default = "default_concurrent_fragments")]
    pub concurrent_fragments: u32,
    /// Worker pool capacity. None = derived from available parallelism.
    #[serde(default)]
    pub max_concurrency: Option<usize>,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

fn default_output_extension() -> String {
    "mp4".to_string()
}

fn default_concurrent_fragments() -> u32 {
    5
}

impl Default for CourseConfig {
    fn default() -> Self {
        Self {
            ytdlp_location: PathBuf::from("yt-dlp"),
            ffmpeg_location: None,
            output_extension: default_output_extension(),
            concurrent_fragments: default_concurrent_fragments(),
            max_concurrency: None,
            retry: None,
        }
    }
}

impl CourseConfig {
    /// Worker pool capacity: configured value, else `min(8, cpus + 4)`.
    pub fn worker_capacity(&self) -> usize {
        match self.max_concurrency {
            Some(n) => n.max(1),
            None => {
                let cpus = std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1);
                (cpus + 4).min(MAX_DEFAULT_CONCURRENCY)
            }
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        match &self.retry {
            Some(r) => RetryPolicy {
                max_attempts: r.max_attempts.max(1),
                backoff: Duration::from_secs_f64(r.backoff_secs.max(0.0)),
            },
            None => RetryPolicy::default(),
        }
    }
}

pub fn config_path(base_dir: &Path) -> PathBuf {
    base_dir.join(CONFIG_FILE_NAME)
}

/// Load configuration from `base_dir`, creating a default file if none exists.
pub fn load_or_init(base_dir: &Path) -> Result<CourseConfig> {
    let path = config_path(base_dir);
    if !path.exists() {
        let default_cfg = CourseConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        fs::create_dir_all(base_dir)
            .with_context(|| format!("create dir: {}", base_dir.display()))?;
        fs::write(&path, toml).with_context(|| format!("write config: {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data =
        fs::read_to_string(&path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: CourseConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}
