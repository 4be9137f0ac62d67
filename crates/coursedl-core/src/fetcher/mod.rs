//! Fetcher capability: metadata extraction and download of one remote video.
//!
//! The orchestration core only depends on the `Fetcher` trait. `YtDlpFetcher`
//! drives the yt-dlp executable as a subprocess.

mod parse;
mod ytdlp;

use std::path::PathBuf;

use crate::retry::FetchError;

pub use ytdlp::YtDlpFetcher;

/// One downloadable format advertised by the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatCandidate {
    pub format_id: String,
    pub height: u32,
    pub has_video: bool,
}

/// Metadata for one remote video.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoMetadata {
    pub title: Option<String>,
    pub formats: Vec<FormatCandidate>,
}

/// A download to perform once a format has been chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    /// yt-dlp format expression, e.g. `"136+bestaudio/best"`.
    pub format_spec: String,
    /// Output path without extension; the merged container extension is appended.
    pub output_stem: PathBuf,
    /// Container to merge into (e.g. `mp4`).
    pub merge_extension: String,
}

/// Trait implemented by extraction back-ends. Calls block the current thread.
pub trait Fetcher: Send + Sync {
    fn extract_metadata(&self, url: &str) -> Result<VideoMetadata, FetchError>;
    fn download(&self, request: &DownloadRequest) -> Result<(), FetchError>;
}
