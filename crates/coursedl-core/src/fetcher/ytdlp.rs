//! Fetcher backed by the yt-dlp executable.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use super::parse::parse_info_json;
use super::{DownloadRequest, Fetcher, VideoMetadata};
use crate::config::CourseConfig;
use crate::retry::FetchError;

/// Runs yt-dlp as a subprocess for extraction and download.
#[derive(Debug, Clone)]
pub struct YtDlpFetcher {
    binary: PathBuf,
    ffmpeg_location: Option<PathBuf>,
    concurrent_fragments: u32,
}

impl YtDlpFetcher {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            ffmpeg_location: None,
            concurrent_fragments: 1,
        }
    }

    pub fn from_config(cfg: &CourseConfig) -> Self {
        Self {
            binary: cfg.ytdlp_location.clone(),
            ffmpeg_location: cfg.ffmpeg_location.clone(),
            concurrent_fragments: cfg.concurrent_fragments.max(1),
        }
    }

    fn base_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["--no-warnings".into(), "--no-playlist".into()];
        if let Some(ffmpeg) = &self.ffmpeg_location {
            args.push("--ffmpeg-location".into());
            args.push(ffmpeg.clone().into_os_string());
        }
        args
    }

    pub(crate) fn download_args(&self, request: &DownloadRequest) -> Vec<OsString> {
        let mut template = request.output_stem.clone().into_os_string();
        template.push(".%(ext)s");

        let mut args = self.base_args();
        args.extend([
            "-f".into(),
            request.format_spec.clone().into(),
            "--merge-output-format".into(),
            request.merge_extension.clone().into(),
            "--concurrent-fragments".into(),
            self.concurrent_fragments.to_string().into(),
            "-o".into(),
            template,
            request.url.clone().into(),
        ]);
        args
    }

    fn run(&self, args: Vec<OsString>) -> Result<Output, FetchError> {
        let output = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                FetchError::Unexpected(format!("spawn {}: {}", self.binary.display(), e))
            })?;
        if output.status.success() {
            Ok(output)
        } else {
            Err(FetchError::Transient(error_summary(&output)))
        }
    }
}

/// Last `ERROR:` line of stderr, or the last non-empty line, or the exit status.
fn error_summary(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let lines: Vec<&str> = stderr.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    lines
        .iter()
        .rev()
        .find(|l| l.starts_with("ERROR"))
        .or_else(|| lines.last())
        .map(|l| l.to_string())
        .unwrap_or_else(|| format!("yt-dlp exited with {}", output.status))
}

impl Fetcher for YtDlpFetcher {
    fn extract_metadata(&self, url: &str) -> Result<VideoMetadata, FetchError> {
        let mut args = self.base_args();
        args.push("--dump-single-json".into());
        args.push(url.into());
        let output = self.run(args)?;
        parse_info_json(&String::from_utf8_lossy(&output.stdout))
    }

    fn download(&self, request: &DownloadRequest) -> Result<(), FetchError> {
        tracing::debug!(url = %request.url, format = %request.format_spec, "yt-dlp download");
        self.run(self.download_args(request)).map(|_| ())
    }
}
