//! Parse yt-dlp `--dump-single-json` output into VideoMetadata.

use serde::Deserialize;

use super::{FormatCandidate, VideoMetadata};
use crate::retry::FetchError;

#[derive(Debug, Deserialize)]
struct RawInfo {
    title: Option<String>,
    #[serde(default)]
    formats: Vec<RawFormat>,
}

#[derive(Debug, Deserialize)]
struct RawFormat {
    format_id: Option<String>,
    height: Option<f64>,
    vcodec: Option<String>,
}

/// Parse the JSON document; formats without id or height are dropped.
pub(crate) fn parse_info_json(json: &str) -> Result<VideoMetadata, FetchError> {
    let raw: RawInfo = serde_json::from_str(json)
        .map_err(|e| FetchError::Unexpected(format!("invalid yt-dlp JSON: {}", e)))?;

    let formats = raw
        .formats
        .into_iter()
        .filter_map(|f| {
            let format_id = f.format_id?;
            let height = f.height.filter(|h| *h >= 0.0)?.round() as u32;
            Some(FormatCandidate {
                format_id,
                height,
                has_video: f.vcodec.as_deref() != Some("none"),
            })
        })
        .collect();

    Ok(VideoMetadata {
        title: raw.title,
        formats,
    })
}
