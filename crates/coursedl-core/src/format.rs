//! Target quality selection.

use crate::fetcher::FormatCandidate;

/// Highest resolution (in lines) a download may use.
pub const MAX_HEIGHT: u32 = 720;

/// Picks the tallest video-bearing format not exceeding [`MAX_HEIGHT`].
///
/// Returns `None` when nothing qualifies; callers treat that as terminal for
/// the job rather than a retryable failure.
pub fn select_format(formats: &[FormatCandidate]) -> Option<&str> {
    let mut video: Vec<&FormatCandidate> = formats.iter().filter(|f| f.has_video).collect();
    // Stable sort keeps extractor order among equal heights.
    video.sort_by(|a, b| b.height.cmp(&a.height));
    video
        .into_iter()
        .find(|f| f.height <= MAX_HEIGHT)
        .map(|f| f.format_id.as_str())
}

/// Format expression handed to the fetcher: chosen video plus best audio.
pub fn format_spec(format_id: &str) -> String {
    format!("{}+bestaudio/best", format_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fmt(id: &str, height: u32, has_video: bool) -> FormatCandidate {
        FormatCandidate {
            format_id: id.to_string(),
            height,
            has_video,
        }
    }

    #[test]
    fn picks_best_at_or_below_cap() {
        let formats = vec![
            fmt("137", 1080, true),
            fmt("136", 720, true),
            fmt("135", 480, true),
        ];
        assert_eq!(select_format(&formats), Some("136"));
    }

    #[test]
    fn ignores_audio_only() {
        let formats = vec![fmt("140", 720, false), fmt("134", 360, true)];
        assert_eq!(select_format(&formats), Some("134"));
    }

    #[test]
    fn none_when_only_above_cap_or_empty() {
        assert_eq!(select_format(&[fmt("137", 1080, true)]), None);
        assert_eq!(select_format(&[]), None);
        assert_eq!(select_format(&[fmt("140", 0, false)]), None);
    }

    #[test]
    fn spec_adds_best_audio() {
        assert_eq!(format_spec("136"), "136+bestaudio/best");
    }

    proptest! {
        #[test]
        fn selection_is_max_qualifying_height(
            raw in prop::collection::vec((0u32..2200, any::<bool>()), 0..12)
        ) {
            let formats: Vec<FormatCandidate> = raw
                .iter()
                .enumerate()
                .map(|(i, (h, v))| fmt(&i.to_string(), *h, *v))
                .collect();
            let best = formats
                .iter()
                .filter(|f| f.has_video && f.height <= MAX_HEIGHT)
                .map(|f| f.height)
                .max();
            match select_format(&formats) {
                Some(id) => {
                    let chosen = formats.iter().find(|f| f.format_id == id).unwrap();
                    prop_assert!(chosen.has_video);
                    prop_assert!(chosen.height <= MAX_HEIGHT);
                    prop_assert_eq!(Some(chosen.height), best);
                }
                None => prop_assert!(best.is_none()),
            }
        }
    }
}
