//! Ordinal-prefixed display labels for jobs.
//!
//! A label looks like `Aula 07 - Some Title`; it names the output file and
//! identifies the job in ledgers, so the embedded ordinal must survive a
//! round-trip through the persisted text.

use regex::Regex;
use std::sync::OnceLock;

/// Title used when the extractor reports none (or nothing survives cleaning).
pub const FALLBACK_TITLE: &str = "Video";

fn disallowed_chars() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^\w\s-]").expect("static pattern"))
}

fn whitespace_run() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+").expect("static pattern"))
}

fn ordinal_marker() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\bAula \d+\b").expect("static pattern"))
}

fn label_ordinal() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"Aula (\d+)").expect("static pattern"))
}

fn generated_prefix() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^Aula \d{2,} - ").expect("static pattern"))
}

fn first_number() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d+").expect("static pattern"))
}

fn collapse(s: &str) -> String {
    whitespace_run()
        .replace_all(s, " ")
        .trim_matches(|c: char| c.is_whitespace() || c == '-')
        .to_string()
}

/// Builds the label for `ordinal` (1-based) from a raw extractor title.
///
/// Punctuation outside word/space/hyphen is dropped, whitespace collapsed,
/// and any existing `Aula <n>` marker removed before the two-digit prefix is
/// added. Leading and trailing hyphens are trimmed as well, so `Aula 5 - Funções`
/// becomes `Aula 05 - Funções`; a title left empty becomes [`FALLBACK_TITLE`].
pub fn normalize_title(raw: &str, ordinal: u32) -> String {
    let mut title = collapse(&disallowed_chars().replace_all(raw, ""));
    loop {
        let next = collapse(&ordinal_marker().replace_all(&title, ""));
        if next == title {
            break;
        }
        title = next;
    }
    if title.is_empty() {
        title = FALLBACK_TITLE.to_string();
    }
    format!("Aula {:02} - {}", ordinal, title)
}

/// Removes the generated `Aula NN - ` prefix, if present.
pub fn strip_ordinal_prefix(label: &str) -> &str {
    match generated_prefix().find(label) {
        Some(m) => &label[m.end()..],
        None => label,
    }
}

/// Ordinal embedded in a label (`Aula <n>`), if any.
pub fn ordinal_from_label(label: &str) -> Option<u32> {
    label_ordinal()
        .captures(label)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// First run of digits in `s`; used for numeric ordering of labels and file names.
pub fn leading_number(s: &str) -> Option<u64> {
    first_number().find(s).and_then(|m| m.as_str().parse().ok())
}

/// Sort key placing strings without a number last.
pub fn numeric_sort_key(s: &str) -> u64 {
    leading_number(s).unwrap_or(u64::MAX)
}
