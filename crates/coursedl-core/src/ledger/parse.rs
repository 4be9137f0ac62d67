//! Parse a persisted ledger back into its missing entries and job list path.

use std::path::{Path, PathBuf};

use super::render::{
    DIRECTORY_PREFIX, ENTRY_PREFIX, MISSING_HEADER_PREFIX, MODULE_PREFIX, POSITION_SEPARATOR,
    SECTION_RULE, SOURCE_PREFIX, UNKNOWN_POSITION,
};
use super::MissingEntry;
use crate::job_source::SourcePosition;

/// Why a ledger could not be used for reconciliation.
#[derive(Debug, thiserror::Error)]
pub enum LedgerParseError {
    #[error("read ledger {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("ledger has no job list path")]
    MissingSourcePath,
    #[error("job list not found: {0}")]
    SourceNotFound(PathBuf),
}

/// Fields recovered from a ledger file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLedger {
    pub module_name: Option<String>,
    /// Informational: reconciliation uses the directory holding the ledger file.
    pub download_dir: Option<PathBuf>,
    pub missing: Vec<MissingEntry>,
    pub source_path: PathBuf,
}

#[derive(PartialEq, Eq)]
enum Section {
    Header,
    Missing,
    Other,
}

fn missing_entry(line: &str) -> Option<MissingEntry> {
    let body = line.strip_prefix(ENTRY_PREFIX)?;
    let (label, position) = body.rsplit_once(POSITION_SEPARATOR)?;
    let label = label.trim();
    if label.is_empty() {
        return None;
    }
    let position = position.trim();
    let source_position = if position.is_empty() || position == UNKNOWN_POSITION {
        None
    } else {
        Some(SourcePosition::new(position))
    };
    Some(MissingEntry {
        label: label.to_string(),
        source_position,
    })
}

/// Parse ledger text. Only the absence of a job list path is an error;
/// unrecognized lines are ignored.
pub fn parse_ledger(text: &str) -> Result<ParsedLedger, LedgerParseError> {
    let mut module_name = None;
    let mut download_dir = None;
    let mut source_path = None;
    let mut missing = Vec::new();
    let mut section = Section::Header;

    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        if let Some(v) = line.strip_prefix(MODULE_PREFIX) {
            module_name = Some(v.trim().to_string()).filter(|s| !s.is_empty());
        } else if let Some(v) = line.strip_prefix(DIRECTORY_PREFIX) {
            download_dir = Some(PathBuf::from(v.trim())).filter(|p| !p.as_os_str().is_empty());
        } else if let Some(v) = line.strip_prefix(SOURCE_PREFIX) {
            source_path = Some(PathBuf::from(v.trim())).filter(|p| !p.as_os_str().is_empty());
        } else if line.starts_with(MISSING_HEADER_PREFIX) {
            section = Section::Missing;
        } else if line == SECTION_RULE {
            section = Section::Other;
        } else if section == Section::Missing {
            if let Some(entry) = missing_entry(line) {
                missing.push(entry);
            }
        }
    }

    Ok(ParsedLedger {
        module_name,
        download_dir,
        missing,
        source_path: source_path.ok_or(LedgerParseError::MissingSourcePath)?,
    })
}

/// Read and parse a ledger file, requiring its job list to still exist.
pub fn load_missing_ledger(path: &Path) -> Result<ParsedLedger, LedgerParseError> {
    let text = std::fs::read_to_string(path).map_err(|source| LedgerParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed = parse_ledger(&text)?;
    if !parsed.source_path.exists() {
        return Err(LedgerParseError::SourceNotFound(parsed.source_path));
    }
    Ok(parsed)
}
