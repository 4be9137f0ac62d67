//! JobSource capability: ordered job lists with positional locators.
//!
//! A locator (`SourcePosition`) points back at the place a URL came from so a
//! later reconciliation pass can re-read just that entry.

mod cell;
mod spreadsheet;

use anyhow::Result;
use std::fmt;
use std::path::Path;

pub use cell::CellRef;
pub use spreadsheet::{is_spreadsheet, SpreadsheetSource};

/// Opaque locator into a job list (for spreadsheets, an A1 cell reference).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourcePosition(String);

impl SourcePosition {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of a job list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobEntry {
    pub url: String,
    pub position: SourcePosition,
}

/// Trait implemented by job list readers.
pub trait JobSource: Send + Sync {
    /// All jobs of the list at `job_list`, in list order.
    fn list_jobs(&self, job_list: &Path) -> Result<Vec<JobEntry>>;

    /// Current URL at `position`, or None if that entry is blank.
    fn resolve_url(&self, job_list: &Path, position: &SourcePosition) -> Result<Option<String>>;
}
