//! Job lists stored as spreadsheets (first worksheet, `URLs` column).

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::Path;

use super::cell::CellRef;
use super::{JobEntry, JobSource, SourcePosition};

/// Header text of the column holding job URLs.
pub const URL_HEADER: &str = "URLs";

const EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "ods"];

/// True if `path` has a spreadsheet extension this source can read.
pub fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| EXTENSIONS.iter().any(|x| x.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Reads jobs from the first worksheet of a workbook. The first row is the
/// header; the `URLs` column is used (column A-equivalent when absent).
#[derive(Debug, Default, Clone, Copy)]
pub struct SpreadsheetSource;

impl SpreadsheetSource {
    pub fn new() -> Self {
        Self
    }

    fn first_sheet(path: &Path) -> Result<Range<Data>> {
        let mut workbook = open_workbook_auto(path)
            .with_context(|| format!("open workbook: {}", path.display()))?;
        workbook
            .worksheet_range_at(0)
            .ok_or_else(|| anyhow::anyhow!("workbook has no worksheets: {}", path.display()))?
            .with_context(|| format!("read first worksheet: {}", path.display()))
    }
}

fn cell_text(value: &Data) -> Option<String> {
    let text = match value {
        Data::Empty => return None,
        Data::String(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Absolute column of the URL header, or the first column of the range.
fn url_column(range: &Range<Data>) -> u32 {
    let (_, start_col) = range.start().unwrap_or((0, 0));
    range
        .rows()
        .next()
        .and_then(|header| {
            header
                .iter()
                .position(|v| cell_text(v).as_deref() == Some(URL_HEADER))
        })
        .map(|i| start_col + i as u32)
        .unwrap_or(start_col)
}

/// Jobs below the header row, in row order. Blank cells are skipped; each
/// entry keeps the reference of the cell it was read from.
fn entries_from_range(range: &Range<Data>) -> Vec<JobEntry> {
    let Some((start_row, _)) = range.start() else {
        return Vec::new();
    };
    let (end_row, _) = range.end().unwrap_or((start_row, 0));
    let col = url_column(range);

    let mut jobs = Vec::new();
    for row in (start_row + 1)..=end_row {
        let cell = CellRef::new(row, col);
        let Some(url) = value_at(range, cell) else {
            continue;
        };
        if url::Url::parse(&url).is_err() {
            tracing::warn!(cell = %cell, "job list cell is not an absolute URL: {}", url);
        }
        jobs.push(JobEntry {
            url,
            position: SourcePosition::new(cell.to_string()),
        });
    }
    jobs
}

/// Trimmed text of `cell` (absolute sheet coordinates), None when blank or
/// outside the used range.
fn value_at(range: &Range<Data>, cell: CellRef) -> Option<String> {
    range.get_value((cell.row, cell.col)).and_then(cell_text)
}

impl JobSource for SpreadsheetSource {
    fn list_jobs(&self, job_list: &Path) -> Result<Vec<JobEntry>> {
        let range = Self::first_sheet(job_list)?;
        Ok(entries_from_range(&range))
    }

    fn resolve_url(&self, job_list: &Path, position: &SourcePosition) -> Result<Option<String>> {
        let cell = CellRef::parse(position.as_str())?;
        let range = Self::first_sheet(job_list)?;
        Ok(value_at(&range, cell))
    }
}
