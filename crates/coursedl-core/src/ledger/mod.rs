//! Outcome ledger: per-module record of a run, persisted as plain text.
//!
//! The text file is the only contract between a download run and a later
//! reconciliation pass. Its file name signals the module status and its body
//! carries the missing entries together with the originating job list path.

mod parse;
mod render;

use anyhow::{ensure, Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::job::JobOutcome;
use crate::job_source::SourcePosition;
use crate::naming::numeric_sort_key;

pub use parse::{load_missing_ledger, parse_ledger, LedgerParseError, ParsedLedger};

/// Ledger file name when every job of the module succeeded.
pub const COMPLETE_FILE_NAME: &str = "Download Concluido.txt";
/// Ledger file name when at least one job is missing.
pub const MISSING_FILE_NAME: &str = "Aulas Faltando.txt";
/// Verification report written by the reconciler.
pub const VERIFICATION_FILE_NAME: &str = "Verificacao.txt";

/// Status a ledger file name encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerStatus {
    Complete,
    MissingEntries,
}

impl LedgerStatus {
    pub fn file_name(self) -> &'static str {
        match self {
            LedgerStatus::Complete => COMPLETE_FILE_NAME,
            LedgerStatus::MissingEntries => MISSING_FILE_NAME,
        }
    }

    fn other(self) -> Self {
        match self {
            LedgerStatus::Complete => LedgerStatus::MissingEntries,
            LedgerStatus::MissingEntries => LedgerStatus::Complete,
        }
    }
}

/// A job that did not succeed, as listed in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MissingEntry {
    pub label: String,
    /// None when the position could not be recovered; such entries are listed
    /// but never looked up again.
    pub source_position: Option<SourcePosition>,
}

/// Outcomes of one module run, in processing order.
#[derive(Debug, Clone)]
pub struct ModuleLedger {
    pub module_name: String,
    pub download_dir: PathBuf,
    pub total_jobs: usize,
    pub source_path: PathBuf,
    outcomes: Vec<JobOutcome>,
}

impl ModuleLedger {
    pub fn new(
        module_name: impl Into<String>,
        download_dir: impl Into<PathBuf>,
        total_jobs: usize,
        source_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            module_name: module_name.into(),
            download_dir: download_dir.into(),
            total_jobs,
            source_path: source_path.into(),
            outcomes: Vec::new(),
        }
    }

    /// Appends the outcome of the next ordinal. Outcomes must arrive as
    /// ordinals `1, 2, 3, ...` and never exceed `total_jobs`.
    pub fn push(&mut self, outcome: JobOutcome) -> Result<()> {
        ensure!(
            self.outcomes.len() < self.total_jobs,
            "ledger for {} already holds {} outcomes",
            self.module_name,
            self.total_jobs
        );
        let expected = self.outcomes.len() as u32 + 1;
        ensure!(
            outcome.ordinal == expected,
            "out-of-order outcome: got ordinal {}, expected {}",
            outcome.ordinal,
            expected
        );
        self.outcomes.push(outcome);
        Ok(())
    }

    pub fn outcomes(&self) -> &[JobOutcome] {
        &self.outcomes
    }

    pub fn succeeded_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Non-successful outcomes, deduplicated by (label, position) and sorted
    /// by the ordinal embedded in the label.
    pub fn missing_entries(&self) -> Vec<MissingEntry> {
        let mut seen = HashSet::new();
        let mut missing: Vec<MissingEntry> = self
            .outcomes
            .iter()
            .filter(|o| !o.is_success())
            .map(|o| MissingEntry {
                label: o.label.clone(),
                source_position: o.source_position.clone(),
            })
            .filter(|e| seen.insert(e.clone()))
            .collect();
        missing.sort_by_key(|e| numeric_sort_key(&e.label));
        missing
    }

    pub fn status(&self) -> LedgerStatus {
        if self.outcomes.iter().all(|o| o.is_success()) {
            LedgerStatus::Complete
        } else {
            LedgerStatus::MissingEntries
        }
    }

    pub fn file_name(&self) -> &'static str {
        self.status().file_name()
    }

    /// Renders the ledger text.
    pub fn render(&self) -> String {
        render::render_ledger(self)
    }

    /// Writes the ledger into `download_dir` and removes a stale ledger of the
    /// other status left by an earlier run. Returns the written path.
    pub fn write(&self) -> Result<PathBuf> {
        self.write_to(&self.download_dir)
    }

    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir).with_context(|| format!("create dir: {}", dir.display()))?;
        let status = self.status();
        let path = dir.join(status.file_name());
        std::fs::write(&path, self.render())
            .with_context(|| format!("write ledger: {}", path.display()))?;

        let stale = dir.join(status.other().file_name());
        if stale.exists() {
            std::fs::remove_file(&stale)
                .with_context(|| format!("remove stale ledger: {}", stale.display()))?;
            tracing::debug!(path = %stale.display(), "removed stale ledger");
        }
        tracing::info!(module = %self.module_name, path = %path.display(), "ledger written");
        Ok(path)
    }
}
