//! Reconciliation: retry previously missing jobs and promote complete modules.
//!
//! Each "missing entries" ledger under a root is parsed, every entry with a
//! known position is re-resolved through the job source and handed to the
//! job runner again. A verification report is written per module; when every
//! entry verifies, the ledger is renamed to the "complete" name.

mod discover;
mod report;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::executor::JobRunner;
use crate::job::Job;
use crate::job_source::JobSource;
use crate::ledger::{load_missing_ledger, MissingEntry, COMPLETE_FILE_NAME, VERIFICATION_FILE_NAME};
use crate::naming::ordinal_from_label;

pub use discover::find_missing_ledgers;
pub use report::VerificationRecord;

/// Outcome of reconciling one module.
#[derive(Debug, Clone)]
pub struct ModuleVerification {
    pub module_name: String,
    pub module_dir: PathBuf,
    pub missing: Vec<MissingEntry>,
    pub records: Vec<VerificationRecord>,
    pub report_path: PathBuf,
    /// Path of the module's ledger after reconciliation (renamed if promoted).
    pub ledger_path: PathBuf,
    pub promoted: bool,
}

impl ModuleVerification {
    pub fn verified_count(&self) -> usize {
        self.records.iter().filter(|r| r.verified).count()
    }
}

/// A ledger that could not be reconciled.
#[derive(Debug, Clone)]
pub struct SkippedModule {
    pub ledger_path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct ReconcileSummary {
    pub modules: Vec<ModuleVerification>,
    pub skipped: Vec<SkippedModule>,
}

pub struct Reconciler {
    source: Arc<dyn JobSource>,
    runner: Arc<dyn JobRunner>,
}

impl Reconciler {
    pub fn new(source: Arc<dyn JobSource>, runner: Arc<dyn JobRunner>) -> Self {
        Self { source, runner }
    }

    /// Reconciles every missing-entries ledger under `root`. Per-module
    /// failures are collected in `skipped`; only an unreadable root fails.
    pub fn reconcile_root(&self, root: &Path) -> Result<ReconcileSummary> {
        let mut summary = ReconcileSummary::default();
        for ledger_path in find_missing_ledgers(root)? {
            match self.reconcile_ledger(&ledger_path) {
                Ok(module) => summary.modules.push(module),
                Err(e) => {
                    tracing::warn!(ledger = %ledger_path.display(), "skipping module: {:#}", e);
                    summary.skipped.push(SkippedModule {
                        ledger_path,
                        reason: format!("{:#}", e),
                    });
                }
            }
        }
        Ok(summary)
    }

    /// Reconciles the module whose missing-entries ledger is at `ledger_path`.
    pub fn reconcile_ledger(&self, ledger_path: &Path) -> Result<ModuleVerification> {
        let parsed = load_missing_ledger(ledger_path)?;
        let module_dir = ledger_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let module_name = parsed.module_name.clone().unwrap_or_else(|| {
            module_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        });
        if let Some(recorded) = parsed.download_dir.as_ref().filter(|d| **d != module_dir) {
            tracing::warn!(
                module = %module_name,
                "ledger records download dir {}, reconciling into {}",
                recorded.display(),
                module_dir.display()
            );
        }
        tracing::info!(
            module = %module_name,
            entries = parsed.missing.len(),
            "verifying previously missing entries"
        );

        let records: Vec<VerificationRecord> = parsed
            .missing
            .iter()
            .map(|entry| VerificationRecord {
                label: entry.label.clone(),
                verified: self.retry_entry(entry, &parsed.source_path, &module_dir),
            })
            .collect();

        let report_path = module_dir.join(VERIFICATION_FILE_NAME);
        let report = report::render_report(&module_name, &module_dir, &parsed.missing, &records);
        std::fs::write(&report_path, report)
            .with_context(|| format!("write verification report: {}", report_path.display()))?;

        let promoted = records.iter().all(|r| r.verified);
        let ledger_path = if promoted {
            let complete = module_dir.join(COMPLETE_FILE_NAME);
            std::fs::rename(ledger_path, &complete).with_context(|| {
                format!("rename {} to {}", ledger_path.display(), complete.display())
            })?;
            tracing::info!(module = %module_name, "all entries verified; module complete");
            complete
        } else {
            ledger_path.to_path_buf()
        };

        Ok(ModuleVerification {
            module_name,
            module_dir,
            missing: parsed.missing,
            records,
            report_path,
            ledger_path,
            promoted,
        })
    }

    fn retry_entry(&self, entry: &MissingEntry, job_list: &Path, module_dir: &Path) -> bool {
        let Some(position) = &entry.source_position else {
            tracing::warn!(label = %entry.label, "no recorded position; cannot re-resolve");
            return false;
        };
        let url = match self.source.resolve_url(job_list, position) {
            Ok(Some(url)) => url,
            Ok(None) => {
                tracing::warn!(
                    label = %entry.label,
                    position = %position,
                    "no URL at {} in {}",
                    position,
                    job_list.display()
                );
                return false;
            }
            Err(e) => {
                tracing::warn!(label = %entry.label, position = %position, "resolve failed: {:#}", e);
                return false;
            }
        };

        let job = Job {
            ordinal: ordinal_from_label(&entry.label).unwrap_or(1),
            url,
            source_position: Some(position.clone()),
        };
        let outcome = self.runner.run(&job, module_dir);
        tracing::debug!(label = %entry.label, status = ?outcome.status, "reconciliation attempt");
        outcome.is_success()
    }
}
