//! Top-level download flow: pick job lists, run each module in turn.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc::Sender;

use crate::job::Job;
use crate::job_source::{is_spreadsheet, JobEntry, JobSource};
use crate::ledger::ModuleLedger;
use crate::naming::numeric_sort_key;
use crate::scheduler::{DispatchController, RunProgress, RunSummary};

/// Spreadsheet job lists in `dir`, ordered by the first number in their name.
pub fn list_job_lists(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut lists: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("read dir: {}", dir.display()))?
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_spreadsheet(p))
        .collect();
    lists.sort_by(|a, b| {
        let (na, nb) = (file_label(a), file_label(b));
        numeric_sort_key(&na)
            .cmp(&numeric_sort_key(&nb))
            .then_with(|| na.cmp(&nb))
    });
    Ok(lists)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Parses a selection like `"1 3 4"` (1-based) or `all`/`tudo` into
/// zero-based indices over `count` items.
pub fn parse_selection(selection: &str, count: usize) -> Result<Vec<usize>> {
    let selection = selection.trim();
    if selection.eq_ignore_ascii_case("all") || selection.eq_ignore_ascii_case("tudo") {
        return Ok((0..count).collect());
    }
    let mut picked = Vec::new();
    for token in selection.split_whitespace() {
        let n: usize = token
            .parse()
            .with_context(|| format!("not a list number: {:?}", token))?;
        if n == 0 || n > count {
            bail!("list number {} out of range 1..={}", n, count);
        }
        picked.push(n - 1);
    }
    if picked.is_empty() {
        bail!("no job list selected");
    }
    Ok(picked)
}

/// Module name of a job list: its file stem.
pub fn module_name(job_list: &Path) -> String {
    job_list
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "module".to_string())
}

/// Numbers entries `1..` in list order.
pub fn build_jobs(entries: Vec<JobEntry>) -> Vec<Job> {
    entries
        .into_iter()
        .enumerate()
        .map(|(i, e)| Job {
            ordinal: i as u32 + 1,
            url: e.url,
            source_position: Some(e.position),
        })
        .collect()
}

/// Result of one module run.
#[derive(Debug, Clone)]
pub struct ModuleRun {
    pub module_name: String,
    pub download_dir: PathBuf,
    pub ledger_path: PathBuf,
    pub succeeded: usize,
    pub total: usize,
    pub missing: usize,
    pub summary: RunSummary,
}

impl ModuleRun {
    pub fn is_complete(&self) -> bool {
        self.missing == 0 && self.succeeded == self.total
    }
}

/// What happened to one selected job list.
#[derive(Debug, Clone)]
pub enum ModuleReport {
    Ran(ModuleRun),
    Skipped { job_list: PathBuf, reason: String },
}

/// Downloads one module: `base_dir/<module>` receives the media and the ledger.
/// Returns `Ok(None)` when the list has no jobs.
pub async fn run_module(
    job_list: &Path,
    base_dir: &Path,
    source: Arc<dyn JobSource>,
    controller: &DispatchController,
    progress: Option<&Sender<RunProgress>>,
) -> Result<Option<ModuleRun>> {
    let name = module_name(job_list);
    let download_dir = base_dir.join(&name);
    fs::create_dir_all(&download_dir)
        .with_context(|| format!("create dir: {}", download_dir.display()))?;

    let entries = {
        let list = job_list.to_path_buf();
        tokio::task::spawn_blocking(move || source.list_jobs(&list))
            .await
            .context("job list task join")?
            .with_context(|| format!("read job list: {}", job_list.display()))?
    };
    if entries.is_empty() {
        tracing::warn!(module = %name, "no job URLs in {}", job_list.display());
        return Ok(None);
    }

    let jobs = build_jobs(entries);
    tracing::info!(module = %name, jobs = jobs.len(), "starting module run");
    let mut ledger = ModuleLedger::new(&name, &download_dir, jobs.len(), job_list);
    let summary = controller.run(&mut ledger, &jobs, progress).await?;
    let ledger_path = ledger.write()?;

    Ok(Some(ModuleRun {
        module_name: name,
        download_dir,
        ledger_path,
        succeeded: ledger.succeeded_count(),
        total: ledger.total_jobs,
        missing: ledger.missing_entries().len(),
        summary,
    }))
}

/// Runs the given job lists one after another; a failing module is reported
/// and the next one still runs.
pub async fn run_modules(
    job_lists: &[PathBuf],
    base_dir: &Path,
    source: Arc<dyn JobSource>,
    controller: &DispatchController,
    progress: Option<&Sender<RunProgress>>,
) -> Vec<ModuleReport> {
    let mut reports = Vec::with_capacity(job_lists.len());
    for job_list in job_lists {
        let result = run_module(job_list, base_dir, Arc::clone(&source), controller, progress).await;
        let report = match result {
            Ok(Some(run)) => ModuleReport::Ran(run),
            Ok(None) => ModuleReport::Skipped {
                job_list: job_list.clone(),
                reason: "no job URLs found".to_string(),
            },
            Err(e) => {
                tracing::error!(list = %job_list.display(), "module failed: {:#}", e);
                ModuleReport::Skipped {
                    job_list: job_list.clone(),
                    reason: format!("{:#}", e),
                }
            }
        };
        reports.push(report);
    }
    reports
}
