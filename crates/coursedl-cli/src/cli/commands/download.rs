//! `coursedl download` – run the selected job lists.

use anyhow::{bail, Result};
use coursedl_core::batch::{self, ModuleReport};
use coursedl_core::config::CourseConfig;
use coursedl_core::executor::JobExecutor;
use coursedl_core::fetcher::YtDlpFetcher;
use coursedl_core::job_source::{JobSource, SpreadsheetSource};
use coursedl_core::scheduler::{DispatchController, RunProgress};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::prompt;

const BAR_TEMPLATE: &str = "{prefix:.bold} [{bar:40.cyan/blue}] {pos}/{len} {msg}";

pub async fn run_download(
    cfg: &CourseConfig,
    lists_dir: &Path,
    output_dir: &Path,
    selection: Option<&str>,
) -> Result<()> {
    let lists = batch::list_job_lists(lists_dir)?;
    if lists.is_empty() {
        bail!("no job list spreadsheets in {}", lists_dir.display());
    }

    println!("Job lists available:");
    for (i, list) in lists.iter().enumerate() {
        let name = list
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("  {}: {}", i + 1, name);
    }
    let choice = match selection {
        Some(s) => s.to_string(),
        None => prompt::selection()?,
    };
    let selected: Vec<PathBuf> = batch::parse_selection(&choice, lists.len())?
        .into_iter()
        .map(|i| lists[i].clone())
        .collect();

    let executor = JobExecutor::from_config(YtDlpFetcher::from_config(cfg), cfg);
    let controller = DispatchController::new(Arc::new(executor), cfg.worker_capacity());
    let source: Arc<dyn JobSource> = Arc::new(SpreadsheetSource::new());
    tracing::info!(
        lists = selected.len(),
        capacity = controller.pool().capacity(),
        "starting download run"
    );

    let style = ProgressStyle::with_template(BAR_TEMPLATE)?.progress_chars("=> ");
    let (progress_tx, mut progress_rx) = tokio::sync::mpsc::channel::<RunProgress>(16);
    let progress_handle = tokio::spawn(async move {
        let mut current: Option<(String, ProgressBar)> = None;
        while let Some(p) = progress_rx.recv().await {
            let fresh = current.as_ref().map(|(m, _)| m != &p.module).unwrap_or(true);
            if fresh {
                if let Some((_, bar)) = current.take() {
                    bar.finish();
                }
                let bar = ProgressBar::new(p.total as u64);
                bar.set_style(style.clone());
                bar.set_prefix(p.module.clone());
                current = Some((p.module.clone(), bar));
            }
            if let Some((_, bar)) = current.as_ref() {
                bar.set_position(p.processed as u64);
                let mark = if p.succeeded { "ok" } else { "failed" };
                bar.set_message(format!("lesson {:02} {} ({})", p.ordinal, mark, p.mode));
            }
        }
        if let Some((_, bar)) = current {
            bar.finish();
        }
    });

    let reports =
        batch::run_modules(&selected, output_dir, source, &controller, Some(&progress_tx)).await;
    drop(progress_tx);
    let _ = progress_handle.await;

    for report in &reports {
        match report {
            ModuleReport::Ran(run) if run.is_complete() => {
                println!("{}: all {} lessons downloaded", run.module_name, run.total);
            }
            ModuleReport::Ran(run) => {
                println!(
                    "{}: {} of {} lessons downloaded, see {}",
                    run.module_name,
                    run.succeeded,
                    run.total,
                    run.ledger_path.display()
                );
                if run.summary.aborted() {
                    println!("  run stopped after a sequential failure");
                }
            }
            ModuleReport::Skipped { job_list, reason } => {
                println!("{}: skipped ({})", job_list.display(), reason);
            }
        }
    }
    Ok(())
}
