//! `coursedl verify` – retry lessons listed in missing-lesson ledgers.

use anyhow::{Context, Result};
use coursedl_core::config::CourseConfig;
use coursedl_core::executor::JobExecutor;
use coursedl_core::fetcher::YtDlpFetcher;
use coursedl_core::job_source::SpreadsheetSource;
use coursedl_core::reconcile::Reconciler;
use std::path::Path;
use std::sync::Arc;

pub async fn run_verify(cfg: &CourseConfig, root: &Path) -> Result<()> {
    let executor = JobExecutor::from_config(YtDlpFetcher::from_config(cfg), cfg);
    let reconciler = Reconciler::new(Arc::new(SpreadsheetSource::new()), Arc::new(executor));
    let scan_root = root.to_path_buf();
    let summary = tokio::task::spawn_blocking(move || reconciler.reconcile_root(&scan_root))
        .await
        .context("verification task join")??;

    if summary.modules.is_empty() && summary.skipped.is_empty() {
        println!("No missing-lesson ledgers under {}", root.display());
        return Ok(());
    }
    for module in &summary.modules {
        let status = if module.promoted {
            "complete"
        } else {
            "still missing lessons"
        };
        println!(
            "{}: {} of {} verified, {} (report: {})",
            module.module_name,
            module.verified_count(),
            module.missing.len(),
            status,
            module.report_path.display()
        );
    }
    for skipped in &summary.skipped {
        println!("{}: skipped ({})", skipped.ledger_path.display(), skipped.reason);
    }
    Ok(())
}
