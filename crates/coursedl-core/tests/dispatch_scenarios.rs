//! Integration test: module runs through the real executor and dispatch
//! controller, with a scripted fetcher in place of yt-dlp.

mod common;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use common::fakes::{MemorySource, RecordingSleeper, ScriptedFetcher, Step};
use coursedl_core::batch::{self, ModuleReport, ModuleRun};
use coursedl_core::executor::JobExecutor;
use coursedl_core::job_source::JobSource;
use coursedl_core::ledger::{parse_ledger, COMPLETE_FILE_NAME, MISSING_FILE_NAME};
use coursedl_core::retry::RetryPolicy;
use coursedl_core::scheduler::{DispatchController, ExecutionMode, RunProgress};
use tempfile::tempdir;

const LIST: &str = "/lists/Modulo 1 - Fundamentos.xlsx";

struct Harness {
    fetcher: ScriptedFetcher,
    sleeper: Arc<RecordingSleeper>,
    source: Arc<MemorySource>,
    controller: DispatchController,
}

fn harness(urls: &[Option<&str>]) -> Harness {
    let fetcher = ScriptedFetcher::new();
    let sleeper = Arc::new(RecordingSleeper::default());
    let executor =
        JobExecutor::new(fetcher.clone(), RetryPolicy::default()).with_sleeper(sleeper.clone());
    let source = Arc::new(MemorySource::new());
    source.set(Path::new(LIST), urls);
    Harness {
        fetcher,
        sleeper,
        source,
        controller: DispatchController::new(Arc::new(executor), 4),
    }
}

async fn run(h: &Harness, base: &Path) -> ModuleRun {
    let source: Arc<dyn JobSource> = h.source.clone();
    batch::run_module(Path::new(LIST), base, source, &h.controller, None)
        .await
        .unwrap()
        .expect("module has jobs")
}

fn url(n: u32) -> String {
    format!("https://video.example/lesson-{}", n)
}

#[tokio::test]
async fn all_jobs_succeed_and_module_is_complete() {
    let (u1, u2, u3) = (url(1), url(2), url(3));
    let h = harness(&[Some(u1.as_str()), Some(u2.as_str()), Some(u3.as_str())]);
    let base = tempdir().unwrap();

    let result = run(&h, base.path()).await;

    assert!(result.is_complete());
    assert_eq!(result.succeeded, 3);
    assert_eq!(result.summary.modes, vec![ExecutionMode::Parallel; 3]);
    assert!(!result.summary.aborted());

    let module_dir = base.path().join("Modulo 1 - Fundamentos");
    assert_eq!(result.download_dir, module_dir);
    assert_eq!(result.ledger_path, module_dir.join(COMPLETE_FILE_NAME));
    assert!(!module_dir.join(MISSING_FILE_NAME).exists());

    let text = std::fs::read_to_string(&result.ledger_path).unwrap();
    assert!(text.contains("  - Aula 01 - lesson-1 : Tentativa 1"));
    assert!(text.contains("  - Aula 03 - lesson-3 : Tentativa 1"));
    assert!(text.contains("Aulas não baixadas: 0 de 3"));
    assert!(module_dir.join("Aula 02 - lesson-2.mp4").exists());
    assert!(h.sleeper.sleeps().is_empty());
}

#[tokio::test]
async fn exhausted_job_switches_to_sequential_then_recovers() {
    let (u1, u2, u3, u4) = (url(1), url(2), url(3), url(4));
    let h = harness(&[Some(u1.as_str()), Some(u2.as_str()), Some(u3.as_str()), Some(u4.as_str())]);
    h.fetcher
        .script(&u2, &[Step::Transient, Step::Transient, Step::Transient]);
    let base = tempdir().unwrap();

    let result = run(&h, base.path()).await;

    assert_eq!(
        result.summary.modes,
        vec![
            ExecutionMode::Parallel,
            ExecutionMode::Parallel,
            ExecutionMode::Sequential,
            ExecutionMode::Parallel,
        ]
    );
    assert_eq!(result.succeeded, 3);
    assert_eq!(result.missing, 1);
    assert_eq!(
        h.sleeper.sleeps(),
        vec![Duration::from_secs(2), Duration::from_secs(2)]
    );

    let module_dir = base.path().join("Modulo 1 - Fundamentos");
    assert_eq!(result.ledger_path, module_dir.join(MISSING_FILE_NAME));
    let text = std::fs::read_to_string(&result.ledger_path).unwrap();
    let parsed = parse_ledger(&text).unwrap();
    assert_eq!(parsed.missing.len(), 1);
    assert_eq!(parsed.missing[0].label, "Aula 02 - lesson-2");
    assert_eq!(
        parsed.missing[0].source_position.as_ref().map(|p| p.as_str()),
        Some("A3")
    );
    assert_eq!(parsed.source_path, PathBuf::from(LIST));
}

#[tokio::test]
async fn sequential_failure_aborts_remaining_jobs() {
    let urls: Vec<String> = (1..=5).map(url).collect();
    let rows: Vec<Option<&str>> = urls.iter().map(|u| Some(u.as_str())).collect();
    let h = harness(&rows);
    h.fetcher.script(&urls[1], &[Step::TooTall]);
    h.fetcher.script(&urls[2], &[Step::Crash]);
    let base = tempdir().unwrap();

    let result = run(&h, base.path()).await;

    assert!(result.summary.aborted());
    assert_eq!(result.summary.aborted_at, Some(3));
    assert_eq!(result.summary.processed(), 3);
    assert_eq!(result.succeeded, 1);
    assert_eq!(result.missing, 2);
    assert!(!h.fetcher.calls().contains(&urls[3]));

    let text = std::fs::read_to_string(&result.ledger_path).unwrap();
    assert!(text.contains("Aulas não baixadas: 2 de 5"));
    assert!(text.contains("  - Aula 02 - lesson-2: Posição - A3"));
    assert!(text.contains("  - Aula 03 - Video: Posição - A4"));
    assert!(!text.contains("Aula 04"));
}

#[tokio::test]
async fn blank_rows_keep_their_positions() {
    let (u1, u2) = (url(1), url(2));
    let h = harness(&[Some(u1.as_str()), None, Some(u2.as_str())]);
    h.fetcher.script(&u2, &[Step::TooTall]);
    let base = tempdir().unwrap();

    let result = run(&h, base.path()).await;

    assert_eq!(result.total, 2);
    let text = std::fs::read_to_string(&result.ledger_path).unwrap();
    assert!(text.contains("  - Aula 02 - lesson-2: Posição - A4"));
}

#[tokio::test]
async fn rerun_replaces_stale_ledger_variant() {
    let u1 = url(1);
    let h = harness(&[Some(u1.as_str())]);
    h.fetcher.script(&u1, &[Step::Crash]);
    let base = tempdir().unwrap();

    let first = run(&h, base.path()).await;
    assert!(first.ledger_path.ends_with(MISSING_FILE_NAME));

    let second = run(&h, base.path()).await;
    assert!(second.is_complete());
    assert!(second.ledger_path.exists());
    assert!(!first.ledger_path.exists());
}

#[tokio::test]
async fn progress_reports_every_processed_job() {
    let (u1, u2) = (url(1), url(2));
    let h = harness(&[Some(u1.as_str()), Some(u2.as_str())]);
    let base = tempdir().unwrap();
    let (tx, mut rx) = tokio::sync::mpsc::channel::<RunProgress>(8);
    let source: Arc<dyn JobSource> = h.source.clone();

    batch::run_module(Path::new(LIST), base.path(), source, &h.controller, Some(&tx))
        .await
        .unwrap()
        .unwrap();
    drop(tx);

    let mut seen = Vec::new();
    while let Some(p) = rx.recv().await {
        seen.push((p.ordinal, p.processed, p.total, p.succeeded));
    }
    assert_eq!(seen, vec![(1, 1, 2, true), (2, 2, 2, true)]);
}

#[tokio::test]
async fn empty_and_unreadable_lists_are_skipped() {
    let h = harness(&[None, None]);
    let base = tempdir().unwrap();
    let source: Arc<dyn JobSource> = h.source.clone();
    let lists = vec![
        PathBuf::from(LIST),
        PathBuf::from("/lists/Modulo 2.xlsx"),
    ];

    let reports = batch::run_modules(&lists, base.path(), source, &h.controller, None).await;

    assert_eq!(reports.len(), 2);
    assert!(reports
        .iter()
        .all(|r| matches!(r, ModuleReport::Skipped { .. })));
    assert!(h.fetcher.calls().is_empty());
}
