pub mod config;
pub mod logging;

pub mod batch;
pub mod executor;
pub mod fetcher;
pub mod format;
pub mod job;
pub mod job_source;
pub mod ledger;
pub mod naming;
pub mod reconcile;
pub mod retry;
pub mod scheduler;
