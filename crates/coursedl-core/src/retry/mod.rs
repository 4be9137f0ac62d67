//! Retry and backoff policy.
//!
//! This module encapsulates error classification (transient extraction or
//! download hiccups vs unexpected failures) and fixed backoff decisions so
//! that the job executor and the reconciler share a consistent policy.

mod classify;
mod error;
mod policy;
mod run;
mod sleep;

pub use classify::classify;
pub use error::FetchError;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::{run_with_retry, RetryError};
pub use sleep::{Sleeper, ThreadSleeper};
