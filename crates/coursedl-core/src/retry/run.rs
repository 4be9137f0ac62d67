//! Retry loop: run a closure until success or policy says stop.

use super::classify::classify;
use super::error::FetchError;
use super::policy::{ErrorKind, RetryDecision, RetryPolicy};
use super::sleep::Sleeper;

/// Why `run_with_retry` gave up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryError {
    /// Every allowed attempt failed with a retryable error.
    Exhausted { attempts: u32, last: FetchError },
    /// A non-retryable error stopped the loop at `attempt`.
    Fatal { attempt: u32, error: FetchError },
}

/// Runs `f(attempt)` until it succeeds or the retry policy says to stop.
/// On retryable failure, sleeps for the backoff duration then tries again.
/// Returns the value together with the 1-based attempt that produced it.
pub fn run_with_retry<T, F>(
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    mut f: F,
) -> Result<(T, u32), RetryError>
where
    F: FnMut(u32) -> Result<T, FetchError>,
{
    let mut attempt = 1u32;
    loop {
        match f(attempt) {
            Ok(v) => return Ok((v, attempt)),
            Err(e) => {
                let kind = classify(&e);
                match policy.decide(attempt, kind) {
                    RetryDecision::RetryAfter(d) => {
                        tracing::debug!(attempt, error = %e, "attempt failed, retrying in {:?}", d);
                        sleeper.sleep(d);
                        attempt += 1;
                    }
                    RetryDecision::NoRetry if kind == ErrorKind::Transient => {
                        return Err(RetryError::Exhausted {
                            attempts: attempt,
                            last: e,
                        });
                    }
                    RetryDecision::NoRetry => {
                        return Err(RetryError::Fatal { attempt, error: e });
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct Recorded(Mutex<Vec<Duration>>);

    impl Sleeper for Recorded {
        fn sleep(&self, d: Duration) {
            self.0.lock().unwrap().push(d);
        }
    }

    #[test]
    fn succeeds_on_later_attempt_and_sleeps_between() {
        let sleeper = Recorded::default();
        let res = run_with_retry(&RetryPolicy::default(), &sleeper, |attempt| {
            if attempt < 2 {
                Err(FetchError::Transient("timeout".into()))
            } else {
                Ok("done")
            }
        });
        assert_eq!(res, Ok(("done", 2)));
        assert_eq!(*sleeper.0.lock().unwrap(), vec![Duration::from_secs(2)]);
    }

    #[test]
    fn exhausts_without_sleeping_after_last_attempt() {
        let sleeper = Recorded::default();
        let res: Result<((), u32), _> = run_with_retry(&RetryPolicy::default(), &sleeper, |_| {
            Err(FetchError::Transient("503".into()))
        });
        assert_eq!(
            res,
            Err(RetryError::Exhausted {
                attempts: 3,
                last: FetchError::Transient("503".into())
            })
        );
        assert_eq!(sleeper.0.lock().unwrap().len(), 2);
    }

    #[test]
    fn unexpected_error_stops_immediately() {
        let sleeper = Recorded::default();
        let mut calls = 0;
        let res: Result<((), u32), _> = run_with_retry(&RetryPolicy::default(), &sleeper, |_| {
            calls += 1;
            Err(FetchError::Unexpected("boom".into()))
        });
        assert_eq!(calls, 1);
        assert!(matches!(res, Err(RetryError::Fatal { attempt: 1, .. })));
        assert!(sleeper.0.lock().unwrap().is_empty());
    }
}
