//! Bounded retry with a fixed delay.
//!
//! No backoff, no jitter, no per-attempt timeout. Attempts run strictly one
//! after another and only the error of the last attempt is kept.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::debug;

/// How many times a failed call is retried and how long to wait in between.
///
/// `attempts` counts retries, not total tries: the operation runs at most
/// `attempts + 1` times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 2,
            delay: Duration::from_millis(400),
        }
    }
}

impl RetryPolicy {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }

    /// A policy that tries exactly once.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Upper bound on the number of invocations.
    pub fn max_invocations(&self) -> u32 {
        self.attempts.saturating_add(1)
    }
}

/// Run `op` until it succeeds or `policy.attempts` retries are used up.
///
/// Sleeps `policy.delay` between a failure and the next try, never after the
/// final one. Earlier errors are dropped; the caller sees the last.
pub async fn with_retry<T, E, F, Fut>(policy: RetryPolicy, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 0u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < policy.attempts => {
                attempt += 1;
                debug!(attempt, max = policy.attempts, error = %e, "attempt failed; retrying");
                tokio::time::sleep(policy.delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use tokio::time::Instant;

    use super::*;

    const DELAY: Duration = Duration::from_millis(400);

    #[tokio::test(start_paused = true)]
    async fn always_failing_runs_attempts_plus_one_and_keeps_last_error() {
        for n in 0..5u32 {
            let calls = &AtomicU32::new(0);
            let result: Result<(), String> = with_retry(RetryPolicy::new(n, DELAY), || async move {
                let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
                Err(format!("failure #{call}"))
            })
            .await;

            assert_eq!(calls.load(Ordering::SeqCst), n + 1);
            assert_eq!(result.unwrap_err(), format!("failure #{}", n + 1));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn first_call_success_is_not_repeated() {
        for n in 0..5u32 {
            let calls = &AtomicU32::new(0);
            let start = Instant::now();
            let result: Result<&str, String> = with_retry(RetryPolicy::new(n, DELAY), || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok("pong")
            })
            .await;

            assert_eq!(result.unwrap(), "pong");
            assert_eq!(calls.load(Ordering::SeqCst), 1);
            assert_eq!(start.elapsed(), Duration::ZERO);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_after_k_failures_without_trailing_delay() {
        let n = 3u32;
        for k in 0..=n {
            let calls = &AtomicU32::new(0);
            let start = Instant::now();
            let result: Result<u32, String> = with_retry(RetryPolicy::new(n, DELAY), || async move {
                let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if call <= k { Err(format!("failure #{call}")) } else { Ok(call) }
            })
            .await;

            assert_eq!(result.unwrap(), k + 1);
            assert_eq!(calls.load(Ordering::SeqCst), k + 1);
            assert_eq!(start.elapsed(), DELAY * k);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn zero_attempts_tries_once() {
        let calls = &AtomicU32::new(0);
        let result: Result<(), &str> = with_retry(RetryPolicy::none(), || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err("down")
        })
        .await;

        assert_eq!(result, Err("down"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts, 2);
        assert_eq!(policy.delay, Duration::from_millis(400));
        assert_eq!(policy.max_invocations(), 3);
    }
}
