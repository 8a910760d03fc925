//! Bounded retry combinator.
//!
//! [`retry_while`] re-runs an async operation while its successful output is
//! judged unusable, up to [`RetryPolicy::max_retries`] extra attempts with a
//! fixed delay in between. Errors are returned immediately and never retried;
//! the policy only covers soft failures such as an empty completion.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// How many times to re-issue a call and how long to wait between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first one.
    pub max_retries: u32,
    /// Fixed pause before each retry.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// A policy with the given retry count and delay.
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Total number of attempts allowed, including the first.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Longest a retried call can take when each attempt may run for `per_attempt`.
    pub fn worst_case(&self, per_attempt: Duration) -> Duration {
        per_attempt
            .saturating_mul(self.max_attempts())
            .saturating_add(self.delay.saturating_mul(self.max_retries))
    }
}

/// Output of the last attempt plus how many retries it took to get there.
#[derive(Debug, Clone, PartialEq)]
pub struct Attempted<T> {
    /// Value produced by the final attempt.
    pub value: T,
    /// Number of retries performed (attempts minus one).
    pub retries: u32,
}

impl<T> Attempted<T> {
    /// Total attempts made.
    pub fn attempts(&self) -> u32 {
        self.retries + 1
    }
}

/// Run `op`, re-running it while `should_retry` holds for its output.
///
/// Returns the value of the last attempt, which may still satisfy
/// `should_retry` once the policy is exhausted. Any `Err` from `op` aborts the
/// loop and is returned as-is.
pub async fn retry_while<T, E, F, Fut, P>(
    policy: &RetryPolicy,
    mut op: F,
    mut should_retry: P,
) -> Result<Attempted<T>, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: FnMut(&T) -> bool,
{
    let mut retries = 0u32;

    loop {
        let value = op().await?;

        if retries >= policy.max_retries || !should_retry(&value) {
            return Ok(Attempted { value, retries });
        }

        retries += 1;
        warn!(
            attempt = retries + 1,
            max_attempts = policy.max_attempts(),
            delay_ms = policy.delay.as_millis() as u64,
            "unusable result, retrying"
        );

        if !policy.delay.is_zero() {
            tokio::time::sleep(policy.delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_worst_case() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.worst_case(Duration::from_secs(90)),
            Duration::from_secs(274)
        );
        assert_eq!(
            RetryPolicy::none().worst_case(Duration::from_secs(90)),
            Duration::from_secs(90)
        );
    }

    #[tokio::test]
    async fn test_returns_first_usable_value() {
        let calls = Cell::new(0u32);
        let result: Result<_, ()> = retry_while(
            &RetryPolicy::new(2, Duration::ZERO),
            || {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move { Ok(if n == 1 { "" } else { "text" }) }
            },
            |value: &&str| value.is_empty(),
        )
        .await;

        let attempted = result.unwrap();
        assert_eq!(attempted.value, "text");
        assert_eq!(attempted.retries, 1);
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn test_stops_at_retry_bound() {
        let calls = Cell::new(0u32);
        let result: Result<_, ()> = retry_while(
            &RetryPolicy::new(2, Duration::ZERO),
            || {
                calls.set(calls.get() + 1);
                async { Ok(String::new()) }
            },
            |value: &String| value.is_empty(),
        )
        .await;

        let attempted = result.unwrap();
        assert!(attempted.value.is_empty());
        assert_eq!(attempted.retries, 2);
        assert_eq!(attempted.attempts(), 3);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_errors_are_not_retried() {
        let calls = Cell::new(0u32);
        let result: Result<Attempted<String>, &str> = retry_while(
            &RetryPolicy::new(5, Duration::ZERO),
            || {
                calls.set(calls.get() + 1);
                async { Err("boom") }
            },
            |_: &String| true,
        )
        .await;

        assert_eq!(result.unwrap_err(), "boom");
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_no_retry_policy() {
        let calls = Cell::new(0u32);
        let result: Result<_, ()> = retry_while(
            &RetryPolicy::none(),
            || {
                calls.set(calls.get() + 1);
                async { Ok(0u8) }
            },
            |_: &u8| true,
        )
        .await;

        assert_eq!(result.unwrap().retries, 0);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 2);
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.delay, Duration::from_secs(2));
    }
}
