use std::future::Future;
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use tracing::debug;

use super::error::{ExecutionOutcome, FetchError};

/// Caller-side retry with exponential backoff.
///
/// The [`RequestExecutor`](super::RequestExecutor) performs exactly one round-trip
/// per call. Callers that want to retry wrap the call with a policy; only
/// failures where [`FetchError::is_retryable`] holds are retried.
///
/// ```rust,no_run
/// use techniq_fetch::{QueryParams, RequestExecutor, RetryPolicy};
///
/// # async fn example() -> Result<(), techniq_fetch::FetchError> {
/// let executor = RequestExecutor::builder()
///     .with_base_address("https://api.example.com")
///     .build()?;
/// let address = executor.address("/exercises", &QueryParams::new())?;
///
/// let exercises: Vec<String> = RetryPolicy::default()
///     .run(|| executor.execute(address.clone()))
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay before the first retry.
    pub min_delay: Duration,
    /// Upper bound of the delay between two attempts.
    pub max_delay: Duration,
    /// Total number of attempts, the first one included.
    pub max_attempts: usize,
    /// Randomizes delays to spread concurrent retries.
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(2),
            max_attempts: 3,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// A policy running the operation once.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Sets the number of attempts, the first one included.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the bounds of the exponential backoff.
    #[must_use]
    pub fn with_delays(mut self, min_delay: Duration, max_delay: Duration) -> Self {
        self.min_delay = min_delay;
        self.max_delay = max_delay;
        self
    }

    /// Enables or disables random jitter on the delays.
    #[must_use]
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Runs `operation` until it succeeds, fails with a non-retryable error, or
    /// the attempts are exhausted. The last error is returned.
    pub async fn run<T, F, Fut>(&self, operation: F) -> ExecutionOutcome<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ExecutionOutcome<T>>,
    {
        let mut backoff = ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_attempts.saturating_sub(1));
        if self.jitter {
            backoff = backoff.with_jitter();
        }

        operation
            .retry(&backoff)
            .when(FetchError::is_retryable)
            .notify(|error: &FetchError, delay: Duration| {
                debug!(%error, ?delay, "retrying request");
            })
            .await
    }
}
