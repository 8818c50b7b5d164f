//! Sequential batch executor with fixed inter-item pacing.
//!
//! Items are processed one at a time in input order. After every item except
//! the last the executor sleeps for the configured delay, so a bulk action
//! never bursts requests at the remote API. A failing item is recorded and
//! the run moves on.
//!
//! Cancellation is cooperative: the token is checked before each item and
//! raced against the delay. An item already in flight always finishes, and
//! mutations already applied stay applied.

use std::fmt::{Debug, Display};
use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::result::{BatchResult, ItemError};

/// Default pause between two items.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(150);

/// Longest pause accepted between two items.
pub const MAX_DELAY: Duration = Duration::from_secs(60);

/// Invalid executor configuration. This is a caller bug, not an item failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BatchConfigError {
    #[error("Batch delay must not be negative (got {0} ms)")]
    NegativeDelay(i64),

    #[error("Batch delay of {got_ms} ms exceeds the maximum of {max_ms} ms")]
    DelayTooLong { got_ms: u128, max_ms: u128 },
}

/// Runs a single-item async operation across a list of items.
///
/// Holds no state between runs; one executor can drive any number of
/// batches, including concurrently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchExecutor {
    delay: Duration,
}

impl BatchExecutor {
    /// Create an executor pausing `delay` between items.
    pub fn new(delay: Duration) -> Result<Self, BatchConfigError> {
        if delay > MAX_DELAY {
            return Err(BatchConfigError::DelayTooLong {
                got_ms: delay.as_millis(),
                max_ms: MAX_DELAY.as_millis(),
            });
        }
        Ok(Self { delay })
    }

    /// Create an executor from a signed millisecond value, as read from
    /// configuration.
    pub fn from_millis(millis: i64) -> Result<Self, BatchConfigError> {
        let millis = u64::try_from(millis).map_err(|_| BatchConfigError::NegativeDelay(millis))?;
        Self::new(Duration::from_millis(millis))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Apply `operation` to every item in order.
    ///
    /// Returns once every item has been attempted or `cancel` fired. Never
    /// fails: operation errors become [`ItemError`] entries.
    pub async fn run<I, E, F, Fut>(
        &self,
        items: Vec<I>,
        cancel: &CancellationToken,
        mut operation: F,
    ) -> BatchResult<I, E>
    where
        I: Clone + Debug,
        E: Display,
        F: FnMut(I) -> Fut,
        Fut: Future<Output = Result<(), E>>,
    {
        let total = items.len();
        let mut result = BatchResult::default();

        tracing::info!(
            total,
            delay_ms = self.delay.as_millis() as u64,
            "Batch started"
        );

        let mut remaining = items.into_iter().enumerate().peekable();

        while let Some((position, item)) = remaining.next() {
            if cancel.is_cancelled() {
                result.cancelled = true;
                result.not_attempted = total - position;
                tracing::info!(
                    attempted = position,
                    not_attempted = result.not_attempted,
                    "Batch cancelled"
                );
                break;
            }

            match operation(item.clone()).await {
                Ok(()) => {
                    result.success_count += 1;
                }
                Err(error) => {
                    tracing::warn!(
                        position,
                        item = ?item,
                        error = %error,
                        "Batch item failed"
                    );
                    result.fail_count += 1;
                    result.errors.push(ItemError { id: item, error });
                }
            }

            if remaining.peek().is_some() && !self.delay.is_zero() {
                tokio::select! {
                    _ = cancel.cancelled() => {}
                    _ = tokio::time::sleep(self.delay) => {}
                }
            }
        }

        tracing::info!(
            success_count = result.success_count,
            fail_count = result.fail_count,
            cancelled = result.cancelled,
            "Batch finished"
        );

        result
    }
}

impl Default for BatchExecutor {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn default_delay_is_150ms() {
        assert_eq!(BatchExecutor::default().delay(), Duration::from_millis(150));
    }

    #[test]
    fn negative_millis_are_rejected() {
        assert_matches!(
            BatchExecutor::from_millis(-1),
            Err(BatchConfigError::NegativeDelay(-1))
        );
    }

    #[test]
    fn delay_above_maximum_is_rejected() {
        assert_matches!(
            BatchExecutor::new(MAX_DELAY + Duration::from_millis(1)),
            Err(BatchConfigError::DelayTooLong { .. })
        );
    }

    #[test]
    fn zero_and_maximum_delay_are_accepted() {
        assert!(BatchExecutor::from_millis(0).is_ok());
        assert!(BatchExecutor::new(MAX_DELAY).is_ok());
    }

    #[test]
    fn config_error_display() {
        let err = BatchConfigError::NegativeDelay(-20);
        assert_eq!(err.to_string(), "Batch delay must not be negative (got -20 ms)");
    }
}
