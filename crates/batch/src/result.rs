//! Aggregated outcome of a batch run.

use serde::Serialize;

/// A failed item together with the error its operation returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemError<I, E> {
    pub id: I,
    pub error: E,
}

/// Outcome of one [`BatchExecutor::run`](crate::BatchExecutor::run).
///
/// Always produced, even when every item failed or the run was cancelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult<I, E> {
    pub success_count: usize,
    pub fail_count: usize,
    /// Failed items in the order they were attempted.
    pub errors: Vec<ItemError<I, E>>,
    /// Set when cancellation stopped the run before the last item.
    pub cancelled: bool,
    /// Items never started because of cancellation.
    pub not_attempted: usize,
}

impl<I, E> Default for BatchResult<I, E> {
    fn default() -> Self {
        Self {
            success_count: 0,
            fail_count: 0,
            errors: Vec::new(),
            cancelled: false,
            not_attempted: 0,
        }
    }
}

impl<I, E> BatchResult<I, E> {
    pub fn attempted(&self) -> usize {
        self.success_count + self.fail_count
    }

    /// True when every item ran and none failed.
    pub fn is_complete_success(&self) -> bool {
        self.fail_count == 0 && !self.cancelled
    }

    /// Failed ids in attempt order.
    pub fn failed_ids(&self) -> impl Iterator<Item = &I> {
        self.errors.iter().map(|e| &e.id)
    }

    /// Render ids and errors as strings for reporting.
    pub fn summary(&self) -> BatchSummary
    where
        I: std::fmt::Display,
        E: std::fmt::Display,
    {
        BatchSummary {
            success_count: self.success_count,
            fail_count: self.fail_count,
            errors: self
                .errors
                .iter()
                .map(|e| ItemErrorSummary {
                    id: e.id.to_string(),
                    error: e.error.to_string(),
                })
                .collect(),
            cancelled: self.cancelled,
            not_attempted: self.not_attempted,
        }
    }
}

/// Serializable, stringified view of a [`BatchResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub success_count: usize,
    pub fail_count: usize,
    pub errors: Vec<ItemErrorSummary>,
    pub cancelled: bool,
    pub not_attempted: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemErrorSummary {
    pub id: String,
    pub error: String,
}
