//! Sequential, paced batch execution for bulk mutations against a
//! rate-limited remote API.
//!
//! - [`BatchExecutor`] runs one async operation per item, strictly in input
//!   order, sleeping a fixed delay between items and recording failures
//!   instead of aborting.
//! - [`BatchResult`] aggregates the per-item outcomes.

pub mod executor;
pub mod result;

pub use executor::{BatchConfigError, BatchExecutor, DEFAULT_DELAY, MAX_DELAY};
pub use result::{BatchResult, BatchSummary, ItemError};
