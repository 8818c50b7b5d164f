//! Product-link administration and lookup.
//!
//! - [`LinkAdmin`]: bulk delete, bulk status and CSV-derived bulk import,
//!   each driven through a paced [`BatchExecutor`](kogebog_batch::BatchExecutor).
//! - [`LinkCatalog`]: the current keyword index and option list, swapped
//!   wholesale on refresh, used to turn ingredient lines into purchase links.
//! - [`LinksConfig`]: environment configuration for both.

pub mod catalog;
pub mod config;
pub mod orchestrator;

pub use catalog::{CatalogSnapshot, LinkCatalog};
pub use config::{ConfigError, LinksConfig};
pub use orchestrator::{ImportError, ImportSummary, LinkAdmin};
