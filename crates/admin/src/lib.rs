//! Command-line front end for bulk link administration.

pub mod command;

pub use command::{Command, UsageError};
