//! Product-link domain core.
//!
//! Pure data model and logic for resolving recipe ingredients to product
//! mappings. No I/O, no async: callers fetch data from the link API and pass
//! it in.

pub mod error;
pub mod import;
pub mod keywords;
pub mod model;
pub mod purchase;
pub mod resolver;
pub mod slug;
pub mod types;

pub use error::CoreError;
pub use keywords::KeywordIndex;
pub use resolver::{resolve, resolve_all};
pub use slug::slugify;
