/// Product mapping identifiers are permanent slugs derived from the mapping name.
pub type MappingId = String;

/// Supplier option identifiers (`{supplier}-{unix_millis}`).
pub type OptionId = String;

pub type SupplierId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
