//! Link data model: product mappings, supplier options and suppliers.
//!
//! These are the wire shapes exchanged with the link API. Field names are
//! snake_case on the wire.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{MappingId, OptionId, SupplierId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Characters separating keyword phrases in a mapping's raw keyword field.
pub const KEYWORD_DELIMITERS: &[char] = &[',', ';'];

/// Countries an option is valid for when none are given.
pub const DEFAULT_COUNTRY_CODES: &[&str] = &["DK", "US", "GB"];

pub const OPTION_STATUS_ACTIVE: &str = "active";
pub const OPTION_STATUS_INACTIVE: &str = "inactive";

// ---------------------------------------------------------------------------
// Product mapping
// ---------------------------------------------------------------------------

/// Canonical product entry that recipe ingredients resolve to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductMapping {
    /// Slug derived from the name at creation. Never changes afterwards.
    pub id: MappingId,
    pub name: String,
    #[serde(default)]
    pub ean: Option<String>,
    /// Raw keyword field, phrases separated by `,` or `;`.
    #[serde(default)]
    pub keywords: String,
}

impl ProductMapping {
    /// Normalized keyword phrases of this mapping, in field order.
    pub fn keyword_phrases(&self) -> Vec<String> {
        split_keywords(&self.keywords)
    }
}

/// Split a raw keyword field into trimmed, lowercased, non-empty phrases.
pub fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(KEYWORD_DELIMITERS)
        .map(|phrase| phrase.trim().to_lowercase())
        .filter(|phrase| !phrase.is_empty())
        .collect()
}

/// Partial update of a mapping. The id is not part of the payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ean: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
}

// ---------------------------------------------------------------------------
// Option status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionStatus {
    #[default]
    Active,
    Inactive,
}

impl OptionStatus {
    /// Parse a status string (case-insensitive, surrounding whitespace ignored).
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s.trim().to_lowercase().as_str() {
            OPTION_STATUS_ACTIVE => Ok(Self::Active),
            OPTION_STATUS_INACTIVE => Ok(Self::Inactive),
            other => Err(CoreError::Validation(format!(
                "Invalid option status '{other}'. Must be one of: {OPTION_STATUS_ACTIVE}, {OPTION_STATUS_INACTIVE}"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => OPTION_STATUS_ACTIVE,
            Self::Inactive => OPTION_STATUS_INACTIVE,
        }
    }
}

impl std::fmt::Display for OptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Supplier option
// ---------------------------------------------------------------------------

/// One supplier's purchasable link for a mapping. Owned by the mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierOption {
    pub id: OptionId,
    pub mapping_id: MappingId,
    pub supplier: SupplierId,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub status: OptionStatus,
    #[serde(default = "default_country_codes")]
    pub country_codes: Vec<String>,
    #[serde(default)]
    pub price_last_seen: Option<f64>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

impl SupplierOption {
    /// Generate an option id that `is_taken` does not reject.
    ///
    /// Starts from the creation millis and steps forward one millisecond at
    /// a time, so ids stay `{supplier}-{millis}` shaped and ordered.
    pub fn generate_unique_id<F>(supplier: &str, created_at: Timestamp, is_taken: F) -> OptionId
    where
        F: Fn(&str) -> bool,
    {
        let mut millis = created_at.timestamp_millis();
        loop {
            let id = format!("{supplier}-{millis}");
            if !is_taken(&id) {
                return id;
            }
            millis += 1;
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == OptionStatus::Active
    }

    /// Whether the link is valid for the given ISO country code.
    pub fn serves_country(&self, country: &str) -> bool {
        self.country_codes
            .iter()
            .any(|code| code.eq_ignore_ascii_case(country))
    }
}

/// The default country set as owned strings.
pub fn default_country_codes() -> Vec<String> {
    DEFAULT_COUNTRY_CODES.iter().map(|c| c.to_string()).collect()
}

/// Partial update of a supplier option.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OptionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_codes: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Supplier
// ---------------------------------------------------------------------------

/// A shop that supplier options point into. Options reference suppliers
/// weakly; deleting a supplier does not touch its options here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}
