//! Typed parsing of CSV-derived import records.
//!
//! CSV decoding happens upstream; each row arrives as a [`RawImportRecord`]
//! of optional strings. [`parse_record`] turns a row into either a
//! [`ValidRecord`] ready for the link API or a [`MalformedRecord`] carrying
//! the reason it was rejected. Malformed rows never reach the API.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::{default_country_codes, OptionStatus, ProductMapping, SupplierOption};
use crate::slug::slugify;
use crate::types::{MappingId, OptionId};

/// Separators accepted between country codes in an import row.
const COUNTRY_SEPARATORS: &[char] = &[',', ';', ' ', '|'];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One loosely typed row as produced by the CSV upload step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawImportRecord {
    pub name: Option<String>,
    pub ean: Option<String>,
    pub keywords: Option<String>,
    pub supplier: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub status: Option<String>,
    pub country_codes: Option<String>,
}

/// Supplier option part of a valid record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDraft {
    pub supplier: String,
    pub title: String,
    pub url: String,
    pub status: OptionStatus,
    pub country_codes: Vec<String>,
}

impl OptionDraft {
    /// Materialize the draft as a new option `id` owned by `mapping_id`.
    pub fn to_option(&self, id: OptionId, mapping_id: &str) -> SupplierOption {
        SupplierOption {
            id,
            mapping_id: mapping_id.to_string(),
            supplier: self.supplier.clone(),
            title: self.title.clone(),
            url: self.url.clone(),
            status: self.status,
            country_codes: self.country_codes.clone(),
            price_last_seen: None,
            updated_at: None,
        }
    }
}

/// A record that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRecord {
    /// 1-based position of the row in the upload.
    pub row: usize,
    pub mapping_id: MappingId,
    pub name: String,
    pub ean: Option<String>,
    pub keywords: String,
    pub option: Option<OptionDraft>,
}

impl ValidRecord {
    pub fn to_mapping(&self) -> ProductMapping {
        ProductMapping {
            id: self.mapping_id.clone(),
            name: self.name.clone(),
            ean: self.ean.clone(),
            keywords: self.keywords.clone(),
        }
    }
}

/// A record rejected before any API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRecord {
    pub row: usize,
    pub error: CoreError,
}

impl std::fmt::Display for MalformedRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {}: {}", self.row, self.error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedRecord {
    Valid(ValidRecord),
    Malformed(MalformedRecord),
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse every row, numbering rows from 1.
pub fn parse_records(records: &[RawImportRecord]) -> Vec<ParsedRecord> {
    records
        .iter()
        .enumerate()
        .map(|(i, raw)| parse_record(i + 1, raw))
        .collect()
}

/// Parse one row.
pub fn parse_record(row: usize, raw: &RawImportRecord) -> ParsedRecord {
    match validate_record(row, raw) {
        Ok(record) => ParsedRecord::Valid(record),
        Err(error) => ParsedRecord::Malformed(MalformedRecord { row, error }),
    }
}

fn validate_record(row: usize, raw: &RawImportRecord) -> Result<ValidRecord, CoreError> {
    let name = required(&raw.name, "name")?;
    let keywords = required(&raw.keywords, "keywords")?;

    let mapping_id = slugify(&name);
    if mapping_id.is_empty() {
        return Err(CoreError::Validation(format!(
            "Name '{name}' does not produce a usable id"
        )));
    }

    Ok(ValidRecord {
        row,
        mapping_id,
        option: parse_option(raw, &name)?,
        name,
        ean: non_blank(&raw.ean),
        keywords,
    })
}

/// An option is present when either `supplier` or `url` is given, and then
/// both are required.
fn parse_option(raw: &RawImportRecord, name: &str) -> Result<Option<OptionDraft>, CoreError> {
    let supplier = non_blank(&raw.supplier);
    let url = non_blank(&raw.url);

    let (supplier, url) = match (supplier, url) {
        (None, None) => return Ok(None),
        (Some(_), None) => return Err(CoreError::MissingField("url")),
        (None, Some(_)) => return Err(CoreError::MissingField("supplier")),
        (Some(supplier), Some(url)) => (supplier, url),
    };

    validate_url(&url)?;

    let status = match non_blank(&raw.status) {
        Some(s) => OptionStatus::from_str_value(&s)?,
        None => OptionStatus::default(),
    };

    Ok(Some(OptionDraft {
        supplier,
        title: non_blank(&raw.title).unwrap_or_else(|| name.to_string()),
        url,
        status,
        country_codes: parse_country_codes(raw.country_codes.as_deref())?,
    }))
}

/// Parse a country code list. Blank input yields the default set.
pub fn parse_country_codes(raw: Option<&str>) -> Result<Vec<String>, CoreError> {
    let mut codes: Vec<String> = Vec::new();
    for part in raw.unwrap_or_default().split(COUNTRY_SEPARATORS) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if part.len() != 2 || !part.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CoreError::Validation(format!(
                "Invalid country code '{part}'. Expected two letters, e.g. DK"
            )));
        }
        let code = part.to_ascii_uppercase();
        if !codes.contains(&code) {
            codes.push(code);
        }
    }

    if codes.is_empty() {
        return Ok(default_country_codes());
    }
    Ok(codes)
}

fn validate_url(url: &str) -> Result<(), CoreError> {
    if url.starts_with("https://") || url.starts_with("http://") {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid url '{url}'. Must start with http:// or https://"
        )))
    }
}

fn required(value: &Option<String>, field: &'static str) -> Result<String, CoreError> {
    non_blank(value).ok_or(CoreError::MissingField(field))
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn raw(name: &str, keywords: &str) -> RawImportRecord {
        RawImportRecord {
            name: Some(name.to_string()),
            keywords: Some(keywords.to_string()),
            ..Default::default()
        }
    }

    fn valid(parsed: ParsedRecord) -> ValidRecord {
        match parsed {
            ParsedRecord::Valid(record) => record,
            ParsedRecord::Malformed(m) => panic!("expected valid record, got {m}"),
        }
    }

    #[test]
    fn mapping_only_record() {
        let record = valid(parse_record(1, &raw("SodaStream Cola 440 ml", "cola, sodastream cola")));
        assert_eq!(record.mapping_id, "sodastream-cola-440-ml");
        assert!(record.option.is_none());
        assert!(record.ean.is_none());
    }

    #[test]
    fn record_with_option_fills_defaults() {
        let mut row = raw("Cola", "cola");
        row.supplier = Some("nemlig".into());
        row.url = Some("https://www.nemlig.com/cola".into());

        let option = valid(parse_record(1, &row)).option.unwrap();
        assert_eq!(option.title, "Cola");
        assert_eq!(option.status, OptionStatus::Active);
        assert_eq!(option.country_codes, vec!["DK", "US", "GB"]);
    }

    #[test]
    fn missing_name_is_malformed() {
        let row = RawImportRecord {
            keywords: Some("cola".into()),
            ..Default::default()
        };
        assert_matches!(
            parse_record(3, &row),
            ParsedRecord::Malformed(MalformedRecord { row: 3, error: CoreError::MissingField("name") })
        );
    }

    #[test]
    fn blank_keywords_are_malformed() {
        assert_matches!(
            parse_record(1, &raw("Cola", "   ")),
            ParsedRecord::Malformed(MalformedRecord { error: CoreError::MissingField("keywords"), .. })
        );
    }

    #[test]
    fn supplier_without_url_is_malformed() {
        let mut row = raw("Cola", "cola");
        row.supplier = Some("nemlig".into());
        assert_matches!(
            parse_record(1, &row),
            ParsedRecord::Malformed(MalformedRecord { error: CoreError::MissingField("url"), .. })
        );
    }

    #[test]
    fn bad_url_scheme_is_malformed() {
        let mut row = raw("Cola", "cola");
        row.supplier = Some("nemlig".into());
        row.url = Some("ftp://nemlig.com".into());
        assert_matches!(parse_record(1, &row), ParsedRecord::Malformed(_));
    }

    #[test]
    fn unusable_name_is_malformed() {
        assert_matches!(
            parse_record(1, &raw("???", "cola")),
            ParsedRecord::Malformed(MalformedRecord { error: CoreError::Validation(_), .. })
        );
    }

    #[test]
    fn country_codes_are_uppercased_and_deduplicated() {
        assert_eq!(
            parse_country_codes(Some("dk; se,DK |no")).unwrap(),
            vec!["DK", "SE", "NO"]
        );
    }

    #[test]
    fn blank_country_codes_use_default() {
        assert_eq!(parse_country_codes(Some("  ")).unwrap(), vec!["DK", "US", "GB"]);
        assert_eq!(parse_country_codes(None).unwrap(), vec!["DK", "US", "GB"]);
    }

    #[test]
    fn invalid_country_code_is_rejected() {
        assert_matches!(parse_country_codes(Some("DNK")), Err(CoreError::Validation(_)));
    }

    #[test]
    fn parse_records_numbers_rows_from_one() {
        let parsed = parse_records(&[raw("Cola", "cola"), RawImportRecord::default()]);
        assert_matches!(&parsed[0], ParsedRecord::Valid(ValidRecord { row: 1, .. }));
        assert_matches!(&parsed[1], ParsedRecord::Malformed(MalformedRecord { row: 2, .. }));
    }

    #[test]
    fn malformed_display_includes_row() {
        let malformed = MalformedRecord {
            row: 7,
            error: CoreError::MissingField("name"),
        };
        assert_eq!(malformed.to_string(), "row 7: Missing required field: name");
    }
}
