//! Picking the supplier option to show as a purchase link.

use crate::model::SupplierOption;

/// Choose the option to link for a resolved mapping.
///
/// Prefers the first active option of the mapping that serves `country`,
/// then falls back to the first active option of the mapping. Inactive
/// options are never returned.
pub fn select_option<'a>(
    options: &'a [SupplierOption],
    mapping_id: &str,
    country: &str,
) -> Option<&'a SupplierOption> {
    let mut candidates = options
        .iter()
        .filter(|option| option.mapping_id == mapping_id && option.is_active());

    let first = candidates.next()?;
    if first.serves_country(country) {
        return Some(first);
    }
    candidates
        .find(|option| option.serves_country(country))
        .or(Some(first))
}
