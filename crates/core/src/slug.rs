//! Slug derivation for new product mappings.
//!
//! A slug is computed once from the mapping name when the mapping is created
//! and then used as its permanent id. Later renames do not touch it.

use std::sync::LazyLock;

use regex::Regex;

/// Runs of characters that are not allowed in a slug.
static NON_SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-z0-9]+").expect("valid regex"));

/// Derive a URL-safe slug from a human-readable name.
///
/// Lowercases, transliterates `æ`, `ø`, `å` to `ae`, `oe`, `aa`, replaces
/// every other run of non `[a-z0-9]` characters with a single `-` and trims
/// hyphens from both ends.
///
/// # Examples
///
/// ```
/// use kogebog_core::slug::slugify;
///
/// assert_eq!(slugify("SodaStream Cola 440 ml"), "sodastream-cola-440-ml");
/// assert_eq!(slugify("Æble & Øl"), "aeble-oel");
/// ```
pub fn slugify(name: &str) -> String {
    let lowered = name
        .to_lowercase()
        .replace('æ', "ae")
        .replace('ø', "oe")
        .replace('å', "aa");

    NON_SLUG_RE
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}
