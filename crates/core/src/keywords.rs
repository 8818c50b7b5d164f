//! Keyword index over a snapshot of product mappings.
//!
//! The index is an ordered projection of mapping id to normalized keyword
//! phrases. Order follows the mapping list it was built from; the resolver's
//! tie-breaks depend on it. An index is never patched: a changed mapping set
//! means building a new one.

use crate::model::ProductMapping;
use crate::types::MappingId;

/// One mapping's normalized keyword phrases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedMapping {
    pub id: MappingId,
    pub phrases: Vec<String>,
}

/// Immutable, ordered keyword index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordIndex {
    entries: Vec<IndexedMapping>,
}

impl KeywordIndex {
    /// Build an index from mappings in the given order.
    ///
    /// Mappings without any usable phrase are kept; they simply never match.
    pub fn build(mappings: &[ProductMapping]) -> Self {
        let entries = mappings
            .iter()
            .map(|mapping| IndexedMapping {
                id: mapping.id.clone(),
                phrases: mapping.keyword_phrases(),
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexedMapping> {
        self.entries.iter()
    }

    /// Phrases for a mapping, or `None` if the mapping is not indexed.
    pub fn phrases(&self, id: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.phrases.as_slice())
    }
}
