//! Ingredient-to-mapping resolution.
//!
//! Two passes over a [`KeywordIndex`]:
//!
//! 1. Exact phrase: the first mapping (index order) owning a phrase equal to
//!    the normalized ingredient wins immediately.
//! 2. Word set: a phrase qualifies when it has exactly as many words as the
//!    ingredient and every ingredient word appears among the phrase words.
//!    The longest qualifying phrase (in characters) wins; ties keep the
//!    first one seen.
//!
//! The equal word count rule keeps a short keyword such as `vand` from
//! matching inside `vandmelon`. Phrase length is only a rough proxy for
//! specificity and the tie-break depends on index order.
//!
//! Resolution never fails. A miss is a normal outcome.

use crate::keywords::KeywordIndex;

/// Trim, lowercase and collapse internal whitespace to single spaces.
pub fn normalize_ingredient(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve an ingredient name to the best-matching mapping id.
pub fn resolve<'a>(ingredient: &str, index: &'a KeywordIndex) -> Option<&'a str> {
    let normalized = normalize_ingredient(ingredient);
    if normalized.is_empty() {
        return None;
    }

    for entry in index.iter() {
        if entry.phrases.iter().any(|phrase| *phrase == normalized) {
            return Some(entry.id.as_str());
        }
    }

    let ingredient_words: Vec<&str> = normalized.split(' ').collect();
    let mut best: Option<(&'a str, usize)> = None;

    for entry in index.iter() {
        for phrase in &entry.phrases {
            let keyword_words: Vec<&str> = phrase.split_whitespace().collect();
            if keyword_words.len() != ingredient_words.len() {
                continue;
            }
            if !ingredient_words
                .iter()
                .all(|word| keyword_words.contains(word))
            {
                continue;
            }

            let score = phrase.chars().count();
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((entry.id.as_str(), score));
            }
        }
    }

    best.map(|(id, _)| id)
}

/// Resolve every ingredient line of a recipe, in order.
pub fn resolve_all<'a, S: AsRef<str>>(
    ingredients: &[S],
    index: &'a KeywordIndex,
) -> Vec<Option<&'a str>> {
    ingredients
        .iter()
        .map(|ingredient| resolve(ingredient.as_ref(), index))
        .collect()
}
