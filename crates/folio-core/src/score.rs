//! Weighted term-matching relevance scorer.
//!
//! # Algorithm
//!
//! For every lower-cased query term, add:
//!
//! | Match | Weight |
//! |-------|--------|
//! | term is a substring of the title | 10 |
//! | term is a substring of any tag / technology | 8 |
//! | term is a substring of the short description | 5 |
//! | term is a substring of the category | 4 |
//! | term is a substring of the long text | 3 |
//! | no title substring, but fuzzy-close to the title (term ≥ 3 chars) | 2 |
//!
//! A featured document gets a flat 2 on top, but only when at least one term
//! matched. A score of zero excludes the document.

use crate::fuzzy;
use crate::models::SearchableDocument;

/// Per-field weights. [`Default`] carries the production values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub title: u32,
    pub tag: u32,
    pub category: u32,
    pub description: u32,
    pub long_text: u32,
    pub fuzzy_title: u32,
    pub featured: u32,
    /// Minimum normalized similarity for the fuzzy title bonus.
    pub fuzzy_threshold: f64,
    /// Terms shorter than this never get the fuzzy bonus.
    pub fuzzy_min_len: usize,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            title: 10,
            tag: 8,
            category: 4,
            description: 5,
            long_text: 3,
            fuzzy_title: 2,
            featured: 2,
            fuzzy_threshold: 0.8,
            fuzzy_min_len: 3,
        }
    }
}

/// Lower-case and whitespace-split a query. Never yields empty terms.
pub fn tokenize(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Score one document against pre-tokenized terms.
pub fn score_document(terms: &[String], doc: &SearchableDocument, weights: &ScoreWeights) -> u32 {
    let title = doc.title.to_lowercase();
    let description = doc.description.to_lowercase();
    let category = doc.category.as_deref().map(str::to_lowercase);
    let long_text = doc.long_text.as_deref().map(str::to_lowercase);
    let tags: Vec<String> = doc.tags.iter().map(|t| t.to_lowercase()).collect();

    let mut total = 0u32;
    for term in terms {
        let term = term.as_str();
        if term.is_empty() {
            continue;
        }

        let in_title = title.contains(term);
        if in_title {
            total += weights.title;
        }
        if tags.iter().any(|t| t.contains(term)) {
            total += weights.tag;
        }
        if category.as_deref().is_some_and(|c| c.contains(term)) {
            total += weights.category;
        }
        if description.contains(term) {
            total += weights.description;
        }
        if long_text.as_deref().is_some_and(|l| l.contains(term)) {
            total += weights.long_text;
        }
        if !in_title
            && term.chars().count() >= weights.fuzzy_min_len
            && fuzzy::is_fuzzy_match(term, &title, weights.fuzzy_threshold)
        {
            total += weights.fuzzy_title;
        }
    }

    if total > 0 && doc.featured {
        total += weights.featured;
    }
    total
}
