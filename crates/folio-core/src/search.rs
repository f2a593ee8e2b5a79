//! In-memory search over a flat candidate list.
//!
//! # Pipeline
//!
//! 1. Tokenize the query ([`tokenize`]). An empty query returns nothing.
//! 2. Score every candidate ([`score_document`]); drop zeros.
//! 3. Stable sort by score (desc). Equal scores keep candidate order.
//! 4. Truncate to `max_results`.
//! 5. Attach a snippet from `long_text`, falling back to `description`.
//!
//! [`SearchGeneration`] lets asynchronous callers discard results that were
//! computed for a query the user has already replaced.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::models::{ScoredResult, SearchableDocument};
use crate::score::{score_document, tokenize, ScoreWeights};
use crate::snippet::extract_snippet;

/// Default cap on returned results.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Tuning parameters for a single search.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub max_results: usize,
    pub weights: ScoreWeights,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            weights: ScoreWeights::default(),
        }
    }
}

/// Rank `candidates` against `query`.
pub fn search(
    query: &str,
    candidates: &[SearchableDocument],
    options: &SearchOptions,
) -> Vec<ScoredResult> {
    let terms = tokenize(query);
    if terms.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(&SearchableDocument, u32)> = candidates
        .iter()
        .map(|doc| (doc, score_document(&terms, doc, &options.weights)))
        .filter(|(_, score)| *score > 0)
        .collect();

    // sort_by is stable: ties stay in candidate order
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.truncate(options.max_results);

    scored
        .into_iter()
        .map(|(doc, score)| {
            let source = doc.long_text.as_deref().unwrap_or(&doc.description);
            ScoredResult {
                document: doc.clone(),
                score,
                snippet: extract_snippet(source, &terms),
            }
        })
        .collect()
}

/// Opaque handle returned by [`SearchGeneration::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Monotonic generation counter for superseding in-flight searches.
#[derive(Debug, Default)]
pub struct SearchGeneration {
    current: AtomicU64,
}

impl SearchGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation, invalidating every earlier ticket.
    pub fn begin(&self) -> Ticket {
        Ticket(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether no newer search has begun since `ticket` was issued.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.current.load(Ordering::SeqCst) == ticket.0
    }
}
