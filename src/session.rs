//! Debounced search session.
//!
//! Each [`SearchSession::submit`] begins a new generation, sleeps for the
//! debounce delay, and publishes its results only if no newer submission
//! arrived in the meantime. A slow search can therefore never overwrite the
//! results of a query the user typed after it.

use anyhow::Result;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::Config;
use crate::search::{build_candidates, search_options};
use folio_core::models::{ScoredResult, SearchableDocument};
use folio_core::search::{search, SearchGeneration, SearchOptions};

#[derive(Debug, Default, Clone)]
struct Published {
    query: String,
    results: Vec<ScoredResult>,
}

#[derive(Clone)]
pub struct SearchSession {
    candidates: Arc<Vec<SearchableDocument>>,
    options: SearchOptions,
    debounce: Duration,
    generation: Arc<SearchGeneration>,
    published: Arc<Mutex<Published>>,
}

impl SearchSession {
    pub fn new(
        candidates: Vec<SearchableDocument>,
        options: SearchOptions,
        debounce: Duration,
    ) -> Self {
        Self {
            candidates: Arc::new(candidates),
            options,
            debounce,
            generation: Arc::new(SearchGeneration::new()),
            published: Arc::new(Mutex::new(Published::default())),
        }
    }

    /// Aggregate candidates once and build a session from config.
    pub async fn open(config: &Config, remote: Option<&str>) -> Result<Self> {
        let candidates = build_candidates(config, remote).await?;
        debug!(candidates = candidates.len(), "search session ready");
        Ok(Self::new(
            candidates,
            search_options(config, None),
            Duration::from_millis(config.search.debounce_ms),
        ))
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    /// Schedule a debounced search. The handle resolves to `true` when this
    /// submission's results were published.
    pub fn submit(&self, query: &str) -> JoinHandle<bool> {
        let ticket = self.generation.begin();
        let query = query.to_string();
        let session = self.clone();

        tokio::spawn(async move {
            tokio::time::sleep(session.debounce).await;
            if !session.generation.is_current(ticket) {
                debug!(query = %query, "search superseded before running");
                return false;
            }

            let results = search(&query, &session.candidates, &session.options);

            if !session.generation.is_current(ticket) {
                debug!(query = %query, "search superseded before publishing");
                return false;
            }
            match session.published.lock() {
                Ok(mut published) => {
                    published.query = query;
                    published.results = results;
                    true
                }
                Err(_) => false,
            }
        })
    }

    /// Results of the most recently published search.
    pub fn results(&self) -> Vec<ScoredResult> {
        self.published
            .lock()
            .map(|p| p.results.clone())
            .unwrap_or_default()
    }

    /// Query that produced [`results`](Self::results).
    pub fn published_query(&self) -> String {
        self.published
            .lock()
            .map(|p| p.query.clone())
            .unwrap_or_default()
    }
}
