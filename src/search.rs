//! `folio search` and `folio history`.
//!
//! A CLI search runs one full session: aggregate candidates (static
//! catalog plus one blog fetch), rank them with
//! [`folio_core::search::search`], print, and record the query in history.

use anyhow::Result;

use crate::client;
use crate::config::Config;
use crate::site;
use crate::storage::FileStorage;
use folio_core::aggregate::collect_candidates;
use folio_core::history::HistoryStore;
use folio_core::models::{ScoredResult, SearchableDocument};
use folio_core::search::{search, SearchOptions};

/// Search options derived from config, with an optional per-call limit.
pub fn search_options(config: &Config, limit: Option<usize>) -> SearchOptions {
    SearchOptions {
        max_results: limit.unwrap_or(config.search.max_results).max(1),
        ..SearchOptions::default()
    }
}

/// Gather every candidate for one session.
pub async fn build_candidates(
    config: &Config,
    remote: Option<&str>,
) -> Result<Vec<SearchableDocument>> {
    let catalog = site::load_catalog(&config.content.site)?;
    let source = client::blog_source(config, remote)?;
    Ok(collect_candidates(&catalog, Some(&*source)).await)
}

pub fn open_history(config: &Config) -> HistoryStore<FileStorage> {
    HistoryStore::open(
        FileStorage::new(config.history.path.clone()),
        config.history.capacity,
    )
}

pub async fn run_search(
    config: &Config,
    query: &str,
    limit: Option<usize>,
    remote: Option<String>,
    record_history: bool,
) -> Result<()> {
    if query.trim().is_empty() {
        println!("No results.");
        return Ok(());
    }

    let candidates = build_candidates(config, remote.as_deref()).await?;
    let results = search(query, &candidates, &search_options(config, limit));

    if record_history {
        open_history(config).record(query);
    }

    if results.is_empty() {
        println!("No results.");
        return Ok(());
    }

    print_results(&results, None);
    Ok(())
}

/// Print ranked results; `highlight` marks the selected row.
pub fn print_results(results: &[ScoredResult], highlight: Option<usize>) {
    for (i, result) in results.iter().enumerate() {
        let marker = if highlight == Some(i) { ">" } else { " " };
        println!(
            "{}{}. [{}] {} / {}",
            marker,
            i + 1,
            result.score,
            result.document.kind.label(),
            result.document.title
        );
        println!("    url: {}", result.document.url);
        if !result.document.tags.is_empty() {
            println!("    tags: {}", result.document.tags.join(", "));
        }
        if !result.snippet.is_empty() {
            println!(
                "    excerpt: \"{}\"",
                result.snippet.replace('\n', " ").trim()
            );
        }
        println!();
    }
}

pub fn run_history_list(config: &Config) -> Result<()> {
    let history = open_history(config);
    if history.is_empty() {
        println!("No search history.");
        return Ok(());
    }
    for (i, query) in history.entries().iter().enumerate() {
        println!("{:>2}. {}", i + 1, query);
    }
    Ok(())
}

pub fn run_history_clear(config: &Config) -> Result<()> {
    let mut history = open_history(config);
    history.clear();
    println!("Search history cleared.");
    Ok(())
}
