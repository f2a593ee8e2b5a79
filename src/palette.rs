//! `folio palette`: line-driven search overlay.
//!
//! Each stdin line is either a query (runs a debounced search) or a key
//! prefixed with `:` (`:down`, `:enter`, `:esc`, `:ctrl+k`, ...). Selecting a
//! result records the query in history and prints the destination URL.

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::config::Config;
use crate::search::{open_history, print_results};
use crate::session::SearchSession;
use folio_core::models::ScoredResult;
use folio_core::palette::{Key, KeyChord, Overlay, OverlayAction, OverlayMode};

pub async fn run_palette(config: &Config, remote: Option<String>) -> Result<()> {
    let session = SearchSession::open(config, remote.as_deref()).await?;
    let mut history = open_history(config);
    let mut overlay = Overlay::new();
    let mut results: Vec<ScoredResult> = Vec::new();

    println!(
        "{} documents loaded. Type a query, or :ctrl+k / :up / :down / :enter / :esc.",
        session.candidate_count()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(key) = line.strip_prefix(':') {
            let chord = match KeyChord::parse(key) {
                Ok(c) => c,
                Err(e) => {
                    println!("{}", e);
                    continue;
                }
            };
            match overlay.handle(&chord) {
                OverlayAction::Opened(mode) => {
                    println!("[{}]", mode_label(mode));
                    if results.is_empty() && !history.is_empty() {
                        println!("Recent searches:");
                        for q in history.entries() {
                            println!("  {}", q);
                        }
                    }
                }
                OverlayAction::Highlight(i) => print_results(&results, Some(i)),
                OverlayAction::Select(i) => {
                    if let Some(result) = results.get(i) {
                        history.record(&session.published_query());
                        println!("Open {}", result.document.url);
                    }
                    overlay.handle(&KeyChord::plain(Key::Escape));
                    results.clear();
                }
                OverlayAction::Closed => {
                    results.clear();
                    println!("Closed.");
                }
                OverlayAction::Ignored => {}
            }
            continue;
        }

        if overlay.mode() == OverlayMode::Closed {
            overlay.handle(&KeyChord::command('/'));
        }
        if !session.submit(line).await? {
            continue;
        }
        results = session.results();
        overlay.set_result_count(results.len());
        if results.is_empty() {
            println!("No results.");
        } else {
            print_results(&results, Some(overlay.selected()));
        }
    }

    Ok(())
}

fn mode_label(mode: OverlayMode) -> &'static str {
    match mode {
        OverlayMode::Closed => "closed",
        OverlayMode::Search => "search",
        OverlayMode::Palette => "palette",
    }
}
