//! # Folio CLI (`folio`)
//!
//! ## Usage
//!
//! ```bash
//! folio --config ./config/folio.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `folio init` | Create the SQLite database and run schema migrations |
//! | `folio serve` | Start the HTTP API |
//! | `folio search "<query>"` | Search projects, posts and sections |
//! | `folio history list\|clear` | Show or clear recent searches |
//! | `folio blog list\|show\|import` | Inspect and import blog posts |
//! | `folio palette` | Interactive search overlay on stdin |
//!
//! Logs go to stderr and are filtered by `RUST_LOG` (default `folio=info`).

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use folio::{blog, config, migrate, palette, search, server};

/// Folio — search and blog backend for a portfolio site.
#[derive(Parser)]
#[command(name = "folio", version, about = "Search and blog backend for a portfolio site")]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/folio.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema. Safe to run repeatedly.
    Init,

    /// Start the HTTP server on `[server].bind`.
    Serve,

    /// Search projects, blog posts and page sections.
    Search {
        /// Search query.
        query: String,

        /// Maximum number of results (defaults to `[search].max_results`).
        #[arg(long)]
        limit: Option<usize>,

        /// Fetch blog posts from a running site instead of local content.
        #[arg(long)]
        remote: Option<String>,

        /// Do not record this query in search history.
        #[arg(long)]
        no_history: bool,
    },

    /// Recent search queries.
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Blog posts from the database and the posts directory.
    Blog {
        #[command(subcommand)]
        action: BlogAction,
    },

    /// Interactive search overlay: stdin lines are queries or `:keys`.
    Palette {
        /// Fetch blog posts from a running site instead of local content.
        #[arg(long)]
        remote: Option<String>,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// Most recent first.
    List,
    /// Forget every recorded query.
    Clear,
}

#[derive(Subcommand)]
enum BlogAction {
    /// List published posts, newest first.
    List,
    /// Print one post with its content.
    Show { slug: String },
    /// Import an MDX/Markdown file into the database (upsert by slug).
    Import { path: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("folio=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Search {
            query,
            limit,
            remote,
            no_history,
        } => {
            search::run_search(&cfg, &query, limit, remote, !no_history).await?;
        }
        Commands::History { action } => match action {
            HistoryAction::List => search::run_history_list(&cfg)?,
            HistoryAction::Clear => search::run_history_clear(&cfg)?,
        },
        Commands::Blog { action } => match action {
            BlogAction::List => blog::run_list(&cfg).await?,
            BlogAction::Show { slug } => blog::run_show(&cfg, &slug).await?,
            BlogAction::Import { path } => blog::run_import(&cfg, &path).await?,
        },
        Commands::Palette { remote } => {
            palette::run_palette(&cfg, remote).await?;
        }
    }

    Ok(())
}
