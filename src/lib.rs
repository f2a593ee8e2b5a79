//! # Folio
//!
//! Search and blog backend for a personal portfolio site.
//!
//! Projects and page sections come from a static TOML catalog; blog posts
//! come from SQLite rows and MDX files on disk. Everything is flattened into
//! searchable documents and ranked by the pure engine in [`folio_core`].
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐
//! │ site.toml    │   │ SQLite + MDX │
//! │ projects,    │   │ blog posts   │
//! │ sections     │   └──────┬───────┘
//! └──────┬───────┘          │ /api/blog or local
//!        └────────┬─────────┘
//!                 ▼
//!        ┌─────────────────┐
//!        │ folio_core      │
//!        │ score + snippet │
//!        └────────┬────────┘
//!          ┌──────┴──────┐
//!          ▼             ▼
//!     ┌─────────┐   ┌─────────┐
//!     │   CLI   │   │  HTTP   │
//!     └─────────┘   └─────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`db`] | SQLite connection |
//! | [`migrate`] | Schema migrations |
//! | [`mdx`] | Frontmatter parsing and post directory scan |
//! | [`blog`] | Post model, merge of database and file posts |
//! | [`site`] | Static project/section catalog |
//! | [`client`] | Blog sources for candidate aggregation |
//! | [`storage`] | File-backed key/value store for history |
//! | [`search`] | `folio search` and `folio history` |
//! | [`session`] | Debounced, stale-safe search session |
//! | [`palette`] | Interactive overlay loop |
//! | [`server`] | HTTP API |

pub mod blog;
pub mod client;
pub mod config;
pub mod db;
pub mod mdx;
pub mod migrate;
pub mod palette;
pub mod search;
pub mod server;
pub mod session;
pub mod site;
pub mod storage;
