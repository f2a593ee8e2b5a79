//! # Folio Core
//!
//! Shared, runtime-agnostic logic for Folio: the searchable document model,
//! relevance scoring, snippet extraction, query history, candidate
//! aggregation, and command-palette navigation.
//!
//! This crate contains no tokio, sqlx, or filesystem I/O. Storage and
//! network access are reached through the [`history::KeyValueStore`] and
//! [`aggregate::BlogSource`] traits, which the application crate implements.

pub mod aggregate;
pub mod fuzzy;
pub mod history;
pub mod models;
pub mod palette;
pub mod score;
pub mod search;
pub mod snippet;
