//! Blog post listing: SQLite rows merged with flat MDX files.
//!
//! Posts live in two places. Rows in the `posts` table are edited through
//! the database; `.mdx` files under `content.posts_dir` are committed with
//! the site. [`list_posts`] merges both:
//!
//! 1. Load every row and every parseable file.
//! 2. A database row replaces a file with the same slug.
//! 3. Drop unpublished posts.
//! 4. Sort by date (desc), then slug (asc).
//!
//! Used by the `folio blog` commands, `GET /api/blog`, and the local
//! [`BlogSource`](folio_core::aggregate::BlogSource) for search.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::db;
use crate::mdx;
use folio_core::models::{BlogPostSummary, PostOrigin};

/// Words per minute used for the reading-time estimate.
const WORDS_PER_MINUTE: usize = 200;
/// Maximum chars in a listing excerpt.
const EXCERPT_CHARS: usize = 280;

/// A post before it is summarized for listing.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub featured: bool,
    pub published: bool,
    pub content: String,
    pub origin: PostOrigin,
}

/// A full post as returned by `GET /api/blog/{slug}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    #[serde(flatten)]
    pub summary: BlogPostSummary,
    pub content: String,
}

impl PostDraft {
    pub fn summary(&self) -> BlogPostSummary {
        BlogPostSummary {
            slug: self.slug.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            date: self.date.format("%Y-%m-%d").to_string(),
            tags: self.tags.clone(),
            category: self.category.clone(),
            featured: self.featured,
            excerpt: excerpt(&self.content),
            reading_time_minutes: reading_time_minutes(&self.content),
            origin: self.origin,
        }
    }

    pub fn into_post(self) -> BlogPost {
        BlogPost {
            summary: self.summary(),
            content: self.content,
        }
    }
}

/// Plain-text lead of an MDX body: import/export lines, fenced code and
/// markup dropped.
pub fn excerpt(content: &str) -> String {
    let mut words: Vec<&str> = Vec::new();
    let mut in_fence = false;
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if trimmed.starts_with("import ") || trimmed.starts_with("export ") {
            continue;
        }
        if trimmed.starts_with('<') {
            continue;
        }
        words.extend(trimmed.split_whitespace());
    }

    let cleaned: Vec<String> = words
        .iter()
        .map(|w| w.trim_matches(|c: char| matches!(c, '#' | '*' | '_' | '`' | '>')))
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect();
    let joined = cleaned.join(" ");

    if joined.chars().count() <= EXCERPT_CHARS {
        joined
    } else {
        let mut cut: String = joined.chars().take(EXCERPT_CHARS).collect();
        cut.push_str("...");
        cut
    }
}

pub fn reading_time_minutes(content: &str) -> u32 {
    let words = content.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as u32
}

/// Merge database and file posts. See the module docs for the rules.
pub fn merge_posts(db_posts: Vec<PostDraft>, file_posts: Vec<PostDraft>) -> Vec<PostDraft> {
    let mut by_slug: HashMap<String, PostDraft> = HashMap::new();
    for post in file_posts {
        by_slug.insert(post.slug.clone(), post);
    }
    for post in db_posts {
        if let Some(shadowed) = by_slug.insert(post.slug.clone(), post) {
            debug!(slug = %shadowed.slug, "database post overrides file");
        }
    }

    let mut merged: Vec<PostDraft> = by_slug.into_values().filter(|p| p.published).collect();
    merged.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));
    merged
}

/// Load every row of the `posts` table, published or not.
pub async fn load_db_posts(pool: &SqlitePool) -> Result<Vec<PostDraft>> {
    let rows = sqlx::query(
        "SELECT slug, title, description, content, category, tags_json, featured, published, created_at FROM posts",
    )
    .fetch_all(pool)
    .await?;

    let mut posts = Vec::with_capacity(rows.len());
    for row in rows {
        let slug: String = row.get("slug");
        let tags_json: String = row.get("tags_json");
        let tags: Vec<String> = serde_json::from_str(&tags_json).unwrap_or_else(|e| {
            warn!(slug = %slug, error = %e, "ignoring malformed tags_json");
            Vec::new()
        });
        let created_at: i64 = row.get("created_at");
        let date = DateTime::from_timestamp(created_at, 0)
            .map(|dt| dt.date_naive())
            .unwrap_or_default();

        posts.push(PostDraft {
            slug,
            title: row.get("title"),
            description: row.get("description"),
            date,
            tags,
            category: row.get("category"),
            featured: row.get::<i64, _>("featured") != 0,
            published: row.get::<i64, _>("published") != 0,
            content: row.get("content"),
            origin: PostOrigin::Database,
        });
    }
    Ok(posts)
}

/// Merged, published posts with full content.
pub async fn load_posts(config: &Config) -> Result<Vec<PostDraft>> {
    let pool = db::connect(config).await?;
    let db_posts = if db::is_initialized(&pool).await? {
        load_db_posts(&pool).await?
    } else {
        warn!("database not initialized (run `folio init`); listing file posts only");
        Vec::new()
    };
    pool.close().await;

    let file_posts = mdx::scan_posts(&config.content)?;
    Ok(merge_posts(db_posts, file_posts))
}

/// Core listing function (used by CLI, server, and local search).
pub async fn list_posts(config: &Config) -> Result<Vec<BlogPostSummary>> {
    Ok(load_posts(config).await?.iter().map(PostDraft::summary).collect())
}

/// Fetch one published post by slug.
pub async fn get_post(config: &Config, slug: &str) -> Result<BlogPost> {
    match load_posts(config).await?.into_iter().find(|p| p.slug == slug) {
        Some(post) => Ok(post.into_post()),
        None => bail!("post not found: {}", slug),
    }
}

/// Upsert an MDX file into the `posts` table. Returns the slug.
pub async fn import_post(config: &Config, path: &Path) -> Result<String> {
    let draft = mdx::read_post_file(path)?;
    let pool = db::connect(config).await?;
    if !db::is_initialized(&pool).await? {
        pool.close().await;
        bail!("database not initialized; run `folio init` first");
    }

    let created_at = draft
        .date
        .and_hms_opt(0, 0, 0)
        .context("invalid post date")?
        .and_utc()
        .timestamp();
    let now = Utc::now().timestamp();
    let tags_json = serde_json::to_string(&draft.tags)?;

    sqlx::query(
        r#"
        INSERT INTO posts (id, slug, title, description, content, category, tags_json,
                           featured, published, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(slug) DO UPDATE SET
            title = excluded.title,
            description = excluded.description,
            content = excluded.content,
            category = excluded.category,
            tags_json = excluded.tags_json,
            featured = excluded.featured,
            published = excluded.published,
            created_at = excluded.created_at,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&draft.slug)
    .bind(&draft.title)
    .bind(&draft.description)
    .bind(&draft.content)
    .bind(&draft.category)
    .bind(&tags_json)
    .bind(draft.featured as i64)
    .bind(draft.published as i64)
    .bind(created_at)
    .bind(now)
    .execute(&pool)
    .await?;

    pool.close().await;
    Ok(draft.slug)
}

/// CLI entry point for `folio blog list`.
pub async fn run_list(config: &Config) -> Result<()> {
    let posts = list_posts(config).await?;
    if posts.is_empty() {
        println!("No posts.");
        return Ok(());
    }

    for post in &posts {
        let marker = if post.featured { " *" } else { "" };
        println!(
            "{}  {:<32} {}{}",
            post.date, post.slug, post.title, marker
        );
        if !post.tags.is_empty() {
            println!("            tags: {}", post.tags.join(", "));
        }
    }
    println!();
    println!("{} posts", posts.len());
    Ok(())
}

/// CLI entry point for `folio blog show <slug>`.
pub async fn run_show(config: &Config, slug: &str) -> Result<()> {
    let post = get_post(config, slug).await?;
    let s = &post.summary;

    println!("--- Post ---");
    println!("slug:         {}", s.slug);
    println!("title:        {}", s.title);
    println!("date:         {}", s.date);
    if let Some(ref category) = s.category {
        println!("category:     {}", category);
    }
    if !s.tags.is_empty() {
        println!("tags:         {}", s.tags.join(", "));
    }
    println!("featured:     {}", s.featured);
    println!("reading time: {} min", s.reading_time_minutes);
    println!(
        "origin:       {}",
        match s.origin {
            PostOrigin::Database => "database",
            PostOrigin::File => "file",
        }
    );
    println!();
    println!("--- Content ---");
    println!("{}", post.content);
    Ok(())
}

/// CLI entry point for `folio blog import <path>`.
pub async fn run_import(config: &Config, path: &Path) -> Result<()> {
    let slug = import_post(config, path).await?;
    println!("Imported post '{}'.", slug);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(slug: &str, date: (i32, u32, u32), origin: PostOrigin) -> PostDraft {
        PostDraft {
            slug: slug.to_string(),
            title: format!("{} title", slug),
            description: String::new(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            tags: vec![],
            category: None,
            featured: false,
            published: true,
            content: "one two three".to_string(),
            origin,
        }
    }

    #[test]
    fn test_db_row_overrides_file() {
        let file = draft("hello", (2024, 1, 1), PostOrigin::File);
        let mut row = draft("hello", (2024, 2, 1), PostOrigin::Database);
        row.title = "From DB".to_string();
        let merged = merge_posts(vec![row], vec![file]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].title, "From DB");
        assert_eq!(merged[0].origin, PostOrigin::Database);
    }

    #[test]
    fn test_unpublished_posts_hidden() {
        let mut hidden = draft("draft", (2024, 3, 1), PostOrigin::File);
        hidden.published = false;
        let merged = merge_posts(vec![], vec![hidden, draft("live", (2024, 1, 1), PostOrigin::File)]);
        let slugs: Vec<&str> = merged.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["live"]);
    }

    #[test]
    fn test_unpublished_db_row_hides_file() {
        let file = draft("retired", (2024, 1, 1), PostOrigin::File);
        let mut row = draft("retired", (2024, 1, 1), PostOrigin::Database);
        row.published = false;
        assert!(merge_posts(vec![row], vec![file]).is_empty());
    }

    #[test]
    fn test_sorted_newest_first_then_slug() {
        let merged = merge_posts(
            vec![draft("b", (2024, 5, 1), PostOrigin::Database)],
            vec![
                draft("a", (2024, 5, 1), PostOrigin::File),
                draft("old", (2023, 1, 1), PostOrigin::File),
                draft("new", (2025, 1, 1), PostOrigin::File),
            ],
        );
        let slugs: Vec<&str> = merged.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["new", "a", "b", "old"]);
    }

    #[test]
    fn test_excerpt_strips_mdx() {
        let body = "import Chart from './chart'\n\n# Heading\n\nSome **bold** text.\n<Chart />\n";
        assert_eq!(excerpt(body), "Heading Some bold text.");
    }

    #[test]
    fn test_excerpt_skips_fenced_code() {
        let body = "Intro line.\n\n```rust\nfn main() {\n    println!(\"hi\");\n}\n```\n\nAfter the code.\n";
        assert_eq!(excerpt(body), "Intro line. After the code.");
    }

    #[test]
    fn test_excerpt_unclosed_fence_drops_rest() {
        let body = "Lead.\n```\nlet x = 1;\n";
        assert_eq!(excerpt(body), "Lead.");
    }

    #[test]
    fn test_excerpt_truncates() {
        let body = "word ".repeat(200);
        let e = excerpt(&body);
        assert!(e.ends_with("..."));
        assert_eq!(e.chars().count(), EXCERPT_CHARS + 3);
    }

    #[test]
    fn test_reading_time() {
        assert_eq!(reading_time_minutes(""), 1);
        assert_eq!(reading_time_minutes(&"w ".repeat(200)), 1);
        assert_eq!(reading_time_minutes(&"w ".repeat(201)), 2);
    }

    #[test]
    fn test_summary_formats_date() {
        let s = draft("x", (2024, 3, 9), PostOrigin::File).summary();
        assert_eq!(s.date, "2024-03-09");
        assert_eq!(s.reading_time_minutes, 1);
    }
}
