//! Flat-file blog posts: MDX/Markdown with YAML frontmatter.
//!
//! ```text
//! ---
//! title: Shipping a Rust CLI
//! description: Notes from packaging folio
//! date: 2024-03-18
//! tags: [rust, cli]
//! category: engineering
//! featured: true
//! ---
//! Body text...
//! ```
//!
//! The slug is the file stem unless the frontmatter sets `slug`. Files
//! that fail to parse are skipped with a warning so one bad post never
//! takes down the listing.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use std::path::Path;
use tracing::warn;
use walkdir::WalkDir;

use crate::blog::PostDraft;
use crate::config::ContentConfig;
use folio_core::models::PostOrigin;

/// Frontmatter keys understood by the blog.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Frontmatter {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub featured: bool,
    pub published: Option<bool>,
    pub slug: Option<String>,
}

/// Split a document into its raw frontmatter block and body.
///
/// Returns `None` for the frontmatter when the text does not open with a
/// `---` fence or the fence is never closed.
pub fn split_frontmatter(text: &str) -> (Option<&str>, &str) {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let rest = match text
        .strip_prefix("---\r\n")
        .or_else(|| text.strip_prefix("---\n"))
    {
        Some(rest) => rest,
        None => return (None, text),
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            let front = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (Some(front), body);
        }
        offset += line.len();
    }
    (None, text)
}

/// Parse one post file's contents into a draft.
pub fn parse_post(
    file_stem: &str,
    text: &str,
    modified: DateTime<Utc>,
) -> Result<PostDraft> {
    let (front, body) = split_frontmatter(text);
    let fm: Frontmatter = match front {
        Some(raw) if !raw.trim().is_empty() => {
            serde_yaml::from_str(raw).context("invalid frontmatter")?
        }
        _ => Frontmatter::default(),
    };

    let slug = fm.slug.clone().unwrap_or_else(|| file_stem.to_string());
    if slug.trim().is_empty() {
        bail!("post has an empty slug");
    }

    let date = match fm.date.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => modified.date_naive(),
    };

    Ok(PostDraft {
        title: fm.title.unwrap_or_else(|| slug.clone()),
        slug,
        description: fm.description.unwrap_or_default(),
        date,
        tags: fm.tags,
        category: fm.category,
        featured: fm.featured,
        published: fm.published.unwrap_or(true),
        content: body.trim().to_string(),
        origin: PostOrigin::File,
    })
}

/// Accepts `YYYY-MM-DD` and anything that starts with it (RFC 3339).
fn parse_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{}', expected YYYY-MM-DD", raw))
}

/// Read a single post file.
pub fn read_post_file(path: &Path) -> Result<PostDraft> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read post: {}", path.display()))?;
    let modified: DateTime<Utc> = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now());
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    parse_post(&stem, &text, modified).with_context(|| format!("in {}", path.display()))
}

/// Scan the posts directory. A missing directory yields no posts.
pub fn scan_posts(content: &ContentConfig) -> Result<Vec<PostDraft>> {
    let root = &content.posts_dir;
    if !root.exists() {
        warn!(dir = %root.display(), "posts directory does not exist");
        return Ok(Vec::new());
    }

    let include_set = build_globset(&content.include_globs)?;

    let mut posts = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        if !include_set.is_match(relative) {
            continue;
        }

        match read_post_file(path) {
            Ok(post) => posts.push(post),
            Err(e) => warn!("skipping blog post: {:#}", e),
        }
    }

    // Deterministic order before merging
    posts.sort_by(|a, b| a.slug.cmp(&b.slug));
    Ok(posts)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn mtime() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 7, 4, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_split_frontmatter() {
        let (front, body) = split_frontmatter("---\ntitle: Hi\n---\nBody\n");
        assert_eq!(front, Some("title: Hi\n"));
        assert_eq!(body, "Body\n");
    }

    #[test]
    fn test_split_without_fence() {
        let (front, body) = split_frontmatter("# Just markdown\n");
        assert!(front.is_none());
        assert_eq!(body, "# Just markdown\n");
    }

    #[test]
    fn test_unclosed_fence_is_body() {
        let text = "---\ntitle: Hi\nno closing fence\n";
        let (front, body) = split_frontmatter(text);
        assert!(front.is_none());
        assert_eq!(body, text);
    }

    #[test]
    fn test_parse_full_frontmatter() {
        let text = "---\r\ntitle: Shipping Rust\r\ndescription: Notes\r\ndate: 2024-03-18\r\ntags: [rust, cli]\r\ncategory: engineering\r\nfeatured: true\r\n---\r\nBody here";
        let post = parse_post("shipping-rust", text, mtime()).unwrap();
        assert_eq!(post.slug, "shipping-rust");
        assert_eq!(post.title, "Shipping Rust");
        assert_eq!(post.date, NaiveDate::from_ymd_opt(2024, 3, 18).unwrap());
        assert_eq!(post.tags, vec!["rust", "cli"]);
        assert_eq!(post.category.as_deref(), Some("engineering"));
        assert!(post.featured);
        assert!(post.published);
        assert_eq!(post.content, "Body here");
    }

    #[test]
    fn test_defaults_from_file() {
        let post = parse_post("untitled-note", "Just a body", mtime()).unwrap();
        assert_eq!(post.slug, "untitled-note");
        assert_eq!(post.title, "untitled-note");
        assert_eq!(post.date, NaiveDate::from_ymd_opt(2023, 7, 4).unwrap());
    }

    #[test]
    fn test_frontmatter_slug_and_draft() {
        let text = "---\nslug: custom\npublished: false\ndate: 2024-01-02T08:00:00Z\n---\nx";
        let post = parse_post("file-name", text, mtime()).unwrap();
        assert_eq!(post.slug, "custom");
        assert!(!post.published);
        assert_eq!(post.date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn test_bad_date_is_error() {
        let text = "---\ndate: yesterday\n---\nx";
        assert!(parse_post("p", text, mtime()).is_err());
    }

    #[test]
    fn test_scan_skips_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("good.mdx"),
            "---\ntitle: Good\ndate: 2024-02-01\n---\nok",
        )
        .unwrap();
        std::fs::write(dir.path().join("bad.mdx"), "---\ntitle: [unclosed\n---\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let content = ContentConfig {
            site: dir.path().join("site.toml"),
            posts_dir: dir.path().to_path_buf(),
            include_globs: vec!["**/*.mdx".to_string(), "**/*.md".to_string()],
        };
        let posts = scan_posts(&content).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "good");
    }
}
