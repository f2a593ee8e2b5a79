//! Core data models shared by the search pipeline and the blog subsystem.
//!
//! Candidates from every origin (static projects, blog posts, page sections)
//! are flattened into [`SearchableDocument`]s before scoring, so the scorer
//! only ever sees one shape.

use serde::{Deserialize, Serialize};

/// The closed set of things a search can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentKind {
    Project,
    BlogPost,
    Section,
}

impl DocumentKind {
    /// Human-readable label used in CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Project => "project",
            DocumentKind::BlogPost => "blog",
            DocumentKind::Section => "section",
        }
    }
}

/// A candidate document eligible for matching against a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchableDocument {
    pub id: String,
    pub kind: DocumentKind,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_text: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub featured: bool,
    pub url: String,
}

/// A document that matched a query, with its relevance score and excerpt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredResult {
    #[serde(flatten)]
    pub document: SearchableDocument,
    /// Always > 0 for returned results.
    pub score: u32,
    pub snippet: String,
}

/// Where a blog post was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostOrigin {
    Database,
    File,
}

/// A blog post as listed by `GET /api/blog`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostSummary {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Publication date, `YYYY-MM-DD`.
    pub date: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub reading_time_minutes: u32,
    pub origin: PostOrigin,
}

impl BlogPostSummary {
    /// Public URL of the post on the site.
    pub fn url(&self) -> String {
        format!("/blog/{}", self.slug)
    }
}

impl From<&BlogPostSummary> for SearchableDocument {
    fn from(post: &BlogPostSummary) -> Self {
        SearchableDocument {
            id: format!("blog-{}", post.slug),
            kind: DocumentKind::BlogPost,
            title: post.title.clone(),
            description: post.description.clone(),
            long_text: if post.excerpt.is_empty() {
                None
            } else {
                Some(post.excerpt.clone())
            },
            tags: post.tags.clone(),
            category: post.category.clone(),
            featured: post.featured,
            url: post.url(),
        }
    }
}

/// A project entry in the static site catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectEntry {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub long_description: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub url: Option<String>,
}

/// A navigable page section (about, experience, contact, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct SectionEntry {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Statically configured part of the candidate set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteCatalog {
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
    #[serde(default)]
    pub sections: Vec<SectionEntry>,
}

impl From<&ProjectEntry> for SearchableDocument {
    fn from(p: &ProjectEntry) -> Self {
        SearchableDocument {
            id: format!("project-{}", p.id),
            kind: DocumentKind::Project,
            title: p.title.clone(),
            description: p.description.clone(),
            long_text: p.long_description.clone(),
            tags: p.technologies.clone(),
            category: p.category.clone(),
            featured: p.featured,
            url: p
                .url
                .clone()
                .unwrap_or_else(|| format!("/projects#{}", p.id)),
        }
    }
}

impl From<&SectionEntry> for SearchableDocument {
    fn from(s: &SectionEntry) -> Self {
        SearchableDocument {
            id: format!("section-{}", s.id),
            kind: DocumentKind::Section,
            title: s.title.clone(),
            description: s.description.clone(),
            long_text: None,
            tags: s.keywords.clone(),
            category: None,
            featured: false,
            url: s.url.clone().unwrap_or_else(|| format!("/#{}", s.id)),
        }
    }
}
