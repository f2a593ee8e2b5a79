//! Candidate aggregation for a search session.
//!
//! The static catalog (projects and page sections) is always available.
//! Blog posts come from a [`BlogSource`] fetched once per session; a failed
//! fetch is logged and the session continues without blog posts.

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::models::{BlogPostSummary, SearchableDocument, SiteCatalog};

/// Provider of the blog post listing.
#[async_trait]
pub trait BlogSource: Send + Sync {
    /// Short label used in log lines (e.g. an endpoint URL).
    fn describe(&self) -> String;

    async fn fetch_posts(&self) -> Result<Vec<BlogPostSummary>>;
}

/// Build the flat candidate list: projects, then blog posts, then sections.
pub async fn collect_candidates(
    catalog: &SiteCatalog,
    blog: Option<&dyn BlogSource>,
) -> Vec<SearchableDocument> {
    let posts = match blog {
        Some(source) => match source.fetch_posts().await {
            Ok(posts) => {
                debug!(source = %source.describe(), count = posts.len(), "fetched blog posts");
                posts
            }
            Err(e) => {
                warn!(source = %source.describe(), error = %e, "blog fetch failed; searching without blog posts");
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    let mut candidates =
        Vec::with_capacity(catalog.projects.len() + posts.len() + catalog.sections.len());
    candidates.extend(catalog.projects.iter().map(SearchableDocument::from));
    candidates.extend(posts.iter().map(SearchableDocument::from));
    candidates.extend(catalog.sections.iter().map(SearchableDocument::from));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentKind, PostOrigin, ProjectEntry, SectionEntry};

    struct FixedSource(Vec<BlogPostSummary>);

    #[async_trait]
    impl BlogSource for FixedSource {
        fn describe(&self) -> String {
            "fixed".to_string()
        }
        async fn fetch_posts(&self) -> Result<Vec<BlogPostSummary>> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl BlogSource for FailingSource {
        fn describe(&self) -> String {
            "failing".to_string()
        }
        async fn fetch_posts(&self) -> Result<Vec<BlogPostSummary>> {
            anyhow::bail!("connection refused")
        }
    }

    fn catalog() -> SiteCatalog {
        SiteCatalog {
            projects: vec![ProjectEntry {
                id: "site".to_string(),
                title: "Portfolio Site".to_string(),
                description: "This site".to_string(),
                long_description: None,
                technologies: vec!["TypeScript".to_string()],
                category: Some("web".to_string()),
                featured: true,
                url: None,
            }],
            sections: vec![SectionEntry {
                id: "contact".to_string(),
                title: "Contact".to_string(),
                description: "Get in touch".to_string(),
                keywords: vec!["email".to_string()],
                url: None,
            }],
        }
    }

    fn post(slug: &str) -> BlogPostSummary {
        BlogPostSummary {
            slug: slug.to_string(),
            title: slug.to_string(),
            description: String::new(),
            date: "2024-05-01".to_string(),
            tags: vec![],
            category: None,
            featured: false,
            excerpt: String::new(),
            reading_time_minutes: 1,
            origin: PostOrigin::Database,
        }
    }

    #[tokio::test]
    async fn test_order_is_projects_posts_sections() {
        let source = FixedSource(vec![post("hello")]);
        let docs = collect_candidates(&catalog(), Some(&source as &dyn BlogSource)).await;
        let kinds: Vec<DocumentKind> = docs.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![DocumentKind::Project, DocumentKind::BlogPost, DocumentKind::Section]
        );
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_static_candidates() {
        let docs = collect_candidates(&catalog(), Some(&FailingSource as &dyn BlogSource)).await;
        assert_eq!(docs.len(), 2);
        assert!(docs.iter().all(|d| d.kind != DocumentKind::BlogPost));
    }

    #[tokio::test]
    async fn test_no_source() {
        let docs = collect_candidates(&catalog(), None).await;
        assert_eq!(docs.len(), 2);
    }
}
