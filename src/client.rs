//! [`BlogSource`] implementations: remote `GET /api/blog` and local content.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::blog;
use crate::config::Config;
use folio_core::aggregate::BlogSource;
use folio_core::models::BlogPostSummary;

/// Response body of `GET /api/blog`.
#[derive(Debug, Deserialize)]
struct BlogListResponse {
    posts: Vec<BlogPostSummary>,
}

/// Fetches the post list from a running folio server (or any compatible API).
pub struct HttpBlogSource {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpBlogSource {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    /// Accepts a site root (`http://host:port`) or the full endpoint URL.
    pub fn for_site(base: &str, timeout: Duration) -> Result<Self> {
        let base = base.trim_end_matches('/');
        let endpoint = if base.ends_with("/api/blog") {
            base.to_string()
        } else {
            format!("{}/api/blog", base)
        };
        Self::new(endpoint, timeout)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl BlogSource for HttpBlogSource {
    fn describe(&self) -> String {
        self.endpoint.clone()
    }

    async fn fetch_posts(&self) -> Result<Vec<BlogPostSummary>> {
        let resp = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .with_context(|| format!("GET {} failed", self.endpoint))?;

        let status = resp.status();
        if !status.is_success() {
            bail!("GET {} returned {}", self.endpoint, status);
        }

        let body: BlogListResponse = resp
            .json()
            .await
            .with_context(|| format!("GET {} returned an unexpected body", self.endpoint))?;
        Ok(body.posts)
    }
}

/// Reads posts straight from SQLite and the posts directory.
pub struct LocalBlogSource {
    config: Config,
}

impl LocalBlogSource {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

#[async_trait]
impl BlogSource for LocalBlogSource {
    fn describe(&self) -> String {
        format!(
            "local ({} + {})",
            self.config.db.path.display(),
            self.config.content.posts_dir.display()
        )
    }

    async fn fetch_posts(&self) -> Result<Vec<BlogPostSummary>> {
        blog::list_posts(&self.config).await
    }
}

/// Pick the blog source for a search: explicit remote, configured remote,
/// or local content.
pub fn blog_source(config: &Config, remote: Option<&str>) -> Result<Box<dyn BlogSource>> {
    let timeout = Duration::from_secs(config.search.fetch_timeout_secs);
    match remote.or(config.search.blog_endpoint.as_deref()) {
        Some(url) => Ok(Box::new(HttpBlogSource::for_site(url, timeout)?)),
        None => Ok(Box::new(LocalBlogSource::new(config.clone()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_site_appends_endpoint() {
        let t = Duration::from_secs(1);
        let a = HttpBlogSource::for_site("http://localhost:4321/", t).unwrap();
        assert_eq!(a.endpoint(), "http://localhost:4321/api/blog");
        let b = HttpBlogSource::for_site("http://localhost:4321/api/blog", t).unwrap();
        assert_eq!(b.endpoint(), "http://localhost:4321/api/blog");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_error() {
        // Port 9 (discard) on loopback is expected to refuse connections.
        let source =
            HttpBlogSource::new("http://127.0.0.1:9/api/blog", Duration::from_secs(2)).unwrap();
        assert!(source.fetch_posts().await.is_err());
    }
}
