use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub content: ContentConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ContentConfig {
    /// TOML file listing projects and page sections.
    pub site: PathBuf,
    /// Directory of `.mdx` / `.md` blog posts.
    pub posts_dir: PathBuf,
    #[serde(default = "default_post_globs")]
    pub include_globs: Vec<String>,
}

fn default_post_globs() -> Vec<String> {
    vec!["**/*.mdx".to_string(), "**/*.md".to_string()]
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Remote `GET /api/blog` endpoint. When unset, posts are read locally.
    #[serde(default)]
    pub blog_endpoint: Option<String>,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            debounce_ms: default_debounce_ms(),
            blog_endpoint: None,
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

fn default_max_results() -> usize {
    folio_core::search::DEFAULT_MAX_RESULTS
}
fn default_debounce_ms() -> u64 {
    300
}
fn default_fetch_timeout_secs() -> u64 {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct HistoryConfig {
    /// JSON file standing in for browser local storage.
    #[serde(default = "default_history_path")]
    pub path: PathBuf,
    #[serde(default = "default_history_capacity")]
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: default_history_path(),
            capacity: default_history_capacity(),
        }
    }
}

fn default_history_path() -> PathBuf {
    PathBuf::from("./data/local-storage.json")
}
fn default_history_capacity() -> usize {
    folio_core::history::DEFAULT_CAPACITY
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.search.max_results == 0 {
        anyhow::bail!("search.max_results must be >= 1");
    }

    if config.history.capacity == 0 {
        anyhow::bail!("history.capacity must be >= 1");
    }

    if let Some(endpoint) = &config.search.blog_endpoint {
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            anyhow::bail!(
                "search.blog_endpoint must be an http(s) URL, got '{}'",
                endpoint
            );
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    const MINIMAL: &str = r#"
[db]
path = "./data/folio.sqlite"

[content]
site = "./content/site.toml"
posts_dir = "./content/posts"

[server]
bind = "127.0.0.1:4321"
"#;

    #[test]
    fn test_defaults_applied() {
        let file = write_config(MINIMAL);
        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.search.max_results, 10);
        assert_eq!(cfg.search.debounce_ms, 300);
        assert!(cfg.search.blog_endpoint.is_none());
        assert_eq!(cfg.history.capacity, 10);
        assert_eq!(cfg.content.include_globs.len(), 2);
    }

    #[test]
    fn test_rejects_zero_max_results() {
        let file = write_config(&format!("{}\n[search]\nmax_results = 0\n", MINIMAL));
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("max_results"));
    }

    #[test]
    fn test_rejects_non_http_endpoint() {
        let file = write_config(&format!(
            "{}\n[search]\nblog_endpoint = \"ftp://example.com\"\n",
            MINIMAL
        ));
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_config(Path::new("/nonexistent/folio.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/folio.toml"));
    }
}
