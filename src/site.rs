//! Static site catalog: projects and page sections from a TOML file.
//!
//! ```toml
//! [[projects]]
//! id = "folio"
//! title = "Portfolio Site"
//! description = "This website"
//! technologies = ["Rust", "TypeScript"]
//! category = "web"
//! featured = true
//!
//! [[sections]]
//! id = "contact"
//! title = "Contact"
//! description = "Send me a message"
//! keywords = ["email", "hire"]
//! ```

use anyhow::{bail, Context, Result};
use std::collections::HashSet;
use std::path::Path;
use tracing::warn;

use folio_core::models::SiteCatalog;

/// Load and validate the catalog. A missing file yields an empty catalog.
pub fn load_catalog(path: &Path) -> Result<SiteCatalog> {
    if !path.exists() {
        warn!(path = %path.display(), "site catalog not found; searching blog posts only");
        return Ok(SiteCatalog::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read site catalog: {}", path.display()))?;
    let catalog: SiteCatalog = toml::from_str(&content)
        .with_context(|| format!("Failed to parse site catalog: {}", path.display()))?;

    validate(&catalog)?;
    Ok(catalog)
}

fn validate(catalog: &SiteCatalog) -> Result<()> {
    let mut seen = HashSet::new();
    for p in &catalog.projects {
        if p.id.trim().is_empty() || p.title.trim().is_empty() {
            bail!("every project needs a non-empty id and title");
        }
        if !seen.insert(format!("project:{}", p.id)) {
            bail!("duplicate project id: {}", p.id);
        }
    }
    for s in &catalog.sections {
        if s.id.trim().is_empty() || s.title.trim().is_empty() {
            bail!("every section needs a non-empty id and title");
        }
        if !seen.insert(format!("section:{}", s.id)) {
            bail!("duplicate section id: {}", s.id);
        }
    }
    Ok(())
}
