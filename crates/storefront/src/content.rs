//! Markdown-backed static pages.
//!
//! Pages are loaded once at startup from `<content_dir>/pages/*.md`. Each
//! file starts with YAML frontmatter and the file stem is the page slug:
//!
//! ```markdown
//! ---
//! title: Shipping
//! description: Where and how we ship live plants
//! updated_at: 2026-03-01
//! ---
//!
//! We ship Monday through Wednesday so plants never sit in a depot over
//! the weekend.
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use comrak::{Options, markdown_to_html};
use gray_matter::{Matter, ParsedEntity, engine::YAML};
use serde::Deserialize;

/// Slugs the storefront links to from its footer.
pub const PAGE_SLUGS: &[&str] = &[
    "about-us",
    "contact-us",
    "faq",
    "privacy-policy",
    "refund-policy",
    "shipping",
    "terms-service",
];

/// Page frontmatter.
#[derive(Debug, Clone, Deserialize)]
pub struct PageMeta {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub updated_at: Option<NaiveDate>,
}

/// A rendered page with metadata and HTML content
#[derive(Debug, Clone)]
pub struct Page {
    pub slug: String,
    pub meta: PageMeta,
    pub content_html: String,
}

/// Pages held in memory for the life of the process.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    pages: Arc<HashMap<String, Page>>,
}

impl ContentStore {
    /// Load all pages under `content_dir`.
    ///
    /// A missing directory yields an empty store. Files that fail to parse
    /// are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the pages directory exists but cannot be read.
    pub fn load(content_dir: &Path) -> Result<Self, ContentError> {
        let pages = Self::load_pages(&content_dir.join("pages"))?;

        for slug in PAGE_SLUGS {
            if !pages.contains_key(*slug) {
                tracing::warn!(slug, "Linked page has no content file");
            }
        }

        Ok(Self {
            pages: Arc::new(pages),
        })
    }

    fn load_pages(dir: &Path) -> Result<HashMap<String, Page>, ContentError> {
        let mut pages = HashMap::new();

        if !dir.exists() {
            tracing::warn!(dir = %dir.display(), "Pages directory does not exist");
            return Ok(pages);
        }

        let entries = std::fs::read_dir(dir).map_err(|e| ContentError::Io(e.to_string()))?;

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "md") {
                match Self::load_page(&path) {
                    Ok(page) => {
                        tracing::debug!(slug = %page.slug, "Loaded page");
                        pages.insert(page.slug.clone(), page);
                    }
                    Err(e) => {
                        tracing::error!(path = %path.display(), error = %e, "Failed to load page");
                    }
                }
            }
        }

        tracing::info!(count = pages.len(), "Pages loaded");
        Ok(pages)
    }

    fn load_page(path: &Path) -> Result<Page, ContentError> {
        let content = std::fs::read_to_string(path).map_err(|e| ContentError::Io(e.to_string()))?;

        let slug = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ContentError::Parse("Invalid filename".to_string()))?
            .to_string();

        let (meta, body) = parse_page(&content)?;

        Ok(Page {
            slug,
            meta,
            content_html: render_markdown(&body),
        })
    }

    /// Get a page by slug
    #[must_use]
    pub fn get_page(&self, slug: &str) -> Option<&Page> {
        self.pages.get(slug)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Split a page file into frontmatter and markdown body.
fn parse_page(content: &str) -> Result<(PageMeta, String), ContentError> {
    let matter = Matter::<YAML>::new();
    let parsed: ParsedEntity<PageMeta> = matter
        .parse(content)
        .map_err(|e| ContentError::Parse(format!("Failed to parse frontmatter: {e}")))?;
    let meta = parsed
        .data
        .ok_or_else(|| ContentError::Parse("Missing frontmatter".to_string()))?;

    Ok((meta, parsed.content))
}

/// Render markdown to HTML with GitHub Flavored Markdown support.
fn render_markdown(content: &str) -> String {
    let mut options = Options::default();

    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.header_ids = Some(String::new());

    // Pages are authored in-repo; allow inline HTML such as contact links
    options.render.r#unsafe = true;

    markdown_to_html(content, &options)
}

/// Content loading errors
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    const FAQ: &str = "---\ntitle: FAQ\ndescription: Common questions\n---\n\n## Do you ship cuttings?\n\nYes, *rooted* cuttings only.\n";

    #[test]
    fn test_parse_page() {
        let (meta, body) = parse_page(FAQ).unwrap();
        assert_eq!(meta.title, "FAQ");
        assert_eq!(meta.description.as_deref(), Some("Common questions"));
        assert!(body.contains("Do you ship cuttings?"));
    }

    #[test]
    fn test_parse_page_requires_frontmatter() {
        assert!(parse_page("# Just a heading\n").is_err());
    }

    #[test]
    fn test_render_markdown() {
        let html = render_markdown("## Returns\n\nWithin **30 days**.");
        assert!(html.contains("<h2"));
        assert!(html.contains("<strong>30 days</strong>"));
    }

    #[test]
    fn test_load_pages_from_dir() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path();
        std::fs::create_dir_all(dir.join("pages")).unwrap();
        std::fs::write(dir.join("pages/faq.md"), FAQ).unwrap();
        std::fs::write(dir.join("pages/broken.md"), "no frontmatter").unwrap();
        std::fs::write(dir.join("pages/notes.txt"), FAQ).unwrap();

        let store = ContentStore::load(dir).unwrap();
        assert_eq!(store.len(), 1);
        let page = store.get_page("faq").unwrap();
        assert!(page.content_html.contains("<em>rooted</em>"));
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = ContentStore::load(&tmp.path().join("missing")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_bundled_pages_cover_footer_links() {
        let store = ContentStore::load(Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/content")))
            .unwrap();
        for slug in PAGE_SLUGS {
            assert!(store.get_page(slug).is_some(), "missing page {slug}");
        }
    }
}
