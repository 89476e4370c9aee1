//! Content scanning and manifest generation.
//!
//! Stage 1 of the folio build pipeline. Walks the content directory, finds
//! every page body in both languages and produces a [`Manifest`] that the
//! generate stage consumes.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                         # Content root
//! ├── config.toml                  # Site configuration (optional)
//! ├── fragments/                   # Shared snippets, not pages
//! │   ├── header.html
//! │   ├── footer.html
//! │   └── pt/header.html           # Per-language override (optional)
//! ├── data/projects.json           # Project cards, not a page
//! ├── assets/                      # Copied verbatim, not pages
//! ├── index.html                   # → /index.html
//! ├── about.md                     # → /about.html (Markdown body)
//! ├── projects/
//! │   └── portfolio.html           # → /projects/portfolio.html
//! └── pt/                          # Portuguese mirror
//!     ├── index.html               # → /pt/index.html
//!     └── about.md                 # → /pt/about.html
//! ```
//!
//! ## Rules
//!
//! - `.html`/`.htm` files are HTML bodies, `.md` files are Markdown bodies.
//!   Anything else outside the asset folder is ignored.
//! - Hidden entries and `config.toml` are skipped, as are the configured
//!   fragment, asset and data locations.
//! - Page title is the first `# heading` (Markdown) or `<h1>` (HTML), with
//!   the file stem as fallback.
//! - Two sources mapping to the same output (`about.md` and `about.html`)
//!   are an error.
//! - A page without a counterpart in the other language is reported, not
//!   rejected.

use crate::config::{self, SiteConfig};
use crate::lang;
use crate::location::Location;
use crate::types::{Lang, PageEntry, PageFormat};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Content root not found: {0}")]
    MissingRoot(PathBuf),
    #[error("{first} and {second} both generate {url_path}")]
    DuplicateOutput {
        url_path: String,
        first: String,
        second: String,
    },
}

/// Manifest output from the scan stage
#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
    /// All pages, sorted by url path
    pub pages: Vec<PageEntry>,
    pub config: SiteConfig,
}

impl Manifest {
    /// Pages lacking a counterpart in the other language.
    pub fn missing_translations(&self) -> impl Iterator<Item = &PageEntry> {
        self.pages.iter().filter(|p| !p.has_translation)
    }

    pub fn pages_in(&self, lang: Lang) -> impl Iterator<Item = &PageEntry> {
        self.pages.iter().filter(move |p| p.lang == lang)
    }
}

pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::MissingRoot(root.to_path_buf()));
    }

    // Load site config (uses defaults if config.toml doesn't exist)
    let config = config::load_config(root)?;

    let mut pages = collect_pages(root, &config)?;
    mark_translations(&mut pages);

    for page in pages.iter().filter(|p| !p.has_translation) {
        tracing::warn!(
            page = %page.url_path,
            missing = %page.lang.other(),
            "Page has no translation"
        );
    }

    Ok(Manifest { pages, config })
}

/// Top-level locations that hold site inputs rather than pages.
fn reserved_paths(root: &Path, config: &SiteConfig) -> Vec<PathBuf> {
    let mut reserved = vec![
        root.join("config.toml"),
        root.join(&config.paths.fragments),
        root.join(&config.paths.assets),
        root.join(&config.paths.projects),
    ];
    if let Some(data_dir) = Path::new(&config.paths.projects).parent()
        && !data_dir.as_os_str().is_empty()
    {
        reserved.push(root.join(data_dir));
    }
    reserved
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

fn page_format(path: &Path) -> Option<PageFormat> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    match ext.as_str() {
        "html" | "htm" => Some(PageFormat::Html),
        "md" => Some(PageFormat::Markdown),
        _ => None,
    }
}

fn collect_pages(root: &Path, config: &SiteConfig) -> Result<Vec<PageEntry>, ScanError> {
    let reserved = reserved_paths(root, config);
    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            !is_hidden(&e.file_name().to_string_lossy()) && !reserved.iter().any(|r| r == e.path())
        });

    let mut by_url: BTreeMap<String, PageEntry> = BTreeMap::new();
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(format) = page_format(entry.path()) else {
            tracing::debug!(path = %entry.path().display(), "Skipping non-page file");
            continue;
        };
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        let page = build_page(root, rel, format)?;
        if let Some(existing) = by_url.get(&page.url_path) {
            return Err(ScanError::DuplicateOutput {
                url_path: page.url_path,
                first: existing.source_path.clone(),
                second: page.source_path,
            });
        }
        by_url.insert(page.url_path.clone(), page);
    }
    Ok(by_url.into_values().collect())
}

/// Content-relative path with forward slashes regardless of platform.
fn slash_path(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn build_page(root: &Path, rel: &Path, format: PageFormat) -> Result<PageEntry, ScanError> {
    let source_path = slash_path(rel);
    let url_path = match format {
        PageFormat::Markdown => format!("/{}", slash_path(&rel.with_extension("html"))),
        PageFormat::Html => format!("/{source_path}"),
    };
    let content = fs::read_to_string(root.join(rel))?;
    let stem = rel
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let title = match format {
        PageFormat::Markdown => markdown_title(&content),
        PageFormat::Html => html_title(&content),
    }
    .unwrap_or_else(|| stem.replace('-', " "));

    Ok(PageEntry {
        lang: Location::parse(&url_path).lang(),
        source_path,
        url_path,
        title,
        format,
        has_translation: false,
    })
}

fn mark_translations(pages: &mut [PageEntry]) {
    let urls: HashSet<String> = pages.iter().map(|p| p.url_path.clone()).collect();
    for page in pages.iter_mut() {
        page.has_translation = lang::switch_path(&page.url_path, page.lang.other())
            .is_some_and(|counterpart| urls.contains(&counterpart));
    }
}

fn markdown_title(content: &str) -> Option<String> {
    content
        .lines()
        .find(|line| line.starts_with("# "))
        .map(|line| line.trim_start_matches("# ").trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Text of the first `<h1>`, with nested tags dropped.
fn html_title(content: &str) -> Option<String> {
    let lower = content.to_ascii_lowercase();
    let open = lower.find("<h1")?;
    let after_open = open + lower[open..].find('>')? + 1;
    let close = after_open + lower[after_open..].find("</h1")?;
    let raw = &content[after_open..close];

    let mut text = String::new();
    let mut in_tag = false;
    for c in raw.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    let title = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!title.is_empty()).then_some(title)
}
