//! HTML site generation.
//!
//! Stage 2 of the folio build pipeline. Takes the scan manifest and composes
//! every page into a complete HTML document.
//!
//! ## Composition
//!
//! Each page body starts as a [`PageDocument`] and goes through the same
//! steps, all driven by its [`PageContext`]:
//!
//! 1. Header fragment, prepended to the body
//! 2. Navigation, language controls and theme toggle, into the header's mount points
//! 3. Footer (appended), favicon and analytics (head)
//! 4. Project cards, into whichever project containers the body has
//!
//! A missing fragment or container only skips its own step. Pages are
//! composed in parallel; the project list is loaded once and shared.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── about.html
//! ├── projects/portfolio.html
//! ├── pt/
//! │   ├── index.html
//! │   └── about.html
//! ├── assets/                    # Copied from content/assets
//! └── .build-cache.json          # Output write cache
//! ```
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time and inlined into every page:
//! - `static/style.css`: Base styles (colors injected from config)
//! - `static/theme.js`: Runtime theme toggle
//!
//! Pages are built in the light state; the script applies a stored dark
//! preference before first paint.

use crate::cache::{self, CacheManifest, CacheStats};
use crate::config::{self, SiteConfig};
use crate::context::PageContext;
use crate::document::PageDocument;
use crate::fragment::{self, Fragment, FragmentSource, FsFragments};
use crate::lang;
use crate::nav;
use crate::projects::{self, Project, ProjectsError};
use crate::scan::Manifest;
use crate::theme::{self, THEME_SCRIPT, Theme, ThemeView};
use crate::types::{Lang, PageEntry, PageFormat};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Options, Parser, html as md_html};
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Asset copy failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Failed to read page {path}: {source}")]
    PageSource {
        path: String,
        source: std::io::Error,
    },
}

const CSS_STATIC: &str = include_str!("../static/style.css");

/// Shared, read-only inputs for composing any page.
pub struct Site<'a> {
    pub config: &'a SiteConfig,
    pub fragments: &'a dyn FragmentSource,
    pub projects: &'a Result<Vec<Project>, ProjectsError>,
    pub css: &'a str,
}

/// What happened while composing one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeReport {
    pub fragments_missing: Vec<&'static str>,
    pub nav: bool,
    pub project_containers: usize,
}

/// Result of generating one page.
#[derive(Debug, Clone)]
pub struct GeneratedPage {
    pub url_path: String,
    pub output_path: String,
    pub content_hash: String,
    pub written: bool,
    pub report: ComposeReport,
}

/// Summary of the generate stage.
#[derive(Debug)]
pub struct GenerateResult {
    pub pages: Vec<GeneratedPage>,
    pub cache_stats: CacheStats,
    pub assets_copied: usize,
    /// `None` when the project list failed to load.
    pub projects_loaded: Option<usize>,
    pub projects_needing_migration: usize,
}

pub fn generate(
    manifest: &Manifest,
    source_root: &Path,
    output_dir: &Path,
    use_cache: bool,
) -> Result<GenerateResult, GenerateError> {
    let config = &manifest.config;

    let fragments = FsFragments::new(source_root.join(&config.paths.fragments));
    let projects = projects::load(&source_root.join(&config.paths.projects));
    if let Err(e) = &projects {
        tracing::warn!(error = %e, "Project list unavailable, containers will show an error");
    }

    // Generate CSS with colors from config
    let color_css = config::generate_color_css(&config.colors);
    let css = format!("{}\n\n{}", color_css, CSS_STATIC);

    let site = Site {
        config,
        fragments: &fragments,
        projects: &projects,
        css: &css,
    };

    fs::create_dir_all(output_dir)?;
    let mut cache = if use_cache {
        CacheManifest::load(output_dir)
    } else {
        CacheManifest::empty()
    };

    let pages: Vec<GeneratedPage> = manifest
        .pages
        .par_iter()
        .map(|page| generate_page(page, &site, source_root, output_dir, &cache))
        .collect::<Result<_, _>>()?;

    let mut cache_stats = CacheStats::default();
    for page in &pages {
        if page.written {
            cache_stats.miss();
        } else {
            cache_stats.hit();
        }
        cache.insert(page.output_path.clone(), page.content_hash.clone());
    }
    cache.retain_paths(pages.iter().map(|p| p.output_path.as_str()));
    cache.save(output_dir)?;

    let assets_copied = copy_assets(
        &source_root.join(&config.paths.assets),
        &output_dir.join(&config.paths.assets),
    )?;

    let (projects_loaded, projects_needing_migration) = match &projects {
        Ok(list) => (
            Some(list.len()),
            list.iter().filter(|p| p.needs_migration).count(),
        ),
        Err(_) => (None, 0),
    };

    Ok(GenerateResult {
        pages,
        cache_stats,
        assets_copied,
        projects_loaded,
        projects_needing_migration,
    })
}

fn generate_page(
    page: &PageEntry,
    site: &Site<'_>,
    source_root: &Path,
    output_dir: &Path,
    cache: &CacheManifest,
) -> Result<GeneratedPage, GenerateError> {
    let source = fs::read_to_string(source_root.join(&page.source_path)).map_err(|source| {
        GenerateError::PageSource {
            path: page.source_path.clone(),
            source,
        }
    })?;
    let body = match page.format {
        PageFormat::Html => source,
        PageFormat::Markdown => render_markdown(&source),
    };

    let (html, report) = compose_page(page, &body, site);
    let html = html.into_string();
    let content_hash = cache::hash_content(&html);
    let output_path = page.output_path().to_string();

    let written = if cache.is_fresh(&output_path, &content_hash, output_dir) {
        false
    } else {
        let target = output_dir.join(&output_path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, &html)?;
        true
    };

    Ok(GeneratedPage {
        url_path: page.url_path.clone(),
        output_path,
        content_hash,
        written,
        report,
    })
}

fn render_markdown(source: &str) -> String {
    let parser = Parser::new_ext(source, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH);
    let mut body_html = String::new();
    md_html::push_html(&mut body_html, parser);
    format!("<main>{body_html}</main>")
}

/// Compose one page body into a full document.
pub fn compose_page(page: &PageEntry, body: &str, site: &Site<'_>) -> (Markup, ComposeReport) {
    let ctx = PageContext::new(&page.url_path, Theme::Light);
    let view = ThemeView::of(ctx.theme);
    let mut doc = PageDocument::new(body);
    let mut report = ComposeReport::default();

    // Header first: nav and toggles mount inside it
    if !fragment::load_default(site.fragments, &ctx, &mut doc, Fragment::Header) {
        report.fragments_missing.push(Fragment::Header.file_name());
    }
    report.nav = nav::apply(&mut doc, &ctx, site.config.nav.table(ctx.lang()));
    lang::apply(&mut doc, &ctx.location);
    theme::apply(&mut doc, &view);

    for fragment in [Fragment::Footer, Fragment::Favicon, Fragment::Analytics] {
        if !fragment::load_default(site.fragments, &ctx, &mut doc, fragment) {
            report.fragments_missing.push(fragment.file_name());
        }
    }

    report.project_containers =
        projects::apply(&mut doc, &ctx, site.projects, site.config.projects.featured);

    let title = page_title(&page.title, &site.config.site_title);
    let alternate = page
        .has_translation
        .then(|| {
            let other = ctx.lang().other();
            lang::switch_href(&ctx.location, other).map(|href| (other, href))
        })
        .flatten();

    let markup = base_document(&ctx, &view, &title, site.css, alternate, &doc);
    (markup, report)
}

fn page_title(title: &str, site_title: &str) -> String {
    if title.is_empty() || title == site_title {
        site_title.to_string()
    } else {
        format!("{title} · {site_title}")
    }
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure around a composed page.
fn base_document(
    ctx: &PageContext,
    view: &ThemeView,
    title: &str,
    css: &str,
    alternate: Option<(Lang, String)>,
    doc: &PageDocument,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(ctx.lang().html_lang()) class=[view.html_class] data-theme=(view.data_theme) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                @if let Some((other, href)) = alternate {
                    link rel="alternate" hreflang=(other.html_lang()) href=(href);
                }
                style { (PreEscaped(css)) }
                script { (PreEscaped(THEME_SCRIPT)) }
                (PreEscaped(&doc.head))
            }
            body {
                (PreEscaped(&doc.body))
            }
        }
    }
}

/// Copy the asset tree verbatim. Returns the number of files copied.
fn copy_assets(src: &Path, dst: &Path) -> Result<usize, GenerateError> {
    if !src.is_dir() {
        tracing::debug!(path = %src.display(), "No assets directory");
        return Ok(0);
    }
    let mut copied = 0;
    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry?;
        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

// ============================================================================
// Tests
// ============================================================================
