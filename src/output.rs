//! CLI output formatting for both pipeline stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Every page leads with
//! its positional index and title; the source file and site path follow as
//! indented context lines. Pages are grouped by language so a missing
//! translation stands out next to its siblings.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! English (4 pages)
//! 001 Home
//!     Source: index.html
//! 002 About Me
//!     Source: about.md → /about.html
//!
//! Portuguese (3 pages)
//! 001 Início
//!     Source: pt/index.html
//!
//! Missing translations
//!     /resume.html (no pt)
//!
//! Config
//!     config.toml
//!     fragments/ (header, footer, favicon, analytics)
//!     data/projects.json
//!     assets/
//! ```
//!
//! ## Generate
//!
//! ```text
//! /index.html → index.html
//! /pt/about.html → pt/about.html (unchanged)
//!     Missing fragments: analytics.html
//!
//! Projects: 5 loaded, 1 needs migration
//! Assets: 3 files copied
//! Generated 7 pages: 2 unchanged, 5 written (7 total)
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions only read
//! the filesystem to report which optional inputs exist.

use crate::fragment::Fragment;
use crate::generate::GenerateResult;
use crate::scan::Manifest;
use crate::types::{Lang, PageEntry};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn lang_name(lang: Lang) -> &'static str {
    match lang {
        Lang::En => "English",
        Lang::Pt => "Portuguese",
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Source line; the site path is only shown when it differs from the source.
fn source_line(page: &PageEntry) -> String {
    if page.output_path() == page.source_path {
        format!("{}Source: {}", indent(1), page.source_path)
    } else {
        format!(
            "{}Source: {} → {}",
            indent(1),
            page.source_path,
            page.url_path
        )
    }
}

// ============================================================================
// Scan
// ============================================================================

/// Format scan stage output showing discovered pages per language.
pub fn format_scan_output(manifest: &Manifest, source_root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    for lang in Lang::ALL {
        let pages: Vec<&PageEntry> = manifest.pages_in(lang).collect();
        if pages.is_empty() {
            continue;
        }
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(format!("{} ({})", lang_name(lang), plural(pages.len(), "page")));
        for (i, page) in pages.iter().enumerate() {
            lines.push(format!("{} {}", format_index(i + 1), page.title));
            lines.push(source_line(page));
        }
    }

    let missing: Vec<&PageEntry> = manifest.missing_translations().collect();
    if !missing.is_empty() {
        lines.push(String::new());
        lines.push("Missing translations".to_string());
        for page in missing {
            lines.push(format!(
                "{}{} (no {})",
                indent(1),
                page.url_path,
                page.lang.other()
            ));
        }
    }

    // Config section
    let paths = &manifest.config.paths;
    lines.push(String::new());
    lines.push("Config".to_string());
    if source_root.join("config.toml").exists() {
        lines.push(format!("{}config.toml", indent(1)));
    }
    let fragments_dir = source_root.join(&paths.fragments);
    if fragments_dir.is_dir() {
        let present: Vec<&str> = Fragment::ALL
            .iter()
            .filter(|f| fragments_dir.join(f.file_name()).exists())
            .map(|f| f.file_name().trim_end_matches(".html"))
            .collect();
        lines.push(format!(
            "{}{}/ ({})",
            indent(1),
            paths.fragments,
            present.join(", ")
        ));
    }
    if source_root.join(&paths.projects).is_file() {
        lines.push(format!("{}{}", indent(1), paths.projects));
    }
    if source_root.join(&paths.assets).is_dir() {
        lines.push(format!("{}{}/", indent(1), paths.assets));
    }

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(manifest: &Manifest, source_root: &Path) {
    for line in format_scan_output(manifest, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate
// ============================================================================

/// Format generate stage output: one line per page plus a summary.
pub fn format_generate_output(result: &GenerateResult) -> Vec<String> {
    let mut lines = Vec::new();

    let mut pages: Vec<_> = result.pages.iter().collect();
    pages.sort_by(|a, b| a.url_path.cmp(&b.url_path));
    for page in pages {
        let marker = if page.written { "" } else { " (unchanged)" };
        lines.push(format!("{} → {}{}", page.url_path, page.output_path, marker));
        if !page.report.fragments_missing.is_empty() {
            lines.push(format!(
                "{}Missing fragments: {}",
                indent(1),
                page.report.fragments_missing.join(", ")
            ));
        }
    }

    lines.push(String::new());
    lines.push(match result.projects_loaded {
        Some(n) if result.projects_needing_migration > 0 => format!(
            "Projects: {} loaded, {} needs migration",
            n, result.projects_needing_migration
        ),
        Some(n) => format!("Projects: {} loaded", n),
        None => "Projects: unavailable (error message rendered)".to_string(),
    });
    lines.push(format!(
        "Assets: {} copied",
        plural(result.assets_copied, "file")
    ));
    lines.push(format!(
        "Generated {}: {}",
        plural(result.pages.len(), "page"),
        result.cache_stats
    ));

    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(result: &GenerateResult) {
    for line in format_generate_output(result) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
