//! Page location parsing.
//!
//! Every generated page needs two facts about where it sits in the site tree:
//! how many `../` steps lead back to the site root, and which language it is
//! in. Both are derived from the page's site path alone, so the same content
//! renders correctly whether it lives at `/about.html`, `/pt/about.html` or
//! `/pt/projects/portfolio.html`.
//!
//! ```text
//! /                            → path_to_root ""       lang en  filename ""
//! /index.html                  → path_to_root ""       lang en  filename "index.html"
//! /pt/index.html               → path_to_root "../"    lang pt  filename "index.html"
//! /projects/portfolio.html     → path_to_root "../"    lang en  filename "portfolio.html"
//! /pt/projects/                → path_to_root "../../" lang pt  filename ""
//! ```
//!
//! A trailing segment only counts as the filename when it looks like a page
//! file (`*.html`, `*.htm`). Anything else is a directory level, which is what
//! makes both flat (`page.html`) and folder (`folder/`) layouts resolve.

use crate::types::Lang;

const PAGE_EXTENSIONS: &[&str] = &[".html", ".htm"];
const PT_SEGMENT: &str = "pt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    path: String,
    segments: Vec<String>,
    filename: String,
}

impl Location {
    pub fn parse(path: &str) -> Self {
        let mut segments: Vec<String> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        let filename = match segments.last() {
            Some(last) if is_page_file(last) => segments.pop().unwrap_or_default(),
            _ => String::new(),
        };

        Self {
            path: path.to_string(),
            segments,
            filename,
        }
    }

    /// The path this location was parsed from, unmodified.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Directory segments, excluding the page filename.
    pub fn directories(&self) -> &[String] {
        &self.segments
    }

    /// Page filename, or empty for a directory index request.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// One `../` per directory level.
    pub fn path_to_root(&self) -> String {
        "../".repeat(self.segments.len())
    }

    pub fn lang(&self) -> Lang {
        match self.segments.first() {
            Some(first) if first == PT_SEGMENT => Lang::Pt,
            _ => Lang::En,
        }
    }

    /// Prefix reaching the root of this page's language tree.
    pub fn lang_root(&self) -> String {
        format!("{}{}", self.path_to_root(), self.lang().dir_prefix())
    }
}

fn is_page_file(segment: &str) -> bool {
    let lower = segment.to_ascii_lowercase();
    PAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}
