//! Shared test utilities for the folio test suite.
//!
//! Provides fixture setup and manifest lookups that panic with the available
//! values on a miss, so a failing test says what it did find.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let manifest = scan(tmp.path()).unwrap();
//!
//! let about = find_page(&manifest, "/pt/about.html");
//! assert!(about.has_translation);
//! assert_eq!(page_urls(&manifest, Lang::Pt), vec!["/pt/about.html", ...]);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::scan::Manifest;
use crate::types::{Lang, PageEntry};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Manifest lookups
// =========================================================================

/// Find a page by url path. Panics if not found.
pub fn find_page<'a>(manifest: &'a Manifest, url_path: &str) -> &'a PageEntry {
    manifest
        .pages
        .iter()
        .find(|p| p.url_path == url_path)
        .unwrap_or_else(|| {
            let urls: Vec<&str> = manifest.pages.iter().map(|p| p.url_path.as_str()).collect();
            panic!("page '{url_path}' not found. Available: {urls:?}")
        })
}

/// Url paths of all pages in one language, in manifest order.
pub fn page_urls(manifest: &Manifest, lang: Lang) -> Vec<&str> {
    manifest
        .pages_in(lang)
        .map(|p| p.url_path.as_str())
        .collect()
}
