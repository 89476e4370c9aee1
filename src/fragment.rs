//! Shared page fragments.
//!
//! Four HTML snippets are injected into every page: the header (which carries
//! the nav, theme and language mount points), the footer, the favicon tags and
//! the analytics tag. Fragments live in `fragments/` under the content root.
//! A language folder (`fragments/pt/header.html`) overrides the shared file
//! for pages in that language.
//!
//! Fragments can reference the site root with two placeholders, substituted
//! per page:
//!
//! - `{{root}}`: relative prefix to the site root (`../../`)
//! - `{{lang_root}}`: relative prefix to the page's language root (`../../pt/`)
//!
//! A fragment that cannot be loaded is logged and skipped. The page is still
//! written, just without that region.

use crate::context::PageContext;
use crate::document::{InsertionMode, InsertionPoint, PageDocument};
use crate::types::Lang;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FragmentError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("fragment {0} not found")]
    NotFound(String),
    #[error("fragment {0} is empty")]
    Empty(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fragment {
    Header,
    Footer,
    Favicon,
    Analytics,
}

impl Fragment {
    pub const ALL: [Fragment; 4] = [
        Fragment::Header,
        Fragment::Footer,
        Fragment::Favicon,
        Fragment::Analytics,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Fragment::Header => "header.html",
            Fragment::Footer => "footer.html",
            Fragment::Favicon => "favicon.html",
            Fragment::Analytics => "analytics.html",
        }
    }

    /// Where this fragment goes in every page.
    pub fn placement(self) -> (InsertionPoint, InsertionMode) {
        match self {
            Fragment::Header => (InsertionPoint::Body, InsertionMode::AfterBegin),
            Fragment::Footer => (InsertionPoint::Body, InsertionMode::BeforeEnd),
            Fragment::Favicon | Fragment::Analytics => {
                (InsertionPoint::Head, InsertionMode::BeforeEnd)
            }
        }
    }
}

/// Source of raw fragment markup.
pub trait FragmentSource: Sync {
    fn fetch(&self, fragment: Fragment, lang: Lang) -> Result<String, FragmentError>;
}

/// Reads fragments from a directory on disk.
#[derive(Debug, Clone)]
pub struct FsFragments {
    dir: PathBuf,
}

impl FsFragments {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn candidates(&self, fragment: Fragment, lang: Lang) -> Vec<PathBuf> {
        let shared = self.dir.join(fragment.file_name());
        match lang {
            Lang::En => vec![shared],
            other => vec![self.dir.join(other.code()).join(fragment.file_name()), shared],
        }
    }
}

impl FragmentSource for FsFragments {
    fn fetch(&self, fragment: Fragment, lang: Lang) -> Result<String, FragmentError> {
        for path in self.candidates(fragment, lang) {
            match fs::read_to_string(&path) {
                Ok(content) if content.trim().is_empty() => {
                    return Err(FragmentError::Empty(fragment.file_name().to_string()));
                }
                Ok(content) => return Ok(content),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(source) => return Err(FragmentError::Io { path, source }),
            }
        }
        Err(FragmentError::NotFound(fragment.file_name().to_string()))
    }
}

/// Substitute root placeholders for the page being composed.
pub fn resolve_placeholders(markup: &str, ctx: &PageContext) -> String {
    markup
        .replace("{{lang_root}}", &ctx.lang_root())
        .replace("{{root}}", &ctx.path_to_root())
}

/// Fetch a fragment and insert it into the document.
///
/// Returns `false` when the fragment could not be loaded; the failure is
/// logged and the document is left untouched.
pub fn load(
    source: &dyn FragmentSource,
    ctx: &PageContext,
    doc: &mut PageDocument,
    fragment: Fragment,
    point: InsertionPoint,
    mode: InsertionMode,
) -> bool {
    match source.fetch(fragment, ctx.lang()) {
        Ok(markup) => {
            doc.insert(point, mode, &resolve_placeholders(&markup, ctx));
            true
        }
        Err(e) => {
            tracing::warn!(
                fragment = fragment.file_name(),
                page = ctx.location.path(),
                error = %e,
                "Failed to load fragment"
            );
            false
        }
    }
}

/// Load a fragment at its standard placement.
pub fn load_default(
    source: &dyn FragmentSource,
    ctx: &PageContext,
    doc: &mut PageDocument,
    fragment: Fragment,
) -> bool {
    let (point, mode) = fragment.placement();
    load(source, ctx, doc, fragment, point, mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;
    use std::collections::HashMap;
    use tempfile::TempDir;

    struct MapSource(HashMap<(Fragment, Lang), String>);

    impl FragmentSource for MapSource {
        fn fetch(&self, fragment: Fragment, lang: Lang) -> Result<String, FragmentError> {
            self.0
                .get(&(fragment, lang))
                .cloned()
                .ok_or_else(|| FragmentError::NotFound(fragment.file_name().to_string()))
        }
    }

    fn ctx(path: &str) -> PageContext {
        PageContext::new(path, Theme::Light)
    }

    #[test]
    fn header_goes_to_body_start() {
        let source = MapSource(HashMap::from([(
            (Fragment::Header, Lang::En),
            "<header></header>".to_string(),
        )]));
        let mut doc = PageDocument::new("<main></main>");
        assert!(load_default(&source, &ctx("/index.html"), &mut doc, Fragment::Header));
        assert_eq!(doc.body, "<header></header><main></main>");
    }

    #[test]
    fn missing_fragment_leaves_document_untouched() {
        let source = MapSource(HashMap::new());
        let mut doc = PageDocument::new("<main></main>");
        assert!(!load_default(&source, &ctx("/index.html"), &mut doc, Fragment::Footer));
        assert_eq!(doc.body, "<main></main>");
        assert!(doc.head.is_empty());
    }

    #[test]
    fn placeholders_resolve_per_page_depth() {
        let c = ctx("/pt/projects/portfolio.html");
        let out = resolve_placeholders(
            r#"<a href="{{lang_root}}index.html"><img src="{{root}}assets/logo.svg"></a>"#,
            &c,
        );
        assert_eq!(
            out,
            r#"<a href="../../pt/index.html"><img src="../../assets/logo.svg"></a>"#
        );
    }

    #[test]
    fn favicon_and_analytics_go_to_head() {
        assert_eq!(
            Fragment::Favicon.placement(),
            (InsertionPoint::Head, InsertionMode::BeforeEnd)
        );
        assert_eq!(
            Fragment::Analytics.placement(),
            (InsertionPoint::Head, InsertionMode::BeforeEnd)
        );
    }

    #[test]
    fn fs_source_prefers_language_override() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("pt")).unwrap();
        fs::write(tmp.path().join("header.html"), "<header>en</header>").unwrap();
        fs::write(tmp.path().join("pt/header.html"), "<header>pt</header>").unwrap();

        let source = FsFragments::new(tmp.path());
        assert_eq!(
            source.fetch(Fragment::Header, Lang::Pt).unwrap(),
            "<header>pt</header>"
        );
        assert_eq!(
            source.fetch(Fragment::Header, Lang::En).unwrap(),
            "<header>en</header>"
        );
    }

    #[test]
    fn fs_source_falls_back_to_shared_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("footer.html"), "<footer></footer>").unwrap();
        let source = FsFragments::new(tmp.path());
        assert_eq!(
            source.fetch(Fragment::Footer, Lang::Pt).unwrap(),
            "<footer></footer>"
        );
    }

    #[test]
    fn fs_source_errors() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("analytics.html"), "  \n").unwrap();
        let source = FsFragments::new(tmp.path());
        assert!(matches!(
            source.fetch(Fragment::Favicon, Lang::En),
            Err(FragmentError::NotFound(_))
        ));
        assert!(matches!(
            source.fetch(Fragment::Analytics, Lang::En),
            Err(FragmentError::Empty(_))
        ));
    }
}
