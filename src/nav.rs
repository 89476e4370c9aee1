//! Navigation menu composition.
//!
//! The menu comes from a fixed, language-keyed link table ([`NavEntry`] lists
//! in the site config). Labels differ per language, targets are bare
//! filenames shared by both languages. Links resolve against the page's
//! language root, so `about.html` on `/pt/projects/x.html` becomes
//! `../../pt/about.html`.
//!
//! The active link is picked by exact filename equality. A directory index
//! request (empty filename) counts as the homepage.

use crate::config::NavEntry;
use crate::context::PageContext;
use crate::document::PageDocument;
use maud::{Markup, html};

/// Mount point inside the header fragment.
pub const NAV_MOUNT: &str = "nav-links";
pub const HOME_TARGET: &str = "index.html";

const BASE_CLASSES: &str = "transition-colors duration-200";
const ACTIVE_CLASSES: &str = "text-blue-600 font-semibold";
const INACTIVE_CLASSES: &str = "hover:text-gray-900";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: String,
    pub target: String,
    pub active: bool,
}

/// Build the link list for a page with the given filename.
pub fn compose(table: &[NavEntry], filename: &str) -> Vec<NavLink> {
    let current = if filename.is_empty() {
        HOME_TARGET
    } else {
        filename
    };
    table
        .iter()
        .map(|entry| NavLink {
            label: entry.label.clone(),
            target: entry.target.clone(),
            active: entry.target == current,
        })
        .collect()
}

/// Render anchors for the composed links.
pub fn render(links: &[NavLink], lang_root: &str) -> Markup {
    html! {
        @for link in links {
            @let classes = if link.active {
                format!("{BASE_CLASSES} {ACTIVE_CLASSES}")
            } else {
                format!("{INACTIVE_CLASSES} {BASE_CLASSES}")
            };
            a href={ (lang_root) (link.target) }
                class=(classes)
                aria-current=[link.active.then_some("page")] {
                (link.label)
            }
        }
    }
}

/// Append the page's navigation into the nav mount. Existing mount content is kept.
///
/// Returns `false` when the page has no nav mount (header missing or
/// fragment without one).
pub fn apply(doc: &mut PageDocument, ctx: &PageContext, table: &[NavEntry]) -> bool {
    let links = compose(table, ctx.location.filename());
    let markup = render(&links, &ctx.lang_root());
    let applied = doc.append_inner(NAV_MOUNT, &markup.into_string());
    if !applied {
        tracing::debug!(page = ctx.location.path(), "No nav mount, skipping navigation");
    }
    applied
}
