//! English/Portuguese switch.
//!
//! Portuguese pages mirror the English tree under `/pt/`. Switching language
//! keeps everything after that prefix:
//!
//! ```text
//! /projects/portfolio.html  ──pt──▶  /pt/projects/portfolio.html
//! /pt/projects/portfolio.html ──en──▶  /projects/portfolio.html
//! ```
//!
//! The rendered controls link relatively (`path_to_root` + switched path) so
//! the site works from any base URL, including `file://`.

use crate::document::PageDocument;
use crate::location::Location;
use crate::types::Lang;
use maud::{Markup, html};

/// Mount point for the two language controls.
pub const LANGUAGE_TOGGLE_MOUNT: &str = "language-toggle";

/// Site path of the same page in `target`, or `None` when already there.
pub fn switch_path(path: &str, target: Lang) -> Option<String> {
    let current = Location::parse(path).lang();
    if current == target {
        return None;
    }
    let switched = match target {
        Lang::En => {
            let rest = path
                .strip_prefix("/pt")
                .or_else(|| path.strip_prefix("pt"))
                .unwrap_or(path);
            if rest.is_empty() {
                "/".to_string()
            } else {
                rest.to_string()
            }
        }
        Lang::Pt => format!("/pt/{}", path.trim_start_matches('/')),
    };
    Some(switched)
}

/// Relative href to the same page in `target`.
pub fn switch_href(location: &Location, target: Lang) -> Option<String> {
    switch_path(location.path(), target)
        .map(|switched| format!("{}{}", location.path_to_root(), switched.trim_start_matches('/')))
}

fn label(lang: Lang) -> &'static str {
    match lang {
        Lang::En => "EN",
        Lang::Pt => "PT",
    }
}

fn title(lang: Lang) -> &'static str {
    match lang {
        Lang::En => "English",
        Lang::Pt => "Português",
    }
}

/// Both controls. The current language is pressed and has no href, so
/// activating it does nothing.
pub fn render_controls(location: &Location) -> Markup {
    let current = location.lang();
    html! {
        @for lang in Lang::ALL {
            @let pressed = lang == current;
            a href=[switch_href(location, lang)]
                hreflang=(lang.code())
                lang=(lang.code())
                title=(title(lang))
                role="button"
                aria-pressed=(if pressed { "true" } else { "false" })
                class=(if pressed { "font-semibold" } else { "hover:text-gray-900 transition-colors duration-200" }) {
                (label(lang))
            }
        }
    }
}

/// Fill the language toggle mount. Missing mount is a silent no-op.
pub fn apply(doc: &mut PageDocument, location: &Location) -> bool {
    doc.replace_inner(LANGUAGE_TOGGLE_MOUNT, &render_controls(location).into_string())
}
