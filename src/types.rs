//! Shared types used across both pipeline stages.
//!
//! These types are serialized to JSON between stages (scan → generate)
//! and must be identical on both sides.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Site language. English pages live at the root, Portuguese pages under `pt/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    Pt,
}

impl Lang {
    pub const ALL: [Lang; 2] = [Lang::En, Lang::Pt];

    pub fn code(self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Pt => "pt",
        }
    }

    /// Folder prefix for pages in this language, relative to the site root.
    pub fn dir_prefix(self) -> &'static str {
        match self {
            Lang::En => "",
            Lang::Pt => "pt/",
        }
    }

    /// Value for the `<html lang>` attribute.
    pub fn html_lang(self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Pt => "pt-BR",
        }
    }

    /// Pick the string for this language out of an `(en, pt)` pair.
    pub fn pick<'a>(self, en: &'a str, pt: &'a str) -> &'a str {
        match self {
            Lang::En => en,
            Lang::Pt => pt,
        }
    }

    pub fn other(self) -> Lang {
        match self {
            Lang::En => Lang::Pt,
            Lang::Pt => Lang::En,
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// How a page body is authored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageFormat {
    /// Raw HTML body, injected as-is.
    Html,
    /// Markdown body, converted with pulldown-cmark.
    Markdown,
}

/// A page discovered in the content directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageEntry {
    /// Source file, relative to the content root (`pt/about.md`)
    pub source_path: String,
    /// Site path of the generated page, always rooted (`/pt/about.html`)
    pub url_path: String,
    /// Page title from the first heading, or the file stem as fallback
    pub title: String,
    pub lang: Lang,
    pub format: PageFormat,
    /// Whether the same page exists in the other language
    pub has_translation: bool,
}

impl PageEntry {
    /// Output file path relative to the output directory (`pt/about.html`).
    pub fn output_path(&self) -> &str {
        self.url_path.trim_start_matches('/')
    }
}
