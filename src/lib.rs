//! # Folio
//!
//! A static site generator for bilingual (English/Portuguese) personal
//! portfolio sites. Page bodies are authored by hand; everything shared
//! between pages is composed in at build time: header, footer, favicon,
//! analytics tag, navigation with the current page marked, a language
//! switch, a light/dark theme toggle and project cards rendered from JSON.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Scan      content/  →  manifest.json    (pages, translations, config)
//! 2. Generate  manifest  →  dist/            (composed HTML site + assets)
//! ```
//!
//! The manifest is human-readable JSON you can inspect between stages.
//!
//! # Composition Model
//!
//! Every page is composed from its own [`context::PageContext`], which holds
//! the page's [`location::Location`] and theme. Each component is a pure
//! render function from context to markup, plus an `apply` step that writes
//! the markup into one region of a [`document::PageDocument`] found by
//! element id:
//!
//! ```text
//! location  →  fragment (header)  →  nav / lang / theme  →  fragment (footer, head)  →  projects
//! ```
//!
//! A page without a given mount point simply skips that component.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: walks the content directory, pairs translations, produces the manifest |
//! | [`generate`] | Stage 2: composes every page in parallel, writes the site, copies assets |
//! | [`location`] | Path resolution: segments, filename, language, relative root |
//! | [`context`] | Per-page context passed to every component |
//! | [`document`] | In-memory page with mount points and insertion |
//! | [`fragment`] | Shared HTML snippets with per-language overrides |
//! | [`nav`] | Navigation menu with exact-filename active marking |
//! | [`lang`] | English/Portuguese path switching and controls |
//! | [`theme`] | Light/dark preference state machine, toggle markup, runtime script |
//! | [`projects`] | Project data normalization and card rendering |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`cache`] | Output write cache for incremental builds |
//! | [`types`] | Shared types serialized between stages (`Lang`, `PageEntry`) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Build-Time Composition
//!
//! Header, navigation and cards are plain HTML in the output. Pages work
//! without JavaScript and from `file://`; the only script is the theme
//! toggle, because the preference lives in the visitor's browser.
//!
//! ## Relative Links Everywhere
//!
//! All generated links are relative to the page (`../../pt/about.html`), so
//! the site can be served from any base path. Fragments use `{{root}}` and
//! `{{lang_root}}` placeholders for the same reason.
//!
//! ## Untrusted Project Data
//!
//! Project JSON goes through [Maud](https://maud.lambda.xyz/) interpolation,
//! which escapes by default. Fragments and page bodies are authored markup
//! and are injected as-is.
//!
//! ## Explicit Language Fallback
//!
//! Localized project fields fall back to English, then to empty. Older
//! records with plain strings are accepted and reported for migration.

pub mod cache;
pub mod config;
pub mod context;
pub mod document;
pub mod fragment;
pub mod generate;
pub mod lang;
pub mod location;
pub mod nav;
pub mod output;
pub mod projects;
pub mod scan;
pub mod theme;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
