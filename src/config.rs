//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the content root and is merged on top of the stock defaults, so it only
//! needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! site_title = "Portfolio"
//!
//! [paths]
//! fragments = "fragments"        # header/footer/favicon/analytics snippets
//! projects = "data/projects.json"
//! assets = "assets"              # copied verbatim to the output
//!
//! [projects]
//! featured = 3                   # cards in the featured subset
//!
//! [[nav.en]]
//! label = "Home"
//! target = "index.html"
//! # ...
//!
//! [[nav.pt]]
//! label = "Início"
//! target = "index.html"
//! # ...
//!
//! [colors.light]
//! primary = "#111827"
//! # ...
//!
//! [processing]
//! max_processes = 4              # omit for auto = CPU cores
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::types::Lang;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Title suffix for every page (`About · Portfolio`).
    pub site_title: String,
    /// Locations of fragments, project data and static assets.
    pub paths: PathsConfig,
    /// Project card settings.
    pub projects: ProjectsConfig,
    /// Navigation link tables, one per language.
    pub nav: NavConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_title: "Portfolio".to_string(),
            paths: PathsConfig::default(),
            projects: ProjectsConfig::default(),
            nav: NavConfig::default(),
            colors: ColorConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.projects.featured == 0 {
            return Err(ConfigError::Validation(
                "projects.featured must be at least 1".into(),
            ));
        }
        for lang in Lang::ALL {
            let table = self.nav.table(lang);
            if table.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "nav.{lang} must not be empty"
                )));
            }
            if let Some(bad) = table.iter().find(|l| l.target.contains('/')) {
                return Err(ConfigError::Validation(format!(
                    "nav.{lang} target must be a filename, got {:?}",
                    bad.target
                )));
            }
            let mut seen = HashSet::new();
            if let Some(dup) = table.iter().find(|l| !seen.insert(l.target.as_str())) {
                return Err(ConfigError::Validation(format!(
                    "nav.{lang} lists target {:?} more than once",
                    dup.target
                )));
            }
        }
        let en: Vec<&str> = self.nav.en.iter().map(|l| l.target.as_str()).collect();
        let pt: Vec<&str> = self.nav.pt.iter().map(|l| l.target.as_str()).collect();
        if en != pt {
            return Err(ConfigError::Validation(
                "nav.en and nav.pt must list the same targets in the same order".into(),
            ));
        }
        Ok(())
    }
}

/// Content-relative locations of site inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub fragments: String,
    pub projects: String,
    pub assets: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            fragments: "fragments".to_string(),
            projects: "data/projects.json".to_string(),
            assets: "assets".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectsConfig {
    /// Number of cards in the featured subset (landing page).
    pub featured: usize,
}

impl Default for ProjectsConfig {
    fn default() -> Self {
        Self { featured: 3 }
    }
}

/// A single entry of a navigation table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavEntry {
    pub label: String,
    /// Language-neutral page filename.
    pub target: String,
}

impl NavEntry {
    fn new(label: &str, target: &str) -> Self {
        Self {
            label: label.to_string(),
            target: target.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavConfig {
    pub en: Vec<NavEntry>,
    pub pt: Vec<NavEntry>,
}

impl NavConfig {
    pub fn table(&self, lang: Lang) -> &[NavEntry] {
        match lang {
            Lang::En => &self.en,
            Lang::Pt => &self.pt,
        }
    }
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            en: vec![
                NavEntry::new("Home", "index.html"),
                NavEntry::new("Projects", "projects.html"),
                NavEntry::new("Resume", "resume.html"),
                NavEntry::new("About Me", "about.html"),
                NavEntry::new("Contact", "contact.html"),
            ],
            pt: vec![
                NavEntry::new("Início", "index.html"),
                NavEntry::new("Projetos", "projects.html"),
                NavEntry::new("Currículo", "resume.html"),
                NavEntry::new("Sobre Mim", "about.html"),
                NavEntry::new("Contato", "contact.html"),
            ],
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of pages composed in parallel.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme, exposed to the stylesheet as `--color-*` properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    /// Headings and primary text.
    pub primary: String,
    /// Body copy and muted text.
    pub secondary: String,
    /// Links, active nav item, badges.
    pub accent: String,
    /// Accent hover state.
    pub accent_dark: String,
    /// Page background.
    pub background: String,
    /// Project card background.
    pub card: String,
    pub border: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            primary: "#111827".to_string(),
            secondary: "#4b5563".to_string(),
            accent: "#2563eb".to_string(),
            accent_dark: "#1d4ed8".to_string(),
            background: "#f9fafb".to_string(),
            card: "#ffffff".to_string(),
            border: "#e5e7eb".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            primary: "#f9fafb".to_string(),
            secondary: "#9ca3af".to_string(),
            accent: "#60a5fa".to_string(),
            accent_dark: "#93c5fd".to_string(),
            background: "#111827".to_string(),
            card: "#1f2937".to_string(),
            border: "#374151".to_string(),
        }
    }

    fn css_properties(&self) -> String {
        format!(
            "    --color-primary: {};\n    --color-secondary: {};\n    --color-accent: {};\n    --color-accent-dark: {};\n    --color-background-light: {};\n    --color-background-card: {};\n    --color-border: {};",
            self.primary,
            self.secondary,
            self.accent,
            self.accent_dark,
            self.background,
            self.card,
            self.border,
        )
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely. Arrays, and so
///   whole nav tables, are replaced rather than concatenated.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Folio Configuration
# ===================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# Appended to every page title: "About Me · Portfolio"
site_title = "Portfolio"

# ---------------------------------------------------------------------------
# Input locations, relative to the content root
# ---------------------------------------------------------------------------
[paths]
# header.html, footer.html, favicon.html, analytics.html.
# A language folder (fragments/pt/) overrides individual files.
fragments = "fragments"

# Project list rendered into #projects-container and #featured-projects-container.
projects = "data/projects.json"

# Copied verbatim to <output>/assets/.
assets = "assets"

# ---------------------------------------------------------------------------
# Project cards
# ---------------------------------------------------------------------------
[projects]
# Number of cards in the featured subset (first N projects, in file order).
featured = 3

# ---------------------------------------------------------------------------
# Navigation, one table per language.
# Targets are page filenames and must match across languages.
# ---------------------------------------------------------------------------
[[nav.en]]
label = "Home"
target = "index.html"

[[nav.en]]
label = "Projects"
target = "projects.html"

[[nav.en]]
label = "Resume"
target = "resume.html"

[[nav.en]]
label = "About Me"
target = "about.html"

[[nav.en]]
label = "Contact"
target = "contact.html"

[[nav.pt]]
label = "Início"
target = "index.html"

[[nav.pt]]
label = "Projetos"
target = "projects.html"

[[nav.pt]]
label = "Currículo"
target = "resume.html"

[[nav.pt]]
label = "Sobre Mim"
target = "about.html"

[[nav.pt]]
label = "Contato"
target = "contact.html"

# ---------------------------------------------------------------------------
# Colors - Light mode
# ---------------------------------------------------------------------------
[colors.light]
primary = "#111827"
secondary = "#4b5563"
accent = "#2563eb"
accent_dark = "#1d4ed8"
background = "#f9fafb"
card = "#ffffff"
border = "#e5e7eb"

# ---------------------------------------------------------------------------
# Colors - Dark mode (applied when <html> has the "dark" class)
# ---------------------------------------------------------------------------
[colors.dark]
primary = "#f9fafb"
secondary = "#9ca3af"
accent = "#60a5fa"
accent_dark = "#93c5fd"
background = "#111827"
card = "#1f2937"
border = "#374151"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum pages composed in parallel.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

/// Generate CSS custom properties from color config.
///
/// Dark mode is keyed on the `dark` class on `<html>`, which the theme toggle
/// controls, rather than on `prefers-color-scheme`.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        ":root {{\n{}\n}}\n\n:root.dark {{\n{}\n}}",
        colors.light.css_properties(),
        colors.dark.css_properties(),
    )
}
