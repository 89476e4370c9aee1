//! Per-page rendering context.
//!
//! Components never look at global state. Everything a component needs to
//! know about the page being composed travels in a [`PageContext`].

use crate::location::Location;
use crate::theme::Theme;
use crate::types::Lang;

#[derive(Debug, Clone)]
pub struct PageContext {
    pub location: Location,
    /// Theme the page is rendered with before the runtime script runs.
    pub theme: Theme,
}

impl PageContext {
    pub fn new(url_path: &str, theme: Theme) -> Self {
        Self {
            location: Location::parse(url_path),
            theme,
        }
    }

    pub fn lang(&self) -> Lang {
        self.location.lang()
    }

    pub fn path_to_root(&self) -> String {
        self.location.path_to_root()
    }

    pub fn lang_root(&self) -> String {
        self.location.lang_root()
    }
}
