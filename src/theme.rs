//! Light/dark theme switching.
//!
//! The visitor's choice is a single persisted flag: the `theme` key holds
//! `"dark"` while dark mode is active. Any other value, or no key, means light.
//!
//! Every visible consequence of the theme goes through one [`ThemeView`]:
//! the `<html>` class marker, which icon is shown, and the toggle's
//! `aria-pressed` state. They are derived together, so they can never
//! disagree.
//!
//! Pages are built in the light state, the view of an empty store
//! (`ThemeView::of(Theme::Light)`). In the browser, `static/theme.js` runs
//! the same state machine as [`ThemeSwitcher`]: it applies the stored
//! preference before first paint and performs the toggle against
//! `localStorage`.

use crate::document::PageDocument;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Storage key for the persisted preference.
pub const THEME_STORAGE_KEY: &str = "theme";
/// Mount point for the toggle control.
pub const THEME_TOGGLE_MOUNT: &str = "theme-toggle";

/// Runtime half of the switcher, embedded in every page head.
pub const THEME_SCRIPT: &str = include_str!("../static/theme.js");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Interpret a stored preference. Only the literal `"dark"` selects dark.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Durable key-value slot holding the preference.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryPreferences {
    values: HashMap<String, String>,
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

/// Everything the page shows for a given theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeView {
    pub theme: Theme,
    /// Class on `<html>`; `None` in light mode.
    pub html_class: Option<&'static str>,
    /// Value of `<html data-theme>`.
    pub data_theme: &'static str,
    /// The sun icon offers switching to light, so it shows in dark mode.
    pub sun_hidden: bool,
    pub moon_hidden: bool,
    /// `aria-pressed` of the toggle: pressed while dark mode is on.
    pub pressed: bool,
}

impl ThemeView {
    pub fn of(theme: Theme) -> Self {
        let dark = theme == Theme::Dark;
        Self {
            theme,
            html_class: dark.then_some("dark"),
            data_theme: theme.as_str(),
            sun_hidden: !dark,
            moon_hidden: dark,
            pressed: dark,
        }
    }
}

/// Preference-backed theme state.
#[derive(Debug)]
pub struct ThemeSwitcher<S: PreferenceStore> {
    store: S,
    theme: Theme,
}

impl<S: PreferenceStore> ThemeSwitcher<S> {
    /// Read the persisted preference once; absent means light.
    pub fn load(store: S) -> Self {
        let theme = Theme::from_stored(store.get(THEME_STORAGE_KEY).as_deref());
        Self { store, theme }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn view(&self) -> ThemeView {
        ThemeView::of(self.theme)
    }

    /// Flip the theme and persist it. Light is stored as an absent key.
    pub fn toggle(&mut self) -> ThemeView {
        self.theme = self.theme.toggled();
        match self.theme {
            Theme::Dark => self.store.set(THEME_STORAGE_KEY, "dark"),
            Theme::Light => self.store.remove(THEME_STORAGE_KEY),
        }
        self.view()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Toggle button with both icons; the inactive one carries `hidden`.
pub fn render_toggle(view: &ThemeView) -> Markup {
    html! {
        button id="theme-toggle-button" type="button"
            aria-label="Toggle dark mode"
            aria-pressed=(aria_bool(view.pressed))
            class="p-2 rounded-full transition-colors duration-200" {
            span id="theme-icon-sun" class=[view.sun_hidden.then_some("hidden")] aria-hidden="true" { "☀" }
            span id="theme-icon-moon" class=[view.moon_hidden.then_some("hidden")] aria-hidden="true" { "☾" }
        }
    }
}

fn aria_bool(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Fill the theme toggle mount. Missing mount is a silent no-op.
pub fn apply(doc: &mut PageDocument, view: &ThemeView) -> bool {
    doc.replace_inner(THEME_TOGGLE_MOUNT, &render_toggle(view).into_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consistent(view: &ThemeView) -> bool {
        let dark = view.theme == Theme::Dark;
        view.html_class.is_some() == dark
            && view.pressed == dark
            && view.sun_hidden != view.moon_hidden
            && view.moon_hidden == dark
            && view.data_theme == view.theme.as_str()
    }

    #[test]
    fn absent_preference_is_light() {
        let switcher = ThemeSwitcher::load(MemoryPreferences::default());
        assert_eq!(switcher.theme(), Theme::Light);
    }

    #[test]
    fn only_literal_dark_selects_dark() {
        assert_eq!(Theme::from_stored(Some("dark")), Theme::Dark);
        assert_eq!(Theme::from_stored(Some("Dark")), Theme::Light);
        assert_eq!(Theme::from_stored(Some("light")), Theme::Light);
        assert_eq!(Theme::from_stored(Some("")), Theme::Light);
        assert_eq!(Theme::from_stored(None), Theme::Light);
    }

    #[test]
    fn stored_dark_is_loaded() {
        let mut store = MemoryPreferences::default();
        store.set(THEME_STORAGE_KEY, "dark");
        let switcher = ThemeSwitcher::load(store);
        assert_eq!(switcher.theme(), Theme::Dark);
        assert_eq!(switcher.view().html_class, Some("dark"));
    }

    #[test]
    fn toggle_persists_and_updates_view() {
        let mut switcher = ThemeSwitcher::load(MemoryPreferences::default());
        let view = switcher.toggle();
        assert_eq!(view.theme, Theme::Dark);
        assert!(view.pressed);
        assert!(consistent(&view));
        assert_eq!(
            switcher.store().get(THEME_STORAGE_KEY).as_deref(),
            Some("dark")
        );
    }

    #[test]
    fn double_toggle_restores_initial_state() {
        for initial in [None, Some("dark")] {
            let mut store = MemoryPreferences::default();
            if let Some(v) = initial {
                store.set(THEME_STORAGE_KEY, v);
            }
            let before_store = store.clone();
            let mut switcher = ThemeSwitcher::load(store);
            let before_view = switcher.view();

            switcher.toggle();
            let after = switcher.toggle();

            assert_eq!(after, before_view);
            assert_eq!(switcher.store(), &before_store);
        }
    }

    #[test]
    fn every_view_is_consistent() {
        assert!(consistent(&ThemeView::of(Theme::Light)));
        assert!(consistent(&ThemeView::of(Theme::Dark)));
    }

    #[test]
    fn toggle_markup_reflects_view() {
        let light = render_toggle(&ThemeView::of(Theme::Light)).into_string();
        assert!(light.contains(r#"aria-pressed="false""#));
        assert!(light.contains(r#"id="theme-icon-sun" class="hidden""#));
        assert!(!light.contains(r#"id="theme-icon-moon" class="hidden""#));

        let dark = render_toggle(&ThemeView::of(Theme::Dark)).into_string();
        assert!(dark.contains(r#"aria-pressed="true""#));
        assert!(dark.contains(r#"id="theme-icon-moon" class="hidden""#));
    }

    #[test]
    fn apply_fills_mount_or_noops() {
        let mut doc = PageDocument::new(r#"<div id="theme-toggle"></div>"#);
        assert!(apply(&mut doc, &ThemeView::of(Theme::Light)));
        assert!(doc.body.contains("theme-toggle-button"));

        let mut bare = PageDocument::new("<main></main>");
        assert!(!apply(&mut bare, &ThemeView::of(Theme::Light)));
        assert_eq!(bare.body, "<main></main>");
    }

    #[test]
    fn script_uses_same_storage_key() {
        assert!(THEME_SCRIPT.contains("'theme'"));
        assert!(THEME_SCRIPT.contains("theme-toggle-button"));
    }
}
