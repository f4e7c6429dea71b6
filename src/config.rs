//! Page-level configuration.
//!
//! The server template may embed a JSON document in
//! `<script type="application/json" id="site-config">`; every field is
//! optional and falls back to the defaults below, which match the site's
//! stock markup.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::cell::RefCell;

use serde::{Deserialize, Serialize};

use crate::error::UiError;
use crate::util::captcha::CaptchaProvider;

/// Id of the embedded config element.
pub const CONFIG_ELEMENT_ID: &str = "site-config";

thread_local! {
    static THEME_STORAGE_KEY: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Record the theme storage key of the config loaded at startup.
pub fn remember_storage_key(key: &str) {
    THEME_STORAGE_KEY.with(|slot| *slot.borrow_mut() = Some(key.to_owned()));
}

/// The theme storage key recorded by [`remember_storage_key`], or the one in
/// the page config if nothing has been recorded yet.
pub fn theme_storage_key() -> String {
    THEME_STORAGE_KEY
        .with(|slot| slot.borrow().clone())
        .unwrap_or_else(|| SiteConfig::load().theme.storage_key)
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub theme: ThemeConfig,
    pub tags: TagConfig,
    pub stats: StatsConfig,
}

impl SiteConfig {
    /// Parse a config document.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::Config`] if `raw` is not valid JSON for this shape.
    pub fn from_json(raw: &str) -> Result<Self, UiError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Load the config embedded in the current document, falling back to
    /// defaults when it is absent or malformed.
    pub fn load() -> Self {
        #[cfg(feature = "csr")]
        {
            let raw = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
                .and_then(|el| el.text_content());
            match raw {
                Some(raw) if !raw.trim().is_empty() => Self::from_json(&raw).unwrap_or_else(|e| {
                    log::warn!("{e}; using default site config");
                    Self::default()
                }),
                _ => Self::default(),
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            Self::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// `localStorage` key holding the [`ThemeSetting`](crate::state::theme::ThemeSetting).
    pub storage_key: String,
    /// Class toggled on `<html>` for dark styling.
    pub dark_class: String,
    /// Delay before the theme is applied a second time, for CAPTCHA widgets
    /// that finish loading after page ready.
    pub reapply_delay_ms: u32,
    /// Name of the `CustomEvent` dispatched on the document after a change.
    pub event_name: String,
    pub captcha: Vec<CaptchaProvider>,
    /// Also re-sync CAPTCHA frames from a separate `themeChanged` listener.
    pub independent_captcha_sync: bool,
    /// Host element for the theme switcher component, if the page has one.
    pub switcher_mount_id: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: "theme".to_owned(),
            dark_class: "dark".to_owned(),
            reapply_delay_ms: 1000,
            event_name: "themeChanged".to_owned(),
            captcha: vec![CaptchaProvider::recaptcha(), CaptchaProvider::hcaptcha()],
            independent_captcha_sync: false,
            switcher_mount_id: "theme-switcher".to_owned(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagConfig {
    pub card_selector: String,
    pub tag_selector: String,
    pub filter_button_selector: String,
    pub selected_class: String,
    pub hidden_class: String,
    pub form_fields_id: String,
    pub clear_filters_id: String,
    pub clear_enabled_classes: Vec<String>,
    pub clear_disabled_classes: Vec<String>,
    /// `name` of each hidden input.
    pub field_name: String,
    /// Host element for the reactive filter bar component, if present.
    pub filter_bar_mount_id: String,
    /// Attach click listeners to the filter buttons. Turn off when the
    /// template already calls `toggleTagInFilter` from inline handlers.
    pub bind_filter_buttons: bool,
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            card_selector: ".project-card".to_owned(),
            tag_selector: ".tag".to_owned(),
            filter_button_selector: ".tag-filter".to_owned(),
            selected_class: "selected".to_owned(),
            hidden_class: "hidden".to_owned(),
            form_fields_id: "tag-form-fields".to_owned(),
            clear_filters_id: "clear-filters".to_owned(),
            clear_enabled_classes: vec!["hover:underline".to_owned(), "cursor-pointer".to_owned()],
            clear_disabled_classes: vec!["opacity-30".to_owned(), "cursor-not-allowed".to_owned()],
            field_name: "tags".to_owned(),
            filter_bar_mount_id: "tag-filter-root".to_owned(),
            bind_filter_buttons: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    pub endpoint: String,
    pub refresh_on_load: bool,
    /// Optional control that triggers a refresh when clicked.
    pub refresh_button_id: String,
    pub csrf_cookie: String,
    pub csrf_header: String,
    pub project_id_attr: String,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            endpoint: "/api/refresh-github-stats/".to_owned(),
            refresh_on_load: false,
            refresh_button_id: "refresh-github-stats".to_owned(),
            csrf_cookie: "csrftoken".to_owned(),
            csrf_header: "X-CSRFToken".to_owned(),
            project_id_attr: "data-project-id".to_owned(),
        }
    }
}
