//! Theme preference resolution and application.
//!
//! DESIGN
//! ======
//! The persisted preference and the OS colour-scheme signal are injected as
//! capabilities ([`PreferenceStore`], [`ColorSchemeQuery`]) and the document
//! is reached through a [`ThemeSurface`], so every rule here runs natively in
//! tests. The effective light/dark value is never stored; it is recomputed
//! from (setting, OS signal) on every application.

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::config::ThemeConfig;
use crate::signals::{SignalBus, SignalKind, SubscriptionId, UiSignal};
use crate::util::captcha::{CaptchaProvider, ThemeSurface, sync_captcha_frames};

/// User-chosen display mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeSetting {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemeSetting {
    pub const ALL: [Self; 3] = [Self::Light, Self::Dark, Self::System];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Dark => "Dark",
            Self::System => "System",
        }
    }

    /// Exact, case-sensitive parse of a persisted value.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "system" => Some(Self::System),
            _ => None,
        }
    }
}

/// The light/dark mode actually rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectiveTheme {
    Light,
    Dark,
}

impl EffectiveTheme {
    pub fn resolve(setting: ThemeSetting, os_prefers_dark: bool) -> Self {
        let dark = match setting {
            ThemeSetting::Dark => true,
            ThemeSetting::Light => false,
            ThemeSetting::System => os_prefers_dark,
        };
        if dark { Self::Dark } else { Self::Light }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// Resolve the setting to start from, given the raw stored value.
///
/// A stored `dark` wins; with nothing stored the OS may promote the result to
/// `dark`. `light` is only returned when explicitly stored. Everything else
/// (stored `system`, unknown values, nothing stored with a light OS) is
/// `system`.
pub fn resolve_setting(stored: Option<&str>, os_prefers_dark: bool) -> ThemeSetting {
    match stored {
        Some("dark") => ThemeSetting::Dark,
        None if os_prefers_dark => ThemeSetting::Dark,
        Some("light") => ThemeSetting::Light,
        _ => ThemeSetting::System,
    }
}

/// Durable string key-value slot (browser `localStorage` in production).
pub trait PreferenceStore {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&mut self, key: &str, value: &str);
}

/// The OS "prefers dark colour scheme" signal, read at call time.
pub trait ColorSchemeQuery {
    fn prefers_dark(&self) -> bool;
}

/// Owns the preference capabilities and applies settings to a surface.
pub struct ThemeController<P, C> {
    prefs: P,
    scheme: C,
    storage_key: String,
    providers: Vec<CaptchaProvider>,
    bus: SignalBus,
}

impl<P: PreferenceStore, C: ColorSchemeQuery> ThemeController<P, C> {
    pub fn new(prefs: P, scheme: C, config: &ThemeConfig, bus: SignalBus) -> Self {
        Self {
            prefs,
            scheme,
            storage_key: config.storage_key.clone(),
            providers: config.captcha.clone(),
            bus,
        }
    }

    pub fn get_theme(&self) -> ThemeSetting {
        let stored = self.prefs.read(&self.storage_key);
        resolve_setting(stored.as_deref(), self.scheme.prefers_dark())
    }

    pub fn effective(&self, setting: ThemeSetting) -> EffectiveTheme {
        EffectiveTheme::resolve(setting, self.scheme.prefers_dark())
    }

    /// Apply `setting` to the surface, persist it verbatim, push the result
    /// into CAPTCHA frames and broadcast [`UiSignal::PreferenceChanged`].
    pub fn update_theme<S: ThemeSurface>(&mut self, setting: ThemeSetting, surface: &mut S) -> EffectiveTheme {
        let effective = self.effective(setting);
        surface.set_dark_class(effective.is_dark());
        self.prefs.write(&self.storage_key, setting.as_str());
        sync_captcha_frames(surface, &self.providers, effective);
        log::debug!("theme {} applied as {}", setting.as_str(), effective.as_str());
        self.bus.emit(&UiSignal::PreferenceChanged(setting));
        effective
    }

    /// React to the OS colour scheme flipping. Only a persisted `system`
    /// preference follows the OS; anything else is left alone.
    pub fn os_theme_changed<S: ThemeSurface>(&mut self, surface: &mut S) -> Option<EffectiveTheme> {
        self.bus.emit(&UiSignal::OsThemeChanged {
            dark: self.scheme.prefers_dark(),
        });
        if self.prefs.read(&self.storage_key).as_deref() == Some(ThemeSetting::System.as_str()) {
            Some(self.update_theme(ThemeSetting::System, surface))
        } else {
            None
        }
    }

    pub fn scheme(&self) -> &C {
        &self.scheme
    }
}

/// Independent CAPTCHA synchroniser driven only by
/// [`UiSignal::PreferenceChanged`], for pages where the theme is applied by
/// something other than [`ThemeController`].
pub struct CaptchaSync<S, C> {
    surface: RefCell<S>,
    scheme: C,
    providers: Vec<CaptchaProvider>,
}

impl<S: ThemeSurface + 'static, C: ColorSchemeQuery + 'static> CaptchaSync<S, C> {
    pub fn new(surface: S, scheme: C, providers: Vec<CaptchaProvider>) -> Self {
        Self {
            surface: RefCell::new(surface),
            scheme,
            providers,
        }
    }

    /// Returns the number of frames reloaded.
    pub fn handle(&self, signal: &UiSignal) -> usize {
        let UiSignal::PreferenceChanged(setting) = signal else {
            return 0;
        };
        let theme = EffectiveTheme::resolve(*setting, self.scheme.prefers_dark());
        match self.surface.try_borrow_mut() {
            Ok(mut surface) => sync_captcha_frames(&mut *surface, &self.providers, theme),
            Err(_) => {
                log::warn!("captcha sync skipped: surface busy");
                0
            }
        }
    }

    pub fn attach(self: Rc<Self>, bus: &SignalBus) -> SubscriptionId {
        bus.subscribe(SignalKind::PreferenceChanged, move |signal| {
            self.handle(signal);
        })
    }

    pub fn with_surface<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.surface.borrow())
    }
}
