//! Page-ready wiring for the browser build.
//!
//! ARCHITECTURE
//! ============
//! `start` runs once the document is parsed. It loads the site config, applies
//! the theme, scans the card list, stores everything in a thread-local
//! [`Session`], and only then registers listeners, so no user action can run
//! before the initial scan has finished.
//!
//! Every entry point (DOM listeners, timers, components, exported JS
//! functions) goes through [`with_session`]. A reentrant call, such as a
//! `themeChanged` listener calling back into `updateTheme`, is dropped with a
//! warning rather than panicking on the `RefCell`.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::wasm_bindgen;
use web_sys::{Element, HtmlElement};

use crate::components::tag_filter_bar::TagFilterBar;
use crate::components::theme_switcher::ThemeSwitcher;
use crate::config::{SiteConfig, StatsConfig, ThemeConfig, remember_storage_key, theme_storage_key};
use crate::net::stats::{fetch_stats, stat_updates};
use crate::signals::{SignalBus, SignalKind, UiSignal};
use crate::state::tag_filter::TagFilter;
use crate::state::theme::{
    CaptchaSync, ColorSchemeQuery, PreferenceStore, ThemeController, ThemeSetting, resolve_setting,
};
use crate::util::dom::{self, DomThemeSurface, LocalStoragePreferences, MediaQueryColorScheme};
use crate::util::csrf;

type DomThemeController = ThemeController<LocalStoragePreferences, MediaQueryColorScheme>;

struct Session {
    config: SiteConfig,
    bus: SignalBus,
    theme: DomThemeController,
    surface: DomThemeSurface,
    theme_signal: RwSignal<ThemeSetting>,
    filter: RwSignal<TagFilter>,
    cards: Vec<Element>,
    buttons: Vec<Element>,
}

thread_local! {
    static SESSION: RefCell<Option<Session>> = const { RefCell::new(None) };
}

fn with_session<R>(f: impl FnOnce(&mut Session) -> R) -> Option<R> {
    SESSION.with(|cell| match cell.try_borrow_mut() {
        Ok(mut slot) => slot.as_mut().map(f),
        Err(_) => {
            log::warn!("page session busy; ignoring reentrant call");
            None
        }
    })
}

impl Session {
    fn apply_theme(&mut self, setting: ThemeSetting) {
        self.theme.update_theme(setting, &mut self.surface);
        self.theme_signal.set(setting);
    }

    fn render_filter(&self) {
        let Some(doc) = dom::document() else {
            return;
        };
        let tags = &self.config.tags;
        self.filter.with_untracked(|f| {
            dom::render_cards(&self.cards, f, tags);
            dom::render_filter_buttons(&self.buttons, f, tags);
            dom::render_form_fields(&doc, f, tags);
            dom::render_clear_control(&doc, f, tags);
        });
    }

    fn after_toggle(&self, tag: &str, selected: bool) {
        self.render_filter();
        self.bus.emit(&UiSignal::TagToggled {
            tag: tag.to_owned(),
            selected,
        });
    }
}

// =============================================================================
// Exported entry points
// =============================================================================

/// WASM entry point: initialise now, or on `DOMContentLoaded` if the
/// document is still loading.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);

    let Some(doc) = dom::document() else {
        return;
    };
    if doc.ready_state() == "loading" {
        dom::listen(&doc, "DOMContentLoaded", |_| init());
    } else {
        init();
    }
}

/// Current theme setting as `"light"`, `"dark"` or `"system"`.
#[wasm_bindgen(js_name = getTheme)]
pub fn get_theme() -> String {
    let from_session = SESSION.with(|cell| {
        cell.try_borrow()
            .ok()
            .and_then(|slot| slot.as_ref().map(|s| s.theme.get_theme()))
    });
    let setting = from_session.unwrap_or_else(|| {
        let stored = LocalStoragePreferences.read(&theme_storage_key());
        resolve_setting(stored.as_deref(), MediaQueryColorScheme::new().prefers_dark())
    });
    setting.as_str().to_owned()
}

/// Apply and persist a theme setting. Unknown values are ignored.
#[wasm_bindgen(js_name = updateTheme)]
pub fn update_theme(setting: &str) {
    match ThemeSetting::parse(setting) {
        Some(setting) => select_theme(setting),
        None => log::warn!("ignoring unknown theme setting {setting:?}"),
    }
}

/// Toggle the filter button labelled `tag_name`, if there is one.
#[wasm_bindgen(js_name = toggleTagInFilter)]
pub fn toggle_tag_in_filter(tag_name: &str) {
    with_session(|s| {
        let mut outcome = None;
        s.filter.update(|f| outcome = f.toggle_tag_in_filter(tag_name));
        match outcome {
            Some(selected) => s.after_toggle(tag_name, selected),
            None => log::debug!("no filter button labelled {tag_name:?}"),
        }
    });
}

/// Deselect every tag, empty the hidden inputs and disable the clear control.
#[wasm_bindgen(js_name = clearFilters)]
pub fn clear_filters() {
    with_session(|s| {
        s.filter.update(TagFilter::clear_filters);
        s.render_filter();
        s.bus.emit(&UiSignal::FiltersCleared);
    });
}

pub(crate) fn select_theme(setting: ThemeSetting) {
    with_session(|s| s.apply_theme(setting));
}

pub(crate) fn toggle_tag(tag: &str) {
    with_session(|s| {
        let mut selected = false;
        s.filter.update(|f| selected = f.toggle_tag(tag));
        s.after_toggle(tag, selected);
    });
}

// =============================================================================
// Initialisation
// =============================================================================

fn init() {
    let config = SiteConfig::load();
    remember_storage_key(&config.theme.storage_key);
    let Some(doc) = dom::document() else {
        return;
    };
    let bus = SignalBus::new();
    subscribe_bridges(&bus, &config.theme);

    // Theme: apply immediately, then once more after CAPTCHA widgets load.
    let mut theme = ThemeController::new(
        LocalStoragePreferences,
        MediaQueryColorScheme::new(),
        &config.theme,
        bus.clone(),
    );
    let mut surface = DomThemeSurface::new(&config.theme.dark_class);
    let initial = theme.get_theme();
    theme.update_theme(initial, &mut surface);
    let media_query = theme.scheme().list().cloned();

    // Tags: scan cards and buttons, seed the selection from buttons the server
    // rendered as selected.
    let (cards, parsed) = dom::scan_cards(&doc, &config.tags);
    let buttons = dom::query_all(&doc, &config.tags.filter_button_selector);
    let labels: Vec<String> = buttons.iter().map(dom::trimmed_text).collect();
    let mut filter = TagFilter::new(parsed, &config.tags.field_name).with_filter_buttons(&labels);
    for (button, label) in buttons.iter().zip(&labels) {
        if button.class_list().contains(&config.tags.selected_class) && !filter.is_tag_selected(label) {
            filter.toggle_tag(label);
        }
    }
    log::info!(
        "portfolio-ui ready: theme {}, {} cards, {} tags",
        initial.as_str(),
        filter.cards().len(),
        filter.catalog().len()
    );

    let theme_signal = RwSignal::new(initial);
    let filter = RwSignal::new(filter);
    let session = Session {
        config: config.clone(),
        bus,
        theme,
        surface,
        theme_signal,
        filter,
        cards,
        buttons: buttons.clone(),
    };
    SESSION.with(|cell| *cell.borrow_mut() = Some(session));
    with_session(|s| s.render_filter());

    let reapply_delay = config.theme.reapply_delay_ms;
    Timeout::new(reapply_delay, || {
        with_session(|s| {
            let setting = s.theme.get_theme();
            s.apply_theme(setting);
        });
    })
    .forget();

    if let Some(list) = media_query {
        dom::listen(&list, "change", |_| {
            with_session(|s| {
                if let Some(effective) = s.theme.os_theme_changed(&mut s.surface) {
                    log::debug!("followed OS colour scheme to {}", effective.as_str());
                }
            });
        });
    }

    bind_filter_controls(&doc, &config, &buttons);
    bind_stats_refresh(&doc, &config.stats);
    mount_components(&doc, &config, theme_signal, filter);
}

fn subscribe_bridges(bus: &SignalBus, theme: &ThemeConfig) {
    let event_name = theme.event_name.clone();
    bus.subscribe(SignalKind::PreferenceChanged, move |signal| {
        if let UiSignal::PreferenceChanged(setting) = signal {
            dom::dispatch_theme_changed(&event_name, *setting);
        }
    });
    if theme.independent_captcha_sync {
        Rc::new(CaptchaSync::new(
            DomThemeSurface::new(&theme.dark_class),
            MediaQueryColorScheme::new(),
            theme.captcha.clone(),
        ))
        .attach(bus);
    }
    bus.subscribe(SignalKind::TagToggled, |signal| log::debug!("{signal:?}"));
    bus.subscribe(SignalKind::FiltersCleared, |_| log::debug!("tag filters cleared"));
}

fn bind_filter_controls(doc: &web_sys::Document, config: &SiteConfig, buttons: &[Element]) {
    if config.tags.bind_filter_buttons {
        for button in buttons {
            let label = dom::trimmed_text(button);
            dom::listen(button, "click", move |_| toggle_tag_in_filter(&label));
        }
    }
    if let Some(clear) = doc.get_element_by_id(&config.tags.clear_filters_id) {
        dom::listen(&clear, "click", |_| clear_filters());
    }
}

fn bind_stats_refresh(doc: &web_sys::Document, stats: &StatsConfig) {
    if stats.refresh_on_load {
        refresh_stats(stats.clone());
    }
    if let Some(control) = doc.get_element_by_id(&stats.refresh_button_id) {
        let stats = stats.clone();
        dom::listen(&control, "click", move |_| refresh_stats(stats.clone()));
    }
}

/// Fire-and-forget stats refresh; failures are logged and dropped.
fn refresh_stats(stats: StatsConfig) {
    wasm_bindgen_futures::spawn_local(async move {
        let token = csrf::read_token(&stats.csrf_cookie);
        match fetch_stats(&stats, token.as_deref()).await {
            Ok(response) => {
                let updates = stat_updates(&response);
                if let Some(doc) = dom::document() {
                    let touched = dom::apply_stat_updates(&doc, &stats, &updates);
                    log::debug!("refreshed {touched} stat counters");
                }
            }
            Err(e) => log::warn!("stats refresh failed: {e}"),
        }
    });
}

fn mount_components(
    doc: &web_sys::Document,
    config: &SiteConfig,
    theme_signal: RwSignal<ThemeSetting>,
    filter: RwSignal<TagFilter>,
) {
    let host = |id: &str| {
        doc.get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    };

    if let Some(el) = host(&config.theme.switcher_mount_id) {
        leptos::mount::mount_to(el, move || {
            provide_context(theme_signal);
            view! { <ThemeSwitcher/> }
        })
        .forget();
    }

    if let Some(el) = host(&config.tags.filter_bar_mount_id) {
        let tags = config.tags.clone();
        leptos::mount::mount_to(el, move || {
            provide_context(filter);
            provide_context(tags);
            view! { <TagFilterBar/> }
        })
        .forget();
    }
}
