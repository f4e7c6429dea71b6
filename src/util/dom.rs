//! web-sys bindings for the live document.
//!
//! Everything here is best-effort: a missing window, document, element or
//! storage makes the call a no-op. Nothing in this module decides behaviour;
//! it only reads the page into state types and projects state back out.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    CustomEvent, CustomEventInit, Document, Element, Event, EventTarget, HtmlButtonElement, HtmlIFrameElement,
    HtmlInputElement, MediaQueryList, NodeList,
};

use crate::config::{StatsConfig, TagConfig};
use crate::net::stats::{StatUpdate, card_selector};
use crate::state::tag_filter::{Card, TagFilter};
use crate::state::theme::{ColorSchemeQuery, PreferenceStore, ThemeSetting};
use crate::util::captcha::{CaptchaProvider, ThemeSurface};

pub const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";

pub fn document() -> Option<Document> {
    web_sys::window()?.document()
}

fn elements(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    document
        .query_selector_all(selector)
        .map(|list| elements(&list))
        .unwrap_or_default()
}

pub fn query_all_in(root: &Element, selector: &str) -> Vec<Element> {
    root.query_selector_all(selector)
        .map(|list| elements(&list))
        .unwrap_or_default()
}

pub fn trimmed_text(el: &Element) -> String {
    el.text_content().unwrap_or_default().trim().to_owned()
}

fn set_class(el: &Element, class: &str, on: bool) {
    let classes = el.class_list();
    let _ = if on { classes.add_1(class) } else { classes.remove_1(class) };
}

/// Attach `handler` to `target` for the lifetime of the page.
pub fn listen(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) {
    let cb = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    if target
        .add_event_listener_with_callback(event, cb.as_ref().unchecked_ref())
        .is_ok()
    {
        cb.forget();
    }
}

// =============================================================================
// Theme capabilities
// =============================================================================

/// [`PreferenceStore`] backed by `window.localStorage`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStoragePreferences;

impl PreferenceStore for LocalStoragePreferences {
    fn read(&self, key: &str) -> Option<String> {
        let storage = web_sys::window()?.local_storage().ok().flatten()?;
        storage.get_item(key).ok().flatten()
    }

    fn write(&mut self, key: &str, value: &str) {
        let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) else {
            return;
        };
        if storage.set_item(key, value).is_err() {
            log::debug!("localStorage write rejected for {key}");
        }
    }
}

/// [`ColorSchemeQuery`] backed by `matchMedia("(prefers-color-scheme: dark)")`.
#[derive(Clone, Debug, Default)]
pub struct MediaQueryColorScheme {
    list: Option<MediaQueryList>,
}

impl MediaQueryColorScheme {
    pub fn new() -> Self {
        let list = web_sys::window().and_then(|w| w.match_media(DARK_SCHEME_QUERY).ok().flatten());
        Self { list }
    }

    pub fn list(&self) -> Option<&MediaQueryList> {
        self.list.as_ref()
    }
}

impl ColorSchemeQuery for MediaQueryColorScheme {
    fn prefers_dark(&self) -> bool {
        self.list.as_ref().map_or(false, MediaQueryList::matches)
    }
}

/// [`ThemeSurface`] over the live document.
#[derive(Clone, Debug)]
pub struct DomThemeSurface {
    dark_class: String,
}

impl DomThemeSurface {
    pub fn new(dark_class: &str) -> Self {
        Self {
            dark_class: dark_class.to_owned(),
        }
    }
}

impl ThemeSurface for DomThemeSurface {
    type Frame = HtmlIFrameElement;

    fn set_dark_class(&mut self, dark: bool) {
        if let Some(root) = document().and_then(|d| d.document_element()) {
            set_class(&root, &self.dark_class, dark);
        }
    }

    fn captcha_frames(&self, provider: &CaptchaProvider) -> Vec<HtmlIFrameElement> {
        let Some(doc) = document() else {
            return Vec::new();
        };
        query_all(&doc, &provider.selector())
            .into_iter()
            .filter_map(|el| el.dyn_into::<HtmlIFrameElement>().ok())
            .collect()
    }

    fn frame_src(&self, frame: &HtmlIFrameElement) -> String {
        frame.src()
    }

    fn assign_src(&mut self, frame: &HtmlIFrameElement, src: &str) {
        frame.set_src(src);
    }

    fn replace_frame(&mut self, frame: &HtmlIFrameElement, src: &str) {
        let Some(parent) = frame.parent_node() else {
            frame.set_src(src);
            return;
        };
        let Some(clone) = frame
            .clone_node_with_deep(true)
            .ok()
            .and_then(|node| node.dyn_into::<HtmlIFrameElement>().ok())
        else {
            return;
        };
        clone.set_src(src);
        if parent.replace_child(&clone, frame).is_err() {
            log::debug!("captcha frame replacement failed");
        }
    }
}

/// Dispatch `CustomEvent(event_name, { detail: { theme } })` on the document.
pub fn dispatch_theme_changed(event_name: &str, setting: ThemeSetting) {
    let Some(doc) = document() else {
        return;
    };
    let detail = js_sys::Object::new();
    let _ = js_sys::Reflect::set(&detail, &JsValue::from_str("theme"), &JsValue::from_str(setting.as_str()));
    let init = CustomEventInit::new();
    init.set_detail(&detail);
    match CustomEvent::new_with_event_init_dict(event_name, &init) {
        Ok(event) => {
            let _ = doc.dispatch_event(&event);
        }
        Err(_) => log::debug!("could not construct {event_name} event"),
    }
}

// =============================================================================
// Tag filter projection
// =============================================================================

/// Card elements with their extracted tags, in document order.
pub fn scan_cards(doc: &Document, config: &TagConfig) -> (Vec<Element>, Vec<Card>) {
    let elements = query_all(doc, &config.card_selector);
    let cards = elements
        .iter()
        .map(|el| Card::new(query_all_in(el, &config.tag_selector).iter().map(trimmed_text)))
        .collect();
    (elements, cards)
}

pub fn render_cards(cards: &[Element], filter: &TagFilter, config: &TagConfig) {
    for (el, visible) in cards.iter().zip(filter.visibility()) {
        set_class(el, &config.hidden_class, !*visible);
    }
}

/// Mark selected buttons. `buttons` must be in the order their labels were
/// passed to [`TagFilter::with_filter_buttons`].
pub fn render_filter_buttons(buttons: &[Element], filter: &TagFilter, config: &TagConfig) {
    for (index, button) in buttons.iter().enumerate() {
        set_class(button, &config.selected_class, filter.is_button_selected(index));
    }
}

/// Replace the hidden inputs inside the form-fields container.
pub fn render_form_fields(doc: &Document, filter: &TagFilter, config: &TagConfig) {
    let Some(container) = doc.get_element_by_id(&config.form_fields_id) else {
        return;
    };
    container.set_inner_html("");
    for field in filter.hidden_fields() {
        let Some(input) = doc
            .create_element("input")
            .ok()
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        else {
            continue;
        };
        input.set_type("hidden");
        input.set_name(&field.name);
        input.set_value(&field.value);
        let _ = container.append_child(&input);
    }
}

pub fn render_clear_control(doc: &Document, filter: &TagFilter, config: &TagConfig) {
    let Some(el) = doc.get_element_by_id(&config.clear_filters_id) else {
        return;
    };
    let control = filter.clear_control(config);
    for class in &control.remove_classes {
        set_class(&el, class, false);
    }
    for class in &control.add_classes {
        set_class(&el, class, true);
    }
    if let Some(button) = el.dyn_ref::<HtmlButtonElement>() {
        button.set_disabled(control.disabled);
    } else if control.disabled {
        let _ = el.set_attribute("disabled", "");
    } else {
        let _ = el.remove_attribute("disabled");
    }
}

// =============================================================================
// Stats projection
// =============================================================================

/// Write counter text into matching cards. Returns the number of nodes set.
pub fn apply_stat_updates(doc: &Document, config: &StatsConfig, updates: &[StatUpdate]) -> usize {
    let mut touched = 0;
    for update in updates {
        let Ok(Some(card)) = doc.query_selector(&card_selector(config, &update.project_id)) else {
            continue;
        };
        for target in query_all_in(&card, &update.field.selector()) {
            target.set_text_content(Some(&update.text));
            touched += 1;
        }
    }
    touched
}
