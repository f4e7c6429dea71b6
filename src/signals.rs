//! Observer registry for the page's named UI signals.
//!
//! DESIGN
//! ======
//! Theme and tag-filter modules never call each other. Anything that needs to
//! react to a change (the `themeChanged` DOM bridge, an independent CAPTCHA
//! synchroniser, logging) subscribes here by [`SignalKind`].
//!
//! The registry is single-threaded (`Rc<RefCell<..>>`); listeners may
//! subscribe or unsubscribe from inside a dispatch because the listener list
//! is snapshotted before callbacks run.

#[cfg(test)]
#[path = "signals_test.rs"]
mod signals_test;

use std::cell::RefCell;
use std::rc::Rc;

use crate::state::theme::ThemeSetting;

/// A signal broadcast through the [`SignalBus`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiSignal {
    /// A theme setting was applied and persisted.
    PreferenceChanged(ThemeSetting),
    /// The OS colour-scheme media query flipped.
    OsThemeChanged { dark: bool },
    /// A tag's selection membership flipped.
    TagToggled { tag: String, selected: bool },
    /// Every tag was deselected at once.
    FiltersCleared,
}

impl UiSignal {
    pub fn kind(&self) -> SignalKind {
        match self {
            Self::PreferenceChanged(_) => SignalKind::PreferenceChanged,
            Self::OsThemeChanged { .. } => SignalKind::OsThemeChanged,
            Self::TagToggled { .. } => SignalKind::TagToggled,
            Self::FiltersCleared => SignalKind::FiltersCleared,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignalKind {
    PreferenceChanged,
    OsThemeChanged,
    TagToggled,
    FiltersCleared,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Rc<dyn Fn(&UiSignal)>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(SubscriptionId, SignalKind, Listener)>,
}

/// Cheaply clonable handle to a shared listener registry.
#[derive(Clone, Default)]
pub struct SignalBus {
    inner: Rc<RefCell<Registry>>,
}

impl std::fmt::Debug for SignalBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalBus")
            .field("listeners", &self.inner.borrow().listeners.len())
            .finish()
    }
}

impl SignalBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, kind: SignalKind, listener: impl Fn(&UiSignal) + 'static) -> SubscriptionId {
        let mut registry = self.inner.borrow_mut();
        registry.next_id += 1;
        let id = SubscriptionId(registry.next_id);
        registry.listeners.push((id, kind, Rc::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if `id` was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registry = self.inner.borrow_mut();
        let before = registry.listeners.len();
        registry.listeners.retain(|(lid, _, _)| *lid != id);
        registry.listeners.len() != before
    }

    /// Dispatch `signal` to every listener of its kind, in subscription order.
    /// Returns the number of listeners notified.
    pub fn emit(&self, signal: &UiSignal) -> usize {
        let kind = signal.kind();
        let targets: Vec<Listener> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .map(|(_, _, listener)| Rc::clone(listener))
            .collect();
        for listener in &targets {
            listener(signal);
        }
        targets.len()
    }

    pub fn listener_count(&self, kind: SignalKind) -> usize {
        self.inner
            .borrow()
            .listeners
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .count()
    }
}
