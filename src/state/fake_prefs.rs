//! In-memory preference capabilities used by unit tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use super::theme::{ColorSchemeQuery, PreferenceStore};

/// [`PreferenceStore`] whose clones share one map, so a test can keep a
/// handle to what the controller wrote.
#[derive(Clone, Debug, Default)]
pub struct MemoryPreferences {
    values: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryPreferences {
    pub fn with(key: &str, value: &str) -> Self {
        let mut prefs = Self::default();
        prefs.write(key, value);
        prefs
    }
}

impl PreferenceStore for MemoryPreferences {
    fn read(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) {
        self.values.borrow_mut().insert(key.to_owned(), value.to_owned());
    }
}

/// [`ColorSchemeQuery`] with a settable answer.
#[derive(Debug, Default)]
pub struct FixedColorScheme(Cell<bool>);

impl FixedColorScheme {
    pub fn new(dark: bool) -> Self {
        Self(Cell::new(dark))
    }

    pub fn set(&self, dark: bool) {
        self.0.set(dark);
    }
}

impl ColorSchemeQuery for FixedColorScheme {
    fn prefers_dark(&self) -> bool {
        self.0.get()
    }
}
