//! Tag-based filtering over the project card list.
//!
//! DESIGN
//! ======
//! [`TagFilter`] holds the one authoritative selection set. Every visible
//! artefact (card `hidden` classes, `.tag-filter.selected` buttons, hidden
//! form inputs, the clear-filters control, the reactive filter bar) is a
//! projection computed from it, never read back from the DOM.
//!
//! Filtering is AND: a card is shown iff every selected tag is on the card.
//! An empty selection shows everything.

#[cfg(test)]
#[path = "tag_filter_test.rs"]
mod tag_filter_test;

use std::collections::BTreeSet;

use crate::config::TagConfig;

/// One project card's tags: trimmed, deduplicated, in first-seen order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Card {
    tags: Vec<String>,
}

impl Card {
    pub fn new<I, T>(tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for tag in tags {
            let tag = tag.as_ref().trim();
            if !out.iter().any(|t| t == tag) {
                out.push(tag.to_owned());
            }
        }
        Self { tags: out }
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn matches(&self, selection: &Selection) -> bool {
        selection.iter().all(|tag| self.has_tag(tag))
    }
}

/// Currently selected tags. Membership is what counts; insertion order is
/// kept only so renderings are stable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    tags: Vec<String>,
}

impl Selection {
    /// Flip membership of `tag`. Returns whether it is now selected.
    pub fn toggle(&mut self, tag: &str) -> bool {
        if let Some(pos) = self.tags.iter().position(|t| t == tag) {
            self.tags.remove(pos);
            false
        } else {
            self.tags.push(tag.to_owned());
            true
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn clear(&mut self) {
        self.tags.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }
}

/// `<input type="hidden">` to emit inside the form-fields container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HiddenField {
    pub name: String,
    pub value: String,
}

/// Rendering of the clear-filters control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClearControl {
    pub disabled: bool,
    pub add_classes: Vec<String>,
    pub remove_classes: Vec<String>,
}

impl ClearControl {
    pub fn for_selection(has_selection: bool, config: &TagConfig) -> Self {
        let (add, remove) = if has_selection {
            (&config.clear_enabled_classes, &config.clear_disabled_classes)
        } else {
            (&config.clear_disabled_classes, &config.clear_enabled_classes)
        };
        Self {
            disabled: !has_selection,
            add_classes: add.clone(),
            remove_classes: remove.clone(),
        }
    }

    pub fn class_string(&self) -> String {
        self.add_classes.join(" ")
    }
}

/// Cards, catalog and selection for one page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagFilter {
    cards: Vec<Card>,
    catalog: Vec<String>,
    buttons: Vec<String>,
    selection: Selection,
    visible: Vec<bool>,
    field_name: String,
}

impl TagFilter {
    /// Build the unfiltered view: all cards visible, sorted catalog of every
    /// distinct tag.
    pub fn new(cards: Vec<Card>, field_name: &str) -> Self {
        let catalog: BTreeSet<&str> = cards
            .iter()
            .flat_map(|card| card.tags.iter().map(String::as_str))
            .collect();
        let catalog = catalog.into_iter().map(str::to_owned).collect();
        let visible = vec![true; cards.len()];
        Self {
            cards,
            catalog,
            buttons: Vec::new(),
            selection: Selection::default(),
            visible,
            field_name: field_name.to_owned(),
        }
    }

    /// Register the labels of the page's standalone filter buttons, in
    /// document order.
    #[must_use]
    pub fn with_filter_buttons<I, T>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.buttons = labels.into_iter().map(|l| l.as_ref().trim().to_owned()).collect();
        self
    }

    /// Position of the first button labelled `label`.
    fn first_button(&self, label: &str) -> Option<usize> {
        self.buttons.iter().position(|b| b == label)
    }

    /// Whether the button at `index` shows as selected. When several buttons
    /// share a label only the first one does.
    pub fn is_button_selected(&self, index: usize) -> bool {
        self.buttons
            .get(index)
            .is_some_and(|label| self.selection.contains(label) && self.first_button(label) == Some(index))
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn catalog(&self) -> &[String] {
        &self.catalog
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_tag_selected(&self, tag: &str) -> bool {
        self.selection.contains(tag)
    }

    /// Flip `tag` and recompute. Returns whether it is now selected.
    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        let selected = self.selection.toggle(tag);
        self.filter_projects();
        selected
    }

    /// Button-variant toggle: only acts when a filter button is labelled
    /// `tag_name`. Returns the new membership, or `None` when no such button
    /// exists.
    pub fn toggle_tag_in_filter(&mut self, tag_name: &str) -> Option<bool> {
        self.first_button(tag_name)?;
        Some(self.toggle_tag(tag_name))
    }

    /// Deselect everything and show all cards.
    pub fn clear_filters(&mut self) {
        self.selection.clear();
        self.filter_projects();
    }

    /// Recompute visibility for every card. Returns the visible count.
    pub fn filter_projects(&mut self) -> usize {
        let selection = &self.selection;
        self.visible = self.cards.iter().map(|card| card.matches(selection)).collect();
        self.visible.iter().filter(|v| **v).count()
    }

    /// Per-card visibility, parallel to [`Self::cards`].
    pub fn visibility(&self) -> &[bool] {
        &self.visible
    }

    /// Indices of the currently visible cards.
    pub fn filtered(&self) -> Vec<usize> {
        self.visible
            .iter()
            .enumerate()
            .filter(|(_, v)| **v)
            .map(|(i, _)| i)
            .collect()
    }

    /// Hidden inputs mirroring the selection: selected filter buttons in
    /// document order, then any selected tag without a button in selection
    /// order.
    pub fn hidden_fields(&self) -> Vec<HiddenField> {
        let from_buttons = self
            .buttons
            .iter()
            .enumerate()
            .filter(|(i, _)| self.is_button_selected(*i))
            .map(|(_, b)| b.as_str());
        let without_button = self
            .selection
            .iter()
            .filter(|tag| !self.buttons.iter().any(|b| b == tag));
        from_buttons
            .chain(without_button)
            .map(|tag| HiddenField {
                name: self.field_name.clone(),
                value: tag.to_owned(),
            })
            .collect()
    }

    pub fn clear_control(&self, config: &TagConfig) -> ClearControl {
        ClearControl::for_selection(!self.selection.is_empty(), config)
    }
}
