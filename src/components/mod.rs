//! Leptos components mounted into optional host elements on the page.

pub mod tag_filter_bar;
pub mod theme_switcher;
