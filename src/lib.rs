//! # portfolio-ui
//!
//! Leptos + WASM behaviour layer for the portfolio site's server-rendered
//! pages: light/dark theme preference kept in sync with embedded CAPTCHA
//! widgets, and tag filtering over the project card list.
//!
//! Pure state lives in `state`, `signals`, `util` and `net` and compiles
//! natively for tests. The `csr` feature adds the browser boot sequence that
//! binds that state to the live document.

pub mod components;
pub mod config;
pub mod error;
pub mod net;
pub mod signals;
pub mod state;
pub mod util;

#[cfg(feature = "csr")]
mod boot;

#[cfg(feature = "csr")]
pub use boot::{clear_filters, get_theme, start, toggle_tag_in_filter, update_theme};
