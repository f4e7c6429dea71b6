//! Page state modules.
//!
//! DESIGN
//! ======
//! State is split by concern (`theme`, `tag_filter`) so each behaviour can be
//! exercised without the other or without a browser.

pub mod tag_filter;
pub mod theme;

#[cfg(test)]
pub(crate) mod fake_prefs;
