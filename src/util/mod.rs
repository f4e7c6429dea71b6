//! Utility helpers shared across the behaviour modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns from state logic to
//! improve reuse and testability. `dom` holds every web-sys binding and only
//! exists in the `csr` build.

pub mod captcha;
pub mod csrf;
#[cfg(feature = "csr")]
pub mod dom;

#[cfg(test)]
pub(crate) mod fake_surface;
