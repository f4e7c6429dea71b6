//! Crate-level error type.
//!
//! ERROR HANDLING
//! ==============
//! Missing DOM nodes and missing storage are not errors; callers no-op
//! instead. This type only covers paths that can genuinely fail: decoding the
//! embedded site config and the stats refresh request.

#[derive(Debug, thiserror::Error)]
pub enum UiError {
    #[error("invalid site config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("request failed: {0}")]
    Request(String),
    #[error("unexpected response status {0}")]
    Status(u16),
    #[error("browser API unavailable: {0}")]
    Unavailable(&'static str),
}
