//! Networking modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! `stats` handles the optional repository statistics refresh, the only HTTP
//! call the page makes.

pub mod stats;
