//! WCC Core - Backend logic for WAV Channel Combiner
//!
//! This crate contains the ingestion, probing and merge orchestration with
//! zero UI dependencies. A front end owns a [`session::Session`], feeds it
//! user actions, and renders [`view`] models from it.

pub mod config;
pub mod errors;
pub mod logging;
pub mod merge;
pub mod models;
pub mod probe;
pub mod session;
pub mod tools;
pub mod view;

#[cfg(all(test, unix))]
mod test_support;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
