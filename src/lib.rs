//! DeckReady Core - Backend logic for DeckReady
//!
//! Batch loudness normalization for DJ music tracks. This crate contains
//! all business logic with zero UI dependencies: intake analysis, the
//! two-pass measure/render/verify processor around an external FFmpeg
//! engine, the filter policy, filename derivation, and the batch queue
//! state machine. A GUI or CLI front end drives it through
//! [`batch::BatchController`] and consumes [`models::BatchEvent`]s.

pub mod analysis;
pub mod batch;
pub mod config;
pub mod engine;
pub mod logging;
pub mod models;
pub mod naming;
pub mod processing;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
