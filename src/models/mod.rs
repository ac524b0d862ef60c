//! Data models for DeckReady.
//!
//! This module contains the core data structures used throughout the
//! library:
//! - Enums for output formats, naming conventions, track and batch status
//! - Track records with intake analysis and processing outcome
//! - Batch lifecycle events

mod enums;
mod events;
mod track;

// Re-export all public types
pub use enums::{BatchPhase, NamingConvention, OutputFormat, TrackStatus};
pub use events::{BatchEvent, COMPLETED_MESSAGE, SKIPPED_MESSAGE};
pub use track::{is_club_safe, AnalysisStatus, Track, TrackAnalysis};
