//! Batch lifecycle events emitted by the background worker.

/// Completion message for a successfully rendered track.
pub const COMPLETED_MESSAGE: &str = "Completed successfully";

/// Completion message for a track skipped by user request.
pub const SKIPPED_MESSAGE: &str = "Skipped by user";

/// Events emitted by the batch worker, consumed over a bounded channel.
///
/// Events for track `i` are emitted in index order and never interleave
/// with events for track `i + 1`.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    /// The worker is about to process this track.
    TrackStarted {
        /// Queue index of the track.
        index: usize,
        /// Display name of the track.
        name: String,
    },

    /// The worker finished (or skipped, or failed) this track.
    TrackCompleted {
        /// Queue index of the track.
        index: usize,
        /// Whether a verified output file was produced.
        success: bool,
        /// "Completed successfully", "Skipped by user", or the error.
        message: String,
        /// Verified loudness of the output, 0.0 when unsuccessful.
        after_lufs: f64,
        /// Peak of the output (the configured ceiling), 0.0 when unsuccessful.
        after_peak: f64,
    },

    /// Visited-track count after each track, monotonically non-decreasing.
    Progress {
        /// Tracks visited so far (processed, failed, or skipped).
        current: usize,
        /// Total tracks in the batch.
        total: usize,
    },

    /// The batch finished, by exhaustion or cancellation.
    BatchCompleted {
        /// Tracks that rendered successfully.
        processed: usize,
        /// Total tracks in the batch.
        total: usize,
    },
}

impl BatchEvent {
    /// Queue index this event concerns, if it is track-scoped.
    pub fn track_index(&self) -> Option<usize> {
        match self {
            Self::TrackStarted { index, .. } | Self::TrackCompleted { index, .. } => Some(*index),
            _ => None,
        }
    }
}
