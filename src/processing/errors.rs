//! Error types for the track processing pipeline.

use std::io;

use thiserror::Error;

use crate::engine::EngineError;

/// Error from a processing step.
///
/// These never escape [`TrackProcessor::process`](super::TrackProcessor::process);
/// the processor folds them into the per-track outcome so one bad file
/// cannot abort a batch.
#[derive(Error, Debug)]
pub enum ProcessError {
    /// A step rejected its input.
    #[error("Input rejected: {0}")]
    InvalidInput(String),

    /// A step finished but its output does not hold.
    #[error("Output rejected: {0}")]
    InvalidOutput(String),

    /// A step ran before the state it depends on was recorded.
    #[error("Missing precondition: {0}")]
    PreconditionFailed(String),

    /// The audio engine failed.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Filesystem failure around a step, with the operation named.
    #[error("Failed while {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: io::Error,
    },
}

impl ProcessError {
    /// Reject a step's input.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Reject a step's output.
    pub fn invalid_output(message: impl Into<String>) -> Self {
        Self::InvalidOutput(message.into())
    }

    /// Report state a step needed but did not find.
    pub fn precondition_failed(message: impl Into<String>) -> Self {
        Self::PreconditionFailed(message.into())
    }

    /// Wrap a filesystem error with the operation that hit it.
    pub fn io(operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }
}

/// Result type for processing steps.
pub type ProcessResult<T> = Result<T, ProcessError>;
