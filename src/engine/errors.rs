//! Error types for engine invocation.

use std::io;

/// Error types for locating and running the audio engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// No usable executable anywhere in the search chain. Fatal: nothing
    /// can be processed without the engine.
    #[error("FFmpeg not found. Install FFmpeg or set an explicit path in settings.")]
    NotFound,

    /// The engine ran but exited non-zero.
    #[error("{tool} exited with code {code:?}: {message}")]
    CommandFailed {
        tool: String,
        code: Option<i32>,
        message: String,
    },

    /// Could not launch or talk to the engine process.
    #[error("Failed to run {tool}: {source}")]
    Io {
        tool: String,
        #[source]
        source: io::Error,
    },

    /// Diagnostic output did not contain a usable stats block.
    #[error("Could not parse {what}: {message}")]
    Parse { what: String, message: String },
}

impl EngineError {
    /// Create a command failure error.
    pub fn command_failed(
        tool: impl Into<String>,
        code: Option<i32>,
        message: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            tool: tool.into(),
            code,
            message: message.into(),
        }
    }

    /// Create a process IO error.
    pub fn io(tool: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            tool: tool.into(),
            source,
        }
    }

    /// Create a parse error.
    pub fn parse(what: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            what: what.into(),
            message: message.into(),
        }
    }
}

/// Type alias for engine results.
pub type EngineResult<T> = Result<T, EngineError>;
