//! Core types for intake analysis.

/// Decoded audio ready for metering.
///
/// Multi-channel sources are downmixed to mono at decode time, so one
/// buffer covers both the loudness and the peak measurement.
#[derive(Debug, Clone)]
pub struct AudioData {
    /// Mono samples, normalized to [-1.0, 1.0].
    pub samples: Vec<f64>,
    /// Native sample rate in Hz.
    pub sample_rate: u32,
    /// Duration in seconds.
    pub duration_secs: f64,
}

impl AudioData {
    /// Wrap decoded samples; duration is derived from the count and rate.
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> Self {
        let duration_secs = samples.len() as f64 / sample_rate as f64;
        Self {
            samples,
            sample_rate,
            duration_secs,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when nothing was decoded.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Error types for intake analysis.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Could not open or read the source file.
    #[error("Failed to read audio file: {0}")]
    IoError(#[from] std::io::Error),

    /// Container probe or packet demux failed.
    #[error("Demux error: {0}")]
    DemuxError(String),

    /// No decodable audio track in the container.
    #[error("No audio track found in {0}")]
    NoAudioTrack(String),

    /// Codec parameters missing or sample format unsupported.
    #[error("Unsupported audio: {0}")]
    UnsupportedAudio(String),

    /// Decoder failed irrecoverably.
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// Loudness meter rejected the audio.
    #[error("Loudness measurement failed: {0}")]
    MeterError(String),

    /// File decoded to zero samples.
    #[error("No audio samples decoded from {0}")]
    EmptyAudio(String),
}

/// Result type for intake analysis.
pub type AnalysisResult<T> = Result<T, AnalysisError>;
