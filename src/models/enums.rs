//! Shared enums for export formats, naming templates, and batch state.

use serde::{Deserialize, Serialize};

/// Export format for rendered tracks.
///
/// Every format is pinned to 44.1 kHz for this pipeline; the variants only
/// select the codec and container extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// 24-bit little-endian PCM in WAV.
    #[default]
    #[serde(rename = "wav_24")]
    Wav24,
    /// 16-bit little-endian PCM in WAV.
    #[serde(rename = "wav_16")]
    Wav16,
    /// 24-bit big-endian PCM in AIFF.
    #[serde(rename = "aiff")]
    Aiff,
    /// FLAC lossless.
    #[serde(rename = "flac")]
    Flac,
}

impl OutputFormat {
    /// Human-readable label.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Wav24 => "WAV 24-bit",
            Self::Wav16 => "WAV 16-bit",
            Self::Aiff => "AIFF",
            Self::Flac => "FLAC",
        }
    }

    /// File extension for this format, without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Wav24 | Self::Wav16 => "wav",
            Self::Aiff => "aiff",
            Self::Flac => "flac",
        }
    }

    /// All formats in combo-box order.
    pub fn all() -> &'static [OutputFormat] {
        &[Self::Wav24, Self::Wav16, Self::Aiff, Self::Flac]
    }

    /// Look up by combo-box index; out of range falls back to the default.
    pub fn from_index(index: usize) -> Self {
        Self::all().get(index).copied().unwrap_or_default()
    }

    /// Position of this format in [`all`](Self::all).
    pub fn to_index(&self) -> usize {
        Self::all().iter().position(|f| f == self).unwrap_or(0)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Naming template applied to cleaned track names when deriving the
/// output filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NamingConvention {
    /// `{name} - DJ OPT`
    #[default]
    #[serde(rename = "Original - DJ OPT")]
    SuffixDjOpt,
    /// `DJ OPT - {name}`
    #[serde(rename = "DJ OPT - Original")]
    PrefixDjOpt,
    /// `{name} (Optimized)`
    #[serde(rename = "Original (Optimized)")]
    SuffixOptimized,
    /// `{name}_DJ_OPT`
    #[serde(rename = "Original_DJ_OPT")]
    UnderscoreDjOpt,
}

impl NamingConvention {
    /// The template's display label, also its serialized key.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SuffixDjOpt => "Original - DJ OPT",
            Self::PrefixDjOpt => "DJ OPT - Original",
            Self::SuffixOptimized => "Original (Optimized)",
            Self::UnderscoreDjOpt => "Original_DJ_OPT",
        }
    }

    /// All templates in combo-box order.
    pub fn all() -> &'static [NamingConvention] {
        &[
            Self::SuffixDjOpt,
            Self::PrefixDjOpt,
            Self::SuffixOptimized,
            Self::UnderscoreDjOpt,
        ]
    }

    /// Look up by combo-box index; out of range falls back to the default.
    pub fn from_index(index: usize) -> Self {
        Self::all().get(index).copied().unwrap_or_default()
    }

    /// Position of this template in [`all`](Self::all).
    pub fn to_index(&self) -> usize {
        Self::all().iter().position(|c| c == self).unwrap_or(0)
    }
}

impl std::fmt::Display for NamingConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Status of a track in the batch queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TrackStatus {
    /// Queued, not yet visited by the batch cursor.
    #[default]
    Ready,
    /// Currently being rendered (at most one track at a time).
    Processing,
    /// Rendered and verified successfully.
    Completed,
    /// Skipped by user request, processor never invoked.
    Skipped,
    /// Failed with an error message.
    Error,
}

impl TrackStatus {
    /// Label shown in the queue table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "Ready",
            Self::Processing => "Processing",
            Self::Completed => "Completed",
            Self::Skipped => "Skipped",
            Self::Error => "Error",
        }
    }

    /// True once the batch cursor has passed this track.
    pub fn is_visited(&self) -> bool {
        matches!(self, Self::Completed | Self::Skipped | Self::Error)
    }
}

impl std::fmt::Display for TrackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle phase of the batch controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BatchPhase {
    /// No batch configured.
    #[default]
    Idle,
    /// Worker iterating the queue.
    Running,
    /// Worker parked between tracks.
    Paused,
    /// Cancel requested, worker winding down.
    Cancelling,
    /// Batch finished (exhausted or cancelled).
    Done,
}

impl BatchPhase {
    /// Label shown in the status bar.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Running => "Running",
            Self::Paused => "Paused",
            Self::Cancelling => "Cancelling",
            Self::Done => "Done",
        }
    }

    /// A new batch may only be configured from these phases.
    pub fn accepts_setup(&self) -> bool {
        matches!(self, Self::Idle | Self::Done)
    }
}

impl std::fmt::Display for BatchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
