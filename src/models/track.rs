//! Track records and loudness classification.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::enums::TrackStatus;

/// Outcome tag on an intake analysis.
///
/// Callers must check this before trusting the numeric fields: an `Error`
/// analysis carries zeros, not measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    /// Measurement succeeded, values are trustworthy.
    #[default]
    Ready,
    /// Decode or metering failed, values are zeroed.
    Error,
}

/// One-shot loudness analysis of a source file, produced at intake time.
///
/// Values are stored unrounded; the `*_display` accessors round to one
/// decimal for presentation. Policy code must never consume the rounded
/// values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackAnalysis {
    /// Integrated loudness in LUFS (BS.1770 gated).
    pub integrated_lufs: f64,
    /// Sample peak of the mono downmix in dBFS.
    pub peak_dbfs: f64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Native sample rate in Hz.
    pub sample_rate: u32,
    /// Whether the numbers can be trusted.
    pub status: AnalysisStatus,
    /// Failure reason when `status` is `Error`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TrackAnalysis {
    /// Create a successful analysis result.
    pub fn new(integrated_lufs: f64, peak_dbfs: f64, duration_secs: f64, sample_rate: u32) -> Self {
        Self {
            integrated_lufs,
            peak_dbfs,
            duration_secs,
            sample_rate,
            status: AnalysisStatus::Ready,
            error: None,
        }
    }

    /// Create a zero-valued analysis tagged as failed.
    pub fn error_result(message: impl Into<String>) -> Self {
        Self {
            integrated_lufs: 0.0,
            peak_dbfs: 0.0,
            duration_secs: 0.0,
            sample_rate: 0,
            status: AnalysisStatus::Error,
            error: Some(message.into()),
        }
    }

    /// Check whether this analysis failed.
    pub fn is_error(&self) -> bool {
        self.status == AnalysisStatus::Error
    }

    /// Integrated loudness rounded to one decimal for display.
    pub fn lufs_display(&self) -> f64 {
        round_display(self.integrated_lufs)
    }

    /// Peak level rounded to one decimal for display.
    pub fn peak_display(&self) -> f64 {
        round_display(self.peak_dbfs)
    }

    /// Duration rounded to one decimal for display.
    pub fn duration_display(&self) -> f64 {
        round_display(self.duration_secs)
    }

    /// Whether this source already sits in the club-safe band.
    pub fn is_club_safe(&self) -> bool {
        is_club_safe(self.integrated_lufs, self.peak_dbfs)
    }
}

/// Round to one decimal place for display.
fn round_display(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Classify a loudness/peak pair as club-safe.
///
/// The band is fixed at `-14.0 <= LUFS <= -8.0` with peak strictly below
/// `-1.0` dBFS. It does not follow the active preset's target/peak fields,
/// so a track graded safe here may still be off-target for a non-club
/// preset.
pub fn is_club_safe(lufs: f64, peak_dbfs: f64) -> bool {
    (-14.0..=-8.0).contains(&lufs) && peak_dbfs < -1.0
}

/// A queued file: source path plus intake analysis and batch outcome.
///
/// Status transitions are owned by the batch controller while a run is
/// active; callers only edit the queue (add/remove) between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// Absolute path of the source file.
    pub source_path: PathBuf,
    /// Name shown in the queue (source file name).
    pub display_name: String,
    /// Intake analysis, if one was run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<TrackAnalysis>,
    /// Current queue status.
    pub status: TrackStatus,
    /// Verified loudness of the rendered output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_lufs: Option<f64>,
    /// Peak of the rendered output (the configured ceiling).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_peak: Option<f64>,
    /// Error message if status is `Error`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl Track {
    /// Create a track from a source path, deriving the display name.
    pub fn new(source_path: impl Into<PathBuf>) -> Self {
        let source_path = source_path.into();
        let display_name = display_name_for(&source_path);
        Self {
            source_path,
            display_name,
            analysis: None,
            status: TrackStatus::Ready,
            post_lufs: None,
            post_peak: None,
            error_message: None,
        }
    }

    /// Attach an intake analysis.
    pub fn with_analysis(mut self, analysis: TrackAnalysis) -> Self {
        self.analysis = Some(analysis);
        self
    }

    /// Loudness change achieved by processing, in dB.
    ///
    /// Requires both the intake analysis and a verified after-value.
    pub fn improvement_db(&self) -> Option<f64> {
        let before = self.analysis.as_ref().filter(|a| !a.is_error())?;
        let after = self.post_lufs?;
        Some(after - before.integrated_lufs)
    }
}

fn display_name_for(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
