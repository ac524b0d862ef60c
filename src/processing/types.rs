//! Shared types for the track processing pipeline.

use std::path::{Path, PathBuf};

use crate::config::Preset;
use crate::engine::{AudioEngine, LoudnormStats};
use crate::models::OutputFormat;

use super::chain::FilterChain;
use super::codec::ensure_extension;

/// Read-only inputs for processing one track.
///
/// Steps receive the context immutably; everything a step produces goes
/// into [`ProcessState`].
pub struct ProcessContext<'a> {
    /// Engine used for the measure, render, and verify passes.
    pub engine: &'a dyn AudioEngine,
    /// Loudness preset driving the filter policy.
    pub preset: &'a Preset,
    /// Source file.
    pub input_path: &'a Path,
    /// Destination file, extension already corrected for the format.
    pub output_path: PathBuf,
    /// Render format.
    pub output_format: OutputFormat,
}

impl<'a> ProcessContext<'a> {
    /// Build a context, correcting the output extension to the format.
    pub fn new(
        engine: &'a dyn AudioEngine,
        preset: &'a Preset,
        input_path: &'a Path,
        output_path: &Path,
        output_format: OutputFormat,
    ) -> Self {
        Self {
            engine,
            preset,
            input_path,
            output_path: ensure_extension(output_path, output_format),
            output_format,
        }
    }
}

/// Mutable state accumulated across processing steps.
///
/// Each step writes its output here; later steps read what earlier
/// steps recorded.
#[derive(Debug, Default)]
pub struct ProcessState {
    /// First-pass measurement of the source.
    pub measurement: Option<LoudnormStats>,
    /// Planned filter chain for the render pass.
    pub chain: Option<FilterChain>,
    /// Set once the render pass has written the output file.
    pub rendered: bool,
    /// Independently re-measured loudness of the rendered file.
    pub verified_lufs: Option<f64>,
}

impl ProcessState {
    /// Loudness of the source, parsed from the first-pass measurement.
    pub fn measured_lufs(&self) -> Option<f64> {
        self.measurement
            .as_ref()
            .and_then(|stats| stats.measured_lufs().ok())
    }
}

/// Final outcome for one track.
///
/// Processing never returns `Err`: failures are data, so the batch
/// driver can record them and move on to the next track.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOutcome {
    /// Whether the render pass produced a usable file.
    pub success: bool,
    /// Failure reason when `success` is false.
    pub error: Option<String>,
    /// Path of the rendered file.
    pub output_path: Option<PathBuf>,
    /// Source loudness from the first-pass measurement, in LUFS.
    pub original_lufs: Option<f64>,
    /// Verified loudness of the rendered file, in LUFS.
    pub final_lufs: Option<f64>,
}

impl ProcessOutcome {
    /// Outcome for a track that rendered successfully.
    pub fn completed(
        output_path: PathBuf,
        original_lufs: Option<f64>,
        final_lufs: Option<f64>,
    ) -> Self {
        Self {
            success: true,
            error: None,
            output_path: Some(output_path),
            original_lufs,
            final_lufs,
        }
    }

    /// Outcome for a track that failed.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            output_path: None,
            original_lufs: None,
            final_lufs: None,
        }
    }

    /// The failure reason, or a placeholder for malformed outcomes.
    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or("Unknown error")
    }
}
