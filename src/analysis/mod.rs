//! Intake loudness analysis.
//!
//! One-shot measurement of a source file at queue-add time, independent of
//! the batch pipeline (which re-measures through the audio engine). The
//! pipeline is three pure stages:
//!
//! 1. **Decode** (`decode`): full-file decode to a mono f64 buffer at the
//!    native sample rate, averaging channels per frame.
//!
//! 2. **Metering** (`loudness`): BS.1770 integrated loudness plus sample
//!    peak with a fixed silence floor.
//!
//! 3. **Assembly** (`analyzer`): fold both measurements into a
//!    [`TrackAnalysis`](crate::models::TrackAnalysis) record, or an
//!    error-tagged record when anything fails.

mod analyzer;
mod decode;
mod loudness;
mod types;

pub use analyzer::{analyze_file, analyze_file_or_error};
pub use decode::decode_to_mono;
pub use loudness::{integrated_lufs, sample_peak_dbfs, SILENCE_FLOOR_DBFS};
pub use types::{AnalysisError, AnalysisResult, AudioData};
