//! Two-pass track processing.
//!
//! One track flows through four steps:
//!
//! 1. **Measure**: first-pass loudness measurement of the source.
//! 2. **Plan**: derive the filter chain from measurement and preset.
//! 3. **Render**: apply the chain and write the output file.
//! 4. **Verify**: re-measure the rendered file for the real result.
//!
//! [`TrackProcessor::process`] is infallible by contract: step failures
//! become `success = false` outcomes that the batch driver records.

mod chain;
mod codec;
mod errors;
mod processor;
mod step;
mod steps;
mod types;

pub use chain::{FilterChain, FilterStage, GAIN_DEADBAND_DB, HIGHPASS_MIN_HZ, MAX_GAIN_DB};
pub use codec::{codec_args, ensure_extension, OUTPUT_SAMPLE_RATE};
pub use errors::{ProcessError, ProcessResult};
pub use processor::TrackProcessor;
pub use step::ProcessStep;
pub use steps::{MeasureStep, PlanStep, RenderStep, VerifyStep, VERIFY_FALLBACK_LUFS};
pub use types::{ProcessContext, ProcessOutcome, ProcessState};
