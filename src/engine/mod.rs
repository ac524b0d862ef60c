//! Audio engine adapter.
//!
//! Everything that actually touches audio goes through FFmpeg: the
//! measurement pass, the render pass, and the post-render verification. This
//! module owns locating the binary ([`EngineLocator`]), invoking it
//! ([`FfmpegEngine`]), and parsing the loudnorm stats block it prints
//! ([`LoudnormStats`]). The [`AudioEngine`] trait is the seam the processing
//! pipeline codes against.

mod errors;
mod ffmpeg;
mod locate;
mod loudnorm;

pub use errors::{EngineError, EngineResult};
pub use ffmpeg::{AudioEngine, FfmpegEngine};
pub use locate::EngineLocator;
pub use loudnorm::{parse_last_stats, LoudnormStats, MEASURE_LOUDNESS_RANGE};
