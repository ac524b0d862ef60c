//! Loudnorm measurement output.
//!
//! The measurement pass runs the loudnorm filter with `print_format=json`,
//! which writes a stats block to the diagnostic stream among ordinary log
//! lines. This module locates and parses that block.

use serde::Deserialize;

use super::errors::{EngineError, EngineResult};

/// Loudness range handed to every measurement pass, in LU.
pub const MEASURE_LOUDNESS_RANGE: f64 = 11.0;

/// Measured loudness block emitted by the loudnorm filter.
///
/// FFmpeg prints every numeric field as a JSON string, so the raw values
/// stay strings here; the typed accessors parse on demand. `"-inf"` is a
/// legal value for silent input and parses to negative infinity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoudnormStats {
    /// Integrated loudness of the input in LUFS.
    pub input_i: String,
    /// True peak of the input in dBTP.
    pub input_tp: String,
    /// Loudness range of the input in LU.
    pub input_lra: String,
    /// Gating threshold of the input in LUFS.
    pub input_thresh: String,
    /// Offset the filter would apply to reach the target.
    pub target_offset: String,
}

impl LoudnormStats {
    /// Integrated loudness of the input in LUFS.
    pub fn measured_lufs(&self) -> EngineResult<f64> {
        parse_field("input_i", &self.input_i)
    }

    /// True peak of the input in dBTP.
    pub fn measured_peak(&self) -> EngineResult<f64> {
        parse_field("input_tp", &self.input_tp)
    }

    /// Loudness range of the input in LU.
    pub fn measured_lra(&self) -> EngineResult<f64> {
        parse_field("input_lra", &self.input_lra)
    }
}

fn parse_field(name: &str, raw: &str) -> EngineResult<f64> {
    raw.trim()
        .parse()
        .map_err(|e| EngineError::parse(name, format!("{:?}: {}", raw, e)))
}

/// Locate and parse the last well-formed stats block in diagnostic output.
///
/// The engine logs freely before and after the block, and some runs print
/// more than one block; the last one is authoritative.
pub fn parse_last_stats(stderr: &str) -> EngineResult<LoudnormStats> {
    let start = stderr
        .rfind('{')
        .ok_or_else(|| EngineError::parse("loudnorm stats", "no JSON block in output"))?;
    let end = stderr
        .rfind('}')
        .ok_or_else(|| EngineError::parse("loudnorm stats", "unterminated JSON block"))?;
    if end < start {
        return Err(EngineError::parse(
            "loudnorm stats",
            "unterminated JSON block",
        ));
    }

    serde_json::from_str(&stderr[start..=end])
        .map_err(|e| EngineError::parse("loudnorm stats", e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_BLOCK: &str = r#"
size=N/A time=00:03:07.43 bitrate=N/A speed= 214x
[Parsed_loudnorm_0 @ 0x7f8]
{
    "input_i" : "-18.27",
    "input_tp" : "-2.11",
    "input_lra" : "6.80",
    "input_thresh" : "-28.54",
    "output_i" : "-8.43",
    "output_tp" : "-1.00",
    "output_lra" : "5.90",
    "output_thresh" : "-18.71",
    "normalization_type" : "dynamic",
    "target_offset" : "0.43"
}
"#;

    #[test]
    fn parses_block_among_log_noise() {
        let stats = parse_last_stats(SAMPLE_BLOCK).unwrap();
        assert_eq!(stats.input_i, "-18.27");
        assert!((stats.measured_lufs().unwrap() - (-18.27)).abs() < 1e-9);
        assert!((stats.measured_peak().unwrap() - (-2.11)).abs() < 1e-9);
        assert!((stats.measured_lra().unwrap() - 6.8).abs() < 1e-9);
    }

    #[test]
    fn last_block_wins() {
        let stale = r#"{
            "input_i" : "-99.0",
            "input_tp" : "-99.0",
            "input_lra" : "0.0",
            "input_thresh" : "-99.0",
            "target_offset" : "0.0"
        }"#;
        let combined = format!("{}\nmore log lines\n{}", stale, SAMPLE_BLOCK);
        let stats = parse_last_stats(&combined).unwrap();
        assert_eq!(stats.input_i, "-18.27");
    }

    #[test]
    fn silence_parses_to_negative_infinity() {
        let block = r#"{
            "input_i" : "-inf",
            "input_tp" : "-inf",
            "input_lra" : "0.00",
            "input_thresh" : "-inf",
            "target_offset" : "0.00"
        }"#;
        let stats = parse_last_stats(block).unwrap();
        let lufs = stats.measured_lufs().unwrap();
        assert!(lufs.is_infinite() && lufs < 0.0);
    }

    #[test]
    fn missing_block_is_a_parse_error() {
        let result = parse_last_stats("frame= 1000 fps=0.0 q=-1.0 size=N/A");
        assert!(matches!(result, Err(EngineError::Parse { .. })));
    }

    #[test]
    fn mismatched_braces_are_rejected() {
        let result = parse_last_stats("log } noise {");
        assert!(matches!(result, Err(EngineError::Parse { .. })));
    }

    #[test]
    fn incomplete_block_is_rejected() {
        let result = parse_last_stats(r#"{ "input_i" : "-18.0" }"#);
        assert!(matches!(result, Err(EngineError::Parse { .. })));
    }
}
