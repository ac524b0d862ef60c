//! File intake measurement.

use std::path::Path;

use tracing::debug;

use crate::models::TrackAnalysis;

use super::decode::decode_to_mono;
use super::loudness::{integrated_lufs, sample_peak_dbfs};
use super::types::AnalysisResult;

/// Measure a single audio file for queue display.
///
/// Decodes the full file, downmixes to mono, and reports integrated
/// loudness, sample peak, duration, and sample rate. Values are stored
/// unrounded; display rounding lives on [`TrackAnalysis`].
pub fn analyze_file(path: &Path) -> AnalysisResult<TrackAnalysis> {
    let audio = decode_to_mono(path)?;
    let lufs = integrated_lufs(&audio)?;
    let peak = sample_peak_dbfs(&audio);

    debug!(
        "analyzed {}: {:.1} LUFS, peak {:.1} dBFS, {:.1}s @ {} Hz",
        path.display(),
        lufs,
        peak,
        audio.duration_secs,
        audio.sample_rate
    );

    Ok(TrackAnalysis::new(
        lufs,
        peak,
        audio.duration_secs,
        audio.sample_rate,
    ))
}

/// Analyze a file, folding any failure into an error-tagged record.
///
/// The queue always gets a row to display; failures carry the reason in
/// the record instead of propagating.
pub fn analyze_file_or_error(path: &Path) -> TrackAnalysis {
    match analyze_file(path) {
        Ok(analysis) => analysis,
        Err(e) => TrackAnalysis::error_result(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::super::decode::wav_fixture::{sine_samples, write_pcm16};
    use super::*;

    #[test]
    fn analyzes_a_sine_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        write_pcm16(&path, 1, 44100, &sine_samples(0.1, 1000.0, 3.0, 44100)).unwrap();

        let analysis = analyze_file(&path).unwrap();
        assert!(!analysis.is_error());
        assert_eq!(analysis.sample_rate, 44100);
        assert!((analysis.duration_secs - 3.0).abs() < 0.01);
        assert!((analysis.peak_dbfs - (-20.0)).abs() < 0.2, "peak {}", analysis.peak_dbfs);
        assert!(
            (-30.0..-15.0).contains(&analysis.integrated_lufs),
            "lufs {}",
            analysis.integrated_lufs
        );
        // Quiet reference tone sits below the club-safe band.
        assert!(!analysis.is_club_safe());
    }

    #[test]
    fn failure_becomes_error_record() {
        let analysis = analyze_file_or_error(Path::new("/nonexistent/track.flac"));
        assert!(analysis.is_error());
        assert_eq!(analysis.integrated_lufs, 0.0);
        assert_eq!(analysis.sample_rate, 0);
        assert!(analysis.error.is_some());
    }
}
