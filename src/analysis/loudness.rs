//! Loudness and peak metering over decoded audio.

use ebur128::{EbuR128, Mode};

use super::types::{AnalysisError, AnalysisResult, AudioData};

/// Peak floor reported for digital silence instead of `log10(0)`.
pub const SILENCE_FLOOR_DBFS: f64 = -60.0;

/// Integrated loudness per ITU-R BS.1770, K-weighted and gated.
///
/// The meter runs at the asset's native sample rate on the mono downmix.
/// Digital silence measures as negative infinity, which flows through to
/// the caller unchanged.
pub fn integrated_lufs(audio: &AudioData) -> AnalysisResult<f64> {
    if audio.is_empty() {
        return Err(AnalysisError::EmptyAudio("no samples to measure".into()));
    }

    let mut meter = EbuR128::new(1, audio.sample_rate, Mode::I)
        .map_err(|e| AnalysisError::MeterError(e.to_string()))?;
    meter
        .add_frames_f64(&audio.samples)
        .map_err(|e| AnalysisError::MeterError(e.to_string()))?;
    meter
        .loudness_global()
        .map_err(|e| AnalysisError::MeterError(e.to_string()))
}

/// Sample peak of the mono downmix in dBFS.
pub fn sample_peak_dbfs(audio: &AudioData) -> f64 {
    let peak = audio
        .samples
        .iter()
        .fold(0.0_f64, |acc, &s| acc.max(s.abs()));

    if peak > 0.0 {
        20.0 * peak.log10()
    } else {
        SILENCE_FLOOR_DBFS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(amplitude: f64, secs: f64, sample_rate: u32) -> AudioData {
        let total = (secs * sample_rate as f64) as usize;
        let samples = (0..total)
            .map(|i| {
                let t = i as f64 / sample_rate as f64;
                amplitude * (2.0 * std::f64::consts::PI * 1000.0 * t).sin()
            })
            .collect();
        AudioData::new(samples, sample_rate)
    }

    #[test]
    fn sine_tone_measures_near_reference() {
        // A -20 dBFS sine should land around -23 LUFS after K-weighting.
        let audio = sine(0.1, 3.0, 44100);
        let lufs = integrated_lufs(&audio).unwrap();
        assert!(
            (-30.0..-15.0).contains(&lufs),
            "expected roughly -23 LUFS, got {:.1}",
            lufs
        );
    }

    #[test]
    fn silence_measures_negative_infinity() {
        let audio = AudioData::new(vec![0.0; 44100], 44100);
        let lufs = integrated_lufs(&audio).unwrap();
        assert!(lufs.is_infinite() && lufs < 0.0, "got {}", lufs);
    }

    #[test]
    fn empty_audio_is_rejected() {
        let audio = AudioData::new(Vec::new(), 44100);
        assert!(matches!(
            integrated_lufs(&audio),
            Err(AnalysisError::EmptyAudio(_))
        ));
    }

    #[test]
    fn peak_of_silence_hits_the_floor() {
        let audio = AudioData::new(vec![0.0; 1000], 44100);
        assert_eq!(sample_peak_dbfs(&audio), SILENCE_FLOOR_DBFS);
    }

    #[test]
    fn peak_converts_to_dbfs() {
        let audio = AudioData::new(vec![0.0, -0.5, 0.25], 44100);
        let peak = sample_peak_dbfs(&audio);
        assert!((peak - (-6.0206)).abs() < 0.01, "got {}", peak);

        let full_scale = AudioData::new(vec![1.0], 44100);
        assert!(sample_peak_dbfs(&full_scale).abs() < 1e-9);
    }
}
