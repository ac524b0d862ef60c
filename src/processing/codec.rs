//! Codec selection for the render pass.

use std::path::{Path, PathBuf};

use crate::models::OutputFormat;

/// Sample rate every rendered file is pinned to. DJ hardware expects
/// 44.1 kHz.
pub const OUTPUT_SAMPLE_RATE: u32 = 44_100;

/// Engine arguments selecting the codec for a render format.
pub fn codec_args(format: OutputFormat) -> &'static [&'static str] {
    match format {
        OutputFormat::Wav24 => &["-c:a", "pcm_s24le", "-ar", "44100"],
        OutputFormat::Wav16 => &["-c:a", "pcm_s16le", "-ar", "44100"],
        OutputFormat::Aiff => &["-c:a", "pcm_s24be", "-ar", "44100"],
        OutputFormat::Flac => &["-c:a", "flac", "-ar", "44100"],
    }
}

/// Force the path's extension to match the render format.
///
/// Callers may hand us a `.wav` path with an AIFF or FLAC format
/// selected; the container has to win or the file is mislabeled.
pub fn ensure_extension(path: &Path, format: OutputFormat) -> PathBuf {
    path.with_extension(format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_format_is_pinned_to_44100() {
        let rate = OUTPUT_SAMPLE_RATE.to_string();
        for &format in OutputFormat::all() {
            let args = codec_args(format);
            let rate_pos = args.iter().position(|a| *a == "-ar");
            assert_eq!(
                rate_pos.map(|i| args[i + 1]),
                Some(rate.as_str()),
                "{format:?} missing sample rate pin"
            );
        }
    }

    #[test]
    fn codec_matches_format() {
        assert!(codec_args(OutputFormat::Wav24).contains(&"pcm_s24le"));
        assert!(codec_args(OutputFormat::Wav16).contains(&"pcm_s16le"));
        assert!(codec_args(OutputFormat::Aiff).contains(&"pcm_s24be"));
        assert!(codec_args(OutputFormat::Flac).contains(&"flac"));
    }

    #[test]
    fn extension_follows_the_format_not_the_request() {
        let p = Path::new("/out/Track - DJ OPT.wav");
        assert_eq!(
            ensure_extension(p, OutputFormat::Aiff),
            PathBuf::from("/out/Track - DJ OPT.aiff")
        );
        assert_eq!(
            ensure_extension(p, OutputFormat::Flac),
            PathBuf::from("/out/Track - DJ OPT.flac")
        );
        assert_eq!(
            ensure_extension(p, OutputFormat::Wav16),
            PathBuf::from("/out/Track - DJ OPT.wav")
        );
    }
}
