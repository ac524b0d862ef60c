//! Full-file decode to a mono sample buffer.

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::AudioBufferRef;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::warn;

use super::types::{AnalysisError, AnalysisResult, AudioData};

/// Decode an audio file fully into memory, downmixed to mono.
///
/// Multi-channel audio is averaged across channels per frame. Corrupt
/// packets are skipped so a damaged file still yields the rest of its
/// audio; only demux-level failures abort the decode.
pub fn decode_to_mono(path: &Path) -> AnalysisResult<AudioData> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| AnalysisError::DemuxError(e.to_string()))?;

    let mut format = probed.format;
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AnalysisError::NoAudioTrack(path.display().to_string()))?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| AnalysisError::UnsupportedAudio("missing sample rate".into()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| AnalysisError::UnsupportedAudio(e.to_string()))?;

    let mut samples: Vec<f64> = Vec::new();

    loop {
        match format.next_packet() {
            Ok(packet) => {
                if packet.track_id() != track_id {
                    continue;
                }
                match decoder.decode(&packet) {
                    Ok(decoded) => {
                        let planes = planar_f32(&decoded)?;
                        downmix_into(&planes, &mut samples);
                    }
                    Err(SymphoniaError::DecodeError(e)) => {
                        warn!("Skipping undecodable packet in {}: {}", path.display(), e);
                    }
                    Err(e) => return Err(AnalysisError::DecodeError(e.to_string())),
                }
            }
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(AnalysisError::DemuxError(e.to_string())),
        }
    }

    if samples.is_empty() {
        return Err(AnalysisError::EmptyAudio(path.display().to_string()));
    }

    Ok(AudioData::new(samples, sample_rate))
}

/// Convert a decoded buffer to planar f32, normalizing integer formats
/// to [-1.0, 1.0].
fn planar_f32(decoded: &AudioBufferRef<'_>) -> AnalysisResult<Vec<Vec<f32>>> {
    let mut planes_out: Vec<Vec<f32>> = Vec::with_capacity(decoded.spec().channels.count());

    match decoded {
        AudioBufferRef::F32(buf) => {
            for plane in buf.planes().planes() {
                planes_out.push(plane.to_vec());
            }
        }
        AudioBufferRef::F64(buf) => {
            for plane in buf.planes().planes() {
                planes_out.push(plane.iter().map(|&s| s as f32).collect());
            }
        }
        AudioBufferRef::S32(buf) => {
            for plane in buf.planes().planes() {
                planes_out.push(plane.iter().map(|&s| (s as f32) / (i32::MAX as f32)).collect());
            }
        }
        AudioBufferRef::S24(buf) => {
            // 2^23 - 1
            let max_value = 8_388_607.0;
            for plane in buf.planes().planes() {
                planes_out.push(plane.iter().map(|&s| s.inner() as f32 / max_value).collect());
            }
        }
        AudioBufferRef::S16(buf) => {
            for plane in buf.planes().planes() {
                planes_out.push(plane.iter().map(|&s| (s as f32) / (i16::MAX as f32)).collect());
            }
        }
        AudioBufferRef::U8(buf) => {
            for plane in buf.planes().planes() {
                planes_out.push(
                    plane
                        .iter()
                        .map(|&s| ((s as i16 - 128) as f32) / 128.0)
                        .collect(),
                );
            }
        }
        _ => {
            return Err(AnalysisError::UnsupportedAudio(
                "unsupported sample format".into(),
            ))
        }
    }

    Ok(planes_out)
}

/// Append the per-frame channel mean to the mono accumulator.
fn downmix_into(planes: &[Vec<f32>], samples: &mut Vec<f64>) {
    let Some(first) = planes.first() else {
        return;
    };
    if planes.len() == 1 {
        samples.extend(first.iter().map(|&s| f64::from(s)));
        return;
    }
    let channel_count = planes.len() as f64;
    for frame in 0..first.len() {
        let mut sum = 0.0;
        for plane in planes {
            sum += f64::from(plane.get(frame).copied().unwrap_or(0.0));
        }
        samples.push(sum / channel_count);
    }
}

#[cfg(test)]
pub(super) mod wav_fixture {
    use std::io;
    use std::path::Path;

    /// Write a minimal PCM16 WAV file with interleaved samples.
    pub fn write_pcm16(
        path: &Path,
        channels: u16,
        sample_rate: u32,
        samples: &[i16],
    ) -> io::Result<()> {
        let data_len = (samples.len() * 2) as u32;
        let block_align = channels * 2;
        let mut bytes = Vec::with_capacity(44 + data_len as usize);
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
        bytes.extend_from_slice(b"WAVEfmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&channels.to_le_bytes());
        bytes.extend_from_slice(&sample_rate.to_le_bytes());
        bytes.extend_from_slice(&(sample_rate * u32::from(block_align)).to_le_bytes());
        bytes.extend_from_slice(&block_align.to_le_bytes());
        bytes.extend_from_slice(&16u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_len.to_le_bytes());
        for s in samples {
            bytes.extend_from_slice(&s.to_le_bytes());
        }
        std::fs::write(path, bytes)
    }

    /// Mono sine tone as PCM16 samples.
    pub fn sine_samples(amplitude: f32, frequency: f32, secs: f32, sample_rate: u32) -> Vec<i16> {
        let total = (secs * sample_rate as f32) as usize;
        (0..total)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                let s = amplitude * (2.0 * std::f32::consts::PI * frequency * t).sin();
                (s * f32::from(i16::MAX)) as i16
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::wav_fixture::{sine_samples, write_pcm16};
    use super::*;

    #[test]
    fn decodes_mono_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let samples = sine_samples(0.5, 440.0, 0.5, 44100);
        write_pcm16(&path, 1, 44100, &samples).unwrap();

        let audio = decode_to_mono(&path).unwrap();
        assert_eq!(audio.sample_rate, 44100);
        assert_eq!(audio.len(), 22050);
        assert!((audio.duration_secs - 0.5).abs() < 1e-6);

        let peak = audio.samples.iter().fold(0.0_f64, |acc, &s| acc.max(s.abs()));
        assert!((peak - 0.5).abs() < 0.01, "peak {} not near 0.5", peak);
    }

    #[test]
    fn stereo_downmix_averages_channels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        // L and R cancel exactly, the mono mean is silence.
        let mut samples = Vec::new();
        for _ in 0..4410 {
            samples.push(16384_i16);
            samples.push(-16384_i16);
        }
        write_pcm16(&path, 2, 44100, &samples).unwrap();

        let audio = decode_to_mono(&path).unwrap();
        assert_eq!(audio.len(), 4410);
        let peak = audio.samples.iter().fold(0.0_f64, |acc, &s| acc.max(s.abs()));
        assert!(peak < 1e-4, "expected cancellation, peak {}", peak);
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = decode_to_mono(Path::new("/nonexistent/audio.wav"));
        assert!(matches!(result, Err(AnalysisError::IoError(_))));
    }

    #[test]
    fn garbage_file_fails_demux() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noise.wav");
        std::fs::write(&path, b"this is not an audio container").unwrap();

        let result = decode_to_mono(&path);
        assert!(matches!(result, Err(AnalysisError::DemuxError(_))));
    }

    #[test]
    fn empty_data_chunk_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.wav");
        write_pcm16(&path, 1, 44100, &[]).unwrap();

        let result = decode_to_mono(&path);
        assert!(matches!(result, Err(AnalysisError::EmptyAudio(_))));
    }
}
