//! FFmpeg adapter for measurement and rendering.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::EngineSettings;

use super::errors::{EngineError, EngineResult};
use super::locate::EngineLocator;
use super::loudnorm::{parse_last_stats, LoudnormStats, MEASURE_LOUDNESS_RANGE};

/// Engine operations the processing pipeline needs.
///
/// The production implementation shells out to FFmpeg; tests substitute
/// in-process fakes.
pub trait AudioEngine {
    /// Measure loudness without rendering.
    ///
    /// Runs the normalization filter in print-only mode against the given
    /// target and peak ceiling and parses the stats block from the
    /// diagnostic stream. Non-zero exit or a missing block is a failure;
    /// there is no automatic retry.
    fn measure_loudness(
        &self,
        input: &Path,
        target_lufs: f64,
        true_peak: f64,
    ) -> EngineResult<LoudnormStats>;

    /// Render `input` to `output` through a filter chain.
    ///
    /// Exit code zero is the sole success signal; the adapter does not
    /// inspect the output file.
    fn render(
        &self,
        input: &Path,
        filter_chain: &str,
        codec_args: &[&str],
        output: &Path,
    ) -> EngineResult<()>;
}

/// Shell-out adapter around a resolved FFmpeg binary.
#[derive(Debug, Clone)]
pub struct FfmpegEngine {
    ffmpeg_path: PathBuf,
    probe_timeout: Duration,
}

impl FfmpegEngine {
    /// Adapter around an already-resolved binary.
    pub fn new(ffmpeg_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            probe_timeout: Duration::from_secs(5),
        }
    }

    /// Resolve the binary per settings and build the adapter.
    pub fn from_settings(settings: &EngineSettings) -> EngineResult<Self> {
        let ffmpeg_path = EngineLocator::from_settings(settings).locate()?;
        Ok(Self {
            ffmpeg_path,
            probe_timeout: Duration::from_secs(settings.probe_timeout_secs),
        })
    }

    /// Path of the resolved binary.
    pub fn path(&self) -> &Path {
        &self.ffmpeg_path
    }

    /// Probe the binary with `-version`.
    ///
    /// A hung or crashing binary must not wedge startup, so the probe is
    /// killed at the configured timeout and reported unavailable.
    pub fn is_available(&self) -> bool {
        let mut child = match Command::new(&self.ffmpeg_path)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => child,
            Err(_) => return false,
        };

        let deadline = Instant::now() + self.probe_timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return status.success(),
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        return false;
                    }
                    std::thread::sleep(Duration::from_millis(50));
                }
                Err(_) => return false,
            }
        }
    }
}

impl AudioEngine for FfmpegEngine {
    fn measure_loudness(
        &self,
        input: &Path,
        target_lufs: f64,
        true_peak: f64,
    ) -> EngineResult<LoudnormStats> {
        let filter = format!(
            "loudnorm=I={}:TP={}:LRA={}:print_format=json",
            target_lufs, true_peak, MEASURE_LOUDNESS_RANGE
        );

        let mut cmd = Command::new(&self.ffmpeg_path);
        cmd.arg("-i")
            .arg(input)
            .arg("-af")
            .arg(&filter)
            .arg("-f")
            .arg("null")
            .arg("-");

        debug!("Running loudness measurement: {:?}", cmd);

        let output = cmd.output().map_err(|e| EngineError::io("ffmpeg", e))?;
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            return Err(EngineError::command_failed(
                "ffmpeg",
                output.status.code(),
                stderr_tail(&stderr),
            ));
        }

        parse_last_stats(&stderr)
    }

    fn render(
        &self,
        input: &Path,
        filter_chain: &str,
        codec_args: &[&str],
        output: &Path,
    ) -> EngineResult<()> {
        let mut cmd = Command::new(&self.ffmpeg_path);
        cmd.arg("-i").arg(input).arg("-af").arg(filter_chain);
        for arg in codec_args {
            cmd.arg(arg);
        }
        cmd.arg("-y").arg(output);

        debug!("Running render: {:?}", cmd);

        let result = cmd.output().map_err(|e| EngineError::io("ffmpeg", e))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(EngineError::command_failed(
                "ffmpeg",
                result.status.code(),
                stderr_tail(&stderr),
            ));
        }

        Ok(())
    }
}

/// Last few non-blank diagnostic lines, enough to show the actual failure.
fn stderr_tail(stderr: &str) -> String {
    const TAIL_LINES: usize = 5;
    let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(TAIL_LINES);
    lines[start..].join("\n")
}
