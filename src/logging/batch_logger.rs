//! Per-run batch logger with file and callback output.
//!
//! Each batch run gets its own log file. Lines also go to an optional
//! callback for live display. Compact mode filters progress chatter and
//! keeps recent engine output in a tail buffer, dumped only when a track
//! fails.

use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use parking_lot::Mutex;

use crate::models::{BatchEvent, SKIPPED_MESSAGE};

use super::types::{LogCallback, LogConfig, LogLevel, MessagePrefix};

/// Batch run logger with dual output (file + callback).
pub struct BatchLogger {
    /// Run name for identification.
    run_name: String,
    /// Path to the log file.
    log_path: PathBuf,
    /// Buffered file writer, dropped on close.
    file_writer: Arc<Mutex<Option<BufWriter<File>>>>,
    /// Callback for live log output.
    callback: Arc<Mutex<Option<LogCallback>>>,
    config: LogConfig,
    /// Recent engine output, bounded by `config.error_tail`.
    tail_buffer: Arc<Mutex<VecDeque<String>>>,
    /// Last progress percent logged, for compact-mode filtering.
    last_progress: Arc<Mutex<u32>>,
}

impl BatchLogger {
    /// Create a new batch logger writing to `{log_dir}/{run_name}.log`.
    pub fn new(
        run_name: impl Into<String>,
        log_dir: impl AsRef<Path>,
        config: LogConfig,
        callback: Option<LogCallback>,
    ) -> std::io::Result<Self> {
        let run_name = run_name.into();
        let log_dir = log_dir.as_ref();

        fs::create_dir_all(log_dir)?;

        let log_path = log_dir.join(format!("{}.log", sanitize_filename(&run_name)));
        let writer = BufWriter::new(File::create(&log_path)?);
        let tail_capacity = config.error_tail;

        Ok(Self {
            run_name,
            log_path,
            file_writer: Arc::new(Mutex::new(Some(writer))),
            callback: Arc::new(Mutex::new(callback)),
            config,
            tail_buffer: Arc::new(Mutex::new(VecDeque::with_capacity(tail_capacity))),
            last_progress: Arc::new(Mutex::new(0)),
        })
    }

    /// A timestamped run name, for callers that do not supply one.
    pub fn default_run_name() -> String {
        format!("batch_{}", Local::now().format("%Y%m%d_%H%M%S"))
    }

    /// Get the run name.
    pub fn run_name(&self) -> &str {
        &self.run_name
    }

    /// Get the log file path.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Log a message at the given level.
    pub fn log(&self, level: LogLevel, message: &str) {
        if level < self.config.level {
            return;
        }
        let line = self.stamp(message);
        self.emit(&line);
    }

    /// Log an info message.
    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    /// Log a debug message.
    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    /// Log a warning.
    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, &MessagePrefix::Warning.format(message));
    }

    /// Log an error.
    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, &MessagePrefix::Error.format(message));
    }

    /// Log an engine command line.
    pub fn command(&self, command: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Command.format(command));
    }

    /// Log a track marker.
    pub fn track(&self, label: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Track.format(label));
    }

    /// Log a success message.
    pub fn success(&self, message: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Success.format(message));
    }

    /// Log a progress update (filtered in compact mode).
    ///
    /// Returns true if the progress was logged, false if filtered.
    pub fn progress(&self, percent: u32) -> bool {
        if self.config.compact {
            let mut last = self.last_progress.lock();
            let step = self.config.progress_step;

            let bucket = (percent / step) * step;
            let last_bucket = (*last / step) * step;

            if bucket <= last_bucket && percent < 100 {
                return false;
            }
            *last = percent;
        }

        self.log(LogLevel::Info, &format!("Progress: {}%", percent));
        true
    }

    /// Record an engine output line.
    ///
    /// Always lands in the tail buffer; in compact mode it is not echoed
    /// to the log itself.
    pub fn engine_line(&self, line: &str) {
        {
            let mut tail = self.tail_buffer.lock();
            if tail.len() >= self.config.error_tail {
                tail.pop_front();
            }
            tail.push_back(line.to_string());
        }

        if !self.config.compact {
            self.emit(&self.stamp(&format!("[engine] {}", line)));
        }
    }

    /// Dump the tail buffer, typically after a failed track.
    pub fn show_tail(&self, header: &str) {
        let tail = self.tail_buffer.lock();
        if tail.is_empty() {
            return;
        }

        self.emit(&self.stamp(&format!("[{}/tail]", header)));
        for line in tail.iter() {
            self.emit(&self.stamp(line));
        }
    }

    /// Clear the tail buffer (between tracks).
    pub fn clear_tail(&self) {
        self.tail_buffer.lock().clear();
    }

    /// Get the current tail buffer contents.
    pub fn get_tail(&self) -> Vec<String> {
        self.tail_buffer.lock().iter().cloned().collect()
    }

    /// Record a batch lifecycle event as log lines.
    ///
    /// Lets an event consumer mirror the run into the log file with one
    /// call per event. A track failure dumps the engine tail; each new
    /// track starts with a clean tail.
    pub fn record_event(&self, event: &BatchEvent) {
        match event {
            BatchEvent::TrackStarted { index, name } => {
                self.clear_tail();
                self.track(&format!("Track {}: {}", index + 1, name));
            }
            BatchEvent::TrackCompleted {
                success: true,
                message,
                after_lufs,
                after_peak,
                ..
            } => {
                self.success(&format!(
                    "{} ({:.1} LUFS, peak {:.1} dBTP)",
                    message, after_lufs, after_peak
                ));
            }
            BatchEvent::TrackCompleted { message, .. } if message == SKIPPED_MESSAGE => {
                self.info(message);
            }
            BatchEvent::TrackCompleted { message, .. } => {
                self.error(message);
                self.show_tail("engine");
            }
            BatchEvent::Progress { current, total } => {
                if *total > 0 {
                    self.progress((current * 100 / total) as u32);
                }
            }
            BatchEvent::BatchCompleted { processed, total } => {
                self.success(&format!(
                    "Batch complete: {}/{} tracks processed",
                    processed, total
                ));
            }
        }
    }

    /// Flush the log file.
    pub fn flush(&self) {
        if let Some(ref mut writer) = *self.file_writer.lock() {
            let _ = writer.flush();
        }
    }

    /// Close the logger and release the file handle.
    pub fn close(&self) {
        self.flush();
        *self.file_writer.lock() = None;
    }

    fn stamp(&self, message: &str) -> String {
        if !self.config.show_timestamps {
            return message.to_string();
        }
        format!("[{}] {}", Local::now().format("%H:%M:%S"), message)
    }

    fn emit(&self, line: &str) {
        if let Some(ref mut writer) = *self.file_writer.lock() {
            let _ = writeln!(writer, "{}", line);
        }

        if let Some(ref callback) = *self.callback.lock() {
            callback(line);
        }
    }
}

impl Drop for BatchLogger {
    fn drop(&mut self) {
        self.close();
    }
}

/// Replace characters that are unsafe in filenames.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// Builder for [`BatchLogger`].
pub struct BatchLoggerBuilder {
    run_name: String,
    log_dir: PathBuf,
    config: LogConfig,
    callback: Option<LogCallback>,
}

impl BatchLoggerBuilder {
    /// Start a builder for the given run name and log directory.
    pub fn new(run_name: impl Into<String>, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            run_name: run_name.into(),
            log_dir: log_dir.into(),
            config: LogConfig::default(),
            callback: None,
        }
    }

    /// Replace the whole logging configuration.
    pub fn config(mut self, config: LogConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the log level.
    pub fn level(mut self, level: LogLevel) -> Self {
        self.config.level = level;
        self
    }

    /// Enable or disable compact mode.
    pub fn compact(mut self, compact: bool) -> Self {
        self.config.compact = compact;
        self
    }

    /// Set the live output callback.
    pub fn callback(mut self, callback: LogCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    /// Build the logger.
    pub fn build(self) -> std::io::Result<BatchLogger> {
        BatchLogger::new(self.run_name, self.log_dir, self.config, self.callback)
    }
}
