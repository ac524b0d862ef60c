//! Batch queue controller and its background worker.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender};
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{Preset, PresetCatalog};
use crate::engine::AudioEngine;
use crate::models::{
    BatchEvent, BatchPhase, NamingConvention, OutputFormat, Track, TrackStatus, COMPLETED_MESSAGE,
    SKIPPED_MESSAGE,
};
use crate::naming::output_filename;
use crate::processing::{ProcessContext, TrackProcessor, VERIFY_FALLBACK_LUFS};

use super::BatchControl;

/// Poll interval while the worker is parked on pause.
const PAUSE_POLL: Duration = Duration::from_millis(100);

/// Capacity of the event channel between worker and caller.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Error from batch lifecycle operations.
#[derive(Error, Debug)]
pub enum BatchError {
    /// A batch is still active; setup is only valid from Idle or Done.
    #[error("A batch is already active (phase: {0})")]
    AlreadyRunning(BatchPhase),

    /// start() was called without a configured batch.
    #[error("No batch configured")]
    NotConfigured,

    /// setup() was called with an empty track list.
    #[error("The batch queue is empty")]
    EmptyQueue,

    /// The output folder could not be created.
    #[error("Failed to prepare output folder {path}: {source}")]
    OutputFolder {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for batch operations.
pub type BatchResult<T> = Result<T, BatchError>;

/// Everything needed to run one batch.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    /// Tracks in queue order.
    pub tracks: Vec<Track>,
    /// Key into the preset catalog; unknown keys fall back to the default.
    pub preset_key: String,
    /// Render format for every track in the batch.
    pub output_format: OutputFormat,
    /// Folder rendered files are written into.
    pub output_folder: PathBuf,
    /// Naming template for output filenames.
    pub naming_convention: NamingConvention,
}

/// A configured batch waiting for `start()`.
struct PendingBatch {
    request: BatchRequest,
    preset: Preset,
    sender: Sender<BatchEvent>,
}

/// Sequential state machine driving the track processor over a queue.
///
/// One background worker owns the loop; the caller steers it through the
/// shared [`BatchControl`](super::BatchControl) token and consumes
/// [`BatchEvent`]s from the receiver handed out by [`setup`](Self::setup).
/// Rendering is strictly sequential: one engine subprocess in flight at
/// a time.
pub struct BatchController {
    engine: Arc<dyn AudioEngine + Send + Sync>,
    presets: PresetCatalog,
    control: BatchControl,
    phase: Arc<Mutex<BatchPhase>>,
    pending: Option<PendingBatch>,
    worker: Option<JoinHandle<Vec<Track>>>,
}

impl BatchController {
    pub fn new(engine: Arc<dyn AudioEngine + Send + Sync>, presets: PresetCatalog) -> Self {
        Self {
            engine,
            presets,
            control: BatchControl::new(),
            phase: Arc::new(Mutex::new(BatchPhase::Idle)),
            pending: None,
            worker: None,
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> BatchPhase {
        *self.phase.lock()
    }

    /// Configure a batch and hand back the event receiver.
    ///
    /// Only valid from `Idle` or `Done`. Clears any stale pause, cancel,
    /// and skip state from a previous run and creates the output folder.
    pub fn setup(&mut self, request: BatchRequest) -> BatchResult<Receiver<BatchEvent>> {
        let phase = self.phase();
        if !phase.accepts_setup() {
            return Err(BatchError::AlreadyRunning(phase));
        }
        if request.tracks.is_empty() {
            return Err(BatchError::EmptyQueue);
        }
        // Reap the previous worker, if any, now that it is Done.
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }

        fs::create_dir_all(&request.output_folder).map_err(|source| BatchError::OutputFolder {
            path: request.output_folder.clone(),
            source,
        })?;

        self.control.reset();
        *self.phase.lock() = BatchPhase::Idle;

        let preset = self.presets.get(&request.preset_key).clone();
        let (sender, receiver) = bounded(EVENT_CHANNEL_CAPACITY);
        info!(
            tracks = request.tracks.len(),
            preset = %preset.label,
            format = %request.output_format,
            "batch configured"
        );
        self.pending = Some(PendingBatch {
            request,
            preset,
            sender,
        });
        Ok(receiver)
    }

    /// Spawn the worker and start iterating the queue.
    pub fn start(&mut self) -> BatchResult<()> {
        let pending = self.pending.take().ok_or(BatchError::NotConfigured)?;
        *self.phase.lock() = BatchPhase::Running;

        let worker = Worker {
            tracks: pending.request.tracks,
            preset: pending.preset,
            output_format: pending.request.output_format,
            output_folder: pending.request.output_folder,
            naming_convention: pending.request.naming_convention,
            engine: Arc::clone(&self.engine),
            control: self.control.clone(),
            phase: Arc::clone(&self.phase),
            sender: pending.sender,
        };
        self.worker = Some(thread::spawn(move || worker.run()));
        Ok(())
    }

    /// Park the worker before its next track. No effect mid-render.
    pub fn pause(&self) {
        self.control.pause();
        let mut phase = self.phase.lock();
        if *phase == BatchPhase::Running {
            *phase = BatchPhase::Paused;
        }
    }

    /// Release a paused worker.
    pub fn resume(&self) {
        self.control.resume();
        let mut phase = self.phase.lock();
        if *phase == BatchPhase::Paused {
            *phase = BatchPhase::Running;
        }
    }

    /// Mark a track to be skipped when the cursor reaches it.
    pub fn skip(&self, index: usize) {
        self.control.skip(index);
    }

    /// Request cooperative cancellation. Idempotent; an in-flight render
    /// always completes before the worker stops.
    pub fn cancel(&self) {
        self.control.request_cancel();
        let mut phase = self.phase.lock();
        if matches!(*phase, BatchPhase::Running | BatchPhase::Paused) {
            *phase = BatchPhase::Cancelling;
        }
    }

    /// Wait for the worker to finish and return the final track states.
    ///
    /// Returns `None` if no worker was running or it panicked.
    pub fn join(&mut self) -> Option<Vec<Track>> {
        let handle = self.worker.take()?;
        match handle.join() {
            Ok(tracks) => Some(tracks),
            Err(_) => {
                warn!("batch worker panicked");
                None
            }
        }
    }
}

/// State moved into the background worker thread.
struct Worker {
    tracks: Vec<Track>,
    preset: Preset,
    output_format: OutputFormat,
    output_folder: PathBuf,
    naming_convention: NamingConvention,
    engine: Arc<dyn AudioEngine + Send + Sync>,
    control: BatchControl,
    phase: Arc<Mutex<BatchPhase>>,
    sender: Sender<BatchEvent>,
}

impl Worker {
    fn run(mut self) -> Vec<Track> {
        let processor = TrackProcessor::new();
        let total = self.tracks.len();
        let mut processed = 0;

        for index in 0..total {
            if self.control.is_cancelled() {
                break;
            }

            if self.control.is_skipped(index) {
                debug!(index, "track skipped by user");
                self.tracks[index].status = TrackStatus::Skipped;
                self.emit(BatchEvent::TrackCompleted {
                    index,
                    success: false,
                    message: SKIPPED_MESSAGE.to_string(),
                    after_lufs: 0.0,
                    after_peak: 0.0,
                });
                self.emit(BatchEvent::Progress {
                    current: index + 1,
                    total,
                });
                continue;
            }

            while self.control.is_paused() && !self.control.is_cancelled() {
                thread::sleep(PAUSE_POLL);
            }
            if self.control.is_cancelled() {
                break;
            }

            let name = self.tracks[index].display_name.clone();
            let source_path = self.tracks[index].source_path.clone();
            self.tracks[index].status = TrackStatus::Processing;
            self.emit(BatchEvent::TrackStarted {
                index,
                name: name.clone(),
            });

            let filename = output_filename(&name, self.naming_convention, self.output_format);
            let output_path = self.output_folder.join(filename);
            let ctx = ProcessContext::new(
                self.engine.as_ref(),
                &self.preset,
                &source_path,
                &output_path,
                self.output_format,
            );
            let outcome = processor.process(&ctx);

            if outcome.success {
                processed += 1;
                let after_lufs = outcome.final_lufs.unwrap_or(VERIFY_FALLBACK_LUFS);
                let track = &mut self.tracks[index];
                track.status = TrackStatus::Completed;
                track.post_lufs = Some(after_lufs);
                track.post_peak = Some(self.preset.true_peak);
                self.emit(BatchEvent::TrackCompleted {
                    index,
                    success: true,
                    message: COMPLETED_MESSAGE.to_string(),
                    after_lufs,
                    after_peak: self.preset.true_peak,
                });
            } else {
                let message = outcome.error_message().to_string();
                let track = &mut self.tracks[index];
                track.status = TrackStatus::Error;
                track.error_message = Some(message.clone());
                self.emit(BatchEvent::TrackCompleted {
                    index,
                    success: false,
                    message,
                    after_lufs: 0.0,
                    after_peak: 0.0,
                });
            }

            self.emit(BatchEvent::Progress {
                current: index + 1,
                total,
            });
        }

        info!(processed, total, "batch finished");
        self.emit(BatchEvent::BatchCompleted { processed, total });
        *self.phase.lock() = BatchPhase::Done;
        self.tracks
    }

    /// Send an event, ignoring a dropped receiver. A consumer that went
    /// away must not wedge the worker.
    fn emit(&self, event: BatchEvent) {
        let _ = self.sender.send(event);
    }
}
