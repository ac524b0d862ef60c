//! Shared control token between the caller and the batch worker.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

/// Caller-writable, worker-readable batch controls.
///
/// Clones share state. The caller flips flags at any time; the worker
/// reads them only at its yield points (loop entry and pause-wake), so
/// none of these take effect mid-render.
#[derive(Debug, Clone, Default)]
pub struct BatchControl {
    inner: Arc<ControlState>,
}

#[derive(Debug, Default)]
struct ControlState {
    cancel: AtomicBool,
    pause: AtomicBool,
    skips: Mutex<HashSet<usize>>,
}

impl BatchControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent; honored at the worker's next
    /// yield point, never by killing a live render.
    pub fn request_cancel(&self) {
        self.inner.cancel.store(true, Ordering::SeqCst);
    }

    /// Check whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancel.load(Ordering::SeqCst)
    }

    /// Park the worker before it starts its next track.
    pub fn pause(&self) {
        self.inner.pause.store(true, Ordering::SeqCst);
    }

    /// Release a paused worker.
    pub fn resume(&self) {
        self.inner.pause.store(false, Ordering::SeqCst);
    }

    /// Check whether pause is requested.
    pub fn is_paused(&self) -> bool {
        self.inner.pause.load(Ordering::SeqCst)
    }

    /// Mark a queue index to be skipped.
    ///
    /// Has no effect once the worker's cursor has passed that index.
    pub fn skip(&self, index: usize) {
        self.inner.skips.lock().insert(index);
    }

    /// Check whether an index is marked for skipping.
    pub fn is_skipped(&self, index: usize) -> bool {
        self.inner.skips.lock().contains(&index)
    }

    /// Clear all flags and the skip set for a new batch.
    pub fn reset(&self) {
        self.inner.cancel.store(false, Ordering::SeqCst);
        self.inner.pause.store(false, Ordering::SeqCst);
        self.inner.skips.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let control = BatchControl::new();
        let observer = control.clone();

        control.request_cancel();
        control.skip(3);

        assert!(observer.is_cancelled());
        assert!(observer.is_skipped(3));
        assert!(!observer.is_skipped(2));
    }

    #[test]
    fn cancel_is_idempotent() {
        let control = BatchControl::new();
        control.request_cancel();
        control.request_cancel();
        assert!(control.is_cancelled());
    }

    #[test]
    fn reset_clears_everything() {
        let control = BatchControl::new();
        control.request_cancel();
        control.pause();
        control.skip(0);
        control.skip(7);

        control.reset();

        assert!(!control.is_cancelled());
        assert!(!control.is_paused());
        assert!(!control.is_skipped(0));
        assert!(!control.is_skipped(7));
    }

    #[test]
    fn pause_and_resume_toggle() {
        let control = BatchControl::new();
        assert!(!control.is_paused());
        control.pause();
        assert!(control.is_paused());
        control.resume();
        assert!(!control.is_paused());
    }
}
