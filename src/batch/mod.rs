//! Batch queue state machine.
//!
//! One background worker drives the track processor over an ordered
//! queue. The caller steers it with flag writes on a shared
//! [`BatchControl`] token (pause, resume, skip, cancel) and consumes
//! tagged [`BatchEvent`](crate::models::BatchEvent) records from a
//! bounded channel. Pause and cancel take effect between tracks only;
//! a render once started always runs to completion.

mod control;
mod controller;

pub use control::BatchControl;
pub use controller::{BatchController, BatchError, BatchRequest, BatchResult};
