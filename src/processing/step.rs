//! Step trait for the track processing pipeline.

use super::errors::{ProcessError, ProcessResult};
use super::types::{ProcessContext, ProcessState};

/// A single step in the two-pass processing workflow.
///
/// Steps run in a fixed order: each validates what it needs from the
/// state, does its work, then validates what it recorded. The processor
/// stops at the first failure and turns it into a per-track outcome.
pub trait ProcessStep: Send + Sync {
    /// Short name for logs and failure reports.
    fn name(&self) -> &str;

    /// Check that the context and accumulated state allow this step to run.
    fn validate_input(&self, ctx: &ProcessContext<'_>, state: &ProcessState) -> ProcessResult<()>;

    /// Do the work, recording results in `state`.
    fn execute(&self, ctx: &ProcessContext<'_>, state: &mut ProcessState) -> ProcessResult<()>;

    /// Check that the step recorded what later steps expect.
    fn validate_output(&self, ctx: &ProcessContext<'_>, state: &ProcessState) -> ProcessResult<()>;

    /// The message reported when this step fails.
    ///
    /// Defaults to the error's own rendering; steps with a contractual
    /// failure message override this.
    fn failure_message(&self, error: &ProcessError) -> String {
        error.to_string()
    }
}
