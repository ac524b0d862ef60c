//! Two-pass processor for a single track.

use tracing::{debug, warn};

use super::errors::ProcessError;
use super::step::ProcessStep;
use super::steps::{MeasureStep, PlanStep, RenderStep, VerifyStep};
use super::types::{ProcessContext, ProcessOutcome, ProcessState};

/// Runs the measure, plan, render, and verify steps for one track.
///
/// Processing never returns `Err`: any step failure becomes a
/// `success = false` outcome so the batch driver can record it and keep
/// going. One corrupt file must not take down a 200-track batch.
pub struct TrackProcessor {
    steps: Vec<Box<dyn ProcessStep>>,
}

impl TrackProcessor {
    pub fn new() -> Self {
        Self {
            steps: vec![
                Box::new(MeasureStep::new()),
                Box::new(PlanStep::new()),
                Box::new(RenderStep::new()),
                Box::new(VerifyStep::new()),
            ],
        }
    }

    /// Names of the steps in execution order.
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Process one track to completion.
    pub fn process(&self, ctx: &ProcessContext<'_>) -> ProcessOutcome {
        let mut state = ProcessState::default();

        for step in &self.steps {
            debug!(step = step.name(), input = %ctx.input_path.display(), "running step");

            if let Err(error) = step.validate_input(ctx, &state) {
                return failed(step.as_ref(), ctx, &error);
            }
            if let Err(error) = step.execute(ctx, &mut state) {
                return failed(step.as_ref(), ctx, &error);
            }
            if let Err(error) = step.validate_output(ctx, &state) {
                return failed(step.as_ref(), ctx, &error);
            }
        }

        ProcessOutcome::completed(
            ctx.output_path.clone(),
            state.measured_lufs(),
            state.verified_lufs,
        )
    }
}

impl Default for TrackProcessor {
    fn default() -> Self {
        Self::new()
    }
}

fn failed(step: &dyn ProcessStep, ctx: &ProcessContext<'_>, error: &ProcessError) -> ProcessOutcome {
    warn!(
        step = step.name(),
        input = %ctx.input_path.display(),
        %error,
        "track processing failed"
    );
    ProcessOutcome::failed(step.failure_message(error))
}
