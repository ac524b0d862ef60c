//! First-pass loudness measurement of the source file.

use tracing::debug;

use crate::processing::errors::{ProcessError, ProcessResult};
use crate::processing::step::ProcessStep;
use crate::processing::types::{ProcessContext, ProcessState};

/// Runs the engine's measurement pass and records the stats.
pub struct MeasureStep;

impl MeasureStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MeasureStep {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessStep for MeasureStep {
    fn name(&self) -> &str {
        "Measure"
    }

    fn validate_input(&self, ctx: &ProcessContext<'_>, _state: &ProcessState) -> ProcessResult<()> {
        if !ctx.input_path.exists() {
            return Err(ProcessError::invalid_input(format!(
                "source file not found: {}",
                ctx.input_path.display()
            )));
        }
        Ok(())
    }

    fn execute(&self, ctx: &ProcessContext<'_>, state: &mut ProcessState) -> ProcessResult<()> {
        let stats = ctx.engine.measure_loudness(
            ctx.input_path,
            ctx.preset.target_lufs,
            ctx.preset.true_peak,
        )?;
        debug!(
            input = %ctx.input_path.display(),
            input_i = %stats.input_i,
            input_tp = %stats.input_tp,
            "measured source loudness"
        );
        state.measurement = Some(stats);
        Ok(())
    }

    fn validate_output(
        &self,
        _ctx: &ProcessContext<'_>,
        state: &ProcessState,
    ) -> ProcessResult<()> {
        if state.measurement.is_none() {
            return Err(ProcessError::invalid_output(
                "no measurement recorded".to_string(),
            ));
        }
        Ok(())
    }

    fn failure_message(&self, _error: &ProcessError) -> String {
        "Failed to measure loudness".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_the_contractual_failure_message() {
        let step = MeasureStep::new();
        let err = ProcessError::invalid_input("source file not found: /missing.wav");
        assert_eq!(step.failure_message(&err), "Failed to measure loudness");
    }

    #[test]
    fn step_name() {
        assert_eq!(MeasureStep::new().name(), "Measure");
    }
}
