//! Render pass: apply the planned chain and write the output file.

use tracing::{debug, info};

use crate::processing::codec::codec_args;
use crate::processing::errors::{ProcessError, ProcessResult};
use crate::processing::step::ProcessStep;
use crate::processing::types::{ProcessContext, ProcessState};

/// Invokes the engine's render pass with the planned filter chain.
pub struct RenderStep;

impl RenderStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RenderStep {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessStep for RenderStep {
    fn name(&self) -> &str {
        "Render"
    }

    fn validate_input(
        &self,
        _ctx: &ProcessContext<'_>,
        state: &ProcessState,
    ) -> ProcessResult<()> {
        if state.chain.is_none() {
            return Err(ProcessError::precondition_failed(
                "no filter chain to render with".to_string(),
            ));
        }
        Ok(())
    }

    fn execute(&self, ctx: &ProcessContext<'_>, state: &mut ProcessState) -> ProcessResult<()> {
        let chain = state
            .chain
            .as_ref()
            .ok_or_else(|| ProcessError::precondition_failed("no filter chain to render with"))?;
        let filter = chain.to_string();
        debug!(filter = %filter, format = ?ctx.output_format, "rendering");

        if let Some(parent) = ctx.output_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ProcessError::io("creating output directory", e))?;
        }

        ctx.engine.render(
            ctx.input_path,
            &filter,
            codec_args(ctx.output_format),
            &ctx.output_path,
        )?;
        state.rendered = true;
        info!(output = %ctx.output_path.display(), "render complete");
        Ok(())
    }

    fn validate_output(
        &self,
        _ctx: &ProcessContext<'_>,
        state: &ProcessState,
    ) -> ProcessResult<()> {
        if !state.rendered {
            return Err(ProcessError::invalid_output("render did not complete".to_string()));
        }
        Ok(())
    }

    fn failure_message(&self, _error: &ProcessError) -> String {
        "Processing failed".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_the_contractual_failure_message() {
        let step = RenderStep::new();
        let err = ProcessError::precondition_failed("no filter chain to render with");
        assert_eq!(step.failure_message(&err), "Processing failed");
    }

    #[test]
    fn step_name() {
        assert_eq!(RenderStep::new().name(), "Render");
    }
}
