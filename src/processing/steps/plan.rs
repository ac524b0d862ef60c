//! Filter chain planning from the first-pass measurement.

use tracing::info;

use crate::processing::chain::FilterChain;
use crate::processing::errors::{ProcessError, ProcessResult};
use crate::processing::step::ProcessStep;
use crate::processing::types::{ProcessContext, ProcessState};

/// Derives the render filter chain from the measurement and preset.
pub struct PlanStep;

impl PlanStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlanStep {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessStep for PlanStep {
    fn name(&self) -> &str {
        "Plan"
    }

    fn validate_input(
        &self,
        _ctx: &ProcessContext<'_>,
        state: &ProcessState,
    ) -> ProcessResult<()> {
        if state.measurement.is_none() {
            return Err(ProcessError::precondition_failed(
                "no measurement to plan from".to_string(),
            ));
        }
        Ok(())
    }

    fn execute(&self, ctx: &ProcessContext<'_>, state: &mut ProcessState) -> ProcessResult<()> {
        let stats = state
            .measurement
            .as_ref()
            .ok_or_else(|| ProcessError::precondition_failed("no measurement to plan from"))?;
        let measured_lufs = stats.measured_lufs()?;

        let chain = FilterChain::plan(ctx.preset, measured_lufs);
        info!(
            measured_lufs,
            target_lufs = ctx.preset.target_lufs,
            applied_gain_db = chain.applied_gain_db(),
            "planned filter chain"
        );
        state.chain = Some(chain);
        Ok(())
    }

    fn validate_output(
        &self,
        _ctx: &ProcessContext<'_>,
        state: &ProcessState,
    ) -> ProcessResult<()> {
        if state.chain.is_none() {
            return Err(ProcessError::invalid_output("no filter chain planned".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::config::PresetCatalog;
    use crate::engine::{AudioEngine, EngineResult, LoudnormStats};
    use crate::models::OutputFormat;

    struct NullEngine;

    impl AudioEngine for NullEngine {
        fn measure_loudness(
            &self,
            _input: &Path,
            _target_lufs: f64,
            _true_peak: f64,
        ) -> EngineResult<LoudnormStats> {
            unreachable!("planning never touches the engine")
        }

        fn render(
            &self,
            _input: &Path,
            _filter_chain: &str,
            _codec_args: &[&str],
            _output: &Path,
        ) -> EngineResult<()> {
            unreachable!("planning never touches the engine")
        }
    }

    fn stats(input_i: &str) -> LoudnormStats {
        LoudnormStats {
            input_i: input_i.to_string(),
            input_tp: "-3.2".to_string(),
            input_lra: "6.1".to_string(),
            input_thresh: "-30.5".to_string(),
            target_offset: "0.3".to_string(),
        }
    }

    #[test]
    fn refuses_to_run_without_a_measurement() {
        let catalog = PresetCatalog::builtin();
        let ctx = ProcessContext::new(
            &NullEngine,
            catalog.get("club_festival"),
            Path::new("/in/a.wav"),
            Path::new("/out/a.wav"),
            OutputFormat::Wav24,
        );
        let step = PlanStep::new();

        let err = step
            .validate_input(&ctx, &ProcessState::default())
            .unwrap_err();
        assert!(matches!(err, ProcessError::PreconditionFailed(_)));
    }

    #[test]
    fn records_a_chain_from_the_measurement() {
        let catalog = PresetCatalog::builtin();
        let ctx = ProcessContext::new(
            &NullEngine,
            catalog.get("club_festival"),
            Path::new("/in/a.wav"),
            Path::new("/out/a.wav"),
            OutputFormat::Wav24,
        );
        let step = PlanStep::new();
        let mut state = ProcessState {
            measurement: Some(stats("-20.0")),
            ..Default::default()
        };

        step.execute(&ctx, &mut state).unwrap();
        step.validate_output(&ctx, &state).unwrap();

        let chain = state.chain.as_ref().unwrap();
        assert_eq!(chain.applied_gain_db(), 6.0);
    }

    #[test]
    fn unparseable_measurement_fails_the_step() {
        let catalog = PresetCatalog::builtin();
        let ctx = ProcessContext::new(
            &NullEngine,
            catalog.get("club_festival"),
            Path::new("/in/a.wav"),
            Path::new("/out/a.wav"),
            OutputFormat::Wav24,
        );
        let step = PlanStep::new();
        let mut state = ProcessState {
            measurement: Some(stats("not-a-number")),
            ..Default::default()
        };

        let err = step.execute(&ctx, &mut state).unwrap_err();
        assert!(matches!(err, ProcessError::Engine(_)));
    }
}
