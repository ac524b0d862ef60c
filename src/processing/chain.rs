//! Gain and filter policy.
//!
//! Pure computation: given a first-pass measurement and a preset, derive
//! the ordered filter chain for the render pass. No I/O happens here.

use std::fmt;

use crate::config::Preset;

/// Hard ceiling on the gain correction, in dB.
///
/// Tracks further than this from target are only partially corrected in
/// a single pass.
pub const MAX_GAIN_DB: f64 = 6.0;

/// Gain corrections at or below this magnitude are dropped from the chain.
pub const GAIN_DEADBAND_DB: f64 = 0.5;

/// High-pass cutoffs at or below this frequency are treated as disabled.
pub const HIGHPASS_MIN_HZ: f64 = 30.0;

/// One stage of the render filter graph.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterStage {
    /// Single-pole high-pass at the given cutoff.
    Highpass { hz: f64 },
    /// Static gain adjustment in dB.
    Gain { db: f64 },
    /// True-peak limiter with a linear amplitude ceiling.
    Limiter { ceiling: f64 },
}

impl fmt::Display for FilterStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Highpass { hz } => write!(f, "highpass=f={hz}:poles=1"),
            Self::Gain { db } => write!(f, "volume={db}dB"),
            Self::Limiter { ceiling } => {
                write!(f, "alimiter=limit={ceiling}:attack=30:release=300:level=false")
            }
        }
    }
}

/// Ordered filter graph for one render pass.
///
/// Built by [`FilterChain::plan`] and rendered to the engine's filter
/// syntax via `Display`. The limiter is always the final stage, so the
/// chain is never empty: an in-spec track still gets a safety ceiling.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterChain {
    stages: Vec<FilterStage>,
    applied_gain_db: f64,
}

impl FilterChain {
    /// Derive the filter chain for a track measured at `measured_lufs`.
    ///
    /// Stage order is fixed: high-pass (if the preset enables one), gain
    /// (if the clamped correction is outside the deadband), then the
    /// limiter, unconditionally last.
    pub fn plan(preset: &Preset, measured_lufs: f64) -> Self {
        let gain_needed = preset.target_lufs - measured_lufs;
        let applied_gain_db = gain_needed.clamp(-MAX_GAIN_DB, MAX_GAIN_DB);

        let mut stages = Vec::new();
        if preset.highpass_hz > HIGHPASS_MIN_HZ {
            stages.push(FilterStage::Highpass {
                hz: preset.highpass_hz,
            });
        }
        if applied_gain_db.abs() > GAIN_DEADBAND_DB {
            stages.push(FilterStage::Gain { db: applied_gain_db });
        }
        stages.push(FilterStage::Limiter {
            ceiling: 10f64.powf(preset.true_peak / 20.0),
        });

        Self {
            stages,
            applied_gain_db,
        }
    }

    /// The stages in render order.
    pub fn stages(&self) -> &[FilterStage] {
        &self.stages
    }

    /// The clamped gain correction, whether or not a gain stage was emitted.
    pub fn applied_gain_db(&self) -> f64 {
        self.applied_gain_db
    }

    fn has_gain_stage(&self) -> bool {
        self.stages
            .iter()
            .any(|s| matches!(s, FilterStage::Gain { .. }))
    }
}

impl fmt::Display for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.stages.iter().map(|s| s.to_string()).collect();
        write!(f, "{}", rendered.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EqSettings;
    use crate::models::OutputFormat;

    fn preset(target_lufs: f64, true_peak: f64, highpass_hz: f64) -> Preset {
        Preset {
            label: "Test".to_string(),
            description: String::new(),
            target_lufs,
            true_peak,
            highpass_hz,
            output_format: OutputFormat::Wav24,
            eq: EqSettings::default(),
        }
    }

    #[test]
    fn gain_is_clamped_to_six_db_either_way() {
        let p = preset(-8.0, -1.0, 30.0);
        assert_eq!(FilterChain::plan(&p, -20.0).applied_gain_db(), 6.0);
        assert_eq!(FilterChain::plan(&p, -30.0).applied_gain_db(), 6.0);
        assert_eq!(FilterChain::plan(&p, 4.0).applied_gain_db(), -6.0);
        assert_eq!(FilterChain::plan(&p, f64::NEG_INFINITY).applied_gain_db(), 6.0);
    }

    #[test]
    fn limiter_is_always_the_last_stage() {
        for measured in [-30.0, -20.0, -12.0, -8.0, -0.5] {
            let chain = FilterChain::plan(&preset(-8.0, -1.0, 30.0), measured);
            assert!(
                matches!(chain.stages().last(), Some(FilterStage::Limiter { .. })),
                "no trailing limiter for measured {measured}"
            );
        }
    }

    #[test]
    fn in_spec_track_degenerates_to_bare_limiter() {
        let chain = FilterChain::plan(&preset(-8.0, -1.0, 30.0), -8.2);
        assert_eq!(chain.stages().len(), 1);
        assert!(!chain.has_gain_stage());
        assert!(chain.to_string().starts_with("alimiter=limit="));
    }

    #[test]
    fn gain_deadband_is_exclusive() {
        let p = preset(-8.0, -1.0, 30.0);
        assert!(!FilterChain::plan(&p, -8.5).has_gain_stage());
        assert!(FilterChain::plan(&p, -8.6).has_gain_stage());
    }

    #[test]
    fn highpass_cutoff_threshold_is_exclusive() {
        let at_threshold = FilterChain::plan(&preset(-8.0, -1.0, 30.0), -12.0);
        assert!(!at_threshold
            .stages()
            .iter()
            .any(|s| matches!(s, FilterStage::Highpass { .. })));

        let above = FilterChain::plan(&preset(-8.0, -1.0, 40.0), -12.0);
        assert_eq!(above.stages().first(), Some(&FilterStage::Highpass { hz: 40.0 }));
    }

    #[test]
    fn quiet_track_renders_full_chain_in_order() {
        let chain = FilterChain::plan(&preset(-8.0, -1.0, 40.0), -20.0);
        let rendered = chain.to_string();
        assert!(rendered.starts_with("highpass=f=40:poles=1,volume=6dB,alimiter=limit="));
        assert!(rendered.ends_with(":attack=30:release=300:level=false"));
    }

    #[test]
    fn limiter_ceiling_is_linear_amplitude() {
        let chain = FilterChain::plan(&preset(-8.0, -1.0, 30.0), -8.0);
        let Some(FilterStage::Limiter { ceiling }) = chain.stages().last() else {
            panic!("missing limiter");
        };
        // -1 dBTP as linear amplitude.
        assert!((ceiling - 0.8912509381337456).abs() < 1e-12);

        let unity = FilterChain::plan(&preset(-8.0, 0.0, 30.0), -8.0);
        let Some(FilterStage::Limiter { ceiling }) = unity.stages().last() else {
            panic!("missing limiter");
        };
        assert!((ceiling - 1.0).abs() < 1e-12);
    }
}
