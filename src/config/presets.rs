//! Preset catalog: typed loudness targets loaded from JSON.
//!
//! Presets are parsed into strongly-typed structs and validated at load
//! time, so malformed configuration fails fast instead of surfacing as a
//! missing key mid-batch. A built-in catalog ships with the crate; an
//! external file can replace it.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::manager::{ConfigError, ConfigResult};
use crate::models::OutputFormat;

/// Key of the preset used when a lookup key is unknown.
pub const DEFAULT_PRESET_KEY: &str = "club_festival";

/// Catalog document compiled into the crate.
const BUILTIN_PRESETS: &str = include_str!("presets.json");

/// Informational EQ hints displayed alongside a preset.
///
/// These do not feed the filter chain; the render path is high-pass,
/// gain, and limiter only.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EqSettings {
    /// Suggested low-shelf cut in dB.
    pub low_cut_db: f64,
    /// Suggested mid cut in dB.
    pub mid_cut_db: f64,
    /// Suggested high-shelf boost in dB.
    pub high_boost_db: f64,
}

/// A single loudness target preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    /// Display label.
    pub label: String,
    /// One-line description for the UI.
    pub description: String,
    /// Integrated loudness target in LUFS (negative).
    pub target_lufs: f64,
    /// True-peak ceiling in dBTP (zero or negative).
    pub true_peak: f64,
    /// High-pass cutoff in Hz; only cutoffs above 30 Hz produce a stage.
    pub highpass_hz: f64,
    /// Default export format for this preset.
    pub output_format: OutputFormat,
    /// Informational EQ hints.
    #[serde(default)]
    pub eq: EqSettings,
}

/// Validated collection of presets keyed by name.
#[derive(Debug, Clone)]
pub struct PresetCatalog {
    presets: BTreeMap<String, Preset>,
}

impl PresetCatalog {
    /// The catalog compiled into the crate.
    pub fn builtin() -> Self {
        // The embedded document is pinned valid by a test.
        Self::from_json(BUILTIN_PRESETS).expect("builtin preset catalog is valid")
    }

    /// Parse and validate a catalog from a JSON document.
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let presets: BTreeMap<String, Preset> = serde_json::from_str(content)?;
        validate(&presets)?;
        Ok(Self { presets })
    }

    /// Load and validate a catalog from a file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Look up a preset by key, falling back to the default preset for
    /// unknown keys.
    pub fn get(&self, key: &str) -> &Preset {
        self.presets.get(key).unwrap_or_else(|| self.default_preset())
    }

    /// The designated default preset.
    pub fn default_preset(&self) -> &Preset {
        // Validation guarantees the default key exists.
        &self.presets[DEFAULT_PRESET_KEY]
    }

    /// Iterate presets in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Preset)> {
        self.presets.iter().map(|(k, p)| (k.as_str(), p))
    }

    /// All preset keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    /// Number of presets in the catalog.
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Check if the catalog is empty (never true after validation).
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

impl Default for PresetCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Reject catalogs that would fail lazily during a batch.
fn validate(presets: &BTreeMap<String, Preset>) -> ConfigResult<()> {
    if presets.is_empty() {
        return Err(ConfigError::invalid("preset catalog is empty"));
    }
    if !presets.contains_key(DEFAULT_PRESET_KEY) {
        return Err(ConfigError::invalid(format!(
            "preset catalog is missing the default preset '{}'",
            DEFAULT_PRESET_KEY
        )));
    }
    for (key, preset) in presets {
        if preset.label.trim().is_empty() {
            return Err(ConfigError::invalid(format!("preset '{}' has an empty label", key)));
        }
        if !preset.target_lufs.is_finite() || preset.target_lufs >= 0.0 {
            return Err(ConfigError::invalid(format!(
                "preset '{}': target_lufs must be negative, got {}",
                key, preset.target_lufs
            )));
        }
        if !preset.true_peak.is_finite() || preset.true_peak > 0.0 {
            return Err(ConfigError::invalid(format!(
                "preset '{}': true_peak must not exceed 0 dBTP, got {}",
                key, preset.true_peak
            )));
        }
        if !preset.highpass_hz.is_finite() || preset.highpass_hz < 0.0 {
            return Err(ConfigError::invalid(format!(
                "preset '{}': highpass_hz must be a non-negative number, got {}",
                key, preset.highpass_hz
            )));
        }
    }
    Ok(())
}
