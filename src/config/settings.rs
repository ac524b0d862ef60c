//! Persistent settings, one struct per TOML table.
//!
//! Every field carries a serde default, and whole sections default too,
//! so config files written by older versions keep loading.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::presets::DEFAULT_PRESET_KEY;
use crate::logging::LogConfig;
use crate::models::{NamingConvention, OutputFormat};

/// All persisted settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Output folder, naming, and format defaults.
    #[serde(default)]
    pub output: OutputSettings,

    /// Audio engine lookup configuration.
    #[serde(default)]
    pub engine: EngineSettings,

    /// Batch log behavior.
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Settings {
    /// Output folder with a leading `~` expanded to the home directory.
    pub fn output_folder_path(&self) -> PathBuf {
        expand_home(&self.output.folder)
    }
}

/// Export destination and naming defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Folder rendered files are written to.
    #[serde(default = "default_output_folder")]
    pub folder: String,

    /// Naming template for output files.
    #[serde(default)]
    pub naming: NamingConvention,

    /// Export format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Preset key selected by default.
    #[serde(default = "default_preset_key")]
    pub preset: String,
}

fn default_output_folder() -> String {
    "~/Desktop".to_string()
}

fn default_preset_key() -> String {
    DEFAULT_PRESET_KEY.to_string()
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            folder: default_output_folder(),
            naming: NamingConvention::default(),
            format: OutputFormat::default(),
            preset: default_preset_key(),
        }
    }
}

/// Audio engine lookup configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Explicit path to the engine binary, checked before any search.
    #[serde(default)]
    pub ffmpeg_path: Option<String>,

    /// Seconds to wait for the `-version` availability probe.
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,
}

fn default_probe_timeout() -> u64 {
    5
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            ffmpeg_path: None,
            probe_timeout_secs: default_probe_timeout(),
        }
    }
}

/// Batch log behavior persisted across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Use compact log format (filter progress lines).
    #[serde(default = "default_true")]
    pub compact: bool,

    /// Number of engine stderr lines to show when a render fails.
    #[serde(default = "default_error_tail")]
    pub error_tail: u32,

    /// Percent interval between logged progress lines.
    #[serde(default = "default_progress_step")]
    pub progress_step: u32,
}

impl LoggingSettings {
    /// Per-run logger configuration derived from these settings.
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            compact: self.compact,
            error_tail: self.error_tail as usize,
            progress_step: self.progress_step,
            ..LogConfig::default()
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_error_tail() -> u32 {
    20
}

fn default_progress_step() -> u32 {
    20
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            compact: true,
            error_tail: default_error_tail(),
            progress_step: default_progress_step(),
        }
    }
}

/// Expand a leading `~` to the user's home directory.
fn expand_home(folder: &str) -> PathBuf {
    if let Some(rest) = folder.strip_prefix("~") {
        if let Some(home) = home_dir() {
            let rest = rest.trim_start_matches(['/', '\\']);
            if rest.is_empty() {
                return home;
            }
            return home.join(rest);
        }
    }
    PathBuf::from(folder)
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_serializes() {
        let settings = Settings::default();
        let toml = toml::to_string_pretty(&settings).unwrap();
        assert!(toml.contains("[output]"));
        assert!(toml.contains("[logging]"));
        assert!(toml.contains("folder"));
    }

    #[test]
    fn settings_round_trip() {
        let settings = Settings::default();
        let toml = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.output.folder, settings.output.folder);
        assert_eq!(parsed.output.preset, DEFAULT_PRESET_KEY);
        assert_eq!(parsed.logging.compact, settings.logging.compact);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let minimal = "[output]\nfolder = \"/exports\"";
        let parsed: Settings = toml::from_str(minimal).unwrap();
        // Custom value preserved
        assert_eq!(parsed.output.folder, "/exports");
        // Defaults applied for missing
        assert_eq!(parsed.output.preset, DEFAULT_PRESET_KEY);
        assert_eq!(parsed.logging.error_tail, 20);
        assert_eq!(parsed.engine.probe_timeout_secs, 5);
    }

    #[test]
    fn naming_and_format_deserialize_from_display_keys() {
        let doc = "[output]\nnaming = \"DJ OPT - Original\"\nformat = \"flac\"";
        let parsed: Settings = toml::from_str(doc).unwrap();
        assert_eq!(parsed.output.naming, NamingConvention::PrefixDjOpt);
        assert_eq!(parsed.output.format, OutputFormat::Flac);
    }

    #[test]
    fn logging_section_feeds_the_run_logger() {
        let section = LoggingSettings {
            compact: false,
            error_tail: 40,
            progress_step: 10,
        };
        let config = section.log_config();
        assert!(!config.compact);
        assert_eq!(config.error_tail, 40);
        assert_eq!(config.progress_step, 10);
        assert!(config.show_timestamps);
    }

    #[test]
    fn expand_home_handles_plain_paths() {
        assert_eq!(expand_home("/exports"), PathBuf::from("/exports"));
    }

    #[test]
    fn expand_home_replaces_tilde() {
        if let Some(home) = home_dir() {
            assert_eq!(expand_home("~/Desktop"), home.join("Desktop"));
            assert_eq!(expand_home("~"), home);
        }
    }
}
