//! Configuration management for DeckReady.
//!
//! Two kinds of configuration live here: the validated preset catalog
//! (JSON, built-in or external) and the persisted settings file (TOML,
//! sectioned, written atomically through a temp file).
//!
//! # Example
//!
//! ```no_run
//! use deckready_core::config::{ConfigManager, PresetCatalog};
//!
//! // Load (or create) the settings file
//! let mut config = ConfigManager::new(".config/deckready.toml");
//! config.load_or_create().unwrap();
//!
//! // Look up the active preset; unknown keys fall back to the default
//! let catalog = PresetCatalog::builtin();
//! let preset = catalog.get(&config.settings().output.preset);
//! println!("Target: {} LUFS", preset.target_lufs);
//! ```

mod manager;
mod presets;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use presets::{EqSettings, Preset, PresetCatalog, DEFAULT_PRESET_KEY};
pub use settings::{EngineSettings, LoggingSettings, OutputSettings, Settings};
