//! Settings file management.
//!
//! One TOML file holds all persistent settings. Saves go through a temp
//! file and rename, a first run seeds the file with defaults, and the
//! generated document carries a comment above each section.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::settings::Settings;

/// Errors that can occur during config operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read settings file: {0}")]
    ReadError(#[from] io::Error),

    #[error("Settings file is not valid TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Could not serialize settings: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Preset document is not valid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("No settings file at {0}")]
    NotFound(PathBuf),
}

impl ConfigError {
    /// Create an `Invalid` error from a message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

/// Result type for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Owns the settings file path and the in-memory [`Settings`].
pub struct ConfigManager {
    config_path: PathBuf,
    settings: Settings,
}

impl ConfigManager {
    /// Create a manager for the given settings file.
    ///
    /// Nothing is read from disk yet; call [`load`](Self::load) or
    /// [`load_or_create`](Self::load_or_create) first.
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            settings: Settings::default(),
        }
    }

    /// The settings file path.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Current in-memory settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Mutable access to the in-memory settings.
    ///
    /// Edits reach disk only on the next [`save`](Self::save).
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Read and parse the settings file.
    ///
    /// Fails with [`ConfigError::NotFound`] when the file is missing.
    pub fn load(&mut self) -> ConfigResult<()> {
        if !self.config_path.exists() {
            return Err(ConfigError::NotFound(self.config_path.clone()));
        }
        let text = fs::read_to_string(&self.config_path)?;
        self.settings = toml::from_str(&text)?;
        Ok(())
    }

    /// Load the settings file, seeding it with defaults on first run.
    pub fn load_or_create(&mut self) -> ConfigResult<()> {
        if self.config_path.exists() {
            return self.load();
        }
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        self.settings = Settings::default();
        self.save()
    }

    /// Create the configured output folder if it is missing.
    pub fn ensure_output_folder(&self) -> ConfigResult<()> {
        let folder = self.settings.output_folder_path();
        if !folder.exists() {
            fs::create_dir_all(&folder)?;
        }
        Ok(())
    }

    /// Persist the current settings atomically.
    pub fn save(&self) -> ConfigResult<()> {
        let doc = self.render_with_comments()?;
        self.atomic_write(&doc)?;
        Ok(())
    }

    /// Serialize settings to TOML with a comment above each section.
    fn render_with_comments(&self) -> ConfigResult<String> {
        let sections = [
            (
                "Export destination and naming",
                "output",
                toml::to_string_pretty(&self.settings.output)?,
            ),
            (
                "Audio engine lookup",
                "engine",
                toml::to_string_pretty(&self.settings.engine)?,
            ),
            (
                "Batch log behavior",
                "logging",
                toml::to_string_pretty(&self.settings.logging)?,
            ),
        ];

        let mut doc = String::from("# DeckReady settings\n\n");
        for (comment, header, body) in sections {
            doc.push_str(&format!("# {}\n[{}]\n{}\n", comment, header, body));
        }
        Ok(doc)
    }

    /// Write the document to a temp file, then rename over the target.
    fn atomic_write(&self, doc: &str) -> io::Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Same directory as the target keeps the rename atomic
        let tmp = self.config_path.with_extension("toml.tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(doc.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.config_path)
    }
}
