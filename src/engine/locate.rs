//! Engine executable resolution.
//!
//! The search order mirrors how the app ships: an explicit settings
//! override wins, then a binary bundled alongside the running executable,
//! then the system search path, then the usual install prefixes.

use std::env;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::EngineSettings;

use super::errors::{EngineError, EngineResult};

/// Binary name the locator searches for.
const ENGINE_BINARY: &str = "ffmpeg";

/// Fixed install locations checked after the search path.
const WELL_KNOWN_DIRS: &[&str] = &["/usr/local/bin", "/opt/homebrew/bin", "/usr/bin"];

/// Resolves the engine executable.
#[derive(Debug, Clone, Default)]
pub struct EngineLocator {
    override_path: Option<PathBuf>,
    well_known_dirs: Vec<PathBuf>,
}

impl EngineLocator {
    /// Locator with the standard search chain.
    pub fn new() -> Self {
        Self {
            override_path: None,
            well_known_dirs: WELL_KNOWN_DIRS.iter().map(PathBuf::from).collect(),
        }
    }

    /// Locator honoring an explicit binary path before any search.
    pub fn with_override(path: impl Into<PathBuf>) -> Self {
        Self {
            override_path: Some(path.into()),
            ..Self::new()
        }
    }

    /// Locator configured from engine settings.
    pub fn from_settings(settings: &EngineSettings) -> Self {
        match &settings.ffmpeg_path {
            Some(path) => Self::with_override(path),
            None => Self::new(),
        }
    }

    /// Replace the fixed install locations. Test seam.
    #[cfg(test)]
    pub(crate) fn with_well_known_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.well_known_dirs = dirs;
        self
    }

    /// Resolve the engine executable.
    ///
    /// Exhausting the whole chain is a fatal configuration error; callers
    /// must not start a batch without a resolved engine.
    pub fn locate(&self) -> EngineResult<PathBuf> {
        if let Some(path) = &self.override_path {
            if is_executable(path) {
                debug!("Using configured engine path: {}", path.display());
                return Ok(path.clone());
            }
            warn!(
                "Configured engine path {} is not executable, falling back to search",
                path.display()
            );
        }

        if let Some(path) = bundled_candidate() {
            debug!("Using bundled engine: {}", path.display());
            return Ok(path);
        }

        if let Some(path) = search_path_candidate() {
            debug!("Using engine from PATH: {}", path.display());
            return Ok(path);
        }

        if let Some(path) = dir_candidate(&self.well_known_dirs) {
            debug!("Using engine from install prefix: {}", path.display());
            return Ok(path);
        }

        Err(EngineError::NotFound)
    }
}

/// Binary shipped next to the running executable, if any.
fn bundled_candidate() -> Option<PathBuf> {
    let exe = env::current_exe().ok()?;
    let candidate = exe.parent()?.join(ENGINE_BINARY);
    is_executable(&candidate).then_some(candidate)
}

/// First match on the system search path.
fn search_path_candidate() -> Option<PathBuf> {
    let path_var = env::var_os("PATH")?;
    env::split_paths(&path_var)
        .map(|dir| dir.join(ENGINE_BINARY))
        .find(|candidate| is_executable(candidate))
}

fn dir_candidate(dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter()
        .map(|dir| dir.join(ENGINE_BINARY))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    fn place_stub(dir: &Path, executable: bool) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(ENGINE_BINARY);
        std::fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        let mode = if executable { 0o755 } else { 0o644 };
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(mode);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn override_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let stub = place_stub(dir.path(), true);

        let found = EngineLocator::with_override(&stub).locate().unwrap();
        assert_eq!(found, stub);
    }

    #[cfg(unix)]
    #[test]
    fn well_known_dir_is_searched() {
        let dir = tempfile::tempdir().unwrap();
        let stub = place_stub(dir.path(), true);

        let locator = EngineLocator {
            override_path: None,
            well_known_dirs: Vec::new(),
        }
        .with_well_known_dirs(vec![dir.path().to_path_buf()]);

        // The stub is only reachable through the well-known list, but a
        // system install on PATH may legitimately win first.
        let found = locator.locate().unwrap();
        assert!(found == stub || found.file_name().unwrap() == ENGINE_BINARY);
    }

    #[cfg(unix)]
    #[test]
    fn non_executable_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        place_stub(dir.path(), false);

        assert!(dir_candidate(&[dir.path().to_path_buf()]).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn executable_files_are_found() {
        let dir = tempfile::tempdir().unwrap();
        let stub = place_stub(dir.path(), true);

        assert_eq!(dir_candidate(&[dir.path().to_path_buf()]), Some(stub));
    }

    #[test]
    fn settings_override_feeds_locator() {
        let settings = EngineSettings {
            ffmpeg_path: Some("/custom/ffmpeg".into()),
            probe_timeout_secs: 5,
        };
        let locator = EngineLocator::from_settings(&settings);
        assert_eq!(locator.override_path.as_deref(), Some(Path::new("/custom/ffmpeg")));
    }
}
