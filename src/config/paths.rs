//! Path resolution for cadence configuration and data files.
//!
//! All cadence data is stored in `~/.cadence/`:
//! - `config.yaml` - Main configuration file
//! - `cadence.db` - SQLite database for session history

use std::path::PathBuf;

use crate::error::CadenceError;

/// Paths to cadence configuration and data files.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.cadence/`
    pub root: PathBuf,
    /// Config file: `~/.cadence/config.yaml`
    pub config_file: PathBuf,
    /// Database file: `~/.cadence/cadence.db`
    pub database: PathBuf,
}

impl Paths {
    /// Create paths based on the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, CadenceError> {
        let home = std::env::var("HOME")
            .map_err(|_| CadenceError::Config("Could not determine home directory".to_string()))?;

        Ok(Self::with_root(PathBuf::from(home).join(".cadence")))
    }

    /// Create paths with a custom root directory (useful for testing).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            database: root.join("cadence.db"),
            root,
        }
    }

    /// Ensure the root directory exists, creating it if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), CadenceError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| {
                CadenceError::Config(format!(
                    "Failed to create directory {:?}: {e}",
                    self.root
                ))
            })?;
        }
        Ok(())
    }
}
