//! Configuration settings for cadence.
//!
//! Settings are loaded from `~/.cadence/config.yaml`. A missing file
//! yields the defaults; a partial file fills in the rest via serde
//! defaults.

use serde::{Deserialize, Serialize};

use crate::config::Paths;
use crate::error::CadenceError;
use crate::focus::PomodoroSettings;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Pomodoro cycle settings.
    pub pomodoro: PomodoroSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// User identity sessions are recorded under.
    #[serde(default = "default_user")]
    pub user: String,
}

fn default_user() -> String {
    "local".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            user: default_user(),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns defaults if no config file exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, CadenceError> {
        let paths = Paths::new()?;
        Self::load_from(&paths)
    }

    /// Load configuration from specific paths.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(paths: &Paths) -> Result<Self, CadenceError> {
        if !paths.config_file.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&paths.config_file)
            .map_err(|e| CadenceError::Config(format!("Failed to read config: {e}")))?;

        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Save configuration to specific paths.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save_to(&self, paths: &Paths) -> Result<(), CadenceError> {
        paths.ensure_dirs()?;
        let contents = serde_yaml::to_string(self)?;
        std::fs::write(&paths.config_file, contents)
            .map_err(|e| CadenceError::Config(format!("Failed to write config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.general.user, "local");
        assert_eq!(config.pomodoro.work_minutes, 25);
        assert_eq!(config.pomodoro.long_break_after, 4);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::with_root(dir.path().join(".cadence"));
        let config = Config::load_from(&paths).unwrap();
        assert_eq!(config.general.user, "local");
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: Config =
            serde_yaml::from_str("pomodoro:\n  work_minutes: 50\n").unwrap();
        assert_eq!(config.pomodoro.work_minutes, 50);
        assert_eq!(config.pomodoro.short_break_minutes, 5);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::with_root(dir.path().join(".cadence"));

        let mut config = Config::default();
        config.pomodoro.auto_start_break = true;
        config.save_to(&paths).unwrap();

        let reloaded = Config::load_from(&paths).unwrap();
        assert!(reloaded.pomodoro.auto_start_break);
    }
}
