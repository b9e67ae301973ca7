//! Loading and saving of `settings.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};
use crate::tracing::span_names;

use super::ImportSettings;

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "PHADIR_CONFIG_DIR";

/// Name of the settings file inside the configuration directory
pub const SETTINGS_FILE: &str = "settings.toml";

/// Manages the on-disk settings file.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Creates a manager for the default configuration directory.
    ///
    /// Uses `$PHADIR_CONFIG_DIR` when set, otherwise `<config dir>/phadir`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoConfigDir` if no directory can be determined.
    pub fn new() -> ConfigResult<Self> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::with_config_dir(PathBuf::from(dir)));
        }
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::with_config_dir(base.join("phadir")))
    }

    /// Creates a manager for an explicit configuration directory
    #[must_use]
    pub const fn with_config_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Returns the configuration directory
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Returns the path of the settings file
    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE)
    }

    /// Returns the default record store path inside the configuration directory
    #[must_use]
    pub fn default_store_path(&self) -> PathBuf {
        self.config_dir.join("records.json")
    }

    /// Loads settings, falling back to defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_settings(&self) -> ConfigResult<ImportSettings> {
        let path = self.settings_path();
        let _span =
            crate::trace_operation_debug!(span_names::CONFIG_LOAD, path = %path.display()).entered();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "Settings file not found, using defaults");
            return Ok(ImportSettings::default());
        }
        let content = fs::read_to_string(&path)?;
        let settings: ImportSettings = toml::from_str(&content)?;
        Ok(settings.validated())
    }

    /// Writes settings to disk, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save_settings(&self, settings: &ImportSettings) -> ConfigResult<()> {
        fs::create_dir_all(&self.config_dir)?;
        let content = toml::to_string_pretty(settings)?;
        fs::write(self.settings_path(), content)?;
        Ok(())
    }
}
