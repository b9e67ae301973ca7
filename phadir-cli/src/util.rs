//! Shared utility functions used across command modules.

use std::path::{Path, PathBuf};

use phadir_core::config::ConfigManager;

use crate::error::CliError;

/// Creates a `ConfigManager` using the optional custom config directory
/// from CLI args.
pub fn create_config_manager(config_path: Option<&Path>) -> Result<ConfigManager, CliError> {
    match config_path {
        Some(path) => Ok(ConfigManager::with_config_dir(path.to_path_buf())),
        None => ConfigManager::new()
            .map_err(|e| CliError::Config(format!("Failed to initialize config: {e}"))),
    }
}

/// Parse a HEADER=field pair for column mapping overrides
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s
        .rfind('=')
        .ok_or_else(|| format!("invalid HEADER=field: no `=` found in `{s}`"))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

/// Returns the explicit store path, or the default one in the config directory
pub fn resolve_store_path(config_manager: &ConfigManager, store: Option<&Path>) -> PathBuf {
    store.map_or_else(|| config_manager.default_store_path(), Path::to_path_buf)
}

/// Builds the runtime that drives the async import core
pub fn runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Config(format!("Runtime error: {e}")))
}
