//! Configuration management for the importer
//!
//! Settings live in a TOML file under the configuration directory; every
//! field is optional and falls back to the documented limits.

mod manager;
pub mod settings;

pub use manager::{CONFIG_DIR_ENV, ConfigManager, SETTINGS_FILE};
pub use settings::ImportSettings;
