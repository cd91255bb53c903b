//! Configuration module for p12-installer
//!
//! Handles loading installation settings from TOML files.

pub mod settings;

pub use settings::{InstallationConfig, PemSource, Settings};

use crate::utils::ConfigError;
use std::path::Path;

/// Default settings location, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config/installer.toml";

/// Load settings from `path`, or from the default location when unset.
///
/// A missing default file yields empty settings; a missing explicit file is
/// an error.
pub fn load_config(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let settings = match path {
        Some(path) => Settings::load_from_file(path)?,
        None => {
            let default = Path::new(DEFAULT_CONFIG_PATH);
            if default.exists() {
                Settings::load_from_file(default)?
            } else {
                Settings::default()
            }
        }
    };
    settings.validate()?;
    Ok(settings)
}
