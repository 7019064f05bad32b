//! Command implementations for the canivete CLI.

pub mod accounts;
pub mod process;
pub mod reports;

use std::path::Path;

use canivete_core::models::config::AppConfig;

/// Load the application config, falling back to defaults when no file is
/// given.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<AppConfig> {
    match config_path {
        Some(path) => Ok(AppConfig::from_file(Path::new(path))?),
        None => Ok(AppConfig::default()),
    }
}
