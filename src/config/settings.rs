use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

use super::AppConfig;

const APP_NAME: &str = "Dirpane";
const CONFIG_FILE: &str = "config.json";

/// Returns the platform-specific configuration directory for the application.
pub fn get_config_directory() -> Option<PathBuf> {
    ProjectDirs::from("com", "dirpane", APP_NAME)
        .map(|proj_dirs| proj_dirs.config_dir().to_path_buf())
}

/// Returns the full path to the configuration file.
pub fn get_config_file_path() -> Option<PathBuf> {
    get_config_directory().map(|dir| dir.join(CONFIG_FILE))
}

/// Loads the configuration from `path_override`, or from the platform config
/// file when no override is given.
///
/// A missing file yields the defaults and nothing is written to disk. A file
/// that cannot be parsed is logged and also falls back to the defaults, so a
/// broken config never keeps the browser from starting. Fields absent from
/// the file take their default values.
pub fn load_config(path_override: Option<&Path>) -> Result<AppConfig> {
    let config_path = match path_override {
        Some(path) => path.to_path_buf(),
        None => get_config_file_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?,
    };

    if !config_path.exists() {
        tracing::info!(
            "No config file at {:?}, using default settings",
            config_path
        );
        return Ok(AppConfig::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file {:?}", config_path))?;

    match serde_json::from_str::<AppConfig>(&config_content) {
        Ok(mut config) => {
            if !super::is_valid_date_format(&config.date_format) {
                tracing::warn!(
                    "Invalid date_format {:?} in {:?}. Falling back to the default.",
                    config.date_format,
                    config_path
                );
                config.date_format = AppConfig::default().date_format;
            }
            tracing::info!("Loaded config from {:?}", config_path);
            Ok(config)
        }
        Err(e) => {
            tracing::warn!(
                "Failed to parse config file at {:?}: {}. Falling back to default config.",
                config_path,
                e
            );
            Ok(AppConfig::default())
        }
    }
}

// Platform-specific configuration paths for reference:
// macOS:   ~/Library/Application Support/com.dirpane.Dirpane/
// Linux:   ~/.config/dirpane/
// Windows: %APPDATA%/dirpane/Dirpane/config/
