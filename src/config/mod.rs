pub mod settings;

use anyhow::Result;
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::core::SortSpec;

/// User settings, read once at startup. The browser never writes them back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Directory to open when none is given on the command line.
    pub start_directory: Option<PathBuf>,
    /// Show dot-files and entries with the hidden attribute.
    pub show_hidden_files: bool,
    pub window_size: (f64, f64),
    /// Initial width of the tree pane in logical pixels.
    pub tree_pane_width: u32,
    pub default_sort: SortSpec,
    /// `chrono` format string for the "Modified" column.
    pub date_format: String,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        settings::load_config(None)
    }

    /// Resolves the directory the tree is rooted at: the command-line
    /// argument, then the configured start directory, then the home directory.
    pub fn resolve_start_directory(&self, cli_arg: Option<PathBuf>) -> PathBuf {
        cli_arg
            .or_else(|| self.start_directory.clone())
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Whether `format` is a strftime string chrono can render.
pub fn is_valid_date_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            start_directory: None,
            show_hidden_files: false,
            window_size: (1000.0, 600.0),
            tree_pane_width: 350,
            default_sort: SortSpec::default(),
            date_format: "%Y-%m-%d %H:%M".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_format_validation() {
        assert!(is_valid_date_format(&AppConfig::default().date_format));
        assert!(is_valid_date_format("%d.%m.%Y"));
        assert!(!is_valid_date_format("%Y-%Q"));
    }
}
