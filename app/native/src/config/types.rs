//! Configuration types for Grayscale.
//!
//! This module provides the configuration types and loading functionality.
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

use std::fs;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{APP_DIR_NAME, GLOBAL_SHORTCUT, WINDOW_SHORTCUT};

/// File names looked up inside each configuration directory, in order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["config.jsonc", "config.json"];

/// Accelerators bound to a shortcut.
///
/// Can be either a single accelerator string or an array of accelerators,
/// any of which triggers the shortcut.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ShortcutValue {
    /// A single accelerator, e.g. `"<Super>g"`.
    Single(String),
    /// Several accelerators for the same shortcut.
    Multiple(Vec<String>),
}

impl ShortcutValue {
    /// Returns the configured accelerators.
    ///
    /// Empty strings are filtered out. An empty result leaves the shortcut unbound.
    #[must_use]
    pub fn accelerators(&self) -> Vec<&str> {
        match self {
            Self::Single(accelerator) => {
                let trimmed = accelerator.trim();
                if trimmed.is_empty() { vec![] } else { vec![trimmed] }
            }
            Self::Multiple(accelerators) => {
                accelerators.iter().map(|s| s.trim()).filter(|s| !s.is_empty()).collect()
            }
        }
    }

    /// Returns a display string for logging purposes.
    #[must_use]
    pub fn display(&self) -> String { self.accelerators().join(", ") }
}

/// Keyboard shortcuts of the two toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct KeybindingsConfig {
    /// Toggles grayscale on the focused window.
    /// Default: `"<Super>g"`
    #[serde(rename = "grayscale-window-shortcut")]
    pub window: ShortcutValue,

    /// Toggles grayscale on the whole shell (background, icons and every window).
    /// Default: `"<Super><Shift>g"`
    #[serde(rename = "grayscale-global-shortcut")]
    pub global: ShortcutValue,
}

impl Default for KeybindingsConfig {
    fn default() -> Self {
        Self {
            window: ShortcutValue::Single("<Super>g".to_string()),
            global: ShortcutValue::Single("<Super><Shift>g".to_string()),
        }
    }
}

impl KeybindingsConfig {
    /// Looks up a shortcut by its settings key.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ShortcutValue> {
        match name {
            WINDOW_SHORTCUT => Some(&self.window),
            GLOBAL_SHORTCUT => Some(&self.global),
            _ => None,
        }
    }
}

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GrayscaleConfig {
    /// Keyboard shortcuts.
    pub keybindings: KeybindingsConfig,
}

/// Errors that can occur when loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    #[error("No configuration file found")]
    NotFound,
    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),
    /// The configuration file contains invalid JSON.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Returns the configuration file candidates, in lookup order.
///
/// 1. `$XDG_CONFIG_HOME/grayscale/`
/// 2. `~/.config/grayscale/`
/// 3. The platform configuration directory (`dirs::config_dir()`)
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut dirs_to_check = Vec::new();

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        dirs_to_check.push(PathBuf::from(xdg_config).join(APP_DIR_NAME));
    }
    if let Some(home) = dirs::home_dir() {
        dirs_to_check.push(home.join(".config").join(APP_DIR_NAME));
    }
    if let Some(config_dir) = dirs::config_dir() {
        dirs_to_check.push(config_dir.join(APP_DIR_NAME));
    }

    let mut paths: Vec<PathBuf> = Vec::new();
    for dir in dirs_to_check {
        for filename in CONFIG_FILE_NAMES {
            let path = dir.join(filename);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }
    paths
}

/// Loads the configuration from the first available config file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if no configuration file exists in any of the expected locations.
/// Returns `ConfigError::IoError` if a configuration file exists but could not be read.
/// Returns `ConfigError::ParseError` if the configuration file contains invalid JSON.
pub fn load_config() -> Result<(GrayscaleConfig, PathBuf), ConfigError> {
    for path in config_paths() {
        if path.exists() {
            let config = load_config_from_path(&path)?;
            return Ok((config, path));
        }
    }

    Err(ConfigError::NotFound)
}

/// Loads the configuration from a specific file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if the file does not exist, and the other
/// variants for read or parse failures.
pub fn load_config_from_path(path: &Path) -> Result<GrayscaleConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound);
    }

    let file = fs::File::open(path)?;
    // Strip comments from JSONC before parsing
    let reader = json_comments::StripComments::new(file);
    Ok(serde_json::from_reader(reader)?)
}
