//! Configuration module for Grayscale.
//!
//! This module provides configuration types, loading functionality, the shared
//! settings handle, and file watching for hot-reloading configuration changes.
//!
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

mod settings;
pub mod template;
pub mod types;
mod watcher;

use std::path::PathBuf;

pub use settings::{SettingsHandle, SettingsSource};
pub use types::{
    CONFIG_FILE_NAMES, ConfigError, GrayscaleConfig, KeybindingsConfig, ShortcutValue,
    config_paths, load_config, load_config_from_path,
};
pub use watcher::{ConfigWatcher, watch_config_file};

/// Resolves a user-supplied configuration path, expanding a leading `~`.
#[must_use]
pub fn expand_config_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

/// Returns the settings source for an optional `--config` argument.
#[must_use]
pub fn source_for(path: Option<&str>) -> SettingsSource {
    path.map_or(SettingsSource::Search, |path| SettingsSource::Path(expand_config_path(path)))
}
