//! Shared settings handle.
//!
//! The handle is cheap to clone and can be read from the UI thread while the
//! config watcher reloads it from another thread. Every change bumps a
//! generation counter so consumers can tell when to re-apply settings.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;

use super::types::{ConfigError, GrayscaleConfig, load_config, load_config_from_path};

/// Where settings are read from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SettingsSource {
    /// Search the default configuration paths, falling back to defaults.
    #[default]
    Search,
    /// Read a specific file, which must exist.
    Path(PathBuf),
    /// Use the built-in defaults without touching the filesystem.
    Defaults,
}

#[derive(Debug)]
struct SettingsState {
    config: GrayscaleConfig,
    path: Option<PathBuf>,
    generation: u64,
}

/// A shared, reloadable view of the configuration.
#[derive(Debug, Clone)]
pub struct SettingsHandle {
    state: Arc<RwLock<SettingsState>>,
}

impl SettingsHandle {
    /// Loads settings from `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or parsed, or if an explicit path does not exist.
    pub fn load(source: &SettingsSource) -> Result<Self, ConfigError> {
        let (config, path) = match source {
            SettingsSource::Search => match load_config() {
                Ok((config, path)) => (config, Some(path)),
                Err(ConfigError::NotFound) => {
                    tracing::debug!("no configuration file found, using defaults");
                    (GrayscaleConfig::default(), None)
                }
                Err(err) => return Err(err),
            },
            SettingsSource::Path(path) => (load_config_from_path(path)?, Some(path.clone())),
            SettingsSource::Defaults => (GrayscaleConfig::default(), None),
        };

        Ok(Self::new(config, path))
    }

    /// Wraps an in-memory configuration.
    #[must_use]
    pub fn from_config(config: GrayscaleConfig) -> Self { Self::new(config, None) }

    fn new(config: GrayscaleConfig, path: Option<PathBuf>) -> Self {
        Self {
            state: Arc::new(RwLock::new(SettingsState { config, path, generation: 0 })),
        }
    }

    /// Returns a copy of the current configuration.
    #[must_use]
    pub fn config(&self) -> GrayscaleConfig { self.state.read().config.clone() }

    /// Returns the file the configuration was loaded from, if any.
    #[must_use]
    pub fn path(&self) -> Option<PathBuf> { self.state.read().path.clone() }

    /// Returns the change counter.
    #[must_use]
    pub fn generation(&self) -> u64 { self.state.read().generation }

    /// Replaces the configuration. Returns `true` if it changed.
    pub fn replace(&self, config: GrayscaleConfig) -> bool {
        let mut state = self.state.write();
        if state.config == config {
            return false;
        }
        state.config = config;
        state.generation += 1;
        true
    }

    /// Re-reads the configuration file. Returns `true` if the configuration changed.
    ///
    /// Handles without a backing file never change.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed; the previous
    /// configuration stays in place.
    pub fn reload(&self) -> Result<bool, ConfigError> {
        let Some(path) = self.path() else {
            return Ok(false);
        };
        let config = load_config_from_path(&path)?;
        Ok(self.replace(config))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::config::ShortcutValue;

    #[test]
    fn test_defaults_source_has_no_path() {
        let handle = SettingsHandle::load(&SettingsSource::Defaults).unwrap();
        assert_eq!(handle.config(), GrayscaleConfig::default());
        assert!(handle.path().is_none());
        assert_eq!(handle.generation(), 0);
    }

    #[test]
    fn test_explicit_missing_path_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let source = SettingsSource::Path(dir.path().join("missing.jsonc"));
        assert!(matches!(SettingsHandle::load(&source), Err(ConfigError::NotFound)));
    }

    #[test]
    fn test_reload_bumps_generation_on_change() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.jsonc");
        fs::write(&path, r#"{ "keybindings": { "grayscale-window-shortcut": "<Super>a" } }"#).unwrap();

        let handle = SettingsHandle::load(&SettingsSource::Path(path.clone())).unwrap();
        assert_eq!(handle.path(), Some(path.clone()));
        assert!(!handle.reload().unwrap());
        assert_eq!(handle.generation(), 0);

        fs::write(&path, r#"{ "keybindings": { "grayscale-window-shortcut": "<Super>b" } }"#).unwrap();
        assert!(handle.reload().unwrap());
        assert_eq!(handle.generation(), 1);
        assert_eq!(
            handle.config().keybindings.window,
            ShortcutValue::Single("<Super>b".to_string())
        );
    }

    #[test]
    fn test_failed_reload_keeps_previous_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{}").unwrap();
        let handle = SettingsHandle::load(&SettingsSource::Path(path.clone())).unwrap();

        fs::write(&path, "{ broken").unwrap();
        assert!(handle.reload().is_err());
        assert_eq!(handle.config(), GrayscaleConfig::default());
    }

    #[test]
    fn test_clones_share_state() {
        let handle = SettingsHandle::from_config(GrayscaleConfig::default());
        let clone = handle.clone();

        let mut config = GrayscaleConfig::default();
        config.keybindings.global = ShortcutValue::Multiple(vec![]);
        assert!(clone.replace(config.clone()));
        assert!(!clone.replace(config));
        assert_eq!(handle.generation(), 1);
    }
}
