//! Configuration file watcher for hot-reloading.
//!
//! Watches the loaded configuration file and reloads the shared
//! [`SettingsHandle`] when it changes. Consumers pick the change up through
//! the handle's generation counter on their own thread.

use std::ffi::OsStr;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::JoinHandle;
use std::time::Duration;

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};

use super::SettingsHandle;

/// Quiet period after the last change before the file is re-read.
/// Editors often save in several steps (truncate, write, rename).
const CONFIG_DEBOUNCE_MS: u64 = 200;

/// A running config watcher. Dropping it stops the watch thread.
pub struct ConfigWatcher {
    watcher: Option<RecommendedWatcher>,
    thread: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for ConfigWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigWatcher").field("running", &self.thread.is_some()).finish()
    }
}

impl Drop for ConfigWatcher {
    fn drop(&mut self) {
        // Dropping the watcher closes the event channel and ends the thread.
        self.watcher.take();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Returns whether a watch event touches the configuration file.
fn affects_config(result: &notify::Result<Event>, config_filename: &OsStr) -> bool {
    match result {
        Ok(event) => event
            .paths
            .iter()
            .any(|p| p.file_name().is_some_and(|name| name == config_filename)),
        Err(err) => {
            tracing::warn!(error = %err, "config watch error");
            false
        }
    }
}

/// Starts watching the file behind `settings`.
///
/// Returns `None` when the settings have no backing file or the watcher
/// cannot be created.
#[must_use]
pub fn watch_config_file(settings: &SettingsHandle) -> Option<ConfigWatcher> {
    let config_path = settings.path()?;
    let config_filename =
        config_path.file_name().map(OsStr::to_os_string).unwrap_or_default();

    let (tx, rx) = mpsc::channel();
    let mut watcher: RecommendedWatcher = match notify::recommended_watcher(tx) {
        Ok(w) => w,
        Err(err) => {
            tracing::warn!(error = %err, "failed to create config watcher");
            return None;
        }
    };

    // Watch the config file's parent directory to catch file replacements
    // (some editors save by writing to a temp file then renaming)
    let watch_path = config_path.parent().unwrap_or(&config_path);
    if let Err(err) = watcher.watch(watch_path, RecursiveMode::NonRecursive) {
        tracing::warn!(error = %err, path = %watch_path.display(), "failed to watch config file");
        return None;
    }

    let settings = settings.clone();
    let thread = std::thread::spawn(move || {
        let debounce = Duration::from_millis(CONFIG_DEBOUNCE_MS);

        while let Ok(result) = rx.recv() {
            if !affects_config(&result, &config_filename) {
                continue;
            }

            // Reload once the file has been quiet for the whole debounce window,
            // so multi-step saves are read in their final state.
            loop {
                match rx.recv_timeout(debounce) {
                    Ok(_) => {}
                    Err(RecvTimeoutError::Timeout) => break,
                    Err(RecvTimeoutError::Disconnected) => return,
                }
            }

            match settings.reload() {
                Ok(true) => tracing::info!("configuration reloaded"),
                Ok(false) => {}
                Err(err) => tracing::warn!(error = %err, "failed to reload configuration"),
            }
        }
    });

    tracing::debug!(path = %config_path.display(), "watching configuration file");
    Some(ConfigWatcher {
        watcher: Some(watcher),
        thread: Some(thread),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GrayscaleConfig, SettingsSource, ShortcutValue};

    #[test]
    fn config_debounce_duration_is_reasonable() {
        // Debounce should be at least 100ms but not more than 1 second
        const { assert!(CONFIG_DEBOUNCE_MS >= 100) };
        const { assert!(CONFIG_DEBOUNCE_MS <= 1000) };
    }

    fn write_window_shortcut(path: &std::path::Path, shortcut: &str) {
        let json = format!(r#"{{ "keybindings": {{ "grayscale-window-shortcut": "{shortcut}" }} }}"#);
        std::fs::write(path, json).unwrap();
    }

    fn wait_for_generation(settings: &SettingsHandle, generation: u64) -> bool {
        for _ in 0..100 {
            if settings.generation() >= generation {
                return true;
            }
            std::thread::sleep(Duration::from_millis(50));
        }
        false
    }

    #[test]
    fn test_watcher_reloads_final_state_of_multi_step_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.jsonc");
        write_window_shortcut(&path, "<Super>a");
        let settings = SettingsHandle::load(&SettingsSource::Path(path.clone())).unwrap();
        let _watcher = watch_config_file(&settings).unwrap();

        std::fs::write(&path, "").unwrap();
        std::thread::sleep(Duration::from_millis(50));
        write_window_shortcut(&path, "<Super>b");

        assert!(wait_for_generation(&settings, 1));
        assert_eq!(settings.config().keybindings.window, ShortcutValue::Single("<Super>b".to_string()));
    }

    #[test]
    fn test_watcher_ignores_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.jsonc");
        write_window_shortcut(&path, "<Super>a");
        let settings = SettingsHandle::load(&SettingsSource::Path(path)).unwrap();
        let _watcher = watch_config_file(&settings).unwrap();

        write_window_shortcut(&dir.path().join("other.jsonc"), "<Super>b");
        std::thread::sleep(Duration::from_millis(600));

        assert_eq!(settings.generation(), 0);
    }

    #[test]
    fn in_memory_settings_are_not_watched() {
        let settings = SettingsHandle::from_config(GrayscaleConfig::default());
        assert!(watch_config_file(&settings).is_none());
    }
}
