//! Keyboard shortcuts for the two toggles.
//!
//! The host owns the actual key grabbing. This module resolves the configured
//! accelerators and hands them to a [`KeybindingRegistry`] implemented by the
//! host; when a binding fires, the host reports the [`Action`] back to the
//! extension.

mod accelerator;

use std::collections::BTreeMap;
use std::collections::HashSet;

use serde::Serialize;

pub use accelerator::{Accelerator, Modifier, normalize_shortcut};
use crate::config::{KeybindingsConfig, ShortcutValue};
use crate::constants::{GLOBAL_SHORTCUT, WINDOW_SHORTCUT};
use crate::error::GrayscaleError;

/// What a keybinding does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    /// Toggle grayscale on the focused window.
    ToggleWindow,
    /// Toggle grayscale on the whole shell.
    ToggleGlobal,
}

impl Action {
    /// Every action, in registration order.
    pub const ALL: [Self; 2] = [Self::ToggleWindow, Self::ToggleGlobal];

    /// Returns the settings key naming this action's shortcut.
    #[must_use]
    pub const fn settings_key(self) -> &'static str {
        match self {
            Self::ToggleWindow => WINDOW_SHORTCUT,
            Self::ToggleGlobal => GLOBAL_SHORTCUT,
        }
    }

    /// Returns the configured shortcut for this action.
    #[must_use]
    pub const fn shortcut(self, keybindings: &KeybindingsConfig) -> &ShortcutValue {
        match self {
            Self::ToggleWindow => &keybindings.window,
            Self::ToggleGlobal => &keybindings.global,
        }
    }
}

/// Host-side keybinding registration.
pub trait KeybindingRegistry {
    /// Binds `accelerators` to `action` under the settings key `name`.
    ///
    /// # Errors
    ///
    /// Returns [`GrayscaleError::KeybindingError`] if the host refuses the binding.
    fn add_keybinding(
        &mut self,
        name: &str,
        accelerators: &[Accelerator],
        action: Action,
    ) -> Result<(), GrayscaleError>;

    /// Removes the binding registered under `name`. Returns `false` if none was registered.
    fn remove_keybinding(&mut self, name: &str) -> bool;
}

/// Parses the accelerators of a shortcut, skipping invalid ones with a warning.
#[must_use]
pub fn resolve_accelerators(shortcut: &ShortcutValue) -> Vec<Accelerator> {
    shortcut
        .accelerators()
        .into_iter()
        .filter_map(|raw| match raw.parse::<Accelerator>() {
            Ok(accelerator) => Some(accelerator),
            Err(err) => {
                tracing::warn!(error = %err, "ignoring invalid shortcut");
                None
            }
        })
        .collect()
}

/// A registered binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Accelerators that trigger the binding.
    pub accelerators: Vec<Accelerator>,
    /// The action reported when it fires.
    pub action: Action,
}

/// In-process registry that records bindings and resolves key presses.
///
/// Stands in for the compositor's keybinding manager in the demo and tests.
#[derive(Debug, Default)]
pub struct RecordingRegistry {
    bindings: BTreeMap<String, Binding>,
    refused: HashSet<String>,
}

impl RecordingRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Makes every later registration under `name` fail.
    pub fn refuse(&mut self, name: &str) { self.refused.insert(name.to_string()); }

    /// Returns the binding registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Binding> { self.bindings.get(name) }

    /// Number of registered bindings.
    #[must_use]
    pub fn len(&self) -> usize { self.bindings.len() }

    /// Returns whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.bindings.is_empty() }

    /// Returns the action bound to `accelerator`, as if it had been pressed.
    #[must_use]
    pub fn fire(&self, accelerator: &Accelerator) -> Option<Action> {
        self.bindings
            .values()
            .find(|binding| binding.accelerators.contains(accelerator))
            .map(|binding| binding.action)
    }
}

impl KeybindingRegistry for RecordingRegistry {
    fn add_keybinding(
        &mut self,
        name: &str,
        accelerators: &[Accelerator],
        action: Action,
    ) -> Result<(), GrayscaleError> {
        if self.refused.contains(name) {
            return Err(GrayscaleError::KeybindingError(format!("'{name}' was refused")));
        }
        if self.bindings.contains_key(name) {
            return Err(GrayscaleError::KeybindingError(format!("'{name}' is already registered")));
        }
        if let Some(taken) = accelerators.iter().find(|accelerator| self.fire(accelerator).is_some()) {
            return Err(GrayscaleError::KeybindingError(format!("'{taken}' is already bound")));
        }

        self.bindings.insert(name.to_string(), Binding {
            accelerators: accelerators.to_vec(),
            action,
        });
        Ok(())
    }

    fn remove_keybinding(&mut self, name: &str) -> bool { self.bindings.remove(name).is_some() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accel(s: &str) -> Accelerator { s.parse().unwrap() }

    #[test]
    fn test_action_settings_keys() {
        assert_eq!(Action::ToggleWindow.settings_key(), "grayscale-window-shortcut");
        assert_eq!(Action::ToggleGlobal.settings_key(), "grayscale-global-shortcut");
    }

    #[test]
    fn test_action_shortcut_lookup_matches_settings_key() {
        let keybindings = KeybindingsConfig::default();
        for action in Action::ALL {
            assert_eq!(Some(action.shortcut(&keybindings)), keybindings.get(action.settings_key()));
        }
    }

    #[test]
    fn test_resolve_skips_invalid_accelerators() {
        let shortcut = ShortcutValue::Multiple(vec![
            "<Super>g".to_string(),
            "<Hyper>x".to_string(),
            "Ctrl+Alt+G".to_string(),
        ]);

        let resolved = resolve_accelerators(&shortcut);
        assert_eq!(resolved, vec![accel("<Super>g"), accel("<Control><Alt>g")]);
    }

    #[test]
    fn test_register_and_fire() {
        let mut registry = RecordingRegistry::new();
        registry
            .add_keybinding(WINDOW_SHORTCUT, &[accel("<Super>g")], Action::ToggleWindow)
            .unwrap();

        assert_eq!(registry.fire(&accel("Super+G")), Some(Action::ToggleWindow));
        assert_eq!(registry.fire(&accel("<Super>h")), None);
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let mut registry = RecordingRegistry::new();
        registry.add_keybinding(WINDOW_SHORTCUT, &[], Action::ToggleWindow).unwrap();

        let err = registry.add_keybinding(WINDOW_SHORTCUT, &[], Action::ToggleWindow).unwrap_err();
        assert!(matches!(err, GrayscaleError::KeybindingError(_)));
    }

    #[test]
    fn test_conflicting_accelerator_is_rejected() {
        let mut registry = RecordingRegistry::new();
        registry
            .add_keybinding(WINDOW_SHORTCUT, &[accel("<Super>g")], Action::ToggleWindow)
            .unwrap();

        let err = registry
            .add_keybinding(GLOBAL_SHORTCUT, &[accel("Super+g")], Action::ToggleGlobal)
            .unwrap_err();
        assert!(err.to_string().contains("<Super>g"));
    }

    #[test]
    fn test_remove_keybinding() {
        let mut registry = RecordingRegistry::new();
        registry.add_keybinding(GLOBAL_SHORTCUT, &[], Action::ToggleGlobal).unwrap();

        assert!(registry.remove_keybinding(GLOBAL_SHORTCUT));
        assert!(!registry.remove_keybinding(GLOBAL_SHORTCUT));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_refused_registration() {
        let mut registry = RecordingRegistry::new();
        registry.refuse(GLOBAL_SHORTCUT);

        assert!(registry.add_keybinding(GLOBAL_SHORTCUT, &[], Action::ToggleGlobal).is_err());
        assert!(registry.get(GLOBAL_SHORTCUT).is_none());
    }
}
