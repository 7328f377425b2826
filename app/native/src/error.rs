//! Error types for Grayscale.
//!
//! This module provides the unified error type used by the lifecycle, the
//! keybinding layer and the CLI. Per-actor host failures never surface here
//! during a toggle; they are swallowed where they occur.

use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::host::HostError;

/// Errors that can occur during application execution.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum GrayscaleError {
    /// Invalid command arguments.
    #[error("{0}")]
    InvalidArguments(String),
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// An accelerator string could not be parsed.
    #[error("Invalid shortcut '{shortcut}': {reason}")]
    InvalidShortcut {
        /// The accelerator as written.
        shortcut: String,
        /// Why it was rejected.
        reason: String,
    },
    /// The host refused to register or remove a keybinding.
    #[error("Keybinding error: {0}")]
    KeybindingError(String),
    /// The host reported a stale actor or window.
    #[error("Host error: {0}")]
    Host(String),
    /// IO error.
    #[error("IO error: {0}")]
    IoError(String),
    /// Generic command error.
    #[error("{0}")]
    CommandError(String),
}

impl GrayscaleError {
    /// Creates an invalid shortcut error.
    #[must_use]
    pub fn invalid_shortcut(shortcut: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidShortcut {
            shortcut: shortcut.into(),
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for GrayscaleError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err.to_string()) }
}

impl From<serde_json::Error> for GrayscaleError {
    fn from(err: serde_json::Error) -> Self { Self::CommandError(err.to_string()) }
}

impl From<ConfigError> for GrayscaleError {
    fn from(err: ConfigError) -> Self { Self::ConfigError(err.to_string()) }
}

impl From<HostError> for GrayscaleError {
    fn from(err: HostError) -> Self { Self::Host(err.to_string()) }
}

impl From<String> for GrayscaleError {
    fn from(msg: String) -> Self { Self::CommandError(msg) }
}

impl From<&str> for GrayscaleError {
    fn from(msg: &str) -> Self { Self::CommandError(msg.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ActorId;

    #[test]
    fn test_invalid_arguments_display() {
        let err = GrayscaleError::InvalidArguments("--focus is out of range".to_string());
        assert_eq!(err.to_string(), "--focus is out of range");
    }

    #[test]
    fn test_config_error_from_conversion() {
        let err: GrayscaleError = ConfigError::NotFound.into();
        assert!(matches!(err, GrayscaleError::ConfigError(_)));
        assert!(err.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_invalid_shortcut_display() {
        let err = GrayscaleError::invalid_shortcut("<Hyper>g", "unknown modifier 'Hyper'");
        assert_eq!(err.to_string(), "Invalid shortcut '<Hyper>g': unknown modifier 'Hyper'");
    }

    #[test]
    fn test_host_error_from_conversion() {
        let err: GrayscaleError = HostError::StaleActor(ActorId(5)).into();
        assert!(matches!(err, GrayscaleError::Host(_)));
        assert!(err.to_string().contains("actor#5"));
    }

    #[test]
    fn test_io_error_from_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied");
        let err: GrayscaleError = io_err.into();
        assert!(matches!(err, GrayscaleError::IoError(_)));
    }

    #[test]
    fn test_from_string() {
        let err: GrayscaleError = "test error".into();
        assert!(matches!(err, GrayscaleError::CommandError(_)));
    }

    #[test]
    fn test_error_serializes_with_kind() {
        let err = GrayscaleError::KeybindingError("already bound".to_string());
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("KeybindingError"));
        assert!(json.contains("already bound"));
    }
}
