//! Host compositor abstraction.
//!
//! The actor tree, the window registry, and every effect attachment belong to
//! the host compositor. This module describes the narrow surface the effect
//! manager needs from it, so the same logic can drive a real compositor
//! binding or the in-process [`memory::MemoryHost`].
//!
//! All calls happen on the host's UI thread, so the trait is not `Send`.
//! Every call addressing an actor or window may fail with [`HostError`] when
//! the host has already destroyed it; callers treat that as "nothing to do".

pub mod memory;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::effect::DesaturateEffect;

/// Result type alias for host calls.
pub type HostResult<T> = Result<T, HostError>;

/// Opaque handle to an actor owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub u64);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "actor#{}", self.0) }
}

/// Opaque handle to the window object backing a window actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "window#{}", self.0) }
}

/// Classification of an actor, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActorKind {
    /// The background/window-group layer holding wallpaper and desktop icons.
    Background,
    /// An actor backed by an application window.
    Window,
    /// Anything else (panels, popups, widget layers).
    Other,
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Background => write!(f, "background"),
            Self::Window => write!(f, "window"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Errors reported by the host for a single actor or window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "id")]
pub enum HostError {
    /// The actor was destroyed by the host.
    #[error("{0} is no longer valid")]
    StaleActor(ActorId),
    /// The window backing an actor was destroyed by the host.
    #[error("{0} is no longer valid")]
    StaleWindow(WindowId),
}

/// The surface of the host compositor used by the effect manager.
pub trait Host {
    /// Returns the root of the UI tree.
    fn ui_root(&self) -> ActorId;

    /// Returns the ordered children of `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::StaleActor`] if the actor no longer exists.
    fn children(&self, actor: ActorId) -> HostResult<Vec<ActorId>>;

    /// Classifies `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::StaleActor`] if the actor no longer exists.
    fn classify(&self, actor: ActorId) -> HostResult<ActorKind>;

    /// Returns the current, host-ordered list of open application window actors.
    fn window_actors(&self) -> Vec<ActorId>;

    /// Returns the window backing `actor`, or `None` for non-window actors.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::StaleActor`] if the actor no longer exists.
    fn meta_window(&self, actor: ActorId) -> HostResult<Option<WindowId>>;

    /// Returns whether `window` currently holds input focus.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::StaleWindow`] if the window no longer exists.
    fn window_has_focus(&self, window: WindowId) -> HostResult<bool>;

    /// Returns the effect attached to `actor` under `name`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::StaleActor`] if the actor no longer exists.
    fn effect(&self, actor: ActorId, name: &str) -> HostResult<Option<DesaturateEffect>>;

    /// Attaches `effect` to `actor` under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::StaleActor`] if the actor no longer exists.
    fn add_effect_named(
        &mut self,
        actor: ActorId,
        name: &str,
        effect: DesaturateEffect,
    ) -> HostResult<()>;

    /// Removes the effect attached to `actor` under `name`. Absent effects are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::StaleActor`] if the actor no longer exists.
    fn remove_effect_named(&mut self, actor: ActorId, name: &str) -> HostResult<()>;
}
