//! Grayscale - desaturate the focused window or the whole desktop shell.
//!
//! The library holds the effect-state manager: which actors of the host
//! compositor carry the grayscale effect, how the focused-window and
//! whole-shell toggles move between states, and how that state survives an
//! extension disable/enable cycle. The compositor itself is reached through
//! the [`host::Host`] trait; [`host::memory::MemoryHost`] is an in-process
//! implementation used by the CLI demo and the tests.

// Core modules
pub mod constants;
pub mod effect;
pub mod error;
pub mod host;
pub mod manager;
pub mod toggle;
pub mod walker;

// Lifecycle and ambient modules
pub mod cli;
pub mod config;
pub mod extension;
pub mod hotkey;
pub mod logging;
pub mod schema;

pub use effect::{ActorEffectBinder, DesaturateEffect, GrayscaleEffect, WindowTags};
pub use error::GrayscaleError;
pub use extension::{Activation, GrayscaleExtension};
pub use host::{ActorId, ActorKind, Host, HostError, HostResult, WindowId};
pub use manager::{ActorStatus, GrayscaleManager};
pub use toggle::{GlobalState, GlobalToggle, GlobalToggleState};
