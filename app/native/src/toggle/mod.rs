//! Toggle entry points: the focused window and the whole shell.

pub mod focused;
pub mod global;

pub use global::{GlobalState, GlobalToggle, GlobalToggleState};
