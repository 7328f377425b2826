//! Whole-shell toggle.
//!
//! The direction of a global toggle is decided by a single owned flag, not by
//! inspecting the actors. The flag therefore drifts from reality when a window
//! is toggled on its own after a global apply; [`GlobalToggle::desynced_actors`]
//! reports such actors but nothing reconciles them.

use std::fmt;

use serde::Serialize;

use crate::effect::ActorEffectBinder;
use crate::host::{ActorId, Host};
use crate::walker;

/// State of the whole-shell effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GlobalState {
    /// No global pass is in effect.
    #[default]
    Off,
    /// The last global pass applied the effect.
    On,
}

impl fmt::Display for GlobalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "off"),
            Self::On => write!(f, "on"),
        }
    }
}

/// Owned flag recording whether the whole-shell effect is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlobalToggleState {
    active: bool,
}

impl GlobalToggleState {
    /// Creates a flag in the Off state.
    #[must_use]
    pub const fn new() -> Self { Self { active: false } }

    /// Returns whether the whole-shell effect is active.
    #[must_use]
    pub const fn is_active(&self) -> bool { self.active }

    /// Returns the flag as a [`GlobalState`].
    #[must_use]
    pub const fn state(&self) -> GlobalState {
        if self.active { GlobalState::On } else { GlobalState::Off }
    }
}

/// Applies and removes the effect across the background layer and every window.
#[derive(Debug, Default)]
pub struct GlobalToggle {
    state: GlobalToggleState,
}

impl GlobalToggle {
    /// Creates a toggle in the Off state.
    #[must_use]
    pub const fn new() -> Self { Self { state: GlobalToggleState::new() } }

    /// Returns the current flag.
    #[must_use]
    pub const fn state(&self) -> GlobalToggleState { self.state }

    /// Attaches the effect to every background and window actor and sets the flag.
    ///
    /// Returns the number of actors that gained the effect.
    pub fn apply_global<H: Host + ?Sized>(
        &mut self,
        binder: &mut ActorEffectBinder,
        host: &mut H,
    ) -> usize {
        let mut changed = 0;
        walker::for_each_background_actor(host, |host, actor| {
            changed += usize::from(binder.attach(host, actor));
        });
        walker::for_each_window_actor(host, |host, actor| {
            changed += usize::from(binder.attach(host, actor));
        });

        self.state.active = true;
        tracing::info!(changed, "applied grayscale to the whole shell");
        changed
    }

    /// Detaches the effect from every background and window actor and clears the flag.
    ///
    /// Returns the number of actors that lost the effect.
    pub fn remove_global<H: Host + ?Sized>(
        &mut self,
        binder: &mut ActorEffectBinder,
        host: &mut H,
    ) -> usize {
        let mut changed = 0;
        walker::for_each_background_actor(host, |host, actor| {
            changed += usize::from(binder.detach(host, actor));
        });
        walker::for_each_window_actor(host, |host, actor| {
            changed += usize::from(binder.detach(host, actor));
        });

        self.state.active = false;
        tracing::info!(changed, "removed grayscale from the whole shell");
        changed
    }

    /// Runs whichever transition the flag calls for. Returns the new state.
    pub fn run<H: Host + ?Sized>(
        &mut self,
        binder: &mut ActorEffectBinder,
        host: &mut H,
    ) -> GlobalState {
        if self.state.active {
            self.remove_global(binder, host);
        } else {
            self.apply_global(binder, host);
        }
        self.state.state()
    }

    /// Lists actors whose effect state contradicts an active flag.
    ///
    /// Diagnostic only: [`run`](Self::run) never consults it. While the flag is
    /// Off, individually toggled windows are expected and nothing is reported.
    #[must_use]
    pub fn desynced_actors<H: Host + ?Sized>(
        &self,
        binder: &ActorEffectBinder,
        host: &H,
    ) -> Vec<ActorId> {
        if !self.state.active {
            return Vec::new();
        }

        walker::background_actors(host)
            .into_iter()
            .chain(walker::window_actors(host))
            .filter(|actor| !binder.has_effect(host, *actor))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toggle::focused;
    use crate::host::memory::MemoryHost;

    #[test]
    fn test_initial_state_is_off() {
        let toggle = GlobalToggle::new();
        assert!(!toggle.state().is_active());
        assert_eq!(toggle.state().state(), GlobalState::Off);
    }

    #[test]
    fn test_apply_reaches_background_and_windows() {
        let (mut host, layout) = MemoryHost::desktop(2, 3, None);
        let mut binder = ActorEffectBinder::new();
        let mut toggle = GlobalToggle::new();

        assert_eq!(toggle.apply_global(&mut binder, &mut host), 5);
        assert!(toggle.state().is_active());
        for actor in layout.background.iter().chain(&layout.windows) {
            assert!(binder.has_effect(&host, *actor));
        }
        assert!(!binder.has_effect(&host, layout.background_group));
        assert!(!binder.has_effect(&host, layout.panel));
    }

    #[test]
    fn test_round_trip_clears_everything() {
        let (mut host, layout) = MemoryHost::desktop(2, 3, Some(0));
        let mut binder = ActorEffectBinder::new();
        let mut toggle = GlobalToggle::new();

        assert_eq!(toggle.run(&mut binder, &mut host), GlobalState::On);
        assert_eq!(toggle.run(&mut binder, &mut host), GlobalState::Off);

        for actor in layout.background.iter().chain(&layout.windows) {
            assert!(!binder.has_effect(&host, *actor));
        }
        assert!(binder.tags().is_empty());
    }

    #[test]
    fn test_window_in_background_group_gets_one_effect() {
        let mut host = MemoryHost::new();
        let group = host.add_layer(crate::host::ActorKind::Background);
        let window = host.add_window_to(group, false);
        let mut binder = ActorEffectBinder::new();
        let mut toggle = GlobalToggle::new();

        toggle.apply_global(&mut binder, &mut host);
        assert_eq!(host.effects_named(window, crate::constants::EFFECT_NAME), 1);
    }

    #[test]
    fn test_stale_actor_does_not_abort_pass() {
        let (mut host, layout) = MemoryHost::desktop(0, 3, None);
        host.mark_stale(layout.windows[1]);
        let mut binder = ActorEffectBinder::new();
        let mut toggle = GlobalToggle::new();

        assert_eq!(toggle.apply_global(&mut binder, &mut host), 2);
        assert!(binder.has_effect(&host, layout.windows[0]));
        assert!(binder.has_effect(&host, layout.windows[2]));
        assert!(toggle.state().is_active());
    }

    #[test]
    fn test_focused_toggle_desyncs_the_flag() {
        let (mut host, layout) = MemoryHost::desktop(1, 2, Some(1));
        let mut binder = ActorEffectBinder::new();
        let mut toggle = GlobalToggle::new();

        toggle.apply_global(&mut binder, &mut host);
        focused::run(&mut binder, &mut host);

        // The flag still claims On even though one window is now clear.
        assert!(toggle.state().is_active());
        assert_eq!(toggle.desynced_actors(&binder, &host), vec![layout.windows[1]]);

        // The next global toggle follows the flag and removes everywhere.
        assert_eq!(toggle.run(&mut binder, &mut host), GlobalState::Off);
        assert!(toggle.desynced_actors(&binder, &host).is_empty());
    }

    #[test]
    fn test_flag_is_per_instance() {
        let (mut host, _) = MemoryHost::desktop(0, 1, None);
        let mut binder = ActorEffectBinder::new();
        let mut first = GlobalToggle::new();
        let second = GlobalToggle::new();

        first.apply_global(&mut binder, &mut host);
        assert!(first.state().is_active());
        assert!(!second.state().is_active());
    }
}
