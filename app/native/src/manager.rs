//! The grayscale effect manager.
//!
//! `GrayscaleManager` owns the per-window tags and the whole-shell flag, and
//! exposes every state transition the lifecycle and the CLI need. It holds no
//! reference to the host: each call borrows it for the duration of one pass.

use serde::Serialize;

use crate::effect::ActorEffectBinder;
use crate::host::{ActorId, ActorKind, Host, WindowId};
use crate::toggle::{GlobalState, GlobalToggle, focused};
use crate::walker;

/// Snapshot of one actor's effect state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorStatus {
    /// The actor.
    pub actor: ActorId,
    /// Whether it was reached through the background layer or the window list.
    pub kind: ActorKind,
    /// The backing window, for window actors.
    pub window: Option<WindowId>,
    /// Whether the window holds focus.
    pub focused: bool,
    /// Whether the grayscale effect is attached.
    pub grayscale: bool,
    /// Whether the window is tagged for restoration.
    pub tagged: bool,
}

/// Owns the effect state and drives every toggle.
#[derive(Debug, Default)]
pub struct GrayscaleManager {
    binder: ActorEffectBinder,
    global: GlobalToggle,
}

impl GrayscaleManager {
    /// Creates a manager with no tagged windows and the global flag Off.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Returns the per-actor binder.
    #[must_use]
    pub const fn binder(&self) -> &ActorEffectBinder { &self.binder }

    /// Returns the whole-shell state.
    #[must_use]
    pub const fn global_state(&self) -> GlobalState { self.global.state().state() }

    /// Returns whether the whole-shell effect is active.
    #[must_use]
    pub const fn is_global_active(&self) -> bool { self.global.state().is_active() }

    /// Flips the effect on the focused window.
    pub fn toggle_focused<H: Host + ?Sized>(&mut self, host: &mut H) -> Option<(ActorId, bool)> {
        let toggled = focused::run(&mut self.binder, host);
        if toggled.is_some() && self.global.state().is_active() {
            tracing::warn!("focused window toggled while the whole-shell effect is on");
        }
        toggled
    }

    /// Flips the whole-shell effect.
    pub fn toggle_global<H: Host + ?Sized>(&mut self, host: &mut H) -> GlobalState {
        self.global.run(&mut self.binder, host)
    }

    /// Applies the whole-shell effect.
    pub fn apply_global<H: Host + ?Sized>(&mut self, host: &mut H) -> usize {
        self.global.apply_global(&mut self.binder, host)
    }

    /// Removes the whole-shell effect.
    pub fn remove_global<H: Host + ?Sized>(&mut self, host: &mut H) -> usize {
        self.global.remove_global(&mut self.binder, host)
    }

    /// Re-attaches the effect to every open window whose window is tagged,
    /// then forgets tags of windows that have closed.
    ///
    /// Returns the number of windows the effect was restored on.
    pub fn restore_tagged<H: Host + ?Sized>(&mut self, host: &mut H) -> usize {
        let mut restored = 0;
        walker::for_each_window_actor(host, |host, actor| {
            restored += usize::from(self.binder.restore(host, actor));
        });

        let dropped = self.binder.tags_mut().retain_live(host);
        if dropped > 0 {
            tracing::debug!(dropped, "forgot tags of closed windows");
        }
        restored
    }

    /// Strips the effect from every window actor, keeping the tags.
    ///
    /// Returns the number of windows the effect was removed from.
    pub fn strip_windows<H: Host + ?Sized>(&self, host: &mut H) -> usize {
        let mut stripped = 0;
        walker::for_each_window_actor(host, |host, actor| {
            stripped += usize::from(self.binder.strip(host, actor));
        });
        stripped
    }

    /// Lists actors that contradict an active whole-shell flag.
    #[must_use]
    pub fn desynced_actors<H: Host + ?Sized>(&self, host: &H) -> Vec<ActorId> {
        self.global.desynced_actors(&self.binder, host)
    }

    /// Describes every background and window actor.
    #[must_use]
    pub fn snapshot<H: Host + ?Sized>(&self, host: &H) -> Vec<ActorStatus> {
        let background = walker::background_actors(host).into_iter().map(|actor| (actor, ActorKind::Background));
        let windows = walker::window_actors(host).into_iter().map(|actor| (actor, ActorKind::Window));

        background
            .chain(windows)
            .map(|(actor, kind)| {
                let window = host.meta_window(actor).ok().flatten();
                ActorStatus {
                    actor,
                    kind,
                    window,
                    focused: window.is_some_and(|window| host.window_has_focus(window).unwrap_or(false)),
                    grayscale: self.binder.has_effect(host, actor),
                    tagged: self.binder.is_tagged(host, actor),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::EFFECT_NAME;
    use crate::host::memory::MemoryHost;

    #[test]
    fn test_strip_then_restore_round_trip() {
        let (mut host, layout) = MemoryHost::desktop(0, 3, Some(2));
        let mut manager = GrayscaleManager::new();
        manager.toggle_focused(&mut host);

        assert_eq!(manager.strip_windows(&mut host), 1);
        assert!(!manager.binder().has_effect(&host, layout.windows[2]));

        assert_eq!(manager.restore_tagged(&mut host), 1);
        assert_eq!(host.effects_named(layout.windows[2], EFFECT_NAME), 1);
        assert!(!manager.binder().has_effect(&host, layout.windows[0]));
    }

    #[test]
    fn test_restore_forgets_closed_windows() {
        let (mut host, layout) = MemoryHost::desktop(0, 2, None);
        let mut manager = GrayscaleManager::new();
        manager.apply_global(&mut host);
        manager.strip_windows(&mut host);

        host.remove_window(layout.windows[0]);
        assert_eq!(manager.restore_tagged(&mut host), 1);
        assert_eq!(manager.binder().tags().len(), 1);
    }

    #[test]
    fn test_snapshot_reports_state() {
        let (mut host, layout) = MemoryHost::desktop(1, 2, Some(0));
        let mut manager = GrayscaleManager::new();
        manager.toggle_focused(&mut host);

        let snapshot = manager.snapshot(&host);
        assert_eq!(snapshot.len(), 3);

        assert_eq!(snapshot[0].actor, layout.background[0]);
        assert_eq!(snapshot[0].kind, ActorKind::Background);
        assert!(!snapshot[0].grayscale);

        let focused = &snapshot[1];
        assert_eq!(focused.actor, layout.windows[0]);
        assert!(focused.focused && focused.grayscale && focused.tagged);

        assert!(!snapshot[2].focused && !snapshot[2].grayscale && !snapshot[2].tagged);
    }

    #[test]
    fn test_global_state_transitions() {
        let (mut host, _) = MemoryHost::desktop(1, 1, None);
        let mut manager = GrayscaleManager::new();

        assert_eq!(manager.global_state(), GlobalState::Off);
        assert_eq!(manager.toggle_global(&mut host), GlobalState::On);
        assert!(manager.is_global_active());
        assert_eq!(manager.toggle_global(&mut host), GlobalState::Off);
    }
}
