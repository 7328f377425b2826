//! Focused-window toggle.

use crate::effect::ActorEffectBinder;
use crate::host::{ActorId, Host};
use crate::walker;

/// Returns the first window actor whose window holds input focus.
///
/// Actors the host no longer knows are skipped.
#[must_use]
pub fn focused_window_actor<H: Host + ?Sized>(host: &H) -> Option<ActorId> {
    walker::window_actors(host).into_iter().find(|actor| {
        let focused = host
            .meta_window(*actor)
            .and_then(|window| window.map_or(Ok(false), |window| host.window_has_focus(window)));
        match focused {
            Ok(focused) => focused,
            Err(err) => {
                tracing::debug!(actor = %actor, error = %err, "skipping window during focus lookup");
                false
            }
        }
    })
}

/// Flips the effect on the focused window.
///
/// Returns the toggled actor and its new state, or `None` when no window has focus.
pub fn run<H: Host + ?Sized>(binder: &mut ActorEffectBinder, host: &mut H) -> Option<(ActorId, bool)> {
    let Some(actor) = focused_window_actor(host) else {
        tracing::debug!("no focused window, nothing to toggle");
        return None;
    };

    let enabled = binder.toggle(host, actor);
    tracing::info!(actor = %actor, enabled, "toggled grayscale on focused window");
    Some((actor, enabled))
}
