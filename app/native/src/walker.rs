//! Enumeration of the actors the grayscale effect applies to.
//!
//! Two disjoint sources are walked:
//! - the direct children of every background layer under the UI root
//!   (wallpaper, desktop icons). The layer container itself and every other
//!   top-level layer are skipped;
//! - the host's flat list of open application window actors.
//!
//! Both are read from the host at call time and snapshotted before the visitor
//! runs, so visitors are free to mutate the host. Order is whatever the host
//! reports.

use smallvec::SmallVec;

use crate::host::{ActorId, ActorKind, Host};

/// Inline capacity for actor snapshots.
///
/// A desktop rarely has more than a handful of background actors.
pub const ACTOR_SNAPSHOT_INLINE_CAP: usize = 16;

/// Snapshot of actor ids taken from the host.
pub type ActorSnapshot = SmallVec<[ActorId; ACTOR_SNAPSHOT_INLINE_CAP]>;

/// Returns the direct children of every background layer under the UI root.
///
/// Layers the host cannot classify or enumerate are skipped.
#[must_use]
pub fn background_actors<H: Host + ?Sized>(host: &H) -> ActorSnapshot {
    let root = host.ui_root();
    let layers = match host.children(root) {
        Ok(layers) => layers,
        Err(err) => {
            tracing::warn!(error = %err, "UI root is not enumerable");
            return ActorSnapshot::new();
        }
    };

    let mut actors = ActorSnapshot::new();
    for layer in layers {
        match host.classify(layer) {
            Ok(ActorKind::Background) => match host.children(layer) {
                Ok(children) => actors.extend(children),
                Err(err) => tracing::debug!(layer = %layer, error = %err, "skipping background layer"),
            },
            Ok(ActorKind::Window | ActorKind::Other) => {}
            Err(err) => tracing::debug!(layer = %layer, error = %err, "skipping unclassifiable layer"),
        }
    }
    actors
}

/// Returns the host's current list of window actors.
#[must_use]
pub fn window_actors<H: Host + ?Sized>(host: &H) -> ActorSnapshot {
    host.window_actors().into_iter().collect()
}

/// Calls `visitor` on each background actor.
pub fn for_each_background_actor<H, F>(host: &mut H, mut visitor: F)
where
    H: Host + ?Sized,
    F: FnMut(&mut H, ActorId),
{
    for actor in background_actors(host) {
        visitor(host, actor);
    }
}

/// Calls `visitor` on each open window actor.
pub fn for_each_window_actor<H, F>(host: &mut H, mut visitor: F)
where
    H: Host + ?Sized,
    F: FnMut(&mut H, ActorId),
{
    for actor in window_actors(host) {
        visitor(host, actor);
    }
}
