//! Per-actor attachment of the grayscale effect.
//!
//! The binder enforces that an actor never carries more than one effect named
//! [`EFFECT_NAME`], and keeps the window tags in step with attachments.
//!
//! Window tags live in a side-table keyed by [`WindowId`] instead of on the
//! host's window objects. A tag records that a window carries, or should be
//! restored to carry, the effect. Tags survive a disable/enable cycle; see
//! [`ActorEffectBinder::strip`].
//!
//! Host failures (an actor destroyed between enumeration and mutation) are
//! logged and swallowed here: the actor is treated as already being in the
//! requested state and the enclosing traversal carries on.

use std::collections::HashSet;

use crate::constants::EFFECT_NAME;
use crate::effect::GrayscaleEffect;
use crate::host::{ActorId, Host, HostError, HostResult, WindowId};

/// Side-table of windows tagged as grayscale.
#[derive(Debug, Clone, Default)]
pub struct WindowTags {
    tagged: HashSet<WindowId>,
}

impl WindowTags {
    /// Creates an empty tag table.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Returns whether `window` is tagged.
    #[must_use]
    pub fn is_tagged(&self, window: WindowId) -> bool { self.tagged.contains(&window) }

    /// Tags `window`. Returns `false` if it was already tagged.
    pub fn tag(&mut self, window: WindowId) -> bool { self.tagged.insert(window) }

    /// Clears the tag on `window`. Returns `false` if it was not tagged.
    pub fn untag(&mut self, window: WindowId) -> bool { self.tagged.remove(&window) }

    /// Number of tagged windows.
    #[must_use]
    pub fn len(&self) -> usize { self.tagged.len() }

    /// Returns whether no window is tagged.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.tagged.is_empty() }

    /// Iterates over the tagged windows in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = WindowId> + '_ { self.tagged.iter().copied() }

    /// Drops tags of windows that are no longer open. Returns how many were dropped.
    pub fn retain_live<H: Host + ?Sized>(&mut self, host: &H) -> usize {
        let live: HashSet<WindowId> = host
            .window_actors()
            .into_iter()
            .filter_map(|actor| host.meta_window(actor).ok().flatten())
            .collect();

        let before = self.tagged.len();
        self.tagged.retain(|window| live.contains(window));
        before - self.tagged.len()
    }
}

/// Attaches and detaches the grayscale effect on single actors.
#[derive(Debug, Default)]
pub struct ActorEffectBinder {
    tags: WindowTags,
}

impl ActorEffectBinder {
    /// Creates a binder with an empty tag table.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Returns the window tag table.
    #[must_use]
    pub const fn tags(&self) -> &WindowTags { &self.tags }

    /// Returns the window tag table for direct edits.
    pub const fn tags_mut(&mut self) -> &mut WindowTags { &mut self.tags }

    /// Returns whether the window backing `actor` is tagged.
    #[must_use]
    pub fn is_tagged<H: Host + ?Sized>(&self, host: &H, actor: ActorId) -> bool {
        matches!(host.meta_window(actor), Ok(Some(window)) if self.tags.is_tagged(window))
    }

    /// Returns whether the grayscale effect is attached to `actor`.
    ///
    /// A stale actor reports `false`.
    #[must_use]
    pub fn has_effect<H: Host + ?Sized>(&self, host: &H, actor: ActorId) -> bool {
        match host.effect(actor, EFFECT_NAME) {
            Ok(effect) => effect.is_some(),
            Err(err) => {
                log_stale(actor, &err);
                false
            }
        }
    }

    /// Attaches the grayscale effect to `actor` unless it is already present,
    /// tagging its window if it is a window actor.
    ///
    /// Returns `true` if a new effect was attached.
    pub fn attach<H: Host + ?Sized>(&mut self, host: &mut H, actor: ActorId) -> bool {
        self.try_attach(host, actor).unwrap_or_else(|err| {
            log_stale(actor, &err);
            false
        })
    }

    /// Removes the grayscale effect from `actor` if present and clears its window tag.
    ///
    /// Returns `true` if an effect was removed.
    pub fn detach<H: Host + ?Sized>(&mut self, host: &mut H, actor: ActorId) -> bool {
        self.try_detach(host, actor).unwrap_or_else(|err| {
            log_stale(actor, &err);
            false
        })
    }

    /// Flips the effect state of `actor`. Returns the new state.
    pub fn toggle<H: Host + ?Sized>(&mut self, host: &mut H, actor: ActorId) -> bool {
        if self.has_effect(host, actor) {
            self.detach(host, actor);
            false
        } else {
            self.attach(host, actor)
        }
    }

    /// Removes the effect from `actor` but leaves its window tag in place, so a
    /// later [`restore`](Self::restore) can put it back.
    ///
    /// Returns `true` if an effect was removed.
    pub fn strip<H: Host + ?Sized>(&self, host: &mut H, actor: ActorId) -> bool {
        Self::try_strip(host, actor).unwrap_or_else(|err| {
            log_stale(actor, &err);
            false
        })
    }

    /// Re-attaches the effect to `actor` if its window is tagged.
    ///
    /// Returns `true` if a new effect was attached.
    pub fn restore<H: Host + ?Sized>(&mut self, host: &mut H, actor: ActorId) -> bool {
        self.is_tagged(host, actor) && self.attach(host, actor)
    }

    fn try_attach<H: Host + ?Sized>(&mut self, host: &mut H, actor: ActorId) -> HostResult<bool> {
        if host.effect(actor, EFFECT_NAME)?.is_some() {
            return Ok(false);
        }

        let window = host.meta_window(actor)?;
        host.add_effect_named(actor, EFFECT_NAME, GrayscaleEffect::create())?;
        if let Some(window) = window {
            self.tags.tag(window);
        }

        tracing::trace!(actor = %actor, "attached grayscale effect");
        Ok(true)
    }

    fn try_strip<H: Host + ?Sized>(host: &mut H, actor: ActorId) -> HostResult<bool> {
        if host.effect(actor, EFFECT_NAME)?.is_none() {
            return Ok(false);
        }
        host.remove_effect_named(actor, EFFECT_NAME)?;
        Ok(true)
    }

    fn try_detach<H: Host + ?Sized>(&mut self, host: &mut H, actor: ActorId) -> HostResult<bool> {
        let window = host.meta_window(actor)?;
        let present = host.effect(actor, EFFECT_NAME)?.is_some();
        if present {
            host.remove_effect_named(actor, EFFECT_NAME)?;
            tracing::trace!(actor = %actor, "detached grayscale effect");
        }
        if let Some(window) = window {
            self.tags.untag(window);
        }
        Ok(present)
    }
}

fn log_stale(actor: ActorId, err: &HostError) {
    tracing::debug!(actor = %actor, error = %err, "skipping actor the host no longer knows");
}
