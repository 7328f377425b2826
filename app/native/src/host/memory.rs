//! In-process host compositor.
//!
//! `MemoryHost` keeps a small actor tree, a window registry and the effects
//! attached to each actor. It backs the CLI demo and the test suite.
//!
//! Like a real compositor it accepts a second effect under an existing name,
//! so duplicate attachments are observable through [`MemoryHost::effects_named`].

use std::collections::HashMap;

use super::{ActorId, ActorKind, Host, HostError, HostResult, WindowId};
use crate::effect::DesaturateEffect;

#[derive(Debug)]
struct ActorNode {
    kind: ActorKind,
    parent: Option<ActorId>,
    children: Vec<ActorId>,
    window: Option<WindowId>,
    effects: Vec<(String, DesaturateEffect)>,
    stale: bool,
}

impl ActorNode {
    const fn new(kind: ActorKind, parent: Option<ActorId>, window: Option<WindowId>) -> Self {
        Self {
            kind,
            parent,
            children: Vec::new(),
            window,
            effects: Vec::new(),
            stale: false,
        }
    }
}

#[derive(Debug, Default)]
struct WindowNode {
    focused: bool,
    stale: bool,
}

/// Actor ids of a desktop built by [`MemoryHost::desktop`].
#[derive(Debug, Clone)]
pub struct DesktopLayout {
    /// The background/window-group layer.
    pub background_group: ActorId,
    /// Direct children of the background group (wallpaper, icons).
    pub background: Vec<ActorId>,
    /// A non-background top-level layer (top panel).
    pub panel: ActorId,
    /// Window actors, in registry order.
    pub windows: Vec<ActorId>,
}

/// An in-memory [`Host`] implementation.
#[derive(Debug)]
pub struct MemoryHost {
    root: ActorId,
    next_id: u64,
    actors: HashMap<ActorId, ActorNode>,
    windows: HashMap<WindowId, WindowNode>,
    window_actors: Vec<ActorId>,
}

impl Default for MemoryHost {
    fn default() -> Self { Self::new() }
}

impl MemoryHost {
    /// Creates a host holding only the UI root.
    #[must_use]
    pub fn new() -> Self {
        let root = ActorId(0);
        let mut actors = HashMap::new();
        actors.insert(root, ActorNode::new(ActorKind::Other, None, None));

        Self {
            root,
            next_id: 1,
            actors,
            windows: HashMap::new(),
            window_actors: Vec::new(),
        }
    }

    /// Builds a typical desktop: a background group with `background` children,
    /// a panel layer holding one widget, and `windows` window actors of which
    /// the one at index `focused` (if any) holds focus.
    #[must_use]
    pub fn desktop(background: usize, windows: usize, focused: Option<usize>) -> (Self, DesktopLayout) {
        let mut host = Self::new();
        let background_group = host.add_layer(ActorKind::Background);
        let background = (0..background)
            .map(|_| host.add_child(background_group, ActorKind::Other))
            .collect();
        let panel = host.add_layer(ActorKind::Other);
        host.add_child(panel, ActorKind::Other);
        let windows = (0..windows).map(|index| host.add_window(focused == Some(index))).collect();

        let layout = DesktopLayout {
            background_group,
            background,
            panel,
            windows,
        };
        (host, layout)
    }

    const fn allocate(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Adds a top-level layer under the UI root.
    pub fn add_layer(&mut self, kind: ActorKind) -> ActorId { self.add_child(self.root, kind) }

    /// Adds a child actor under `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` was never created by this host.
    pub fn add_child(&mut self, parent: ActorId, kind: ActorKind) -> ActorId {
        let id = ActorId(self.allocate());
        self.actors.insert(id, ActorNode::new(kind, Some(parent), None));
        self.actors
            .get_mut(&parent)
            .unwrap_or_else(|| panic!("unknown parent {parent}"))
            .children
            .push(id);
        id
    }

    /// Adds an application window to the window registry.
    pub fn add_window(&mut self, focused: bool) -> ActorId {
        let (actor, window) = self.new_window_actor(None);
        self.windows.insert(window, WindowNode { focused: false, stale: false });
        self.window_actors.push(actor);
        if focused {
            self.set_focus(Some(actor));
        }
        actor
    }

    /// Adds an application window that is also a child of `parent` in the tree.
    ///
    /// # Panics
    ///
    /// Panics if `parent` was never created by this host.
    pub fn add_window_to(&mut self, parent: ActorId, focused: bool) -> ActorId {
        let (actor, window) = self.new_window_actor(Some(parent));
        self.windows.insert(window, WindowNode::default());
        self.actors
            .get_mut(&parent)
            .unwrap_or_else(|| panic!("unknown parent {parent}"))
            .children
            .push(actor);
        self.window_actors.push(actor);
        if focused {
            self.set_focus(Some(actor));
        }
        actor
    }

    fn new_window_actor(&mut self, parent: Option<ActorId>) -> (ActorId, WindowId) {
        let actor = ActorId(self.allocate());
        let window = WindowId(self.allocate());
        self.actors.insert(actor, ActorNode::new(ActorKind::Window, parent, Some(window)));
        (actor, window)
    }

    /// Moves input focus to the window backing `actor`, or clears it.
    pub fn set_focus(&mut self, actor: Option<ActorId>) {
        let target = actor.and_then(|actor| self.window_of(actor));
        for (id, window) in &mut self.windows {
            window.focused = Some(*id) == target;
        }
    }

    /// Invalidates `actor` (and its window) while leaving it listed, the way a
    /// handle looks when the host destroys it between enumeration and use.
    pub fn mark_stale(&mut self, actor: ActorId) {
        if let Some(node) = self.actors.get_mut(&actor) {
            node.stale = true;
            if let Some(window) = node.window.and_then(|id| self.windows.get_mut(&id)) {
                window.stale = true;
            }
        }
    }

    /// Closes a window: the actor leaves the registry and the tree.
    pub fn remove_window(&mut self, actor: ActorId) {
        self.window_actors.retain(|id| *id != actor);
        if let Some(node) = self.actors.remove(&actor) {
            if let Some(parent) = node.parent.and_then(|id| self.actors.get_mut(&id)) {
                parent.children.retain(|id| *id != actor);
            }
            if let Some(window) = node.window {
                self.windows.remove(&window);
            }
        }
    }

    /// Returns the window backing `actor`, ignoring staleness.
    #[must_use]
    pub fn window_of(&self, actor: ActorId) -> Option<WindowId> {
        self.actors.get(&actor).and_then(|node| node.window)
    }

    /// Returns the kind of `actor`, ignoring staleness.
    #[must_use]
    pub fn kind_of(&self, actor: ActorId) -> Option<ActorKind> {
        self.actors.get(&actor).map(|node| node.kind)
    }

    /// Returns the window actor currently holding focus, if any.
    #[must_use]
    pub fn focused_actor(&self) -> Option<ActorId> {
        self.window_actors.iter().copied().find(|actor| {
            self.window_of(*actor)
                .and_then(|window| self.windows.get(&window))
                .is_some_and(|window| window.focused)
        })
    }

    /// Counts the effects attached to `actor` under `name`.
    #[must_use]
    pub fn effects_named(&self, actor: ActorId, name: &str) -> usize {
        self.actors.get(&actor).map_or(0, |node| {
            node.effects.iter().filter(|(effect_name, _)| effect_name == name).count()
        })
    }

    /// Returns every actor id known to the host, in creation order.
    #[must_use]
    pub fn actor_ids(&self) -> Vec<ActorId> {
        let mut ids: Vec<ActorId> = self.actors.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    fn live(&self, actor: ActorId) -> HostResult<&ActorNode> {
        self.actors.get(&actor).filter(|node| !node.stale).ok_or(HostError::StaleActor(actor))
    }

    fn live_mut(&mut self, actor: ActorId) -> HostResult<&mut ActorNode> {
        self.actors
            .get_mut(&actor)
            .filter(|node| !node.stale)
            .ok_or(HostError::StaleActor(actor))
    }
}

impl Host for MemoryHost {
    fn ui_root(&self) -> ActorId { self.root }

    fn children(&self, actor: ActorId) -> HostResult<Vec<ActorId>> {
        Ok(self.live(actor)?.children.clone())
    }

    fn classify(&self, actor: ActorId) -> HostResult<ActorKind> { Ok(self.live(actor)?.kind) }

    fn window_actors(&self) -> Vec<ActorId> { self.window_actors.clone() }

    fn meta_window(&self, actor: ActorId) -> HostResult<Option<WindowId>> {
        Ok(self.live(actor)?.window)
    }

    fn window_has_focus(&self, window: WindowId) -> HostResult<bool> {
        self.windows
            .get(&window)
            .filter(|node| !node.stale)
            .map(|node| node.focused)
            .ok_or(HostError::StaleWindow(window))
    }

    fn effect(&self, actor: ActorId, name: &str) -> HostResult<Option<DesaturateEffect>> {
        Ok(self
            .live(actor)?
            .effects
            .iter()
            .find(|(effect_name, _)| effect_name == name)
            .map(|(_, effect)| *effect))
    }

    fn add_effect_named(
        &mut self,
        actor: ActorId,
        name: &str,
        effect: DesaturateEffect,
    ) -> HostResult<()> {
        self.live_mut(actor)?.effects.push((name.to_string(), effect));
        Ok(())
    }

    fn remove_effect_named(&mut self, actor: ActorId, name: &str) -> HostResult<()> {
        self.live_mut(actor)?.effects.retain(|(effect_name, _)| effect_name != name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::GrayscaleEffect;

    #[test]
    fn test_desktop_layout() {
        let (host, layout) = MemoryHost::desktop(2, 3, Some(1));

        assert_eq!(host.children(host.ui_root()).unwrap(), vec![
            layout.background_group,
            layout.panel
        ]);
        assert_eq!(host.classify(layout.background_group).unwrap(), ActorKind::Background);
        assert_eq!(host.children(layout.background_group).unwrap(), layout.background);
        assert_eq!(host.window_actors(), layout.windows);
        assert_eq!(host.focused_actor(), Some(layout.windows[1]));
    }

    #[test]
    fn test_set_focus_is_exclusive() {
        let (mut host, layout) = MemoryHost::desktop(0, 3, Some(0));
        host.set_focus(Some(layout.windows[2]));

        let focused: Vec<bool> = layout
            .windows
            .iter()
            .map(|actor| host.window_has_focus(host.window_of(*actor).unwrap()).unwrap())
            .collect();
        assert_eq!(focused, vec![false, false, true]);

        host.set_focus(None);
        assert_eq!(host.focused_actor(), None);
    }

    #[test]
    fn test_host_accepts_duplicate_effect_names() {
        let (mut host, layout) = MemoryHost::desktop(0, 1, None);
        let actor = layout.windows[0];

        host.add_effect_named(actor, "fx", GrayscaleEffect::create()).unwrap();
        host.add_effect_named(actor, "fx", GrayscaleEffect::create()).unwrap();
        assert_eq!(host.effects_named(actor, "fx"), 2);

        host.remove_effect_named(actor, "fx").unwrap();
        assert_eq!(host.effects_named(actor, "fx"), 0);
        assert!(host.effect(actor, "fx").unwrap().is_none());
    }

    #[test]
    fn test_stale_actor_rejects_calls() {
        let (mut host, layout) = MemoryHost::desktop(0, 1, Some(0));
        let actor = layout.windows[0];
        let window = host.window_of(actor).unwrap();
        host.mark_stale(actor);

        assert_eq!(host.window_actors(), vec![actor]);
        assert_eq!(host.classify(actor), Err(HostError::StaleActor(actor)));
        assert_eq!(host.window_has_focus(window), Err(HostError::StaleWindow(window)));
        assert_eq!(
            host.add_effect_named(actor, "fx", GrayscaleEffect::create()),
            Err(HostError::StaleActor(actor))
        );
    }

    #[test]
    fn test_remove_window_detaches_from_tree() {
        let mut host = MemoryHost::new();
        let group = host.add_layer(ActorKind::Background);
        let window = host.add_window_to(group, false);

        assert_eq!(host.children(group).unwrap(), vec![window]);
        host.remove_window(window);
        assert!(host.children(group).unwrap().is_empty());
        assert!(host.window_actors().is_empty());
        assert_eq!(host.kind_of(window), None);
    }
}
