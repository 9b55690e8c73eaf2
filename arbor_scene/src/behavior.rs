// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node behavior hooks and the context they run in.

use core::any::Any;

use kurbo::{Affine, Point, Size};

use crate::event::{KeyEvent, TouchEvent, ZoomEvent};
use crate::scene::Scene;
use crate::types::{NodeFlags, NodeId};

/// Application logic attached to a node.
///
/// Every hook has a no-op default. Input hooks return `true` to consume the event;
/// an unconsumed event bubbles back to the container, which may apply its own
/// fallback.
///
/// While a hook runs, the behavior is detached from its node. Calls made through
/// the [`EventCx`] that would invoke a hook of the *same* node (for example
/// focusing itself) update the node's flags but skip the hook.
pub trait Behavior<S>: Any {
    /// Called once per frame, before the node's children update.
    fn update(&mut self, cx: &mut EventCx<'_, S>) {
        let _ = cx;
    }

    /// Render the node. Called before the node's children draw.
    fn draw(&self, node: &NodeView, surface: &mut S) {
        let _ = (node, surface);
    }

    /// Pointer input that reached this node.
    fn touch(&mut self, cx: &mut EventCx<'_, S>, event: &TouchEvent) -> bool {
        let _ = (cx, event);
        false
    }

    /// Wheel or pinch input that reached this node.
    fn zoom(&mut self, cx: &mut EventCx<'_, S>, event: &ZoomEvent) -> bool {
        let _ = (cx, event);
        false
    }

    /// Key input that reached this node.
    fn key(&mut self, cx: &mut EventCx<'_, S>, event: &KeyEvent) -> bool {
        let _ = (cx, event);
        false
    }

    /// The node gained or lost focus.
    fn focus_changed(&mut self, cx: &mut EventCx<'_, S>, focused: bool) {
        let _ = (cx, focused);
    }

    /// The node is focused and its window received Select or Enter.
    fn press(&mut self, cx: &mut EventCx<'_, S>) {
        let _ = cx;
    }

    /// The node was marked for removal.
    fn removed(&mut self, cx: &mut EventCx<'_, S>) {
        let _ = cx;
    }
}

/// Read-only snapshot of a node handed to [`Behavior::draw`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NodeView {
    /// The node being drawn.
    pub id: NodeId,
    /// Local → world transform.
    pub transform: Affine,
    /// Size in local units.
    pub size: Size,
    /// Flags at draw time.
    pub flags: NodeFlags,
}

impl NodeView {
    /// Whether the node has focus.
    pub fn is_focused(&self) -> bool {
        self.flags.contains(NodeFlags::FOCUSED)
    }

    /// Whether the node reacts to input.
    pub fn is_enabled(&self) -> bool {
        self.flags.contains(NodeFlags::ENABLED)
    }
}

/// Mutable access to the scene from inside a hook, scoped to one node.
pub struct EventCx<'a, S: 'static> {
    pub(crate) scene: &'a mut Scene<S>,
    pub(crate) id: NodeId,
}

impl<S: 'static> core::fmt::Debug for EventCx<'_, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventCx").field("id", &self.id).finish_non_exhaustive()
    }
}

impl<S: 'static> EventCx<'_, S> {
    /// The node whose hook is running.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The whole scene.
    pub fn scene(&self) -> &Scene<S> {
        self.scene
    }

    /// The whole scene, mutably.
    pub fn scene_mut(&mut self) -> &mut Scene<S> {
        self.scene
    }

    /// Frame time of the last [`Scene::update`].
    pub fn now_ms(&self) -> u64 {
        self.scene.now_ms()
    }

    /// Size of this node.
    pub fn size(&self) -> Size {
        self.scene.size(self.id).unwrap_or(Size::ZERO)
    }

    /// Whether this node has focus.
    pub fn is_focused(&self) -> bool {
        self.scene.is_focused(self.id)
    }

    /// Focus or blur this node. Returns whether the focus state changed.
    pub fn set_focused(&mut self, focused: bool) -> bool {
        self.scene.set_focused(self.id, focused)
    }

    /// Move focus to the next or previous sibling in the parent's focus ring.
    pub fn focus_next(&mut self, forward: bool) -> bool {
        match self.scene.parent(self.id) {
            Some(parent) => self.scene.focus_next(parent, forward),
            None => false,
        }
    }

    /// Map a world point into this node's space.
    pub fn client_point(&self, world: Point) -> Option<Point> {
        self.scene.client_point(self.id, world)
    }

    /// Whether a world point falls inside this node.
    pub fn hit_test(&self, world: Point) -> bool {
        self.scene.hit_test(self.id, world)
    }

    /// Mark this node for removal.
    pub fn remove(&mut self) {
        self.scene.remove(self.id);
    }
}
