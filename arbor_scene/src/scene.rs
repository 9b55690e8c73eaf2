// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene storage, node lifecycle, and per-frame update/draw.

use core::any::Any;

use arbor_focus::FocusManager;
use arbor_transform::{AffineTransform, TransformArena, TransformId};
use kurbo::{Affine, Point, Size, Vec2};
use smallvec::SmallVec;

use crate::anim::{AnimationKind, Animator, Completion, Motion};
use crate::behavior::{Behavior, EventCx, NodeView};
use crate::children::ChildList;
use crate::config::SceneConfig;
use crate::error::{SceneError, SceneResult};
use crate::event::TouchEvent;
use crate::types::{ContainerKind, DispatchOrder, NodeFlags, NodeId, WindowFlags};

pub(crate) type TouchObserver = Box<dyn FnMut(&TouchEvent) -> bool>;

pub(crate) struct Container {
    pub(crate) kind: ContainerKind,
    /// Overrides [`SceneConfig::dispatch_order`].
    pub(crate) order: Option<DispatchOrder>,
    pub(crate) children: ChildList,
}

pub(crate) struct Node<S: 'static> {
    generation: u32,
    pub(crate) parent: Option<NodeId>,
    pub(crate) transform: TransformId,
    pub(crate) size: Size,
    pub(crate) z_index: i32,
    /// Stand-in z for children inserted with `z_index == 0`.
    pub(crate) temp_z_index: i32,
    pub(crate) flags: NodeFlags,
    pub(crate) container: Option<Container>,
    pub(crate) behavior: Option<Box<dyn Behavior<S>>>,
    pub(crate) on_touch: Option<TouchObserver>,
    /// Created on first use.
    pub(crate) animator: Option<Animator>,
    pub(crate) tag: Option<Box<dyn Any>>,
}

impl<S: 'static> Node<S> {
    pub(crate) fn effective_z(&self) -> i32 {
        if self.z_index == 0 {
            self.temp_z_index
        } else {
            self.z_index
        }
    }

    pub(crate) fn is(&self, flag: NodeFlags) -> bool {
        self.flags.contains(flag)
    }
}

/// Description of a node to insert with [`Scene::insert`].
///
/// ```rust
/// use arbor_scene::{Element, Scene, WindowFlags};
/// use kurbo::{Size, Vec2};
///
/// let mut scene: Scene = Scene::new();
/// let window = scene
///     .insert(None, Element::window(WindowFlags::FULLSCREEN).with_size(Size::new(640.0, 480.0)))
///     .unwrap();
/// let button = scene
///     .insert(
///         Some(window),
///         Element::leaf()
///             .with_position(Vec2::new(10.0, 10.0))
///             .with_size(Size::new(80.0, 24.0))
///             .focusable(),
///     )
///     .unwrap();
/// assert_eq!(scene.parent(button), Some(window));
/// ```
pub struct Element<S: 'static = ()> {
    container: Option<ContainerKind>,
    order: Option<DispatchOrder>,
    behavior: Option<Box<dyn Behavior<S>>>,
    position: Vec2,
    rotation: f64,
    scale: Vec2,
    size: Size,
    z_index: i32,
    flags: NodeFlags,
}

impl<S: 'static> core::fmt::Debug for Element<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Element")
            .field("container", &self.container)
            .field("order", &self.order)
            .field("behavior", &self.behavior.is_some())
            .field("position", &self.position)
            .field("rotation", &self.rotation)
            .field("scale", &self.scale)
            .field("size", &self.size)
            .field("z_index", &self.z_index)
            .field("flags", &self.flags)
            .finish()
    }
}

impl<S: 'static> Element<S> {
    fn new(container: Option<ContainerKind>) -> Self {
        Self {
            container,
            order: None,
            behavior: None,
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
            size: Size::ZERO,
            z_index: 0,
            flags: NodeFlags::default(),
        }
    }

    /// A node without children.
    pub fn leaf() -> Self {
        Self::new(None)
    }

    /// A window. [`WindowFlags::CONTROLLING`] is always added.
    pub fn window(flags: WindowFlags) -> Self {
        Self::new(Some(ContainerKind::Window(flags | WindowFlags::CONTROLLING)))
    }

    /// A panel.
    pub fn panel() -> Self {
        Self::new(Some(ContainerKind::Panel))
    }

    /// Attach application logic.
    pub fn with_behavior(mut self, behavior: impl Behavior<S>) -> Self {
        self.behavior = Some(Box::new(behavior));
        self
    }

    /// Local position.
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    /// Local rotation in degrees.
    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    /// Uniform local scale.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = Vec2::new(scale, scale);
        self
    }

    /// Size in local units, used for hit testing.
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    /// Stacking order among siblings. `0` stacks above every existing sibling.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Take part in the parent's focus ring.
    pub fn focusable(mut self) -> Self {
        self.flags |= NodeFlags::FOCUSABLE;
        self
    }

    /// Start hidden.
    pub fn hidden(mut self) -> Self {
        self.flags.remove(NodeFlags::VISIBLE);
        self
    }

    /// Start disabled.
    pub fn disabled(mut self) -> Self {
        self.flags.remove(NodeFlags::ENABLED);
        self
    }

    /// Child dispatch order for this container.
    pub fn with_dispatch_order(mut self, order: DispatchOrder) -> Self {
        self.order = Some(order);
        self
    }
}

/// A retained tree of nodes, their transforms, and the scene's focus.
///
/// `S` is the rendering surface passed through [`Scene::draw`] to behaviors.
///
/// All access is single-threaded. Handlers may remove nodes at any time; removed
/// nodes are only marked, and their container drops them during its next update.
pub struct Scene<S: 'static = ()> {
    nodes: Vec<Option<Node<S>>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    pub(crate) transforms: TransformArena,
    pub(crate) focus: FocusManager<NodeId>,
    pub(crate) config: SceneConfig,
    now_ms: u64,
}

impl<S: 'static> core::fmt::Debug for Scene<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let live = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Scene")
            .field("nodes_total", &self.nodes.len())
            .field("nodes_live", &live)
            .field("free_list", &self.free_list.len())
            .field("focused", &self.focus.current())
            .field("config", &self.config)
            .field("now_ms", &self.now_ms)
            .finish_non_exhaustive()
    }
}

impl<S: 'static> Default for Scene<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: 'static> Scene<S> {
    /// Create an empty scene with the default configuration.
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    /// Create an empty scene.
    pub fn with_config(config: SceneConfig) -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            transforms: TransformArena::with_epsilons(config.epsilons),
            focus: FocusManager::new(),
            config,
            now_ms: 0,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Frame time passed to the last [`Scene::update`].
    ///
    /// Animations started between frames are timed from this value.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// The transforms of every node.
    pub fn transforms(&self) -> &TransformArena {
        &self.transforms
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub(crate) fn node(&self, id: NodeId) -> Option<&Node<S>> {
        let node = self.nodes.get(id.idx())?.as_ref()?;
        (node.generation == id.1).then_some(node)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<S>> {
        let node = self.nodes.get_mut(id.idx())?.as_mut()?;
        (node.generation == id.1).then_some(node)
    }

    /// Like [`Scene::node_mut`], but reports stale ids reaching a mutation.
    pub(crate) fn node_mut_or_warn(
        &mut self,
        id: NodeId,
        op: &'static str,
    ) -> Option<&mut Node<S>> {
        if !self.is_alive(id) {
            tracing::warn!(?id, op, "ignoring call on stale node");
            return None;
        }
        self.node_mut(id)
    }

    /// Insert a node as a child of `parent`, or as a root if `None`.
    ///
    /// A child inserted with `z_index == 0` stacks above all of its current
    /// siblings.
    pub fn insert(&mut self, parent: Option<NodeId>, element: Element<S>) -> SceneResult<NodeId> {
        if let Some(p) = parent {
            self.container_of(p)?;
        }
        let Element {
            container,
            order,
            behavior,
            position,
            rotation,
            scale,
            size,
            z_index,
            flags,
        } = element;
        let transform = self
            .transforms
            .insert(AffineTransform::new(position, rotation, scale));
        let node = Node {
            generation: 0,
            parent: None,
            transform,
            size,
            z_index,
            temp_z_index: 0,
            flags,
            container: container.map(|kind| Container {
                kind,
                order,
                children: ChildList::default(),
            }),
            behavior,
            on_touch: None,
            animator: None,
            tag: None,
        };
        let id = self.alloc(node);
        if let Some(p) = parent {
            self.link(id, p);
        }
        Ok(id)
    }

    fn alloc(&mut self, mut node: Node<S>) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            node.generation = generation;
            self.nodes[idx] = Some(node);
            (idx, generation)
        } else {
            node.generation = 1;
            self.nodes.push(Some(node));
            self.generations.push(1);
            (self.nodes.len() - 1, 1)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId stores 32-bit slot indices."
        )]
        let idx = idx as u32;
        NodeId::new(idx, generation)
    }

    /// Resolve `id` as a container, rejecting stale ids and leaves.
    pub(crate) fn container_of(&self, id: NodeId) -> SceneResult<&Container> {
        let Some(node) = self.node(id) else {
            tracing::debug!(?id, "rejected: stale node");
            return Err(SceneError::StaleNode(id));
        };
        node.container.as_ref().ok_or_else(|| {
            tracing::debug!(?id, "rejected: not a container");
            SceneError::NotAContainer(id)
        })
    }

    fn container_mut(&mut self, id: NodeId) -> Option<&mut Container> {
        self.node_mut(id)?.container.as_mut()
    }

    /// Attach a live, parentless `id` under the live container `parent`.
    fn link(&mut self, id: NodeId, parent: NodeId) {
        let Some((parent_tf, max_z)) = self.node(parent).and_then(|p| {
            let c = p.container.as_ref()?;
            Some((p.transform, c.children.maximum_z_index()))
        }) else {
            return;
        };
        let Some(node) = self.node_mut(id) else {
            return;
        };
        node.parent = Some(parent);
        if node.z_index == 0 {
            node.temp_z_index = max_z.saturating_add(1);
        }
        let (tf, z) = (node.transform, node.effective_z());
        self.transforms.set_parent(tf, Some(parent_tf));
        if let Some(p) = self.node_mut(parent) {
            p.flags |= NodeFlags::CHANGED;
            if let Some(c) = p.container.as_mut() {
                c.children.insert(id, z);
            }
        }
    }

    /// Detach `id` from its parent, if any.
    fn unlink(&mut self, id: NodeId) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        let Some(parent) = node.parent.take() else {
            return;
        };
        let tf = node.transform;
        self.transforms.set_parent(tf, None);
        if let Some(p) = self.node_mut(parent) {
            p.flags |= NodeFlags::CHANGED;
            if let Some(c) = p.container.as_mut() {
                c.children.remove(id);
            }
        }
    }

    /// Move `id` under `new_parent`, or make it a root.
    ///
    /// Rejects moves that would make a node its own ancestor.
    pub fn reparent(&mut self, id: NodeId, new_parent: Option<NodeId>) -> SceneResult<()> {
        if !self.is_alive(id) {
            tracing::debug!(?id, "rejected: stale node");
            return Err(SceneError::StaleNode(id));
        }
        if let Some(p) = new_parent {
            self.container_of(p)?;
            if self.ancestors(p).any(|a| a == id) {
                tracing::debug!(child = ?id, parent = ?p, "rejected: cycle");
                return Err(SceneError::CycleDetected {
                    child: id,
                    parent: p,
                });
            }
        }
        if self.parent(id) == new_parent {
            return Ok(());
        }
        self.unlink(id);
        if let Some(p) = new_parent {
            self.link(id, p);
        }
        Ok(())
    }

    /// `id` followed by its ancestors up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let start = self.is_alive(id).then_some(id);
        core::iter::successors(start, |&n| self.parent(n))
    }

    /// Parent of a live node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    /// Children of a container in paint order (lowest z first).
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id)
            .and_then(|n| n.container.as_ref())
            .map(|c| c.children.paint_order().collect())
            .unwrap_or_default()
    }

    /// Number of children, including ones marked for removal.
    pub fn child_count(&self, id: NodeId) -> usize {
        self.node(id)
            .and_then(|n| n.container.as_ref())
            .map_or(0, |c| c.children.len())
    }

    /// Largest effective z among the children of a container.
    pub fn maximum_z_index(&self, id: NodeId) -> Option<i32> {
        let c = self.node(id)?.container.as_ref()?;
        Some(c.children.maximum_z_index())
    }

    /// Effective z of a node among its siblings.
    pub fn z_index(&self, id: NodeId) -> Option<i32> {
        self.node(id).map(Node::effective_z)
    }

    /// Set the stacking order among siblings. `0` moves the node above every
    /// sibling.
    pub fn set_z_index(&mut self, id: NodeId, z_index: i32) {
        let Some(node) = self.node_mut_or_warn(id, "set_z_index") else {
            return;
        };
        node.z_index = z_index;
        let Some(parent) = node.parent else {
            return;
        };
        let max_z = self.maximum_z_index(parent).unwrap_or(0);
        let Some(node) = self.node_mut(id) else {
            return;
        };
        if z_index == 0 {
            node.temp_z_index = max_z.saturating_add(1);
        }
        let z = node.effective_z();
        if let Some(c) = self.container_mut(parent) {
            c.children.restack(id, z);
        }
    }

    /// Whether the node can hold children.
    pub fn is_container(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|n| n.container.is_some())
    }

    /// Container kind of a node.
    pub fn container_kind(&self, id: NodeId) -> Option<ContainerKind> {
        Some(self.node(id)?.container.as_ref()?.kind)
    }

    /// Window flags of a window node.
    pub fn window_flags(&self, id: NodeId) -> Option<WindowFlags> {
        match self.container_kind(id)? {
            ContainerKind::Window(flags) => Some(flags),
            ContainerKind::Panel => None,
        }
    }

    /// Replace the flags of a window node. Does nothing for other nodes.
    pub fn set_window_flags(&mut self, id: NodeId, flags: WindowFlags) {
        if let Some(c) = self.container_mut(id)
            && let ContainerKind::Window(current) = &mut c.kind
        {
            *current = flags;
        }
    }

    /// Whether `id` is a modal (not fullscreen) window.
    pub fn is_modal(&self, id: NodeId) -> bool {
        self.window_flags(id).is_some_and(WindowFlags::is_modal)
    }

    /// Child dispatch order of a container.
    pub fn dispatch_order(&self, id: NodeId) -> Option<DispatchOrder> {
        let c = self.node(id)?.container.as_ref()?;
        Some(c.order.unwrap_or(self.config.dispatch_order))
    }

    /// Override the child dispatch order of a container.
    pub fn set_dispatch_order(&mut self, id: NodeId, order: DispatchOrder) {
        if let Some(c) = self.container_mut(id) {
            c.order = Some(order);
        }
    }

    /// Flags of a live node.
    pub fn flags(&self, id: NodeId) -> Option<NodeFlags> {
        self.node(id).map(|n| n.flags)
    }

    fn set_flag(&mut self, id: NodeId, flag: NodeFlags, on: bool, op: &'static str) {
        if let Some(node) = self.node_mut_or_warn(id, op) {
            node.flags.set(flag, on);
        }
    }

    /// Whether the node is drawn and reachable by pointer events.
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|n| n.is(NodeFlags::VISIBLE))
    }

    /// Show or hide a node and its subtree.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        self.set_flag(id, NodeFlags::VISIBLE, visible, "set_visible");
    }

    /// Whether the node reacts to input.
    pub fn is_enabled(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|n| n.is(NodeFlags::ENABLED))
    }

    /// Enable or disable input handling.
    pub fn set_enabled(&mut self, id: NodeId, enabled: bool) {
        self.set_flag(id, NodeFlags::ENABLED, enabled, "set_enabled");
    }

    /// Whether the node was removed and awaits pruning.
    pub fn is_removing(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|n| n.is(NodeFlags::REMOVING))
    }

    /// Read and clear the changed flag.
    pub fn take_changes(&mut self, id: NodeId) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        let changed = node.is(NodeFlags::CHANGED);
        node.flags.remove(NodeFlags::CHANGED);
        changed
    }

    /// Restore default flags and stop animations.
    ///
    /// Focusability and pending removal are kept. A focused node is blurred first.
    pub fn reset(&mut self, id: NodeId) {
        if self.is_focused(id) {
            self.set_focused(id, false);
        }
        let Some(node) = self.node_mut_or_warn(id, "reset") else {
            return;
        };
        let kept = node.flags & (NodeFlags::FOCUSABLE | NodeFlags::REMOVING);
        node.flags = NodeFlags::default() | kept;
        if let Some(animator) = node.animator.as_mut() {
            animator.reset();
        }
    }

    /// Size in local units.
    pub fn size(&self, id: NodeId) -> Option<Size> {
        self.node(id).map(|n| n.size)
    }

    /// Resize a node.
    pub fn set_size(&mut self, id: NodeId, size: Size) {
        if let Some(node) = self.node_mut_or_warn(id, "set_size") {
            node.size = size;
        }
    }

    /// Attach an arbitrary value to a node, replacing any previous one.
    pub fn set_tag<T: Any>(&mut self, id: NodeId, tag: T) {
        if let Some(node) = self.node_mut_or_warn(id, "set_tag") {
            node.tag = Some(Box::new(tag));
        }
    }

    /// The node's tag, if it is a `T`.
    pub fn tag<T: Any>(&self, id: NodeId) -> Option<&T> {
        self.node(id)?.tag.as_ref()?.downcast_ref()
    }

    /// Remove and return the node's tag.
    pub fn take_tag(&mut self, id: NodeId) -> Option<Box<dyn Any>> {
        self.node_mut(id)?.tag.take()
    }

    /// Observe pointer events reaching the node while it is enabled.
    ///
    /// The observer runs before the node's children and behavior; returning
    /// `true` consumes the event.
    pub fn set_on_touch(
        &mut self,
        id: NodeId,
        observer: impl FnMut(&TouchEvent) -> bool + 'static,
    ) {
        if let Some(node) = self.node_mut_or_warn(id, "set_on_touch") {
            node.on_touch = Some(Box::new(observer));
        }
    }

    /// Replace the node's behavior.
    pub fn set_behavior(&mut self, id: NodeId, behavior: impl Behavior<S>) {
        if let Some(node) = self.node_mut_or_warn(id, "set_behavior") {
            node.behavior = Some(Box::new(behavior));
        }
    }

    /// The node's behavior, if it is a `B`.
    pub fn behavior<B: Behavior<S>>(&self, id: NodeId) -> Option<&B> {
        let behavior: &dyn Any = self.node(id)?.behavior.as_deref()?;
        behavior.downcast_ref()
    }

    /// The node's behavior, mutably, if it is a `B`.
    pub fn behavior_mut<B: Behavior<S>>(&mut self, id: NodeId) -> Option<&mut B> {
        let behavior: &mut dyn Any = self.node_mut(id)?.behavior.as_deref_mut()?;
        behavior.downcast_mut()
    }

    /// Run a hook of `id`'s behavior with the behavior detached from the node.
    ///
    /// Returns `None` if the node is stale, has no behavior, or is already running
    /// a hook further up the stack.
    pub(crate) fn with_behavior<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut dyn Behavior<S>, &mut EventCx<'_, S>) -> R,
    ) -> Option<R> {
        let mut behavior = self.node_mut(id)?.behavior.take()?;
        let result = f(behavior.as_mut(), &mut EventCx { scene: self, id });
        if let Some(node) = self.node_mut(id)
            && node.behavior.is_none()
        {
            node.behavior = Some(behavior);
        }
        Some(result)
    }

    /// Mark a node for removal.
    ///
    /// The node stays in the tree until its container's next update prunes it.
    /// Removing a panel also removes its children. Repeated calls are no-ops.
    pub fn remove(&mut self, id: NodeId) {
        let Some(node) = self.node_mut_or_warn(id, "remove") else {
            return;
        };
        if node.is(NodeFlags::REMOVING) {
            return;
        }
        node.flags |= NodeFlags::REMOVING;
        let is_panel = matches!(
            node.container.as_ref().map(|c| c.kind),
            Some(ContainerKind::Panel)
        );
        tracing::debug!(?id, "node marked for removal");
        self.with_behavior(id, |b, cx| b.removed(cx));
        if is_panel {
            self.clear_children(id);
        }
    }

    /// Remove every child of a container.
    pub fn clear_children(&mut self, id: NodeId) {
        let Some(c) = self.node(id).and_then(|n| n.container.as_ref()) else {
            return;
        };
        let children: SmallVec<[NodeId; 8]> = c.children.paint_order().collect();
        for child in children {
            self.remove(child);
        }
    }

    /// Advance one frame from `root` down, in paint order.
    ///
    /// Runs animations and [`Behavior::update`], then prunes removed children.
    /// Returns `false` if `root` itself was removed; it is dropped from the scene
    /// and its id becomes stale.
    pub fn update(&mut self, root: NodeId, now_ms: u64) -> bool {
        self.now_ms = now_ms;
        if !self.is_alive(root) {
            tracing::warn!(id = ?root, "update on stale node");
            return false;
        }
        if self.update_node(root) {
            return true;
        }
        self.unlink(root);
        self.release_subtree(root);
        false
    }

    fn update_node(&mut self, id: NodeId) -> bool {
        let now_ms = self.now_ms;
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        if node.is(NodeFlags::REMOVING) {
            return false;
        }
        if let Some(animator) = node.animator.as_mut()
            && !animator.is_idle()
        {
            let frame = animator.update(now_ms);
            for motion in frame.steps {
                self.apply_motion(id, motion);
            }
            for done in frame.completions {
                done();
            }
        }
        self.with_behavior(id, |b, cx| b.update(cx));

        let Some(c) = self.node(id).and_then(|n| n.container.as_ref()) else {
            return true;
        };
        let children: SmallVec<[NodeId; 8]> = c.children.paint_order().collect();
        for child in children {
            self.update_node(child);
        }
        self.compact(id);
        true
    }

    /// Drop children that are marked for removal.
    fn compact(&mut self, id: NodeId) {
        let doomed: SmallVec<[NodeId; 8]> = match self.node(id).and_then(|n| n.container.as_ref()) {
            Some(c) => c
                .children
                .paint_order()
                .filter(|&child| self.node(child).is_none_or(|n| n.is(NodeFlags::REMOVING)))
                .collect(),
            None => return,
        };
        if doomed.is_empty() {
            return;
        }
        tracing::debug!(container = ?id, pruned = doomed.len(), "pruned removed children");
        if let Some(node) = self.node_mut(id) {
            node.flags |= NodeFlags::CHANGED;
            if let Some(c) = node.container.as_mut() {
                for child in &doomed {
                    c.children.remove(*child);
                }
            }
        }
        for child in doomed {
            self.release_subtree(child);
        }
    }

    /// Free `id` and its descendants: slots, transforms and focus.
    fn release_subtree(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        for child in self.children(id) {
            self.release_subtree(child);
        }
        let Some(node) = self.nodes[id.idx()].take() else {
            return;
        };
        self.free_list.push(id.idx());
        self.transforms.remove(node.transform);
        self.focus.blur(id);
    }

    /// Render `root` and its visible descendants in paint order.
    pub fn draw(&self, root: NodeId, surface: &mut S) {
        let Some(node) = self.node(root) else {
            return;
        };
        if !node.is(NodeFlags::VISIBLE) {
            return;
        }
        if let Some(behavior) = node.behavior.as_ref() {
            let view = NodeView {
                id: root,
                transform: self
                    .transforms
                    .matrix(node.transform)
                    .unwrap_or(Affine::IDENTITY),
                size: node.size,
                flags: node.flags,
            };
            behavior.draw(&view, surface);
        }
        if let Some(c) = node.container.as_ref() {
            for child in c.children.paint_order() {
                self.draw(child, surface);
            }
        }
    }

    fn transform_of(&self, id: NodeId) -> Option<TransformId> {
        self.node(id).map(|n| n.transform)
    }

    /// Transform id of a node, for direct use with [`Scene::transforms`].
    pub fn transform_id(&self, id: NodeId) -> Option<TransformId> {
        self.transform_of(id)
    }

    /// Local position.
    pub fn position(&self, id: NodeId) -> Option<Vec2> {
        Some(self.transforms.get(self.transform_of(id)?)?.position())
    }

    /// Move a node.
    pub fn set_position(&mut self, id: NodeId, position: Vec2) {
        match self.transform_of(id) {
            Some(tf) => self.transforms.set_position(tf, position),
            None => tracing::warn!(?id, op = "set_position", "ignoring call on stale node"),
        }
    }

    /// Local rotation in degrees.
    pub fn rotation(&self, id: NodeId) -> Option<f64> {
        Some(self.transforms.get(self.transform_of(id)?)?.rotation())
    }

    /// Rotate a node (degrees).
    pub fn set_rotation(&mut self, id: NodeId, degrees: f64) {
        match self.transform_of(id) {
            Some(tf) => self.transforms.set_rotation(tf, degrees),
            None => tracing::warn!(?id, op = "set_rotation", "ignoring call on stale node"),
        }
    }

    /// Local scale.
    pub fn scale(&self, id: NodeId) -> Option<Vec2> {
        Some(self.transforms.get(self.transform_of(id)?)?.scale())
    }

    /// Scale a node.
    pub fn set_scale(&mut self, id: NodeId, scale: Vec2) {
        match self.transform_of(id) {
            Some(tf) => self.transforms.set_scale(tf, scale),
            None => tracing::warn!(?id, op = "set_scale", "ignoring call on stale node"),
        }
    }

    /// Scale a node uniformly.
    pub fn set_uniform_scale(&mut self, id: NodeId, scale: f64) {
        self.set_scale(id, Vec2::new(scale, scale));
    }

    /// Local → world matrix.
    pub fn matrix(&self, id: NodeId) -> Option<Affine> {
        self.transforms.matrix(self.transform_of(id)?)
    }

    /// Map a local point of `id` to world space.
    pub fn screen_point(&self, id: NodeId, local: Point) -> Option<Point> {
        self.transforms.screen_point(self.transform_of(id)?, local)
    }

    /// Map a world point into the space of `id`. `None` for singular transforms.
    pub fn client_point(&self, id: NodeId, world: Point) -> Option<Point> {
        self.transforms.client_point(self.transform_of(id)?, world)
    }

    /// World position of the node's origin.
    pub fn actual_position(&self, id: NodeId) -> Option<Point> {
        self.transforms.actual_position(self.transform_of(id)?)
    }

    /// Scale composed along the parent chain.
    pub fn actual_scale(&self, id: NodeId) -> Option<Vec2> {
        self.transforms.actual_scale(self.transform_of(id)?)
    }

    /// Rotation (degrees) composed along the parent chain.
    pub fn actual_rotation(&self, id: NodeId) -> Option<f64> {
        self.transforms.actual_rotation(self.transform_of(id)?)
    }

    /// Whether a world point falls inside `[0, size)` of the node.
    ///
    /// A node with a singular transform is never hit.
    pub fn hit_test(&self, id: NodeId, world: Point) -> bool {
        let Some(size) = self.size(id) else {
            return false;
        };
        self.client_point(id, world)
            .is_some_and(|p| p.x >= 0.0 && p.y >= 0.0 && p.x < size.width && p.y < size.height)
    }

    /// Animate the position to `target`.
    ///
    /// If the node is already there (within the position epsilon), `on_complete`
    /// runs immediately and nothing is animated. A zero `duration_ms` jumps to
    /// `target` and runs `on_complete` before returning.
    pub fn move_to(
        &mut self,
        id: NodeId,
        target: Vec2,
        duration_ms: u64,
        on_complete: Option<Completion>,
    ) {
        let Some(current) = self.position(id) else {
            tracing::warn!(?id, op = "move_to", "ignoring call on stale node");
            return;
        };
        if !self.config.epsilons.position_changed(current, target) {
            if let Some(done) = on_complete {
                done();
            }
            return;
        }
        self.start_animation(id, Motion::Position(target - current), duration_ms, on_complete);
    }

    /// Animate the rotation to `degrees` along the shorter way round.
    pub fn rotate_to(
        &mut self,
        id: NodeId,
        degrees: f64,
        duration_ms: u64,
        on_complete: Option<Completion>,
    ) {
        self.rotate_to_with(id, degrees, true, duration_ms, on_complete);
    }

    /// Animate the rotation to `degrees`.
    ///
    /// The difference is taken modulo 360. With `normalize`, it is then folded
    /// into `[-180, 180]`.
    pub fn rotate_to_with(
        &mut self,
        id: NodeId,
        degrees: f64,
        normalize: bool,
        duration_ms: u64,
        on_complete: Option<Completion>,
    ) {
        let Some(current) = self.rotation(id) else {
            tracing::warn!(?id, op = "rotate_to", "ignoring call on stale node");
            return;
        };
        let mut delta = (degrees - current) % 360.0;
        if normalize {
            if delta > 180.0 {
                delta -= 360.0;
            } else if delta < -180.0 {
                delta += 360.0;
            }
        }
        if !self.config.epsilons.angle_changed(0.0, delta) {
            if let Some(done) = on_complete {
                done();
            }
            return;
        }
        self.start_animation(id, Motion::Rotation(delta), duration_ms, on_complete);
    }

    /// Animate the scale to `target`.
    pub fn scale_to(
        &mut self,
        id: NodeId,
        target: Vec2,
        duration_ms: u64,
        on_complete: Option<Completion>,
    ) {
        let Some(current) = self.scale(id) else {
            tracing::warn!(?id, op = "scale_to", "ignoring call on stale node");
            return;
        };
        if !self.config.epsilons.scale_changed(current, target) {
            if let Some(done) = on_complete {
                done();
            }
            return;
        }
        self.start_animation(id, Motion::Scale(target - current), duration_ms, on_complete);
    }

    /// Whether an animation of `kind` runs on the node.
    pub fn is_animating(&self, id: NodeId, kind: AnimationKind) -> bool {
        self.node(id)
            .and_then(|n| n.animator.as_ref())
            .is_some_and(|a| a.is_running(kind))
    }

    fn start_animation(
        &mut self,
        id: NodeId,
        motion: Motion,
        duration_ms: u64,
        on_complete: Option<Completion>,
    ) {
        if duration_ms == 0 {
            if let Some(animator) = self.node_mut(id).and_then(|n| n.animator.as_mut()) {
                animator.cancel(motion.kind());
            }
            self.apply_motion(id, motion);
            if let Some(done) = on_complete {
                done();
            }
            return;
        }
        let (now_ms, easing) = (self.now_ms, self.config.easing);
        if let Some(node) = self.node_mut(id) {
            node.animator
                .get_or_insert_with(Animator::new)
                .start(motion, now_ms, duration_ms, easing, on_complete);
        }
    }

    fn apply_motion(&mut self, id: NodeId, motion: Motion) {
        let Some(tf) = self.transform_of(id) else {
            return;
        };
        let Some(t) = self.transforms.get(tf) else {
            return;
        };
        let (position, rotation, scale) = (t.position(), t.rotation(), t.scale());
        match motion {
            Motion::Position(d) => self.transforms.set_position(tf, position + d),
            Motion::Rotation(d) => self.transforms.set_rotation(tf, rotation + d),
            Motion::Scale(d) => self.transforms.set_scale(tf, scale + d),
        }
    }
}
