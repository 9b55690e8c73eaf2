// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus state, focus rings and activation.

use arbor_focus::{FocusEntry, FocusRing, Navigation};
use smallvec::SmallVec;

use crate::scene::Scene;
use crate::types::{NodeFlags, NodeId};

impl<S: 'static> Scene<S> {
    /// The focused node of the whole scene, if any.
    pub fn focused(&self) -> Option<NodeId> {
        self.focus.current()
    }

    /// Whether the node has focus.
    pub fn is_focused(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|n| n.is(NodeFlags::FOCUSED))
    }

    /// Whether the node takes part in its container's focus ring.
    pub fn is_focusable(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|n| n.is(NodeFlags::FOCUSABLE))
    }

    /// Add the node to, or take it out of, its container's focus ring.
    pub fn set_focusable(&mut self, id: NodeId, focusable: bool) {
        if let Some(node) = self.node_mut_or_warn(id, "set_focusable") {
            node.flags.set(NodeFlags::FOCUSABLE, focusable);
        }
    }

    /// Focus or blur a node. Returns whether its focus state changed.
    ///
    /// Focus is exclusive across the scene: focusing a node first blurs the node
    /// that held focus before. [`Behavior::focus_changed`](crate::Behavior::focus_changed)
    /// runs for every node whose state changes.
    pub fn set_focused(&mut self, id: NodeId, focused: bool) -> bool {
        let Some(node) = self.node_mut_or_warn(id, "set_focused") else {
            return false;
        };
        if node.is(NodeFlags::FOCUSED) == focused {
            return false;
        }
        if focused {
            if let Some(previous) = self.focus.focus(id) {
                self.set_focused(previous, false);
            }
        } else {
            self.focus.blur(id);
        }
        if let Some(node) = self.node_mut(id) {
            node.flags.set(NodeFlags::FOCUSED, focused);
        }
        self.with_behavior(id, |b, cx| b.focus_changed(cx, focused));
        true
    }

    /// Focus-capable children of a container in display order.
    fn focus_entries(&self, container: NodeId) -> SmallVec<[FocusEntry<NodeId>; 8]> {
        let Ok(c) = self.container_of(container) else {
            return SmallVec::new();
        };
        c.children
            .paint_order()
            .filter_map(|child| {
                let node = self.node(child)?;
                (node.is(NodeFlags::FOCUSABLE) && !node.is(NodeFlags::REMOVING))
                    .then(|| FocusEntry::new(child, node.is(NodeFlags::FOCUSED)))
            })
            .collect()
    }

    /// Move focus one step around the container's focus ring.
    ///
    /// With nothing focused, forward picks the first focus-capable child and
    /// backward the last one. The old focus is cleared before the new one is set.
    /// Returns whether a child was focused.
    pub fn focus_next(&mut self, container: NodeId, forward: bool) -> bool {
        let entries = self.focus_entries(container);
        let ring = FocusRing::new(self.config.focus_wrap);
        let Some(change) = ring.step(&entries, Navigation::from_forward(forward)) else {
            return false;
        };
        for id in change.blur {
            self.set_focused(id, false);
        }
        self.set_focused(change.focus, true);
        true
    }

    /// Press the first focused child of a container.
    ///
    /// Returns whether one was found.
    pub fn activate_focused(&mut self, container: NodeId) -> bool {
        let entries = self.focus_entries(container);
        let Some(target) = FocusRing::focused(&entries) else {
            return false;
        };
        tracing::debug!(?container, ?target, "activating focused child");
        self.with_behavior(target, |b, cx| b.press(cx));
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::event::{Key, KeyEvent};
    use crate::scene::{Element, Scene};
    use crate::test_util::{Log, Probe};
    use crate::types::{NodeId, WindowFlags};
    use crate::SceneConfig;
    use arbor_focus::WrapMode;

    fn ring(scene: &mut Scene, log: &Log, flags: WindowFlags) -> (NodeId, [NodeId; 3]) {
        let window = scene.insert(None, Element::window(flags)).unwrap();
        let names = ["a", "b", "c"];
        let children = names.map(|name| {
            scene
                .insert(
                    Some(window),
                    Element::leaf()
                        .focusable()
                        .with_behavior(Probe::new(name, log)),
                )
                .unwrap()
        });
        (window, children)
    }

    fn focused_children(scene: &Scene, children: &[NodeId]) -> Vec<NodeId> {
        children
            .iter()
            .copied()
            .filter(|&c| scene.is_focused(c))
            .collect()
    }

    #[test]
    fn forward_walk_wraps_around() {
        let mut scene: Scene = Scene::new();
        let log = Log::default();
        let (window, [a, _b, c]) = ring(&mut scene, &log, WindowFlags::FULLSCREEN);

        assert!(scene.focus_next(window, true));
        assert_eq!(scene.focused(), Some(a));
        scene.focus_next(window, true);
        scene.focus_next(window, true);
        assert_eq!(scene.focused(), Some(c));
        scene.focus_next(window, true);
        assert_eq!(scene.focused(), Some(a));
        assert_eq!(focused_children(&scene, &scene.children(window)), [a]);
    }

    #[test]
    fn forward_then_backward_restores_focus() {
        let mut scene: Scene = Scene::new();
        let log = Log::default();
        let (window, [_a, b, _c]) = ring(&mut scene, &log, WindowFlags::FULLSCREEN);
        scene.set_focused(b, true);

        scene.focus_next(window, true);
        scene.focus_next(window, false);
        assert_eq!(scene.focused(), Some(b));
        assert_eq!(focused_children(&scene, &scene.children(window)), [b]);
    }

    #[test]
    fn backward_from_nothing_picks_last_and_empty_ring_fails() {
        let mut scene: Scene = Scene::new();
        let log = Log::default();
        let (window, [_, _, c]) = ring(&mut scene, &log, WindowFlags::FULLSCREEN);
        assert!(scene.focus_next(window, false));
        assert_eq!(scene.focused(), Some(c));

        let empty = scene
            .insert(None, Element::window(WindowFlags::FULLSCREEN))
            .unwrap();
        scene.insert(Some(empty), Element::leaf()).unwrap();
        assert!(!scene.focus_next(empty, true));
    }

    #[test]
    fn old_focus_is_cleared_before_new_focus_is_set() {
        let mut scene: Scene = Scene::new();
        let log = Log::default();
        let (window, [a, _b, _c]) = ring(&mut scene, &log, WindowFlags::FULLSCREEN);
        scene.set_focused(a, true);
        log.clear();

        scene.focus_next(window, true);
        assert_eq!(log.entries(), ["a.blur", "b.focus"]);
    }

    #[test]
    fn focus_is_exclusive_across_containers() {
        let mut scene: Scene = Scene::new();
        let log = Log::default();
        let (_, [a, _, _]) = ring(&mut scene, &log, WindowFlags::FULLSCREEN);
        let (other, [x, _, _]) = ring(&mut scene, &log, WindowFlags::FULLSCREEN);
        scene.set_focused(a, true);

        scene.focus_next(other, true);
        assert_eq!(scene.focused(), Some(x));
        assert!(!scene.is_focused(a));
        assert!(!scene.set_focused(x, true), "already focused");
    }

    #[test]
    fn no_wrap_config_stops_at_the_end() {
        let config = SceneConfig::default().with_focus_wrap(WrapMode::Never);
        let mut scene: Scene = Scene::with_config(config);
        let log = Log::default();
        let (window, [_, _, c]) = ring(&mut scene, &log, WindowFlags::FULLSCREEN);
        scene.set_focused(c, true);
        assert!(!scene.focus_next(window, true));
        assert_eq!(scene.focused(), Some(c));
    }

    #[test]
    fn focusable_window_keys_move_and_press() {
        let mut scene: Scene = Scene::new();
        let log = Log::default();
        let flags = WindowFlags::FULLSCREEN | WindowFlags::FOCUSABLE;
        let (window, [a, b, _]) = ring(&mut scene, &log, flags);

        assert!(!scene.key(window, &KeyEvent::down(Key::Right)), "acts on release");
        assert!(scene.key(window, &KeyEvent::up(Key::Right)));
        assert_eq!(scene.focused(), Some(a));
        assert!(scene.key(window, &KeyEvent::up(Key::Right)));
        assert_eq!(scene.focused(), Some(b));
        assert!(scene.key(window, &KeyEvent::up(Key::Left)));
        assert_eq!(scene.focused(), Some(a));

        log.clear();
        assert!(scene.key(window, &KeyEvent::up(Key::Enter)));
        assert!(scene.key(window, &KeyEvent::up(Key::Select)));
        assert_eq!(log.count("a.press"), 2);
        assert_eq!(log.count("b.press"), 0);
    }

    #[test]
    fn plain_window_ignores_focus_keys() {
        let mut scene: Scene = Scene::new();
        let log = Log::default();
        let (window, _) = ring(&mut scene, &log, WindowFlags::FULLSCREEN);
        assert!(!scene.key(window, &KeyEvent::up(Key::Right)));
        assert_eq!(scene.focused(), None);
        assert!(!scene.activate_focused(window));
    }

    #[test]
    fn pruning_a_focused_node_releases_focus() {
        let mut scene: Scene = Scene::new();
        let log = Log::default();
        let (window, [a, _, _]) = ring(&mut scene, &log, WindowFlags::FULLSCREEN);
        scene.set_focused(a, true);
        scene.remove(a);
        scene.update(window, 0);
        assert_eq!(scene.focused(), None);

        // Removed entries drop out of the ring.
        assert!(scene.focus_next(window, true));
        assert_ne!(scene.focused(), Some(a));
    }
}
