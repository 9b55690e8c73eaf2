// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Consume-or-bubble input dispatch.
//!
//! Every input event follows the same path through a node:
//!
//! 1. Base handling: the touch observer, if the node is enabled.
//! 2. Container gate: a window that is not controlling, or a panel that is
//!    disabled, swallows the event.
//! 3. Children, in dispatch order, until one consumes. Pointer events only reach
//!    visible children under the pointer; key events reach every visible child.
//! 4. The node's own behavior, if the node is enabled.
//! 5. Window fallback for key releases: Back closes a modal window, Left/Right move
//!    focus and Select/Enter press the focused child of a focusable window. This
//!    runs for disabled windows too.
//!
//! Each stage stops the walk as soon as something consumes the event.

use crate::behavior::{Behavior, EventCx};
use crate::event::{Key, KeyEvent, TouchEvent, ZoomEvent};
use crate::scene::Scene;
use crate::types::{ContainerKind, NodeFlags, NodeId, WindowFlags};

#[derive(Copy, Clone, Debug)]
enum Input<'a> {
    Touch(&'a TouchEvent),
    Zoom(&'a ZoomEvent),
    Key(&'a KeyEvent),
}

impl Input<'_> {
    fn deliver<S: 'static>(self, behavior: &mut dyn Behavior<S>, cx: &mut EventCx<'_, S>) -> bool {
        match self {
            Self::Touch(e) => behavior.touch(cx, e),
            Self::Zoom(e) => behavior.zoom(cx, e),
            Self::Key(e) => behavior.key(cx, e),
        }
    }

    fn position(self) -> Option<kurbo::Point> {
        match self {
            Self::Touch(e) => Some(e.position),
            Self::Zoom(e) => Some(e.position),
            Self::Key(_) => None,
        }
    }
}

enum Gate {
    Leaf,
    Open,
    Swallow,
}

impl<S: 'static> Scene<S> {
    /// Deliver a pointer event to `id` and, through it, to its subtree.
    ///
    /// `id` itself is not hit tested. Returns whether the event was consumed.
    pub fn touch(&mut self, id: NodeId, event: &TouchEvent) -> bool {
        let Some(node) = self.node_mut_or_warn(id, "touch") else {
            return false;
        };
        if node.is(NodeFlags::ENABLED)
            && let Some(mut observer) = node.on_touch.take()
        {
            let consumed = observer(event);
            if let Some(node) = self.node_mut(id)
                && node.on_touch.is_none()
            {
                node.on_touch = Some(observer);
            }
            if consumed {
                return true;
            }
        }
        self.route(id, Input::Touch(event))
    }

    /// Deliver a wheel or pinch event to `id` and its subtree.
    pub fn zoom(&mut self, id: NodeId, event: &ZoomEvent) -> bool {
        if self.node_mut_or_warn(id, "zoom").is_none() {
            return false;
        }
        self.route(id, Input::Zoom(event))
    }

    /// Deliver a key event to `id` and its subtree.
    pub fn key(&mut self, id: NodeId, event: &KeyEvent) -> bool {
        if self.node_mut_or_warn(id, "key").is_none() {
            return false;
        }
        self.route(id, Input::Key(event))
    }

    fn dispatch(&mut self, id: NodeId, input: Input<'_>) -> bool {
        match input {
            Input::Touch(e) => self.touch(id, e),
            Input::Zoom(e) => self.zoom(id, e),
            Input::Key(e) => self.key(id, e),
        }
    }

    fn route(&mut self, id: NodeId, input: Input<'_>) -> bool {
        match self.gate(id) {
            Gate::Leaf => {}
            Gate::Swallow => return true,
            Gate::Open => {
                if self.offer_children(id, input) {
                    return true;
                }
            }
        }
        if self.is_enabled(id)
            && self
                .with_behavior(id, |b, cx| input.deliver(b, cx))
                .unwrap_or(false)
        {
            return true;
        }
        match input {
            Input::Key(event) => self.window_key_fallback(id, event),
            _ => false,
        }
    }

    fn gate(&self, id: NodeId) -> Gate {
        match self.container_kind(id) {
            None => Gate::Leaf,
            Some(ContainerKind::Window(flags)) if flags.contains(WindowFlags::CONTROLLING) => {
                Gate::Open
            }
            Some(ContainerKind::Panel) if self.is_enabled(id) => Gate::Open,
            Some(_) => Gate::Swallow,
        }
    }

    fn offer_children(&mut self, id: NodeId, input: Input<'_>) -> bool {
        let Some(order) = self.dispatch_order(id) else {
            return false;
        };
        let children = match self.container_of(id) {
            Ok(c) => c.children.snapshot(order),
            Err(_) => return false,
        };
        for child in children {
            if self.accepts(child, input) && self.dispatch(child, input) {
                return true;
            }
        }
        false
    }

    /// Whether `child` should be offered `input` by its container.
    fn accepts(&self, child: NodeId, input: Input<'_>) -> bool {
        let Some(node) = self.node(child) else {
            return false;
        };
        if !node.is(NodeFlags::VISIBLE) || node.is(NodeFlags::REMOVING) {
            return false;
        }
        match input.position() {
            // Zero-size containers only group their children.
            Some(_) if node.container.is_some() && node.size.is_zero_area() => true,
            Some(world) => self.hit_test(child, world),
            None => true,
        }
    }

    fn window_key_fallback(&mut self, id: NodeId, event: &KeyEvent) -> bool {
        let Some(flags) = self.window_flags(id) else {
            return false;
        };
        if !event.up {
            return false;
        }
        if flags.is_modal() && event.key == Key::Back {
            tracing::debug!(?id, "closing modal window on Back");
            self.remove(id);
            return true;
        }
        if flags.contains(WindowFlags::FOCUSABLE) {
            match event.key {
                Key::Left => return self.focus_next(id, false),
                Key::Right => return self.focus_next(id, true),
                Key::Select | Key::Enter => return self.activate_focused(id),
                _ => {}
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Element;
    use crate::test_util::{Log, Probe};
    use kurbo::{Point, Size, Vec2};
    use std::cell::Cell;
    use std::rc::Rc;

    const SCREEN: Size = Size::new(100.0, 100.0);

    fn full_window(scene: &mut Scene, log: &Log) -> NodeId {
        scene
            .insert(
                None,
                Element::window(WindowFlags::FULLSCREEN)
                    .with_size(SCREEN)
                    .with_behavior(Probe::new("window", log)),
            )
            .unwrap()
    }

    fn square(name: &'static str, log: &Log, at: Vec2, z: i32) -> Element {
        Element::leaf()
            .with_position(at)
            .with_size(Size::new(10.0, 10.0))
            .with_z_index(z)
            .with_behavior(Probe::new(name, log))
    }

    #[test]
    fn topmost_consumer_stops_the_walk() {
        let mut scene: Scene = Scene::new();
        let log = Log::default();
        let root = full_window(&mut scene, &log);
        let bottom = square("bottom", &log, Vec2::ZERO, 1)
            .with_behavior(Probe::new("bottom", &log).consuming());
        scene.insert(Some(root), bottom).unwrap();
        let top = square("top", &log, Vec2::ZERO, 2)
            .with_behavior(Probe::new("top", &log).consuming());
        scene.insert(Some(root), top).unwrap();

        assert!(scene.touch(root, &TouchEvent::down(Point::new(5.0, 5.0))));
        assert_eq!(log.entries(), ["top.touch"]);
    }

    #[test]
    fn unconsumed_events_bubble_to_the_container() {
        let mut scene: Scene = Scene::new();
        let log = Log::default();
        let root = full_window(&mut scene, &log);
        scene
            .insert(Some(root), square("bottom", &log, Vec2::ZERO, 1))
            .unwrap();
        scene
            .insert(Some(root), square("top", &log, Vec2::ZERO, 2))
            .unwrap();

        assert!(!scene.touch(root, &TouchEvent::down(Point::new(5.0, 5.0))));
        assert_eq!(log.entries(), ["top.touch", "bottom.touch", "window.touch"]);
    }

    #[test]
    fn pointer_misses_and_hidden_children_are_skipped() {
        let mut scene: Scene = Scene::new();
        let log = Log::default();
        let root = full_window(&mut scene, &log);
        scene
            .insert(Some(root), square("far", &log, Vec2::new(50.0, 50.0), 1))
            .unwrap();
        scene
            .insert(Some(root), square("hidden", &log, Vec2::ZERO, 2).hidden())
            .unwrap();

        scene.zoom(root, &ZoomEvent::new(Point::new(5.0, 5.0), 1.0));
        assert_eq!(log.entries(), ["window.zoom"]);
    }

    #[test]
    fn zero_size_panels_pass_pointer_events_through() {
        let mut scene: Scene = Scene::new();
        let log = Log::default();
        let root = full_window(&mut scene, &log);
        let group = scene
            .insert(Some(root), Element::panel().with_position(Vec2::new(20.0, 20.0)))
            .unwrap();
        let inner = square("inner", &log, Vec2::ZERO, 0)
            .with_behavior(Probe::new("inner", &log).consuming());
        scene.insert(Some(group), inner).unwrap();

        assert!(scene.touch(root, &TouchEvent::down(Point::new(25.0, 25.0))));
        assert_eq!(log.entries(), ["inner.touch"]);
    }

    #[test]
    fn touch_observer_runs_first_and_only_when_enabled() {
        let mut scene: Scene = Scene::new();
        let log = Log::default();
        let root = full_window(&mut scene, &log);
        scene
            .insert(Some(root), square("child", &log, Vec2::ZERO, 0))
            .unwrap();
        let seen = Rc::new(Cell::new(0));
        let s = seen.clone();
        scene.set_on_touch(root, move |_| {
            s.set(s.get() + 1);
            true
        });

        assert!(scene.touch(root, &TouchEvent::down(Point::new(5.0, 5.0))));
        assert_eq!(seen.get(), 1);
        assert!(log.entries().is_empty());

        scene.set_enabled(root, false);
        scene.touch(root, &TouchEvent::down(Point::new(5.0, 5.0)));
        assert_eq!(seen.get(), 1);
        assert_eq!(log.entries(), ["child.touch"], "disabled windows still route");
    }

    #[test]
    fn non_controlling_window_swallows_input() {
        let mut scene: Scene = Scene::new();
        let log = Log::default();
        let root = full_window(&mut scene, &log);
        scene
            .insert(Some(root), square("child", &log, Vec2::ZERO, 0))
            .unwrap();
        scene.set_window_flags(root, WindowFlags::FULLSCREEN);

        assert!(scene.touch(root, &TouchEvent::down(Point::new(5.0, 5.0))));
        assert!(scene.key(root, &KeyEvent::up(Key::Enter)));
        assert!(log.entries().is_empty());
    }

    #[test]
    fn disabled_panel_swallows_and_disabled_leaf_declines() {
        let mut scene: Scene = Scene::new();
        let log = Log::default();
        let root = full_window(&mut scene, &log);
        let panel = scene
            .insert(Some(root), Element::panel().with_size(SCREEN).disabled().with_z_index(1))
            .unwrap();
        scene
            .insert(Some(panel), square("in_panel", &log, Vec2::ZERO, 0))
            .unwrap();
        assert!(scene.zoom(root, &ZoomEvent::new(Point::new(5.0, 5.0), -1.0)));
        assert!(log.entries().is_empty());

        scene.set_enabled(panel, true);
        let leaf = scene
            .insert(
                Some(panel),
                square("off", &log, Vec2::ZERO, 5)
                    .with_behavior(Probe::new("off", &log).consuming())
                    .disabled(),
            )
            .unwrap();
        assert!(!scene.is_enabled(leaf));
        assert!(!scene.zoom(root, &ZoomEvent::new(Point::new(5.0, 5.0), -1.0)));
        assert_eq!(log.entries(), ["in_panel.zoom", "window.zoom"]);
    }

    #[test]
    fn keys_reach_children_in_dispatch_order() {
        let mut scene: Scene = Scene::new();
        let log = Log::default();
        let root = full_window(&mut scene, &log);
        scene
            .insert(Some(root), square("a", &log, Vec2::new(80.0, 80.0), 1))
            .unwrap();
        let b = scene
            .insert(Some(root), square("b", &log, Vec2::ZERO, 2))
            .unwrap();
        let c = scene
            .insert(Some(root), square("c", &log, Vec2::ZERO, 3))
            .unwrap();
        scene.remove(c);

        scene.key(root, &KeyEvent::down(Key::Up));
        assert_eq!(log.entries(), ["b.key", "a.key", "window.key"]);

        log.clear();
        scene.set_dispatch_order(root, crate::DispatchOrder::PaintOrder);
        scene.key(root, &KeyEvent::down(Key::Up));
        assert_eq!(log.entries(), ["a.key", "b.key", "window.key"]);
        assert!(scene.is_alive(b));
    }

    #[test]
    fn back_release_closes_modal_windows_only() {
        let mut scene: Scene = Scene::new();
        let log = Log::default();
        let root = full_window(&mut scene, &log);
        let modal = scene
            .insert(Some(root), Element::window(WindowFlags::CLOSE_BUTTON).with_size(SCREEN))
            .unwrap();

        assert!(!scene.key(modal, &KeyEvent::down(Key::Back)));
        assert!(!scene.is_removing(modal));
        assert!(scene.key(root, &KeyEvent::up(Key::Back)));
        assert!(scene.is_removing(modal));

        // The fullscreen root ignores Back.
        assert!(!scene.key(root, &KeyEvent::up(Key::Back)));
        assert!(!scene.is_removing(root));
        scene.update(root, 0);
        assert!(!scene.is_alive(modal));
    }

    #[test]
    fn disabled_windows_keep_their_key_fallback() {
        let mut scene: Scene = Scene::new();
        let log = Log::default();
        let root = full_window(&mut scene, &log);
        let modal = scene
            .insert(
                Some(root),
                Element::window(WindowFlags::CLOSE_BUTTON)
                    .with_size(SCREEN)
                    .with_behavior(Probe::new("modal", &log).consuming()),
            )
            .unwrap();
        scene.set_enabled(modal, false);

        assert!(scene.key(modal, &KeyEvent::up(Key::Back)));
        assert!(scene.is_removing(modal));
        assert_eq!(log.count("modal.key"), 0, "disabled behaviors get no input");

        let flags = scene.window_flags(root).unwrap() | WindowFlags::FOCUSABLE;
        scene.set_window_flags(root, flags);
        let a = scene
            .insert(Some(root), square("a", &log, Vec2::ZERO, 1).focusable())
            .unwrap();
        scene.set_enabled(root, false);
        assert!(scene.key(root, &KeyEvent::up(Key::Right)));
        assert!(scene.is_focused(a));
    }

    #[test]
    fn consuming_child_skips_the_window_fallback() {
        let mut scene: Scene = Scene::new();
        let log = Log::default();
        let root = full_window(&mut scene, &log);
        let modal = scene
            .insert(Some(root), Element::window(WindowFlags::CLOSE_BUTTON).with_size(SCREEN))
            .unwrap();
        let swallower = square("swallower", &log, Vec2::ZERO, 1)
            .with_behavior(Probe::new("swallower", &log).consuming());
        scene.insert(Some(modal), swallower).unwrap();

        assert!(scene.key(modal, &KeyEvent::up(Key::Back)));
        assert!(!scene.is_removing(modal));
        assert_eq!(log.count("swallower.key"), 1);

        let menu = scene
            .insert(
                Some(root),
                Element::window(WindowFlags::FULLSCREEN | WindowFlags::FOCUSABLE)
                    .with_size(SCREEN),
            )
            .unwrap();
        let first = scene
            .insert(
                Some(menu),
                square("first", &log, Vec2::ZERO, 1)
                    .with_behavior(Probe::new("first", &log).consuming())
                    .focusable(),
            )
            .unwrap();
        let second = scene
            .insert(Some(menu), square("second", &log, Vec2::ZERO, 2).focusable())
            .unwrap();
        scene.set_focused(first, true);
        log.clear();

        for key in [Key::Right, Key::Left, Key::Right] {
            assert!(scene.key(menu, &KeyEvent::up(key)));
        }
        assert!(scene.is_focused(first));
        assert!(!scene.is_focused(second));
        assert_eq!(log.count("first.key"), 3);
        assert_eq!(log.count("second.key"), 3);
        assert_eq!(log.count("first.blur"), 0);
        assert_eq!(log.count("second.focus"), 0);
    }

    #[test]
    fn stale_targets_are_not_consumed() {
        let mut scene: Scene = Scene::new();
        let node = scene.insert(None, Element::leaf()).unwrap();
        scene.remove(node);
        scene.update(node, 0);
        assert!(!scene.touch(node, &TouchEvent::down(Point::ZERO)));
        assert!(!scene.key(node, &KeyEvent::down(Key::Enter)));
    }
}
