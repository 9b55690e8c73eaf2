// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Scene: a retained-mode scene graph with consume-or-bubble input dispatch.
//!
//! A [`Scene`] owns a tree of nodes. Each node has a transform (position, rotation in
//! degrees, scale) relative to its parent, a size used for hit testing, state
//! [`NodeFlags`], and optional application logic in the form of a [`Behavior`].
//! Containers, either a window or a panel (see [`ContainerKind`]), hold children
//! sorted by z-index.
//!
//! ## Frame loop
//!
//! Once per frame the host calls [`Scene::update`] on its root, then
//! [`Scene::draw`]. Update runs animations and behaviors in paint order and prunes
//! children removed since the last frame. Draw hands every visible node to its
//! behavior together with its world transform.
//!
//! ## Input
//!
//! [`Scene::touch`], [`Scene::zoom`] and [`Scene::key`] deliver events from a node
//! down its subtree. Containers offer events to their children topmost first; the
//! first handler that returns `true` consumes the event. Unconsumed events bubble back
//! up, where windows apply their fallbacks: Back closes a modal window, and in a
//! focusable window Left/Right walk the focus ring while Select/Enter press the
//! focused child.
//!
//! ## Focus
//!
//! Each container's focus-capable children form a ring, walked by
//! [`Scene::focus_next`]. Focus is exclusive across the scene and tracked by an
//! [`arbor_focus::FocusManager`] owned by the scene.
//!
//! ## Example
//!
//! ```rust
//! use arbor_scene::{Behavior, Element, EventCx, Key, KeyEvent, Scene, WindowFlags};
//!
//! struct Button;
//!
//! impl Behavior<()> for Button {
//!     fn press(&mut self, cx: &mut EventCx<'_, ()>) {
//!         cx.remove();
//!     }
//! }
//!
//! let mut scene: Scene = Scene::new();
//! let window = scene
//!     .insert(None, Element::window(WindowFlags::FULLSCREEN | WindowFlags::FOCUSABLE))
//!     .unwrap();
//! let ok = scene
//!     .insert(Some(window), Element::leaf().focusable().with_behavior(Button))
//!     .unwrap();
//!
//! // Right focuses the only button, Enter presses it.
//! assert!(scene.key(window, &KeyEvent::up(Key::Right)));
//! assert_eq!(scene.focused(), Some(ok));
//! assert!(scene.key(window, &KeyEvent::up(Key::Enter)));
//!
//! // The button removed itself; the next frame prunes it.
//! scene.update(window, 16);
//! assert!(!scene.is_alive(ok));
//! assert_eq!(scene.focused(), None);
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events and never installs a subscriber: `trace` for
//! transform bakes, `debug` for removal, pruning, focus moves and rejected calls,
//! `warn` for stale ids passed to mutating calls.

mod anim;
mod behavior;
mod children;
mod config;
mod dispatch;
mod error;
mod event;
mod focus;
mod scene;
mod search;
mod types;

pub mod widgets;

#[cfg(test)]
mod test_util;

pub use anim::{AnimationFrame, AnimationKind, Animator, Completion, Easing, Motion};
pub use behavior::{Behavior, EventCx, NodeView};
pub use config::SceneConfig;
pub use error::{SceneError, SceneResult};
pub use event::{Key, KeyEvent, TouchEvent, TouchPhase, ZoomEvent};
pub use scene::{Element, Scene};
pub use types::{ContainerKind, DispatchOrder, NodeFlags, NodeId, WindowFlags};
