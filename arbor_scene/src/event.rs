// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input events delivered to the scene.
//!
//! Positions are in world (surface) space. Nodes convert them to their own space
//! with [`Scene::client_point`](crate::Scene::client_point).

use kurbo::Point;

/// Logical keys the scene and its widgets react to.
///
/// Printable input arrives as [`Key::Letter`] with the character attached, pasted
/// text as [`Key::Paste`] one character at a time.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Application menu.
    Menu,
    /// Back / Escape. Closes modal windows.
    Back,
    /// Left arrow. Moves focus backward in focusable windows.
    Left,
    /// Right arrow. Moves focus forward in focusable windows.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Gamepad or remote select.
    Select,
    /// Enter / Return.
    Enter,
    /// Tab.
    Tab,
    /// Backspace.
    Backspace,
    /// Forward delete.
    Delete,
    /// A printable character, see [`KeyEvent::character`].
    Letter,
    /// A pasted character, see [`KeyEvent::character`].
    Paste,
    /// Shift modifier.
    Shift,
    /// Control modifier.
    Control,
}

/// Phase of a pointer contact.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    /// Contact started (button pressed).
    Down,
    /// Contact moved, or the pointer hovers.
    Move,
    /// Contact ended (button released).
    Up,
}

/// A pointer event.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TouchEvent {
    /// World-space position.
    pub position: Point,
    /// Phase of the contact.
    pub phase: TouchPhase,
    /// Platform pointer identifier.
    pub pointer: u32,
}

impl TouchEvent {
    /// Create a touch event for pointer `0`.
    pub fn new(position: Point, phase: TouchPhase) -> Self {
        Self {
            position,
            phase,
            pointer: 0,
        }
    }

    /// Press at `position`.
    pub fn down(position: Point) -> Self {
        Self::new(position, TouchPhase::Down)
    }

    /// Release at `position`.
    pub fn up(position: Point) -> Self {
        Self::new(position, TouchPhase::Up)
    }

    /// Move or hover at `position`.
    pub fn moved(position: Point) -> Self {
        Self::new(position, TouchPhase::Move)
    }

    /// Set the pointer identifier.
    pub fn with_pointer(mut self, pointer: u32) -> Self {
        self.pointer = pointer;
        self
    }
}

/// A wheel or pinch event.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ZoomEvent {
    /// World-space focus of the zoom.
    pub position: Point,
    /// Zoom amount. Positive zooms in.
    pub delta: f64,
}

impl ZoomEvent {
    /// Create a zoom event.
    pub fn new(position: Point, delta: f64) -> Self {
        Self { position, delta }
    }
}

/// A key press or release.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    /// Logical key.
    pub key: Key,
    /// `true` on release.
    pub up: bool,
    /// Character for [`Key::Letter`] and [`Key::Paste`].
    pub character: Option<char>,
}

impl KeyEvent {
    /// Key pressed.
    pub fn down(key: Key) -> Self {
        Self {
            key,
            up: false,
            character: None,
        }
    }

    /// Key released.
    pub fn up(key: Key) -> Self {
        Self {
            key,
            up: true,
            character: None,
        }
    }

    /// Printable character typed.
    pub fn character(c: char) -> Self {
        Self {
            key: Key::Letter,
            up: false,
            character: Some(c),
        }
    }

    /// Character pasted.
    pub fn paste(c: char) -> Self {
        Self {
            key: Key::Paste,
            up: false,
            character: Some(c),
        }
    }

    /// Whether this is a release of `key`.
    #[inline]
    pub fn is_release_of(&self, key: Key) -> bool {
        self.up && self.key == key
    }
}
