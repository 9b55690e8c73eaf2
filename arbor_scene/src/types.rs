// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene: node identifiers, flags, and container kinds.

/// Identifier for a node in a [`Scene`](crate::Scene) (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Per-node state flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node was removed and will be pruned by its container's next update.
        const REMOVING  = 0b0000_0001;
        /// Node is drawn and receives pointer events.
        const VISIBLE   = 0b0000_0010;
        /// Node reacts to input.
        const ENABLED   = 0b0000_0100;
        /// Child set changed since the last [`Scene::take_changes`](crate::Scene::take_changes).
        const CHANGED   = 0b0000_1000;
        /// Node takes part in its container's focus ring.
        const FOCUSABLE = 0b0001_0000;
        /// Node currently has focus.
        const FOCUSED   = 0b0010_0000;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::ENABLED | Self::CHANGED
    }
}

bitflags::bitflags! {
    /// Window behavior flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct WindowFlags: u16 {
        /// Covers the whole surface. A window without this flag is modal.
        const FULLSCREEN   = 0x01;
        /// Presents a close button.
        const CLOSE_BUTTON = 0x02;
        /// Presents a help button.
        const HELP_BUTTON  = 0x04;
        /// Presents an application-defined button.
        const MISC_BUTTON  = 0x08;
        /// Routes input to its children. Set on construction; without it the window
        /// swallows input.
        const CONTROLLING  = 0x10;
        /// Host animates opening and closing itself.
        const CUSTOM_ANIM  = 0x20;
        /// Host dims everything below the window.
        const BLACKOUT     = 0x40;
        /// Left/Right move focus between children, Select/Enter presses the focused one.
        const FOCUSABLE    = 0x80;
    }
}

impl WindowFlags {
    /// Whether a window with these flags is modal.
    #[inline]
    pub fn is_modal(self) -> bool {
        !self.contains(Self::FULLSCREEN)
    }
}

/// What makes a node a container.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ContainerKind {
    /// Top-level or modal window. Input is routed only while
    /// [`WindowFlags::CONTROLLING`] is set.
    Window(WindowFlags),
    /// Lightweight grouping. Input is routed only while the panel is enabled.
    Panel,
}

/// Order in which a container offers pointer and key events to its children.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DispatchOrder {
    /// Highest z first, so the child drawn on top sees the event first.
    #[default]
    TopmostFirst,
    /// Same order as update and draw (lowest z first).
    PaintOrder,
}
