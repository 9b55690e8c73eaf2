// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Focus: focus navigation primitives.
//!
//! This crate models keyboard and gamepad focus as two small pieces:
//! - A [`FocusRing`]: the circular order of focus-capable siblings inside one
//!   container. Given the current per-entry focus state and a [`Navigation`] intent, it
//!   computes a [`FocusChange`]: which entries to blur and which one to focus.
//! - A [`FocusManager`]: the single "currently focused" registry of a scene. Focusing a
//!   node through it reports the previously focused node so the caller can blur it,
//!   which keeps focus exclusive across containers.
//!
//! Neither piece mutates widgets. The host applies the change, clearing the old
//! focus before setting the new one.
//!
//! ## Minimal example
//!
//! ```rust
//! use arbor_focus::{FocusEntry, FocusRing, Navigation};
//!
//! let mut entries = [
//!     FocusEntry::new(1_u32, false),
//!     FocusEntry::new(2_u32, false),
//!     FocusEntry::new(3_u32, false),
//! ];
//! let ring = FocusRing::default();
//!
//! // Nothing is focused: moving forward picks the first entry.
//! let change = ring.step(&entries, Navigation::Next).unwrap();
//! assert_eq!(change.focus, 1);
//! assert!(change.blur.is_empty());
//!
//! // From the last entry, moving forward wraps around.
//! entries[2].focused = true;
//! let change = ring.step(&entries, Navigation::Next).unwrap();
//! assert_eq!(change.focus, 1);
//! assert_eq!(change.blur.as_slice(), &[3]);
//! ```
//!
//! The types are generic over the node identifier `K`, so callers can use any small,
//! copyable handle.
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `tracing`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use smallvec::SmallVec;

/// Direction of focus navigation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Navigation {
    /// Move to the next candidate in display order (for example, Tab or Right).
    Next,
    /// Move to the previous candidate in display order (for example, Left).
    Prev,
}

impl Navigation {
    /// `Next` when `forward` is true, `Prev` otherwise.
    #[inline]
    pub fn from_forward(forward: bool) -> Self {
        if forward { Self::Next } else { Self::Prev }
    }
}

/// Wrap mode for focus traversal.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WrapMode {
    /// Reaching either end of the ring yields no candidate.
    Never,
    /// Past the last entry comes the first, and the other way around.
    #[default]
    Wrap,
}

/// One focus-capable candidate, in display order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FocusEntry<K> {
    /// Identifier for the candidate.
    pub id: K,
    /// Whether the candidate currently reports focus.
    pub focused: bool,
}

impl<K> FocusEntry<K> {
    /// Create an entry.
    pub fn new(id: K, focused: bool) -> Self {
        Self { id, focused }
    }
}

/// Result of a focus ring step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FocusChange<K> {
    /// Entries that report focus and must be cleared first, in display order.
    ///
    /// Normally at most one. Entries that were focused behind the ring's back are
    /// included so that after applying the change exactly one entry is focused.
    pub blur: SmallVec<[K; 2]>,
    /// Entry to focus once `blur` has been applied.
    pub focus: K,
}

/// Circular traversal over focus-capable siblings.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FocusRing {
    /// Behavior at either end of the ring.
    pub wrap: WrapMode,
}

impl FocusRing {
    /// Create a ring with the given wrap behavior.
    pub fn new(wrap: WrapMode) -> Self {
        Self { wrap }
    }

    /// Compute the next focus target.
    ///
    /// The origin is the first entry reporting focus. With no origin, `Next` selects
    /// the first entry and `Prev` the last one. Returns `None` if `entries` is empty,
    /// or if the origin sits at an edge and [`WrapMode::Never`] is set.
    pub fn step<K>(&self, entries: &[FocusEntry<K>], nav: Navigation) -> Option<FocusChange<K>>
    where
        K: Copy + Eq,
    {
        let last = entries.len().checked_sub(1)?;
        let origin = entries.iter().position(|e| e.focused);
        let target = match (origin, nav) {
            (None, Navigation::Next) => 0,
            (None, Navigation::Prev) => last,
            (Some(pos), Navigation::Next) if pos < last => pos + 1,
            (Some(pos), Navigation::Prev) if pos > 0 => pos - 1,
            (Some(_), _) if self.wrap == WrapMode::Never => return None,
            (Some(_), Navigation::Next) => 0,
            (Some(_), Navigation::Prev) => last,
        };
        let focus = entries[target].id;
        let blur = entries
            .iter()
            .filter(|e| e.focused && e.id != focus)
            .map(|e| e.id)
            .collect();
        Some(FocusChange { blur, focus })
    }

    /// First entry reporting focus, if any.
    pub fn focused<K>(entries: &[FocusEntry<K>]) -> Option<K>
    where
        K: Copy,
    {
        entries.iter().find(|e| e.focused).map(|e| e.id)
    }
}

/// Registry of the single focused node of a scene.
///
/// The manager only records identity; the host owns the per-node focus flag and
/// must blur the node returned by [`FocusManager::focus`].
#[derive(Clone, Debug)]
pub struct FocusManager<K> {
    focused: Option<K>,
}

impl<K> Default for FocusManager<K> {
    fn default() -> Self {
        Self { focused: None }
    }
}

impl<K> FocusManager<K>
where
    K: Copy + Eq + core::fmt::Debug,
{
    /// Create an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// The focused node, if any.
    pub fn current(&self) -> Option<K> {
        self.focused
    }

    /// Record `id` as focused.
    ///
    /// Returns the previously focused node if it was a different one.
    pub fn focus(&mut self, id: K) -> Option<K> {
        let previous = self.focused.replace(id);
        if previous == Some(id) {
            return None;
        }
        tracing::debug!(?id, ?previous, "focus moved");
        previous
    }

    /// Forget `id` if it is the focused node. Returns whether it was.
    pub fn blur(&mut self, id: K) -> bool {
        if self.focused == Some(id) {
            self.focused = None;
            tracing::debug!(?id, "focus released");
            true
        } else {
            false
        }
    }

    /// Forget the focused node, returning it.
    pub fn clear(&mut self) -> Option<K> {
        self.focused.take()
    }
}
