// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Local transform state and its baked cache.

use core::cell::Cell;

use kurbo::{Affine, Vec2};

use crate::arena::TransformId;

/// The three local components that make up a transform.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct Components {
    pub(crate) position: Vec2,
    pub(crate) rotation: f64,
    pub(crate) scale: Vec2,
}

/// Baked state. Kept in a [`Cell`] so reads through `&` can refresh it.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Cache {
    pub(crate) matrix: Affine,
    /// `None` when the forward matrix is singular.
    pub(crate) inverse: Option<Affine>,
    pub(crate) version: u64,
    pub(crate) parent_version_seen: u64,
    pub(crate) local_dirty: bool,
    pub(crate) inverse_dirty: bool,
    /// Components that produced `matrix`; epsilon checks compare against these.
    pub(crate) baked: Components,
}

/// Position, rotation and scale of one node, relative to an optional parent.
///
/// Rotation is in degrees around the Z axis. The composed matrix applies scale,
/// then rotation, then translation, and finally the parent's matrix.
///
/// Values of this type are stored in a [`TransformArena`](crate::TransformArena);
/// mutation goes through the arena so that change thresholds and parent links can
/// be checked.
#[derive(Clone, Debug)]
pub struct AffineTransform {
    pub(crate) position: Vec2,
    pub(crate) rotation: f64,
    pub(crate) scale: Vec2,
    pub(crate) parent: Option<TransformId>,
    pub(crate) cache: Cell<Cache>,
}

impl AffineTransform {
    /// Create a transform from explicit components.
    pub fn new(position: Vec2, rotation: f64, scale: Vec2) -> Self {
        let components = Components {
            position,
            rotation,
            scale,
        };
        Self {
            position,
            rotation,
            scale,
            parent: None,
            cache: Cell::new(Cache {
                matrix: Affine::IDENTITY,
                inverse: Some(Affine::IDENTITY),
                version: 0,
                parent_version_seen: 0,
                local_dirty: true,
                inverse_dirty: true,
                baked: components,
            }),
        }
    }

    /// Create a transform at `position` with a uniform `scale`.
    pub fn from_position(position: Vec2, rotation: f64, scale: f64) -> Self {
        Self::new(position, rotation, Vec2::new(scale, scale))
    }

    /// Local position.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Local rotation in degrees.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Local (possibly non-uniform) scale.
    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    /// Parent transform, if any.
    pub fn parent(&self) -> Option<TransformId> {
        self.parent
    }

    /// Number of bakes performed so far.
    pub fn version(&self) -> u64 {
        self.cache.get().version
    }

    /// Whether a local component or the parent link changed since the last bake.
    ///
    /// This does not look at the parent chain; see
    /// [`TransformArena::is_stale`](crate::TransformArena::is_stale).
    pub fn is_locally_dirty(&self) -> bool {
        self.cache.get().local_dirty
    }

    /// The local scale → rotate → translate matrix, without any parent.
    pub fn local_matrix(&self) -> Affine {
        Affine::translate(self.position)
            * Affine::rotate(self.rotation.to_radians())
            * Affine::scale_non_uniform(self.scale.x, self.scale.y)
    }

    pub(crate) fn components(&self) -> Components {
        Components {
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
        }
    }

    pub(crate) fn mark_dirty(&self) {
        let mut cache = self.cache.get();
        cache.local_dirty = true;
        self.cache.set(cache);
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::new(Vec2::ZERO, 0.0, Vec2::new(1.0, 1.0))
    }
}
