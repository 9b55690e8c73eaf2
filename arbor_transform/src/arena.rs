// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generational storage for transforms and the lazy bake.

use alloc::vec::Vec;

use kurbo::{Affine, Point, Vec2};

use crate::epsilon::Epsilons;
use crate::transform::AffineTransform;

/// Identifier for a transform in a [`TransformArena`] (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TransformId(u32, u32);

impl TransformId {
    const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    transform: AffineTransform,
    /// transforms whose parent link points here
    children: Vec<TransformId>,
}

/// Owns a set of transforms and resolves their parent links.
///
/// Reading a matrix never takes `&mut self`: the cache lives in a
/// [`Cell`](core::cell::Cell), so the arena is meant to be used from a single thread.
///
/// ## Example
///
/// ```rust
/// use arbor_transform::{AffineTransform, TransformArena};
/// use kurbo::{Point, Vec2};
///
/// let mut arena = TransformArena::new();
/// let root = arena.insert(AffineTransform::from_position(Vec2::new(10.0, 0.0), 0.0, 2.0));
/// let child = arena.insert(AffineTransform::from_position(Vec2::new(1.0, 1.0), 0.0, 1.0));
/// arena.set_parent(child, Some(root));
///
/// let world = arena.screen_point(child, Point::ZERO).unwrap();
/// assert!((world.x - 12.0).abs() < 1e-9 && (world.y - 2.0).abs() < 1e-9);
/// ```
#[derive(Clone, Debug, Default)]
pub struct TransformArena {
    slots: Vec<Option<Slot>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    epsilons: Epsilons,
}

impl TransformArena {
    /// Create an empty arena with [`Epsilons::DEFAULT`].
    pub fn new() -> Self {
        Self::with_epsilons(Epsilons::DEFAULT)
    }

    /// Create an empty arena with custom change thresholds.
    pub fn with_epsilons(epsilons: Epsilons) -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            epsilons,
        }
    }

    /// Thresholds used by the setters.
    pub fn epsilons(&self) -> Epsilons {
        self.epsilons
    }

    /// Store a transform and return its identifier.
    pub fn insert(&mut self, transform: AffineTransform) -> TransformId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.slots[idx] = Some(Slot {
                generation,
                transform,
                children: Vec::new(),
            });
            (idx, generation)
        } else {
            self.slots.push(Some(Slot {
                generation: 1,
                transform,
                children: Vec::new(),
            }));
            self.generations.push(1);
            (self.slots.len() - 1, 1)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "TransformId stores 32-bit slot indices."
        )]
        let idx = idx as u32;
        TransformId::new(idx, generation)
    }

    /// Drop a transform.
    ///
    /// Transforms that used it as their parent are detached and marked dirty, so a
    /// child never reads a freed parent.
    pub fn remove(&mut self, id: TransformId) -> Option<AffineTransform> {
        if !self.is_alive(id) {
            return None;
        }
        let slot = self.slots[id.idx()].take()?;
        self.free_list.push(id.idx());
        if let Some(parent) = slot.transform.parent
            && let Some(p) = self.slot_mut(parent)
        {
            p.children.retain(|&c| c != id);
        }
        for child in slot.children {
            if let Some(t) = self.get_mut(child) {
                t.parent = None;
                t.mark_dirty();
            }
        }
        Some(slot.transform)
    }

    /// Returns true if `id` refers to a live transform.
    pub fn is_alive(&self, id: TransformId) -> bool {
        self.slots
            .get(id.idx())
            .and_then(|s| s.as_ref())
            .is_some_and(|s| s.generation == id.1)
    }

    /// Borrow a live transform.
    pub fn get(&self, id: TransformId) -> Option<&AffineTransform> {
        let slot = self.slots.get(id.idx())?.as_ref()?;
        (slot.generation == id.1).then_some(&slot.transform)
    }

    fn get_mut(&mut self, id: TransformId) -> Option<&mut AffineTransform> {
        self.slot_mut(id).map(|s| &mut s.transform)
    }

    fn slot_mut(&mut self, id: TransformId) -> Option<&mut Slot> {
        let slot = self.slots.get_mut(id.idx())?.as_mut()?;
        (slot.generation == id.1).then_some(slot)
    }

    /// Transforms whose parent is `id`, in the order they were attached.
    pub fn children(&self, id: TransformId) -> &[TransformId] {
        match self.slots.get(id.idx()).and_then(|s| s.as_ref()) {
            Some(slot) if slot.generation == id.1 => &slot.children,
            _ => &[],
        }
    }

    /// Set the local position.
    pub fn set_position(&mut self, id: TransformId, position: Vec2) {
        let eps = self.epsilons;
        if let Some(t) = self.get_mut(id) {
            let cache = t.cache.get();
            if !cache.local_dirty && eps.position_changed(cache.baked.position, position) {
                t.mark_dirty();
            }
            t.position = position;
        }
    }

    /// Set the local rotation in degrees.
    pub fn set_rotation(&mut self, id: TransformId, degrees: f64) {
        let eps = self.epsilons;
        if let Some(t) = self.get_mut(id) {
            let cache = t.cache.get();
            if !cache.local_dirty && eps.angle_changed(cache.baked.rotation, degrees) {
                t.mark_dirty();
            }
            t.rotation = degrees;
        }
    }

    /// Set the local scale.
    pub fn set_scale(&mut self, id: TransformId, scale: Vec2) {
        let eps = self.epsilons;
        if let Some(t) = self.get_mut(id) {
            let cache = t.cache.get();
            if !cache.local_dirty && eps.scale_changed(cache.baked.scale, scale) {
                t.mark_dirty();
            }
            t.scale = scale;
        }
    }

    /// Set or clear the parent link.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is `id` itself, or if `parent` is stale.
    pub fn set_parent(&mut self, id: TransformId, parent: Option<TransformId>) {
        assert_ne!(Some(id), parent, "a transform cannot be its own parent");
        if let Some(p) = parent {
            assert!(self.is_alive(p), "parent transform {p:?} is stale");
        }
        let Some(old) = self.get(id).map(AffineTransform::parent) else {
            return;
        };
        if old == parent {
            return;
        }
        if let Some(old) = old
            && let Some(slot) = self.slot_mut(old)
        {
            slot.children.retain(|&c| c != id);
        }
        if let Some(p) = parent
            && let Some(slot) = self.slot_mut(p)
        {
            slot.children.push(id);
        }
        if let Some(t) = self.get_mut(id) {
            t.parent = parent;
            t.mark_dirty();
        }
    }

    /// Whether the cached matrix of `id` must be rebuilt before use.
    ///
    /// True if the transform itself changed, or any ancestor changed or was rebaked
    /// since this transform last baked. Stale ids report `false`.
    pub fn is_stale(&self, id: TransformId) -> bool {
        self.get(id).is_some_and(|t| self.stale(t))
    }

    fn stale(&self, t: &AffineTransform) -> bool {
        let cache = t.cache.get();
        if cache.local_dirty {
            return true;
        }
        match t.parent.and_then(|p| self.get(p)) {
            Some(parent) => self.stale(parent) || parent.version() != cache.parent_version_seen,
            None => false,
        }
    }

    /// Bake count of `id`.
    pub fn version(&self, id: TransformId) -> Option<u64> {
        self.get(id).map(AffineTransform::version)
    }

    /// Local → world matrix, baking `id` and its ancestors if needed.
    pub fn matrix(&self, id: TransformId) -> Option<Affine> {
        self.get(id).map(|t| self.bake(t))
    }

    fn bake(&self, t: &AffineTransform) -> Affine {
        if !self.stale(t) {
            return t.cache.get().matrix;
        }
        let local = t.local_matrix();
        let (matrix, parent_version) = match t.parent.and_then(|p| self.get(p)) {
            // Read the parent's version only after it had the chance to rebake.
            Some(parent) => {
                let parent_matrix = self.bake(parent);
                (parent_matrix * local, parent.version())
            }
            None => (local, 0),
        };
        let mut cache = t.cache.get();
        cache.matrix = matrix;
        cache.local_dirty = false;
        cache.inverse_dirty = true;
        cache.version += 1;
        cache.parent_version_seen = parent_version;
        cache.baked = t.components();
        t.cache.set(cache);
        tracing::trace!(version = cache.version, "baked transform");
        matrix
    }

    /// World → local matrix.
    ///
    /// Returns `None` for stale ids and for singular transforms (for example a
    /// zero scale), which have no inverse.
    pub fn inverse(&self, id: TransformId) -> Option<Affine> {
        let t = self.get(id)?;
        let matrix = self.bake(t);
        let mut cache = t.cache.get();
        if cache.inverse_dirty {
            let det = matrix.determinant();
            let inverse = matrix.inverse();
            cache.inverse = (det != 0.0 && inverse.is_finite()).then_some(inverse);
            cache.inverse_dirty = false;
            t.cache.set(cache);
            tracing::trace!(singular = cache.inverse.is_none(), "inverted transform");
        }
        cache.inverse
    }

    /// Map a point from the local space of `id` to world space.
    pub fn screen_point(&self, id: TransformId, local: Point) -> Option<Point> {
        self.matrix(id).map(|m| m * local)
    }

    /// Map a world-space point into the local space of `id`.
    ///
    /// Returns `None` if the transform is singular.
    pub fn client_point(&self, id: TransformId, world: Point) -> Option<Point> {
        self.inverse(id).map(|m| m * world)
    }

    /// World position of the local origin.
    pub fn actual_position(&self, id: TransformId) -> Option<Point> {
        self.matrix(id).map(|m| m.translation().to_point())
    }

    /// Product of the scales along the parent chain, without baking.
    pub fn actual_scale(&self, id: TransformId) -> Option<Vec2> {
        let t = self.get(id)?;
        let parent = t
            .parent
            .and_then(|p| self.actual_scale(p))
            .unwrap_or(Vec2::new(1.0, 1.0));
        Some(Vec2::new(parent.x * t.scale.x, parent.y * t.scale.y))
    }

    /// Sum of the rotations (degrees) along the parent chain, without baking.
    pub fn actual_rotation(&self, id: TransformId) -> Option<f64> {
        let t = self.get(id)?;
        let parent = t.parent.and_then(|p| self.actual_rotation(p)).unwrap_or(0.0);
        Some(parent + t.rotation)
    }
}
