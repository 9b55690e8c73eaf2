// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Z-ordered child collection.

use smallvec::SmallVec;

use crate::types::{DispatchOrder, NodeId};

/// Children of a container, sorted by effective z (ascending, stable).
///
/// Entries with equal z keep insertion order, so later siblings paint on top.
#[derive(Clone, Debug, Default)]
pub(crate) struct ChildList {
    entries: SmallVec<[(i32, NodeId); 8]>,
}

impl ChildList {
    /// Largest effective z, or `0` when empty.
    pub(crate) fn maximum_z_index(&self) -> i32 {
        self.entries.last().map_or(0, |&(z, _)| z)
    }

    /// Insert `id` at effective z `z`, after existing entries with the same z.
    pub(crate) fn insert(&mut self, id: NodeId, z: i32) {
        let at = self.entries.partition_point(|&(other, _)| other <= z);
        self.entries.insert(at, (z, id));
    }

    /// Remove `id`. Returns whether it was present.
    pub(crate) fn remove(&mut self, id: NodeId) -> bool {
        match self.entries.iter().position(|&(_, c)| c == id) {
            Some(at) => {
                self.entries.remove(at);
                true
            }
            None => false,
        }
    }

    /// Move `id` to effective z `z`, as if it were inserted last at that z.
    pub(crate) fn restack(&mut self, id: NodeId, z: i32) {
        if self.remove(id) {
            self.insert(id, z);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Children in paint order (lowest z first).
    pub(crate) fn paint_order(&self) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self.entries.iter().map(|&(_, id)| id)
    }

    /// Snapshot of the children in the given dispatch order.
    ///
    /// Handlers may add or remove siblings while the snapshot is walked.
    pub(crate) fn snapshot(&self, order: DispatchOrder) -> SmallVec<[NodeId; 8]> {
        match order {
            DispatchOrder::PaintOrder => self.paint_order().collect(),
            DispatchOrder::TopmostFirst => self.paint_order().rev().collect(),
        }
    }
}
