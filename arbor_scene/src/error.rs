// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural errors.

use crate::types::NodeId;

/// Result alias for structural scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// A structural call was rejected.
///
/// These are programmer errors: the tree is left untouched and the caller is
/// expected to propagate them. Everyday absence (nothing hit, nothing focusable,
/// event not consumed) is reported as `bool` or `Option` instead.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneError {
    /// The id does not refer to a live node.
    #[error("node {0:?} is not alive")]
    StaleNode(NodeId),

    /// The node exists but cannot hold children.
    #[error("node {0:?} is not a container")]
    NotAContainer(NodeId),

    /// Linking `child` under `parent` would make a node its own ancestor.
    #[error("moving {child:?} under {parent:?} would create a cycle")]
    CycleDetected {
        /// Node being moved.
        child: NodeId,
        /// Requested new parent.
        parent: NodeId,
    },
}
