// Copyright 2026 the Layerstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for stack mutations.
//!
//! Every fallible operation validates its inputs before touching the store,
//! so an `Err` always means the forest is exactly as it was before the call.

use crate::stack::NodeId;

/// Why a move was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum InvalidMove {
    /// The drop target is the dragged node itself.
    #[error("drop target is the dragged node")]
    OntoSelf,
    /// The drop target lies inside the dragged node's subtree.
    #[error("drop target is a descendant of the dragged node")]
    IntoDescendant,
    /// An `Inside` drop targeted a leaf.
    #[error("drop target is not a group")]
    TargetNotGroup,
    /// The node is not a direct member of the stated source collection.
    #[error("node is not in the source collection")]
    NotInSource,
}

/// Errors reported by [`StackStore`](crate::stack::StackStore) operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StackError {
    /// The referenced id does not exist in the forest.
    #[error("node `{0}` not found")]
    NotFound(NodeId),
    /// The move would break the forest invariants.
    #[error("cannot move `{drag}`: {reason}")]
    InvalidMove {
        /// The node that was being moved.
        drag: NodeId,
        /// What was wrong with the move.
        reason: InvalidMove,
    },
    /// An insert index past the end of the collection.
    #[error("index {index} out of range for collection of length {len}")]
    OutOfRange {
        /// The requested index.
        index: usize,
        /// The collection length the index was checked against.
        len: usize,
    },
    /// Another node already uses this id.
    #[error("node id `{0}` is already in use")]
    DuplicateId(NodeId),
    /// A group collection was requested for a leaf.
    #[error("node `{0}` is not a group")]
    NotAGroup(NodeId),
}

impl StackError {
    pub(crate) fn invalid_move(drag: &str, reason: InvalidMove) -> Self {
        Self::InvalidMove {
            drag: NodeId::from(drag),
            reason,
        }
    }
}
