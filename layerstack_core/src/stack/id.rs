// Copyright 2026 the Layerstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node and collection identity types.

use alloc::string::String;
use core::borrow::Borrow;
use core::fmt;

/// Sentinel value indicating "no parent" (a member of the root collection).
pub(crate) const INVALID: u32 = u32::MAX;

/// Opaque, stable identifier of a node in a [`StackStore`](super::StackStore).
///
/// Ids are unique across the whole forest and never change for the lifetime
/// of a node.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(String);

impl NodeId {
    /// Wraps a string as a node id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.into())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({:?})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which variant a node is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A terminal layer. Never owns children.
    Leaf,
    /// A group owning an ordered child collection.
    Group,
}

/// An ordered collection of nodes: either the root of the stack or the child
/// list of a group.
///
/// Index 0 of every collection is the bottom of the render stack.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Collection {
    /// The top-level collection owned by the map.
    Root,
    /// The child collection of the given group.
    Group(NodeId),
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str("<root>"),
            Self::Group(id) => write!(f, "{id}"),
        }
    }
}
