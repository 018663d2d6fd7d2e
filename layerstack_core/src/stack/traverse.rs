// Copyright 2026 the Layerstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Borrowed node views and tree traversal utilities.

use alloc::vec::Vec;
use core::fmt;

use super::id::{Collection, INVALID, NodeId, NodeKind};
use super::store::{Body, LeafMeta, Slot, StackStore};

/// A borrowed view of one node in a [`StackStore`].
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    store: &'a StackStore,
    idx: u32,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(store: &'a StackStore, idx: u32) -> Self {
        Self { store, idx }
    }

    pub(crate) fn slot_index(self) -> u32 {
        self.idx
    }

    fn slot(self) -> &'a Slot {
        self.store.slot(self.idx)
    }

    /// The node's id.
    #[must_use]
    pub fn id(self) -> &'a NodeId {
        &self.slot().id
    }

    /// The node's display name.
    #[must_use]
    pub fn name(self) -> &'a str {
        &self.slot().name
    }

    /// The node's own `visible` flag.
    #[must_use]
    pub fn is_visible(self) -> bool {
        self.slot().visible
    }

    /// Whether this is a leaf or a group.
    #[must_use]
    pub fn kind(self) -> NodeKind {
        match self.slot().body {
            Body::Leaf(_) => NodeKind::Leaf,
            Body::Group(_) => NodeKind::Group,
        }
    }

    /// Shorthand for `kind() == NodeKind::Group`.
    #[must_use]
    pub fn is_group(self) -> bool {
        self.kind() == NodeKind::Group
    }

    /// Leaf metadata, or `None` for groups.
    #[must_use]
    pub fn leaf_meta(self) -> Option<&'a LeafMeta> {
        match &self.slot().body {
            Body::Leaf(meta) => Some(meta),
            Body::Group(_) => None,
        }
    }

    /// Direct children in render order. Empty for leaves.
    #[must_use]
    pub fn children(self) -> Children<'a> {
        match &self.slot().body {
            Body::Group(children) => Children::new(self.store, children),
            Body::Leaf(_) => Children::new(self.store, &[]),
        }
    }

    /// The group directly owning this node, or `None` at the root.
    #[must_use]
    pub fn parent(self) -> Option<Self> {
        match self.slot().parent {
            INVALID => None,
            p => Some(Self::new(self.store, p)),
        }
    }

    /// The collection this node is a direct member of.
    #[must_use]
    pub fn collection(self) -> Collection {
        match self.parent() {
            None => Collection::Root,
            Some(p) => Collection::Group(p.id().clone()),
        }
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", self.id())
            .field("name", &self.name())
            .field("kind", &self.kind())
            .field("visible", &self.is_visible())
            .finish_non_exhaustive()
    }
}

/// An iterator over the direct members of a collection, bottom first.
///
/// Reverse it to walk the collection in tree-view order.
#[derive(Clone, Debug)]
pub struct Children<'a> {
    store: &'a StackStore,
    members: core::slice::Iter<'a, u32>,
}

impl<'a> Children<'a> {
    pub(crate) fn new(store: &'a StackStore, members: &'a [u32]) -> Self {
        Self {
            store,
            members: members.iter(),
        }
    }
}

impl<'a> Iterator for Children<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<NodeRef<'a>> {
        self.members.next().map(|&idx| NodeRef::new(self.store, idx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.members.size_hint()
    }
}

impl DoubleEndedIterator for Children<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.members
            .next_back()
            .map(|&idx| NodeRef::new(self.store, idx))
    }
}

impl ExactSizeIterator for Children<'_> {}

/// A depth-first, pre-order iterator in render order.
///
/// Created by [`StackStore::walk`] and [`StackStore::descendants`].
#[derive(Clone, Debug)]
pub struct Descendants<'a> {
    store: &'a StackStore,
    pending: Vec<u32>,
}

impl<'a> Descendants<'a> {
    /// Starts a walk over `start` and everything below it.
    pub(crate) fn new(store: &'a StackStore, start: &[u32]) -> Self {
        Self {
            store,
            pending: start.iter().rev().copied().collect(),
        }
    }
}

impl<'a> Iterator for Descendants<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<NodeRef<'a>> {
        let idx = self.pending.pop()?;
        if let Body::Group(children) = &self.store.slot(idx).body {
            self.pending.extend(children.iter().rev().copied());
        }
        Some(NodeRef::new(self.store, idx))
    }
}
