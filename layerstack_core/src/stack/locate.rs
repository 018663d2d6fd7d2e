// Copyright 2026 the Layerstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read-only lookups over the forest.

use alloc::vec::Vec;

use super::id::{Collection, NodeId};
use super::store::{Body, StackStore};
use super::traverse::{Descendants, NodeRef};

impl StackStore {
    /// Looks a node up by id anywhere in the forest.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<NodeRef<'_>> {
        self.node(id)
    }

    /// Returns the first node, in depth-first render order, matching
    /// `predicate`.
    pub fn find_by(&self, mut predicate: impl FnMut(NodeRef<'_>) -> bool) -> Option<NodeRef<'_>> {
        self.walk().find(|n| predicate(*n))
    }

    /// Returns every node, in depth-first render order, matching `predicate`.
    pub fn find_all_by(&self, mut predicate: impl FnMut(NodeRef<'_>) -> bool) -> Vec<NodeRef<'_>> {
        self.walk().filter(|n| predicate(*n)).collect()
    }

    /// Walks the whole forest depth-first, starting at the bottom of the
    /// root collection.
    #[must_use]
    pub fn walk(&self) -> Descendants<'_> {
        Descendants::new(self, &self.roots)
    }

    /// Walks everything strictly below `id`. Empty for leaves and unknown ids.
    #[must_use]
    pub fn descendants(&self, id: &str) -> Descendants<'_> {
        match self.slot_of(id).map(|idx| &self.slot(idx).body) {
            Some(Body::Group(children)) => Descendants::new(self, children),
            _ => Descendants::new(self, &[]),
        }
    }

    /// Returns the collection `id` is a direct member of.
    #[must_use]
    pub fn owning_collection(&self, id: &str) -> Option<Collection> {
        self.slot_of(id)
            .map(|idx| self.collection_of(self.owner_of_slot(idx)))
    }

    /// Returns the position of `id` within its owning collection.
    #[must_use]
    pub fn index_in_collection(&self, id: &str) -> Option<usize> {
        self.slot_of(id).map(|idx| self.position_of_slot(idx))
    }

    /// Returns whether `node` lies strictly inside the subtree of `ancestor`.
    ///
    /// A node is not its own descendant. Unknown ids yield `false`.
    #[must_use]
    pub fn is_descendant_of(&self, ancestor: &str, node: &str) -> bool {
        match (self.slot_of(ancestor), self.slot_of(node)) {
            (Some(a), Some(n)) => self.is_ancestor_slot(a, n),
            _ => false,
        }
    }

    /// Returns the ids of every group above `id`, nearest first.
    #[must_use]
    pub fn ancestors(&self, id: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.node(id).and_then(NodeRef::parent);
        while let Some(p) = current {
            out.push(p.id().clone());
            current = p.parent();
        }
        out
    }

    /// Returns the number of nodes in the subtree rooted at `id`, including
    /// `id` itself. 0 for unknown ids.
    #[must_use]
    pub fn subtree_len(&self, id: &str) -> usize {
        if self.contains(id) {
            1 + self.descendants(id).count()
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::stack::{NewNode, NodeKind};

    /// root: [base, g(x, h(y)), top]
    fn nested() -> StackStore {
        let mut store = StackStore::new();
        let g = Collection::Group(NodeId::from("g"));
        let h = Collection::Group(NodeId::from("h"));
        store.push(&Collection::Root, NewNode::leaf("base", "Base")).unwrap();
        store.push(&Collection::Root, NewNode::group("g", "G")).unwrap();
        store.push(&g, NewNode::leaf("x", "X")).unwrap();
        store.push(&g, NewNode::group("h", "H")).unwrap();
        store.push(&h, NewNode::leaf("y", "Y")).unwrap();
        store.push(&Collection::Root, NewNode::leaf("top", "Top")).unwrap();
        store
    }

    #[test]
    fn walk_is_preorder_render_order() {
        let store = nested();
        let order: Vec<_> = store.walk().map(|n| n.id().clone()).collect();
        assert_eq!(order, vec!["base", "g", "x", "h", "y", "top"]);
    }

    #[test]
    fn find_by_predicate() {
        let store = nested();
        let found = store.find_by(|n| n.name() == "Y").unwrap();
        assert_eq!(found.id(), "y");
        assert!(store.find_by(|n| n.name() == "nope").is_none());

        let groups: Vec<_> = store
            .find_all_by(|n| n.kind() == NodeKind::Group)
            .into_iter()
            .map(|n| n.id().clone())
            .collect();
        assert_eq!(groups, vec!["g", "h"]);
    }

    #[test]
    fn owning_collection_and_index() {
        let store = nested();
        assert_eq!(store.owning_collection("top"), Some(Collection::Root));
        assert_eq!(
            store.owning_collection("y"),
            Some(Collection::Group(NodeId::from("h")))
        );
        assert_eq!(store.owning_collection("missing"), None);
        assert_eq!(store.index_in_collection("top"), Some(2));
        assert_eq!(store.index_in_collection("h"), Some(1));
    }

    #[test]
    fn descendant_checks() {
        let store = nested();
        assert!(store.is_descendant_of("g", "y"));
        assert!(store.is_descendant_of("h", "y"));
        assert!(!store.is_descendant_of("y", "g"));
        assert!(!store.is_descendant_of("g", "g"));
        assert!(!store.is_descendant_of("g", "top"));
        assert!(!store.is_descendant_of("missing", "y"));
    }

    #[test]
    fn ancestors_nearest_first() {
        let store = nested();
        assert_eq!(store.ancestors("y"), vec!["h", "g"]);
        assert!(store.ancestors("top").is_empty());
    }

    #[test]
    fn descendants_and_subtree_len() {
        let store = nested();
        let below: Vec<_> = store.descendants("g").map(|n| n.id().clone()).collect();
        assert_eq!(below, vec!["x", "h", "y"]);
        assert_eq!(store.descendants("x").count(), 0);
        assert_eq!(store.subtree_len("g"), 4);
        assert_eq!(store.subtree_len("missing"), 0);
    }
}
