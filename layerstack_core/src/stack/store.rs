// Copyright 2026 the Layerstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slot-based forest storage with id lookup, topology, and property management.

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;
use understory_dirty::{CycleHandling, DirtyTracker};

use super::id::{Collection, INVALID, NodeId};
use super::traverse::{Children, NodeRef};
use crate::dirty;
use crate::error::{InvalidMove, StackError};

/// Metadata carried by leaf layers.
///
/// The stack never interprets these values; they are handed back unchanged
/// to whoever renders or persists the layer.
#[derive(Clone, Debug, PartialEq)]
pub struct LeafMeta {
    /// Reference to the data source the layer was created from.
    pub source: Option<String>,
    /// Layer opacity in `0.0..=1.0`.
    pub opacity: f32,
    /// Explicit z-index requested by the source, if any.
    pub z_index: Option<i32>,
    /// Bounding box of the layer's data in map units.
    pub extent: Option<Rect>,
}

impl Default for LeafMeta {
    fn default() -> Self {
        Self {
            source: None,
            opacity: 1.0,
            z_index: None,
            extent: None,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) enum Body {
    Leaf(LeafMeta),
    Group(Vec<u32>),
}

#[derive(Clone, Debug)]
pub(crate) struct Slot {
    pub(crate) id: NodeId,
    pub(crate) name: String,
    pub(crate) visible: bool,
    pub(crate) parent: u32,
    pub(crate) body: Body,
}

#[derive(Clone, Debug)]
enum NewKind {
    Leaf(LeafMeta),
    Group,
}

/// A node waiting to be registered with [`StackStore::insert_at`].
///
/// Leaves come from layer factories outside this crate. Groups are normally
/// created by [`StackStore::add_group`]; [`NewNode::group`] exists so that
/// persisted stacks can be restored with their original ids.
#[derive(Clone, Debug)]
pub struct NewNode {
    id: NodeId,
    name: String,
    visible: bool,
    kind: NewKind,
}

impl NewNode {
    /// A visible leaf with default metadata.
    #[must_use]
    pub fn leaf(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            visible: true,
            kind: NewKind::Leaf(LeafMeta::default()),
        }
    }

    /// A visible, empty group.
    #[must_use]
    pub fn group(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            visible: true,
            kind: NewKind::Group,
        }
    }

    /// Sets the leaf metadata. Ignored for groups.
    #[must_use]
    pub fn with_meta(mut self, meta: LeafMeta) -> Self {
        if let NewKind::Leaf(m) = &mut self.kind {
            *m = meta;
        }
        self
    }

    /// Sets the initial visibility.
    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// The id the node will be registered under.
    #[must_use]
    pub fn id(&self) -> &NodeId {
        &self.id
    }
}

/// Resolved owner of a collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Owner {
    Root,
    Group(u32),
}

/// Canonical storage for the render stack.
///
/// Nodes live in slots addressed by `u32` indices; a [`NodeId`] index maps the
/// public ids onto slots. The root collection and every group's child list
/// hold slot indices in render order (index 0 is drawn first, at the bottom).
/// Freed slots are recycled via a free list.
#[derive(Debug)]
pub struct StackStore {
    // -- Storage --
    pub(crate) slots: Vec<Option<Slot>>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) roots: Vec<u32>,
    pub(crate) index: BTreeMap<NodeId, u32>,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,
    pub(crate) root_dirty: bool,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<NodeId>,
    pub(crate) pending_removed: Vec<NodeId>,

    // -- Id generation --
    pub(crate) next_serial: u64,
}

impl Default for StackStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StackStore {
    /// Creates an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            roots: Vec::new(),
            index: BTreeMap::new(),
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            root_dirty: false,
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
            next_serial: 0,
        }
    }

    /// Returns the number of nodes in the forest.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns whether the forest has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns whether a node with this id exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    // -- Collection API --

    /// Registers `node` at `index` in `collection`.
    ///
    /// Fails with [`StackError::OutOfRange`] if `index` is past the end of the
    /// collection; callers clamp. Nothing is modified on failure.
    pub fn insert_at(
        &mut self,
        collection: &Collection,
        index: usize,
        node: NewNode,
    ) -> Result<(), StackError> {
        let owner = self.resolve(collection)?;
        if self.index.contains_key(node.id.as_str()) {
            return Err(StackError::DuplicateId(node.id));
        }
        let len = self.members(owner).len();
        if index > len {
            return Err(StackError::OutOfRange { index, len });
        }
        let idx = self.alloc(node);
        self.attach(owner, index, idx);
        Ok(())
    }

    /// Registers `node` on top of `collection`.
    pub fn push(&mut self, collection: &Collection, node: NewNode) -> Result<(), StackError> {
        let len = self.collection_len(collection)?;
        self.insert_at(collection, len, node)
    }

    /// Removes `id` (and its subtree) if it is a direct member of
    /// `collection`.
    ///
    /// Returns the number of nodes removed; 0 means nothing was there and
    /// nothing changed.
    pub fn remove_from(&mut self, collection: &Collection, id: &str) -> usize {
        let Ok(owner) = self.resolve(collection) else {
            return 0;
        };
        match self.slot_of(id) {
            Some(idx) if self.owner_of_slot(idx) == owner => {
                self.detach(idx);
                self.destroy_subtree(idx)
            }
            _ => 0,
        }
    }

    /// Removes `id` (and its subtree) from whichever collection owns it.
    ///
    /// Returns the number of nodes removed; 0 if the id is unknown.
    pub fn remove(&mut self, id: &str) -> usize {
        let Some(idx) = self.slot_of(id) else {
            return 0;
        };
        self.detach(idx);
        self.destroy_subtree(idx)
    }

    /// Moves `id` out of `from` and into `to` at `index`.
    ///
    /// `index` is interpreted after the removal, so for a move inside a single
    /// collection the largest valid index is `len - 1`. All preconditions are
    /// checked before the node is detached.
    pub fn move_within_or_across(
        &mut self,
        from: &Collection,
        to: &Collection,
        id: &str,
        index: usize,
    ) -> Result<(), StackError> {
        let idx = self
            .slot_of(id)
            .ok_or_else(|| StackError::NotFound(NodeId::from(id)))?;
        let from_owner = self.resolve(from)?;
        let to_owner = self.resolve(to)?;
        if self.owner_of_slot(idx) != from_owner {
            return Err(StackError::invalid_move(id, InvalidMove::NotInSource));
        }
        if let Owner::Group(g) = to_owner {
            if g == idx {
                return Err(StackError::invalid_move(id, InvalidMove::OntoSelf));
            }
            if self.is_ancestor_slot(idx, g) {
                return Err(StackError::invalid_move(id, InvalidMove::IntoDescendant));
            }
        }
        let len = self.members(to_owner).len() - usize::from(from_owner == to_owner);
        if index > len {
            return Err(StackError::OutOfRange { index, len });
        }

        self.detach(idx);
        self.attach(to_owner, index, idx);
        Ok(())
    }

    /// Returns the length of a collection.
    pub fn collection_len(&self, collection: &Collection) -> Result<usize, StackError> {
        let owner = self.resolve(collection)?;
        Ok(self.members(owner).len())
    }

    /// Returns the ids of a collection's direct members in render order.
    pub fn collection_ids(&self, collection: &Collection) -> Result<Vec<NodeId>, StackError> {
        Ok(self.children(collection)?.map(|n| n.id().clone()).collect())
    }

    /// Iterates the root collection, bottom first.
    #[must_use]
    pub fn root(&self) -> Children<'_> {
        Children::new(self, &self.roots)
    }

    /// Iterates a collection's direct members, bottom first.
    pub fn children(&self, collection: &Collection) -> Result<Children<'_>, StackError> {
        let owner = self.resolve(collection)?;
        Ok(Children::new(self, self.members(owner)))
    }

    // -- Property API --

    /// Returns a view of the node with this id.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<NodeRef<'_>> {
        self.slot_of(id).map(|idx| NodeRef::new(self, idx))
    }

    /// Sets a single node's `visible` flag without touching descendants.
    pub fn set_visible(&mut self, id: &str, visible: bool) -> Result<(), StackError> {
        let idx = self
            .slot_of(id)
            .ok_or_else(|| StackError::NotFound(NodeId::from(id)))?;
        self.set_visible_slot(idx, visible);
        Ok(())
    }

    /// Sets a node's display name.
    pub fn rename(&mut self, id: &str, name: impl Into<String>) -> Result<(), StackError> {
        let idx = self
            .slot_of(id)
            .ok_or_else(|| StackError::NotFound(NodeId::from(id)))?;
        self.slot_mut(idx).name = name.into();
        self.dirty.mark(idx, dirty::NAME);
        Ok(())
    }

    /// Returns the extent of a node: the leaf's own extent, or the union of
    /// every leaf extent below a group.
    ///
    /// `None` when the node is unknown or nothing below it has an extent.
    #[must_use]
    pub fn extent(&self, id: &str) -> Option<Rect> {
        let node = self.node(id)?;
        if let Some(meta) = node.leaf_meta() {
            return meta.extent;
        }
        self.descendants(id)
            .filter_map(|n| n.leaf_meta().and_then(|m| m.extent))
            .reduce(|acc, r| acc.union(r))
    }

    // -- Internal helpers --

    pub(crate) fn slot_of(&self, id: &str) -> Option<u32> {
        self.index.get(id).copied()
    }

    /// Panics if the slot is free.
    pub(crate) fn slot(&self, idx: u32) -> &Slot {
        match self.slots.get(idx as usize) {
            Some(Some(slot)) => slot,
            _ => panic!("dangling slot index {idx}"),
        }
    }

    pub(crate) fn slot_mut(&mut self, idx: u32) -> &mut Slot {
        match self.slots.get_mut(idx as usize) {
            Some(Some(slot)) => slot,
            _ => panic!("dangling slot index {idx}"),
        }
    }

    pub(crate) fn resolve(&self, collection: &Collection) -> Result<Owner, StackError> {
        match collection {
            Collection::Root => Ok(Owner::Root),
            Collection::Group(id) => {
                let idx = self
                    .slot_of(id.as_str())
                    .ok_or_else(|| StackError::NotFound(id.clone()))?;
                match self.slot(idx).body {
                    Body::Group(_) => Ok(Owner::Group(idx)),
                    Body::Leaf(_) => Err(StackError::NotAGroup(id.clone())),
                }
            }
        }
    }

    pub(crate) fn owner_of_slot(&self, idx: u32) -> Owner {
        match self.slot(idx).parent {
            INVALID => Owner::Root,
            p => Owner::Group(p),
        }
    }

    pub(crate) fn collection_of(&self, owner: Owner) -> Collection {
        match owner {
            Owner::Root => Collection::Root,
            Owner::Group(g) => Collection::Group(self.slot(g).id.clone()),
        }
    }

    pub(crate) fn members(&self, owner: Owner) -> &[u32] {
        match owner {
            Owner::Root => &self.roots,
            Owner::Group(g) => match &self.slot(g).body {
                Body::Group(children) => children,
                Body::Leaf(_) => panic!("slot {g} is a leaf"),
            },
        }
    }

    fn members_mut(&mut self, owner: Owner) -> &mut Vec<u32> {
        match owner {
            Owner::Root => &mut self.roots,
            Owner::Group(g) => match &mut self.slot_mut(g).body {
                Body::Group(children) => children,
                Body::Leaf(_) => panic!("slot {g} is a leaf"),
            },
        }
    }

    /// Position of `idx` within its owning collection.
    pub(crate) fn position_of_slot(&self, idx: u32) -> usize {
        let owner = self.owner_of_slot(idx);
        match self.members(owner).iter().position(|&m| m == idx) {
            Some(pos) => pos,
            None => panic!("slot {idx} missing from its owning collection"),
        }
    }

    /// Returns whether `ancestor` lies strictly above `node`.
    pub(crate) fn is_ancestor_slot(&self, ancestor: u32, node: u32) -> bool {
        let mut p = self.slot(node).parent;
        while p != INVALID {
            if p == ancestor {
                return true;
            }
            p = self.slot(p).parent;
        }
        false
    }

    pub(crate) fn set_visible_slot(&mut self, idx: u32, visible: bool) {
        let slot = self.slot_mut(idx);
        if slot.visible != visible {
            slot.visible = visible;
            self.dirty.mark(idx, dirty::VISIBILITY);
        }
    }

    /// Allocates a fresh id of the form `grp-XXXXXXXX` that is not in use.
    pub(crate) fn next_group_id(&mut self) -> NodeId {
        loop {
            self.next_serial += 1;
            let id = format!("grp-{:08x}", self.next_serial);
            if !self.index.contains_key(id.as_str()) {
                return NodeId::from(id);
            }
        }
    }

    fn alloc(&mut self, node: NewNode) -> u32 {
        let body = match node.kind {
            NewKind::Leaf(meta) => Body::Leaf(meta),
            NewKind::Group => Body::Group(Vec::new()),
        };
        let slot = Slot {
            id: node.id.clone(),
            name: node.name,
            visible: node.visible,
            parent: INVALID,
            body,
        };
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            self.slots[idx as usize] = Some(slot);
            idx
        } else {
            let idx = u32::try_from(self.slots.len())
                .ok()
                .filter(|&idx| idx != INVALID)
                .unwrap_or_else(|| panic!("stack store is full"));
            self.slots.push(Some(slot));
            idx
        };
        self.index.insert(node.id.clone(), idx);
        self.pending_added.push(node.id);
        idx
    }

    fn attach(&mut self, owner: Owner, index: usize, idx: u32) {
        self.members_mut(owner).insert(index, idx);
        self.slot_mut(idx).parent = match owner {
            Owner::Root => INVALID,
            Owner::Group(g) => g,
        };
        self.mark_topology(owner);
    }

    /// Unlinks `idx` from its owning collection, leaving the slot alive.
    fn detach(&mut self, idx: u32) {
        let owner = self.owner_of_slot(idx);
        let pos = self.position_of_slot(idx);
        self.members_mut(owner).remove(pos);
        self.slot_mut(idx).parent = INVALID;
        self.mark_topology(owner);
    }

    /// Frees `idx` and every slot below it. Returns the number freed.
    fn destroy_subtree(&mut self, idx: u32) -> usize {
        let mut pending = alloc::vec![idx];
        let mut freed = 0;
        while let Some(i) = pending.pop() {
            let Some(slot) = self.slots[i as usize].take() else {
                continue;
            };
            if let Body::Group(children) = &slot.body {
                pending.extend(children.iter().copied());
            }
            self.index.remove(slot.id.as_str());
            self.dirty.remove_key(i);
            self.free_list.push(i);
            self.pending_removed.push(slot.id);
            freed += 1;
        }
        freed
    }

    fn mark_topology(&mut self, owner: Owner) {
        match owner {
            Owner::Root => self.root_dirty = true,
            Owner::Group(g) => self.dirty.mark(g, dirty::TOPOLOGY),
        }
    }
}
