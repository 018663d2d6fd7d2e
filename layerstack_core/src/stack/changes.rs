// Copyright 2026 the Layerstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change collection for presenters.
//!
//! Every mutation marks a dirty channel (see [`dirty`](crate::dirty)).
//! [`StackStore::take_changes`] drains all channels at once:
//!
//! 1. **VISIBILITY**: nodes whose own flag flipped.
//! 2. **NAME**: renamed nodes.
//! 3. **TOPOLOGY**: groups whose child collection changed, plus the root
//!    flag, surfaced as [`Collection`]s.
//! 4. Lifecycle lists of added and removed ids, in order of occurrence.
//!
//! Slots freed since the marks were made are skipped, so every id in
//! `visibility`, `renamed`, and `reordered` refers to a live node.

use alloc::vec::Vec;

use super::id::{Collection, NodeId};
use super::store::{Body, StackStore};
use crate::dirty;

/// The set of changes accumulated since the previous
/// [`StackStore::take_changes`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StackChanges {
    /// Nodes whose `visible` flag changed.
    pub visibility: Vec<NodeId>,
    /// Nodes whose name changed.
    pub renamed: Vec<NodeId>,
    /// Collections whose membership or order changed.
    pub reordered: Vec<Collection>,
    /// Nodes registered since the last drain. A node may also appear in
    /// `removed` if it was destroyed again before the drain.
    pub added: Vec<NodeId>,
    /// Nodes destroyed since the last drain.
    pub removed: Vec<NodeId>,
}

impl StackChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.visibility.clear();
        self.renamed.clear();
        self.reordered.clear();
        self.added.clear();
        self.removed.clear();
    }

    /// Returns whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visibility.is_empty()
            && self.renamed.is_empty()
            && self.reordered.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
    }
}

impl StackStore {
    /// Drains all pending change records.
    pub fn take_changes(&mut self) -> StackChanges {
        let mut changes = StackChanges::default();
        self.take_changes_into(&mut changes);
        changes
    }

    /// Like [`take_changes`](Self::take_changes), but reuses a caller-provided
    /// buffer.
    pub fn take_changes_into(&mut self, changes: &mut StackChanges) {
        changes.clear();

        let visibility: Vec<u32> = self
            .dirty
            .drain(dirty::VISIBILITY)
            .deterministic()
            .run()
            .collect();
        changes.visibility = self.live_ids(&visibility);

        let renamed: Vec<u32> = self
            .dirty
            .drain(dirty::NAME)
            .deterministic()
            .run()
            .collect();
        changes.renamed = self.live_ids(&renamed);

        let topology: Vec<u32> = self
            .dirty
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .collect();
        if core::mem::take(&mut self.root_dirty) {
            changes.reordered.push(Collection::Root);
        }
        for idx in topology {
            if let Some(Some(slot)) = self.slots.get(idx as usize) {
                if let Body::Group(_) = slot.body {
                    changes.reordered.push(Collection::Group(slot.id.clone()));
                }
            }
        }

        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
    }

    fn live_ids(&self, slots: &[u32]) -> Vec<NodeId> {
        slots
            .iter()
            .filter_map(|&idx| self.slots.get(idx as usize)?.as_ref())
            .map(|slot| slot.id.clone())
            .collect()
    }
}
