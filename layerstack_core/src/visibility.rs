// Copyright 2026 the Layerstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visibility changes with optional cascading.
//!
//! A `Linked` change sets the target and every node below it. It never walks
//! upward: a hidden group may keep visible children (left behind by earlier
//! `Unlinked` changes), and showing a child does not show its group.

use alloc::vec::Vec;

use crate::error::StackError;
use crate::stack::{NodeId, StackStore};

/// Whether a visibility change propagates to descendants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CascadePolicy {
    /// Apply to the node and all of its descendants.
    Linked,
    /// Apply to the node only.
    #[default]
    Unlinked,
}

impl StackStore {
    /// Sets the visibility of `id` under `policy`.
    ///
    /// Returns the number of nodes the change was applied to.
    pub fn set_visibility(
        &mut self,
        id: &str,
        visible: bool,
        policy: CascadePolicy,
    ) -> Result<usize, StackError> {
        let idx = self
            .slot_of(id)
            .ok_or_else(|| StackError::NotFound(NodeId::from(id)))?;
        let targets: Vec<u32> = match policy {
            CascadePolicy::Unlinked => alloc::vec![idx],
            CascadePolicy::Linked => core::iter::once(idx)
                .chain(self.descendants(id).map(|n| n.slot_index()))
                .collect(),
        };
        for &t in &targets {
            self.set_visible_slot(t, visible);
        }
        Ok(targets.len())
    }

    /// Shows every node: a linked change from each root.
    pub fn show_all(&mut self) {
        self.set_all(true);
    }

    /// Hides every node: a linked change from each root.
    pub fn hide_all(&mut self) {
        self.set_all(false);
    }

    /// Applies a linked change to each id. Unknown ids are skipped with a
    /// warning.
    ///
    /// Returns the number of nodes touched.
    pub fn set_visibility_many(&mut self, ids: &[NodeId], visible: bool) -> usize {
        ids.iter()
            .map(|id| {
                self.set_visibility(id.as_str(), visible, CascadePolicy::Linked)
                    .unwrap_or_else(|err| {
                        log::warn!("set visibility skipped: {err}");
                        0
                    })
            })
            .sum()
    }

    /// Flips each node's own flag. No cascading; unknown ids are skipped with
    /// a warning.
    ///
    /// Returns the number of nodes flipped.
    pub fn toggle_visibility(&mut self, ids: &[NodeId]) -> usize {
        let mut flipped = 0;
        for id in ids {
            match self.slot_of(id.as_str()) {
                Some(idx) => {
                    let visible = self.slot(idx).visible;
                    self.set_visible_slot(idx, !visible);
                    flipped += 1;
                }
                None => log::warn!("toggle visibility skipped: node `{id}` not found"),
            }
        }
        flipped
    }

    /// Returns whether `id` and every group above it are visible, i.e.
    /// whether the node actually contributes to the rendered map.
    #[must_use]
    pub fn effective_visibility(&self, id: &str) -> Option<bool> {
        let node = self.node(id)?;
        let mut visible = node.is_visible();
        let mut current = node.parent();
        while let Some(p) = current {
            visible &= p.is_visible();
            current = p.parent();
        }
        Some(visible)
    }

    fn set_all(&mut self, visible: bool) {
        let targets: Vec<u32> = self.walk().map(|n| n.slot_index()).collect();
        for t in targets {
            self.set_visible_slot(t, visible);
        }
    }
}
