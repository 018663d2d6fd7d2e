// Copyright 2026 the Layerstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Multi-selection following the usual tree-view click semantics.
//!
//! The selection is an ordered list of distinct ids. The last id is the
//! "current" node, the most recently added one. A secondary click on a
//! selected row leaves the list as it is.

use alloc::vec;
use alloc::vec::Vec;

use crate::stack::NodeId;

/// Modifier state accompanying a click on a tree node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ClickModifiers {
    /// Ctrl, or Cmd on macOS: toggle membership.
    pub toggle: bool,
    /// Shift: extend a range from the anchor.
    pub range: bool,
    /// The click came from the secondary (right) button.
    pub secondary: bool,
}

impl ClickModifiers {
    /// A plain primary click.
    pub const NONE: Self = Self {
        toggle: false,
        range: false,
        secondary: false,
    };

    /// A Ctrl/Cmd click.
    pub const TOGGLE: Self = Self {
        toggle: true,
        range: false,
        secondary: false,
    };

    /// A Shift click.
    pub const RANGE: Self = Self {
        toggle: false,
        range: true,
        secondary: false,
    };

    /// A right click.
    pub const SECONDARY: Self = Self {
        toggle: false,
        range: false,
        secondary: true,
    };
}

/// The ordered set of selected node ids.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<NodeId>,
}

impl Selection {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a click on `clicked`.
    ///
    /// `order` is the flattened top-to-bottom order of the rows the user can
    /// see; it is only consulted for range clicks.
    ///
    /// Priority: secondary click, then range (when something is already
    /// selected), then toggle, then plain click.
    pub fn click(&mut self, clicked: &NodeId, modifiers: ClickModifiers, order: &[NodeId]) {
        if modifiers.secondary {
            self.secondary_click(clicked);
        } else if modifiers.range && !self.ids.is_empty() {
            self.extend_range(clicked, order);
        } else if modifiers.toggle {
            self.toggle(clicked);
        } else {
            self.select_only(clicked);
        }
    }

    /// Replaces the selection with `clicked`.
    pub fn select_only(&mut self, clicked: &NodeId) {
        self.ids.clear();
        self.ids.push(clicked.clone());
    }

    /// Removes `clicked` if selected, appends it otherwise.
    pub fn toggle(&mut self, clicked: &NodeId) {
        if let Some(pos) = self.position(clicked) {
            self.ids.remove(pos);
        } else {
            self.ids.push(clicked.clone());
        }
    }

    /// Adds the inclusive range in `order` between the last selected id (the
    /// anchor) and `clicked` to the selection. Ids already selected keep
    /// their place; new ones follow in `order`'s sequence.
    ///
    /// If either end is missing from `order` this degrades to
    /// [`select_only`](Self::select_only).
    pub fn extend_range(&mut self, clicked: &NodeId, order: &[NodeId]) {
        let Some(anchor) = self.ids.last() else {
            self.select_only(clicked);
            return;
        };
        let ends = (
            order.iter().position(|id| id == anchor),
            order.iter().position(|id| id == clicked),
        );
        let (Some(a), Some(b)) = ends else {
            log::debug!("range select from `{anchor}` to `{clicked}` outside visible rows");
            self.select_only(clicked);
            return;
        };
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        for id in &order[lo..=hi] {
            if !self.ids.contains(id) {
                self.ids.push(id.clone());
            }
        }
    }

    /// Right-click semantics: keep the selection untouched, order included,
    /// if it already contains `clicked`; otherwise select only `clicked`.
    pub fn secondary_click(&mut self, clicked: &NodeId) {
        if self.position(clicked).is_none() {
            self.ids = vec![clicked.clone()];
        }
    }

    /// Empties the selection.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Replaces the selection, dropping repeated ids.
    pub fn set(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        self.ids.clear();
        for id in ids {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        }
    }

    /// Keeps only ids for which `keep` returns true.
    ///
    /// Returns the number of ids dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(&NodeId) -> bool) -> usize {
        let before = self.ids.len();
        self.ids.retain(|id| keep(id));
        before - self.ids.len()
    }

    /// The current node: the last id in the selection.
    #[must_use]
    pub fn current(&self) -> Option<&NodeId> {
        self.ids.last()
    }

    /// Returns whether `id` is selected.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|s| s.as_str() == id)
    }

    /// The selected ids in selection order.
    #[must_use]
    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }

    /// Number of selected ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn position(&self, id: &NodeId) -> Option<usize> {
        self.ids.iter().position(|s| s == id)
    }
}
