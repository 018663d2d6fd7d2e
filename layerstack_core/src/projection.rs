// Copyright 2026 the Layerstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Projection of the stack into tree-view rows.
//!
//! The stack stores each collection bottom to top; a tree view lists the
//! topmost layer first. Projection reverses every collection, recursively, and
//! nothing else: no filtering, no reparenting.
//!
//! ```text
//!   stack                      view
//!   root: [a, g, b]            b
//!   g:    [x, y]               g
//!                                y
//!                                x
//!                              a
//! ```

use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;

use crate::stack::{Children, NodeId, NodeRef, StackStore};

/// One row of the tree view, with its sub-rows for groups.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewNode {
    /// Node id, used as the row key.
    pub id: NodeId,
    /// Displayed title.
    pub title: String,
    /// Leaves cannot be expanded.
    pub is_leaf: bool,
    /// Sub-rows in view order; `None` for leaves.
    pub children: Option<Vec<ViewNode>>,
}

/// Everything a tree widget needs to render the stack.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeView {
    /// Top-level rows, topmost layer first.
    pub nodes: Vec<ViewNode>,
    /// Ids whose own `visible` flag is set.
    pub checked: Vec<NodeId>,
    /// Selected ids, in selection order.
    pub selected: Vec<NodeId>,
    /// Expanded group ids.
    pub expanded: Vec<NodeId>,
}

impl TreeView {
    /// Depth-first row order as displayed when every group is expanded.
    #[must_use]
    pub fn row_ids(&self) -> Vec<NodeId> {
        fn visit(nodes: &[ViewNode], out: &mut Vec<NodeId>) {
            for n in nodes {
                out.push(n.id.clone());
                if let Some(children) = &n.children {
                    visit(children, out);
                }
            }
        }
        let mut out = Vec::new();
        visit(&self.nodes, &mut out);
        out
    }
}

impl StackStore {
    /// Builds the view rows for the whole stack.
    #[must_use]
    pub fn project(&self) -> Vec<ViewNode> {
        project_collection(self.root())
    }

    /// Ids of every node whose own `visible` flag is set, in view order.
    #[must_use]
    pub fn checked_ids(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        flatten(self.root(), &mut out, &|n: NodeRef<'_>| n.is_visible(), &|_| true);
        out
    }

    /// Row ids as displayed, descending only into groups in `expanded`.
    ///
    /// This is the order range selection works on.
    #[must_use]
    pub fn flatten_visible(&self, expanded: &BTreeSet<NodeId>) -> Vec<NodeId> {
        let mut out = Vec::new();
        flatten(self.root(), &mut out, &|_| true, &|n: NodeRef<'_>| {
            expanded.contains(n.id())
        });
        out
    }

    /// Every id in view order, as if all groups were expanded.
    #[must_use]
    pub fn flatten_all(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        flatten(self.root(), &mut out, &|_| true, &|_| true);
        out
    }
}

fn project_collection(members: Children<'_>) -> Vec<ViewNode> {
    members
        .rev()
        .map(|n| ViewNode {
            id: n.id().clone(),
            title: n.name().into(),
            is_leaf: !n.is_group(),
            children: n.is_group().then(|| project_collection(n.children())),
        })
        .collect()
}

fn flatten(
    members: Children<'_>,
    out: &mut Vec<NodeId>,
    include: &dyn Fn(NodeRef<'_>) -> bool,
    descend: &dyn Fn(NodeRef<'_>) -> bool,
) {
    for n in members.rev() {
        if include(n) {
            out.push(n.id().clone());
        }
        if n.is_group() && descend(n) {
            flatten(n.children(), out, include, descend);
        }
    }
}
