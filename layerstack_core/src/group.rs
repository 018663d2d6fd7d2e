// Copyright 2026 the Layerstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Group creation, removal, and renaming.
//!
//! [`StackStore::add_group`] decides from the current selection where a new
//! group goes and what it adopts:
//!
//! | selection            | new group                      | adopts    |
//! |----------------------|--------------------------------|-----------|
//! | empty                | top of the root collection     | nothing   |
//! | exactly one group    | top of that group's children   | nothing   |
//! | one leaf, or several | top of the root collection     | selection |

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::stack::{Collection, NewNode, NodeId, NodeKind, StackStore};

/// Default prefix for generated group names.
pub const GROUP_NAME_PREFIX: &str = "group";

/// The outcome of [`StackStore::add_group`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddedGroup {
    /// Id of the newly created group.
    pub group: NodeId,
    /// The group the new group was nested into, or `None` at the root.
    pub parent: Option<NodeId>,
    /// Number of selected nodes moved into the new group.
    pub adopted: usize,
}

impl StackStore {
    /// Creates a group according to `selected`, named with
    /// [`unique_group_name`](Self::unique_group_name) unless `name` is given.
    ///
    /// Adopted nodes keep the relative order of `selected`. Unknown ids are
    /// skipped with a warning; a single unknown id behaves like an empty
    /// selection.
    pub fn add_group(&mut self, selected: &[NodeId], name: Option<&str>) -> AddedGroup {
        self.add_group_with_prefix(selected, name, GROUP_NAME_PREFIX)
    }

    /// Like [`add_group`](Self::add_group), generating names from `prefix`.
    pub fn add_group_with_prefix(
        &mut self,
        selected: &[NodeId],
        name: Option<&str>,
        prefix: &str,
    ) -> AddedGroup {
        let known: Vec<&NodeId> = selected
            .iter()
            .filter(|id| {
                let found = self.contains(id.as_str());
                if !found {
                    log::warn!("add group: selected node `{id}` not found");
                }
                found
            })
            .collect();

        let id = self.next_group_id();
        let name = name.map_or_else(|| self.unique_group_name(prefix), String::from);
        let node = NewNode::group(id.clone(), name);

        let lone_group = match known.as_slice() {
            [only] if selected.len() == 1 => self
                .node(only.as_str())
                .filter(|n| n.kind() == NodeKind::Group)
                .map(|n| n.id().clone()),
            _ => None,
        };

        if known.is_empty() || lone_group.is_some() {
            let parent_collection = match &lone_group {
                Some(g) => Collection::Group(g.clone()),
                None => Collection::Root,
            };
            self.push_fresh(&parent_collection, node);
            return AddedGroup {
                group: id,
                parent: lone_group,
                adopted: 0,
            };
        }

        self.push_fresh(&Collection::Root, node);
        let target = Collection::Group(id.clone());
        let mut adopted = 0;
        for member in known {
            // Duplicates in the selection were adopted on first sight.
            if self.owning_collection(member.as_str()).as_ref() == Some(&target) {
                continue;
            }
            let (Some(from), Ok(len)) = (
                self.owning_collection(member.as_str()),
                self.collection_len(&target),
            ) else {
                continue;
            };
            match self.move_within_or_across(&from, &target, member.as_str(), len) {
                Ok(()) => adopted += 1,
                Err(err) => log::warn!("add group: cannot adopt `{member}`: {err}"),
            }
        }

        AddedGroup {
            group: id,
            parent: None,
            adopted,
        }
    }

    /// Returns `{prefix}{N}` for the smallest `N >= 1` not already used as a
    /// name in the root collection.
    #[must_use]
    pub fn unique_group_name(&self, prefix: &str) -> String {
        let taken: Vec<&str> = self.root().map(|n| n.name()).collect();
        (1_u64..)
            .map(|n| format!("{prefix}{n}"))
            .find(|candidate| !taken.contains(&candidate.as_str()))
            .unwrap_or_default()
    }

    /// Detaches `id` and its subtree from the stack.
    ///
    /// Returns the number of nodes removed; 0 if the node was already gone.
    pub fn remove_node(&mut self, id: &str) -> usize {
        self.remove(id)
    }

    /// Renames `id`. Unknown ids are logged and ignored.
    ///
    /// Returns whether the node was found.
    pub fn rename_node(&mut self, id: &str, name: &str) -> bool {
        match self.rename(id, name) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("rename skipped: {err}");
                false
            }
        }
    }

    /// Appends a node whose id was freshly generated and whose parent was
    /// just resolved; neither can fail.
    fn push_fresh(&mut self, collection: &Collection, node: NewNode) {
        if let Err(err) = self.push(collection, node) {
            panic!("inserting a freshly generated group failed: {err}");
        }
    }
}
