// Copyright 2026 the Layerstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag-and-drop reordering.
//!
//! Drop positions are expressed in tree-view terms, while the store is in
//! render order, and the tree shows each collection reversed. The index
//! translation is:
//!
//! - **Inside** a group: append at the top of its child collection.
//! - **Above** a sibling (visually): one slot higher in render order,
//!   `drop_index + 1`.
//! - **Below** a sibling: the sibling's own slot, `drop_index`.
//!
//! When the dragged node already sits earlier in the destination collection,
//! removing it first shifts every later index down by one, so the insert
//! index is decremented. The result is finally clamped to the post-removal
//! collection length.
//!
//! ```text
//!   render [A, B, C]     tree  C        move(A, C, Below)  ->  [B, A, C]
//!                              B        move(A, C, Above)  ->  [B, C, A]
//!                              A
//! ```

use crate::error::{InvalidMove, StackError};
use crate::stack::{Collection, NodeId, NodeRef, Owner, StackStore};

/// Where a dragged node was dropped relative to the drop target, in tree-view
/// terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DropPosition {
    /// Visually above the target: later in render order.
    Above,
    /// Into the target group, on top of its children.
    Inside,
    /// Visually below the target: earlier in render order.
    Below,
}

impl DropPosition {
    /// Maps a tree widget drop event onto a position.
    ///
    /// `drop_to_gap == false` means the node was dropped onto the target.
    /// Otherwise an `offset` of `-1` is above the target and anything else
    /// below it.
    #[must_use]
    pub fn from_tree_drop(drop_to_gap: bool, offset: i32) -> Self {
        match (drop_to_gap, offset) {
            (false, _) => Self::Inside,
            (true, -1) => Self::Above,
            (true, _) => Self::Below,
        }
    }
}

/// A resolved move, ready to be applied with
/// [`StackStore::move_within_or_across`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovePlan {
    /// Collection the node is taken from.
    pub from: Collection,
    /// Collection the node is inserted into.
    pub to: Collection,
    /// Insert index in `to`, after the node has been removed from `from`.
    pub index: usize,
}

impl StackStore {
    /// Computes where `drag` lands when dropped at `position` relative to
    /// `target`, without changing anything.
    pub fn plan_move(
        &self,
        drag: &str,
        target: &str,
        position: DropPosition,
    ) -> Result<MovePlan, StackError> {
        let drag_idx = self
            .slot_of(drag)
            .ok_or_else(|| StackError::NotFound(NodeId::from(drag)))?;
        let drop_idx = self
            .slot_of(target)
            .ok_or_else(|| StackError::NotFound(NodeId::from(target)))?;
        if drag_idx == drop_idx {
            return Err(StackError::invalid_move(drag, InvalidMove::OntoSelf));
        }
        if self.is_ancestor_slot(drag_idx, drop_idx) {
            return Err(StackError::invalid_move(drag, InvalidMove::IntoDescendant));
        }

        let from = self.owner_of_slot(drag_idx);
        let (to, index) = match position {
            DropPosition::Inside => {
                if !self.slot_is_group(drop_idx) {
                    return Err(StackError::invalid_move(drag, InvalidMove::TargetNotGroup));
                }
                let to = Owner::Group(drop_idx);
                let mut index = self.members(to).len();
                if from == to && self.position_of_slot(drag_idx) < index {
                    index -= 1;
                }
                log::debug!("move inside: drag={drag} drop={target} insert_index={index}");
                (to, index)
            }
            DropPosition::Above | DropPosition::Below => {
                let to = self.owner_of_slot(drop_idx);
                let drop_index = self.position_of_slot(drop_idx);
                let mut index = match position {
                    DropPosition::Above => drop_index + 1,
                    _ => drop_index,
                };
                let drag_index = (from == to).then(|| self.position_of_slot(drag_idx));
                if drag_index.is_some_and(|d| d < index) {
                    index -= 1;
                }
                let len = self.members(to).len() - usize::from(from == to);
                index = index.min(len);
                log::debug!(
                    "move to gap: drag={drag} drop={target} position={position:?} \
                     drop_index={drop_index} drag_index={drag_index:?} insert_index={index}"
                );
                (to, index)
            }
        };

        Ok(MovePlan {
            from: self.collection_of(from),
            to: self.collection_of(to),
            index,
        })
    }

    /// Moves `drag` relative to `target`.
    ///
    /// Rejected moves return an error and leave the store untouched.
    pub fn move_node(
        &mut self,
        drag: &str,
        target: &str,
        position: DropPosition,
    ) -> Result<MovePlan, StackError> {
        let plan = self.plan_move(drag, target, position)?;
        self.move_within_or_across(&plan.from, &plan.to, drag, plan.index)?;
        Ok(plan)
    }

    fn slot_is_group(&self, idx: u32) -> bool {
        NodeRef::new(self, idx).is_group()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;
    use crate::stack::NewNode;

    fn ids(store: &StackStore, collection: &Collection) -> Vec<NodeId> {
        store.collection_ids(collection).unwrap()
    }

    fn leaves(names: &[&str]) -> StackStore {
        let mut store = StackStore::new();
        for &id in names {
            store.push(&Collection::Root, NewNode::leaf(id, id)).unwrap();
        }
        store
    }

    fn group(id: &str) -> Collection {
        Collection::Group(NodeId::from(id))
    }

    #[test]
    fn below_in_same_collection() {
        let mut store = leaves(&["A", "B", "C"]);
        store.move_node("A", "C", DropPosition::Below).unwrap();
        assert_eq!(ids(&store, &Collection::Root), vec!["B", "A", "C"]);
    }

    #[test]
    fn above_in_same_collection() {
        let mut store = leaves(&["A", "B", "C"]);
        store.move_node("A", "C", DropPosition::Above).unwrap();
        assert_eq!(ids(&store, &Collection::Root), vec!["B", "C", "A"]);
    }

    #[test]
    fn downward_moves_need_no_shift() {
        let mut store = leaves(&["A", "B", "C"]);
        store.move_node("C", "A", DropPosition::Below).unwrap();
        assert_eq!(ids(&store, &Collection::Root), vec!["C", "A", "B"]);

        let mut store = leaves(&["A", "B", "C"]);
        store.move_node("C", "A", DropPosition::Above).unwrap();
        assert_eq!(ids(&store, &Collection::Root), vec!["A", "C", "B"]);
    }

    #[test]
    fn dropping_next_to_current_slot_is_stable() {
        let mut store = leaves(&["A", "B", "C"]);
        // B is already directly above A in the tree.
        let plan = store.move_node("B", "A", DropPosition::Above).unwrap();
        assert_eq!(plan.index, 1);
        assert_eq!(ids(&store, &Collection::Root), vec!["A", "B", "C"]);
    }

    #[test]
    fn inside_appends_on_top() {
        let mut store = StackStore::new();
        store.push(&Collection::Root, NewNode::group("G", "G")).unwrap();
        store.push(&group("G"), NewNode::leaf("X", "X")).unwrap();
        store.push(&group("G"), NewNode::leaf("Y", "Y")).unwrap();
        store.push(&Collection::Root, NewNode::leaf("Z", "Z")).unwrap();

        let plan = store.move_node("Z", "G", DropPosition::Inside).unwrap();
        assert_eq!(
            plan,
            MovePlan {
                from: Collection::Root,
                to: group("G"),
                index: 2,
            }
        );
        assert_eq!(ids(&store, &Collection::Root), vec!["G"]);
        assert_eq!(ids(&store, &group("G")), vec!["X", "Y", "Z"]);
    }

    #[test]
    fn inside_own_group_moves_to_top() {
        let mut store = StackStore::new();
        store.push(&Collection::Root, NewNode::group("G", "G")).unwrap();
        for id in ["X", "Y", "Z"] {
            store.push(&group("G"), NewNode::leaf(id, id)).unwrap();
        }
        let plan = store.move_node("X", "G", DropPosition::Inside).unwrap();
        assert_eq!(plan.index, 2);
        assert_eq!(ids(&store, &group("G")), vec!["Y", "Z", "X"]);
    }

    #[test]
    fn gap_move_across_collections() {
        // root: [G(X, Y), Z]
        let mut store = StackStore::new();
        store.push(&Collection::Root, NewNode::group("G", "G")).unwrap();
        store.push(&group("G"), NewNode::leaf("X", "X")).unwrap();
        store.push(&group("G"), NewNode::leaf("Y", "Y")).unwrap();
        store.push(&Collection::Root, NewNode::leaf("Z", "Z")).unwrap();

        store.move_node("Z", "X", DropPosition::Above).unwrap();
        assert_eq!(ids(&store, &group("G")), vec!["X", "Z", "Y"]);

        store.move_node("Y", "G", DropPosition::Below).unwrap();
        assert_eq!(ids(&store, &Collection::Root), vec!["Y", "G"]);
        assert_eq!(ids(&store, &group("G")), vec!["X", "Z"]);
    }

    #[test]
    fn rejections_leave_store_untouched() {
        let mut store = StackStore::new();
        store.push(&Collection::Root, NewNode::group("G", "G")).unwrap();
        store.push(&group("G"), NewNode::group("H", "H")).unwrap();
        store.push(&group("H"), NewNode::leaf("X", "X")).unwrap();
        store.push(&Collection::Root, NewNode::leaf("L", "L")).unwrap();
        let _ = store.take_changes();

        let cases = [
            (
                "nope",
                "G",
                DropPosition::Inside,
                StackError::NotFound(NodeId::from("nope")),
            ),
            (
                "L",
                "nope",
                DropPosition::Above,
                StackError::NotFound(NodeId::from("nope")),
            ),
            (
                "G",
                "G",
                DropPosition::Inside,
                StackError::invalid_move("G", InvalidMove::OntoSelf),
            ),
            (
                "G",
                "G",
                DropPosition::Above,
                StackError::invalid_move("G", InvalidMove::OntoSelf),
            ),
            (
                "G",
                "H",
                DropPosition::Inside,
                StackError::invalid_move("G", InvalidMove::IntoDescendant),
            ),
            (
                "G",
                "X",
                DropPosition::Below,
                StackError::invalid_move("G", InvalidMove::IntoDescendant),
            ),
            (
                "G",
                "L",
                DropPosition::Inside,
                StackError::invalid_move("G", InvalidMove::TargetNotGroup),
            ),
        ];
        for (drag, target, position, expected) in cases {
            assert_eq!(
                store.move_node(drag, target, position),
                Err(expected),
                "move({drag}, {target}, {position:?})"
            );
        }

        assert_eq!(ids(&store, &Collection::Root), vec!["G", "L"]);
        assert_eq!(ids(&store, &group("G")), vec!["H"]);
        assert_eq!(ids(&store, &group("H")), vec!["X"]);
        assert!(store.take_changes().is_empty(), "no change was recorded");
    }

    #[test]
    fn tree_drop_mapping() {
        assert_eq!(DropPosition::from_tree_drop(false, 0), DropPosition::Inside);
        assert_eq!(DropPosition::from_tree_drop(false, -1), DropPosition::Inside);
        assert_eq!(DropPosition::from_tree_drop(true, -1), DropPosition::Above);
        assert_eq!(DropPosition::from_tree_drop(true, 1), DropPosition::Below);
    }

    #[test]
    fn ids_stay_unique_across_random_moves() {
        let mut store = StackStore::new();
        store.push(&Collection::Root, NewNode::group("G", "G")).unwrap();
        store.push(&Collection::Root, NewNode::group("H", "H")).unwrap();
        for id in ["a", "b", "c", "d"] {
            store.push(&Collection::Root, NewNode::leaf(id, id)).unwrap();
        }
        let all = ["G", "H", "a", "b", "c", "d"];
        let positions = [DropPosition::Above, DropPosition::Inside, DropPosition::Below];
        let mut seed = 7_u32;
        for _ in 0..200 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let drag = all[(seed >> 8) as usize % all.len()];
            let target = all[(seed >> 16) as usize % all.len()];
            let position = positions[(seed >> 24) as usize % positions.len()];
            let _ = store.move_node(drag, target, position);

            let mut seen: Vec<NodeId> = store.walk().map(|n| n.id().clone()).collect();
            assert_eq!(seen.len(), all.len(), "every node still reachable");
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), all.len(), "ids are unique");
        }
    }
}
