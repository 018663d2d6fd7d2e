// Copyright 2026 the Layerstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording.
//!
//! [`RecorderSink`] implements [`TraceSink`] and stores an owned copy of
//! every event as a [`RecordedEvent`], in arrival order. Install it in a
//! [`LayerTree`](layerstack_core::session::LayerTree) behind an
//! `Rc<RefCell<_>>` to read it back afterwards.

use layerstack_core::reorder::DropPosition;
use layerstack_core::stack::{Collection, NodeId};
use layerstack_core::trace::{
    GroupAddedEvent, Handler, LookupMissEvent, MoveAppliedEvent, MoveRejectedEvent,
    NodeRemovedEvent, NodeRenamedEvent, SelectionEvent, TraceSink, VisibilityEvent, VisibilityOp,
};
use layerstack_core::visibility::CascadePolicy;

// ---------------------------------------------------------------------------
// Recorded events
// ---------------------------------------------------------------------------

/// An owned copy of one trace event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedEvent {
    /// A drop was applied.
    MoveApplied {
        /// Dragged node.
        drag: NodeId,
        /// Drop target.
        target: NodeId,
        /// Visual drop position.
        position: DropPosition,
        /// Source collection.
        from: Collection,
        /// Destination collection.
        to: Collection,
        /// Final index in `to`.
        index: usize,
    },
    /// A drop was rejected.
    MoveRejected {
        /// Dragged node.
        drag: NodeId,
        /// Drop target.
        target: NodeId,
        /// Visual drop position.
        position: DropPosition,
        /// Rendered error message.
        reason: String,
    },
    /// Visibility flags changed.
    Visibility {
        /// Ids the handler was invoked with.
        ids: Vec<NodeId>,
        /// What was done to the flags.
        op: VisibilityOp,
        /// Cascade policy in effect.
        policy: CascadePolicy,
        /// Number of nodes touched.
        touched: usize,
    },
    /// A group was created.
    GroupAdded {
        /// The new group.
        group: NodeId,
        /// Its name.
        name: String,
        /// Enclosing group, if nested.
        parent: Option<NodeId>,
        /// Number of adopted nodes.
        adopted: usize,
    },
    /// A subtree was removed.
    NodeRemoved {
        /// Root of the removed subtree.
        id: NodeId,
        /// Subtree size.
        removed: usize,
    },
    /// A node was renamed.
    NodeRenamed {
        /// The node.
        id: NodeId,
        /// New name.
        name: String,
    },
    /// The selection changed.
    Selection {
        /// Selected ids in selection order.
        selected: Vec<NodeId>,
    },
    /// An id could not be resolved.
    LookupMiss {
        /// Handler that performed the lookup.
        handler: Handler,
        /// The unknown id.
        id: NodeId,
    },
}

impl RecordedEvent {
    /// Short event name, as used by the pretty printer and JSON export.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::MoveApplied { .. } => "MoveApplied",
            Self::MoveRejected { .. } => "MoveRejected",
            Self::Visibility { .. } => "Visibility",
            Self::GroupAdded { .. } => "GroupAdded",
            Self::NodeRemoved { .. } => "NodeRemoved",
            Self::NodeRenamed { .. } => "NodeRenamed",
            Self::Selection { .. } => "Selection",
            Self::LookupMiss { .. } => "LookupMiss",
        }
    }
}

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecorderSink {
    events: Vec<RecordedEvent>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events in arrival order.
    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Consumes the recorder and returns the recorded events.
    #[must_use]
    pub fn into_events(self) -> Vec<RecordedEvent> {
        self.events
    }

    /// Discards everything recorded so far.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl TraceSink for RecorderSink {
    fn on_move_applied(&mut self, e: &MoveAppliedEvent<'_>) {
        self.events.push(RecordedEvent::MoveApplied {
            drag: e.drag.into(),
            target: e.target.into(),
            position: e.position,
            from: e.plan.from.clone(),
            to: e.plan.to.clone(),
            index: e.plan.index,
        });
    }

    fn on_move_rejected(&mut self, e: &MoveRejectedEvent<'_>) {
        self.events.push(RecordedEvent::MoveRejected {
            drag: e.drag.into(),
            target: e.target.into(),
            position: e.position,
            reason: e.error.to_string(),
        });
    }

    fn on_visibility(&mut self, e: &VisibilityEvent<'_>) {
        self.events.push(RecordedEvent::Visibility {
            ids: e.ids.to_vec(),
            op: e.op,
            policy: e.policy,
            touched: e.touched,
        });
    }

    fn on_group_added(&mut self, e: &GroupAddedEvent<'_>) {
        self.events.push(RecordedEvent::GroupAdded {
            group: e.group.clone(),
            name: e.name.into(),
            parent: e.parent.cloned(),
            adopted: e.adopted,
        });
    }

    fn on_node_removed(&mut self, e: &NodeRemovedEvent<'_>) {
        self.events.push(RecordedEvent::NodeRemoved {
            id: e.id.into(),
            removed: e.removed,
        });
    }

    fn on_node_renamed(&mut self, e: &NodeRenamedEvent<'_>) {
        self.events.push(RecordedEvent::NodeRenamed {
            id: e.id.into(),
            name: e.name.into(),
        });
    }

    fn on_selection(&mut self, e: &SelectionEvent<'_>) {
        self.events.push(RecordedEvent::Selection {
            selected: e.selected.to_vec(),
        });
    }

    fn on_lookup_miss(&mut self, e: &LookupMissEvent<'_>) {
        self.events.push(RecordedEvent::LookupMiss {
            handler: e.handler,
            id: e.id.into(),
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use layerstack_core::config::LayerTreeConfig;
    use layerstack_core::error::{InvalidMove, StackError};
    use layerstack_core::selection::ClickModifiers;
    use layerstack_core::session::LayerTree;
    use layerstack_core::stack::NewNode;

    use super::*;

    fn sample_tree() -> (LayerTree, Rc<RefCell<RecorderSink>>) {
        let mut tree = LayerTree::new(LayerTreeConfig::linked());
        let g = Collection::Group(NodeId::from("g"));
        tree.push(&Collection::Root, NewNode::leaf("a", "A")).unwrap();
        tree.push(&Collection::Root, NewNode::group("g", "G")).unwrap();
        tree.push(&g, NewNode::leaf("x", "X")).unwrap();
        let recorder = Rc::new(RefCell::new(RecorderSink::new()));
        tree.set_sink(Some(Box::new(recorder.clone())));
        (tree, recorder)
    }

    #[test]
    fn records_applied_and_rejected_moves() {
        let (mut tree, recorder) = sample_tree();
        tree.on_drop("a", "g", DropPosition::Inside);
        tree.on_drop("g", "x", DropPosition::Below);

        let events = recorder.borrow().events().to_vec();
        assert_eq!(
            events[0],
            RecordedEvent::MoveApplied {
                drag: "a".into(),
                target: "g".into(),
                position: DropPosition::Inside,
                from: Collection::Root,
                to: Collection::Group("g".into()),
                index: 1,
            }
        );
        let expected = StackError::InvalidMove {
            drag: "g".into(),
            reason: InvalidMove::IntoDescendant,
        };
        assert_eq!(
            events[1],
            RecordedEvent::MoveRejected {
                drag: "g".into(),
                target: "x".into(),
                position: DropPosition::Below,
                reason: expected.to_string(),
            }
        );
    }

    #[test]
    fn records_handler_sequence() {
        let (mut tree, recorder) = sample_tree();
        tree.on_select("x", ClickModifiers::NONE);
        tree.on_check("g", false);
        tree.on_rename("ghost", "nope");
        tree.on_remove_selected();

        let names: Vec<&str> = recorder
            .borrow()
            .events()
            .iter()
            .map(RecordedEvent::name)
            .collect();
        assert_eq!(
            names,
            ["Selection", "Visibility", "LookupMiss", "NodeRemoved", "Selection"]
        );
        assert_eq!(
            recorder.borrow().events()[1],
            RecordedEvent::Visibility {
                ids: vec!["g".into()],
                op: VisibilityOp::Set(false),
                policy: CascadePolicy::Linked,
                touched: 2,
            }
        );
    }

    #[test]
    fn clear_and_into_events() {
        let mut recorder = RecorderSink::new();
        recorder.on_node_renamed(&NodeRenamedEvent {
            id: "a",
            name: "Alpha",
        });
        assert_eq!(recorder.events().len(), 1);
        recorder.clear();
        assert!(recorder.into_events().is_empty());
    }
}
