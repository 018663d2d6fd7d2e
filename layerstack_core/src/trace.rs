// Copyright 2026 the Layerstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for tree-view event handling.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! [`LayerTree`](crate::session::LayerTree) handlers call as they apply or
//! reject an operation. All method bodies default to no-ops, so implementing
//! only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).

use alloc::rc::Rc;
use core::cell::RefCell;

use crate::error::StackError;
use crate::reorder::{DropPosition, MovePlan};
use crate::stack::NodeId;
use crate::visibility::CascadePolicy;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which tree-view handler produced an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Handler {
    /// Checkbox toggled on a row.
    Check,
    /// Row clicked.
    Select,
    /// Drag-and-drop finished.
    Drop,
    /// "Add group" action.
    AddGroup,
    /// Row renamed.
    Rename,
    /// Group expanded or collapsed.
    Expand,
}

/// How a visibility event changed the flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VisibilityOp {
    /// Flags set to the given value.
    Set(bool),
    /// Flags flipped individually.
    Toggle,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted after a drop was applied to the stack.
#[derive(Clone, Copy, Debug)]
pub struct MoveAppliedEvent<'a> {
    /// The dragged node.
    pub drag: &'a str,
    /// The node it was dropped on.
    pub target: &'a str,
    /// Visual drop position.
    pub position: DropPosition,
    /// The move that was carried out.
    pub plan: &'a MovePlan,
}

/// Emitted when a drop was refused. The stack is unchanged.
#[derive(Clone, Copy, Debug)]
pub struct MoveRejectedEvent<'a> {
    /// The dragged node.
    pub drag: &'a str,
    /// The node it was dropped on.
    pub target: &'a str,
    /// Visual drop position.
    pub position: DropPosition,
    /// Why the move was refused.
    pub error: &'a StackError,
}

/// Emitted after visibility flags were changed.
#[derive(Clone, Copy, Debug)]
pub struct VisibilityEvent<'a> {
    /// The ids the handler was invoked with. Empty for show/hide all.
    pub ids: &'a [NodeId],
    /// What was done to the flags.
    pub op: VisibilityOp,
    /// Cascade policy in effect.
    pub policy: CascadePolicy,
    /// Number of nodes the change was applied to.
    pub touched: usize,
}

/// Emitted after a group was created.
#[derive(Clone, Copy, Debug)]
pub struct GroupAddedEvent<'a> {
    /// The new group.
    pub group: &'a NodeId,
    /// Its generated or explicit name.
    pub name: &'a str,
    /// The group it was nested into, if any.
    pub parent: Option<&'a NodeId>,
    /// Number of selected nodes moved into it.
    pub adopted: usize,
}

/// Emitted after a node and its subtree were removed.
#[derive(Clone, Copy, Debug)]
pub struct NodeRemovedEvent<'a> {
    /// The node that was removed.
    pub id: &'a str,
    /// Size of the removed subtree, including the node.
    pub removed: usize,
}

/// Emitted after a node was renamed.
#[derive(Clone, Copy, Debug)]
pub struct NodeRenamedEvent<'a> {
    /// The renamed node.
    pub id: &'a str,
    /// Its new name.
    pub name: &'a str,
}

/// Emitted whenever the selection changed.
#[derive(Clone, Copy, Debug)]
pub struct SelectionEvent<'a> {
    /// Selected ids in selection order.
    pub selected: &'a [NodeId],
    /// The current node, if any.
    pub current: Option<&'a NodeId>,
}

/// Emitted when a handler was given an id that is not in the stack.
#[derive(Clone, Copy, Debug)]
pub struct LookupMissEvent<'a> {
    /// Handler that performed the lookup.
    pub handler: Handler,
    /// The unknown id.
    pub id: &'a str,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the tree-view handlers.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called after a drop was applied.
    fn on_move_applied(&mut self, e: &MoveAppliedEvent<'_>) {
        _ = e;
    }

    /// Called when a drop was rejected.
    fn on_move_rejected(&mut self, e: &MoveRejectedEvent<'_>) {
        _ = e;
    }

    /// Called after visibility flags changed.
    fn on_visibility(&mut self, e: &VisibilityEvent<'_>) {
        _ = e;
    }

    /// Called after a group was created.
    fn on_group_added(&mut self, e: &GroupAddedEvent<'_>) {
        _ = e;
    }

    /// Called after a node was removed.
    fn on_node_removed(&mut self, e: &NodeRemovedEvent<'_>) {
        _ = e;
    }

    /// Called after a node was renamed.
    fn on_node_renamed(&mut self, e: &NodeRenamedEvent<'_>) {
        _ = e;
    }

    /// Called after the selection changed.
    fn on_selection(&mut self, e: &SelectionEvent<'_>) {
        _ = e;
    }

    /// Called when an id could not be resolved.
    fn on_lookup_miss(&mut self, e: &LookupMissEvent<'_>) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Shared sinks
// ---------------------------------------------------------------------------

/// Lets a sink installed in a [`LayerTree`](crate::session::LayerTree) stay
/// readable through another handle.
impl<T: TraceSink + ?Sized> TraceSink for Rc<RefCell<T>> {
    fn on_move_applied(&mut self, e: &MoveAppliedEvent<'_>) {
        self.borrow_mut().on_move_applied(e);
    }

    fn on_move_rejected(&mut self, e: &MoveRejectedEvent<'_>) {
        self.borrow_mut().on_move_rejected(e);
    }

    fn on_visibility(&mut self, e: &VisibilityEvent<'_>) {
        self.borrow_mut().on_visibility(e);
    }

    fn on_group_added(&mut self, e: &GroupAddedEvent<'_>) {
        self.borrow_mut().on_group_added(e);
    }

    fn on_node_removed(&mut self, e: &NodeRemovedEvent<'_>) {
        self.borrow_mut().on_node_removed(e);
    }

    fn on_node_renamed(&mut self, e: &NodeRenamedEvent<'_>) {
        self.borrow_mut().on_node_renamed(e);
    }

    fn on_selection(&mut self, e: &SelectionEvent<'_>) {
        self.borrow_mut().on_selection(e);
    }

    fn on_lookup_miss(&mut self, e: &LookupMissEvent<'_>) {
        self.borrow_mut().on_lookup_miss(e);
    }
}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

macro_rules! dispatch {
    ($(#[$doc:meta])* $name:ident => $method:ident($event:ty)) => {
        $(#[$doc])*
        #[inline]
        pub fn $name(&mut self, e: &$event) {
            #[cfg(feature = "trace")]
            if let Some(s) = &mut self.sink {
                s.$method(e);
            }
            #[cfg(not(feature = "trace"))]
            {
                _ = e;
            }
        }
    };
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer from an optional sink.
    #[inline]
    #[must_use]
    pub fn from_option(sink: Option<&'a mut dyn TraceSink>) -> Self {
        match sink {
            Some(s) => Self::new(s),
            None => Self::none(),
        }
    }

    dispatch!(
        /// Emits a [`MoveAppliedEvent`].
        move_applied => on_move_applied(MoveAppliedEvent<'_>)
    );
    dispatch!(
        /// Emits a [`MoveRejectedEvent`].
        move_rejected => on_move_rejected(MoveRejectedEvent<'_>)
    );
    dispatch!(
        /// Emits a [`VisibilityEvent`].
        visibility => on_visibility(VisibilityEvent<'_>)
    );
    dispatch!(
        /// Emits a [`GroupAddedEvent`].
        group_added => on_group_added(GroupAddedEvent<'_>)
    );
    dispatch!(
        /// Emits a [`NodeRemovedEvent`].
        node_removed => on_node_removed(NodeRemovedEvent<'_>)
    );
    dispatch!(
        /// Emits a [`NodeRenamedEvent`].
        node_renamed => on_node_renamed(NodeRenamedEvent<'_>)
    );
    dispatch!(
        /// Emits a [`SelectionEvent`].
        selection => on_selection(SelectionEvent<'_>)
    );
    dispatch!(
        /// Emits a [`LookupMissEvent`].
        lookup_miss => on_lookup_miss(LookupMissEvent<'_>)
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::Collection;

    fn sample_plan() -> MovePlan {
        MovePlan {
            from: Collection::Root,
            to: Collection::Group(NodeId::from("g")),
            index: 2,
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        let plan = sample_plan();
        sink.on_move_applied(&MoveAppliedEvent {
            drag: "a",
            target: "g",
            position: DropPosition::Inside,
            plan: &plan,
        });
        sink.on_lookup_miss(&LookupMissEvent {
            handler: Handler::Rename,
            id: "ghost",
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.node_removed(&NodeRemovedEvent { id: "a", removed: 1 });
        tracer.selection(&SelectionEvent {
            selected: &[],
            current: None,
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::string::String;
        use alloc::vec::Vec;

        struct RecordingSink {
            removed: Vec<String>,
            misses: Vec<Handler>,
        }
        impl TraceSink for RecordingSink {
            fn on_node_removed(&mut self, e: &NodeRemovedEvent<'_>) {
                self.removed.push(e.id.into());
            }
            fn on_lookup_miss(&mut self, e: &LookupMissEvent<'_>) {
                self.misses.push(e.handler);
            }
        }

        let mut sink = RecordingSink {
            removed: Vec::new(),
            misses: Vec::new(),
        };
        let mut tracer = Tracer::from_option(Some(&mut sink));
        tracer.node_removed(&NodeRemovedEvent { id: "a", removed: 3 });
        tracer.lookup_miss(&LookupMissEvent {
            handler: Handler::Check,
            id: "ghost",
        });
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.removed, ["a"]);
        assert_eq!(sink.misses, [Handler::Check]);
    }
}
