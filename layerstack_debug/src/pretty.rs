// Copyright 2026 the Layerstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use layerstack_core::reorder::DropPosition;
use layerstack_core::stack::NodeId;
use layerstack_core::trace::{
    GroupAddedEvent, LookupMissEvent, MoveAppliedEvent, MoveRejectedEvent, NodeRemovedEvent,
    NodeRenamedEvent, SelectionEvent, TraceSink, VisibilityEvent, VisibilityOp,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the destination.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn position_name(position: DropPosition) -> &'static str {
    match position {
        DropPosition::Above => "above",
        DropPosition::Inside => "inside",
        DropPosition::Below => "below",
    }
}

fn join(ids: &[NodeId]) -> String {
    ids.iter().map(NodeId::as_str).collect::<Vec<_>>().join(",")
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_move_applied(&mut self, e: &MoveAppliedEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[move] {} {} {} -> {}[{}]",
            e.drag,
            position_name(e.position),
            e.target,
            e.plan.to,
            e.plan.index,
        );
    }

    fn on_move_rejected(&mut self, e: &MoveRejectedEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[move:rejected] {} {} {}: {}",
            e.drag,
            position_name(e.position),
            e.target,
            e.error,
        );
    }

    fn on_visibility(&mut self, e: &VisibilityEvent<'_>) {
        let op = match e.op {
            VisibilityOp::Set(true) => "show",
            VisibilityOp::Set(false) => "hide",
            VisibilityOp::Toggle => "toggle",
        };
        let targets = if e.ids.is_empty() {
            "*".to_owned()
        } else {
            join(e.ids)
        };
        let _ = writeln!(
            self.writer,
            "[visibility] {op} {targets} policy={:?} touched={}",
            e.policy, e.touched,
        );
    }

    fn on_group_added(&mut self, e: &GroupAddedEvent<'_>) {
        let parent = e.parent.map_or("root", NodeId::as_str);
        let _ = writeln!(
            self.writer,
            "[group] {} \"{}\" in {parent} adopted={}",
            e.group, e.name, e.adopted,
        );
    }

    fn on_node_removed(&mut self, e: &NodeRemovedEvent<'_>) {
        let _ = writeln!(self.writer, "[remove] {} nodes={}", e.id, e.removed);
    }

    fn on_node_renamed(&mut self, e: &NodeRenamedEvent<'_>) {
        let _ = writeln!(self.writer, "[rename] {} \"{}\"", e.id, e.name);
    }

    fn on_selection(&mut self, e: &SelectionEvent<'_>) {
        let current = e.current.map_or("-", NodeId::as_str);
        let _ = writeln!(
            self.writer,
            "[select] [{}] current={current}",
            join(e.selected),
        );
    }

    fn on_lookup_miss(&mut self, e: &LookupMissEvent<'_>) {
        let _ = writeln!(self.writer, "[miss] {:?} {}", e.handler, e.id);
    }
}

#[cfg(test)]
mod tests {
    use layerstack_core::reorder::MovePlan;
    use layerstack_core::stack::Collection;
    use layerstack_core::trace::Handler;
    use layerstack_core::visibility::CascadePolicy;

    use super::*;

    fn output(sink: PrettyPrintSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn move_lines() {
        let mut sink = PrettyPrintSink::with_writer(Vec::new());
        let plan = MovePlan {
            from: Collection::Root,
            to: Collection::Group("g".into()),
            index: 1,
        };
        sink.on_move_applied(&MoveAppliedEvent {
            drag: "a",
            target: "g",
            position: DropPosition::Inside,
            plan: &plan,
        });
        let out = output(sink);
        assert!(out.starts_with("[move] a inside g -> "), "got {out:?}");
        assert!(out.trim_end().ends_with("[1]"), "got {out:?}");
    }

    #[test]
    fn visibility_and_selection_lines() {
        let mut sink = PrettyPrintSink::with_writer(Vec::new());
        let ids = [NodeId::from("a"), NodeId::from("b")];
        sink.on_visibility(&VisibilityEvent {
            ids: &ids,
            op: VisibilityOp::Set(false),
            policy: CascadePolicy::Linked,
            touched: 3,
        });
        sink.on_visibility(&VisibilityEvent {
            ids: &[],
            op: VisibilityOp::Set(true),
            policy: CascadePolicy::Linked,
            touched: 5,
        });
        sink.on_selection(&SelectionEvent {
            selected: &ids,
            current: ids.last(),
        });
        sink.on_lookup_miss(&LookupMissEvent {
            handler: Handler::Drop,
            id: "ghost",
        });
        let out = output(sink);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            [
                "[visibility] hide a,b policy=Linked touched=3",
                "[visibility] show * policy=Linked touched=5",
                "[select] [a,b] current=b",
                "[miss] Drop ghost",
            ]
        );
    }
}
