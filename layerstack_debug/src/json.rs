// Copyright 2026 the Layerstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON exporter for recorded events.
//!
//! [`export`] turns the events of a [`RecorderSink`](super::recorder::RecorderSink)
//! into a JSON array, one object per event, for attaching to bug reports or
//! replaying in tests.

use std::io::{self, Write};

use serde_json::{Value, json};

use layerstack_core::reorder::DropPosition;
use layerstack_core::stack::{Collection, NodeId};

use crate::recorder::RecordedEvent;

/// Exports recorded events as a pretty-printed JSON array.
///
/// Each object has a `"seq"` number, the event `"name"`, and an `"args"`
/// object with the event's fields.
pub fn export(events: &[RecordedEvent], writer: &mut dyn Write) -> io::Result<()> {
    let values: Vec<Value> = events
        .iter()
        .enumerate()
        .map(|(seq, e)| {
            json!({
                "seq": seq,
                "name": e.name(),
                "args": args(e),
            })
        })
        .collect();
    serde_json::to_writer_pretty(&mut *writer, &values)?;
    writeln!(writer)
}

fn args(event: &RecordedEvent) -> Value {
    match event {
        RecordedEvent::MoveApplied {
            drag,
            target,
            position,
            from,
            to,
            index,
        } => json!({
            "drag": drag.as_str(),
            "target": target.as_str(),
            "position": position_str(*position),
            "from": collection_str(from),
            "to": collection_str(to),
            "index": index,
        }),
        RecordedEvent::MoveRejected {
            drag,
            target,
            position,
            reason,
        } => json!({
            "drag": drag.as_str(),
            "target": target.as_str(),
            "position": position_str(*position),
            "reason": reason,
        }),
        RecordedEvent::Visibility {
            ids,
            op,
            policy,
            touched,
        } => json!({
            "ids": id_list(ids),
            "op": format!("{op:?}"),
            "policy": format!("{policy:?}"),
            "touched": touched,
        }),
        RecordedEvent::GroupAdded {
            group,
            name,
            parent,
            adopted,
        } => json!({
            "group": group.as_str(),
            "name": name,
            "parent": parent.as_ref().map(NodeId::as_str),
            "adopted": adopted,
        }),
        RecordedEvent::NodeRemoved { id, removed } => json!({
            "id": id.as_str(),
            "removed": removed,
        }),
        RecordedEvent::NodeRenamed { id, name } => json!({
            "id": id.as_str(),
            "name": name,
        }),
        RecordedEvent::Selection { selected } => json!({
            "selected": id_list(selected),
        }),
        RecordedEvent::LookupMiss { handler, id } => json!({
            "handler": format!("{handler:?}"),
            "id": id.as_str(),
        }),
    }
}

fn id_list(ids: &[NodeId]) -> Vec<&str> {
    ids.iter().map(NodeId::as_str).collect()
}

fn collection_str(collection: &Collection) -> Option<&str> {
    match collection {
        Collection::Root => None,
        Collection::Group(id) => Some(id.as_str()),
    }
}

fn position_str(position: DropPosition) -> &'static str {
    match position {
        DropPosition::Above => "above",
        DropPosition::Inside => "inside",
        DropPosition::Below => "below",
    }
}
