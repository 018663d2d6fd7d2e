// Copyright 2026 the Layerstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer stack model and tree-view synchronization for map composition.
//!
//! `layerstack_core` keeps a nested, ordered render stack (groups and leaf
//! layers, drawn bottom to top) consistent with the tree view shown to the
//! user (listed top to bottom, so every collection appears reversed). It is
//! `no_std` compatible (with `alloc`).
//!
//! # Architecture
//!
//! The crate is organized around UI events that mutate one canonical store
//! and derive everything else from it:
//!
//! ```text
//!   Tree widget event
//!       │
//!       ▼
//!   LayerTree::on_* ──► StackStore (validate, then mutate)
//!       │                    │
//!       │                    ├──► take_changes() ──► Presenter::apply()
//!       ▼                    │
//!   TraceSink events         └──► project() ──► TreeView ──► widget
//! ```
//!
//! **[`stack`]** — Slot-based forest storage with id lookup. Groups own
//! ordered child collections; visibility and names are stored per node.
//!
//! **[`reorder`]** — Drag-and-drop: maps a visual drop position onto a
//! render-order insert index and applies it as one atomic move.
//!
//! **[`visibility`]** — Linked (cascading) and unlinked visibility changes.
//!
//! **[`group`]** — Group creation from the current selection, removal, and
//! renaming.
//!
//! **[`selection`]** — Click, toggle, range, and right-click selection.
//!
//! **[`projection`]** — The reversed tree-view model.
//!
//! **[`session`]** — [`LayerTree`](session::LayerTree), one handler per UI
//! event.
//!
//! **[`dirty`]** — Change-tracking channels via `understory_dirty`.
//!
//! **[`backend`]** — The [`Presenter`](backend::Presenter) trait that map
//! integrations implement to mirror the stack.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! handler instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod backend;
pub mod config;
pub mod dirty;
pub mod error;
pub mod group;
pub mod projection;
pub mod reorder;
pub mod selection;
pub mod session;
pub mod stack;
pub mod trace;
pub mod visibility;
