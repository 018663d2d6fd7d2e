// Copyright 2026 the Layerstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render stack data model.
//!
//! The stack is a forest of nodes. Each node has:
//!
//! - An identity ([`NodeId`]): an opaque string, unique across the forest
//!   and stable for the node's lifetime.
//! - A variant ([`NodeKind`]): a [`Leaf`](NodeKind::Leaf) carrying opaque
//!   [`LeafMeta`], or a [`Group`](NodeKind::Group) owning an ordered child
//!   collection.
//! - **Local properties** set by callers: `name` and `visible`. Visibility is
//!   stored per node, never derived from ancestors.
//!
//! Every collection (the root, or a group's children) is ordered bottom to
//! top: index 0 is drawn first. The tree view shows each collection
//! reversed; see [`projection`](crate::projection).
//!
//! # Invariants
//!
//! After every operation:
//!
//! 1. every id appears exactly once in the forest,
//! 2. no node is its own descendant,
//! 3. only groups own children.
//!
//! Mutations validate first and mutate second, so a rejected call leaves the
//! store untouched.

mod changes;
mod id;
mod locate;
mod store;
mod traverse;

pub use changes::StackChanges;
pub use id::{Collection, NodeId, NodeKind};
pub use store::{LeafMeta, NewNode, StackStore};
pub use traverse::{Children, Descendants, NodeRef};

pub(crate) use store::Owner;
