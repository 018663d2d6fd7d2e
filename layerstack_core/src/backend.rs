// Copyright 2026 the Layerstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contract for mirroring the stack into an external render stack.
//!
//! The map widget that actually draws layers keeps its own ordered
//! collection of layer handles, with `get(index)`, `length()`,
//! `insertAt(index, handle)` and `remove(handle)`, plus a child collection
//! per group handle. [`StackStore`] is the single source of truth; that
//! collection is only ever updated from it, through a [`Presenter`].
//!
//! # Crate boundaries
//!
//! `layerstack_core` owns the data model, the tree-view handlers, and this
//! contract module. Map integrations depend on `layerstack_core` and
//! implement [`Presenter`] against their native layer collection.

use crate::stack::{StackChanges, StackStore};

/// Applies accumulated stack changes to an external render stack.
///
/// Implementations read current order, names, and visibility from `store`;
/// `changes` only says what to look at.
///
/// # Event loop pseudocode
///
/// ```rust,ignore
/// fn on_drop(drag: &str, target: &str, position: DropPosition) {
///     // Mutate: the handler validates, then updates the store.
///     tree.on_drop(drag, target, position);
///
///     // Present: mirror the store into the map's layer collection.
///     tree.present(&mut map_presenter);
///
///     // Re-render the tree widget from a fresh projection.
///     widget.set_view(tree.view());
/// }
/// ```
pub trait Presenter {
    /// Applies the given [`StackChanges`] to the backing render stack,
    /// reading current values from `store` as needed.
    fn apply(&mut self, store: &StackStore, changes: &StackChanges);
}
