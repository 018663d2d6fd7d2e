// Copyright 2026 the Layerstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! The stack store uses multi-channel dirty tracking (via [`understory_dirty`])
//! to record which nodes changed since the last
//! [`take_changes`](crate::stack::StackStore::take_changes). Each channel
//! represents an independent category of change, keyed by the node's slot.
//!
//! All channels are local-only: cascading visibility marks every touched node
//! explicitly, so no dependency edges are registered.
//!
//! # Consumption
//!
//! Callers never query dirty state directly. `take_changes` drains every
//! channel and surfaces the result as
//! [`StackChanges`](crate::stack::StackChanges), which a
//! [`Presenter`](crate::backend::Presenter) consumes to mirror the stack into
//! an external render stack.

use understory_dirty::Channel;

/// A node's own `visible` flag changed.
pub const VISIBILITY: Channel = Channel::new(0);

/// A node was renamed.
pub const NAME: Channel = Channel::new(1);

/// A group's child collection gained, lost, or reordered members.
///
/// Changes to the root collection are tracked by a separate flag since the
/// root has no slot.
pub const TOPOLOGY: Channel = Channel::new(2);
