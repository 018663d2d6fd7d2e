// Copyright 2026 the Layerstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree-view behavior configuration.

use crate::group::GROUP_NAME_PREFIX;
use crate::visibility::CascadePolicy;

/// Configuration for a [`LayerTree`](crate::session::LayerTree).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerTreeConfig {
    /// Policy applied when a row's checkbox is toggled.
    pub cascade: CascadePolicy,
    /// Prefix for generated group names (`group1`, `group2`, ...).
    pub group_name_prefix: &'static str,
    /// After adding a group, expand the group that received it (nested case)
    /// or the new group itself (root case).
    pub expand_new_groups: bool,
}

impl LayerTreeConfig {
    /// Checkbox changes cascade to every descendant.
    #[must_use]
    pub const fn linked() -> Self {
        Self {
            cascade: CascadePolicy::Linked,
            group_name_prefix: GROUP_NAME_PREFIX,
            expand_new_groups: true,
        }
    }

    /// Checkbox changes affect only the clicked row.
    #[must_use]
    pub const fn unlinked() -> Self {
        Self {
            cascade: CascadePolicy::Unlinked,
            group_name_prefix: GROUP_NAME_PREFIX,
            expand_new_groups: true,
        }
    }
}

impl Default for LayerTreeConfig {
    fn default() -> Self {
        Self::unlinked()
    }
}
