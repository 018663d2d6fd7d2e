// Copyright 2026 the Layerstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tree-view facade: one handler per UI event.
//!
//! [`LayerTree`] owns the [`StackStore`], the [`Selection`], and the set of
//! expanded groups. Each `on_*` handler runs to completion synchronously.
//! Rejected operations are logged with `log::warn!`, reported to the trace
//! sink, and leave every piece of state untouched; nothing here returns an
//! error to the widget.
//!
//! After any handler, [`LayerTree::view`] rebuilds the widget model from
//! scratch and [`LayerTree::present`] mirrors the accumulated changes into
//! the map's render stack.

use alloc::boxed::Box;
use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use crate::backend::Presenter;
use crate::config::LayerTreeConfig;
use crate::error::StackError;
use crate::group::AddedGroup;
use crate::projection::TreeView;
use crate::reorder::{DropPosition, MovePlan};
use crate::selection::{ClickModifiers, Selection};
use crate::stack::{Collection, NewNode, NodeId, StackChanges, StackStore};
use crate::trace::{
    GroupAddedEvent, Handler, LookupMissEvent, MoveAppliedEvent, MoveRejectedEvent,
    NodeRemovedEvent, NodeRenamedEvent, SelectionEvent, TraceSink, Tracer, VisibilityEvent,
    VisibilityOp,
};
use crate::visibility::CascadePolicy;

/// Stack, selection, and expansion state behind a layer tree widget.
pub struct LayerTree {
    store: StackStore,
    selection: Selection,
    expanded: BTreeSet<NodeId>,
    config: LayerTreeConfig,
    changes: StackChanges,
    sink: Option<Box<dyn TraceSink>>,
}

impl core::fmt::Debug for LayerTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LayerTree")
            .field("store", &self.store)
            .field("selection", &self.selection)
            .field("expanded", &self.expanded)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for LayerTree {
    fn default() -> Self {
        Self::new(LayerTreeConfig::default())
    }
}

impl LayerTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new(config: LayerTreeConfig) -> Self {
        Self::with_store(StackStore::new(), config)
    }

    /// Wraps an existing store, e.g. one restored from a project file.
    #[must_use]
    pub fn with_store(store: StackStore, config: LayerTreeConfig) -> Self {
        Self {
            store,
            selection: Selection::new(),
            expanded: BTreeSet::new(),
            config,
            changes: StackChanges::default(),
            sink: None,
        }
    }

    /// Installs a trace sink, returning the previous one.
    pub fn set_sink(&mut self, sink: Option<Box<dyn TraceSink>>) -> Option<Box<dyn TraceSink>> {
        core::mem::replace(&mut self.sink, sink)
    }

    /// The underlying stack.
    #[must_use]
    pub fn store(&self) -> &StackStore {
        &self.store
    }

    /// The current selection.
    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &LayerTreeConfig {
        &self.config
    }

    /// Registers a leaf produced by a layer factory at `index` in
    /// `collection`.
    pub fn insert(
        &mut self,
        collection: &Collection,
        index: usize,
        node: NewNode,
    ) -> Result<(), StackError> {
        self.store.insert_at(collection, index, node)
    }

    /// Registers a node on top of `collection`.
    pub fn push(&mut self, collection: &Collection, node: NewNode) -> Result<(), StackError> {
        self.store.push(collection, node)
    }

    // -----------------------------------------------------------------------
    // Visibility
    // -----------------------------------------------------------------------

    /// Checkbox toggled on `id`. Applies the configured cascade policy.
    ///
    /// Returns whether the node was found.
    pub fn on_check(&mut self, id: &str, checked: bool) -> bool {
        let policy = self.config.cascade;
        let mut tracer = tracer(&mut self.sink);
        match self.store.set_visibility(id, checked, policy) {
            Ok(touched) => {
                tracer.visibility(&VisibilityEvent {
                    ids: core::slice::from_ref(&NodeId::from(id)),
                    op: VisibilityOp::Set(checked),
                    policy,
                    touched,
                });
                true
            }
            Err(err) => {
                log::warn!("check ignored: {err}");
                tracer.lookup_miss(&LookupMissEvent {
                    handler: Handler::Check,
                    id,
                });
                false
            }
        }
    }

    /// Shows every node.
    pub fn on_show_all(&mut self) {
        self.set_all(true);
    }

    /// Hides every node.
    pub fn on_hide_all(&mut self) {
        self.set_all(false);
    }

    /// Shows every selected node and its descendants.
    pub fn on_show_selected(&mut self) -> usize {
        self.set_selected(true)
    }

    /// Hides every selected node and its descendants.
    pub fn on_hide_selected(&mut self) -> usize {
        self.set_selected(false)
    }

    /// Flips the own flag of every selected node.
    pub fn on_toggle_selected(&mut self) -> usize {
        let touched = self.store.toggle_visibility(self.selection.ids());
        tracer(&mut self.sink).visibility(&VisibilityEvent {
            ids: self.selection.ids(),
            op: VisibilityOp::Toggle,
            policy: CascadePolicy::Unlinked,
            touched,
        });
        touched
    }

    fn set_all(&mut self, visible: bool) {
        if visible {
            self.store.show_all();
        } else {
            self.store.hide_all();
        }
        tracer(&mut self.sink).visibility(&VisibilityEvent {
            ids: &[],
            op: VisibilityOp::Set(visible),
            policy: CascadePolicy::Linked,
            touched: self.store.len(),
        });
    }

    fn set_selected(&mut self, visible: bool) -> usize {
        let touched = self
            .store
            .set_visibility_many(self.selection.ids(), visible);
        tracer(&mut self.sink).visibility(&VisibilityEvent {
            ids: self.selection.ids(),
            op: VisibilityOp::Set(visible),
            policy: CascadePolicy::Linked,
            touched,
        });
        touched
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    /// Row `id` clicked with `modifiers`.
    ///
    /// Range clicks work on the rows currently shown, so collapsed groups
    /// contribute only their own row.
    pub fn on_select(&mut self, id: &str, modifiers: ClickModifiers) {
        if !self.store.contains(id) {
            log::warn!("select ignored: node `{id}` not found");
            tracer(&mut self.sink).lookup_miss(&LookupMissEvent {
                handler: Handler::Select,
                id,
            });
            return;
        }
        let order = if modifiers.range {
            self.store.flatten_visible(&self.expanded)
        } else {
            Vec::new()
        };
        self.selection.click(&NodeId::from(id), modifiers, &order);
        self.emit_selection();
    }

    /// Empties the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.emit_selection();
    }

    fn emit_selection(&mut self) {
        tracer(&mut self.sink).selection(&SelectionEvent {
            selected: self.selection.ids(),
            current: self.selection.current(),
        });
    }

    // -----------------------------------------------------------------------
    // Structure
    // -----------------------------------------------------------------------

    /// `drag` dropped on `target` at `position`.
    ///
    /// Returns the applied move, or `None` if it was rejected.
    pub fn on_drop(
        &mut self,
        drag: &str,
        target: &str,
        position: DropPosition,
    ) -> Option<MovePlan> {
        let mut tracer = tracer(&mut self.sink);
        match self.store.move_node(drag, target, position) {
            Ok(plan) => {
                tracer.move_applied(&MoveAppliedEvent {
                    drag,
                    target,
                    position,
                    plan: &plan,
                });
                Some(plan)
            }
            Err(err) => {
                log::warn!("drop of `{drag}` onto `{target}` rejected: {err}");
                if let StackError::NotFound(missing) = &err {
                    tracer.lookup_miss(&LookupMissEvent {
                        handler: Handler::Drop,
                        id: missing.as_str(),
                    });
                }
                tracer.move_rejected(&MoveRejectedEvent {
                    drag,
                    target,
                    position,
                    error: &err,
                });
                None
            }
        }
    }

    /// Like [`on_drop`](Self::on_drop), taking the tree widget's drop
    /// description (see [`DropPosition::from_tree_drop`]).
    pub fn on_tree_drop(
        &mut self,
        drag: &str,
        target: &str,
        drop_to_gap: bool,
        offset: i32,
    ) -> Option<MovePlan> {
        self.on_drop(drag, target, DropPosition::from_tree_drop(drop_to_gap, offset))
    }

    /// "Add group" on the current selection, with a generated name.
    pub fn on_add_group(&mut self) -> AddedGroup {
        self.add_group(None)
    }

    /// "Add group" on the current selection with an explicit name.
    pub fn on_add_group_named(&mut self, name: &str) -> AddedGroup {
        self.add_group(Some(name))
    }

    fn add_group(&mut self, name: Option<&str>) -> AddedGroup {
        let mut tracer = tracer(&mut self.sink);
        for id in self.selection.ids() {
            if !self.store.contains(id.as_str()) {
                tracer.lookup_miss(&LookupMissEvent {
                    handler: Handler::AddGroup,
                    id: id.as_str(),
                });
            }
        }
        let added = self.store.add_group_with_prefix(
            self.selection.ids(),
            name,
            self.config.group_name_prefix,
        );
        if self.config.expand_new_groups {
            let opened = added.parent.clone().unwrap_or_else(|| added.group.clone());
            self.expanded.insert(opened);
        }
        let group_name = self
            .store
            .node(added.group.as_str())
            .map(|n| n.name())
            .unwrap_or_default();
        tracer.group_added(&GroupAddedEvent {
            group: &added.group,
            name: group_name,
            parent: added.parent.as_ref(),
            adopted: added.adopted,
        });
        added
    }

    /// Removes every selected node with its subtree and clears the
    /// selection.
    ///
    /// Returns the total number of nodes removed.
    pub fn on_remove_selected(&mut self) -> usize {
        let mut total = 0;
        {
            let mut tracer = tracer(&mut self.sink);
            for id in self.selection.ids() {
                // Already gone when an ancestor was removed first.
                let removed = self.store.remove_node(id.as_str());
                if removed > 0 {
                    tracer.node_removed(&NodeRemovedEvent {
                        id: id.as_str(),
                        removed,
                    });
                }
                total += removed;
            }
        }
        self.prune();
        self.selection.clear();
        self.emit_selection();
        total
    }

    /// Removes a single node with its subtree.
    pub fn remove(&mut self, id: &str) -> usize {
        let removed = self.store.remove_node(id);
        if removed > 0 {
            tracer(&mut self.sink).node_removed(&NodeRemovedEvent { id, removed });
            self.prune();
            self.emit_selection();
        }
        removed
    }

    /// Row `id` renamed to `name`.
    ///
    /// Returns whether the node was found.
    pub fn on_rename(&mut self, id: &str, name: &str) -> bool {
        let mut tracer = tracer(&mut self.sink);
        match self.store.rename(id, name) {
            Ok(()) => {
                tracer.node_renamed(&NodeRenamedEvent { id, name });
                true
            }
            Err(err) => {
                log::warn!("rename ignored: {err}");
                tracer.lookup_miss(&LookupMissEvent {
                    handler: Handler::Rename,
                    id,
                });
                false
            }
        }
    }

    /// Drops ids of destroyed nodes from the selection and expanded set.
    fn prune(&mut self) {
        let store = &self.store;
        let dropped = self.selection.retain(|id| store.contains(id.as_str()));
        self.expanded.retain(|id| store.contains(id.as_str()));
        if dropped > 0 {
            log::debug!("pruned {dropped} removed ids from the selection");
        }
    }

    // -----------------------------------------------------------------------
    // Expansion
    // -----------------------------------------------------------------------

    /// Expands or collapses group `id`. Leaves and unknown ids are ignored.
    ///
    /// Returns whether the state was applied.
    pub fn set_expanded(&mut self, id: &str, expanded: bool) -> bool {
        match self.store.node(id) {
            Some(n) if n.is_group() => {
                if expanded {
                    self.expanded.insert(n.id().clone());
                } else {
                    self.expanded.remove(id);
                }
                true
            }
            Some(_) => {
                log::debug!("expand ignored: `{id}` is a leaf");
                false
            }
            None => {
                log::warn!("expand ignored: node `{id}` not found");
                tracer(&mut self.sink).lookup_miss(&LookupMissEvent {
                    handler: Handler::Expand,
                    id,
                });
                false
            }
        }
    }

    /// Expands group `id`.
    pub fn expand(&mut self, id: &str) -> bool {
        self.set_expanded(id, true)
    }

    /// Collapses group `id`.
    pub fn collapse(&mut self, id: &str) -> bool {
        self.set_expanded(id, false)
    }

    /// Returns whether group `id` is expanded.
    #[must_use]
    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// Expands every group.
    pub fn expand_all(&mut self) {
        self.expanded = self
            .store
            .find_all_by(|n| n.is_group())
            .into_iter()
            .map(|n| n.id().clone())
            .collect();
    }

    /// Collapses every group.
    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    // -----------------------------------------------------------------------
    // Output
    // -----------------------------------------------------------------------

    /// Rebuilds the widget model from the current state.
    #[must_use]
    pub fn view(&self) -> TreeView {
        TreeView {
            nodes: self.store.project(),
            checked: self.store.checked_ids(),
            selected: self.selection.ids().to_vec(),
            expanded: self
                .store
                .flatten_all()
                .into_iter()
                .filter(|id| self.expanded.contains(id))
                .collect(),
        }
    }

    /// Drains accumulated changes into `presenter`.
    pub fn present(&mut self, presenter: &mut dyn Presenter) {
        self.store.take_changes_into(&mut self.changes);
        if !self.changes.is_empty() {
            presenter.apply(&self.store, &self.changes);
        }
    }
}

fn tracer(sink: &mut Option<Box<dyn TraceSink>>) -> Tracer<'_> {
    match sink.as_deref_mut() {
        Some(s) => Tracer::new(s),
        None => Tracer::none(),
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    /// root: [a, g(x, y), b]
    fn sample(config: LayerTreeConfig) -> LayerTree {
        let mut tree = LayerTree::new(config);
        let g = Collection::Group(NodeId::from("g"));
        tree.push(&Collection::Root, NewNode::leaf("a", "A")).unwrap();
        tree.push(&Collection::Root, NewNode::group("g", "G")).unwrap();
        tree.push(&g, NewNode::leaf("x", "X")).unwrap();
        tree.push(&g, NewNode::leaf("y", "Y")).unwrap();
        tree.push(&Collection::Root, NewNode::leaf("b", "B")).unwrap();
        tree
    }

    fn select(tree: &mut LayerTree, ids: &[&str]) {
        tree.clear_selection();
        for id in ids {
            tree.on_select(id, ClickModifiers::TOGGLE);
        }
    }

    #[test]
    fn check_uses_configured_policy() {
        let mut tree = sample(LayerTreeConfig::unlinked());
        assert!(tree.on_check("g", false));
        assert_eq!(tree.view().checked, vec!["b", "y", "x", "a"]);

        let mut tree = sample(LayerTreeConfig::linked());
        assert!(tree.on_check("g", false));
        assert_eq!(tree.view().checked, vec!["b", "a"]);
        assert!(!tree.on_check("ghost", true));
    }

    #[test]
    fn drop_updates_view_and_rejections_change_nothing() {
        let mut tree = sample(LayerTreeConfig::default());
        let plan = tree.on_drop("b", "g", DropPosition::Inside).unwrap();
        assert_eq!(plan.to, Collection::Group(NodeId::from("g")));
        assert_eq!(tree.view().row_ids(), vec!["g", "b", "y", "x", "a"]);

        let before = tree.view();
        assert!(tree.on_drop("g", "x", DropPosition::Above).is_none());
        assert!(tree.on_drop("a", "x", DropPosition::Inside).is_none());
        assert!(tree.on_drop("a", "ghost", DropPosition::Below).is_none());
        assert_eq!(tree.view(), before);
    }

    #[test]
    fn tree_drop_offsets() {
        let mut tree = sample(LayerTreeConfig::default());
        // Gap drop with offset -1 puts `a` visually above `b`, i.e. on top.
        tree.on_tree_drop("a", "b", true, -1).unwrap();
        assert_eq!(tree.view().row_ids(), vec!["a", "b", "g", "y", "x"]);
        tree.on_tree_drop("a", "x", false, 0);
        assert_eq!(tree.store().owning_collection("a"), Some(Collection::Root));
    }

    #[test]
    fn range_select_follows_expanded_rows() {
        let mut tree = sample(LayerTreeConfig::default());
        tree.on_select("b", ClickModifiers::NONE);
        tree.on_select("a", ClickModifiers::RANGE);
        assert_eq!(tree.selection().ids(), ["b", "g", "a"]);

        tree.expand("g");
        tree.on_select("b", ClickModifiers::NONE);
        tree.on_select("x", ClickModifiers::RANGE);
        assert_eq!(tree.selection().ids(), ["b", "g", "y", "x"]);

        tree.on_select("ghost", ClickModifiers::NONE);
        assert_eq!(tree.selection().len(), 4);
    }

    #[test]
    fn add_group_from_selection_and_expand() {
        let mut tree = sample(LayerTreeConfig::default());
        select(&mut tree, &["a", "b"]);
        let added = tree.on_add_group();
        assert_eq!(added.adopted, 2);
        assert!(tree.is_expanded(added.group.as_str()));
        assert_eq!(
            tree.store()
                .collection_ids(&Collection::Group(added.group.clone()))
                .unwrap(),
            vec!["a", "b"]
        );
        assert_eq!(tree.store().node(added.group.as_str()).unwrap().name(), "group1");

        select(&mut tree, &["g"]);
        let nested = tree.on_add_group_named("Inner");
        assert_eq!(nested.parent, Some(NodeId::from("g")));
        assert!(tree.is_expanded("g"));
    }

    #[test]
    fn context_menu_group_keeps_selection_order() {
        let mut tree = sample(LayerTreeConfig::default());
        select(&mut tree, &["a", "b"]);
        tree.on_select("a", ClickModifiers::SECONDARY);
        assert_eq!(tree.selection().ids(), ["a", "b"]);

        let added = tree.on_add_group();
        assert_eq!(
            tree.store()
                .collection_ids(&Collection::Group(added.group.clone()))
                .unwrap(),
            vec!["a", "b"]
        );
    }

    #[test]
    fn remove_selected_prunes_state() {
        let mut tree = sample(LayerTreeConfig::default());
        tree.expand_all();
        select(&mut tree, &["g", "x", "a"]);
        assert_eq!(tree.on_remove_selected(), 4);
        assert!(tree.selection().is_empty());
        assert!(!tree.is_expanded("g"));
        assert_eq!(tree.view().row_ids(), vec!["b"]);
    }

    #[test]
    fn remove_single_prunes_selection() {
        let mut tree = sample(LayerTreeConfig::default());
        select(&mut tree, &["x", "b"]);
        assert_eq!(tree.remove("g"), 3);
        assert_eq!(tree.selection().ids(), ["b"]);
        assert_eq!(tree.remove("g"), 0);
    }

    #[test]
    fn bulk_visibility_on_selection() {
        let mut tree = sample(LayerTreeConfig::default());
        select(&mut tree, &["g", "a"]);
        assert_eq!(tree.on_hide_selected(), 4);
        assert_eq!(tree.view().checked, vec!["b"]);
        assert_eq!(tree.on_toggle_selected(), 2);
        assert_eq!(tree.view().checked, vec!["b", "g", "a"]);
        tree.on_show_all();
        assert_eq!(tree.view().checked.len(), 5);
        tree.on_hide_all();
        assert!(tree.view().checked.is_empty());
        assert_eq!(tree.on_show_selected(), 4);
    }

    #[test]
    fn rename_and_expand_edge_cases() {
        let mut tree = sample(LayerTreeConfig::default());
        assert!(tree.on_rename("x", "Roads"));
        assert!(!tree.on_rename("ghost", "x"));
        assert!(!tree.expand("x"));
        assert!(!tree.expand("ghost"));
        assert!(tree.expand("g"));
        assert_eq!(tree.view().expanded, vec!["g"]);
        assert!(tree.collapse("g"));
        tree.expand_all();
        tree.collapse_all();
        assert!(tree.view().expanded.is_empty());
    }

    #[test]
    fn present_skips_empty_change_sets() {
        struct Count(usize);
        impl Presenter for Count {
            fn apply(&mut self, _: &StackStore, _: &StackChanges) {
                self.0 += 1;
            }
        }

        let mut tree = sample(LayerTreeConfig::default());
        let mut presenter = Count(0);
        tree.present(&mut presenter);
        tree.present(&mut presenter);
        assert_eq!(presenter.0, 1);
        tree.on_check("a", false);
        tree.present(&mut presenter);
        assert_eq!(presenter.0, 2);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn handlers_emit_trace_events() {
        use alloc::rc::Rc;
        use alloc::string::String;
        use core::cell::RefCell;

        #[derive(Default)]
        struct Log(Rc<RefCell<Vec<String>>>);
        impl TraceSink for Log {
            fn on_move_rejected(&mut self, e: &MoveRejectedEvent<'_>) {
                self.0.borrow_mut().push(alloc::format!("rejected {}", e.drag));
            }
            fn on_lookup_miss(&mut self, e: &LookupMissEvent<'_>) {
                self.0.borrow_mut().push(alloc::format!("miss {}", e.id));
            }
            fn on_node_renamed(&mut self, e: &NodeRenamedEvent<'_>) {
                self.0.borrow_mut().push(alloc::format!("renamed {}", e.id));
            }
        }

        let lines = Rc::new(RefCell::new(Vec::new()));
        let mut tree = sample(LayerTreeConfig::default());
        tree.set_sink(Some(Box::new(Log(lines.clone()))));
        tree.on_drop("g", "x", DropPosition::Inside);
        tree.on_drop("a", "ghost", DropPosition::Above);
        tree.on_rename("a", "Alpha");
        assert_eq!(
            *lines.borrow(),
            ["rejected g", "miss ghost", "rejected a", "renamed a"]
        );
    }
}
