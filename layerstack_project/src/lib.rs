// Copyright 2026 the Layerstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Project save/open for layer stacks.
//!
//! A [`ProjectDocument`] is the persisted form of a
//! [`StackStore`]: a tree of tagged `leaf` / `group` records in render order
//! (bottom first, like the store itself). [`ProjectDocument::snapshot`] and
//! [`ProjectDocument::restore`] convert between the two; the JSON encoding
//! comes from `serde_json`.
//!
//! Round-tripping a stack through a document keeps ids, names, visibility,
//! leaf metadata, and order.
//!
//! ```json
//! {
//!   "version": 1,
//!   "layers": [
//!     { "type": "leaf", "id": "osm", "name": "OpenStreetMap", "visible": true },
//!     { "type": "group", "id": "grp-00000001", "name": "group1", "visible": true,
//!       "children": [] }
//!   ]
//! }
//! ```

use kurbo::Rect;
use serde::{Deserialize, Serialize};

use layerstack_core::error::StackError;
use layerstack_core::stack::{Children, Collection, LeafMeta, NewNode, NodeKind, StackStore};

/// Document version written by this crate.
pub const CURRENT_VERSION: u32 = 1;

/// Errors from loading or saving a project.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    /// The JSON text could not be parsed or produced.
    #[error("invalid project JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The document describes a stack that violates the forest invariants.
    #[error("invalid layer stack: {0}")]
    Stack(#[from] StackError),
    /// The document was written by an incompatible version.
    #[error("unsupported project version {found} (expected {})", CURRENT_VERSION)]
    UnsupportedVersion {
        /// Version found in the document.
        found: u32,
    },
}

/// A saved layer stack.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocument {
    /// Format version; see [`CURRENT_VERSION`].
    pub version: u32,
    /// Root collection in render order.
    pub layers: Vec<ProjectLayer>,
}

/// One node of a saved stack.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProjectLayer {
    /// A leaf layer.
    Leaf(LeafRecord),
    /// A group and its children.
    Group(GroupRecord),
}

/// Saved form of a leaf layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeafRecord {
    /// Node id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Own visibility flag.
    pub visible: bool,
    /// Data source reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Layer opacity.
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    /// Explicit z-index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
    /// Data bounds as `[x0, y0, x1, y1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extent: Option<[f64; 4]>,
}

/// Saved form of a group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupRecord {
    /// Node id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Own visibility flag.
    pub visible: bool,
    /// Children in render order.
    #[serde(default)]
    pub children: Vec<ProjectLayer>,
}

fn default_opacity() -> f32 {
    1.0
}

impl ProjectDocument {
    /// Captures the current state of `store`.
    #[must_use]
    pub fn snapshot(store: &StackStore) -> Self {
        Self {
            version: CURRENT_VERSION,
            layers: snapshot_collection(store.root()),
        }
    }

    /// Builds a fresh store from this document.
    ///
    /// Fails if the version is unknown or if an id occurs twice; nothing is
    /// returned in that case.
    pub fn restore(&self) -> Result<StackStore, ProjectError> {
        if self.version != CURRENT_VERSION {
            return Err(ProjectError::UnsupportedVersion {
                found: self.version,
            });
        }
        let mut store = StackStore::new();
        restore_collection(&mut store, &Collection::Root, &self.layers)?;
        Ok(store)
    }

    /// Encodes the document as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ProjectError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decodes a document from JSON.
    pub fn from_json(text: &str) -> Result<Self, ProjectError> {
        let doc: Self = serde_json::from_str(text)?;
        if doc.version != CURRENT_VERSION {
            return Err(ProjectError::UnsupportedVersion { found: doc.version });
        }
        Ok(doc)
    }

    /// Number of nodes in the document.
    #[must_use]
    pub fn len(&self) -> usize {
        fn count(layers: &[ProjectLayer]) -> usize {
            layers
                .iter()
                .map(|l| match l {
                    ProjectLayer::Leaf(_) => 1,
                    ProjectLayer::Group(g) => 1 + count(&g.children),
                })
                .sum()
        }
        count(&self.layers)
    }

    /// Returns whether the document has no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// Saves `store` as JSON.
pub fn save(store: &StackStore) -> Result<String, ProjectError> {
    ProjectDocument::snapshot(store).to_json()
}

/// Opens a store from JSON.
pub fn open(text: &str) -> Result<StackStore, ProjectError> {
    ProjectDocument::from_json(text)?.restore()
}

fn snapshot_collection(members: Children<'_>) -> Vec<ProjectLayer> {
    members
        .map(|n| match n.kind() {
            NodeKind::Leaf => {
                let meta = n.leaf_meta().cloned().unwrap_or_default();
                ProjectLayer::Leaf(LeafRecord {
                    id: n.id().as_str().to_owned(),
                    name: n.name().to_owned(),
                    visible: n.is_visible(),
                    source: meta.source,
                    opacity: meta.opacity,
                    z_index: meta.z_index,
                    extent: meta.extent.map(|r| [r.x0, r.y0, r.x1, r.y1]),
                })
            }
            NodeKind::Group => ProjectLayer::Group(GroupRecord {
                id: n.id().as_str().to_owned(),
                name: n.name().to_owned(),
                visible: n.is_visible(),
                children: snapshot_collection(n.children()),
            }),
        })
        .collect()
}

fn restore_collection(
    store: &mut StackStore,
    collection: &Collection,
    layers: &[ProjectLayer],
) -> Result<(), StackError> {
    for layer in layers {
        match layer {
            ProjectLayer::Leaf(leaf) => {
                let meta = LeafMeta {
                    source: leaf.source.clone(),
                    opacity: leaf.opacity,
                    z_index: leaf.z_index,
                    extent: leaf.extent.map(|[x0, y0, x1, y1]| Rect::new(x0, y0, x1, y1)),
                };
                let node = NewNode::leaf(leaf.id.as_str(), leaf.name.as_str())
                    .with_meta(meta)
                    .with_visible(leaf.visible);
                store.push(collection, node)?;
            }
            ProjectLayer::Group(group) => {
                let node = NewNode::group(group.id.as_str(), group.name.as_str())
                    .with_visible(group.visible);
                store.push(collection, node)?;
                let inner = Collection::Group(group.id.as_str().into());
                restore_collection(store, &inner, &group.children)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use layerstack_core::reorder::DropPosition;

    use super::*;

    /// root: [osm(hidden), g(roads, rivers)]
    fn sample() -> StackStore {
        let mut store = StackStore::new();
        let osm = LeafMeta {
            source: Some("xyz:https://tile.openstreetmap.org/{z}/{x}/{y}.png".into()),
            opacity: 0.75,
            z_index: Some(3),
            extent: Some(Rect::new(-180.0, -85.0, 180.0, 85.0)),
        };
        store
            .push(
                &Collection::Root,
                NewNode::leaf("osm", "OpenStreetMap")
                    .with_meta(osm)
                    .with_visible(false),
            )
            .unwrap();
        store
            .push(&Collection::Root, NewNode::group("g", "Vectors"))
            .unwrap();
        let g = Collection::Group("g".into());
        store.push(&g, NewNode::leaf("roads", "Roads")).unwrap();
        store.push(&g, NewNode::leaf("rivers", "Rivers")).unwrap();
        store
    }

    #[test]
    fn round_trip_is_identical() {
        let store = sample();
        let text = save(&store).unwrap();
        let reopened = open(&text).unwrap();
        assert_eq!(save(&reopened).unwrap(), text);

        assert_eq!(reopened.len(), 4);
        assert!(!reopened.node("osm").unwrap().is_visible());
        assert_eq!(
            reopened.collection_ids(&Collection::Group("g".into())).unwrap(),
            vec!["roads", "rivers"]
        );
        assert_eq!(
            reopened.node("osm").unwrap().leaf_meta(),
            store.node("osm").unwrap().leaf_meta()
        );
    }

    #[test]
    fn round_trip_after_edits() {
        let mut store = sample();
        let added = store.add_group(&["osm".into(), "rivers".into()], None);
        store
            .move_node("roads", added.group.as_str(), DropPosition::Below)
            .unwrap();
        let doc = ProjectDocument::snapshot(&store);
        let again = ProjectDocument::snapshot(&doc.restore().unwrap());
        assert_eq!(doc, again);
        assert_eq!(doc.len(), store.len());
    }

    #[test]
    fn records_are_tagged() {
        let json: serde_json::Value = serde_json::from_str(&save(&sample()).unwrap()).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(json["layers"][0]["type"], "leaf");
        assert_eq!(json["layers"][0]["extent"][2], 180.0);
        assert_eq!(json["layers"][1]["type"], "group");
        assert_eq!(json["layers"][1]["children"][1]["id"], "rivers");
        assert!(json["layers"][1]["children"][0].get("source").is_none());
    }

    #[test]
    fn minimal_leaf_uses_defaults() {
        let text = r#"{"version":1,"layers":[{"type":"leaf","id":"a","name":"A","visible":true}]}"#;
        let store = open(text).unwrap();
        let meta = store.node("a").unwrap().leaf_meta().unwrap();
        assert_eq!(meta, &LeafMeta::default());
    }

    #[test]
    fn rejects_unknown_version() {
        let text = r#"{"version":7,"layers":[]}"#;
        assert!(matches!(
            open(text),
            Err(ProjectError::UnsupportedVersion { found: 7 })
        ));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let text = r#"{"version":1,"layers":[
            {"type":"leaf","id":"a","name":"A","visible":true},
            {"type":"group","id":"g","name":"G","visible":true,"children":[
                {"type":"leaf","id":"a","name":"again","visible":true}
            ]}
        ]}"#;
        assert!(matches!(
            open(text),
            Err(ProjectError::Stack(StackError::DuplicateId(id))) if id == "a"
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(open("{"), Err(ProjectError::Json(_))));
        let empty = ProjectDocument::from_json(r#"{"version":1,"layers":[]}"#).unwrap();
        assert!(empty.is_empty());
    }
}
