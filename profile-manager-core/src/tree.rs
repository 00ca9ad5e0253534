//! Profile tree model.
//!
//! Profiles live in an arena addressed by [`NodeId`]. Each node is owned by
//! exactly one parent (or the root mapping) and knows its children by local
//! name. Nodes are never shared between parents, and the arena is only ever
//! appended to, so a `NodeId` stays valid for the lifetime of its tree.
//!
//! On disk the tree is a nested mapping keyed by profile name at each level:
//!
//! ```yaml
//! work:
//!   settings: { editor.tabSize: 2 }
//!   components: [rust-lang.rust-analyzer]
//!   children:
//!     backend:
//!       settings: { editor.rulers: [100] }
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

use crate::path::SEPARATOR;
use crate::value::{Components, Settings};

/// Stable index of a node inside a [`ProfileTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// The settings and components stored on one node.
///
/// Only entries not already implied by an ancestor are kept here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Setting overrides relative to the ancestors.
    #[serde(default)]
    pub settings: Settings,

    /// Components added relative to the ancestors.
    #[serde(default, alias = "extensions")]
    pub components: Components,
}

impl Profile {
    pub fn is_empty(&self) -> bool {
        self.settings.is_empty() && self.components.is_empty()
    }
}

/// A node of the arena: a profile plus its place in the hierarchy.
#[derive(Debug, Clone)]
pub struct ProfileNode {
    name: String,
    parent: Option<NodeId>,
    children: BTreeMap<String, NodeId>,
    pub profile: Profile,
}

impl ProfileNode {
    /// Local name (a single path segment).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Direct children keyed by local name.
    pub fn children(&self) -> &BTreeMap<String, NodeId> {
        &self.children
    }
}

/// All profiles, keyed by top-level name.
#[derive(Debug, Clone, Default)]
pub struct ProfileTree {
    nodes: Vec<ProfileNode>,
    roots: BTreeMap<String, NodeId>,
}

impl ProfileTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no top-level profile exists.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of profiles at every depth.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Top-level profiles keyed by name.
    pub fn roots(&self) -> &BTreeMap<String, NodeId> {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> &ProfileNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut ProfileNode {
        &mut self.nodes[id.0]
    }

    pub fn profile(&self, id: NodeId) -> &Profile {
        &self.nodes[id.0].profile
    }

    /// Look up a child by name. `parent == None` looks in the root mapping.
    pub fn child(&self, parent: Option<NodeId>, name: &str) -> Option<NodeId> {
        match parent {
            None => self.roots.get(name).copied(),
            Some(id) => self.nodes[id.0].children.get(name).copied(),
        }
    }

    /// Store `profile` under `name`.
    ///
    /// An existing node keeps its children and only has its profile replaced.
    pub fn upsert(&mut self, parent: Option<NodeId>, name: &str, profile: Profile) -> NodeId {
        if let Some(id) = self.child(parent, name) {
            self.nodes[id.0].profile = profile;
            return id;
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(ProfileNode {
            name: name.to_string(),
            parent,
            children: BTreeMap::new(),
            profile,
        });
        match parent {
            None => self.roots.insert(name.to_string(), id),
            Some(parent) => self.nodes[parent.0].children.insert(name.to_string(), id),
        };
        id
    }

    /// Every descendant of `id`, depth-first, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut pending: Vec<NodeId> = self.nodes[id.0].children.values().rev().copied().collect();
        while let Some(next) = pending.pop() {
            out.push(next);
            pending.extend(self.nodes[next.0].children.values().rev().copied());
        }
        out
    }

    /// Dotted path of a node.
    pub fn path_of(&self, id: NodeId) -> String {
        let mut names = vec![self.nodes[id.0].name.as_str()];
        let mut current = self.nodes[id.0].parent;
        while let Some(parent) = current {
            names.push(self.nodes[parent.0].name.as_str());
            current = self.nodes[parent.0].parent;
        }
        names.reverse();
        names.join(".")
    }

    /// Depth-first walk of the whole tree as `(path, depth, id)`, siblings
    /// in name order.
    pub fn walk(&self) -> Vec<(String, usize, NodeId)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut pending: Vec<(NodeId, usize)> =
            self.roots.values().rev().map(|id| (*id, 0)).collect();
        while let Some((id, depth)) = pending.pop() {
            out.push((self.path_of(id), depth, id));
            pending.extend(
                self.nodes[id.0]
                    .children
                    .values()
                    .rev()
                    .map(|child| (*child, depth + 1)),
            );
        }
        out
    }

    fn to_document(&self) -> BTreeMap<String, ProfileDocument> {
        self.roots
            .iter()
            .map(|(name, id)| (name.clone(), self.document_of(*id)))
            .collect()
    }

    fn document_of(&self, id: NodeId) -> ProfileDocument {
        let node = &self.nodes[id.0];
        ProfileDocument {
            settings: node.profile.settings.clone(),
            components: node.profile.components.clone(),
            children: node
                .children
                .iter()
                .map(|(name, child)| (name.clone(), self.document_of(*child)))
                .collect(),
        }
    }

    fn from_document(document: BTreeMap<String, ProfileDocument>) -> Result<Self, String> {
        let mut tree = Self::new();
        let mut pending: Vec<(Option<NodeId>, String, ProfileDocument)> = document
            .into_iter()
            .map(|(name, doc)| (None, name, doc))
            .collect();
        while let Some((parent, name, doc)) = pending.pop() {
            if name.is_empty() || name.contains(SEPARATOR) {
                return Err(format!(
                    "profile name \"{name}\" must be non-empty and must not contain '.'"
                ));
            }
            let id = tree.upsert(
                parent,
                &name,
                Profile {
                    settings: doc.settings,
                    components: doc.components,
                },
            );
            pending.extend(
                doc.children
                    .into_iter()
                    .map(|(child, child_doc)| (Some(id), child, child_doc)),
            );
        }
        Ok(tree)
    }
}

impl PartialEq for ProfileTree {
    /// Trees are equal when they serialize identically; arena order is irrelevant.
    fn eq(&self, other: &Self) -> bool {
        self.to_document() == other.to_document()
    }
}

/// Nested persisted form of one profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct ProfileDocument {
    #[serde(default)]
    settings: Settings,

    #[serde(default, alias = "extensions")]
    components: Components,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    children: BTreeMap<String, ProfileDocument>,
}

impl Serialize for ProfileTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_document().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ProfileTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let document = BTreeMap::<String, ProfileDocument>::deserialize(deserializer)?;
        Self::from_document(document).map_err(serde::de::Error::custom)
    }
}
