//! Artifact graph built while walking resolved dependency trees.
//!
//! Nodes live in a petgraph arena and are deduplicated by [`ArtifactKey`].
//! Every node records the node it was first reached from (its parent); the
//! graph edges mirror those parent links, so the graph is always a forest
//! rooted at the first-level dependencies of the walked configuration.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::models::{ArtifactCoords, ArtifactKey};

/// Per-node flag bitset. Flags are only ever added within one walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NodeFlags(u8);

impl NodeFlags {
    /// Children of the node have been walked
    pub const VISITED: Self = Self(0b001);
    /// First extension found on a root-to-node path
    pub const TOP_LEVEL_RUNTIME_EXTENSION_ARTIFACT: Self = Self(0b010);
    /// Added by conditional resolution rather than by the base configuration
    pub const CONDITIONAL: Self = Self(0b100);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Set `other`, returning whether any of its bits were newly set.
    pub fn insert(&mut self, other: Self) -> bool {
        let before = self.0;
        self.0 |= other.0;
        before != self.0
    }
}

/// One resolved artifact occurrence.
#[derive(Debug, Clone)]
pub struct ArtifactNode {
    pub key: ArtifactKey,
    /// Coordinates of the first occurrence (first version wins)
    pub coords: ArtifactCoords,
    /// Produced by a workspace module
    pub local: bool,
    pub flags: NodeFlags,
    /// Extension id when the artifact is an extension
    pub extension: Option<ArtifactKey>,
    /// Node this artifact was reached from; `None` for first-level dependencies
    pub parent: Option<NodeIndex>,
}

impl ArtifactNode {
    pub fn is_extension(&self) -> bool {
        self.extension.is_some()
    }

    pub fn has_flag(&self, flag: NodeFlags) -> bool {
        self.flags.contains(flag)
    }
}

impl fmt::Display for ArtifactNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.coords)?;
        let mut markers = Vec::new();
        if self.local {
            markers.push("local");
        }
        if self.is_extension() {
            markers.push("extension");
        }
        if self.has_flag(NodeFlags::TOP_LEVEL_RUNTIME_EXTENSION_ARTIFACT) {
            markers.push("top-level");
        }
        if self.has_flag(NodeFlags::CONDITIONAL) {
            markers.push("conditional");
        }
        if !markers.is_empty() {
            write!(f, " [{}]", markers.join(", "))?;
        }
        Ok(())
    }
}

/// Serializable nested view of the graph.
#[derive(Debug, Clone, Serialize)]
pub struct TreeEntry {
    pub coords: ArtifactCoords,
    pub local: bool,
    pub extension: bool,
    pub top_level: bool,
    pub conditional: bool,
    pub children: Vec<TreeEntry>,
}

/// Artifact graph for one resolution run.
#[derive(Debug, Clone, Default)]
pub struct ArtifactGraph {
    /// The underlying directed graph, edges point from parent to child.
    graph: DiGraph<ArtifactNode, ()>,
    /// Map from artifact keys to their graph indices.
    node_map: HashMap<ArtifactKey, NodeIndex>,
}

impl ArtifactGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every node.
    pub fn reset(&mut self) {
        self.graph.clear();
        self.node_map.clear();
    }

    /// Return the node for `coords.key`, creating it under `parent` if missing.
    ///
    /// The boolean is `true` when the node was created by this call; callers
    /// use it to run the one-time extension lookup. Existing nodes keep their
    /// coordinates, locality and parent.
    pub fn upsert_node(
        &mut self,
        coords: &ArtifactCoords,
        local: bool,
        parent: Option<NodeIndex>,
    ) -> (NodeIndex, bool) {
        if let Some(&index) = self.node_map.get(&coords.key) {
            return (index, false);
        }

        let index = self.graph.add_node(ArtifactNode {
            key: coords.key.clone(),
            coords: coords.clone(),
            local,
            flags: NodeFlags::empty(),
            extension: None,
            parent,
        });
        self.node_map.insert(coords.key.clone(), index);
        if let Some(parent) = parent {
            self.graph.add_edge(parent, index, ());
        }
        (index, true)
    }

    /// Set VISITED, returning whether it was newly set.
    pub fn mark_visited(&mut self, index: NodeIndex) -> bool {
        self.graph[index].flags.insert(NodeFlags::VISITED)
    }

    pub fn set_flag(&mut self, index: NodeIndex, flag: NodeFlags) -> bool {
        self.graph[index].flags.insert(flag)
    }

    pub fn set_extension(&mut self, index: NodeIndex, extension: Option<ArtifactKey>) {
        self.graph[index].extension = extension;
    }

    /// Re-attach a node under another parent.
    pub fn set_parent(&mut self, index: NodeIndex, parent: Option<NodeIndex>) {
        if self.graph[index].parent == parent || Some(index) == parent {
            return;
        }
        let incoming: Vec<_> =
            self.graph.edges_directed(index, Direction::Incoming).map(|e| e.id()).collect();
        for edge in incoming {
            self.graph.remove_edge(edge);
        }
        if let Some(parent) = parent {
            self.graph.add_edge(parent, index, ());
        }
        self.graph[index].parent = parent;
    }

    /// Whether an artifact with this key was ever upserted.
    pub fn contains(&self, key: &ArtifactKey) -> bool {
        self.node_map.contains_key(key)
    }

    pub fn find(&self, key: &ArtifactKey) -> Option<NodeIndex> {
        self.node_map.get(key).copied()
    }

    pub fn node(&self, index: NodeIndex) -> &ArtifactNode {
        &self.graph[index]
    }

    pub fn get(&self, key: &ArtifactKey) -> Option<&ArtifactNode> {
        self.find(key).map(|index| &self.graph[index])
    }

    pub fn parent(&self, index: NodeIndex) -> Option<&ArtifactNode> {
        self.graph[index].parent.map(|parent| &self.graph[parent])
    }

    /// Nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &ArtifactNode)> {
        self.graph.node_indices().map(move |index| (index, &self.graph[index]))
    }

    /// Direct children in creation order.
    pub fn children(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let mut children: Vec<_> = self.graph.neighbors(index).collect();
        children.sort();
        children
    }

    /// First-level nodes in creation order.
    pub fn roots(&self) -> Vec<NodeIndex> {
        self.graph.node_indices().filter(|index| self.graph[*index].parent.is_none()).collect()
    }

    /// Sorted keys of every node.
    pub fn keys(&self) -> Vec<ArtifactKey> {
        let mut keys: Vec<_> = self.node_map.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Build a human-readable tree of the whole graph.
    pub fn to_tree_string(&self) -> String {
        let mut result = String::new();
        let mut visited = HashSet::new();
        let roots = self.roots();
        for (i, root) in roots.iter().enumerate() {
            self.build_tree_string(*root, &mut result, "", i == roots.len() - 1, &mut visited);
        }
        result
    }

    fn build_tree_string(
        &self,
        index: NodeIndex,
        result: &mut String,
        prefix: &str,
        is_last: bool,
        visited: &mut HashSet<NodeIndex>,
    ) {
        let connector = if is_last {
            "└── "
        } else {
            "├── "
        };
        result.push_str(&format!("{}{}{}\n", prefix, connector, self.graph[index]));

        let child_prefix = if is_last {
            format!("{prefix}    ")
        } else {
            format!("{prefix}│   ")
        };

        if !visited.insert(index) {
            result.push_str(&format!("{child_prefix}└── (circular reference)\n"));
            return;
        }

        let children = self.children(index);
        for (i, child) in children.iter().enumerate() {
            let is_last_child = i == children.len() - 1;
            self.build_tree_string(*child, result, &child_prefix, is_last_child, visited);
        }
    }

    /// Nested, serializable view rooted at the first-level nodes.
    pub fn to_tree(&self) -> Vec<TreeEntry> {
        let mut visited = HashSet::new();
        self.roots().into_iter().filter_map(|root| self.tree_entry(root, &mut visited)).collect()
    }

    fn tree_entry(&self, index: NodeIndex, visited: &mut HashSet<NodeIndex>) -> Option<TreeEntry> {
        if !visited.insert(index) {
            return None;
        }
        let node = &self.graph[index];
        Some(TreeEntry {
            coords: node.coords.clone(),
            local: node.local,
            extension: node.is_extension(),
            top_level: node.has_flag(NodeFlags::TOP_LEVEL_RUNTIME_EXTENSION_ARTIFACT),
            conditional: node.has_flag(NodeFlags::CONDITIONAL),
            children: self
                .children(index)
                .into_iter()
                .filter_map(|child| self.tree_entry(child, visited))
                .collect(),
        })
    }
}
