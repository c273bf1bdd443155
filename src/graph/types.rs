//! Graph type definitions.
//!
//! This module defines the core types used in the dependency graph:
//! - `DependencyGraph`: the package arena plus its edges
//! - `PackageNode`: one workspace package with classified dependencies
//! - `DependencyEdge`: a declared dependency between two workspace packages

use crate::types::{DependencyType, WorkspaceType};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// The dependency graph structure.
///
/// Packages live in a petgraph arena addressed by stable integer indices;
/// names resolve to indices through an ordered map. Nodes are inserted in
/// ascending name order and edges in (from, to, kind) order, so iteration is
/// deterministic.
///
/// # Structure
///
/// ```text
/// DependencyGraph
/// ├── inner: DiGraph<PackageNode, DependencyEdge>  // arena + edges
/// ├── node_index: BTreeMap<String, NodeIndex>      // name → index
/// ├── root_path: String
/// └── workspace_type: WorkspaceType
/// ```
///
/// The graph is built once by [`GraphBuilder`](super::GraphBuilder) and is
/// read-only afterwards, so it can be shared across threads by reference.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// The underlying petgraph directed graph
    inner: DiGraph<PackageNode, DependencyEdge>,

    /// Index from package name to petgraph NodeIndex
    node_index: BTreeMap<String, NodeIndex>,

    /// Workspace root
    root_path: String,

    /// Package manager
    workspace_type: WorkspaceType,
}

impl DependencyGraph {
    /// Create a new empty dependency graph.
    #[must_use]
    pub fn new(root_path: impl Into<String>, workspace_type: WorkspaceType) -> Self {
        Self {
            root_path: root_path.into(),
            workspace_type,
            ..Self::default()
        }
    }

    /// Add a package node. Returns `None` if the name is already taken.
    pub(crate) fn add_package(&mut self, node: PackageNode) -> Option<NodeIndex> {
        if self.node_index.contains_key(&node.name) {
            return None;
        }
        let name = node.name.clone();
        let idx = self.inner.add_node(node);
        self.node_index.insert(name, idx);
        Some(idx)
    }

    /// Add an edge between two existing, distinct packages.
    ///
    /// Returns false if either endpoint is missing or the edge is a
    /// self-reference.
    pub(crate) fn add_edge(&mut self, edge: DependencyEdge) -> bool {
        if edge.from == edge.to {
            return false;
        }
        let (Some(&from), Some(&to)) = (self.node_index.get(&edge.from), self.node_index.get(&edge.to))
        else {
            return false;
        };
        self.inner.add_edge(from, to, edge);
        true
    }

    /// Get a package by name.
    #[must_use]
    pub fn node(&self, name: &str) -> Option<&PackageNode> {
        self.node_index.get(name).map(|&idx| &self.inner[idx])
    }

    /// Whether a package with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.node_index.contains_key(name)
    }

    /// Arena index of a package.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<NodeIndex> {
        self.node_index.get(name).copied()
    }

    /// Get the number of nodes in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Get the number of edges in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// True when the workspace has no packages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.node_count() == 0
    }

    /// Package names in ascending order.
    pub fn package_names(&self) -> impl Iterator<Item = &str> {
        self.node_index.keys().map(String::as_str)
    }

    /// Packages in ascending name order.
    pub fn nodes(&self) -> impl Iterator<Item = &PackageNode> {
        self.node_index.values().map(|&idx| &self.inner[idx])
    }

    /// Edges in (from, to, kind) order.
    pub fn edges(&self) -> impl Iterator<Item = &DependencyEdge> {
        self.inner.edge_weights()
    }

    /// Packages flagged by exclusion patterns, ascending.
    #[must_use]
    pub fn excluded_packages(&self) -> Vec<&str> {
        self.nodes()
            .filter(|n| n.excluded)
            .map(|n| n.name.as_str())
            .collect()
    }

    /// Distinct packages that depend on `name` (incoming edges), sorted.
    #[must_use]
    pub fn dependents(&self, name: &str) -> Vec<&str> {
        self.neighbors(name, Direction::Incoming)
    }

    /// Distinct packages that `name` depends on (outgoing edges), sorted.
    #[must_use]
    pub fn dependencies(&self, name: &str) -> Vec<&str> {
        self.neighbors(name, Direction::Outgoing)
    }

    fn neighbors(&self, name: &str, direction: Direction) -> Vec<&str> {
        let Some(&idx) = self.node_index.get(name) else {
            return Vec::new();
        };
        let unique: BTreeSet<&str> = self
            .inner
            .neighbors_directed(idx, direction)
            .map(|n| self.inner[n].name.as_str())
            .collect();
        unique.into_iter().collect()
    }

    /// Kinds of every declared edge from `from` to `to`.
    #[must_use]
    pub fn edge_types(&self, from: &str, to: &str) -> Vec<DependencyType> {
        let (Some(&a), Some(&b)) = (self.node_index.get(from), self.node_index.get(to)) else {
            return Vec::new();
        };
        let mut kinds: Vec<DependencyType> = self
            .inner
            .edges_connecting(a, b)
            .map(|e| e.weight().dependency_type)
            .collect();
        kinds.sort();
        kinds
    }

    /// Number of edges pointing into `name`.
    #[must_use]
    pub fn in_degree(&self, name: &str) -> usize {
        self.node_index.get(name).map_or(0, |&idx| {
            self.inner.edges_directed(idx, Direction::Incoming).count()
        })
    }

    /// Number of edges leaving `name`.
    #[must_use]
    pub fn out_degree(&self, name: &str) -> usize {
        self.node_index.get(name).map_or(0, |&idx| {
            self.inner
                .edges_directed(idx, Direction::Outgoing)
                .filter(|e| e.target() != idx)
                .count()
        })
    }

    /// Workspace root.
    #[must_use]
    pub fn root_path(&self) -> &str {
        &self.root_path
    }

    /// Package manager.
    #[must_use]
    pub const fn workspace_type(&self) -> WorkspaceType {
        self.workspace_type
    }

    /// Get the underlying petgraph for advanced operations.
    #[must_use]
    pub const fn inner(&self) -> &DiGraph<PackageNode, DependencyEdge> {
        &self.inner
    }
}

/// A workspace package with its dependencies split into internal (other
/// workspace packages) and external (registry packages).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageNode {
    /// Package name
    pub name: String,
    /// Declared version
    pub version: String,
    /// Workspace-relative path
    pub path: String,

    /// Internal production dependencies, sorted
    pub internal_dependencies: Vec<String>,
    /// Internal development dependencies, sorted
    pub internal_dev_dependencies: Vec<String>,
    /// Internal peer dependencies, sorted
    pub internal_peer_dependencies: Vec<String>,
    /// Internal optional dependencies, sorted
    pub internal_optional_dependencies: Vec<String>,

    /// External production dependencies
    pub external_dependencies: BTreeMap<String, String>,
    /// External development dependencies
    pub external_dev_dependencies: BTreeMap<String, String>,
    /// External peer dependencies
    pub external_peer_dependencies: BTreeMap<String, String>,
    /// External optional dependencies
    pub external_optional_dependencies: BTreeMap<String, String>,

    /// Matched an exclusion pattern
    pub excluded: bool,
}

impl PackageNode {
    /// Internal dependencies of one kind.
    #[must_use]
    pub fn internal(&self, kind: DependencyType) -> &[String] {
        match kind {
            DependencyType::Production => &self.internal_dependencies,
            DependencyType::Development => &self.internal_dev_dependencies,
            DependencyType::Peer => &self.internal_peer_dependencies,
            DependencyType::Optional => &self.internal_optional_dependencies,
        }
    }

    pub(crate) fn internal_mut(&mut self, kind: DependencyType) -> &mut Vec<String> {
        match kind {
            DependencyType::Production => &mut self.internal_dependencies,
            DependencyType::Development => &mut self.internal_dev_dependencies,
            DependencyType::Peer => &mut self.internal_peer_dependencies,
            DependencyType::Optional => &mut self.internal_optional_dependencies,
        }
    }

    /// External dependencies of one kind.
    #[must_use]
    pub const fn external(&self, kind: DependencyType) -> &BTreeMap<String, String> {
        match kind {
            DependencyType::Production => &self.external_dependencies,
            DependencyType::Development => &self.external_dev_dependencies,
            DependencyType::Peer => &self.external_peer_dependencies,
            DependencyType::Optional => &self.external_optional_dependencies,
        }
    }

    pub(crate) fn external_mut(&mut self, kind: DependencyType) -> &mut BTreeMap<String, String> {
        match kind {
            DependencyType::Production => &mut self.external_dependencies,
            DependencyType::Development => &mut self.external_dev_dependencies,
            DependencyType::Peer => &mut self.external_peer_dependencies,
            DependencyType::Optional => &mut self.external_optional_dependencies,
        }
    }

    /// Union of the four internal lists, sorted.
    #[must_use]
    pub fn all_internal(&self) -> BTreeSet<&str> {
        DependencyType::ALL
            .iter()
            .flat_map(|&kind| self.internal(kind))
            .map(String::as_str)
            .collect()
    }

    /// Distinct external dependency names across all kinds.
    #[must_use]
    pub fn external_names(&self) -> BTreeSet<&str> {
        DependencyType::ALL
            .iter()
            .flat_map(|&kind| self.external(kind).keys())
            .map(String::as_str)
            .collect()
    }

    /// Kind of the dependency on `target`, checking production, development,
    /// peer, then optional.
    #[must_use]
    pub fn dependency_type_to(&self, target: &str) -> Option<DependencyType> {
        DependencyType::ALL
            .into_iter()
            .find(|&kind| self.internal(kind).iter().any(|d| d == target))
    }
}

/// A declared dependency between two workspace packages.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyEdge {
    /// Depending package
    pub from: String,
    /// Dependency
    pub to: String,
    /// Declared kind
    pub dependency_type: DependencyType,
    /// Declared range
    pub version_range: String,
}

impl std::fmt::Display for DependencyEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {} ({})", self.from, self.to, self.dependency_type)
    }
}
