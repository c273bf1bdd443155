//! Graph builder implementation.
//!
//! This module provides the `GraphBuilder` which constructs a `DependencyGraph`
//! from a parsed workspace.

use crate::err;
use crate::error::Result;
use crate::exclusion::ExclusionMatcher;
use crate::graph::types::{DependencyEdge, DependencyGraph, PackageNode};
use crate::types::{DependencyType, PackageInfo, WorkspaceData};
use std::collections::BTreeMap;

/// Builder for constructing dependency graphs.
///
/// # Algorithm
///
/// 1. **Validation Phase**:
///    - Reject packages with an empty name
///    - Reject two entries resolving to the same name
///
/// 2. **Node Creation Phase**:
///    - Insert packages in ascending name order
///    - Split each dependency map into internal and external parts
///    - Drop self-references
///    - Flag packages matching an exclusion pattern (by name or path)
///
/// 3. **Edge Creation Phase**:
///    - Emit one edge per internal dependency and kind
///    - Sort by (from, to, kind) before insertion
///
/// # Example
///
/// ```rust
/// use monodeps::graph::GraphBuilder;
/// use monodeps::types::{PackageInfo, WorkspaceData, WorkspaceType};
///
/// let workspace = WorkspaceData::new("/repo", WorkspaceType::Pnpm)
///     .with_package(PackageInfo::new("ui", "1.0.0").with_dependency("core", "workspace:*"))
///     .with_package(PackageInfo::new("core", "1.0.0"));
///
/// let graph = GraphBuilder::new().build(&workspace).unwrap();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct GraphBuilder<'a> {
    /// Patterns flagging packages as excluded
    exclusions: Option<&'a ExclusionMatcher>,
}

impl<'a> GraphBuilder<'a> {
    /// Create a new graph builder.
    #[must_use]
    pub fn new() -> Self {
        Self { exclusions: None }
    }

    /// Flag packages matching these patterns.
    #[must_use]
    pub fn with_exclusions(mut self, exclusions: &'a ExclusionMatcher) -> Self {
        self.exclusions = Some(exclusions);
        self
    }

    /// Build a dependency graph from a workspace.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if a package has an empty name or two packages
    /// share a name.
    pub fn build(&self, workspace: &WorkspaceData) -> Result<DependencyGraph> {
        tracing::debug!(
            packages = workspace.packages.len(),
            workspace_type = %workspace.workspace_type,
            "Starting graph construction"
        );

        // Phase 1: Validate and index packages by their declared name
        tracing::debug!("Phase 1: Validating package names");
        let packages = Self::index_packages(workspace)?;

        // Phase 2: Add all package nodes
        tracing::debug!("Phase 2: Adding package nodes");
        let mut graph = DependencyGraph::new(&workspace.root_path, workspace.workspace_type);
        let mut edges = Vec::new();
        let mut external_count = 0;
        for (name, package) in &packages {
            let node = self.create_node(name, package, &packages);
            external_count += node.external_names().len();

            for kind in DependencyType::ALL {
                for target in node.internal(kind) {
                    let version_range = package
                        .dependencies_of(kind)
                        .get(target)
                        .cloned()
                        .unwrap_or_default();
                    edges.push(DependencyEdge {
                        from: name.to_string(),
                        to: target.clone(),
                        dependency_type: kind,
                        version_range,
                    });
                }
            }

            if graph.add_package(node).is_none() {
                return Err(err!(Internal {
                    message: format!("package '{name}' inserted twice"),
                }));
            }
        }
        tracing::debug!(
            nodes = graph.node_count(),
            excluded = graph.excluded_packages().len(),
            external_dependencies = external_count,
            "Package nodes added"
        );

        // Phase 3: Create edges
        tracing::debug!("Phase 3: Creating edges");
        edges.sort();
        for edge in edges {
            graph.add_edge(edge);
        }

        tracing::info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Graph construction complete"
        );

        Ok(graph)
    }

    /// Re-key packages by trimmed declared name, rejecting empty and
    /// duplicate names.
    fn index_packages(workspace: &WorkspaceData) -> Result<BTreeMap<&str, &PackageInfo>> {
        let mut packages = BTreeMap::new();

        for (key, package) in &workspace.packages {
            let name = package.name.trim();
            if name.is_empty() {
                return Err(err!(InvalidInput {
                    message: format!("package at key '{key}' has an empty name"),
                }));
            }
            if name != key {
                tracing::warn!(key = %key, name = %name, "Package key does not match its name");
            }
            if packages.insert(name, package).is_some() {
                return Err(err!(InvalidInput {
                    message: format!("duplicate package name '{name}'"),
                }));
            }
        }

        Ok(packages)
    }

    fn create_node(
        &self,
        name: &str,
        package: &PackageInfo,
        packages: &BTreeMap<&str, &PackageInfo>,
    ) -> PackageNode {
        let mut node = PackageNode {
            name: name.to_string(),
            version: package.version.clone(),
            path: package.path.clone(),
            excluded: self.is_excluded(name, &package.path),
            ..PackageNode::default()
        };

        for kind in DependencyType::ALL {
            for (dep, range) in package.dependencies_of(kind) {
                if dep == name {
                    tracing::debug!(package = %name, kind = %kind, "Dropping self-reference");
                    continue;
                }
                if packages.contains_key(dep.as_str()) {
                    node.internal_mut(kind).push(dep.clone());
                } else {
                    node.external_mut(kind).insert(dep.clone(), range.clone());
                }
            }
            let internal = node.internal_mut(kind);
            internal.sort();
            internal.dedup();
        }

        node
    }

    fn is_excluded(&self, name: &str, path: &str) -> bool {
        self.exclusions.is_some_and(|matcher| {
            matcher.is_excluded(name) || (!path.is_empty() && matcher.is_excluded(path))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WorkspaceType;
    use pretty_assertions::assert_eq;

    fn workspace() -> WorkspaceData {
        WorkspaceData::new("/repo", WorkspaceType::Yarn)
            .with_package(
                PackageInfo::new("app", "1.0.0")
                    .with_dependency("ui", "workspace:*")
                    .with_dependency("react", "^18.2.0")
                    .with_dev_dependency("core", "workspace:*"),
            )
            .with_package(
                PackageInfo::new("ui", "1.0.0")
                    .with_dependency("core", "workspace:*")
                    .with_dependency("ui", "workspace:*"),
            )
            .with_package(PackageInfo::new("core", "1.0.0").with_dependency("lodash", "^4.17.21"))
    }

    #[test]
    fn test_build_empty_graph() {
        let graph = GraphBuilder::new()
            .build(&WorkspaceData::default())
            .unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_classifies_internal_and_external() {
        let graph = GraphBuilder::new().build(&workspace()).unwrap();
        let app = graph.node("app").unwrap();
        assert_eq!(app.internal_dependencies, vec!["ui".to_string()]);
        assert_eq!(app.internal_dev_dependencies, vec!["core".to_string()]);
        assert_eq!(app.external_dependencies["react"], "^18.2.0");
        assert!(graph.node("ui").unwrap().internal_dependencies.contains(&"core".to_string()));
    }

    #[test]
    fn test_self_reference_dropped() {
        let graph = GraphBuilder::new().build(&workspace()).unwrap();
        let ui = graph.node("ui").unwrap();
        assert!(!ui.all_internal().contains("ui"));
        assert!(!ui.external_dependencies.contains_key("ui"));
        assert!(graph.edges().all(|e| e.from != e.to));
    }

    #[test]
    fn test_edges_sorted_and_internal() {
        let graph = GraphBuilder::new().build(&workspace()).unwrap();
        let edges: Vec<(String, String, DependencyType)> = graph
            .edges()
            .map(|e| (e.from.clone(), e.to.clone(), e.dependency_type))
            .collect();
        assert_eq!(
            edges,
            vec![
                ("app".into(), "core".into(), DependencyType::Development),
                ("app".into(), "ui".into(), DependencyType::Production),
                ("ui".into(), "core".into(), DependencyType::Production),
            ]
        );
        for edge in graph.edges() {
            assert!(graph.contains(&edge.from));
            assert!(graph.contains(&edge.to));
        }
    }

    #[test]
    fn test_nodes_in_name_order() {
        let graph = GraphBuilder::new().build(&workspace()).unwrap();
        let names: Vec<&str> = graph.package_names().collect();
        assert_eq!(names, vec!["app", "core", "ui"]);
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut ws = workspace();
        ws.packages.insert("blank".into(), PackageInfo::new("  ", "1.0.0"));
        let err = GraphBuilder::new().build(&ws).unwrap_err();
        assert_eq!(err.code(), "INVALID_INPUT");
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut ws = workspace();
        ws.packages.insert("core-copy".into(), PackageInfo::new("core", "2.0.0"));
        let err = GraphBuilder::new().build(&ws).unwrap_err();
        assert_eq!(err.code(), "INVALID_INPUT");
        assert!(err.message().contains("duplicate"));
    }

    #[test]
    fn test_exclusion_flags_by_name_and_path() {
        let ws = workspace().with_package(
            PackageInfo::new("old-tools", "0.1.0").with_path("packages/deprecated-tools"),
        );
        let matcher = ExclusionMatcher::new(&["packages/deprecated-*", "core"]).unwrap();
        let graph = GraphBuilder::new().with_exclusions(&matcher).build(&ws).unwrap();

        assert!(graph.node("old-tools").unwrap().excluded);
        assert!(graph.node("core").unwrap().excluded);
        assert!(!graph.node("app").unwrap().excluded);
        // Excluded packages stay in the topology
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.excluded_packages(), vec!["core", "old-tools"]);
    }
}
