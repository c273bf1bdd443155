//! Dependency Graph Module
//!
//! This module implements the package graph of a workspace and the cycle
//! search over it.
//!
//! # Architecture Overview
//!
//! The graph uses `petgraph` as its arena. Each workspace package is one node;
//! each declared dependency between two workspace packages is one edge,
//! labelled with its kind:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     DEPENDENCY GRAPH                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  ┌──────────┐ production ┌──────────┐ production ┌──────────┐   │
//! │  │   app    │───────────▶│    ui    │───────────▶│   core   │   │
//! │  └──────────┘            └──────────┘            └──────────┘   │
//! │       │                                               ▲         │
//! │       └───────────────────── development ─────────────┘         │
//! │                                                                 │
//! │  external: react@^18.2.0, lodash@^4.17.21 (kept on the nodes)   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Node Contents
//!
//! Every [`PackageNode`] keeps:
//! - four sorted internal-dependency lists (production, development, peer,
//!   optional), never naming a missing package and never itself
//! - four external-dependency maps (name → range)
//! - an `excluded` flag; exclusion affects reporting, not topology
//!
//! # Cycles
//!
//! [`CycleDetector`] runs an iterative Tarjan SCC over the union of the
//! internal lists and turns each cyclic component into a closed path:
//!
//! ```rust
//! use monodeps::graph::{CycleDetector, GraphBuilder};
//! use monodeps::types::{PackageInfo, WorkspaceData, WorkspaceType};
//!
//! let workspace = WorkspaceData::new(".", WorkspaceType::Npm)
//!     .with_package(PackageInfo::new("a", "1.0.0").with_dependency("b", "*"))
//!     .with_package(PackageInfo::new("b", "1.0.0").with_dependency("a", "*"));
//!
//! let graph = GraphBuilder::new().build(&workspace).unwrap();
//! let cycles = CycleDetector::new(&graph).detect();
//! assert_eq!(cycles[0].cycle, vec!["a", "b", "a"]);
//! ```

mod builder;
mod cycles;
mod types;

pub use builder::GraphBuilder;
pub use cycles::{sort_cycles, CycleDetector, PATH_SEARCH_BUDGET};
pub use types::{DependencyEdge, DependencyGraph, PackageNode};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PackageInfo, WorkspaceData, WorkspaceType};

    fn monorepo() -> WorkspaceData {
        WorkspaceData::new("/repo", WorkspaceType::Pnpm)
            .with_package(
                PackageInfo::new("@acme/app", "1.0.0")
                    .with_dependency("@acme/ui", "workspace:*")
                    .with_dependency("@acme/api", "workspace:*"),
            )
            .with_package(PackageInfo::new("@acme/ui", "1.0.0").with_dependency("@acme/core", "workspace:*"))
            .with_package(PackageInfo::new("@acme/api", "1.0.0").with_dependency("@acme/core", "workspace:*"))
            .with_package(PackageInfo::new("@acme/core", "1.0.0"))
    }

    #[test]
    fn test_dependents_and_dependencies() {
        let graph = GraphBuilder::new().build(&monorepo()).unwrap();
        assert_eq!(graph.dependents("@acme/core"), vec!["@acme/api", "@acme/ui"]);
        assert_eq!(graph.dependencies("@acme/app"), vec!["@acme/api", "@acme/ui"]);
        assert!(graph.dependents("missing").is_empty());
    }

    #[test]
    fn test_degrees() {
        let graph = GraphBuilder::new().build(&monorepo()).unwrap();
        assert_eq!(graph.in_degree("@acme/core"), 2);
        assert_eq!(graph.out_degree("@acme/app"), 2);
        assert_eq!(graph.out_degree("@acme/core"), 0);
    }

    #[test]
    fn test_build_is_byte_identical() {
        let first = GraphBuilder::new().build(&monorepo()).unwrap();
        let second = GraphBuilder::new().build(&monorepo()).unwrap();

        let serialize = |g: &DependencyGraph| {
            let nodes: Vec<&PackageNode> = g.nodes().collect();
            let edges: Vec<&DependencyEdge> = g.edges().collect();
            serde_json::to_string(&(nodes, edges)).unwrap()
        };
        assert_eq!(serialize(&first), serialize(&second));
    }

    #[test]
    fn test_no_cycles_in_dag() {
        let graph = GraphBuilder::new().build(&monorepo()).unwrap();
        assert!(CycleDetector::new(&graph).detect().is_empty());
    }
}
