//! # MonoDeps
//!
//! A dependency-graph analysis engine for JavaScript/TypeScript monorepos.
//!
//! MonoDeps takes an already-parsed description of a workspace (packages,
//! their declared dependencies, optional import traces) and reports circular
//! dependencies between workspace packages, version conflicts between
//! external dependencies, and a health score, together with concrete
//! guidance for breaking each cycle.
//!
//! ## Features
//!
//! - **Dependency graph**: workspace packages as nodes, declared
//!   dependencies between them as typed edges
//! - **Cycle detection**: iterative Tarjan SCC, deterministic paths and
//!   ordering
//! - **Conflict detection**: semver-aware comparison of external dependency
//!   ranges
//! - **Per-cycle diagnostics**: root cause, refactoring complexity, impact
//! - **Fix pipeline**: ranked strategies with step-by-step guides and
//!   before/after diagrams
//! - **Health score**: weighted composite over cycles, conflicts, depth and
//!   coupling
//! - **Output**: JSON, plain text, and a `{data, error}` JSON envelope for
//!   embedders
//!
//! ## Example
//!
//! ```rust,no_run
//! use monodeps::{Analyzer, Config, ReportFormat};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let workspace = monodeps::load_workspace("workspace.json").await?;
//!
//!     let result = Analyzer::new(&config).analyze(&workspace)?;
//!
//!     let report = monodeps::reporter::Reporter::new(&config).generate(&result, ReportFormat::Text)?;
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod envelope;
pub mod error;
pub mod exclusion;
pub mod fix;
pub mod graph;
pub mod reporter;
pub mod semver_utils;
pub mod types;

// Re-export commonly used types at crate root
pub use analyzer::Analyzer;
pub use config::Config;
pub use error::{MonodepsError, Result};
pub use types::{
    AnalysisResult, CircularDependencyInfo, HealthScoreResult, PackageInfo, ReportFormat,
    Severity, VersionConflictInfo, WorkspaceData, WorkspaceType,
};

use std::path::Path;

/// Read a workspace document from disk.
///
/// Files ending in `.yaml` or `.yml` are parsed as YAML, everything else as
/// JSON.
///
/// # Errors
///
/// Returns an `Io` error if the file cannot be read and a `Parse` error if
/// it is malformed.
pub async fn load_workspace<P: AsRef<Path>>(path: P) -> Result<WorkspaceData> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "Loading workspace");

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| MonodepsError::io(path, e, file!(), line!()))?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    let workspace = if is_yaml {
        WorkspaceData::from_yaml(&content)?
    } else {
        WorkspaceData::from_json(&content)?
    };

    tracing::debug!(
        packages = workspace.packages.len(),
        traces = workspace.import_traces.len(),
        workspace_type = %workspace.workspace_type,
        "Workspace loaded"
    );
    Ok(workspace)
}
