//! Workspace analysis module.
//!
//! This module turns a built dependency graph into findings: version
//! conflicts between external dependencies, per-cycle diagnostics, and an
//! overall health score.
//!
//! # Analysis Types
//!
//! 1. **Version Conflicts**: the same external dependency required at
//!    different versions by different packages.
//!
//! 2. **Root Cause**: the participant most likely to have introduced a cycle,
//!    and the cheapest edge to break.
//!
//! 3. **Refactoring Complexity**: a 1-10 score and time band per cycle.
//!
//! 4. **Impact**: how many packages transitively depend on a cycle.
//!
//! 5. **Health**: a weighted 0-100 score over cycles, conflicts, depth and
//!    coupling.
//!
//! [`Analyzer`] runs all of them, plus the fix pipeline, in one pass.
//!
//! # Example
//!
//! ```rust,no_run
//! use monodeps::analyzer::Analyzer;
//! use monodeps::types::WorkspaceData;
//! use monodeps::Config;
//!
//! let config = Config::default();
//! let analyzer = Analyzer::new(&config);
//!
//! let workspace = WorkspaceData::from_json(r#"{"rootPath": ".", "packages": {}}"#).unwrap();
//! let result = analyzer.analyze(&workspace).unwrap();
//! println!("health: {}", result.health_score.overall);
//! ```

mod complexity;
mod conflict;
mod health;
mod impact;
pub mod patterns;
mod pipeline;
mod root_cause;

pub use complexity::{time_band, ComplexityCalculator};
pub use conflict::ConflictDetector;
pub use health::HealthCalculator;
pub use impact::ImpactAnalyzer;
pub use pipeline::Analyzer;
pub use root_cause::RootCauseAnalyzer;
