//! Core data types used throughout MonoDeps.
//!
//! This module defines the fundamental data structures for representing:
//! - Parsed workspaces (the engine's input)
//! - Dependency kinds, severities, and risk levels
//! - Cycle, conflict, and health analysis results
//! - Fix strategies, guides, and before/after diagrams
//!
//! All output types serialize with camelCase field names. Optional nested
//! objects are omitted when absent; list fields always serialize, even when
//! empty.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// Input
// =============================================================================

/// The package manager driving the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceType {
    /// npm workspaces
    Npm,
    /// Yarn workspaces
    Yarn,
    /// pnpm workspaces
    Pnpm,
    /// Bun workspaces
    Bun,
    /// Anything else
    #[default]
    #[serde(other)]
    Unknown,
}

impl WorkspaceType {
    /// Command that reinstalls dependencies after manifest edits.
    #[must_use]
    pub const fn install_command(self) -> &'static str {
        match self {
            Self::Npm | Self::Unknown => "npm install",
            Self::Yarn => "yarn install",
            Self::Pnpm => "pnpm install",
            Self::Bun => "bun install",
        }
    }

    /// Command that builds every package in the workspace.
    #[must_use]
    pub const fn build_command(self) -> &'static str {
        match self {
            Self::Npm | Self::Unknown => "npm run build --workspaces",
            Self::Yarn => "yarn workspaces run build",
            Self::Pnpm => "pnpm -r build",
            Self::Bun => "bun run --filter '*' build",
        }
    }
}

impl std::fmt::Display for WorkspaceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Npm => write!(f, "npm"),
            Self::Yarn => write!(f, "yarn"),
            Self::Pnpm => write!(f, "pnpm"),
            Self::Bun => write!(f, "bun"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// A single workspace package as produced by the manifest parser.
///
/// # Example JSON
///
/// ```json
/// {
///   "name": "@acme/ui",
///   "version": "1.4.0",
///   "path": "packages/ui",
///   "dependencies": { "@acme/core": "workspace:*", "react": "^18.2.0" },
///   "devDependencies": { "typescript": "^5.3.0" },
///   "peerDependencies": {}
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageInfo {
    /// Package name (e.g., "@acme/ui")
    pub name: String,

    /// Declared version
    #[serde(default)]
    pub version: String,

    /// Path relative to the workspace root
    #[serde(default)]
    pub path: String,

    /// Production dependencies (name → version range)
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,

    /// Development dependencies
    #[serde(default)]
    pub dev_dependencies: BTreeMap<String, String>,

    /// Peer dependencies
    #[serde(default)]
    pub peer_dependencies: BTreeMap<String, String>,

    /// Optional dependencies
    #[serde(default)]
    pub optional_dependencies: BTreeMap<String, String>,
}

impl PackageInfo {
    /// Create a package with no dependencies.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: format!("packages/{}", name.rsplit('/').next().unwrap_or(&name)),
            name,
            version: version.into(),
            ..Self::default()
        }
    }

    /// Set the package path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Add a dependency of the given kind.
    #[must_use]
    pub fn with_dependency_of(
        mut self,
        kind: DependencyType,
        name: impl Into<String>,
        range: impl Into<String>,
    ) -> Self {
        let map = match kind {
            DependencyType::Production => &mut self.dependencies,
            DependencyType::Development => &mut self.dev_dependencies,
            DependencyType::Peer => &mut self.peer_dependencies,
            DependencyType::Optional => &mut self.optional_dependencies,
        };
        map.insert(name.into(), range.into());
        self
    }

    /// Add a production dependency.
    #[must_use]
    pub fn with_dependency(self, name: impl Into<String>, range: impl Into<String>) -> Self {
        self.with_dependency_of(DependencyType::Production, name, range)
    }

    /// Add a development dependency.
    #[must_use]
    pub fn with_dev_dependency(self, name: impl Into<String>, range: impl Into<String>) -> Self {
        self.with_dependency_of(DependencyType::Development, name, range)
    }

    /// Declared dependencies of one kind.
    #[must_use]
    pub const fn dependencies_of(&self, kind: DependencyType) -> &BTreeMap<String, String> {
        match kind {
            DependencyType::Production => &self.dependencies,
            DependencyType::Development => &self.dev_dependencies,
            DependencyType::Peer => &self.peer_dependencies,
            DependencyType::Optional => &self.optional_dependencies,
        }
    }
}

/// An import statement recorded upstream, linking two workspace packages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportTrace {
    /// Importing package
    pub from_package: String,
    /// Imported package
    pub to_package: String,
    /// File containing the import
    pub file_path: String,
    /// Line of the import statement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// Raw import specifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specifier: Option<String>,
}

/// A parsed workspace: the engine's only input. Read-only to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceData {
    /// Absolute or relative workspace root
    #[serde(default)]
    pub root_path: String,

    /// Package manager kind
    #[serde(default)]
    pub workspace_type: WorkspaceType,

    /// Packages keyed by name
    #[serde(default)]
    pub packages: BTreeMap<String, PackageInfo>,

    /// Upstream import records (optional)
    #[serde(default)]
    pub import_traces: Vec<ImportTrace>,
}

impl WorkspaceData {
    /// Create an empty workspace.
    #[must_use]
    pub fn new(root_path: impl Into<String>, workspace_type: WorkspaceType) -> Self {
        Self {
            root_path: root_path.into(),
            workspace_type,
            ..Self::default()
        }
    }

    /// Add a package, keyed by its name.
    #[must_use]
    pub fn with_package(mut self, package: PackageInfo) -> Self {
        self.packages.insert(package.name.clone(), package);
        self
    }

    /// Parse a workspace document from JSON.
    ///
    /// # Errors
    ///
    /// Returns a `Parse` error if the document is malformed.
    pub fn from_json(content: &str) -> crate::Result<Self> {
        serde_json::from_str(content).map_err(|e| {
            crate::error::MonodepsError::parse("workspace JSON", e.to_string(), file!(), line!())
        })
    }

    /// Parse a workspace document from YAML.
    ///
    /// # Errors
    ///
    /// Returns a `Parse` error if the document is malformed.
    pub fn from_yaml(content: &str) -> crate::Result<Self> {
        serde_yaml::from_str(content).map_err(|e| {
            crate::error::MonodepsError::parse("workspace YAML", e.to_string(), file!(), line!())
        })
    }
}

// =============================================================================
// Shared enums
// =============================================================================

/// Kind of a declared dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyType {
    /// `dependencies`
    Production,
    /// `devDependencies`
    Development,
    /// `peerDependencies`
    Peer,
    /// `optionalDependencies`
    Optional,
}

impl DependencyType {
    /// All kinds, in manifest order.
    pub const ALL: [Self; 4] = [
        Self::Production,
        Self::Development,
        Self::Peer,
        Self::Optional,
    ];

    /// How hard the edge is to break; lower breaks more easily.
    #[must_use]
    pub const fn break_cost(self) -> u8 {
        match self {
            Self::Optional => 0,
            Self::Peer => 1,
            Self::Development => 2,
            Self::Production => 3,
        }
    }

    /// Runtime weight of a usage; production usages dominate.
    #[must_use]
    pub const fn strength(self) -> u8 {
        match self {
            Self::Production => 3,
            Self::Peer => 2,
            Self::Development => 1,
            Self::Optional => 0,
        }
    }

    /// Manifest field holding this kind.
    #[must_use]
    pub const fn manifest_field(self) -> &'static str {
        match self {
            Self::Production => "dependencies",
            Self::Development => "devDependencies",
            Self::Peer => "peerDependencies",
            Self::Optional => "optionalDependencies",
        }
    }
}

impl std::fmt::Display for DependencyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Production => write!(f, "production"),
            Self::Development => write!(f, "development"),
            Self::Peer => write!(f, "peer"),
            Self::Optional => write!(f, "optional"),
        }
    }
}

/// Severity level for cycles, conflicts, and warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational
    Info,
    /// Potential issue
    Warning,
    /// Requires attention
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Shape of a circular dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleType {
    /// Two packages depending on each other (or a package on itself)
    Direct,
    /// Three or more packages
    Indirect,
}

impl CycleType {
    /// Classify by number of distinct participants.
    #[must_use]
    pub const fn from_depth(depth: usize) -> Self {
        if depth <= 2 {
            Self::Direct
        } else {
            Self::Indirect
        }
    }
}

impl std::fmt::Display for CycleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Indirect => write!(f, "indirect"),
        }
    }
}

/// Risk band of a cycle's blast radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Under 10% of the workspace affected
    Low,
    /// 10-25%
    Medium,
    /// 25-50%
    High,
    /// Half the workspace, or a foundational package
    Critical,
}

impl RiskLevel {
    /// Band for an affected percentage.
    #[must_use]
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 50.0 {
            Self::Critical
        } else if percentage >= 25.0 {
            Self::High
        } else if percentage >= 10.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum ReportFormat {
    /// JSON format
    #[default]
    Json,
    /// Plain text format
    Text,
}

// =============================================================================
// Circular dependencies
// =============================================================================

/// A detected circular dependency, progressively enriched during analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircularDependencyInfo {
    /// Closed path: the first package is repeated at the end
    pub cycle: Vec<String>,

    /// Direct or indirect
    #[serde(rename = "type")]
    pub cycle_type: CycleType,

    /// Severity classification
    pub severity: Severity,

    /// Number of distinct packages in the cycle
    pub depth: usize,

    /// Most likely originating package
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_cause: Option<RootCauseAnalysis>,

    /// How hard the cycle is to break
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<RefactoringComplexity>,

    /// Blast radius
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<ImpactAssessment>,

    /// Candidate strategies, best first once enriched
    #[serde(default)]
    pub fix_strategies: Vec<FixStrategy>,

    /// Top strategy, summarized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_fix: Option<QuickFix>,

    /// Impact × ease ranking score
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_score: Option<PriorityScore>,
}

impl CircularDependencyInfo {
    /// Create an unenriched cycle from a closed path.
    #[must_use]
    pub fn new(cycle: Vec<String>, severity: Severity) -> Self {
        let depth = cycle.len().saturating_sub(1).max(usize::from(!cycle.is_empty()));
        Self {
            cycle_type: CycleType::from_depth(depth),
            cycle,
            severity,
            depth,
            root_cause: None,
            complexity: None,
            impact: None,
            fix_strategies: Vec::new(),
            quick_fix: None,
            priority_score: None,
        }
    }

    /// Distinct participants in path order (the closing element dropped).
    #[must_use]
    pub fn participants(&self) -> &[String] {
        match self.cycle.len() {
            0 => &[],
            1 => &self.cycle[..],
            n => &self.cycle[..n - 1],
        }
    }

    /// A package depending on itself.
    #[must_use]
    pub const fn is_self_loop(&self) -> bool {
        self.depth == 1
    }

    /// Whether the package participates in the cycle.
    #[must_use]
    pub fn contains(&self, package: &str) -> bool {
        self.participants().iter().any(|p| p == package)
    }

    /// Consecutive pairs of the closed path.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cycle.windows(2).map(|w| (w[0].as_str(), w[1].as_str()))
    }

    /// Human-readable path, e.g. `a → b → a`.
    #[must_use]
    pub fn display_path(&self) -> String {
        self.cycle.join(" → ")
    }
}

/// One edge of a cycle chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootCauseEdge {
    /// Depending package
    pub from: String,
    /// Dependency
    pub to: String,
    /// Declared kind
    pub dependency_type: DependencyType,
}

/// The chain edge that is cheapest to break.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalEdge {
    /// Depending package
    pub from: String,
    /// Dependency
    pub to: String,
    /// Declared kind
    pub dependency_type: DependencyType,
    /// Why breaking this edge is recommended
    pub reason: String,
}

/// Heuristic attribution of a cycle to one originating package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootCauseAnalysis {
    /// Package most likely introducing the cycle
    pub originating_package: String,
    /// Edge leaving the originating package
    pub problematic_dependency: RootCauseEdge,
    /// 0-100
    pub confidence: u8,
    /// Generated explanation
    pub explanation: String,
    /// Every edge of the cycle, in path order
    #[serde(default)]
    pub chain: Vec<RootCauseEdge>,
    /// Cheapest edge to break
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical_edge: Option<CriticalEdge>,
}

/// One weighted input of the complexity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityFactor {
    /// Raw measured (or estimated) value
    pub value: usize,
    /// Value scaled into 1-10
    pub score: u8,
    /// Weight in the composite
    pub weight: f64,
    /// score × weight
    pub contribution: f64,
    /// Description of the measurement
    pub description: String,
}

/// The five complexity factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityBreakdown {
    /// Source files to edit
    pub files_affected: ComplexityFactor,
    /// Import statements to rewrite
    pub imports_to_change: ComplexityFactor,
    /// Cycle length
    pub chain_depth: ComplexityFactor,
    /// Participants plus their direct dependents
    pub packages_involved: ComplexityFactor,
    /// External dependencies of participants
    pub external_dependencies: ComplexityFactor,
}

/// Estimated effort to break a cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefactoringComplexity {
    /// Composite 1-10
    pub score: u8,
    /// Time band, e.g. "15-30 min"
    pub estimated_time: String,
    /// Factor breakdown
    pub breakdown: ComplexityBreakdown,
    /// Generated explanation
    pub explanation: String,
}

/// Packages at one distance from the cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RippleLayer {
    /// Dependency hops from the nearest participant
    pub distance: usize,
    /// Packages at this distance, sorted
    #[serde(default)]
    pub packages: Vec<String>,
}

/// Blast radius of a cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactAssessment {
    /// Cycle participants
    #[serde(default)]
    pub direct_participants: Vec<String>,
    /// Packages transitively depending on a participant
    #[serde(default)]
    pub indirect_dependents: Vec<String>,
    /// Participants plus dependents
    pub total_affected: usize,
    /// Share of the workspace affected, 0-100
    pub affected_percentage: f64,
    /// Risk band
    pub risk_level: RiskLevel,
    /// Generated explanation
    pub risk_explanation: String,
    /// Dependents layered by distance
    #[serde(default)]
    pub ripple_effect: Vec<RippleLayer>,
}

// =============================================================================
// Fix strategies
// =============================================================================

/// Refactoring approach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FixStrategyKind {
    /// Move shared code into a new package
    ExtractModule,
    /// Invert one edge behind an interface
    DependencyInjection,
    /// Redraw package boundaries
    BoundaryRefactor,
}

impl std::fmt::Display for FixStrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExtractModule => write!(f, "extract-module"),
            Self::DependencyInjection => write!(f, "dependency-injection"),
            Self::BoundaryRefactor => write!(f, "boundary-refactor"),
        }
    }
}

/// Coarse effort estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffortLevel {
    /// Hours
    Low,
    /// About a day
    Medium,
    /// Several days
    High,
}

impl std::fmt::Display for EffortLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Manifest edits for one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageDiff {
    /// Package whose manifest changes
    pub package: String,
    /// Dependencies to add (name → range)
    #[serde(default)]
    pub add: BTreeMap<String, String>,
    /// Dependencies to remove
    #[serde(default)]
    pub remove: Vec<String>,
}

/// A candidate refactoring for one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixStrategy {
    /// Approach
    #[serde(rename = "type")]
    pub strategy_type: FixStrategyKind,
    /// Short title
    pub name: String,
    /// What the strategy does for this cycle
    pub description: String,
    /// 0-10
    pub suitability: u8,
    /// Effort band
    pub effort: EffortLevel,
    /// Advantages
    #[serde(default)]
    pub pros: Vec<String>,
    /// Drawbacks
    #[serde(default)]
    pub cons: Vec<String>,
    /// Packages to edit
    #[serde(default)]
    pub target_packages: Vec<String>,
    /// Proposed new package (extract-module only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_package_name: Option<String>,
    /// Manifest edits
    #[serde(default)]
    pub dependency_changes: Vec<PackageDiff>,
    /// Step-by-step guide
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guide: Option<FixGuide>,
    /// Complexity of the cycle this strategy breaks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<RefactoringComplexity>,
    /// Current vs proposed diagrams
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_after: Option<BeforeAfterExplanation>,
}

/// Code change illustrated by a guide step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSnippet {
    /// Syntax, e.g. "typescript" or "json"
    pub language: String,
    /// Code before the change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    /// Code after the change
    pub after: String,
}

/// One numbered step of a fix guide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixStep {
    /// 1-based position
    pub number: usize,
    /// Short title
    pub title: String,
    /// What to do
    pub description: String,
    /// File to edit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    /// Illustrative code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<CodeSnippet>,
    /// Shell command to run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

/// How to undo a fix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollbackPlan {
    /// Ordered undo steps
    #[serde(default)]
    pub steps: Vec<String>,
    /// Caveat, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Step-by-step instructions for one strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixGuide {
    /// Strategy this guide implements
    pub strategy_type: FixStrategyKind,
    /// Title
    pub title: String,
    /// One-paragraph summary
    pub summary: String,
    /// Ordered steps
    #[serde(default)]
    pub steps: Vec<FixStep>,
    /// Checks proving the cycle is gone
    #[serde(default)]
    pub verification: Vec<String>,
    /// Undo plan
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rollback: Option<RollbackPlan>,
    /// Time band
    pub estimated_time: String,
}

/// Role of a node in a before/after diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagramNodeKind {
    /// Unaffected package
    Normal,
    /// Cycle participant
    InCycle,
    /// Package introduced by the fix
    New,
}

/// Role of an edge in a before/after diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagramEdgeKind {
    /// Unchanged dependency
    Normal,
    /// Edge closing the cycle
    InCycle,
    /// Dependency added by the fix
    New,
    /// Dependency removed by the fix
    Removed,
}

/// A diagram node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramNode {
    /// Package name
    pub id: String,
    /// Display label
    pub label: String,
    /// Role
    pub kind: DiagramNodeKind,
}

/// A diagram edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramEdge {
    /// Depending package
    pub from: String,
    /// Dependency
    pub to: String,
    /// Role
    pub kind: DiagramEdgeKind,
}

/// One side of a before/after comparison.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramState {
    /// Nodes
    #[serde(default)]
    pub nodes: Vec<DiagramNode>,
    /// Edges
    #[serde(default)]
    pub edges: Vec<DiagramEdge>,
}

/// A side effect the fix may cause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideEffectWarning {
    /// How serious
    pub severity: Severity,
    /// Short title
    pub title: String,
    /// Details
    pub description: String,
    /// Packages concerned
    #[serde(default)]
    pub affected_packages: Vec<String>,
}

/// Current and proposed dependency diagrams for a strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeforeAfterExplanation {
    /// Diagram of the cycle today
    pub current_state: DiagramState,
    /// Diagram after the fix
    pub proposed_state: DiagramState,
    /// Manifest edits
    #[serde(default)]
    pub package_diffs: Vec<PackageDiff>,
    /// Generated explanation
    pub explanation: String,
    /// Side-effect warnings
    #[serde(default)]
    pub warnings: Vec<SideEffectWarning>,
}

/// Summary of the best strategy for a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickFix {
    /// Approach
    pub strategy_type: FixStrategyKind,
    /// Title
    pub title: String,
    /// One-line summary
    pub summary: String,
    /// 0-10
    pub suitability: u8,
    /// Time band
    pub estimated_time: String,
}

/// Ranking score for a cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityScore {
    /// impact × ease, 0-100
    pub score: f64,
    /// From the risk level
    pub impact_factor: f64,
    /// From the complexity score
    pub ease_factor: f64,
    /// Generated explanation
    pub explanation: String,
}

/// One of the top-ranked cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityCycleSummary {
    /// Closed cycle path
    #[serde(default)]
    pub cycle: Vec<String>,
    /// Ranking score
    pub priority_score: f64,
    /// Risk band, when impact was computed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,
    /// Time band
    pub estimated_time: String,
    /// Best strategy, when one exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_strategy: Option<FixStrategyKind>,
}

/// Aggregate view over all cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixSummary {
    /// Number of cycles
    pub total_cycles: usize,
    /// "H hours M minutes"
    pub total_estimated_time: String,
    /// Same total in minutes
    pub total_estimated_minutes: u32,
    /// Cycles with complexity ≤ 3
    pub quick_wins_count: usize,
    /// Cycles with critical risk
    pub critical_cycles_count: usize,
    /// Top three cycles by priority
    #[serde(default)]
    pub priority_cycles: Vec<PriorityCycleSummary>,
}

impl Default for FixSummary {
    fn default() -> Self {
        Self {
            total_cycles: 0,
            total_estimated_time: "0 hours 0 minutes".to_string(),
            total_estimated_minutes: 0,
            quick_wins_count: 0,
            critical_cycles_count: 0,
            priority_cycles: Vec::new(),
        }
    }
}

// =============================================================================
// Version conflicts
// =============================================================================

/// One range of a conflicting external dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictingVersion {
    /// Exact range string
    pub version: String,
    /// Consumers declaring this range, sorted
    #[serde(default)]
    pub packages: Vec<String>,
    /// Differs in major from another range
    pub is_breaking: bool,
    /// Strongest kind among consumers
    pub dependency_type: DependencyType,
}

/// An external dependency declared with two or more distinct ranges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionConflictInfo {
    /// External dependency name
    pub package_name: String,
    /// Distinct ranges
    #[serde(default)]
    pub conflicting_versions: Vec<ConflictingVersion>,
    /// Worst pairwise difference
    pub severity: Severity,
    /// Suggested resolution
    pub resolution: String,
    /// Impact description
    pub impact: String,
    /// Range to align on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_version: Option<String>,
}

// =============================================================================
// Health
// =============================================================================

/// Rating band of the overall health score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthRating {
    /// 90-100
    Excellent,
    /// 75-89
    Good,
    /// 60-74
    Fair,
    /// 40-59
    Poor,
    /// Below 40
    Critical,
}

impl HealthRating {
    /// Band for an overall score.
    #[must_use]
    pub const fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => Self::Excellent,
            75..=89 => Self::Good,
            60..=74 => Self::Fair,
            40..=59 => Self::Poor,
            _ => Self::Critical,
        }
    }
}

impl std::fmt::Display for HealthRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Excellent => write!(f, "excellent"),
            Self::Good => write!(f, "good"),
            Self::Fair => write!(f, "fair"),
            Self::Poor => write!(f, "poor"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// The four sub-scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthBreakdown {
    /// Circular dependency sub-score
    pub circular_score: u8,
    /// Version conflict sub-score
    pub conflict_score: u8,
    /// Dependency depth sub-score
    pub depth_score: u8,
    /// Coupling sub-score
    pub coupling_score: u8,
}

/// One weighted health factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthFactor {
    /// Factor name
    pub name: String,
    /// 0-100
    pub score: u8,
    /// Weight in the composite
    pub weight: f64,
    /// score × weight
    pub weighted_score: f64,
    /// What was measured
    pub description: String,
    /// Generated advice
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Weighted architecture health score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthScoreResult {
    /// 0-100
    pub overall: u8,
    /// Rating band
    pub rating: HealthRating,
    /// Sub-scores
    pub breakdown: HealthBreakdown,
    /// Factor details
    #[serde(default)]
    pub factors: Vec<HealthFactor>,
    /// When the score was computed
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Analysis result
// =============================================================================

/// Everything one analysis run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Health score
    pub health_score: HealthScoreResult,
    /// Number of workspace packages
    pub packages: usize,
    /// Packages flagged by exclusion patterns
    #[serde(default)]
    pub excluded_packages: Vec<String>,
    /// Cycles, highest priority first
    #[serde(default)]
    pub circular_dependencies: Vec<CircularDependencyInfo>,
    /// External version conflicts
    #[serde(default)]
    pub version_conflicts: Vec<VersionConflictInfo>,
    /// Aggregate fix summary
    pub fix_summary: FixSummary,
    /// When the analysis ran
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisResult {
    /// Any critical cycle or conflict.
    #[must_use]
    pub fn has_critical(&self) -> bool {
        self.circular_dependencies
            .iter()
            .any(|c| c.severity == Severity::Critical)
            || self
                .version_conflicts
                .iter()
                .any(|c| c.severity == Severity::Critical)
    }

    /// Any warning-level cycle or conflict.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.circular_dependencies
            .iter()
            .any(|c| c.severity == Severity::Warning)
            || self
                .version_conflicts
                .iter()
                .any(|c| c.severity == Severity::Warning)
    }
}
