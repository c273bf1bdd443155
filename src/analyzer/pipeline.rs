//! End-to-end analysis of one workspace.

use crate::analyzer::{
    ComplexityCalculator, ConflictDetector, HealthCalculator, ImpactAnalyzer, RootCauseAnalyzer,
};
use crate::config::Config;
use crate::error::Result;
use crate::exclusion::ExclusionMatcher;
use crate::fix::{BeforeAfterGenerator, FixGuideGenerator, FixStrategyGenerator, ResultEnricher};
use crate::graph::{CycleDetector, DependencyGraph, GraphBuilder};
use crate::types::{
    AnalysisResult, CircularDependencyInfo, HealthScoreResult, ImportTrace, VersionConflictInfo,
    WorkspaceData,
};
use rayon::prelude::*;

/// Runs every analysis stage over a workspace.
///
/// # Algorithm Overview
///
/// ## Phase 1: Graph
///
/// Exclusion patterns are compiled and the package graph is built. Excluded
/// packages stay in the graph so that cycles through them are still found.
///
/// ## Phase 2: Detection
///
/// Cycles are detected; a cycle whose every participant is excluded is
/// dropped. External version conflicts are detected independently.
///
/// ## Phase 3: Per-cycle analysis
///
/// ```text
/// cycle ─► root cause ─► complexity ─► impact ─► strategies ─► guide
///                                                          └─► before/after
/// ```
///
/// Cycles are independent, so this phase optionally runs on the rayon pool.
/// Results are collected in input order either way.
///
/// ## Phase 4: Ranking and health
///
/// Cycles are enriched and ordered by priority, then the health score is
/// computed over the surviving cycles and the conflicts.
///
/// # Example
///
/// ```rust
/// use monodeps::analyzer::Analyzer;
/// use monodeps::types::{PackageInfo, WorkspaceData, WorkspaceType};
/// use monodeps::Config;
///
/// let workspace = WorkspaceData::new(".", WorkspaceType::Pnpm)
///     .with_package(PackageInfo::new("app", "1.0.0").with_dependency("ui", "workspace:*"))
///     .with_package(PackageInfo::new("ui", "1.0.0").with_dependency("app", "workspace:*"));
///
/// let result = Analyzer::new(&Config::default()).analyze(&workspace).unwrap();
/// assert_eq!(result.circular_dependencies.len(), 1);
/// assert!(result.health_score.overall < 100);
/// ```
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: Config,
}

impl Analyzer {
    /// Create an analyzer with the given configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Run the full analysis.
    ///
    /// # Errors
    ///
    /// Returns an error if an exclusion pattern fails to compile or the
    /// workspace is structurally invalid.
    pub fn analyze(&self, workspace: &WorkspaceData) -> Result<AnalysisResult> {
        tracing::debug!(
            packages = workspace.packages.len(),
            traces = workspace.import_traces.len(),
            parallel = self.config.analysis.parallel,
            "Starting analysis"
        );

        // Phase 1: Build the graph
        tracing::debug!("Phase 1: Building dependency graph");
        let graph = self.build_graph(workspace)?;

        // Phase 2: Detect cycles and conflicts
        tracing::debug!("Phase 2: Detecting cycles and conflicts");
        let cycles = self.cycles_in(&graph);
        let conflicts = ConflictDetector::new(&graph).detect();
        tracing::debug!(
            cycles = cycles.len(),
            conflicts = conflicts.len(),
            "Detection complete"
        );

        // Phase 3: Per-cycle analysis
        tracing::debug!("Phase 3: Analyzing cycles");
        let traces = workspace.import_traces.as_slice();
        let mut cycles: Vec<CircularDependencyInfo> = if self.config.analysis.parallel {
            cycles
                .into_par_iter()
                .map(|cycle| self.analyze_cycle(&graph, traces, cycle))
                .collect()
        } else {
            cycles
                .into_iter()
                .map(|cycle| self.analyze_cycle(&graph, traces, cycle))
                .collect()
        };

        // Phase 4: Rank and score
        tracing::debug!("Phase 4: Ranking cycles and scoring health");
        let fix_summary = ResultEnricher::new().enrich(&mut cycles);
        let health_score = HealthCalculator::new(&graph).calculate(&cycles, &conflicts);

        let result = AnalysisResult {
            health_score,
            packages: graph.node_count(),
            excluded_packages: graph
                .excluded_packages()
                .into_iter()
                .map(str::to_string)
                .collect(),
            circular_dependencies: cycles,
            version_conflicts: conflicts,
            fix_summary,
            analyzed_at: chrono::Utc::now(),
        };

        tracing::info!(
            packages = result.packages,
            cycles = result.circular_dependencies.len(),
            conflicts = result.version_conflicts.len(),
            health = result.health_score.overall,
            "Analysis complete"
        );

        Ok(result)
    }

    /// Detected cycles only, in detection order and without per-cycle
    /// analysis.
    ///
    /// # Errors
    ///
    /// Same as [`Analyzer::analyze`].
    pub fn detect_cycles(&self, workspace: &WorkspaceData) -> Result<Vec<CircularDependencyInfo>> {
        let graph = self.build_graph(workspace)?;
        Ok(self.cycles_in(&graph))
    }

    /// External version conflicts only.
    ///
    /// # Errors
    ///
    /// Same as [`Analyzer::analyze`].
    pub fn detect_conflicts(&self, workspace: &WorkspaceData) -> Result<Vec<VersionConflictInfo>> {
        let graph = self.build_graph(workspace)?;
        Ok(ConflictDetector::new(&graph).detect())
    }

    /// Health score only.
    ///
    /// # Errors
    ///
    /// Same as [`Analyzer::analyze`].
    pub fn health(&self, workspace: &WorkspaceData) -> Result<HealthScoreResult> {
        let graph = self.build_graph(workspace)?;
        let cycles = self.cycles_in(&graph);
        let conflicts = ConflictDetector::new(&graph).detect();
        Ok(HealthCalculator::new(&graph).calculate(&cycles, &conflicts))
    }

    /// Compile the exclusion patterns and build the graph.
    ///
    /// # Errors
    ///
    /// Same as [`Analyzer::analyze`].
    pub fn build_graph(&self, workspace: &WorkspaceData) -> Result<DependencyGraph> {
        let exclusions = ExclusionMatcher::new(&self.config.analysis.exclude_patterns)?;
        GraphBuilder::new().with_exclusions(&exclusions).build(workspace)
    }

    fn cycles_in(&self, graph: &DependencyGraph) -> Vec<CircularDependencyInfo> {
        let mut cycles = CycleDetector::new(graph)
            .with_dev_dependencies(self.config.analysis.include_dev_dependencies)
            .detect();

        let before = cycles.len();
        cycles.retain(|cycle| {
            !cycle
                .participants()
                .iter()
                .all(|p| graph.node(p).is_some_and(|n| n.excluded))
        });
        if cycles.len() != before {
            tracing::debug!(
                dropped = before - cycles.len(),
                "Dropped cycles made only of excluded packages"
            );
        }
        cycles
    }

    fn analyze_cycle(
        &self,
        graph: &DependencyGraph,
        traces: &[ImportTrace],
        mut cycle: CircularDependencyInfo,
    ) -> CircularDependencyInfo {
        cycle.root_cause = RootCauseAnalyzer::new(graph).analyze(&cycle);
        cycle.complexity = ComplexityCalculator::new(graph)
            .with_import_traces(traces)
            .calculate(&cycle);
        cycle.impact = ImpactAnalyzer::new(graph).analyze(&cycle);

        if self.config.analysis.fix_strategies {
            let guides = FixGuideGenerator::new(graph);
            let diagrams = BeforeAfterGenerator::new();
            let mut strategies =
                FixStrategyGenerator::new(graph).generate(&cycle, cycle.root_cause.as_ref());
            for strategy in &mut strategies {
                strategy.complexity = cycle.complexity.clone();
                strategy.guide = Some(guides.generate(strategy, &cycle, cycle.root_cause.as_ref()));
                strategy.before_after = Some(diagrams.generate(
                    strategy,
                    &cycle,
                    cycle.root_cause.as_ref(),
                    cycle.impact.as_ref(),
                ));
            }
            cycle.fix_strategies = strategies;
        }

        cycle
    }
}
