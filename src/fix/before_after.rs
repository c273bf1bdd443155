//! Before/after dependency diagrams for a strategy.

use crate::analyzer::patterns;
use crate::types::{
    BeforeAfterExplanation, CircularDependencyInfo, DiagramEdge, DiagramEdgeKind, DiagramNode,
    DiagramNodeKind, DiagramState, FixStrategy, FixStrategyKind, ImpactAssessment, RiskLevel,
    RootCauseAnalysis, Severity, SideEffectWarning,
};
use std::collections::BTreeSet;

/// More affected packages than this triggers a warning.
const WIDE_IMPACT: usize = 3;

/// Produces current and proposed diagrams plus side-effect warnings.
#[derive(Debug, Default)]
pub struct BeforeAfterGenerator;

impl BeforeAfterGenerator {
    /// Create a generator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Compare the cycle today with the graph after applying `strategy`.
    #[must_use]
    pub fn generate(
        &self,
        strategy: &FixStrategy,
        cycle: &CircularDependencyInfo,
        root_cause: Option<&RootCauseAnalysis>,
        impact: Option<&ImpactAssessment>,
    ) -> BeforeAfterExplanation {
        let removed: BTreeSet<(&str, &str)> = strategy
            .dependency_changes
            .iter()
            .flat_map(|d| d.remove.iter().map(move |to| (d.package.as_str(), to.as_str())))
            .collect();

        let current_state = DiagramState {
            nodes: cycle
                .participants()
                .iter()
                .map(|p| node(p, DiagramNodeKind::InCycle))
                .collect(),
            edges: cycle
                .edges()
                .map(|(from, to)| edge(from, to, DiagramEdgeKind::InCycle))
                .collect(),
        };

        let mut proposed_state = DiagramState {
            nodes: cycle
                .participants()
                .iter()
                .map(|p| node(p, DiagramNodeKind::Normal))
                .collect(),
            edges: cycle
                .edges()
                .map(|(from, to)| {
                    let kind = if removed.contains(&(from, to)) {
                        DiagramEdgeKind::Removed
                    } else {
                        DiagramEdgeKind::Normal
                    };
                    edge(from, to, kind)
                })
                .collect(),
        };
        if let Some(new_package) = &strategy.new_package_name {
            proposed_state.nodes.push(node(new_package, DiagramNodeKind::New));
            for diff in &strategy.dependency_changes {
                for added in diff.add.keys() {
                    proposed_state
                        .edges
                        .push(edge(&diff.package, added, DiagramEdgeKind::New));
                }
            }
        }

        let removed_text: Vec<String> = removed.iter().map(|(f, t)| format!("{f} → {t}")).collect();

        BeforeAfterExplanation {
            explanation: explanation(strategy, cycle, root_cause, &removed_text),
            warnings: warnings(cycle, impact),
            current_state,
            proposed_state,
            package_diffs: strategy.dependency_changes.clone(),
        }
    }
}

fn node(id: &str, kind: DiagramNodeKind) -> DiagramNode {
    DiagramNode {
        id: id.to_string(),
        label: id.to_string(),
        kind,
    }
}

fn edge(from: &str, to: &str, kind: DiagramEdgeKind) -> DiagramEdge {
    DiagramEdge {
        from: from.to_string(),
        to: to.to_string(),
        kind,
    }
}

fn explanation(
    strategy: &FixStrategy,
    cycle: &CircularDependencyInfo,
    root_cause: Option<&RootCauseAnalysis>,
    removed: &[String],
) -> String {
    let mut text = format!("Today {} forms a loop.", cycle.display_path());
    let change = match strategy.strategy_type {
        FixStrategyKind::ExtractModule => format!(
            " After extraction every participant depends on {} instead of on each other",
            strategy.new_package_name.as_deref().unwrap_or("a new shared package")
        ),
        FixStrategyKind::DependencyInjection => {
            " After inversion the implementation is passed in at startup".to_string()
        }
        FixStrategyKind::BoundaryRefactor => {
            " After re-layering dependencies only point toward lower layers".to_string()
        }
    };
    text.push_str(&change);
    if removed.is_empty() {
        text.push('.');
    } else {
        text.push_str(&format!(", and {} is removed.", removed.join(", ")));
    }
    if let Some(rc) = root_cause {
        text.push_str(&format!(
            " The change starts at {}, the most likely origin ({}% confidence).",
            rc.originating_package, rc.confidence
        ));
    }
    text
}

fn warnings(
    cycle: &CircularDependencyInfo,
    impact: Option<&ImpactAssessment>,
) -> Vec<SideEffectWarning> {
    let mut warnings = Vec::new();

    if let Some(impact) = impact {
        if impact.total_affected > WIDE_IMPACT {
            warnings.push(SideEffectWarning {
                severity: Severity::Warning,
                title: "Wide blast radius".to_string(),
                description: format!(
                    "{} packages are affected; run their test suites after the change",
                    impact.total_affected
                ),
                affected_packages: impact
                    .direct_participants
                    .iter()
                    .chain(&impact.indirect_dependents)
                    .cloned()
                    .collect(),
            });
        }
    }

    let low_level: Vec<String> = cycle
        .participants()
        .iter()
        .filter(|p| patterns::is_low_level(p))
        .cloned()
        .collect();
    if !low_level.is_empty() {
        warnings.push(SideEffectWarning {
            severity: Severity::Critical,
            title: "Foundational package involved".to_string(),
            description: format!(
                "{} look(s) like a foundational package; changes reach most of the workspace",
                low_level.join(", ")
            ),
            affected_packages: low_level,
        });
    }

    if let Some(impact) = impact.filter(|i| i.risk_level == RiskLevel::Critical) {
        warnings.push(SideEffectWarning {
            severity: Severity::Critical,
            title: "Critical impact".to_string(),
            description: impact.risk_explanation.clone(),
            affected_packages: impact.direct_participants.clone(),
        });
    }

    warnings
}
