//! Candidate refactoring strategies per cycle.
//!
//! Three strategies are scored for suitability (0-10):
//!
//! | strategy             | base | adjustments                                        |
//! |----------------------|------|----------------------------------------------------|
//! | extract-module       | 6    | +2 direct, +1 confidence ≥ 80, −2 depth > 4        |
//! | dependency-injection | 5    | +2 confidence ≥ 80, +1 direct, −1 depth ≥ 5        |
//! | boundary-refactor    | 4    | +3 depth ≥ 4, +1 low-level participant, −1 direct  |

use crate::analyzer::patterns;
use crate::graph::DependencyGraph;
use crate::types::{
    CircularDependencyInfo, CycleType, EffortLevel, FixStrategy, FixStrategyKind, PackageDiff,
    RootCauseAnalysis, RootCauseEdge,
};
use std::collections::BTreeMap;

/// Range used for dependencies on workspace packages.
pub const WORKSPACE_RANGE: &str = "workspace:*";

const HIGH_CONFIDENCE: u8 = 80;

/// Generates refactoring strategies for cycles.
#[derive(Debug)]
pub struct FixStrategyGenerator<'g> {
    graph: &'g DependencyGraph,
}

/// Facts about a cycle shared by every strategy.
struct CycleFacts<'c> {
    participants: &'c [String],
    depth: usize,
    direct: bool,
    confidence: u8,
    origin: &'c str,
    problematic: Option<&'c RootCauseEdge>,
    critical: Option<(&'c str, &'c str)>,
    has_low_level: bool,
}

impl<'g> FixStrategyGenerator<'g> {
    /// Create a generator over a built graph.
    #[must_use]
    pub const fn new(graph: &'g DependencyGraph) -> Self {
        Self { graph }
    }

    /// Up to three strategies for a cycle, in generation order. Strategies
    /// scoring 0 are dropped; an empty cycle yields none.
    #[must_use]
    pub fn generate(
        &self,
        cycle: &CircularDependencyInfo,
        root_cause: Option<&RootCauseAnalysis>,
    ) -> Vec<FixStrategy> {
        let participants = cycle.participants();
        let Some(first) = participants.first() else {
            return Vec::new();
        };

        let facts = CycleFacts {
            participants,
            depth: cycle.depth,
            direct: cycle.cycle_type == CycleType::Direct,
            confidence: root_cause.map_or(0, |rc| rc.confidence),
            origin: root_cause.map_or(first.as_str(), |rc| rc.originating_package.as_str()),
            problematic: root_cause.map(|rc| &rc.problematic_dependency),
            critical: root_cause
                .and_then(|rc| rc.critical_edge.as_ref())
                .map(|e| (e.from.as_str(), e.to.as_str())),
            has_low_level: participants.iter().any(|p| patterns::is_low_level(p)),
        };

        let strategies: Vec<FixStrategy> = [
            self.extract_module(&facts),
            Self::dependency_injection(&facts),
            Self::boundary_refactor(&facts),
        ]
        .into_iter()
        .filter(|s| s.suitability > 0)
        .collect();

        tracing::debug!(
            cycle = %cycle.display_path(),
            strategies = strategies.len(),
            "Generated fix strategies"
        );
        strategies
    }

    fn extract_module(&self, facts: &CycleFacts<'_>) -> FixStrategy {
        let mut score: i32 = 6;
        if facts.direct {
            score += 2;
        }
        if facts.confidence >= HIGH_CONFIDENCE {
            score += 1;
        }
        if facts.depth > 4 {
            score -= 2;
        }

        let new_package = self.shared_package_name(facts.origin);
        let mut changes: BTreeMap<&str, PackageDiff> = BTreeMap::new();
        for p in facts.participants {
            changes.insert(
                p,
                PackageDiff {
                    package: p.clone(),
                    add: BTreeMap::from([(new_package.clone(), WORKSPACE_RANGE.to_string())]),
                    remove: Vec::new(),
                },
            );
        }
        if let Some(edge) = facts.problematic {
            if let Some(diff) = changes.get_mut(edge.from.as_str()) {
                diff.remove.push(edge.to.clone());
            }
        }

        FixStrategy {
            strategy_type: FixStrategyKind::ExtractModule,
            name: "Extract Shared Module".to_string(),
            description: format!(
                "Move the code shared by {} into a new package {new_package} so that the \
                 participants depend on it instead of on each other",
                facts.participants.join(", ")
            ),
            suitability: clamp_suitability(score),
            effort: if facts.depth > 4 {
                EffortLevel::High
            } else {
                EffortLevel::Medium
            },
            pros: vec![
                "Removes the cycle without changing runtime behaviour".to_string(),
                "Gives shared code an explicit owner and a stable API".to_string(),
            ],
            cons: vec![
                format!("Adds {new_package} to the workspace"),
                "Shared code must be separable from package-specific logic".to_string(),
            ],
            target_packages: facts.participants.to_vec(),
            new_package_name: Some(new_package),
            dependency_changes: changes.into_values().collect(),
            guide: None,
            complexity: None,
            before_after: None,
        }
    }

    fn dependency_injection(facts: &CycleFacts<'_>) -> FixStrategy {
        let mut score: i32 = 5;
        if facts.confidence >= HIGH_CONFIDENCE {
            score += 2;
        }
        if facts.direct {
            score += 1;
        }
        if facts.depth >= 5 {
            score -= 1;
        }

        let (from, to) = facts
            .critical
            .or_else(|| facts.problematic.map(|e| (e.from.as_str(), e.to.as_str())))
            .unwrap_or((facts.origin, facts.origin));

        let dependency_changes = if from == to {
            Vec::new()
        } else {
            vec![PackageDiff {
                package: from.to_string(),
                add: BTreeMap::new(),
                remove: vec![to.to_string()],
            }]
        };

        FixStrategy {
            strategy_type: FixStrategyKind::DependencyInjection,
            name: "Dependency Injection".to_string(),
            description: format!(
                "Invert {from} → {to}: {from} declares the interface it needs and receives the \
                 implementation from {to} at the composition root"
            ),
            suitability: clamp_suitability(score),
            effort: if facts.depth > 3 {
                EffortLevel::Medium
            } else {
                EffortLevel::Low
            },
            pros: vec![
                "No new package required".to_string(),
                format!("{from} becomes testable without {to}"),
            ],
            cons: vec![
                "Adds wiring code at application startup".to_string(),
                "Call sites must pass the implementation explicitly".to_string(),
            ],
            target_packages: if from == to {
                vec![from.to_string()]
            } else {
                vec![from.to_string(), to.to_string()]
            },
            new_package_name: None,
            dependency_changes,
            guide: None,
            complexity: None,
            before_after: None,
        }
    }

    fn boundary_refactor(facts: &CycleFacts<'_>) -> FixStrategy {
        let mut score: i32 = 4;
        if facts.depth >= 4 {
            score += 3;
        }
        if facts.has_low_level {
            score += 1;
        }
        if facts.direct {
            score -= 1;
        }

        let dependency_changes = facts
            .problematic
            .filter(|e| e.from != e.to)
            .map(|e| PackageDiff {
                package: e.from.clone(),
                add: BTreeMap::new(),
                remove: vec![e.to.clone()],
            })
            .into_iter()
            .collect();

        FixStrategy {
            strategy_type: FixStrategyKind::BoundaryRefactor,
            name: "Refactor Package Boundaries".to_string(),
            description: format!(
                "Redraw the boundaries between {}: merge packages that always change together \
                 or move modules so that dependencies only point toward lower layers",
                facts.participants.join(", ")
            ),
            suitability: clamp_suitability(score),
            effort: EffortLevel::High,
            pros: vec![
                "Fixes the architectural cause rather than the symptom".to_string(),
                "Prevents related cycles from reappearing".to_string(),
            ],
            cons: vec![
                "Touches many files and public entry points".to_string(),
                "Consumers outside the cycle may need import updates".to_string(),
            ],
            target_packages: facts.participants.to_vec(),
            new_package_name: None,
            dependency_changes,
            guide: None,
            complexity: None,
            before_after: None,
        }
    }

    /// `<scope>/<stem>-shared`, suffixed `-2`, `-3`… until unused.
    #[must_use]
    pub fn shared_package_name(&self, origin: &str) -> String {
        let stem = patterns::unscoped(origin);
        let base = match patterns::scope(origin) {
            Some(scope) => format!("{scope}/{stem}-shared"),
            None => format!("{stem}-shared"),
        };

        if !self.graph.contains(&base) {
            return base;
        }
        (2..)
            .map(|n| format!("{base}-{n}"))
            .find(|candidate| !self.graph.contains(candidate))
            .unwrap_or(base)
    }
}

/// Time band used when no complexity estimate is available.
#[must_use]
pub const fn effort_time(effort: EffortLevel) -> &'static str {
    match effort {
        EffortLevel::Low => "15-30 min",
        EffortLevel::Medium => "30-60 min",
        EffortLevel::High => "2-4 hrs",
    }
}

fn clamp_suitability(score: i32) -> u8 {
    score.clamp(0, 10) as u8
}
