//! Blast-radius assessment for circular dependencies.

use crate::analyzer::patterns;
use crate::graph::DependencyGraph;
use crate::types::{CircularDependencyInfo, ImpactAssessment, RippleLayer, RiskLevel};
use std::collections::BTreeSet;

/// Measures how much of the workspace a cycle affects.
///
/// Every package that transitively depends on a participant is affected:
/// it cannot be built, tested, or released independently of the cycle.
/// Dependents are found by breadth-first search over reversed edges and
/// grouped by distance:
///
/// ```text
/// distance 0: a, b          (the cycle)
/// distance 1: web, admin    (depend on a or b)
/// distance 2: e2e           (depends on web)
/// ```
#[derive(Debug)]
pub struct ImpactAnalyzer<'g> {
    graph: &'g DependencyGraph,
}

impl<'g> ImpactAnalyzer<'g> {
    /// Create an analyzer over a built graph.
    #[must_use]
    pub const fn new(graph: &'g DependencyGraph) -> Self {
        Self { graph }
    }

    /// Assess a cycle. Returns `None` for an empty cycle or an empty graph.
    #[must_use]
    pub fn analyze(&self, cycle: &CircularDependencyInfo) -> Option<ImpactAssessment> {
        if cycle.cycle.is_empty() || self.graph.is_empty() {
            return None;
        }

        let participants: BTreeSet<&str> = cycle.participants().iter().map(String::as_str).collect();
        let ripple_effect = self.ripple(&participants);
        let indirect_dependents: Vec<String> = ripple_effect
            .iter()
            .flat_map(|layer| layer.packages.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let total_affected = participants.len() + indirect_dependents.len();
        let ratio = total_affected as f64 / self.graph.node_count() as f64;
        let affected_percentage = ((ratio * 1000.0).round() / 10.0).clamp(0.0, 100.0);

        let low_level: Vec<&str> = participants
            .iter()
            .copied()
            .filter(|p| patterns::is_low_level(p))
            .collect();
        let risk_level = if low_level.is_empty() {
            RiskLevel::from_percentage(affected_percentage)
        } else {
            RiskLevel::Critical
        };

        tracing::debug!(
            cycle = %cycle.display_path(),
            affected = total_affected,
            percentage = affected_percentage,
            risk = %risk_level,
            "Assessed impact"
        );

        Some(ImpactAssessment {
            risk_explanation: risk_explanation(
                risk_level,
                total_affected,
                affected_percentage,
                ripple_effect.len(),
                &low_level,
            ),
            direct_participants: participants.iter().map(|p| (*p).to_string()).collect(),
            indirect_dependents,
            total_affected,
            affected_percentage,
            risk_level,
            ripple_effect,
        })
    }

    /// Reverse breadth-first layers, excluding the participants themselves.
    fn ripple(&self, participants: &BTreeSet<&str>) -> Vec<RippleLayer> {
        let mut visited: BTreeSet<&str> = participants.clone();
        let mut frontier: Vec<&str> = participants.iter().copied().collect();
        let mut layers = Vec::new();
        let mut distance = 0;

        while !frontier.is_empty() {
            distance += 1;
            let next: BTreeSet<&str> = frontier
                .iter()
                .flat_map(|p| self.graph.dependents(p))
                .filter(|d| !visited.contains(d))
                .collect();
            if next.is_empty() {
                break;
            }
            visited.extend(next.iter().copied());
            layers.push(RippleLayer {
                distance,
                packages: next.iter().map(|p| (*p).to_string()).collect(),
            });
            frontier = next.into_iter().collect();
        }

        layers
    }
}

fn risk_explanation(
    risk: RiskLevel,
    total: usize,
    percentage: f64,
    layers: usize,
    low_level: &[&str],
) -> String {
    let mut text = format!(
        "{total} package(s) ({percentage:.1}% of the workspace) are affected, \
         reaching {layers} level(s) beyond the cycle"
    );
    if low_level.is_empty() {
        let note = match risk {
            RiskLevel::Critical => "; half the workspace or more is coupled to this cycle",
            RiskLevel::High => "; a large share of the workspace is coupled to this cycle",
            RiskLevel::Medium => "; changes here ripple into several packages",
            RiskLevel::Low => "; the cycle is well contained",
        };
        text.push_str(note);
    } else {
        text.push_str(&format!(
            "; risk is critical because {} look(s) like a foundational package",
            low_level.join(", ")
        ));
    }
    text
}
