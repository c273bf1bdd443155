//! Root-cause attribution for circular dependencies.
//!
//! A cycle has no single true origin, but some participants are far more
//! likely to have introduced the closing edge than others. The heuristic
//! favours packages that few others depend on, that depend on little
//! themselves, and whose names do not suggest a foundational role.

use crate::analyzer::patterns;
use crate::graph::DependencyGraph;
use crate::types::{
    CircularDependencyInfo, CriticalEdge, DependencyType, RootCauseAnalysis, RootCauseEdge,
};
use std::collections::BTreeSet;

const INCOMING_MAX: u32 = 30;
const INCOMING_PENALTY: u32 = 5;
const OUTGOING_MAX: u32 = 20;
const OUTGOING_PENALTY: u32 = 3;
const NAME_BONUS: u32 = 25;
const FIRST_BONUS: u32 = 15;

/// Attributes cycles to an originating package.
#[derive(Debug)]
pub struct RootCauseAnalyzer<'g> {
    graph: &'g DependencyGraph,
}

impl<'g> RootCauseAnalyzer<'g> {
    /// Create an analyzer over a built graph.
    #[must_use]
    pub const fn new(graph: &'g DependencyGraph) -> Self {
        Self { graph }
    }

    /// Attribute a cycle. Returns `None` for an empty cycle.
    #[must_use]
    pub fn analyze(&self, cycle: &CircularDependencyInfo) -> Option<RootCauseAnalysis> {
        if cycle.cycle.is_empty() {
            return None;
        }

        let chain = self.chain(cycle);
        let participants = cycle.participants();

        let (originating, confidence) = if cycle.is_self_loop() {
            (participants[0].as_str(), 100)
        } else {
            self.pick_origin(participants)?
        };
        tracing::debug!(
            cycle = %cycle.display_path(),
            originating = %originating,
            confidence = confidence,
            "Attributed root cause"
        );

        let problematic_dependency = chain
            .iter()
            .find(|e| e.from == originating)
            .or_else(|| chain.first())
            .cloned()?;

        let critical_edge = chain
            .iter()
            .min_by_key(|e| e.dependency_type.break_cost())
            .map(|e| CriticalEdge {
                from: e.from.clone(),
                to: e.to.clone(),
                dependency_type: e.dependency_type,
                reason: critical_reason(e, &chain),
            });

        Some(RootCauseAnalysis {
            explanation: self.explanation(originating, confidence, &problematic_dependency),
            originating_package: originating.to_string(),
            problematic_dependency,
            confidence,
            chain,
            critical_edge,
        })
    }

    /// One edge per consecutive path pair, kind re-derived from the source.
    /// Pairs that are not declared edges are skipped.
    fn chain(&self, cycle: &CircularDependencyInfo) -> Vec<RootCauseEdge> {
        cycle
            .edges()
            .filter_map(|(from, to)| {
                let dependency_type = self.graph.node(from)?.dependency_type_to(to)?;
                Some(RootCauseEdge {
                    from: from.to_string(),
                    to: to.to_string(),
                    dependency_type,
                })
            })
            .collect()
    }

    fn pick_origin<'c>(&self, participants: &'c [String]) -> Option<(&'c str, u8)> {
        let members: BTreeSet<&str> = participants.iter().map(String::as_str).collect();
        let first = *members.first()?;

        members
            .iter()
            .map(|&p| (p, self.score(p, &members, p == first)))
            // highest score, then smaller name
            .max_by(|(a, sa), (b, sb)| sa.cmp(sb).then_with(|| b.cmp(a)))
    }

    /// Likelihood (0-100) that `package` introduced the cycle.
    #[must_use]
    pub fn score(&self, package: &str, members: &BTreeSet<&str>, is_first: bool) -> u8 {
        // One edge per declared dependency kind
        let incoming = self
            .graph
            .edges()
            .filter(|e| e.to == package && !members.contains(e.from.as_str()))
            .count();
        let incoming = u32::try_from(incoming).unwrap_or(u32::MAX);
        let outgoing = u32::try_from(self.graph.out_degree(package)).unwrap_or(u32::MAX);

        let mut score = INCOMING_MAX.saturating_sub(INCOMING_PENALTY.saturating_mul(incoming))
            + OUTGOING_MAX.saturating_sub(OUTGOING_PENALTY.saturating_mul(outgoing));
        if !patterns::is_low_level(package) {
            score += NAME_BONUS;
        }
        if is_first {
            score += FIRST_BONUS;
        }
        score.min(100) as u8
    }

    fn explanation(&self, originating: &str, confidence: u8, edge: &RootCauseEdge) -> String {
        let likelihood = match confidence {
            80..=u8::MAX => "highly likely",
            0..=49 => "possibly",
            _ => "likely",
        };

        if edge.from == edge.to {
            return format!(
                "{originating} depends on itself; the self-reference in its manifest is the cycle"
            );
        }

        let dependents = self.graph.dependents(originating).len();
        let dependencies = self.graph.dependencies(originating).len();
        let mut text = format!(
            "{originating} is {likelihood} the origin of this cycle ({confidence}% confidence): \
             it has {dependents} dependent(s) and {dependencies} internal dependenc{}",
            if dependencies == 1 { "y" } else { "ies" }
        );
        if !patterns::is_low_level(originating) {
            text.push_str(", and its name does not suggest a foundational package");
        }
        text.push_str(&format!(
            ". Its {} dependency on {} closes the loop.",
            edge.dependency_type, edge.to
        ));
        text
    }
}

fn critical_reason(edge: &RootCauseEdge, chain: &[RootCauseEdge]) -> String {
    let all_same = chain.iter().all(|e| e.dependency_type == edge.dependency_type);
    let why = match edge.dependency_type {
        DependencyType::Optional => "optional dependencies can usually be dropped or loaded lazily",
        DependencyType::Peer => "peer dependencies can be supplied by the consuming application",
        DependencyType::Development => {
            "development dependencies do not ship at runtime and are often only needed by tests"
        }
        DependencyType::Production => "breaking it requires moving or inverting runtime code",
    };
    if all_same {
        format!(
            "Every edge in the cycle is a {} dependency; {} → {} is the first in the chain, and {why}",
            edge.dependency_type, edge.from, edge.to
        )
    } else {
        format!(
            "{} → {} is the easiest edge to break: {why}",
            edge.from, edge.to
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{CycleDetector, GraphBuilder};
    use crate::types::{PackageInfo, Severity, WorkspaceData, WorkspaceType};
    use pretty_assertions::assert_eq;

    fn graph_of(edges: &[(&str, &str, DependencyType)]) -> DependencyGraph {
        let mut ws = WorkspaceData::new(".", WorkspaceType::Npm);
        for &(from, to, _) in edges {
            for name in [from, to] {
                ws.packages
                    .entry(name.to_string())
                    .or_insert_with(|| PackageInfo::new(name, "1.0.0"));
            }
        }
        for &(from, to, kind) in edges {
            let pkg = ws.packages.remove(from).unwrap();
            ws = ws.with_package(pkg.with_dependency_of(kind, to, "workspace:*"));
        }
        GraphBuilder::new().build(&ws).unwrap()
    }

    fn prod(from: &'static str, to: &'static str) -> (&'static str, &'static str, DependencyType) {
        (from, to, DependencyType::Production)
    }

    fn first_cycle(graph: &DependencyGraph) -> CircularDependencyInfo {
        CycleDetector::new(graph).detect().remove(0)
    }

    #[test]
    fn test_ring_attributes_first_member() {
        let graph = graph_of(&[prod("a", "b"), prod("b", "c"), prod("c", "a")]);
        let rc = RootCauseAnalyzer::new(&graph).analyze(&first_cycle(&graph)).unwrap();

        // 30 + 17 + 25 + 15
        assert_eq!(rc.originating_package, "a");
        assert_eq!(rc.confidence, 87);
        assert_eq!(rc.problematic_dependency.to, "b");
        assert_eq!(rc.chain.len(), 3);
        assert!(rc.explanation.contains("highly likely"));
    }

    #[test]
    fn test_outside_dependents_lower_score() {
        let graph = graph_of(&[
            prod("a", "b"),
            prod("b", "c"),
            prod("c", "a"),
            prod("x", "a"),
            prod("y", "a"),
            prod("z", "a"),
        ]);
        let analyzer = RootCauseAnalyzer::new(&graph);
        let members = BTreeSet::from(["a", "b", "c"]);
        assert_eq!(analyzer.score("a", &members, true), 72);
        assert_eq!(analyzer.score("b", &members, false), 72);

        // Tie goes to the smaller name
        let rc = analyzer.analyze(&first_cycle(&graph)).unwrap();
        assert_eq!(rc.originating_package, "a");
    }

    #[test]
    fn test_each_declared_kind_counts_as_an_edge() {
        // x declares a as both a runtime and a dev dependency
        let graph = graph_of(&[
            prod("a", "b"),
            prod("b", "c"),
            prod("c", "a"),
            prod("x", "a"),
            ("x", "a", DependencyType::Development),
        ]);
        let analyzer = RootCauseAnalyzer::new(&graph);
        let members = BTreeSet::from(["a", "b", "c"]);

        // 20 + 17 + 25 + 15
        assert_eq!(analyzer.score("a", &members, true), 77);
        // 30 + 14 + 25
        assert_eq!(analyzer.score("x", &members, false), 69);
    }

    #[test]
    fn test_chain_only_holds_declared_edges() {
        let graph = graph_of(&[prod("a", "b"), prod("b", "a"), prod("b", "c"), prod("c", "b")]);
        let rc = RootCauseAnalyzer::new(&graph).analyze(&first_cycle(&graph)).unwrap();

        let pairs: Vec<(&str, &str)> = rc
            .chain
            .iter()
            .map(|e| (e.from.as_str(), e.to.as_str()))
            .collect();
        assert_eq!(pairs, vec![("a", "b"), ("b", "a")]);
        for edge in &rc.chain {
            assert!(graph.dependencies(&edge.from).contains(&edge.to.as_str()));
        }
        let critical = rc.critical_edge.unwrap();
        assert!(graph.dependencies(&critical.from).contains(&critical.to.as_str()));
    }

    #[test]
    fn test_low_level_name_is_not_blamed() {
        let graph = graph_of(&[prod("a-core", "b"), prod("b", "a-core")]);
        let rc = RootCauseAnalyzer::new(&graph).analyze(&first_cycle(&graph)).unwrap();
        assert_eq!(rc.originating_package, "b");
        assert_eq!(rc.confidence, 72);
        assert_eq!(rc.problematic_dependency.from, "b");
        assert_eq!(rc.problematic_dependency.to, "a-core");
    }

    #[test]
    fn test_critical_edge_prefers_cheapest_kind() {
        let graph = graph_of(&[
            prod("a", "b"),
            ("b", "c", DependencyType::Peer),
            ("c", "a", DependencyType::Development),
        ]);
        let rc = RootCauseAnalyzer::new(&graph).analyze(&first_cycle(&graph)).unwrap();
        let critical = rc.critical_edge.unwrap();
        assert_eq!((critical.from.as_str(), critical.to.as_str()), ("b", "c"));
        assert_eq!(critical.dependency_type, DependencyType::Peer);
    }

    #[test]
    fn test_critical_edge_first_on_tie() {
        let graph = graph_of(&[prod("a", "b"), prod("b", "a")]);
        let rc = RootCauseAnalyzer::new(&graph).analyze(&first_cycle(&graph)).unwrap();
        let critical = rc.critical_edge.unwrap();
        assert_eq!((critical.from.as_str(), critical.to.as_str()), ("a", "b"));
        assert!(critical.reason.contains("Every edge"));
    }

    #[test]
    fn test_self_loop_confidence() {
        let graph = graph_of(&[prod("a", "b")]);
        let cycle = CircularDependencyInfo::new(vec!["a".into(), "a".into()], Severity::Critical);
        let rc = RootCauseAnalyzer::new(&graph).analyze(&cycle).unwrap();
        assert_eq!(rc.confidence, 100);
        assert_eq!(rc.originating_package, "a");
        assert!(rc.explanation.contains("depends on itself"));
    }

    #[test]
    fn test_empty_cycle() {
        let graph = graph_of(&[]);
        let cycle = CircularDependencyInfo::new(Vec::new(), Severity::Info);
        assert!(RootCauseAnalyzer::new(&graph).analyze(&cycle).is_none());
    }

    #[test]
    fn test_confidence_bands() {
        // Every participant heavily depended upon and low-level
        let mut edges = vec![prod("core", "util"), prod("util", "core")];
        for consumer in ["p1", "p2", "p3", "p4", "p5", "p6"] {
            edges.push((consumer, "core", DependencyType::Production));
            edges.push((consumer, "util", DependencyType::Production));
        }
        let graph = graph_of(&edges);
        let rc = RootCauseAnalyzer::new(&graph).analyze(&first_cycle(&graph)).unwrap();
        // 0 + 17 + 0 + 15
        assert_eq!(rc.confidence, 32);
        assert!(rc.explanation.contains("possibly"));
    }
}
