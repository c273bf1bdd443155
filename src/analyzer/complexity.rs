//! Refactoring complexity estimation.
//!
//! Five factors are measured, each scaled into 1-10, and combined with fixed
//! weights:
//!
//! | factor                | weight | measured as                                   |
//! |-----------------------|--------|-----------------------------------------------|
//! | files affected        | 0.25   | distinct files importing along cycle edges    |
//! | imports to change     | 0.20   | import statements along cycle edges           |
//! | chain depth           | 0.25   | distinct cycle participants                   |
//! | packages involved     | 0.15   | participants plus their outside dependents    |
//! | external dependencies | 0.15   | distinct registry dependencies of participants|
//!
//! Without recorded import traces, one file and one import per cycle edge is
//! assumed.

use crate::graph::DependencyGraph;
use crate::types::{
    CircularDependencyInfo, ComplexityBreakdown, ComplexityFactor, ImportTrace,
    RefactoringComplexity,
};
use std::collections::BTreeSet;

const FILES_WEIGHT: f64 = 0.25;
const IMPORTS_WEIGHT: f64 = 0.20;
const DEPTH_WEIGHT: f64 = 0.25;
const PACKAGES_WEIGHT: f64 = 0.15;
const EXTERNAL_WEIGHT: f64 = 0.15;

// Upper bounds for scores 1..=9; anything larger scores 10
const FILES_SCALE: [usize; 9] = [1, 2, 3, 5, 8, 12, 20, 30, 50];
const IMPORTS_SCALE: [usize; 9] = [1, 2, 4, 6, 10, 15, 25, 40, 60];
const PACKAGES_SCALE: [usize; 9] = [2, 3, 4, 5, 7, 10, 15, 20, 30];
const EXTERNAL_SCALE: [usize; 9] = [0, 2, 5, 8, 12, 16, 20, 30, 40];

/// Estimates how hard a cycle is to break.
#[derive(Debug)]
pub struct ComplexityCalculator<'g> {
    graph: &'g DependencyGraph,
    traces: &'g [ImportTrace],
}

impl<'g> ComplexityCalculator<'g> {
    /// Create a calculator without import traces.
    #[must_use]
    pub const fn new(graph: &'g DependencyGraph) -> Self {
        Self { graph, traces: &[] }
    }

    /// Use recorded import traces for exact file and import counts.
    #[must_use]
    pub const fn with_import_traces(mut self, traces: &'g [ImportTrace]) -> Self {
        self.traces = traces;
        self
    }

    /// Score a cycle. Returns `None` for an empty cycle.
    #[must_use]
    pub fn calculate(&self, cycle: &CircularDependencyInfo) -> Option<RefactoringComplexity> {
        if cycle.cycle.is_empty() {
            return None;
        }

        let participants: BTreeSet<&str> = cycle.participants().iter().map(String::as_str).collect();
        let edges: BTreeSet<(&str, &str)> = cycle.edges().collect();
        let edge_count = edges.len().max(1);

        let on_cycle: Vec<&ImportTrace> = self
            .traces
            .iter()
            .filter(|t| edges.contains(&(t.from_package.as_str(), t.to_package.as_str())))
            .collect();
        let traced = !on_cycle.is_empty();

        let (files, imports) = if traced {
            let files: BTreeSet<&str> = on_cycle.iter().map(|t| t.file_path.as_str()).collect();
            (files.len(), on_cycle.len())
        } else {
            (edge_count, edge_count)
        };

        let depth = participants.len();

        let mut involved: BTreeSet<&str> = participants.clone();
        for p in &participants {
            involved.extend(self.graph.dependents(p));
        }

        let externals: BTreeSet<&str> = participants
            .iter()
            .filter_map(|p| self.graph.node(p))
            .flat_map(|n| n.external_names())
            .collect();

        let source = if traced { "recorded" } else { "estimated" };
        let breakdown = ComplexityBreakdown {
            files_affected: factor(
                files,
                scale(files, &FILES_SCALE),
                FILES_WEIGHT,
                format!("{files} source file(s) to edit ({source})"),
            ),
            imports_to_change: factor(
                imports,
                scale(imports, &IMPORTS_SCALE),
                IMPORTS_WEIGHT,
                format!("{imports} import statement(s) to rewrite ({source})"),
            ),
            chain_depth: factor(
                depth,
                depth_score(depth),
                DEPTH_WEIGHT,
                format!("{depth} package(s) in the cycle"),
            ),
            packages_involved: factor(
                involved.len(),
                scale(involved.len(), &PACKAGES_SCALE),
                PACKAGES_WEIGHT,
                format!(
                    "{} package(s) including direct dependents outside the cycle",
                    involved.len()
                ),
            ),
            external_dependencies: factor(
                externals.len(),
                scale(externals.len(), &EXTERNAL_SCALE),
                EXTERNAL_WEIGHT,
                format!("{} external dependenc(ies) touched", externals.len()),
            ),
        };

        let composite = breakdown.files_affected.contribution
            + breakdown.imports_to_change.contribution
            + breakdown.chain_depth.contribution
            + breakdown.packages_involved.contribution
            + breakdown.external_dependencies.contribution;
        let score = composite.round().clamp(1.0, 10.0) as u8;
        let estimated_time = time_band(score).to_string();

        tracing::debug!(
            cycle = %cycle.display_path(),
            score = score,
            composite = composite,
            traced = traced,
            "Computed refactoring complexity"
        );

        Some(RefactoringComplexity {
            explanation: explanation(score, &estimated_time, files, imports, depth, traced),
            score,
            estimated_time,
            breakdown,
        })
    }
}

fn factor(value: usize, score: u8, weight: f64, description: String) -> ComplexityFactor {
    ComplexityFactor {
        value,
        score,
        weight,
        contribution: f64::from(score) * weight,
        description,
    }
}

fn scale(value: usize, upper_bounds: &[usize; 9]) -> u8 {
    upper_bounds
        .iter()
        .position(|&bound| value <= bound)
        .map_or(10, |i| i as u8 + 1)
}

fn depth_score(depth: usize) -> u8 {
    match depth {
        0 | 1 => 1,
        2 => 2,
        3..=8 => depth as u8 + 1,
        _ => 10,
    }
}

/// Time band for a composite score.
#[must_use]
pub const fn time_band(score: u8) -> &'static str {
    match score {
        0..=2 => "5-15 min",
        3..=4 => "15-30 min",
        5..=6 => "30-60 min",
        7..=8 => "1-2 hrs",
        _ => "2-4 hrs",
    }
}

fn explanation(
    score: u8,
    time: &str,
    files: usize,
    imports: usize,
    depth: usize,
    traced: bool,
) -> String {
    let difficulty = match score {
        0..=3 => "a quick win",
        4..=6 => "a moderate refactor",
        _ => "a substantial refactor",
    };
    let mut text = format!(
        "Complexity {score}/10, {difficulty} (about {time}): {files} file(s) and {imports} import(s) \
         across {depth} package(s)"
    );
    if !traced {
        text.push_str("; counts are estimated at one file per cycle edge");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{CycleDetector, GraphBuilder};
    use crate::types::{PackageInfo, Severity, WorkspaceData, WorkspaceType};
    use test_case::test_case;

    fn ring(names: &[&str]) -> WorkspaceData {
        let mut ws = WorkspaceData::new(".", WorkspaceType::Npm);
        for (i, name) in names.iter().enumerate() {
            let next = names[(i + 1) % names.len()];
            ws = ws.with_package(PackageInfo::new(*name, "1.0.0").with_dependency(next, "workspace:*"));
        }
        ws
    }

    fn complexity_of(ws: &WorkspaceData) -> RefactoringComplexity {
        let graph = GraphBuilder::new().build(ws).unwrap();
        let cycle = CycleDetector::new(&graph).detect().remove(0);
        ComplexityCalculator::new(&graph)
            .with_import_traces(&ws.import_traces)
            .calculate(&cycle)
            .unwrap()
    }

    fn trace(from: &str, to: &str, file: &str) -> ImportTrace {
        ImportTrace {
            from_package: from.into(),
            to_package: to.into(),
            file_path: file.into(),
            line: Some(1),
            specifier: None,
        }
    }

    #[test]
    fn test_weights_sum_to_one() {
        let sum = FILES_WEIGHT + IMPORTS_WEIGHT + DEPTH_WEIGHT + PACKAGES_WEIGHT + EXTERNAL_WEIGHT;
        assert!((sum - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_three_ring() {
        let c = complexity_of(&ring(&["a", "b", "c"]));
        assert_eq!(c.score, 3);
        assert_eq!(c.estimated_time, "15-30 min");
        assert_eq!(c.breakdown.chain_depth.score, 4);
        assert_eq!(c.breakdown.files_affected.value, 3);
        assert!(c.explanation.contains("estimated"));
    }

    #[test]
    fn test_direct_cycle() {
        let c = complexity_of(&ring(&["a", "b"]));
        assert_eq!(c.score, 2);
        assert_eq!(c.estimated_time, "5-15 min");
    }

    #[test]
    fn test_traces_replace_estimates() {
        let mut ws = ring(&["a", "b"]);
        ws.import_traces = vec![
            trace("a", "b", "a/src/index.ts"),
            trace("a", "b", "a/src/index.ts"),
            trace("b", "a", "b/src/client.ts"),
            trace("x", "y", "elsewhere.ts"),
        ];
        let c = complexity_of(&ws);
        assert_eq!(c.breakdown.files_affected.value, 2);
        assert_eq!(c.breakdown.imports_to_change.value, 3);
        assert!(!c.explanation.contains("estimated"));
    }

    #[test]
    fn test_outside_dependents_counted() {
        let ws = ring(&["a", "b"])
            .with_package(PackageInfo::new("x", "1.0.0").with_dependency("a", "workspace:*"));
        let c = complexity_of(&ws);
        assert_eq!(c.breakdown.packages_involved.value, 3);
    }

    #[test]
    fn test_long_ring_stays_in_range() {
        let names: Vec<String> = (0..40).map(|i| format!("p{i:02}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let c = complexity_of(&ring(&refs));
        assert!((1..=10).contains(&c.score));
        assert_eq!(c.breakdown.chain_depth.score, 10);
    }

    #[test]
    fn test_empty_cycle() {
        let graph = GraphBuilder::new().build(&WorkspaceData::default()).unwrap();
        let cycle = CircularDependencyInfo::new(Vec::new(), Severity::Info);
        assert!(ComplexityCalculator::new(&graph).calculate(&cycle).is_none());
    }

    #[test_case(1, "5-15 min")]
    #[test_case(4, "15-30 min")]
    #[test_case(6, "30-60 min")]
    #[test_case(7, "1-2 hrs")]
    #[test_case(10, "2-4 hrs")]
    fn test_time_band(score: u8, expected: &str) {
        assert_eq!(time_band(score), expected);
    }

    #[test_case(0, &EXTERNAL_SCALE, 1)]
    #[test_case(3, &EXTERNAL_SCALE, 3)]
    #[test_case(51, &FILES_SCALE, 10)]
    #[test_case(4, &IMPORTS_SCALE, 3)]
    fn test_scale(value: usize, bounds: &[usize; 9], expected: u8) {
        assert_eq!(scale(value, bounds), expected);
    }
}
