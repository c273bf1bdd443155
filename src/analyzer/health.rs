//! Architecture health scoring.
//!
//! The overall score is a weighted composite of four sub-scores, each
//! clamped to 0-100 before weighting:
//!
//! ```text
//! overall = 0.40 × circular + 0.25 × conflicts + 0.20 × depth + 0.15 × coupling
//! ```

use crate::graph::DependencyGraph;
use crate::types::{
    CircularDependencyInfo, CycleType, HealthBreakdown, HealthFactor, HealthRating,
    HealthScoreResult, Severity, VersionConflictInfo,
};

const CIRCULAR_WEIGHT: f64 = 0.40;
const CONFLICT_WEIGHT: f64 = 0.25;
const DEPTH_WEIGHT: f64 = 0.20;
const COUPLING_WEIGHT: f64 = 0.15;

const SELF_LOOP_PENALTY: i64 = 25;
const DIRECT_PENALTY: i64 = 15;
const INDIRECT_PENALTY: i64 = 10;

/// Chains up to this many edges are not penalized.
const DEPTH_ALLOWANCE: f64 = 4.0;

/// Computes the weighted health score of a workspace.
#[derive(Debug)]
pub struct HealthCalculator<'g> {
    graph: &'g DependencyGraph,
}

/// Longest outgoing chain per package.
#[derive(Debug, Clone, PartialEq)]
struct DepthStats {
    max: usize,
    max_package: Option<String>,
    average: f64,
}

impl<'g> HealthCalculator<'g> {
    /// Create a calculator over a built graph.
    #[must_use]
    pub const fn new(graph: &'g DependencyGraph) -> Self {
        Self { graph }
    }

    /// Score the workspace given its detected cycles and conflicts.
    #[must_use]
    pub fn calculate(
        &self,
        cycles: &[CircularDependencyInfo],
        conflicts: &[VersionConflictInfo],
    ) -> HealthScoreResult {
        let circular = circular_score(cycles);
        let conflict = conflict_score(conflicts);
        let depth_stats = self.depth_stats();
        let depth = depth_score(&depth_stats);
        let average_instability = self.average_instability();
        let coupling = coupling_score(average_instability);

        let weighted = f64::from(circular) * CIRCULAR_WEIGHT
            + f64::from(conflict) * CONFLICT_WEIGHT
            + f64::from(depth) * DEPTH_WEIGHT
            + f64::from(coupling) * COUPLING_WEIGHT;
        let overall = weighted.round().clamp(0.0, 100.0) as u8;
        let rating = HealthRating::from_score(overall);

        tracing::info!(
            overall = overall,
            rating = %rating,
            circular = circular,
            conflicts = conflict,
            depth = depth,
            coupling = coupling,
            "Health score computed"
        );

        HealthScoreResult {
            overall,
            rating,
            breakdown: HealthBreakdown {
                circular_score: circular,
                conflict_score: conflict,
                depth_score: depth,
                coupling_score: coupling,
            },
            factors: vec![
                health_factor(
                    "Circular Dependencies",
                    circular,
                    CIRCULAR_WEIGHT,
                    format!("{} circular dependenc(ies) detected", cycles.len()),
                    circular_recommendations(cycles),
                ),
                health_factor(
                    "Version Conflicts",
                    conflict,
                    CONFLICT_WEIGHT,
                    format!("{} external dependenc(ies) with conflicting ranges", conflicts.len()),
                    conflict_recommendations(conflicts),
                ),
                health_factor(
                    "Dependency Depth",
                    depth,
                    DEPTH_WEIGHT,
                    format!(
                        "Longest internal chain is {} edge(s), average {:.1}",
                        depth_stats.max, depth_stats.average
                    ),
                    depth_recommendations(&depth_stats),
                ),
                health_factor(
                    "Coupling",
                    coupling,
                    COUPLING_WEIGHT,
                    average_instability.map_or_else(
                        || "No internal dependencies between packages".to_string(),
                        |i| format!("Average instability {i:.2} (0 = stable, 1 = unstable)"),
                    ),
                    coupling_recommendations(average_instability),
                ),
            ],
            updated_at: chrono::Utc::now(),
        }
    }

    /// Longest outgoing chain (in edges) per package via memoized iterative
    /// depth-first search. A neighbour already on the current path counts
    /// as depth 0.
    fn depth_stats(&self) -> DepthStats {
        let names: Vec<&str> = self.graph.package_names().collect();
        if names.is_empty() {
            return DepthStats {
                max: 0,
                max_package: None,
                average: 0.0,
            };
        }

        let adjacency: Vec<Vec<usize>> = names
            .iter()
            .map(|n| {
                self.graph
                    .dependencies(n)
                    .into_iter()
                    .filter_map(|d| names.binary_search(&d).ok())
                    .collect()
            })
            .collect();

        let mut memo: Vec<Option<usize>> = vec![None; names.len()];
        let mut on_path = vec![false; names.len()];

        for root in 0..names.len() {
            if memo[root].is_some() {
                continue;
            }
            // (node, next neighbour position, best depth so far)
            let mut stack = vec![(root, 0_usize, 0_usize)];
            on_path[root] = true;

            while let Some(&(v, cursor, best)) = stack.last() {
                if let Some(&w) = adjacency[v].get(cursor) {
                    let candidate = if on_path[w] {
                        Some(1)
                    } else {
                        memo[w].map(|d| d + 1)
                    };
                    if let Some(frame) = stack.last_mut() {
                        frame.1 += 1;
                        if let Some(c) = candidate {
                            frame.2 = frame.2.max(c);
                        }
                    }
                    if candidate.is_none() {
                        on_path[w] = true;
                        stack.push((w, 0, 0));
                    }
                    continue;
                }

                stack.pop();
                memo[v] = Some(best);
                on_path[v] = false;
                if let Some(parent) = stack.last_mut() {
                    parent.2 = parent.2.max(best + 1);
                }
            }
        }

        let depths: Vec<usize> = memo.into_iter().map(Option::unwrap_or_default).collect();
        let (max_index, max) = depths
            .iter()
            .copied()
            .enumerate()
            .fold((0, 0), |(bi, bd), (i, d)| if d > bd { (i, d) } else { (bi, bd) });
        let average = depths.iter().sum::<usize>() as f64 / depths.len() as f64;

        DepthStats {
            max,
            max_package: (max > 0).then(|| names[max_index].to_string()),
            average,
        }
    }

    /// Mean instability over packages with at least one internal edge.
    fn average_instability(&self) -> Option<f64> {
        let values: Vec<f64> = self
            .graph
            .package_names()
            .filter_map(|name| {
                let efferent = self.graph.dependencies(name).len();
                let afferent = self.graph.dependents(name).len();
                let total = efferent + afferent;
                (total > 0).then(|| efferent as f64 / total as f64)
            })
            .collect();

        (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn clamp_score(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

fn circular_score(cycles: &[CircularDependencyInfo]) -> u8 {
    let penalty: i64 = cycles
        .iter()
        .map(|c| {
            if c.is_self_loop() {
                SELF_LOOP_PENALTY
            } else if c.cycle_type == CycleType::Direct {
                DIRECT_PENALTY
            } else {
                INDIRECT_PENALTY
            }
        })
        .sum();
    (100 - penalty).clamp(0, 100) as u8
}

fn conflict_score(conflicts: &[VersionConflictInfo]) -> u8 {
    let penalty: i64 = conflicts
        .iter()
        .map(|c| match c.severity {
            Severity::Critical => 10,
            Severity::Warning => 5,
            Severity::Info => 2,
        })
        .sum();
    (100 - penalty).clamp(0, 100) as u8
}

fn depth_score(stats: &DepthStats) -> u8 {
    let max_excess = (stats.max as f64 - DEPTH_ALLOWANCE).max(0.0);
    let avg_excess = (stats.average - DEPTH_ALLOWANCE).max(0.0);
    clamp_score(100.0 - 10.0 * max_excess - 5.0 * avg_excess)
}

fn coupling_score(average_instability: Option<f64>) -> u8 {
    average_instability.map_or(100, |i| clamp_score(100.0 - 100.0 * (i - 0.5).abs()))
}

fn health_factor(
    name: &str,
    score: u8,
    weight: f64,
    description: String,
    recommendations: Vec<String>,
) -> HealthFactor {
    HealthFactor {
        name: name.to_string(),
        score,
        weight,
        weighted_score: f64::from(score) * weight,
        description,
        recommendations,
    }
}

fn circular_recommendations(cycles: &[CircularDependencyInfo]) -> Vec<String> {
    if cycles.is_empty() {
        return vec![
            "No circular dependencies; run `monodeps analyze --strict` in CI to keep it that way"
                .to_string(),
        ];
    }

    let mut recs = Vec::new();
    let direct: Vec<String> = cycles
        .iter()
        .filter(|c| c.cycle_type == CycleType::Direct)
        .take(3)
        .map(CircularDependencyInfo::display_path)
        .collect();
    if !direct.is_empty() {
        recs.push(format!(
            "Break direct cycles first, they are the cheapest to fix: {}",
            direct.join("; ")
        ));
    }
    let indirect = cycles
        .iter()
        .filter(|c| c.cycle_type == CycleType::Indirect)
        .count();
    if indirect > 0 {
        recs.push(format!(
            "{indirect} indirect cycle(s) span three or more packages; look for a shared module to extract"
        ));
    }
    let critical = cycles.iter().filter(|c| c.severity == Severity::Critical).count();
    if critical > 0 {
        recs.push(format!(
            "{critical} cycle(s) run through production dependencies and affect runtime behaviour"
        ));
    }
    recs
}

fn conflict_recommendations(conflicts: &[VersionConflictInfo]) -> Vec<String> {
    if conflicts.is_empty() {
        return vec!["All external dependencies use consistent version ranges".to_string()];
    }

    let names_with = |severity: Severity| -> Vec<&str> {
        conflicts
            .iter()
            .filter(|c| c.severity == severity)
            .map(|c| c.package_name.as_str())
            .collect()
    };

    let mut recs = Vec::new();
    let critical = names_with(Severity::Critical);
    if !critical.is_empty() {
        recs.push(format!("Align major versions of: {}", critical.join(", ")));
    }
    let warning = names_with(Severity::Warning);
    if !warning.is_empty() {
        recs.push(format!("Align minor versions of: {}", warning.join(", ")));
    }
    let info = names_with(Severity::Info);
    if !info.is_empty() {
        recs.push(format!(
            "Deduplicate patch-level drift in {} dependenc(ies) with a single shared range",
            info.len()
        ));
    }
    recs
}

fn depth_recommendations(stats: &DepthStats) -> Vec<String> {
    match &stats.max_package {
        Some(package) if stats.max as f64 > DEPTH_ALLOWANCE => vec![format!(
            "The chain starting at {package} is {} edges deep; flatten layers beyond {}",
            stats.max, DEPTH_ALLOWANCE
        )],
        _ => vec![format!(
            "Dependency chains are shallow (longest is {} edge(s))",
            stats.max
        )],
    }
}

fn coupling_recommendations(average_instability: Option<f64>) -> Vec<String> {
    let recommendation = match average_instability {
        None => "Packages are independent of each other".to_string(),
        Some(i) if i > 0.7 => format!(
            "Average instability is {i:.2}: most packages depend on others far more than they are depended on; extract stable shared abstractions"
        ),
        Some(i) if i < 0.3 => format!(
            "Average instability is {i:.2}: most packages are heavily depended upon; keep their APIs stable and well tested"
        ),
        Some(i) => format!("Coupling is balanced (average instability {i:.2})"),
    };
    vec![recommendation]
}
