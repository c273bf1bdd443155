//! External version conflict detection.
//!
//! This module finds registry dependencies that workspace packages declare
//! with different version ranges.

use crate::graph::DependencyGraph;
use crate::semver_utils::{self, VersionDiff};
use crate::types::{ConflictingVersion, DependencyType, Severity, VersionConflictInfo};
use std::collections::BTreeMap;

/// Detector for external dependency version conflicts.
///
/// # Algorithm Overview
///
/// ## Phase 1: Grouping
///
/// Every external dependency of every non-excluded package is grouped by
/// dependency name, then by exact range string:
///
/// ```text
/// lodash:
///   ^4.17.19 ← @acme/ui (production), @acme/api (production)
///   ^4.17.21 ← @acme/cli (development)
/// ```
///
/// ## Phase 2: Pairwise Comparison
///
/// For each dependency with two or more distinct ranges, every pair of
/// ranges is compared by representative version:
///
/// ```text
/// Compare: ^4.17.19 vs ^4.17.21
///   - 4.17.19 vs 4.17.21 → patch difference → INFO
/// ```
///
/// A pair where either side has no version (`latest`, `*`, git URLs) is
/// treated as a major difference.
///
/// ## Phase 3: Severity Classification
///
/// The conflict takes the worst pairwise severity: major ⇒ critical,
/// minor ⇒ warning, patch or prerelease ⇒ info.
///
/// # Example
///
/// ```rust
/// use monodeps::analyzer::ConflictDetector;
/// use monodeps::graph::GraphBuilder;
/// use monodeps::types::{PackageInfo, Severity, WorkspaceData, WorkspaceType};
///
/// let workspace = WorkspaceData::new(".", WorkspaceType::Npm)
///     .with_package(PackageInfo::new("a", "1.0.0").with_dependency("react", "^17.0.0"))
///     .with_package(PackageInfo::new("b", "1.0.0").with_dependency("react", "^18.2.0"));
/// let graph = GraphBuilder::new().build(&workspace).unwrap();
///
/// let conflicts = ConflictDetector::new(&graph).detect();
/// assert_eq!(conflicts[0].severity, Severity::Critical);
/// ```
#[derive(Debug)]
pub struct ConflictDetector<'g> {
    graph: &'g DependencyGraph,
}

/// Consumers of one range, in first-seen order.
struct RangeUsage<'g> {
    range: &'g str,
    consumers: Vec<(&'g str, DependencyType)>,
}

impl<'g> ConflictDetector<'g> {
    /// Create a detector over a built graph.
    #[must_use]
    pub const fn new(graph: &'g DependencyGraph) -> Self {
        Self { graph }
    }

    /// Find every external dependency declared with two or more ranges.
    ///
    /// Results are ordered by severity (worst first), then dependency name.
    #[must_use]
    pub fn detect(&self) -> Vec<VersionConflictInfo> {
        // Phase 1: Grouping
        tracing::debug!("Phase 1: Grouping external dependencies by range");
        let grouped = self.group_usages();
        tracing::debug!(external_dependencies = grouped.len(), "Grouped external dependencies");

        // Phase 2 + 3: Pairwise comparison and classification
        tracing::debug!("Phase 2: Comparing ranges");
        let mut conflicts: Vec<VersionConflictInfo> = grouped
            .iter()
            .filter(|(_, usages)| usages.len() >= 2)
            .map(|(name, usages)| Self::build_conflict(name, usages))
            .collect();

        conflicts.sort_by(|a, b| {
            b.severity
                .cmp(&a.severity)
                .then_with(|| a.package_name.cmp(&b.package_name))
        });

        tracing::info!(conflicts = conflicts.len(), "Conflict detection complete");
        conflicts
    }

    fn group_usages(&self) -> BTreeMap<&'g str, Vec<RangeUsage<'g>>> {
        let mut grouped: BTreeMap<&str, Vec<RangeUsage<'_>>> = BTreeMap::new();

        for node in self.graph.nodes() {
            if node.excluded {
                tracing::debug!(package = %node.name, "Skipping excluded package");
                continue;
            }
            for kind in DependencyType::ALL {
                for (dep, range) in node.external(kind) {
                    let usages = grouped.entry(dep.as_str()).or_default();
                    let consumer = (node.name.as_str(), kind);
                    match usages.iter_mut().find(|u| u.range == range.as_str()) {
                        Some(usage) => usage.consumers.push(consumer),
                        None => usages.push(RangeUsage {
                            range: range.as_str(),
                            consumers: vec![consumer],
                        }),
                    }
                }
            }
        }

        grouped
    }

    fn build_conflict(name: &str, usages: &[RangeUsage<'_>]) -> VersionConflictInfo {
        let mut severity = Severity::Info;
        let mut breaking = vec![false; usages.len()];
        let mut pairs_checked = 0;

        for i in 0..usages.len() {
            for j in (i + 1)..usages.len() {
                pairs_checked += 1;
                let diff = semver_utils::version_difference(usages[i].range, usages[j].range);
                let pair_severity = pair_severity(diff);
                severity = severity.max(pair_severity);
                if matches!(diff, None | Some(VersionDiff::Major)) {
                    breaking[i] = true;
                    breaking[j] = true;
                }
            }
        }
        tracing::debug!(
            dependency = %name,
            ranges = usages.len(),
            pairs_checked = pairs_checked,
            severity = %severity,
            "Compared ranges"
        );

        let conflicting_versions: Vec<ConflictingVersion> = usages
            .iter()
            .zip(breaking)
            .map(|(usage, is_breaking)| {
                let mut packages: Vec<String> =
                    usage.consumers.iter().map(|(p, _)| (*p).to_string()).collect();
                packages.sort();
                packages.dedup();
                let dependency_type = usage
                    .consumers
                    .iter()
                    .map(|&(_, kind)| kind)
                    .max_by_key(|kind| kind.strength())
                    .unwrap_or(DependencyType::Production);
                ConflictingVersion {
                    version: usage.range.to_string(),
                    packages,
                    is_breaking,
                    dependency_type,
                }
            })
            .collect();

        let ranges: Vec<&str> = usages.iter().map(|u| u.range).collect();
        let recommended_version = semver_utils::find_highest_version(&ranges);

        VersionConflictInfo {
            package_name: name.to_string(),
            resolution: resolution_text(name, &conflicting_versions, recommended_version.as_deref()),
            impact: impact_text(name, severity, &conflicting_versions),
            conflicting_versions,
            severity,
            recommended_version,
        }
    }
}

fn pair_severity(diff: Option<VersionDiff>) -> Severity {
    match diff {
        None | Some(VersionDiff::Major) => Severity::Critical,
        Some(VersionDiff::Minor) => Severity::Warning,
        Some(VersionDiff::Patch | VersionDiff::Prerelease | VersionDiff::None) => Severity::Info,
    }
}

fn consumer_count(versions: &[ConflictingVersion]) -> usize {
    let mut all: Vec<&str> = versions
        .iter()
        .flat_map(|v| v.packages.iter().map(String::as_str))
        .collect();
    all.sort_unstable();
    all.dedup();
    all.len()
}

fn resolution_text(name: &str, versions: &[ConflictingVersion], recommended: Option<&str>) -> String {
    let Some(recommended) = recommended else {
        return format!(
            "None of the {} declared ranges of {name} names a comparable version; pin every consumer to one explicit version",
            versions.len()
        );
    };

    let to_update: Vec<&str> = versions
        .iter()
        .filter(|v| v.version != recommended)
        .flat_map(|v| v.packages.iter().map(String::as_str))
        .collect();
    let mut text = format!("Align all consumers on {name}@{recommended}");
    if !to_update.is_empty() {
        text.push_str(&format!(" (update {})", to_update.join(", ")));
    }
    if versions.iter().any(|v| v.is_breaking) {
        text.push_str("; review the changelog for breaking changes before upgrading");
    }
    text
}

fn impact_text(name: &str, severity: Severity, versions: &[ConflictingVersion]) -> String {
    let consumers = consumer_count(versions);
    let mut text = match severity {
        Severity::Critical => format!(
            "{consumers} packages resolve incompatible major versions of {name}; \
             bundles may ship several copies and runtime behaviour can diverge"
        ),
        Severity::Warning => format!(
            "{consumers} packages use different minor versions of {name}; \
             features available in one package may be missing in another"
        ),
        Severity::Info => format!(
            "{consumers} packages use different patch versions of {name}; \
             usually harmless but duplicates installs"
        ),
    };
    if versions.iter().any(|v| v.dependency_type == DependencyType::Peer) {
        text.push_str("; peer ranges must overlap for consumers to install cleanly");
    }
    text
}
