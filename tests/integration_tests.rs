//! Integration tests for MonoDeps.
//!
//! These tests drive the public API end to end: graph construction, cycle
//! and conflict detection, enrichment, health scoring, the JSON envelope,
//! and the command-line binary.

use monodeps::types::{DependencyType, HealthRating, RiskLevel};
use monodeps::{
    Analyzer, CircularDependencyInfo, Config, PackageInfo, Severity, WorkspaceData,
    WorkspaceType,
};

fn package(name: &str) -> PackageInfo {
    PackageInfo::new(name, "1.0.0").with_path(format!("packages/{name}"))
}

/// A → B → C → A
fn ring() -> WorkspaceData {
    WorkspaceData::new("/repo", WorkspaceType::Pnpm)
        .with_package(package("a").with_dependency("b", "workspace:*"))
        .with_package(package("b").with_dependency("c", "workspace:*"))
        .with_package(package("c").with_dependency("a", "workspace:*"))
}

/// A larger workspace with a direct cycle, an indirect cycle, dependents of
/// both, and external conflicts.
fn monorepo() -> WorkspaceData {
    WorkspaceData::new("/repo", WorkspaceType::Yarn)
        .with_package(
            package("@acme/app")
                .with_dependency("@acme/ui", "workspace:*")
                .with_dependency("@acme/api", "workspace:*")
                .with_dependency("react", "^18.2.0")
                .with_dependency("lodash", "^4.17.21"),
        )
        .with_package(
            package("@acme/ui")
                .with_dependency("@acme/app", "workspace:*")
                .with_dependency("react", "^17.0.2")
                .with_dependency("lodash", "^4.17.19"),
        )
        .with_package(package("@acme/api").with_dependency("@acme/db", "workspace:*"))
        .with_package(
            package("@acme/db")
                .with_dependency("@acme/core", "workspace:*")
                .with_dependency("typescript", "4.9.0"),
        )
        .with_package(
            package("@acme/core")
                .with_dependency("@acme/api", "workspace:*")
                .with_dev_dependency("typescript", "5.1.0"),
        )
        .with_package(package("@acme/web").with_dependency("@acme/app", "workspace:*"))
        .with_package(package("@acme/docs").with_dependency("@acme/web", "workspace:*"))
}

mod graph_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use monodeps::exclusion::ExclusionMatcher;
    use monodeps::graph::GraphBuilder;

    #[test]
    fn test_build_is_deterministic() {
        let snapshot = || {
            let graph = GraphBuilder::new().build(&monorepo()).unwrap();
            let nodes: Vec<String> = graph.package_names().map(str::to_string).collect();
            let edges: Vec<String> = graph.edges().map(ToString::to_string).collect();
            (nodes, edges)
        };

        let first = snapshot();
        for _ in 0..5 {
            assert_eq!(snapshot(), first);
        }
    }

    #[test]
    fn test_edges_reference_nodes_and_never_self() {
        let ws = monorepo().with_package(package("selfish").with_dependency("selfish", "*"));
        let graph = GraphBuilder::new().build(&ws).unwrap();

        for edge in graph.edges() {
            assert!(graph.contains(&edge.from), "{} missing", edge.from);
            assert!(graph.contains(&edge.to), "{} missing", edge.to);
            assert_ne!(edge.from, edge.to);
        }
    }

    #[test]
    fn test_external_dependencies_are_not_edges() {
        let graph = GraphBuilder::new().build(&monorepo()).unwrap();
        assert!(!graph.contains("react"));
        assert!(graph.edges().all(|e| e.to.starts_with("@acme/")));
    }

    #[test]
    fn test_exclusions_flag_packages() {
        let matcher = ExclusionMatcher::new(&["@acme/docs", "regex:^@acme/w"]).unwrap();
        let graph = GraphBuilder::new()
            .with_exclusions(&matcher)
            .build(&monorepo())
            .unwrap();
        assert_eq!(graph.excluded_packages(), vec!["@acme/docs", "@acme/web"]);
    }

    #[test]
    fn test_unnamed_package_is_rejected() {
        let ws = WorkspaceData::new("/repo", WorkspaceType::Npm).with_package(package(""));
        let err = GraphBuilder::new().build(&ws).unwrap_err();
        assert_eq!(err.code(), "INVALID_INPUT");
    }
}

mod cycle_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use monodeps::types::CycleType;

    #[test]
    fn test_three_node_ring() {
        let cycles = Analyzer::new(&Config::default()).detect_cycles(&ring()).unwrap();

        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].depth, 3);
        assert_eq!(cycles[0].cycle_type, CycleType::Indirect);
        assert_eq!(cycles[0].cycle, vec!["a", "b", "c", "a"]);
    }

    /// a ⇄ b ⇄ c: one component with no simple cycle through all three.
    fn bidirectional_line() -> WorkspaceData {
        WorkspaceData::new("/repo", WorkspaceType::Npm)
            .with_package(package("a").with_dependency("b", "workspace:*"))
            .with_package(
                package("b")
                    .with_dependency("a", "workspace:*")
                    .with_dependency("c", "workspace:*"),
            )
            .with_package(package("c").with_dependency("b", "workspace:*"))
    }

    #[test]
    fn test_cycle_paths_are_closed_graph_walks() {
        let analyzer = Analyzer::new(&Config::default());

        for ws in [ring(), monorepo(), bidirectional_line()] {
            let graph = analyzer.build_graph(&ws).unwrap();
            let result = analyzer.analyze(&ws).unwrap();
            assert!(!result.circular_dependencies.is_empty());

            for cycle in &result.circular_dependencies {
                assert_eq!(cycle.cycle.first(), cycle.cycle.last());
                assert!(cycle.participants().len() <= cycle.depth);
                for (from, to) in cycle.edges() {
                    assert!(
                        graph.dependencies(from).contains(&to),
                        "{from} → {to} is not an edge"
                    );
                }

                let root_cause = cycle.root_cause.as_ref().unwrap();
                for edge in &root_cause.chain {
                    assert!(
                        graph.dependencies(&edge.from).contains(&edge.to.as_str()),
                        "chain {} → {} is not an edge",
                        edge.from,
                        edge.to
                    );
                }
            }
        }
    }

    #[test]
    fn test_bidirectional_line_is_one_component() {
        let cycles = Analyzer::new(&Config::default())
            .detect_cycles(&bidirectional_line())
            .unwrap();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].depth, 3);
        assert_eq!(cycles[0].display_path(), "a → b → a");
    }

    #[test]
    fn test_monorepo_cycles() {
        let cycles = Analyzer::new(&Config::default()).detect_cycles(&monorepo()).unwrap();
        let mut paths: Vec<_> = cycles.iter().map(CircularDependencyInfo::display_path).collect();
        paths.sort();

        assert_eq!(
            paths,
            vec![
                "@acme/api → @acme/db → @acme/core → @acme/api",
                "@acme/app → @acme/ui → @acme/app",
            ]
        );
        for cycle in &cycles {
            let expected = if cycle.depth == 2 {
                Severity::Critical
            } else {
                Severity::Warning
            };
            assert_eq!(cycle.severity, expected, "{}", cycle.display_path());
        }
    }

    #[test]
    fn test_acyclic_workspace() {
        let ws = WorkspaceData::new("/repo", WorkspaceType::Npm)
            .with_package(package("a").with_dependency("b", "*"))
            .with_package(package("b").with_dependency("c", "*"))
            .with_package(package("c"));
        assert!(Analyzer::new(&Config::default()).detect_cycles(&ws).unwrap().is_empty());
    }

    #[test]
    fn test_long_chain_does_not_exhaust_stack() {
        let mut ws = WorkspaceData::new("/repo", WorkspaceType::Npm);
        let n = 2_000;
        for i in 0..n {
            ws = ws.with_package(package(&format!("p{i}")).with_dependency(format!("p{}", (i + 1) % n), "*"));
        }

        let cycles = Analyzer::new(&Config::default()).detect_cycles(&ws).unwrap();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].depth, n);
    }
}

mod conflict_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use monodeps::semver_utils::find_highest_version;
    use test_case::test_case;

    fn pair(a: &str, b: &str) -> WorkspaceData {
        WorkspaceData::new("/repo", WorkspaceType::Npm)
            .with_package(package("x").with_dependency("lodash", a))
            .with_package(package("y").with_dependency("lodash", b))
    }

    #[test_case("^4.17.19", "^4.17.21", Severity::Info ; "patch")]
    #[test_case("4.17.0", "4.18.0", Severity::Warning ; "minor")]
    #[test_case("3.0.0", "4.0.0", Severity::Critical ; "major")]
    #[test_case("latest", "4.0.0", Severity::Critical ; "unparseable")]
    fn test_conflict_severity(a: &str, b: &str, expected: Severity) {
        let conflicts = Analyzer::new(&Config::default())
            .detect_conflicts(&pair(a, b))
            .unwrap();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].severity, expected);
    }

    #[test]
    fn test_find_highest_version() {
        assert_eq!(
            find_highest_version(&["^4.17.19", "^4.17.21", "^4.17.20"]).as_deref(),
            Some("^4.17.21")
        );
    }

    #[test]
    fn test_monorepo_conflicts() {
        let conflicts = Analyzer::new(&Config::default()).detect_conflicts(&monorepo()).unwrap();
        let names: Vec<_> = conflicts.iter().map(|c| c.package_name.as_str()).collect();
        assert_eq!(names.len(), 3);
        for expected in ["lodash", "react", "typescript"] {
            assert!(names.contains(&expected), "{expected} not reported");
        }

        let react = conflicts.iter().find(|c| c.package_name == "react").unwrap();
        assert_eq!(react.severity, Severity::Critical);
        assert_eq!(react.recommended_version.as_deref(), Some("^18.2.0"));

        let typescript = conflicts.iter().find(|c| c.package_name == "typescript").unwrap();
        let dev = typescript
            .conflicting_versions
            .iter()
            .find(|v| v.version == "5.1.0")
            .unwrap();
        assert_eq!(dev.dependency_type, DependencyType::Development);
    }

    #[test]
    fn test_same_range_is_not_a_conflict() {
        let conflicts = Analyzer::new(&Config::default())
            .detect_conflicts(&pair("^1.0.0", "^1.0.0"))
            .unwrap();
        assert!(conflicts.is_empty());
    }
}

mod exclusion_tests {
    use monodeps::exclusion::ExclusionMatcher;
    use test_case::test_case;

    #[test_case("packages/deprecated-*", "packages/deprecated-old", true ; "glob prefix")]
    #[test_case("packages/deprecated-*", "packages/deprecated", false ; "glob needs suffix")]
    #[test_case("**/test-*", "test-runner", true ; "double star at root")]
    #[test_case("**/test-*", "apps/web/test-helpers", true ; "double star nested")]
    #[test_case("@acme/legacy", "@acme/legacy", true ; "exact")]
    #[test_case("@acme/legacy", "@acme/legacy-ui", false ; "exact only")]
    #[test_case("regex:^@old/", "@old/thing", true ; "regex")]
    fn test_pattern(pattern: &str, id: &str, excluded: bool) {
        let matcher = ExclusionMatcher::new(&[pattern]).unwrap();
        assert_eq!(matcher.is_excluded(id), excluded);
    }

    #[test]
    fn test_invalid_regex_is_an_error() {
        let err = ExclusionMatcher::new(&["regex:("]).unwrap_err();
        assert_eq!(err.code(), "INVALID_PATTERN");
    }
}

mod analysis_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use monodeps::fix::ResultEnricher;

    #[test]
    fn test_full_analysis() {
        let result = Analyzer::new(&Config::default()).analyze(&monorepo()).unwrap();

        assert_eq!(result.packages, 7);
        assert_eq!(result.circular_dependencies.len(), 2);
        assert_eq!(result.fix_summary.total_cycles, 2);

        for cycle in &result.circular_dependencies {
            assert!(cycle.root_cause.is_some());
            assert!(cycle.complexity.is_some());
            assert!(cycle.impact.is_some());
            assert!(cycle.quick_fix.is_some());
            assert!(cycle.priority_score.is_some());
            assert!(!cycle.fix_strategies.is_empty());
            for strategy in &cycle.fix_strategies {
                assert!(strategy.guide.is_some());
                assert!(strategy.before_after.is_some());
            }
        }

        let scores: Vec<f64> = result
            .circular_dependencies
            .iter()
            .filter_map(|c| c.priority_score.as_ref().map(|p| p.score))
            .collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let analyzer = Analyzer::new(&Config::default());
        let strip = |json: serde_json::Value| {
            let mut json = json;
            json["analyzedAt"] = serde_json::Value::Null;
            json["healthScore"]["updatedAt"] = serde_json::Value::Null;
            json
        };

        let first = strip(serde_json::to_value(analyzer.analyze(&monorepo()).unwrap()).unwrap());
        let second = strip(serde_json::to_value(analyzer.analyze(&monorepo()).unwrap()).unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sequential = Analyzer::new(&Config::default()).analyze(&monorepo()).unwrap();

        let mut config = Config::default();
        config.analysis.parallel = true;
        let parallel = Analyzer::new(&config).analyze(&monorepo()).unwrap();

        assert_eq!(sequential.circular_dependencies, parallel.circular_dependencies);
        assert_eq!(sequential.fix_summary, parallel.fix_summary);
    }

    #[test]
    fn test_re_enrichment_is_idempotent() {
        let result = Analyzer::new(&Config::default()).analyze(&monorepo()).unwrap();
        let mut cycles = result.circular_dependencies.clone();

        let summary = ResultEnricher::new().enrich(&mut cycles);

        assert_eq!(cycles, result.circular_dependencies);
        assert_eq!(summary, result.fix_summary);
    }

    #[test]
    fn test_priority_monotonic() {
        let result = Analyzer::new(&Config::default()).analyze(&ring()).unwrap();
        let base = result.circular_dependencies[0].clone();
        let enricher = ResultEnricher::new();

        let score_with = |risk: RiskLevel, complexity: u8| {
            let mut cycle = base.clone();
            cycle.priority_score = None;
            if let Some(impact) = cycle.impact.as_mut() {
                impact.risk_level = risk;
            }
            if let Some(c) = cycle.complexity.as_mut() {
                c.score = complexity;
            }
            enricher.enrich_cycle(&mut cycle);
            cycle.priority_score.unwrap().score
        };

        let risks = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High, RiskLevel::Critical];
        let by_risk: Vec<f64> = risks.iter().map(|&r| score_with(r, 5)).collect();
        assert!(by_risk.windows(2).all(|w| w[0] < w[1]), "{by_risk:?}");

        let by_complexity: Vec<f64> = (1..=10).map(|c| score_with(RiskLevel::High, c)).collect();
        assert!(by_complexity.windows(2).all(|w| w[0] >= w[1]), "{by_complexity:?}");
    }

    #[test]
    fn test_excluded_cycle_is_dropped() {
        let mut config = Config::default();
        config.analysis.exclude_patterns = vec!["@acme/app".into(), "@acme/ui".into()];
        let result = Analyzer::new(&config).analyze(&monorepo()).unwrap();

        assert_eq!(result.circular_dependencies.len(), 1);
        assert_eq!(result.excluded_packages, vec!["@acme/app", "@acme/ui"]);
        assert!(!result.circular_dependencies[0].contains("@acme/app"));
    }
}

mod health_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_workspace_is_excellent() {
        let ws = WorkspaceData::new("/repo", WorkspaceType::Npm);
        let health = Analyzer::new(&Config::default()).health(&ws).unwrap();
        assert_eq!(health.overall, 100);
        assert_eq!(health.rating, HealthRating::Excellent);
    }

    #[test]
    fn test_single_direct_cycle() {
        let ws = WorkspaceData::new("/repo", WorkspaceType::Npm)
            .with_package(package("a").with_dependency("b", "*"))
            .with_package(package("b").with_dependency("a", "*"));
        let health = Analyzer::new(&Config::default()).health(&ws).unwrap();
        assert_eq!(health.breakdown.circular_score, 85);
    }

    #[test]
    fn test_scores_stay_in_bounds() {
        // every package depends on every other
        let names: Vec<String> = (0..12).map(|i| format!("p{i}")).collect();
        let mut ws = WorkspaceData::new("/repo", WorkspaceType::Npm);
        for (i, name) in names.iter().enumerate() {
            let mut pkg = package(name).with_dependency("left-pad", format!("{i}.0.0"));
            for other in names.iter().filter(|o| *o != name) {
                pkg = pkg.with_dependency(other.as_str(), "*");
            }
            ws = ws.with_package(pkg);
        }

        let health = Analyzer::new(&Config::default()).health(&ws).unwrap();
        for score in [
            health.overall,
            health.breakdown.circular_score,
            health.breakdown.conflict_score,
            health.breakdown.depth_score,
            health.breakdown.coupling_score,
        ] {
            assert!(score <= 100);
        }
        assert_ne!(health.rating, HealthRating::Excellent);
    }

    #[test]
    fn test_health_matches_full_analysis() {
        let analyzer = Analyzer::new(&Config::default());
        let health = analyzer.health(&monorepo()).unwrap();
        let result = analyzer.analyze(&monorepo()).unwrap();
        assert_eq!(health.overall, result.health_score.overall);
        assert_eq!(health.breakdown, result.health_score.breakdown);
    }
}

mod envelope_tests {
    use monodeps::envelope::{analyze_json, health_json};
    use serde_json::Value;

    #[test]
    fn test_exactly_one_side_is_populated() {
        let inputs = [
            r#"{"rootPath": "/repo", "packages": {}}"#,
            "not json",
            r#"{"rootPath": "/repo", "packages": {"a": {"name": "", "version": "1.0.0"}}}"#,
        ];
        for input in inputs {
            for out in [analyze_json(input, None), health_json(input, None)] {
                let out: Value = serde_json::from_str(&out).unwrap();
                assert!(out["data"].is_null() != out["error"].is_null(), "{out}");
            }
        }
    }

    #[test]
    fn test_list_fields_always_present() {
        let out: Value = serde_json::from_str(&analyze_json(
            r#"{"rootPath": "/repo", "packages": {"a": {"name": "a", "version": "1.0.0"}}}"#,
            None,
        ))
        .unwrap();
        assert_eq!(out["data"]["circularDependencies"], serde_json::json!([]));
        assert_eq!(out["data"]["versionConflicts"], serde_json::json!([]));
        assert_eq!(out["data"]["fixSummary"]["priorityCycles"], serde_json::json!([]));
    }
}

mod cli_tests {
    use assert_cmd::Command;
    use predicates::prelude::*;
    use std::path::Path;

    const CYCLE: &str = r#"{
        "rootPath": "/repo",
        "workspaceType": "npm",
        "packages": {
            "a": { "name": "a", "version": "1.0.0", "dependencies": { "b": "*" } },
            "b": { "name": "b", "version": "1.0.0", "dependencies": { "a": "*" } }
        }
    }"#;

    const DEV_CYCLE: &str = r#"{
        "rootPath": "/repo",
        "packages": {
            "api": { "name": "api", "version": "1.0.0", "dependencies": { "db": "*" } },
            "db": { "name": "db", "version": "1.0.0", "dependencies": { "cache": "*" } },
            "cache": { "name": "cache", "version": "1.0.0", "devDependencies": { "api": "*" } }
        }
    }"#;

    const CLEAN: &str = r#"
rootPath: /repo
workspaceType: pnpm
packages:
  a:
    name: a
    version: 1.0.0
    dependencies:
      b: "workspace:*"
  b:
    name: b
    version: 1.0.0
"#;

    fn monodeps(dir: &Path) -> Command {
        let mut cmd = Command::cargo_bin("monodeps").unwrap();
        cmd.current_dir(dir).env("NO_COLOR", "1").env_remove("MONODEPS_CONFIG");
        cmd
    }

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_help() {
        let dir = tempfile::tempdir().unwrap();
        monodeps(dir.path())
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("analyze"));
    }

    #[test]
    fn test_analyze_critical_cycle_exits_2() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "workspace.json", CYCLE);

        monodeps(dir.path())
            .args(["analyze", "workspace.json", "--format", "json"])
            .assert()
            .code(2)
            .stdout(predicate::str::contains("\"circularDependencies\""))
            .stdout(predicate::str::contains("\"criticalCycles\": 1"));
    }

    #[test]
    fn test_analyze_clean_yaml_workspace() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "workspace.yaml", CLEAN);

        monodeps(dir.path())
            .args(["analyze", "workspace.yaml"])
            .assert()
            .success()
            .stdout(predicate::str::contains("MonoDeps Analysis"))
            .stdout(predicate::str::contains("PASSED - No issues found"));
    }

    #[test]
    fn test_strict_fails_on_warnings() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "workspace.json", DEV_CYCLE);

        monodeps(dir.path())
            .args(["analyze", "workspace.json"])
            .assert()
            .success();

        monodeps(dir.path())
            .args(["analyze", "workspace.json", "--strict"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("FAILED - Warnings found"));

        monodeps(dir.path())
            .args(["analyze", "workspace.json", "--strict", "--no-dev-dependencies"])
            .assert()
            .success();
    }

    #[test]
    fn test_exclude_flag_drops_cycle() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "workspace.json", CYCLE);

        monodeps(dir.path())
            .args(["analyze", "workspace.json", "-e", "a", "-e", "b"])
            .assert()
            .success();
    }

    #[test]
    fn test_output_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "workspace.json", CYCLE);

        monodeps(dir.path())
            .args(["analyze", "workspace.json", "-f", "json", "-o", "report.json"])
            .assert()
            .code(2)
            .stdout(predicate::str::is_empty());

        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("report.json")).unwrap())
                .unwrap();
        assert_eq!(report["summary"]["totalCycles"], 1);
    }

    #[test]
    fn test_health_command() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "workspace.json", CYCLE);

        monodeps(dir.path())
            .args(["health", "workspace.json", "-f", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"circularScore\": 85"));
    }

    #[test]
    fn test_missing_workspace() {
        let dir = tempfile::tempdir().unwrap();
        monodeps(dir.path())
            .args(["analyze", "nope.json"])
            .assert()
            .code(14)
            .stderr(predicate::str::contains("Error:"));
    }

    #[test]
    fn test_malformed_workspace() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "workspace.json", "{ nope");
        monodeps(dir.path())
            .args(["analyze", "workspace.json"])
            .assert()
            .code(15);
    }

    #[test]
    fn test_init_then_validate() {
        let dir = tempfile::tempdir().unwrap();

        monodeps(dir.path())
            .arg("init")
            .assert()
            .success()
            .stdout(predicate::str::contains("monodeps.yaml"));
        assert!(dir.path().join("monodeps.yaml").exists());

        monodeps(dir.path()).arg("init").assert().failure();

        monodeps(dir.path())
            .arg("validate")
            .assert()
            .success()
            .stdout(predicate::str::contains("Configuration is valid"));
    }

    #[test]
    fn test_validate_rejects_bad_pattern() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "bad.yaml",
            "analysis:\n  exclude_patterns:\n    - \"regex:(\"\n",
        );

        monodeps(dir.path())
            .args(["validate", "bad.yaml"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Configuration error"));
    }

    #[test]
    fn test_discovered_config_is_applied() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "workspace.json", CYCLE);
        write(
            dir.path(),
            "monodeps.yaml",
            "analysis:\n  exclude_patterns: [a, b]\n",
        );

        monodeps(dir.path())
            .args(["analyze", "workspace.json"])
            .assert()
            .success();
    }
}
