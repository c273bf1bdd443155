//! Step-by-step fix guides.

use crate::analyzer::patterns;
use crate::fix::strategy::{effort_time, WORKSPACE_RANGE};
use crate::graph::DependencyGraph;
use crate::types::{
    CircularDependencyInfo, CodeSnippet, FixGuide, FixStep, FixStrategy,
    FixStrategyKind, RollbackPlan, RootCauseAnalysis, WorkspaceType,
};

/// Turns a strategy into an ordered, numbered guide.
#[derive(Debug)]
pub struct FixGuideGenerator<'g> {
    graph: &'g DependencyGraph,
    workspace_type: WorkspaceType,
}

/// Collects steps and numbers them in order.
#[derive(Default)]
struct Steps(Vec<FixStep>);

impl Steps {
    fn push(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> &mut FixStep {
        let number = self.0.len() + 1;
        self.0.push(FixStep {
            number,
            title: title.into(),
            description: description.into(),
            file_path: None,
            code_snippet: None,
            command: None,
        });
        let last = self.0.len() - 1;
        &mut self.0[last]
    }
}

impl<'g> FixGuideGenerator<'g> {
    /// Create a generator; commands follow the graph's package manager.
    #[must_use]
    pub fn new(graph: &'g DependencyGraph) -> Self {
        Self {
            graph,
            workspace_type: graph.workspace_type(),
        }
    }

    /// Override the package manager used in commands.
    #[must_use]
    pub const fn with_workspace_type(mut self, workspace_type: WorkspaceType) -> Self {
        self.workspace_type = workspace_type;
        self
    }

    /// Build the guide for one strategy.
    #[must_use]
    pub fn generate(
        &self,
        strategy: &FixStrategy,
        cycle: &CircularDependencyInfo,
        root_cause: Option<&RootCauseAnalysis>,
    ) -> FixGuide {
        let (from, to) = Self::problem_edge(strategy, cycle, root_cause);
        let steps = match strategy.strategy_type {
            FixStrategyKind::ExtractModule => self.extract_module_steps(strategy, from, to),
            FixStrategyKind::DependencyInjection => self.injection_steps(from, to),
            FixStrategyKind::BoundaryRefactor => self.boundary_steps(cycle, from, to),
        };

        let rollback = match strategy.strategy_type {
            FixStrategyKind::BoundaryRefactor => None,
            _ => Some(self.rollback(strategy)),
        };

        FixGuide {
            strategy_type: strategy.strategy_type,
            title: format!("{}: {}", strategy.name, cycle.display_path()),
            summary: strategy.description.clone(),
            verification: self.verification(cycle),
            rollback,
            estimated_time: strategy
                .complexity
                .as_ref()
                .map_or_else(|| effort_time(strategy.effort).to_string(), |c| c.estimated_time.clone()),
            steps: steps.0,
        }
    }

    /// The edge the guide removes: the strategy's first removal, else the
    /// root cause, else the cycle's first edge.
    fn problem_edge<'a>(
        strategy: &'a FixStrategy,
        cycle: &'a CircularDependencyInfo,
        root_cause: Option<&'a RootCauseAnalysis>,
    ) -> (&'a str, &'a str) {
        strategy
            .dependency_changes
            .iter()
            .find_map(|d| d.remove.first().map(|to| (d.package.as_str(), to.as_str())))
            .or_else(|| {
                root_cause.map(|rc| {
                    (
                        rc.problematic_dependency.from.as_str(),
                        rc.problematic_dependency.to.as_str(),
                    )
                })
            })
            .or_else(|| cycle.edges().next())
            .unwrap_or(("", ""))
    }

    fn manifest(&self, package: &str) -> String {
        format!("{}/package.json", self.package_dir(package))
    }

    fn source_dir(&self, package: &str) -> String {
        format!("{}/src", self.package_dir(package))
    }

    /// Declared package path, or `packages/<name>` when none is known.
    fn package_dir(&self, package: &str) -> String {
        self.graph
            .node(package)
            .map(|n| n.path.trim_end_matches('/'))
            .filter(|path| !path.is_empty())
            .map_or_else(
                || format!("packages/{}", patterns::unscoped(package)),
                str::to_string,
            )
    }

    fn extract_module_steps(&self, strategy: &FixStrategy, from: &str, to: &str) -> Steps {
        let new_package = strategy
            .new_package_name
            .clone()
            .unwrap_or_else(|| format!("{}-shared", patterns::unscoped(from)));
        let dir = format!("packages/{}", patterns::unscoped(&new_package));
        let mut steps = Steps::default();

        let step = steps.push(
            "Create the shared package",
            format!("Create {new_package} in {dir} with its own manifest and entry point."),
        );
        step.command = Some(format!("mkdir -p {dir}/src"));
        step.file_path = Some(format!("{dir}/package.json"));
        step.code_snippet = Some(CodeSnippet {
            language: "json".to_string(),
            before: None,
            after: format!(
                "{{\n  \"name\": \"{new_package}\",\n  \"version\": \"0.1.0\",\n  \"main\": \"src/index.ts\"\n}}"
            ),
        });

        steps.push(
            "Move the shared code",
            format!(
                "Find the modules {from} imports from {to} and the code {to} needs back. Move \
                 them into {dir}/src and export them from its index."
            ),
        );

        for diff in &strategy.dependency_changes {
            if diff.add.is_empty() {
                continue;
            }
            let entries: Vec<String> = diff
                .add
                .iter()
                .map(|(name, range)| format!("    \"{name}\": \"{range}\""))
                .collect();
            let step = steps.push(
                format!("Depend on {new_package} from {}", diff.package),
                format!("Add {new_package} to the dependencies of {}.", diff.package),
            );
            step.file_path = Some(self.manifest(&diff.package));
            step.code_snippet = Some(CodeSnippet {
                language: "json".to_string(),
                before: None,
                after: format!("\"dependencies\": {{\n{}\n}}", entries.join(",\n")),
            });
        }

        let step = steps.push(
            "Update imports",
            format!("Point every import of the moved code at {new_package}."),
        );
        step.file_path = Some(self.source_dir(from));
        step.code_snippet = Some(CodeSnippet {
            language: "typescript".to_string(),
            before: Some(format!("import {{ shared }} from '{to}';")),
            after: format!("import {{ shared }} from '{new_package}';"),
        });

        self.remove_dependency_step(&mut steps, from, to);
        self.reinstall_step(&mut steps);
        steps
    }

    fn injection_steps(&self, from: &str, to: &str) -> Steps {
        let service = format!("{}Service", pascal_case(patterns::unscoped(to)));
        let mut steps = Steps::default();

        let step = steps.push(
            "Define the interface",
            format!("Declare in {from} the interface it needs from {to}."),
        );
        step.file_path = Some(format!("{}/types.ts", self.source_dir(from)));
        step.code_snippet = Some(CodeSnippet {
            language: "typescript".to_string(),
            before: None,
            after: format!("export interface {service} {{\n  doWork(): void;\n}}"),
        });

        let step = steps.push(
            "Accept the implementation",
            format!("Replace direct imports of {to} in {from} with a parameter typed by {service}."),
        );
        step.file_path = Some(self.source_dir(from));
        step.code_snippet = Some(CodeSnippet {
            language: "typescript".to_string(),
            before: Some(format!(
                "import {{ doWork }} from '{to}';\n\nexport function run() {{\n  return doWork();\n}}"
            )),
            after: format!(
                "import type {{ {service} }} from './types';\n\nexport function run(service: {service}) {{\n  return service.doWork();\n}}"
            ),
        });

        let step = steps.push(
            "Wire the implementation",
            format!("Pass the implementation from {to} where the application starts."),
        );
        step.code_snippet = Some(CodeSnippet {
            language: "typescript".to_string(),
            before: None,
            after: format!("import {{ run }} from '{from}';\nimport * as impl from '{to}';\n\nrun(impl);"),
        });

        self.remove_dependency_step(&mut steps, from, to);
        self.reinstall_step(&mut steps);
        steps
    }

    fn boundary_steps(&self, cycle: &CircularDependencyInfo, from: &str, to: &str) -> Steps {
        let participants = cycle.participants();
        let mut steps = Steps::default();

        let alternatives: Vec<String> = participants.iter().map(|p| regex::escape(p)).collect();
        let dirs: Vec<String> = participants.iter().map(|p| self.source_dir(p)).collect();
        let step = steps.push(
            "Map cross-package imports",
            "List every import between the participants to see which modules hold the cycle together.",
        );
        step.command = Some(format!(
            "grep -rnE \"from '({})\" {}",
            alternatives.join("|"),
            dirs.join(" ")
        ));

        let (low, high): (Vec<&String>, Vec<&String>) =
            participants.iter().partition(|p| patterns::is_low_level(p));
        let layering = if low.is_empty() {
            format!(
                "Decide which of {} is the lower layer. Lower layers must never import higher ones.",
                participants.join(", ")
            )
        } else {
            format!(
                "Keep {} at the bottom; {} may depend on them but not the other way round.",
                join_refs(&low),
                join_refs(&high)
            )
        };
        steps.push("Choose the layering", layering);

        steps.push(
            "Move modules across the boundary",
            format!(
                "Move the modules {from} uses from {to} into the lower layer, or merge packages \
                 that always change together."
            ),
        );

        self.remove_dependency_step(&mut steps, from, to);
        self.reinstall_step(&mut steps);
        steps
    }

    fn remove_dependency_step(&self, steps: &mut Steps, from: &str, to: &str) {
        if from.is_empty() || from == to {
            return;
        }
        let step = steps.push(
            format!("Remove {to} from {from}"),
            format!("Delete the dependency that closes the cycle from the manifest of {from}."),
        );
        step.file_path = Some(self.manifest(from));
        step.code_snippet = Some(CodeSnippet {
            language: "json".to_string(),
            before: Some(format!("\"dependencies\": {{\n    \"{to}\": \"{WORKSPACE_RANGE}\"\n}}")),
            after: "\"dependencies\": {}".to_string(),
        });
    }

    fn reinstall_step(&self, steps: &mut Steps) {
        let step = steps.push(
            "Reinstall and build",
            "Refresh the lockfile and rebuild every package.",
        );
        step.command = Some(format!(
            "{} && {}",
            self.workspace_type.install_command(),
            self.workspace_type.build_command()
        ));
    }

    fn verification(&self, cycle: &CircularDependencyInfo) -> Vec<String> {
        vec![
            format!(
                "Run `monodeps analyze` and confirm {} is no longer reported",
                cycle.display_path()
            ),
            format!("Build the workspace with `{}`", self.workspace_type.build_command()),
            format!("Run the tests of {}", cycle.participants().join(", ")),
        ]
    }

    fn rollback(&self, strategy: &FixStrategy) -> RollbackPlan {
        let mut steps: Vec<String> = strategy
            .dependency_changes
            .iter()
            .map(|d| format!("Restore {}", self.manifest(&d.package)))
            .collect();
        if let Some(new_package) = &strategy.new_package_name {
            steps.push(format!("Delete packages/{}", patterns::unscoped(new_package)));
        }
        steps.push(format!("Run `{}`", self.workspace_type.install_command()));

        RollbackPlan {
            steps,
            warning: Some("Commit before starting so the change can be reverted in one step".to_string()),
        }
    }
}

fn pascal_case(name: &str) -> String {
    patterns::name_tokens(name)
        .iter()
        .map(|token| {
            let mut chars = token.chars();
            chars
                .next()
                .map(|c| c.to_uppercase().chain(chars).collect::<String>())
                .unwrap_or_default()
        })
        .collect()
}

fn join_refs(names: &[&String]) -> String {
    names.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::RootCauseAnalyzer;
    use crate::fix::FixStrategyGenerator;
    use crate::graph::{CycleDetector, GraphBuilder};
    use crate::types::{PackageInfo, WorkspaceData};
    use pretty_assertions::assert_eq;

    fn guides(workspace_type: WorkspaceType, names: &[&str]) -> Vec<FixGuide> {
        let mut ws = WorkspaceData::new(".", workspace_type);
        for (i, name) in names.iter().enumerate() {
            let next = names[(i + 1) % names.len()];
            ws = ws.with_package(PackageInfo::new(*name, "1.0.0").with_dependency(next, "workspace:*"));
        }
        let graph = GraphBuilder::new().build(&ws).unwrap();
        let cycle = CycleDetector::new(&graph).detect().remove(0);
        let rc = RootCauseAnalyzer::new(&graph).analyze(&cycle);
        let generator = FixGuideGenerator::new(&graph);
        FixStrategyGenerator::new(&graph)
            .generate(&cycle, rc.as_ref())
            .iter()
            .map(|s| generator.generate(s, &cycle, rc.as_ref()))
            .collect()
    }

    #[test]
    fn test_steps_are_numbered_in_order() {
        for guide in guides(WorkspaceType::Npm, &["a", "b", "c"]) {
            let numbers: Vec<usize> = guide.steps.iter().map(|s| s.number).collect();
            let expected: Vec<usize> = (1..=guide.steps.len()).collect();
            assert_eq!(numbers, expected);
            assert_eq!(guide.verification.len(), 3);
        }
    }

    #[test]
    fn test_commands_follow_package_manager() {
        let guide = guides(WorkspaceType::Pnpm, &["@acme/app", "@acme/web"]).remove(0);
        let last = guide.steps.last().unwrap();
        assert_eq!(last.command.as_deref(), Some("pnpm install && pnpm -r build"));
        assert_eq!(guide.steps[0].command.as_deref(), Some("mkdir -p packages/app-shared/src"));
    }

    #[test]
    fn test_extract_module_guide() {
        let guide = guides(WorkspaceType::Yarn, &["@acme/app", "@acme/web"]).remove(0);
        assert_eq!(guide.strategy_type, FixStrategyKind::ExtractModule);
        assert!(guide
            .steps
            .iter()
            .any(|s| s.title == "Remove @acme/web from @acme/app"
                && s.file_path.as_deref() == Some("packages/app/package.json")));
        let rollback = guide.rollback.unwrap();
        assert!(rollback.steps.contains(&"Delete packages/app-shared".to_string()));
        assert_eq!(rollback.steps.last().unwrap(), "Run `yarn install`");
        // no complexity attached: medium effort
        assert_eq!(guide.estimated_time, "30-60 min");
    }

    #[test]
    fn test_injection_guide_names_interface() {
        let guide = guides(WorkspaceType::Npm, &["app", "data-store"])
            .into_iter()
            .find(|g| g.strategy_type == FixStrategyKind::DependencyInjection)
            .unwrap();
        let snippet = guide.steps[0].code_snippet.as_ref().unwrap();
        assert!(snippet.after.contains("export interface DataStoreService"));
        assert_eq!(guide.estimated_time, "15-30 min");
    }

    #[test]
    fn test_boundary_guide_has_no_rollback() {
        let guide = guides(WorkspaceType::Npm, &["app", "core"])
            .into_iter()
            .find(|g| g.strategy_type == FixStrategyKind::BoundaryRefactor)
            .unwrap();
        assert!(guide.rollback.is_none());
        assert!(guide.steps[1].description.starts_with("Keep core at the bottom"));
    }

    #[test]
    fn test_missing_path_falls_back_to_packages_dir() {
        let ws = WorkspaceData::new(".", WorkspaceType::Npm)
            .with_package(
                PackageInfo::new("@acme/app", "1.0.0")
                    .with_path("")
                    .with_dependency("@acme/web", "workspace:*"),
            )
            .with_package(
                PackageInfo::new("@acme/web", "1.0.0")
                    .with_path("")
                    .with_dependency("@acme/app", "workspace:*"),
            );
        let graph = GraphBuilder::new().build(&ws).unwrap();
        let cycle = CycleDetector::new(&graph).detect().remove(0);
        let rc = RootCauseAnalyzer::new(&graph).analyze(&cycle);
        let generator = FixGuideGenerator::new(&graph);
        for strategy in FixStrategyGenerator::new(&graph).generate(&cycle, rc.as_ref()) {
            let guide = generator.generate(&strategy, &cycle, rc.as_ref());
            for path in guide.steps.iter().filter_map(|s| s.file_path.as_deref()) {
                assert!(path.starts_with("packages/"), "unrooted path {path}");
            }
        }
        assert_eq!(generator.manifest("@acme/web"), "packages/web/package.json");
        assert_eq!(generator.source_dir("@acme/app"), "packages/app/src");
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("@acme/ui-kit"), "UiKit");
        assert_eq!(pascal_case("store"), "Store");
    }
}
