//! Plain text report generator.

use crate::config::Config;
use crate::error::Result;
use crate::reporter::ReportGenerator;
use crate::types::{
    AnalysisResult, CircularDependencyInfo, FixStrategy, HealthScoreResult, RiskLevel, Severity,
    VersionConflictInfo,
};
use colored::Colorize;
use comfy_table::{Cell, Color, ContentArrangement, Table};

const RULE_WIDTH: usize = 80;

/// Text report generator for CLI output.
pub struct TextReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show verbose output
    verbose: bool,
    /// Warnings fail the run
    strict: bool,
}

impl TextReporter {
    /// Create a new text reporter.
    #[must_use]
    pub const fn new(config: &Config) -> Self {
        Self {
            use_colors: config.output.colored,
            verbose: config.output.verbose,
            strict: false,
        }
    }

    /// Report warnings as failures in the footer.
    #[must_use]
    pub const fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

impl ReportGenerator for TextReporter {
    fn generate(&self, result: &AnalysisResult) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("MonoDeps Analysis"));
        output.push('\n');

        output.push_str(&self.format_summary(result));
        output.push('\n');

        output.push_str(&self.format_health(&result.health_score));
        output.push('\n');

        if !result.circular_dependencies.is_empty() {
            output.push_str(&self.format_cycles(&result.circular_dependencies));
            output.push('\n');
        }

        if !result.version_conflicts.is_empty() {
            output.push_str(&self.format_conflicts(&result.version_conflicts));
            output.push('\n');
        }

        if !result.fix_summary.priority_cycles.is_empty() {
            output.push_str(&self.format_fix_summary(result));
            output.push('\n');
        }

        output.push_str(&self.format_footer(result));

        Ok(output)
    }

    fn generate_health(&self, health: &HealthScoreResult) -> Result<String> {
        let mut output = self.format_header("MonoDeps Health");
        output.push('\n');
        output.push_str(&self.format_health(health));
        output.push('\n');
        Ok(output)
    }
}

impl TextReporter {
    /// Format the report header.
    fn format_header(&self, title: &str) -> String {
        let version = format!("v{}", env!("CARGO_PKG_VERSION"));
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");

        if self.use_colors {
            format!(
                "\n{} {} {}\n{}\n",
                title.bright_white().bold(),
                version.dimmed(),
                format!("({timestamp})").dimmed(),
                "=".repeat(RULE_WIDTH).bright_blue(),
            )
        } else {
            format!("\n{title} {version} ({timestamp})\n{}\n", "=".repeat(RULE_WIDTH))
        }
    }

    fn section_title(&self, title: &str) -> String {
        let title = if self.use_colors {
            title.bright_cyan().bold().to_string()
        } else {
            title.to_string()
        };
        format!("\n{title}\n{}\n", "-".repeat(RULE_WIDTH))
    }

    fn severity_label(&self, severity: Severity) -> String {
        let label = severity.to_string();
        if !self.use_colors {
            return label;
        }
        match severity {
            Severity::Critical => label.red().bold().to_string(),
            Severity::Warning => label.yellow().to_string(),
            Severity::Info => label.blue().to_string(),
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.use_colors {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    /// Format the summary section.
    fn format_summary(&self, result: &AnalysisResult) -> String {
        let mut output = self.section_title("Summary");

        let count = |severity| {
            result
                .circular_dependencies
                .iter()
                .filter(|c| c.severity == severity)
                .count()
        };
        let (critical, warnings, infos) = (
            count(Severity::Critical),
            count(Severity::Warning),
            count(Severity::Info),
        );
        let cycles = result.circular_dependencies.len();
        let conflicts = result.version_conflicts.len();

        if self.use_colors {
            output.push_str(&format!(
                "  {} {} ({} critical | {} warning | {} info) | {} {}\n",
                cycles.to_string().bold(),
                if cycles == 1 { "Cycle" } else { "Cycles" },
                critical.to_string().red().bold(),
                warnings.to_string().yellow().bold(),
                infos.to_string().blue(),
                conflicts.to_string().bold(),
                if conflicts == 1 { "Conflict" } else { "Conflicts" },
            ));
        } else {
            output.push_str(&format!(
                "  {cycles} {} ({critical} critical | {warnings} warning | {infos} info) | {conflicts} {}\n",
                if cycles == 1 { "Cycle" } else { "Cycles" },
                if conflicts == 1 { "Conflict" } else { "Conflicts" },
            ));
        }

        output.push_str(&format!(
            "  {} packages | {} excluded\n",
            result.packages,
            result.excluded_packages.len()
        ));

        if self.verbose && !result.excluded_packages.is_empty() {
            output.push_str(&self.dim(&format!(
                "  excluded: {}\n",
                result.excluded_packages.join(", ")
            )));
        }

        output
    }

    /// Format the health score with its factor table.
    fn format_health(&self, health: &HealthScoreResult) -> String {
        let mut output = self.section_title("Health");

        let score = format!("{}/100", health.overall);
        let score = if self.use_colors {
            match health.overall {
                75..=u8::MAX => score.green().bold().to_string(),
                40..=74 => score.yellow().bold().to_string(),
                _ => score.red().bold().to_string(),
            }
        } else {
            score
        };
        output.push_str(&format!("  Score: {score} ({})\n\n", health.rating));

        let mut table = Table::new();
        table
            .load_preset(comfy_table::presets::UTF8_BORDERS_ONLY)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Factor", "Score", "Weight", "Weighted"]);

        for factor in &health.factors {
            let score_cell = if self.use_colors {
                Cell::new(factor.score).fg(score_color(factor.score))
            } else {
                Cell::new(factor.score)
            };
            table.add_row(vec![
                Cell::new(&factor.name),
                score_cell,
                Cell::new(format!("{:.2}", factor.weight)),
                Cell::new(format!("{:.1}", factor.weighted_score)),
            ]);
        }

        output.push_str(&table.to_string());
        output.push('\n');

        let recommendations: Vec<_> = health
            .factors
            .iter()
            .flat_map(|f| f.recommendations.iter())
            .collect();
        if !recommendations.is_empty() {
            output.push('\n');
            for recommendation in recommendations {
                output.push_str(&format!("  - {recommendation}\n"));
            }
        }

        output
    }

    /// Format the circular dependency section.
    fn format_cycles(&self, cycles: &[CircularDependencyInfo]) -> String {
        let mut output = self.section_title("Circular Dependencies");

        for cycle in cycles {
            output.push_str(&self.format_cycle(cycle));
        }

        output
    }

    /// Format a single cycle.
    fn format_cycle(&self, cycle: &CircularDependencyInfo) -> String {
        let priority = cycle
            .priority_score
            .as_ref()
            .map(|p| format!(", priority {:.1}", p.score))
            .unwrap_or_default();

        let mut output = format!(
            "\n  [{}] {} ({}{priority})\n",
            self.severity_label(cycle.severity),
            cycle.display_path(),
            cycle.cycle_type,
        );

        if let Some(root) = &cycle.root_cause {
            output.push_str(&format!(
                "    Root cause: {} -> {} ({}% confidence)\n",
                root.problematic_dependency.from, root.problematic_dependency.to, root.confidence
            ));
            if self.verbose {
                output.push_str(&self.dim(&format!("      {}", root.explanation)));
                output.push('\n');
            }
        }

        if let Some(complexity) = &cycle.complexity {
            output.push_str(&format!(
                "    Complexity: {}/10 ({})\n",
                complexity.score, complexity.estimated_time
            ));
        }

        if let Some(impact) = &cycle.impact {
            let risk = impact.risk_level.to_string();
            let risk = if self.use_colors {
                match impact.risk_level {
                    RiskLevel::Critical | RiskLevel::High => risk.red().to_string(),
                    RiskLevel::Medium => risk.yellow().to_string(),
                    RiskLevel::Low => risk.green().to_string(),
                }
            } else {
                risk
            };
            output.push_str(&format!(
                "    Impact: {} packages ({:.1}%), risk {risk}\n",
                impact.total_affected, impact.affected_percentage
            ));
        }

        if let Some(quick_fix) = &cycle.quick_fix {
            let line = format!(
                "    Quick fix: {} (suitability {}/10, {})",
                quick_fix.title, quick_fix.suitability, quick_fix.estimated_time
            );
            if self.use_colors {
                output.push_str(&line.green().to_string());
            } else {
                output.push_str(&line);
            }
            output.push('\n');
        }

        if self.verbose {
            for strategy in &cycle.fix_strategies {
                output.push_str(&self.format_strategy(strategy));
            }
        }

        output
    }

    /// Format a strategy with its guide steps (verbose only).
    fn format_strategy(&self, strategy: &FixStrategy) -> String {
        let mut output = format!(
            "    - {} [{}/10, {} effort]\n",
            strategy.name, strategy.suitability, strategy.effort
        );

        if let Some(guide) = &strategy.guide {
            for step in &guide.steps {
                output.push_str(&format!("        {}. {}\n", step.number, step.title));
                if let Some(command) = &step.command {
                    output.push_str(&self.dim(&format!("           $ {command}")));
                    output.push('\n');
                }
            }
        }

        if let Some(before_after) = &strategy.before_after {
            for warning in &before_after.warnings {
                output.push_str(&format!(
                    "        [{}] {}\n",
                    self.severity_label(warning.severity),
                    warning.title
                ));
            }
        }

        output
    }

    /// Format the version conflicts table.
    fn format_conflicts(&self, conflicts: &[VersionConflictInfo]) -> String {
        let mut output = self.section_title("Version Conflicts");

        let mut table = Table::new();
        table
            .load_preset(comfy_table::presets::UTF8_BORDERS_ONLY)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Dependency", "Versions", "Severity", "Recommended"]);

        for conflict in conflicts {
            let versions = conflict
                .conflicting_versions
                .iter()
                .map(|v| format!("{} ({})", v.version, truncate(&v.packages.join(", "), 40)))
                .collect::<Vec<_>>()
                .join("\n");

            let severity = conflict.severity.to_string();
            let severity_cell = if self.use_colors {
                Cell::new(&severity).fg(match conflict.severity {
                    Severity::Critical => Color::Red,
                    Severity::Warning => Color::Yellow,
                    Severity::Info => Color::Blue,
                })
            } else {
                Cell::new(&severity)
            };

            table.add_row(vec![
                Cell::new(&conflict.package_name),
                Cell::new(versions),
                severity_cell,
                Cell::new(conflict.recommended_version.as_deref().unwrap_or("-")),
            ]);
        }

        output.push_str(&table.to_string());
        output.push('\n');

        if self.verbose {
            for conflict in conflicts {
                output.push_str(&self.dim(&format!(
                    "  {}: {}",
                    conflict.package_name, conflict.resolution
                )));
                output.push('\n');
            }
        }

        output
    }

    /// Format the aggregate fix plan.
    fn format_fix_summary(&self, result: &AnalysisResult) -> String {
        let summary = &result.fix_summary;
        let mut output = self.section_title("Fix Plan");

        output.push_str(&format!(
            "  Estimated effort: {} | {} quick wins | {} critical\n\n",
            summary.total_estimated_time, summary.quick_wins_count, summary.critical_cycles_count
        ));

        for (index, cycle) in summary.priority_cycles.iter().enumerate() {
            let strategy = cycle
                .top_strategy
                .map(|s| format!(", {s}"))
                .unwrap_or_default();
            output.push_str(&format!(
                "  {}. {} (priority {:.1}, {}{strategy})\n",
                index + 1,
                cycle.cycle.join(" → "),
                cycle.priority_score,
                cycle.estimated_time,
            ));
        }

        output
    }

    /// Format the report footer.
    fn format_footer(&self, result: &AnalysisResult) -> String {
        let status = if result.has_critical() {
            if self.use_colors {
                "FAILED - Critical issues found".red().bold().to_string()
            } else {
                "FAILED - Critical issues found".to_string()
            }
        } else if result.has_warnings() && self.strict {
            if self.use_colors {
                "FAILED - Warnings found".red().bold().to_string()
            } else {
                "FAILED - Warnings found".to_string()
            }
        } else if result.has_warnings() {
            if self.use_colors {
                "PASSED with warnings".yellow().to_string()
            } else {
                "PASSED with warnings".to_string()
            }
        } else if self.use_colors {
            "PASSED - No issues found".green().to_string()
        } else {
            "PASSED - No issues found".to_string()
        };

        format!("\n{status}\n\n")
    }
}

const fn score_color(score: u8) -> Color {
    match score {
        75..=u8::MAX => Color::Green,
        40..=74 => Color::Yellow,
        _ => Color::Red,
    }
}

/// Truncate a string to at most `max_len` characters.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
