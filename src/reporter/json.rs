//! JSON report generator.

use crate::config::Config;
use crate::error::Result;
use crate::reporter::ReportGenerator;
use crate::types::{AnalysisResult, HealthScoreResult};
use serde::Serialize;

/// JSON report generator.
pub struct JsonReporter {
    /// Whether to pretty-print the output
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            pretty: config.output.pretty,
        }
    }

    fn render<T: Serialize>(&self, report: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)
        } else {
            serde_json::to_string(report)
        };

        json.map_err(|e| {
            crate::err!(Marshal {
                message: format!("Failed to serialize JSON report: {e}"),
            })
        })
    }
}

impl ReportGenerator for JsonReporter {
    fn generate(&self, result: &AnalysisResult) -> Result<String> {
        self.render(&JsonReport::from(result))
    }

    fn generate_health(&self, health: &HealthScoreResult) -> Result<String> {
        self.render(&JsonHealthReport {
            metadata: ReportMetadata::new(None),
            health_score: health,
        })
    }
}

/// JSON report structure.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonReport<'a> {
    /// Report metadata
    pub metadata: ReportMetadata,
    /// Summary statistics
    pub summary: ReportSummary,
    /// Full analysis result
    pub analysis: &'a AnalysisResult,
}

impl<'a> From<&'a AnalysisResult> for JsonReport<'a> {
    fn from(result: &'a AnalysisResult) -> Self {
        let count = |severity| {
            result
                .circular_dependencies
                .iter()
                .filter(|c| c.severity == severity)
                .count()
        };
        Self {
            metadata: ReportMetadata::new(Some(result.packages)),
            summary: ReportSummary {
                health_score: result.health_score.overall,
                health_rating: result.health_score.rating.to_string(),
                total_cycles: result.circular_dependencies.len(),
                critical_cycles: count(crate::types::Severity::Critical),
                warning_cycles: count(crate::types::Severity::Warning),
                info_cycles: count(crate::types::Severity::Info),
                total_conflicts: result.version_conflicts.len(),
                excluded_packages: result.excluded_packages.len(),
                has_critical: result.has_critical(),
                has_warnings: result.has_warnings(),
            },
            analysis: result,
        }
    }
}

/// Health-only report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonHealthReport<'a> {
    /// Report metadata
    pub metadata: ReportMetadata,
    /// Health score
    pub health_score: &'a HealthScoreResult,
}

/// Report metadata.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    /// MonoDeps version
    pub version: String,
    /// Report generation timestamp
    pub timestamp: String,
    /// Number of packages analyzed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packages: Option<usize>,
}

impl ReportMetadata {
    fn new(packages: Option<usize>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            packages,
        }
    }
}

/// Report summary.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    /// Overall health score
    pub health_score: u8,
    /// Health rating
    pub health_rating: String,
    /// Total cycles
    pub total_cycles: usize,
    /// Critical cycles
    pub critical_cycles: usize,
    /// Warning cycles
    pub warning_cycles: usize,
    /// Info cycles
    pub info_cycles: usize,
    /// Total version conflicts
    pub total_conflicts: usize,
    /// Packages matched by exclusion patterns
    pub excluded_packages: usize,
    /// Whether anything is critical
    pub has_critical: bool,
    /// Whether anything is a warning
    pub has_warnings: bool,
}
