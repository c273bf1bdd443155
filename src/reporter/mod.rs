//! Report generation module.
//!
//! This module provides report generation in multiple formats:
//! - JSON: Machine-readable structured output
//! - Text: Human-readable CLI output
//!
//! # Example
//!
//! ```rust,no_run
//! use monodeps::reporter::Reporter;
//! use monodeps::{Analyzer, Config, ReportFormat, WorkspaceData};
//!
//! let config = Config::default();
//! let workspace = WorkspaceData::from_json(r#"{"rootPath": ".", "packages": {}}"#).unwrap();
//! let result = Analyzer::new(&config).analyze(&workspace).unwrap();
//!
//! let reporter = Reporter::new(&config).with_strict(true);
//! let text = reporter.generate(&result, ReportFormat::Text).unwrap();
//! let json = reporter.generate_health(&result.health_score, ReportFormat::Json).unwrap();
//! ```

mod json;
mod text;

use crate::config::Config;
use crate::error::Result;
use crate::types::{AnalysisResult, HealthScoreResult, ReportFormat};

pub use json::JsonReporter;
pub use text::TextReporter;

/// Report generator that supports multiple output formats.
pub struct Reporter {
    config: Config,
    strict: bool,
}

impl Reporter {
    /// Create a new reporter with the given configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            strict: false,
        }
    }

    /// Treat warnings as failures in text output.
    #[must_use]
    pub const fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Generate a full analysis report in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if report generation fails.
    pub fn generate(&self, result: &AnalysisResult, format: ReportFormat) -> Result<String> {
        self.generator(format).generate(result)
    }

    /// Generate a health-only report in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if report generation fails.
    pub fn generate_health(
        &self,
        health: &HealthScoreResult,
        format: ReportFormat,
    ) -> Result<String> {
        self.generator(format).generate_health(health)
    }

    fn generator(&self, format: ReportFormat) -> Box<dyn ReportGenerator> {
        match format {
            ReportFormat::Json => Box::new(JsonReporter::new(&self.config)),
            ReportFormat::Text => {
                Box::new(TextReporter::new(&self.config).with_strict(self.strict))
            }
        }
    }
}

/// Trait for report generators.
pub trait ReportGenerator {
    /// Generate a report from analysis results.
    ///
    /// # Errors
    ///
    /// Returns an error if generation fails.
    fn generate(&self, result: &AnalysisResult) -> Result<String>;

    /// Generate a report for a health score alone.
    ///
    /// # Errors
    ///
    /// Returns an error if generation fails.
    fn generate_health(&self, health: &HealthScoreResult) -> Result<String>;
}
