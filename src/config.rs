//! Configuration module for MonoDeps.
//!
//! This module handles loading and validating configuration from:
//! - YAML configuration files (`monodeps.yaml`)
//! - Environment variables
//! - CLI arguments
//!
//! # Configuration File Format
//!
//! ```yaml
//! # monodeps.yaml
//!
//! # Analysis options
//! analysis:
//!   exclude_patterns:
//!     - "@acme/legacy-*"
//!     - "regex:^@acme/(old|v1)-"
//!     - ${MONODEPS_EXTRA_EXCLUDE}   # Environment variable expansion
//!   fix_strategies: true
//!   parallel: false
//!   include_dev_dependencies: true
//!
//! # Output options
//! output:
//!   colored: true
//!   verbose: false
//!   pretty: true
//! ```

use crate::err;
use crate::error::{MonodepsError, Result};
use crate::exclusion::ExclusionMatcher;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// File names searched, in order, when no `--config` is given.
pub const CONFIG_FILE_NAMES: &[&str] = &["monodeps.yaml", "monodeps.yml", ".monodeps.yaml"];

static BRACED_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("Invalid regex"));
static BARE_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").expect("Invalid regex"));

/// Analysis options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Packages to exclude (exact names, globs, or `regex:` expressions).
    pub exclude_patterns: Vec<String>,

    /// Generate fix strategies, guides and diagrams for each cycle.
    pub fix_strategies: bool,

    /// Run per-cycle stages on the rayon thread pool.
    pub parallel: bool,

    /// Let development dependencies close cycles.
    pub include_dev_dependencies: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            exclude_patterns: Vec::new(),
            fix_strategies: true,
            parallel: false,
            include_dev_dependencies: true,
        }
    }
}

/// Output options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Use colored output.
    pub colored: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            colored: true,
            verbose: false,
            pretty: true,
        }
    }
}

/// Main configuration structure with nested sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Analysis options
    pub analysis: AnalysisOptions,

    /// Output options
    pub output: OutputOptions,
}

impl Config {
    /// Load configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or a value fails validation.
    pub fn from_yaml(content: &str) -> Result<Self> {
        tracing::debug!("Parsing configuration from YAML");
        let expanded = expand_env_vars(content);

        // An empty or comment-only document is the default configuration
        let config: Config = if expanded.lines().all(|l| {
            let l = l.trim();
            l.is_empty() || l.starts_with('#')
        }) {
            Config::default()
        } else {
            serde_yaml::from_str(&expanded).map_err(|e| {
                MonodepsError::config_parse(e.to_string(), Some(Box::new(e)), file!(), line!())
            })?
        };
        config.validate()?;

        tracing::debug!(
            exclude_patterns = config.analysis.exclude_patterns.len(),
            fix_strategies = config.analysis.fix_strategies,
            parallel = config.analysis.parallel,
            include_dev_dependencies = config.analysis.include_dev_dependencies,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Load configuration from a JSON string, as passed to the envelope
    /// entry points.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or a value fails validation.
    pub fn from_json(content: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(content).map_err(|e| {
            MonodepsError::config_parse(e.to_string(), Some(Box::new(e)), file!(), line!())
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading configuration file");
        let content = std::fs::read_to_string(path)
            .map_err(|e| MonodepsError::io(path, e, file!(), line!()))?;
        Self::from_yaml(&content)
    }

    /// Find a configuration file in `dir`.
    #[must_use]
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    }

    /// Check that every exclusion pattern compiles.
    ///
    /// # Errors
    ///
    /// Returns `ConfigValue` naming the first invalid pattern.
    pub fn validate(&self) -> Result<()> {
        ExclusionMatcher::new(&self.analysis.exclude_patterns).map_err(|e| {
            err!(ConfigValue {
                key: "analysis.exclude_patterns".to_string(),
                message: e.message(),
            })
        })?;
        Ok(())
    }

    /// Generate an example YAML configuration.
    #[must_use]
    pub fn example_yaml() -> String {
        r#"# MonoDeps Configuration File

# Analysis options
analysis:
  # Packages to leave out of cycle reporting. Each entry is an exact name or
  # path, a glob ("packages/legacy-*", "**" crosses "/"), or a regular
  # expression prefixed with "regex:".
  exclude_patterns: []
  #   - "@acme/legacy-app"
  #   - "packages/deprecated-*"
  #   - "regex:^@acme/(old|v1)-"

  # Generate fix strategies, step-by-step guides and before/after diagrams
  fix_strategies: true

  # Analyze cycles in parallel (output order is unaffected)
  parallel: false

  # Let devDependencies close cycles. Set to false while migrating a
  # workspace whose test tooling still points back at the packages it tests.
  include_dev_dependencies: true

# Output options
output:
  # Use colored output in terminal
  colored: true

  # Enable verbose output
  verbose: false

  # Pretty-print JSON output
  pretty: true
"#
        .to_string()
    }

    /// Merge CLI arguments into the configuration.
    pub fn merge_cli_args(&mut self, args: &crate::cli::AnalyzeArgs) {
        if !args.exclude.is_empty() {
            self.analysis
                .exclude_patterns
                .extend(args.exclude.iter().cloned());
        }
        if args.no_fix_strategies {
            self.analysis.fix_strategies = false;
        }
        if args.parallel {
            self.analysis.parallel = true;
        }
        if args.no_dev_dependencies {
            self.analysis.include_dev_dependencies = false;
        }
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax; unknown variables are left as is.
fn expand_env_vars(content: &str) -> String {
    let braced = BRACED_VAR.replace_all(content, |caps: &regex::Captures<'_>| {
        std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
    });
    BARE_VAR
        .replace_all(&braced, |caps: &regex::Captures<'_>| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}
