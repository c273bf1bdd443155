//! Error types for MonoDeps.
//!
//! This module defines the error hierarchy using `thiserror`. Every variant
//! maps to a short, stable SCREAMING_SNAKE_CASE code (see
//! [`MonodepsError::code`]) so that embedders can react to failures without
//! parsing messages.
//!
//! # Error Categories
//!
//! - **Input errors**: structurally invalid workspaces (unnamed packages,
//!   duplicate names)
//! - **Parse errors**: malformed workspace or configuration documents
//! - **Pattern errors**: exclusion patterns that fail to compile
//! - **IO errors**: reading inputs, writing reports
//! - **Marshal errors**: results that cannot be serialized
//!
//! Soft absence (a per-cycle computation that has nothing to compute) is not
//! an error; those operations return `Option`.
//!
//! # Example
//!
//! ```rust
//! use monodeps::error::{MonodepsError, Result};
//!
//! fn require_name(name: &str) -> Result<()> {
//!     if name.trim().is_empty() {
//!         return Err(monodeps::err!(InvalidInput {
//!             message: "package has an empty name".to_string(),
//!         }));
//!     }
//!     Ok(())
//! }
//!
//! assert_eq!(require_name("").unwrap_err().code(), "INVALID_INPUT");
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Macro to create errors with automatic source location tracking.
///
/// Usage:
/// ```ignore
/// return Err(err!(InvalidInput { message: "empty name".to_string() }));
/// ```
#[macro_export]
macro_rules! err {
    ($variant:ident { $($field:ident: $value:expr),* $(,)? }) => {
        $crate::error::MonodepsError::$variant {
            $($field: $value,)*
            src_path: file!(),
            src_line: line!(),
        }
    };
}

/// A specialized Result type for MonoDeps operations.
pub type Result<T> = std::result::Result<T, MonodepsError>;

/// The main error type for MonoDeps.
#[derive(Error, Debug)]
pub enum MonodepsError {
    // =========================================================================
    // Input Errors
    // =========================================================================
    /// The workspace is structurally invalid.
    #[error("Invalid input ({src_path}:{src_line}): {message}")]
    InvalidInput {
        /// Description of the problem
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// A document (workspace, request) could not be parsed.
    #[error("Failed to parse {what} ({src_path}:{src_line}): {message}")]
    Parse {
        /// What was being parsed
        what: String,
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// An exclusion pattern failed to compile.
    #[error("Invalid exclusion pattern '{pattern}' ({src_path}:{src_line}): {message}")]
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Compiler error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // I/O Errors
    // =========================================================================
    /// I/O error with path context.
    #[error("I/O error at '{path}' ({src_path}:{src_line}): {source}")]
    Io {
        /// The path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration parsing error.
    #[error("Failed to parse configuration ({src_path}:{src_line}): {message}")]
    ConfigParse {
        /// Error message
        message: String,
        /// The underlying error (if any)
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}' ({src_path}:{src_line}): {message}")]
    ConfigValue {
        /// The configuration key
        key: String,
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Analysis / Output Errors
    // =========================================================================
    /// Analysis error.
    #[error("Analysis error ({src_path}:{src_line}): {message}")]
    Analysis {
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// A result could not be serialized.
    #[error("Failed to serialize result ({src_path}:{src_line}): {message}")]
    Marshal {
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// Internal error (should not happen in normal operation).
    #[error("Internal error ({src_path}:{src_line}): {message}")]
    Internal {
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },
}

impl MonodepsError {
    /// Creates an `Io` error.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error, src_path: &'static str, src_line: u32) -> Self {
        Self::Io { path: path.into(), source, src_path, src_line }
    }

    /// Creates a `Parse` error.
    #[must_use]
    pub fn parse(what: impl Into<String>, message: String, src_path: &'static str, src_line: u32) -> Self {
        Self::Parse { what: what.into(), message, src_path, src_line }
    }

    /// Creates a `ConfigParse` error.
    #[must_use]
    pub fn config_parse(message: String, source: Option<Box<dyn std::error::Error + Send + Sync>>, src_path: &'static str, src_line: u32) -> Self {
        Self::ConfigParse { message, source, src_path, src_line }
    }

    /// Stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "INVALID_INPUT",
            Self::Parse { .. } => "PARSE_ERROR",
            Self::InvalidPattern { .. } => "INVALID_PATTERN",
            Self::Io { .. } => "IO_ERROR",
            Self::ConfigParse { .. } | Self::ConfigValue { .. } => "CONFIG_ERROR",
            Self::Analysis { .. } => "ANALYSIS_ERROR",
            Self::Marshal { .. } => "MARSHAL_ERROR",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Message without the source-location decoration, for envelopes.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::InvalidInput { message, .. }
            | Self::ConfigParse { message, .. }
            | Self::Analysis { message, .. }
            | Self::Marshal { message, .. }
            | Self::Internal { message, .. } => message.clone(),
            Self::Parse { what, message, .. } => format!("failed to parse {what}: {message}"),
            Self::InvalidPattern { pattern, message, .. } => {
                format!("invalid pattern '{pattern}': {message}")
            }
            Self::Io { path, source, .. } => format!("{}: {source}", path.display()),
            Self::ConfigValue { key, message, .. } => format!("{key}: {message}"),
        }
    }

    /// Returns the appropriate exit code for the error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound => 14,
            Self::Io { .. } => 13,
            Self::Parse { .. } => 15,
            Self::InvalidInput { .. } => 16,
            Self::InvalidPattern { .. } => 17,
            Self::ConfigParse { .. } => 18,
            Self::ConfigValue { .. } => 19,
            _ => 1,
        }
    }
}

impl From<serde_json::Error> for MonodepsError {
    fn from(source: serde_json::Error) -> Self {
        Self::Marshal {
            message: format!("JSON serialization error: {source}"),
            src_path: file!(),
            src_line: line!(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        let invalid = err!(InvalidInput { message: "empty name".to_string() });
        assert_eq!(invalid.code(), "INVALID_INPUT");

        let parse = MonodepsError::parse("workspace", "eof".to_string(), file!(), line!());
        assert_eq!(parse.code(), "PARSE_ERROR");

        let config = err!(ConfigValue {
            key: "analysis.exclude_patterns".to_string(),
            message: "bad".to_string(),
        });
        assert_eq!(config.code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_message_strips_location() {
        let e = err!(InvalidInput { message: "empty name".to_string() });
        assert_eq!(e.message(), "empty name");
        assert!(e.to_string().contains("error.rs"));
    }

    #[test]
    fn test_exit_codes() {
        let not_found = MonodepsError::io(
            "missing.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "nope"),
            file!(),
            line!(),
        );
        assert_eq!(not_found.exit_code(), 14);
        assert_eq!(err!(Analysis { message: String::new() }).exit_code(), 1);
    }

    #[test]
    fn test_from_serde_json() {
        let err = serde_json::from_str::<u32>("not json").unwrap_err();
        let converted: MonodepsError = err.into();
        assert_eq!(converted.code(), "MARSHAL_ERROR");
    }
}
