//! `{data, error}` JSON envelope for embedders.
//!
//! Every entry point takes JSON strings and returns a JSON string in which
//! exactly one of `data` and `error` is non-null:
//!
//! ```json
//! { "data": { "overall": 94, ... }, "error": null }
//! { "data": null, "error": { "code": "PARSE_ERROR", "message": "..." } }
//! ```
//!
//! Error codes are those of [`MonodepsError::code`]. Entry points never
//! panic and never return anything but an envelope.

use crate::analyzer::Analyzer;
use crate::config::Config;
use crate::error::{MonodepsError, Result};
use crate::types::WorkspaceData;
use serde::{Deserialize, Serialize};

/// Machine-readable failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeError {
    /// Stable code, e.g. `PARSE_ERROR`
    pub code: String,
    /// Human-readable message
    pub message: String,
}

/// Result wrapper with exactly one populated side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Payload on success
    pub data: Option<T>,
    /// Failure details
    pub error: Option<EnvelopeError>,
}

impl<T> Envelope<T> {
    /// Successful envelope.
    pub const fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    /// Failed envelope.
    pub fn failure(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(EnvelopeError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }

    /// Whether this envelope carries data.
    pub const fn is_success(&self) -> bool {
        self.data.is_some()
    }
}

impl<T> From<Result<T>> for Envelope<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(e) => {
                tracing::debug!(code = e.code(), error = %e, "Returning error envelope");
                Self::failure(e.code(), e.message())
            }
        }
    }
}

impl<T: Serialize> Envelope<T> {
    /// Serialize, degrading a serialization failure to a `MARSHAL_ERROR`
    /// envelope.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            let marshal: MonodepsError = e.into();
            tracing::warn!(error = %marshal, "Failed to serialize envelope");
            serde_json::json!({
                "data": null,
                "error": { "code": marshal.code(), "message": marshal.message() },
            })
            .to_string()
        })
    }
}

/// Full analysis. `config_json` may be `None` or blank for defaults.
#[must_use]
pub fn analyze_json(workspace_json: &str, config_json: Option<&str>) -> String {
    run(workspace_json, config_json, |analyzer, ws| analyzer.analyze(ws))
}

/// Health score only.
#[must_use]
pub fn health_json(workspace_json: &str, config_json: Option<&str>) -> String {
    run(workspace_json, config_json, |analyzer, ws| analyzer.health(ws))
}

/// Detected cycles only.
#[must_use]
pub fn detect_cycles_json(workspace_json: &str, config_json: Option<&str>) -> String {
    run(workspace_json, config_json, |analyzer, ws| analyzer.detect_cycles(ws))
}

/// Version conflicts only.
#[must_use]
pub fn detect_conflicts_json(workspace_json: &str, config_json: Option<&str>) -> String {
    run(workspace_json, config_json, |analyzer, ws| analyzer.detect_conflicts(ws))
}

fn run<T, F>(workspace_json: &str, config_json: Option<&str>, operation: F) -> String
where
    T: Serialize,
    F: FnOnce(&Analyzer, &WorkspaceData) -> Result<T>,
{
    let result = parse_config(config_json).and_then(|config| {
        let workspace = WorkspaceData::from_json(workspace_json)?;
        operation(&Analyzer::new(&config), &workspace)
    });
    Envelope::from(result).to_json()
}

fn parse_config(config_json: Option<&str>) -> Result<Config> {
    match config_json.map(str::trim) {
        None | Some("") => Ok(Config::default()),
        Some(json) => Config::from_json(json),
    }
}
