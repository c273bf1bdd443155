//! Package exclusion patterns.
//!
//! Patterns come in three flavours, checked cheapest first:
//!
//! | Pattern                  | Kind  | Matches                               |
//! |--------------------------|-------|---------------------------------------|
//! | `@acme/legacy`           | exact | that identifier only                  |
//! | `packages/deprecated-*`  | glob  | `*` within a segment, `**` across     |
//! | `regex:^@acme/(old|v1)-` | regex | anything the expression finds         |
//!
//! Identifiers are package names or workspace-relative paths; the graph
//! builder tests both.

use crate::err;
use crate::error::Result;
use glob::{MatchOptions, Pattern};
use regex::Regex;
use std::collections::HashSet;

const REGEX_PREFIX: &str = "regex:";

const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Compiled set of exclusion patterns.
#[derive(Debug, Clone, Default)]
pub struct ExclusionMatcher {
    exact: HashSet<String>,
    globs: Vec<Pattern>,
    regexes: Vec<Regex>,
}

impl ExclusionMatcher {
    /// Compile a list of patterns.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPattern` if a glob or regex fails to compile.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut matcher = Self::default();

        for pattern in patterns {
            let pattern = pattern.as_ref().trim();
            if pattern.is_empty() {
                continue;
            }

            if let Some(expr) = pattern.strip_prefix(REGEX_PREFIX) {
                let regex = Regex::new(expr).map_err(|e| {
                    err!(InvalidPattern {
                        pattern: pattern.to_string(),
                        message: e.to_string(),
                    })
                })?;
                matcher.regexes.push(regex);
            } else if pattern.contains(['*', '?']) {
                let glob = Pattern::new(pattern).map_err(|e| {
                    err!(InvalidPattern {
                        pattern: pattern.to_string(),
                        message: e.msg.to_string(),
                    })
                })?;
                matcher.globs.push(glob);
            } else {
                matcher.exact.insert(pattern.to_string());
            }
        }

        tracing::debug!(
            exact = matcher.exact.len(),
            globs = matcher.globs.len(),
            regexes = matcher.regexes.len(),
            "Compiled exclusion patterns"
        );

        Ok(matcher)
    }

    /// True when no patterns were configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.globs.is_empty() && self.regexes.is_empty()
    }

    /// Number of compiled patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.exact.len() + self.globs.len() + self.regexes.len()
    }

    /// Whether an identifier matches any pattern.
    #[must_use]
    pub fn is_excluded(&self, id: &str) -> bool {
        if self.is_empty() {
            return false;
        }
        self.exact.contains(id)
            || self.globs.iter().any(|g| g.matches_with(id, GLOB_OPTIONS))
            || self.regexes.iter().any(|r| r.is_match(id))
    }
}
