//! Package naming heuristics.
//!
//! Foundational packages tend to be named after their role ("core",
//! "shared", "utils"). A cycle through one of them reaches almost every
//! consumer, so several stages treat such names specially.

use regex::Regex;
use std::sync::LazyLock;

/// Name tokens marking a foundational package.
pub const LOW_LEVEL_TOKENS: &[&str] = &["core", "common", "shared", "utils", "lib", "base", "util"];

// Separators inside package names
static TOKEN_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_./]+").expect("Invalid regex"));

/// Unscoped part of a package name (`@acme/ui-kit` → `ui-kit`).
#[must_use]
pub fn unscoped(name: &str) -> &str {
    if name.starts_with('@') {
        name.split_once('/').map_or(name, |(_, rest)| rest)
    } else {
        name
    }
}

/// Scope of a package name, including the `@` (`@acme/ui` → `@acme`).
#[must_use]
pub fn scope(name: &str) -> Option<&str> {
    name.starts_with('@')
        .then(|| name.split_once('/').map(|(scope, _)| scope))
        .flatten()
}

/// Lowercase tokens of the unscoped name.
#[must_use]
pub fn name_tokens(name: &str) -> Vec<String> {
    TOKEN_SEPARATOR
        .split(unscoped(name))
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Whether any token of the unscoped name is a low-level role word.
///
/// Token matching keeps `@acme/library` or `baseline` from matching `lib`
/// or `base`.
#[must_use]
pub fn is_low_level(name: &str) -> bool {
    name_tokens(name)
        .iter()
        .any(|token| LOW_LEVEL_TOKENS.contains(&token.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("@acme/core", true ; "scoped core")]
    #[test_case("shared-utils", true ; "compound")]
    #[test_case("@acme/ui_base", true ; "underscore")]
    #[test_case("common", true ; "bare")]
    #[test_case("@acme/library", false ; "lib prefix is not lib")]
    #[test_case("baseline", false ; "base prefix is not base")]
    #[test_case("@core/ui", false ; "scope ignored")]
    #[test_case("web-app", false ; "app")]
    fn test_is_low_level(name: &str, expected: bool) {
        assert_eq!(is_low_level(name), expected);
    }

    #[test]
    fn test_scope_and_unscoped() {
        assert_eq!(scope("@acme/ui"), Some("@acme"));
        assert_eq!(scope("ui"), None);
        assert_eq!(unscoped("@acme/ui"), "ui");
        assert_eq!(unscoped("ui"), "ui");
    }

    #[test]
    fn test_name_tokens() {
        assert_eq!(name_tokens("@acme/Design-System.v2"), vec!["design", "system", "v2"]);
    }
}
