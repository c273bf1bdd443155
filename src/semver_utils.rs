//! Version-range parsing and comparison.
//!
//! Workspace manifests declare ranges, not versions. For conflict reasoning
//! we only need a representative version per range, so every range is reduced
//! to the first version it names:
//!
//! ```text
//! "^4.17.21"          → 4.17.21
//! ">= 1.2 < 2"        → 1.2.0
//! "4.x"               → 4.0.0
//! "workspace:^1.0.0"  → 1.0.0
//! "npm:lodash@~4.1"   → 4.1.0
//! "latest", "*", ""   → none
//! ```
//!
//! Parsed versions are plain [`semver::Version`] values, so ordering follows
//! semver precedence (a release beats its prereleases).

use semver::{Prerelease, Version};
use std::cmp::Ordering;

/// Characters that may lead a range before the version proper.
const RANGE_OPERATORS: &[char] = &['^', '~', '>', '<', '=', 'v', 'V', ' ', '\t'];

/// How far apart two versions are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VersionDiff {
    /// Identical versions
    None,
    /// Same major.minor.patch, different prerelease
    Prerelease,
    /// Same major.minor
    Patch,
    /// Same major
    Minor,
    /// Different major
    Major,
}

/// Strip protocol prefixes (`workspace:`, `npm:` aliases) from a range.
fn strip_protocol(range: &str) -> &str {
    let range = range.trim();
    if let Some(rest) = range.strip_prefix("workspace:") {
        return rest.trim();
    }
    if let Some(alias) = range.strip_prefix("npm:") {
        // npm:<name>@<range>; scoped names carry a leading '@'
        return match alias.rsplit_once('@') {
            Some((name, version)) if !name.is_empty() => version.trim(),
            _ => "",
        };
    }
    range
}

/// Reduce a range to the text of its first version term.
///
/// Unparseable input comes back trimmed but otherwise unchanged.
#[must_use]
pub fn strip_range(range: &str) -> String {
    first_term(range).map_or_else(|| range.trim().to_string(), ToString::to_string)
}

fn first_term(range: &str) -> Option<&str> {
    let range = strip_protocol(range);
    let range = range.split("||").next()?.trim();
    let range = range.split(" - ").next()?.trim();
    let range = range.trim_start_matches(RANGE_OPERATORS);
    let term = range
        .split(|c: char| c.is_whitespace() || c == ',')
        .next()?
        .trim();
    (!term.is_empty()).then_some(term)
}

/// Parse the representative version of a range.
///
/// Returns `None` for dist-tags (`latest`, `next`), bare wildcards, empty
/// strings, and anything else that does not name a version.
#[must_use]
pub fn parse_version(range: &str) -> Option<Version> {
    let term = first_term(range)?;

    let (core, prerelease) = match term.split_once('-') {
        Some((core, pre)) => (core, Some(pre)),
        None => (term, None),
    };
    let core = core.split('+').next().unwrap_or(core);
    let prerelease = prerelease.map(|p| p.split('+').next().unwrap_or(p));

    let parts: Vec<&str> = core.split('.').collect();
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }

    let mut numbers = [0_u64; 3];
    let mut wildcard = false;
    for (i, part) in parts.iter().enumerate() {
        if matches!(*part, "x" | "X" | "*") {
            if i == 0 {
                return None;
            }
            wildcard = true;
            break;
        }
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        numbers[i] = part.parse().ok()?;
    }

    let mut version = Version::new(numbers[0], numbers[1], numbers[2]);
    if let (Some(pre), false) = (prerelease, wildcard) {
        version.pre = Prerelease::new(pre).ok()?;
    }
    Some(version)
}

/// Compare the representative versions of two ranges.
///
/// Unparseable ranges sort below every parseable one.
#[must_use]
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (parse_version(a), parse_version(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

/// Classify how far apart two parsed versions are.
#[must_use]
pub fn diff(a: &Version, b: &Version) -> VersionDiff {
    if a.major != b.major {
        VersionDiff::Major
    } else if a.minor != b.minor {
        VersionDiff::Minor
    } else if a.patch != b.patch {
        VersionDiff::Patch
    } else if a.pre != b.pre {
        VersionDiff::Prerelease
    } else {
        VersionDiff::None
    }
}

/// Classify how far apart two ranges are; `None` if either is unparseable.
#[must_use]
pub fn version_difference(a: &str, b: &str) -> Option<VersionDiff> {
    Some(diff(&parse_version(a)?, &parse_version(b)?))
}

/// The range whose representative version is highest.
///
/// Ties keep the first range seen; unparseable ranges never win.
pub fn find_highest_version<S: AsRef<str>>(ranges: &[S]) -> Option<String> {
    let mut best: Option<(Version, &str)> = None;
    for range in ranges {
        let range = range.as_ref();
        let Some(version) = parse_version(range) else {
            continue;
        };
        if best.as_ref().is_none_or(|(current, _)| version > *current) {
            best = Some((version, range));
        }
    }
    best.map(|(_, range)| range.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("4.17.21", 4, 17, 21 ; "plain")]
    #[test_case("^4.17.21", 4, 17, 21 ; "caret")]
    #[test_case("~1.2.3", 1, 2, 3 ; "tilde")]
    #[test_case(">=2.0.0 <3.0.0", 2, 0, 0 ; "compound")]
    #[test_case(">= 1.2", 1, 2, 0 ; "spaced operator")]
    #[test_case("1.0.0 || 2.0.0", 1, 0, 0 ; "alternatives")]
    #[test_case("1.2.3 - 2.0.0", 1, 2, 3 ; "hyphen range")]
    #[test_case("4.x", 4, 0, 0 ; "major wildcard")]
    #[test_case("4.17.x", 4, 17, 0 ; "minor wildcard")]
    #[test_case("4.17.*", 4, 17, 0 ; "star wildcard")]
    #[test_case("v3", 3, 0, 0 ; "v prefix")]
    #[test_case("workspace:^1.4.0", 1, 4, 0 ; "workspace protocol")]
    #[test_case("npm:@scope/lodash@~4.1", 4, 1, 0 ; "npm alias")]
    fn test_parse_version(range: &str, major: u64, minor: u64, patch: u64) {
        let v = parse_version(range).unwrap();
        assert_eq!((v.major, v.minor, v.patch), (major, minor, patch));
    }

    #[test_case("" ; "empty")]
    #[test_case("latest" ; "latest tag")]
    #[test_case("next" ; "next tag")]
    #[test_case("*" ; "star")]
    #[test_case("x" ; "x")]
    #[test_case("workspace:*" ; "workspace star")]
    #[test_case("github:user/repo" ; "git source")]
    #[test_case("1.2.3.4" ; "too many parts")]
    fn test_unparseable(range: &str) {
        assert!(parse_version(range).is_none());
    }

    #[test]
    fn test_prerelease() {
        let v = parse_version("^2.0.0-beta.1").unwrap();
        assert_eq!(v.pre.as_str(), "beta.1");
        assert_eq!(compare_versions("2.0.0", "2.0.0-beta.1"), Ordering::Greater);
    }

    #[test_case("^4.17.19", "^4.17.21", VersionDiff::Patch ; "patch")]
    #[test_case("4.17.0", "4.18.0", VersionDiff::Minor ; "minor")]
    #[test_case("3.0.0", "4.0.0", VersionDiff::Major ; "major")]
    #[test_case("1.0.0-alpha", "1.0.0-beta", VersionDiff::Prerelease ; "prerelease")]
    #[test_case("^1.0.0", "~1.0.0", VersionDiff::None ; "same version")]
    fn test_version_difference(a: &str, b: &str, expected: VersionDiff) {
        assert_eq!(version_difference(a, b), Some(expected));
    }

    #[test]
    fn test_difference_with_unparseable() {
        assert_eq!(version_difference("latest", "1.0.0"), None);
    }

    #[test]
    fn test_find_highest_version() {
        let ranges = ["^4.17.19", "^4.17.21", "^4.17.20"];
        assert_eq!(find_highest_version(&ranges).as_deref(), Some("^4.17.21"));
    }

    #[test]
    fn test_find_highest_keeps_first_on_tie() {
        let ranges = ["~2.0.0", "^2.0.0", "latest"];
        assert_eq!(find_highest_version(&ranges).as_deref(), Some("~2.0.0"));
        assert_eq!(find_highest_version(&["latest", "*"]), None);
    }

    #[test]
    fn test_strip_range() {
        assert_eq!(strip_range("^4.17.21"), "4.17.21");
        assert_eq!(strip_range(">=1.0.0 <2"), "1.0.0");
        assert_eq!(strip_range(" latest "), "latest");
    }
}
