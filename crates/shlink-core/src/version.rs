//! Server version parsing and feature gating

use std::cmp::Ordering;
use std::sync::OnceLock;

use regex::Regex;

/// Minimum server version that exposes short URL titles
pub const TITLES_MIN_VERSION: SemVer = SemVer::new(2, 6, 0);

/// Versions reported by development builds of Shlink
const LATEST_ALIASES: [&str; 2] = ["latest", "dev"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SemVer {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl SemVer {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    pub fn parse(version: &str) -> Option<Self> {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let re = PATTERN.get_or_init(|| {
            Regex::new(r"^v?(\d+)\.(\d+)(?:\.(\d+))?").expect("version pattern is valid")
        });

        let caps = re.captures(version.trim())?;
        let part = |i: usize| {
            caps.get(i)
                .map(|m| m.as_str().parse::<u64>().ok())
                .unwrap_or(Some(0))
        };
        Some(Self::new(part(1)?, part(2)?, part(3)?))
    }
}

impl std::fmt::Display for SemVer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// A version as reported by a server, which may be a development alias
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerVersion {
    Latest,
    Release(SemVer),
}

impl ServerVersion {
    pub fn parse(version: &str) -> Option<Self> {
        let trimmed = version.trim();
        if LATEST_ALIASES
            .iter()
            .any(|alias| trimmed.eq_ignore_ascii_case(alias))
        {
            return Some(ServerVersion::Latest);
        }
        SemVer::parse(trimmed).map(ServerVersion::Release)
    }

    fn cmp_semver(&self, other: &SemVer) -> Ordering {
        match self {
            ServerVersion::Latest => Ordering::Greater,
            ServerVersion::Release(v) => v.cmp(other),
        }
    }
}

/// Inclusive lower / exclusive upper bound version constraint
#[derive(Debug, Clone, Copy, Default)]
pub struct VersionConstraint {
    pub min_version: Option<SemVer>,
    pub max_version: Option<SemVer>,
}

/// Whether `version` satisfies `constraint`. Unparseable versions never match.
pub fn version_match(version: &str, constraint: VersionConstraint) -> bool {
    let Some(parsed) = ServerVersion::parse(version) else {
        return false;
    };

    let above_min = constraint
        .min_version
        .map(|min| parsed.cmp_semver(&min) != Ordering::Less)
        .unwrap_or(true);
    let below_max = constraint
        .max_version
        .map(|max| parsed.cmp_semver(&max) == Ordering::Less)
        .unwrap_or(true);

    above_min && below_max
}

/// Title column is only shown for servers at or above [`TITLES_MIN_VERSION`]
pub fn supports_short_url_titles(version: Option<&str>) -> bool {
    version
        .map(|v| {
            version_match(
                v,
                VersionConstraint {
                    min_version: Some(TITLES_MIN_VERSION),
                    max_version: None,
                },
            )
        })
        .unwrap_or(false)
}

/// Human readable version, prefixing releases with `v`
pub fn printable_version(version: &str) -> String {
    match ServerVersion::parse(version) {
        Some(ServerVersion::Release(v)) => format!("v{v}"),
        _ => version.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_semver() {
        assert_eq!(SemVer::parse("2.6.1"), Some(SemVer::new(2, 6, 1)));
        assert_eq!(SemVer::parse("v3.0"), Some(SemVer::new(3, 0, 0)));
        assert_eq!(SemVer::parse("2.10.0-rc1"), Some(SemVer::new(2, 10, 0)));
        assert_eq!(SemVer::parse("garbage"), None);
    }

    #[test]
    fn test_supports_titles_from_2_6_0() {
        for version in ["2.6.0", "2.6.1", "2.7.0", "3.0.0", "latest"] {
            assert!(
                supports_short_url_titles(Some(version)),
                "{version} should support titles"
            );
        }
        for version in ["2.5.9", "1.0.0", "nonsense"] {
            assert!(!supports_short_url_titles(Some(version)));
        }
        assert!(!supports_short_url_titles(None));
    }

    #[test]
    fn test_version_match_max_is_exclusive() {
        let constraint = VersionConstraint {
            min_version: None,
            max_version: Some(SemVer::new(3, 0, 0)),
        };
        assert!(version_match("2.9.9", constraint));
        assert!(!version_match("3.0.0", constraint));
    }

    #[test]
    fn test_printable_version() {
        assert_eq!(printable_version("2.6.0"), "v2.6.0");
        assert_eq!(printable_version("latest"), "latest");
    }
}
