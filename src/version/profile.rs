//! Per-library heuristics consumed by the classifier and the comparator

use std::path::Path;

use regex::Regex;
use tracing::debug;

use crate::config::ProfileConfig;
use crate::version::error::ProfileError;

/// Characters that turn a `SkipVersions` entry into a pattern.
/// `.` is excluded since every version contains it.
const PATTERN_METACHARACTERS: &[char] = &[
    '*', '+', '?', '[', ']', '(', ')', '{', '}', '|', '^', '$', '\\',
];

/// A single `SkipVersions` entry
#[derive(Debug, Clone)]
pub enum SkipRule {
    Literal(String),
    /// Anchored to match the whole version
    Pattern(Regex),
}

impl SkipRule {
    fn parse(entry: &str) -> Result<Self, ProfileError> {
        if !entry.contains(PATTERN_METACHARACTERS) {
            return Ok(SkipRule::Literal(entry.to_string()));
        }

        Regex::new(&format!(r"\A(?:{entry})\z"))
            .map(SkipRule::Pattern)
            .map_err(|source| ProfileError::InvalidPattern {
                field: "SkipVersions",
                pattern: entry.to_string(),
                source,
            })
    }

    pub fn matches(&self, version: &str) -> bool {
        match self {
            SkipRule::Literal(literal) => literal == version,
            SkipRule::Pattern(pattern) => pattern.is_match(version),
        }
    }
}

/// Read-only configuration that alters classification and comparison
#[derive(Debug, Clone, Default)]
pub struct ComparisonProfile {
    pub letter_releases: bool,
    pub string_releases: bool,
    pub extend_version: Option<usize>,
    pub release_pattern: Option<Regex>,
    pub skip_versions: Vec<SkipRule>,
    pub skip_odd: bool,
    pub minimal_version: Option<String>,
}

impl ComparisonProfile {
    /// Compile the patterns of a loaded profile
    pub fn from_config(config: &ProfileConfig) -> Result<Self, ProfileError> {
        let release_pattern = config
            .release_pattern
            .as_deref()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| ProfileError::InvalidPattern {
                    field: "ReleasePattern",
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .transpose()?;

        let skip_versions = config
            .skip_versions
            .iter()
            .map(|entry| SkipRule::parse(entry))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            letter_releases: config.letter_releases,
            string_releases: config.string_releases,
            extend_version: config.extend_version.filter(|&len| len > 0),
            release_pattern,
            skip_versions,
            skip_odd: config.skip_odd,
            minimal_version: config
                .minimal_version
                .as_ref()
                .filter(|v| !v.is_empty())
                .cloned(),
        })
    }

    pub fn is_skipped_explicitly(&self, version: &str) -> bool {
        self.skip_versions.iter().any(|rule| rule.matches(version))
    }
}

/// Load a JSON profile file
pub fn load_profile(path: &Path) -> Result<(ProfileConfig, ComparisonProfile), ProfileError> {
    debug!("Loading profile from {:?}", path);

    let content = std::fs::read_to_string(path)?;
    let config: ProfileConfig = serde_json::from_str(&content)?;
    let profile = ComparisonProfile::from_config(&config)?;

    Ok((config, profile))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    #[rstest]
    #[case("1.0", "1.0", true)]
    #[case("1.0", "1x0", false)]
    #[case("1.0", "1.0.1", false)]
    #[case("0\\..*", "0.9.1", true)]
    #[case("0\\..*", "10.1", false)]
    #[case("2.0-(rc|beta)\\d+", "2.0-rc3", true)]
    fn skip_rule_matches(#[case] entry: &str, #[case] version: &str, #[case] expected: bool) {
        let rule = SkipRule::parse(entry).unwrap();
        assert_eq!(rule.matches(version), expected);
    }

    #[test]
    fn from_config_rejects_invalid_release_pattern() {
        let config = ProfileConfig {
            release_pattern: Some("(unclosed".to_string()),
            ..ProfileConfig::default()
        };

        let err = ComparisonProfile::from_config(&config).unwrap_err();
        assert!(matches!(
            err,
            ProfileError::InvalidPattern {
                field: "ReleasePattern",
                ..
            }
        ));
    }

    #[test]
    fn from_config_rejects_invalid_skip_pattern() {
        let config = ProfileConfig {
            skip_versions: vec!["1.0".to_string(), "[bad".to_string()],
            ..ProfileConfig::default()
        };

        assert!(ComparisonProfile::from_config(&config).is_err());
    }

    #[test]
    fn from_config_drops_zero_extend_version() {
        let config = ProfileConfig {
            extend_version: Some(0),
            ..ProfileConfig::default()
        };

        let profile = ComparisonProfile::from_config(&config).unwrap();
        assert_eq!(profile.extend_version, None);
    }

    #[test]
    fn load_profile_reads_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"Name": "openssl", "LetterReleases": 1, "SkipVersions": "0.9.6"}}"#
        )
        .unwrap();

        let (config, profile) = load_profile(file.path()).unwrap();

        assert_eq!(config.name.as_deref(), Some("openssl"));
        assert!(profile.letter_releases);
        assert!(profile.is_skipped_explicitly("0.9.6"));
        assert!(!profile.is_skipped_explicitly("0.9.7"));
    }

    #[test]
    fn load_profile_reports_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();

        assert!(matches!(
            load_profile(file.path()),
            Err(ProfileError::Json(_))
        ));
    }
}
