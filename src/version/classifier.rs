//! Release type classification of free-form version strings
//!
//! A version is a release when it carries no letters at all or matches one of
//! the known revision shapes. Otherwise every alphabetic word in it must map to
//! a release type and all words must agree, e.g.:
//! - `2.0-rc1` -> release-candidate
//! - `1.0-beta2` -> beta
//! - `1.0-beta-rc1` -> unknown (conflicting markers)
//! - `1.0-foobar` -> unknown (unmapped word)

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::version::comparator::compare_versions;
use crate::version::profile::ComparisonProfile;
use crate::version::types::ReleaseType;

/// Literal token for the unreleased tip of a repository
pub const CURRENT: &str = "current";

/// Digits, dots and dashes optionally followed by lowercase letters (0.9.8k)
static LETTER_RELEASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A[\d.\-]+[a-z]*\z").unwrap());

/// Revision suffix: 1.2-r3, 1.2_r3
static REVISION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A\d[\d.]*[\-_]r\d+\z").unwrap());

/// Build suffix: 1.2.v20140101
static BUILD_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A\d[\d.]*\.v\d+\z").unwrap());

/// An alphabetic word found in a version and what follows it
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Word {
    text: String,
    followed_by_digit: bool,
}

/// Classify a version string into a release type
pub fn classify(version: &str, profile: &ComparisonProfile) -> ReleaseType {
    if profile.letter_releases
        && LETTER_RELEASE_RE.is_match(version)
        && !version.contains("beta")
    {
        return ReleaseType::Release;
    }

    if let Some(pattern) = &profile.release_pattern
        && pattern.is_match(version)
    {
        return ReleaseType::Release;
    }

    if !version.chars().any(|c| c.is_ascii_alphabetic())
        || REVISION_RE.is_match(version)
        || BUILD_SUFFIX_RE.is_match(version)
    {
        return ReleaseType::Release;
    }

    let mut types = BTreeSet::new();
    for word in words(version) {
        let Some(release_type) = word_type(&word) else {
            debug!("Unrecognized word '{}' in version '{}'", word.text, version);
            return ReleaseType::Unknown;
        };
        types.insert(release_type);
    }

    let mut types = types.into_iter();
    match (types.next(), types.next()) {
        (Some(release_type), None) => release_type,
        (Some(_), Some(_)) => {
            debug!("Conflicting release markers in version '{}'", version);
            ReleaseType::Unknown
        }
        // Only a tag prefix such as the `v` of `v1.2`
        (None, _) => ReleaseType::Release,
    }
}

/// Canonical identifier of a version
///
/// When the profile's release pattern matches, its first capture group
/// replaces the version for storage keys and later processing.
pub fn canonical_version<'a>(version: &'a str, profile: &ComparisonProfile) -> Cow<'a, str> {
    profile
        .release_pattern
        .as_ref()
        .and_then(|pattern| pattern.captures(version))
        .and_then(|captures| captures.get(1))
        .map(|group| Cow::Owned(group.as_str().to_string()))
        .unwrap_or(Cow::Borrowed(version))
}

/// Apply [`canonical_version`] to each discovered version
pub fn canonical_versions(versions: &[String], profile: &ComparisonProfile) -> Vec<String> {
    versions
        .iter()
        .map(|version| canonical_version(version, profile).into_owned())
        .collect()
}

/// Check whether a version is excluded by the profile
pub fn skip_version(version: &str, profile: &ComparisonProfile) -> bool {
    if profile.is_skipped_explicitly(version) {
        debug!("Skipping version '{}': listed in SkipVersions", version);
        return true;
    }

    if profile.skip_odd && has_odd_minor(version) {
        debug!("Skipping version '{}': odd minor version", version);
        return true;
    }

    if let Some(minimal) = &profile.minimal_version
        && compare_versions(version, minimal, profile).is_lt()
    {
        debug!("Skipping version '{}': older than {}", version, minimal);
        return true;
    }

    false
}

/// Second dot-segment starts with an odd number (1.3.0, 2.5rc1)
fn has_odd_minor(version: &str) -> bool {
    let Some(minor) = version.split('.').nth(1) else {
        return false;
    };

    minor
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .last()
        .and_then(|c| c.to_digit(10))
        .is_some_and(|digit| digit % 2 == 1)
}

/// Maximal alphabetic runs, lowercased and sorted
///
/// A leading `v` directly followed by a digit is a tag prefix, not a word.
fn words(version: &str) -> BTreeSet<Word> {
    let bytes = version.as_bytes();
    let mut words = BTreeSet::new();
    let mut start = None;

    for i in 0..=bytes.len() {
        let is_alpha = bytes.get(i).is_some_and(|b| b.is_ascii_alphabetic());
        match (start, is_alpha) {
            (None, true) => start = Some(i),
            (Some(begin), false) => {
                start = None;
                let text = &version[begin..i];
                let followed_by_digit = bytes.get(i).is_some_and(|b| b.is_ascii_digit());
                if begin == 0 && text.eq_ignore_ascii_case("v") && followed_by_digit {
                    continue;
                }
                words.insert(Word {
                    text: text.to_ascii_lowercase(),
                    followed_by_digit,
                });
            }
            _ => {}
        }
    }

    words
}

fn word_type(word: &Word) -> Option<ReleaseType> {
    let release_type = match word.text.as_str() {
        "final" => ReleaseType::Release,
        "r" | "rel" | "release" if word.followed_by_digit => ReleaseType::Release,
        "devel" | "dev" | "exp" => ReleaseType::Devel,
        "snapshot" | "snap" | "master" => ReleaseType::Snapshot,
        "alfa" | "alpha" | "a" => ReleaseType::Alfa,
        "tp" | "preview" => ReleaseType::TechnologyPreview,
        "beta" | "b" => ReleaseType::Beta,
        "pre" => ReleaseType::PreRelease,
        "rc" | "cr" => ReleaseType::ReleaseCandidate,
        "current" => ReleaseType::Current,
        _ => return None,
    };
    Some(release_type)
}
