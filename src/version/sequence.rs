//! Natural sequence of versions worth tracking
//!
//! All stable releases, plus the newest pre-release when it is ahead of the
//! newest release, plus `current` at the end when it was discovered.

use indexmap::IndexSet;
use tracing::{debug, info};

use crate::version::classifier::{CURRENT, classify, skip_version};
use crate::version::comparator::{compare_versions, max_version, sort_versions};
use crate::version::profile::ComparisonProfile;
use crate::version::types::ReleaseType;

/// Build the natural sequence, ordered from oldest to newest
pub fn build_natural_sequence<'a>(
    versions: impl IntoIterator<Item = &'a str>,
    profile: &ComparisonProfile,
) -> Vec<String> {
    let versions: IndexSet<&str> = versions.into_iter().collect();

    let mut releases = Vec::new();
    let mut previews = Vec::new();
    let mut unstables = Vec::new();
    let mut has_current = false;

    for &version in &versions {
        if version == CURRENT {
            has_current = true;
            continue;
        }

        let release_type = classify(version, profile);
        if release_type == ReleaseType::Unknown {
            info!("Ignoring version '{}': unrecognized release type", version);
            continue;
        }
        if skip_version(version, profile) {
            info!("Skipping version '{}'", version);
            continue;
        }

        match release_type {
            ReleaseType::Release => releases.push(version.to_string()),
            ReleaseType::TechnologyPreview => previews.push(version.to_string()),
            _ => unstables.push(version.to_string()),
        }
    }

    sort_versions(&mut releases, profile);

    let candidate = max_version(unstables.iter().map(String::as_str), profile)
        .or_else(|| max_version(previews.iter().map(String::as_str), profile))
        .map(str::to_string);
    let mut sequence = releases;

    if let Some(candidate) = candidate {
        let ahead = sequence
            .last()
            .is_none_or(|last| compare_versions(&candidate, last, profile).is_gt());
        if ahead {
            sequence.push(candidate);
        } else {
            debug!(
                "Dropping pre-release '{}': not newer than the latest release",
                candidate
            );
        }
    }

    if has_current {
        sequence.push(CURRENT.to_string());
    }

    sequence
}
