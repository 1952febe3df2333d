//! Decide which versions of a library still need a build

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::state::storer::{BuildState, StateStorer};
use crate::version::classifier::{CURRENT, canonical_versions, classify};
use crate::version::comparator::sort_versions;
use crate::version::error::StateError;
use crate::version::profile::ComparisonProfile;
use crate::version::sequence::build_natural_sequence;

/// Outcome of comparing the natural sequence with stored state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildPlan {
    /// Natural sequence, oldest first
    pub sequence: Vec<String>,
    /// Members not installed yet; `current` is always rebuilt
    pub to_build: Vec<String>,
    /// Members already installed
    pub installed: Vec<String>,
    /// Stored versions that dropped out of the sequence, oldest first
    pub stale: Vec<String>,
}

/// Build the natural sequence of discovered versions and plan their builds
///
/// Sequence members are recorded as discovered so later runs see them.
pub fn plan_builds<S: StateStorer + ?Sized>(
    storer: &S,
    library: &str,
    profile: &ComparisonProfile,
    discovered: &[String],
) -> Result<BuildPlan, StateError> {
    let canonical = canonical_versions(discovered, profile);

    let sequence = build_natural_sequence(canonical.iter().map(String::as_str), profile);
    if sequence.is_empty() {
        info!("No natural versions found for {}", library);
    } else {
        info!(
            "Found {} natural versions for {} (of {} discovered)",
            sequence.len(),
            library,
            discovered.len()
        );
    }

    let members: Vec<_> = sequence
        .iter()
        .map(|version| (version.clone(), classify(version, profile)))
        .collect();
    storer.record_discovered(library, &members)?;

    let states: HashMap<String, BuildState> = storer
        .list_records(library)?
        .into_iter()
        .map(|record| (record.version, record.state))
        .collect();

    let mut plan = BuildPlan::default();
    for version in &sequence {
        match states.get(version) {
            Some(BuildState::Installed) if version != CURRENT => {
                plan.installed.push(version.clone())
            }
            _ => plan.to_build.push(version.clone()),
        }
    }

    let in_sequence: HashSet<&str> = sequence.iter().map(String::as_str).collect();
    plan.stale = states
        .into_keys()
        .filter(|version| !in_sequence.contains(version.as_str()))
        .collect();
    sort_versions(&mut plan.stale, profile);

    for version in &plan.stale {
        info!("Version {} of {} is no longer tracked", version, library);
    }

    plan.sequence = sequence;
    Ok(plan)
}

/// Forget stale versions of a library
///
/// Returns how many records were removed.
pub fn prune_stale<S: StateStorer + ?Sized>(
    storer: &S,
    library: &str,
    stale: &[String],
) -> Result<usize, StateError> {
    let mut removed = 0;
    for version in stale {
        if storer.remove_version(library, version)? {
            removed += 1;
        } else {
            debug!("Version {} of {} was already gone", version, library);
        }
    }

    info!("Pruned {} stale versions of {}", removed, library);
    Ok(removed)
}
