//! Per-version build state records

use std::path::PathBuf;

#[cfg(test)]
use mockall::automock;

use crate::version::error::StateError;
use crate::version::types::ReleaseType;

/// Progress of a version through download, build and install
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildState {
    /// Part of the natural sequence, nothing done yet
    Discovered,
    /// Source archive is available locally
    Downloaded,
    /// Built and installed into its install directory
    Installed,
    /// Download or build failed
    Failed,
}

impl BuildState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildState::Discovered => "discovered",
            BuildState::Downloaded => "downloaded",
            BuildState::Installed => "installed",
            BuildState::Failed => "failed",
        }
    }
}

impl std::fmt::Display for BuildState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BuildState {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "discovered" => Ok(BuildState::Discovered),
            "downloaded" => Ok(BuildState::Downloaded),
            "installed" => Ok(BuildState::Installed),
            "failed" => Ok(BuildState::Failed),
            _ => Err(StateError::UnknownState(s.to_string())),
        }
    }
}

/// Stored state of one version of a library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRecord {
    pub library: String,
    pub version: String,
    pub release_type: ReleaseType,
    pub state: BuildState,
    pub install_dir: Option<PathBuf>,
    /// Milliseconds since UNIX epoch
    pub updated_at: i64,
}

/// Trait for storing and retrieving per-version build state
#[cfg_attr(test, automock)]
pub trait StateStorer: Send + Sync + 'static {
    /// Record versions as discovered
    ///
    /// Existing records keep their state; only the release type is refreshed.
    fn record_discovered(
        &self,
        library: &str,
        versions: &[(String, ReleaseType)],
    ) -> Result<(), StateError>;

    /// Update the state of a known version
    ///
    /// Returns false if the version was never recorded.
    fn set_state(
        &self,
        library: &str,
        version: &str,
        state: BuildState,
        install_dir: Option<PathBuf>,
    ) -> Result<bool, StateError>;

    /// Get the record of a single version
    fn get_record(&self, library: &str, version: &str)
    -> Result<Option<VersionRecord>, StateError>;

    /// Get all records of a library in insertion order
    fn list_records(&self, library: &str) -> Result<Vec<VersionRecord>, StateError>;

    /// Forget a version; returns false if it was not recorded
    fn remove_version(&self, library: &str, version: &str) -> Result<bool, StateError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(BuildState::Discovered)]
    #[case(BuildState::Downloaded)]
    #[case(BuildState::Installed)]
    #[case(BuildState::Failed)]
    fn from_str_accepts_as_str_output(#[case] state: BuildState) {
        assert_eq!(state.as_str().parse::<BuildState>().unwrap(), state);
    }

    #[test]
    fn from_str_rejects_unknown_state() {
        let err = "building".parse::<BuildState>().unwrap_err();
        assert!(matches!(err, StateError::UnknownState(s) if s == "building"));
    }
}
