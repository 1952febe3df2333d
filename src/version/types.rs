//! Common types for version classification

use serde::Serialize;

/// Stability tier of a version string
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReleaseType {
    /// Stable release (1.2.3, 1.0-final, 0.9.8k with letter releases)
    Release,
    /// Release candidate (2.0-rc1, 1.0cr2)
    ReleaseCandidate,
    /// Beta (1.0-beta2, 1.0b1)
    Beta,
    /// Alpha (1.0a, 2.0-alpha3)
    Alfa,
    /// Development build (1.3-dev, 0.1-exp)
    Devel,
    /// Snapshot of a branch (1.0-snapshot, master)
    Snapshot,
    /// Generic pre-release (2.0-pre1)
    PreRelease,
    /// Technology preview (5.0-tp2, 1.0-preview)
    TechnologyPreview,
    /// Unreleased tip of the repository
    Current,
    /// Unrecognized or conflicting markers; never tracked
    Unknown,
}

impl ReleaseType {
    /// Returns the string representation of the release type
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseType::Release => "release",
            ReleaseType::ReleaseCandidate => "release-candidate",
            ReleaseType::Beta => "beta",
            ReleaseType::Alfa => "alfa",
            ReleaseType::Devel => "devel",
            ReleaseType::Snapshot => "snapshot",
            ReleaseType::PreRelease => "pre-release",
            ReleaseType::TechnologyPreview => "technology-preview",
            ReleaseType::Current => "current",
            ReleaseType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReleaseType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "release" => Ok(ReleaseType::Release),
            "release-candidate" => Ok(ReleaseType::ReleaseCandidate),
            "beta" => Ok(ReleaseType::Beta),
            "alfa" => Ok(ReleaseType::Alfa),
            "devel" => Ok(ReleaseType::Devel),
            "snapshot" => Ok(ReleaseType::Snapshot),
            "pre-release" => Ok(ReleaseType::PreRelease),
            "technology-preview" => Ok(ReleaseType::TechnologyPreview),
            "current" => Ok(ReleaseType::Current),
            "unknown" => Ok(ReleaseType::Unknown),
            _ => Err(()),
        }
    }
}
