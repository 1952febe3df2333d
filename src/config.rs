use serde::{Deserialize, Deserializer};
use std::path::PathBuf;

/// Library profile as supplied by the configuration loader
///
/// Keys follow the profile file convention (`LetterReleases`, `SkipOdd`, ...).
/// Unknown keys are ignored and missing keys take their defaults.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct ProfileConfig {
    /// Library name, used as the state database key
    pub name: Option<String>,
    /// Trailing single letters are point releases (0.9.8k > 0.9.8)
    #[serde(deserialize_with = "flag")]
    pub letter_releases: bool,
    /// Compare versions as plain strings
    #[serde(deserialize_with = "flag")]
    pub string_releases: bool,
    /// Minimum length both versions are right-padded to with zeros
    pub extend_version: Option<usize>,
    /// Pattern whose first capture group is the canonical release identifier
    pub release_pattern: Option<String>,
    /// Versions (literals or patterns) to exclude
    #[serde(deserialize_with = "string_list")]
    pub skip_versions: Vec<String>,
    /// Exclude versions whose second segment is odd
    #[serde(deserialize_with = "flag")]
    pub skip_odd: bool,
    /// Versions older than this are excluded
    pub minimal_version: Option<String>,
}

/// Accepts `true`/`false` as well as the `0`/`1` numbers older profiles use
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Number(i64),
        Text(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Number(n) => n != 0,
        Flag::Text(s) => !matches!(s.trim(), "" | "0" | "false"),
    })
}

/// Accepts either a JSON array or a comma-separated string
fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum List {
        Many(Vec<String>),
        One(String),
    }

    let items = match List::deserialize(deserializer)? {
        List::Many(items) => items,
        List::One(joined) => joined.split(',').map(str::to_string).collect(),
    };

    Ok(items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

/// Returns the path to the data directory for release-monitor.
/// Uses $XDG_DATA_HOME/release-monitor if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/release-monitor,
/// or ./release-monitor if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the state database file.
pub fn db_path() -> PathBuf {
    data_dir().join("state.db")
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("release-monitor.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("release-monitor")
}
