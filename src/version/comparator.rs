//! Ordering of free-form version strings
//!
//! Versions are compared segment by segment after normalization:
//! - `1.2a` behaves like `1.2.a`
//! - `_`, `~` and `-` behave like `.`
//! - numeric segments compare as integers (`1.2.10` > `1.2.9`)
//! - letters sort below numbers (`1.0a` < `1.0`, `2.0rc1` < `2.0`)
//!
//! The empty string sorts lowest and `current` sorts highest.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

use crate::version::classifier::{CURRENT, classify};
use crate::version::profile::ComparisonProfile;
use crate::version::token::{Token, TokenKind, Tokens};

/// Package "version-release" convention: 0.12-20140410
static VERSION_RELEASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A(\d+(?:\.\d+)*)-(\d+)\z").unwrap());

/// Compare two version strings under a profile
pub fn compare_versions(a: &str, b: &str, profile: &ComparisonProfile) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    if a.is_empty() {
        return Ordering::Less;
    }
    if b.is_empty() {
        return Ordering::Greater;
    }
    if a == CURRENT {
        return Ordering::Greater;
    }
    if b == CURRENT {
        return Ordering::Less;
    }

    if profile.letter_releases {
        if let Some(ordering) = compare_letter_releases(a, b, profile) {
            return ordering;
        }
    } else if profile.string_releases {
        return a.cmp(b);
    } else if let Some(width) = profile.extend_version {
        return compare_generic(&format!("{a:0<width$}"), &format!("{b:0<width$}"));
    }

    compare_generic(a, b)
}

/// Sort versions from oldest to newest
///
/// Stable insertion sort. `compare_versions` is not transitive on every
/// input (punctuation tokens, version-release forms), and `slice::sort_by`
/// may panic on such a comparator; this never does.
pub fn sort_versions(versions: &mut [String], profile: &ComparisonProfile) {
    for i in 1..versions.len() {
        let mut j = i;
        while j > 0 && compare_versions(&versions[j - 1], &versions[j], profile).is_gt() {
            versions.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Newest of the given versions
pub fn max_version<'a>(
    versions: impl IntoIterator<Item = &'a str>,
    profile: &ComparisonProfile,
) -> Option<&'a str> {
    versions
        .into_iter()
        .max_by(|a, b| compare_versions(a, b, profile))
}

/// `0.9.8k` is newer than `0.9.8` when both classify alike
fn compare_letter_releases(a: &str, b: &str, profile: &ComparisonProfile) -> Option<Ordering> {
    if !a.starts_with(b) && !b.starts_with(a) {
        return None;
    }
    if classify(a, profile) != classify(b, profile) {
        return None;
    }
    Some(a.len().cmp(&b.len()))
}

fn compare_generic(a: &str, b: &str) -> Ordering {
    if let (Some(x), Some(y)) = (leading_number(a), leading_number(b)) {
        let ordering = compare_numeric(x, y);
        if ordering.is_ne() {
            return ordering;
        }
    }

    if is_numeric_dotted(a) && is_numeric_dotted(b) {
        return compare_numeric_dotted(a, b);
    }

    if let (Some(left), Some(right)) = (
        VERSION_RELEASE_RE.captures(a),
        VERSION_RELEASE_RE.captures(b),
    ) {
        return compare_generic(&left[1], &right[1])
            .then_with(|| compare_generic(&left[2], &right[2]));
    }

    compare_segments(&normalize(a), &normalize(b))
}

/// Digits before the first `.`, if the version starts that way
fn leading_number(version: &str) -> Option<&str> {
    let end = version.find(|c: char| !c.is_ascii_digit())?;
    (end > 0 && version[end..].starts_with('.')).then(|| &version[..end])
}

fn is_numeric_dotted(version: &str) -> bool {
    !version.is_empty() && version.chars().all(|c| c.is_ascii_digit() || c == '.')
}

/// Missing trailing segments count as zero
fn compare_numeric_dotted(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (l, r) => {
                let ordering = compare_numeric(l.unwrap_or("0"), r.unwrap_or("0"));
                if ordering.is_ne() {
                    return ordering;
                }
            }
        }
    }
}

/// Compare digit strings of any length as integers
fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Split into dot segments with separators unified and leading zeros stripped
fn normalize(version: &str) -> Vec<String> {
    let mut unified = String::with_capacity(version.len() + 4);
    let mut after_digit = false;
    for c in version.chars() {
        if after_digit && c.is_ascii_alphabetic() {
            unified.push('.');
        }
        unified.push(match c {
            '_' | '~' | '-' => '.',
            c => c,
        });
        after_digit = c.is_ascii_digit();
    }

    unified
        .split('.')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            if segment.bytes().all(|b| b.is_ascii_digit()) {
                match segment.trim_start_matches('0') {
                    "" => "0".to_string(),
                    trimmed => trimmed.to_string(),
                }
            } else {
                segment.to_string()
            }
        })
        .collect()
}

/// A side running out of segments continues with implicit `0` segments
fn compare_segments(left: &[String], right: &[String]) -> Ordering {
    let len = left.len().max(right.len());
    for i in 0..len {
        let l = left.get(i).map_or("0", String::as_str);
        let r = right.get(i).map_or("0", String::as_str);
        let ordering = compare_segment(l, r);
        if ordering.is_ne() {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Walk both segments token by token
fn compare_segment(a: &str, b: &str) -> Ordering {
    let mut left = Tokens::new(a);
    let mut right = Tokens::new(b);
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (Some(_), None) => return Ordering::Greater,
            (None, Some(_)) => return Ordering::Less,
            (Some(l), Some(r)) => match compare_tokens(l, r) {
                Some(Ordering::Equal) => {}
                Some(ordering) => return ordering,
                // Punctuation against letters or digits: the segments are
                // considered equal rather than guessed at.
                None => return Ordering::Equal,
            },
        }
    }
}

fn compare_tokens(l: Token<'_>, r: Token<'_>) -> Option<Ordering> {
    match (l.kind, r.kind) {
        (TokenKind::Letters, TokenKind::Letters) => Some(
            l.text
                .bytes()
                .map(|b| b.to_ascii_lowercase())
                .cmp(r.text.bytes().map(|b| b.to_ascii_lowercase())),
        ),
        (TokenKind::Digits, TokenKind::Digits) => Some(compare_numeric(l.text, r.text)),
        (TokenKind::Other, TokenKind::Other) => Some(Ordering::Equal),
        (TokenKind::Letters, TokenKind::Digits) => Some(Ordering::Less),
        (TokenKind::Digits, TokenKind::Letters) => Some(Ordering::Greater),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProfileConfig;
    use rstest::rstest;

    fn profile(config: ProfileConfig) -> ComparisonProfile {
        ComparisonProfile::from_config(&config).unwrap()
    }

    #[rstest]
    #[case("", "", Ordering::Equal)]
    #[case("", "1.0", Ordering::Less)]
    #[case("1.0", "", Ordering::Greater)]
    #[case("current", "99.99.99", Ordering::Greater)]
    #[case("1.0", "current", Ordering::Less)]
    #[case("current", "current", Ordering::Equal)]
    #[case("", "current", Ordering::Less)]
    fn compare_boundary_values(#[case] a: &str, #[case] b: &str, #[case] expected: Ordering) {
        assert_eq!(
            compare_versions(a, b, &ComparisonProfile::default()),
            expected
        );
    }

    #[rstest]
    #[case("1.2.10", "1.2.9", Ordering::Greater)]
    #[case("1.2", "1.2.0", Ordering::Equal)]
    #[case("1.2", "1.2.1", Ordering::Less)]
    #[case("1.01", "1.1", Ordering::Equal)]
    #[case("2.0", "10.0", Ordering::Less)]
    #[case("20140410", "20140409", Ordering::Greater)]
    #[case("123456789012345678901234", "99", Ordering::Greater)]
    fn compare_numeric_versions(#[case] a: &str, #[case] b: &str, #[case] expected: Ordering) {
        assert_eq!(
            compare_versions(a, b, &ComparisonProfile::default()),
            expected
        );
    }

    #[rstest]
    #[case("1.0a", "1.0", Ordering::Less)]
    #[case("2.0rc1", "2.0", Ordering::Less)]
    #[case("2.0", "2.0.1", Ordering::Less)]
    #[case("2.0-rc2", "2.0-rc1", Ordering::Greater)]
    #[case("2.0-RC2", "2.0-rc2", Ordering::Equal)]
    #[case("1.0_beta1", "1.0-beta1", Ordering::Equal)]
    #[case("1.0~rc1", "1.0-rc1", Ordering::Equal)]
    #[case("1.0-alpha", "1.0-beta", Ordering::Less)]
    #[case("1.0-beta", "1.0-rc1", Ordering::Less)]
    #[case("1.0-rc1", "1.0", Ordering::Less)]
    #[case("2.0-rc1", "1.9", Ordering::Greater)]
    #[case("1.0+git", "1.0+svn", Ordering::Less)]
    #[case("1.0.rc12", "1.0.rc9", Ordering::Greater)]
    #[case("1.0.rc", "1.0.rc1", Ordering::Less)]
    fn compare_mixed_versions(#[case] a: &str, #[case] b: &str, #[case] expected: Ordering) {
        assert_eq!(
            compare_versions(a, b, &ComparisonProfile::default()),
            expected
        );
    }

    #[rstest]
    #[case("0.12-20140410", "0.12.1-20130101", Ordering::Less)]
    #[case("0.12-20140410", "0.12-20150101", Ordering::Less)]
    #[case("0.12-20140410", "0.12-20140410", Ordering::Equal)]
    fn compare_version_release_form(#[case] a: &str, #[case] b: &str, #[case] expected: Ordering) {
        assert_eq!(
            compare_versions(a, b, &ComparisonProfile::default()),
            expected
        );
    }

    #[test]
    fn compare_punctuation_against_letters_falls_back_to_equal() {
        let profile = ComparisonProfile::default();
        assert_eq!(compare_versions("1.0.+x", "1.0.y", &profile), Ordering::Equal);
        assert_eq!(compare_versions("!!!", "???", &profile), Ordering::Equal);
    }

    #[rstest]
    #[case("0.9.8k", "0.9.8", Ordering::Greater)]
    #[case("0.9.8", "0.9.8k", Ordering::Less)]
    #[case("0.9.8k", "0.9.8j", Ordering::Greater)]
    #[case("0.9.8k", "0.9.9", Ordering::Less)]
    #[case("1.0.2-beta", "1.0.2", Ordering::Less)]
    fn compare_with_letter_releases(#[case] a: &str, #[case] b: &str, #[case] expected: Ordering) {
        let profile = profile(ProfileConfig {
            letter_releases: true,
            ..ProfileConfig::default()
        });
        assert_eq!(compare_versions(a, b, &profile), expected);
    }

    #[test]
    fn compare_with_string_releases_is_lexicographic() {
        let profile = profile(ProfileConfig {
            string_releases: true,
            ..ProfileConfig::default()
        });

        assert_eq!(compare_versions("10", "9", &profile), Ordering::Less);
        assert_eq!(compare_versions("b", "a", &profile), Ordering::Greater);
        assert_eq!(compare_versions("1.0", "current", &profile), Ordering::Less);
    }

    #[test]
    fn compare_with_extend_version_pads_with_zeros() {
        let profile = profile(ProfileConfig {
            extend_version: Some(4),
            ..ProfileConfig::default()
        });

        assert_eq!(compare_versions("1.2", "1.10", &profile), Ordering::Greater);
        assert_eq!(
            compare_versions("1.2", "1.10", &ComparisonProfile::default()),
            Ordering::Less
        );
    }

    #[test]
    fn compare_is_antisymmetric_and_transitive() {
        let profile = ComparisonProfile::default();
        let samples = [
            "", "0.9", "1.0a", "1.0", "1.0.1", "1.2", "1.2.0", "1.2.9", "1.2.10", "2.0-alpha1",
            "2.0-beta1", "2.0-rc1", "2.0-rc2", "2.0", "2.0.1", "10.0", "current",
        ];

        for a in samples {
            for b in samples {
                assert_eq!(
                    compare_versions(a, b, &profile),
                    compare_versions(b, a, &profile).reverse(),
                    "antisymmetry of {a:?} and {b:?}"
                );
                for c in samples {
                    if compare_versions(a, b, &profile).is_le()
                        && compare_versions(b, c, &profile).is_le()
                    {
                        assert!(
                            compare_versions(a, c, &profile).is_le(),
                            "transitivity of {a:?} <= {b:?} <= {c:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn sort_versions_orders_oldest_first() {
        let mut versions: Vec<String> = ["2.0", "1.10", "current", "2.0-rc1", "1.9", "1.0a"]
            .into_iter()
            .map(String::from)
            .collect();

        sort_versions(&mut versions, &ComparisonProfile::default());

        assert_eq!(versions, ["1.0a", "1.9", "1.10", "2.0-rc1", "2.0", "current"]);
    }

    #[test]
    fn version_release_forms_compare_in_a_cycle() {
        let profile = ComparisonProfile::default();

        assert_eq!(compare_versions("1.0.2", "1.0-3", &profile), Ordering::Less);
        assert_eq!(compare_versions("1.0-3", "1.0.1-1", &profile), Ordering::Less);
        assert_eq!(compare_versions("1.0.1-1", "1.0.2", &profile), Ordering::Less);
    }

    #[test]
    fn sort_versions_survives_inconsistent_comparisons() {
        let profile = ComparisonProfile::default();
        let mut input: Vec<String> = Vec::new();
        for n in 0..15 {
            input.push(format!("1.{n}"));
            input.push(format!("1.+{n}"));
            input.push(format!("1.{}", char::from(b'a' + n as u8)));
            input.push(format!("1.{n}-{}", n % 4));
            input.push(format!("1.{n}.{}", n % 3));
        }
        input.extend(["1.0.2", "1.0-3", "1.0.1-1"].map(String::from));

        for seed in [1usize, 7, 31, 97] {
            // Deterministic shuffle: stride through the input with a step coprime to its length
            let len = input.len();
            let step = (0..).map(|k| seed + k).find(|s| gcd(*s, len) == 1).unwrap();
            let mut versions: Vec<String> =
                (0..len).map(|i| input[(i * step) % len].clone()).collect();

            sort_versions(&mut versions, &profile);

            let mut sorted = versions.clone();
            let mut expected = input.clone();
            sorted.sort();
            expected.sort();
            assert_eq!(sorted, expected, "seed {seed} lost or duplicated versions");
        }
    }

    fn gcd(a: usize, b: usize) -> usize {
        if b == 0 { a } else { gcd(b, a % b) }
    }

    #[test]
    fn max_version_returns_newest() {
        let profile = ComparisonProfile::default();
        assert_eq!(max_version(["1.2", "1.10", "1.9"], &profile), Some("1.10"));
        assert_eq!(max_version(Vec::<&str>::new(), &profile), None);
    }

    #[test]
    fn normalize_splits_letters_and_unifies_separators() {
        assert_eq!(normalize("1.2a"), vec!["1", "2", "a"]);
        assert_eq!(normalize("..1_02~rc-3"), vec!["1", "2", "rc", "3"]);
        assert_eq!(normalize("1.000.0rc01"), vec!["1", "0", "0", "rc01"]);
    }
}
