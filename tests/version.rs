use std::cmp::Ordering;

use rstest::rstest;
use serde_json::json;

use release_monitor::config::ProfileConfig;
use release_monitor::version::classifier::{canonical_versions, classify, skip_version};
use release_monitor::version::comparator::{compare_versions, sort_versions};
use release_monitor::version::profile::ComparisonProfile;
use release_monitor::version::sequence::build_natural_sequence;
use release_monitor::version::types::ReleaseType;

fn profile_from(value: serde_json::Value) -> ComparisonProfile {
    let config: ProfileConfig = serde_json::from_value(value).unwrap();
    ComparisonProfile::from_config(&config).unwrap()
}

#[rstest]
#[case("1.2.3", ReleaseType::Release)]
#[case("2.0-rc1", ReleaseType::ReleaseCandidate)]
#[case("1.0-beta2", ReleaseType::Beta)]
#[case("1.0-foobar", ReleaseType::Unknown)]
fn classify_with_default_profile(#[case] version: &str, #[case] expected: ReleaseType) {
    assert_eq!(classify(version, &ComparisonProfile::default()), expected);
}

#[rstest]
#[case("", "", Ordering::Equal)]
#[case("", "1.0", Ordering::Less)]
#[case("current", "99.99.99", Ordering::Greater)]
#[case("1.0", "current", Ordering::Less)]
#[case("1.2.10", "1.2.9", Ordering::Greater)]
#[case("1.2", "1.2.0", Ordering::Equal)]
#[case("1.2", "1.2.1", Ordering::Less)]
#[case("1.0a", "1.0", Ordering::Less)]
#[case("2.0rc1", "2.0", Ordering::Less)]
#[case("2.0", "2.0.1", Ordering::Less)]
fn compare_with_default_profile(#[case] a: &str, #[case] b: &str, #[case] expected: Ordering) {
    let profile = ComparisonProfile::default();
    assert_eq!(compare_versions(a, b, &profile), expected);
    assert_eq!(compare_versions(b, a, &profile), expected.reverse());
}

#[test]
fn natural_sequence_keeps_latest_pre_release_and_current() {
    let sequence = build_natural_sequence(
        ["1.0", "1.1", "2.0-rc1", "2.0-rc2", "current"],
        &ComparisonProfile::default(),
    );

    assert_eq!(sequence, vec!["1.0", "1.1", "2.0-rc2", "current"]);
}

#[test]
fn natural_sequence_suppresses_stale_pre_release() {
    let sequence = build_natural_sequence(
        ["1.0", "1.1", "0.9-beta1"],
        &ComparisonProfile::default(),
    );

    assert_eq!(sequence, vec!["1.0", "1.1"]);
}

#[test]
fn skip_odd_profile_filters_odd_minor_versions() {
    let profile = profile_from(json!({ "SkipOdd": 1 }));

    let kept: Vec<&str> = ["1.2.0", "1.3.0", "1.4.0"]
        .into_iter()
        .filter(|v| !skip_version(v, &profile))
        .collect();

    assert_eq!(kept, vec!["1.2.0", "1.4.0"]);
}

#[test]
fn openssl_style_profile_orders_letter_releases() {
    let profile = profile_from(json!({
        "Name": "openssl",
        "LetterReleases": 1,
        "SkipVersions": "0.9.8a",
        "MinimalVersion": "0.9.8"
    }));

    let discovered = [
        "0.9.7m", "0.9.8", "0.9.8a", "0.9.8b", "0.9.8za", "1.0.0", "1.0.0-beta3", "1.0.0a",
        "1.0.1-beta1",
    ];
    let sequence = build_natural_sequence(discovered, &profile);

    assert_eq!(
        sequence,
        vec!["0.9.8", "0.9.8b", "0.9.8za", "1.0.0", "1.0.0a", "1.0.1-beta1"]
    );
}

#[test]
fn sort_is_stable_across_mixed_conventions() {
    let mut versions: Vec<String> = [
        "1.0", "0.12-20140410", "1.0-rc1", "current", "0.12-20130101", "1.0.1", "1.0_beta2",
    ]
    .into_iter()
    .map(String::from)
    .collect();

    sort_versions(&mut versions, &ComparisonProfile::default());

    assert_eq!(
        versions,
        vec![
            "0.12-20130101",
            "0.12-20140410",
            "1.0_beta2",
            "1.0-rc1",
            "1.0",
            "1.0.1",
            "current"
        ]
    );
}

#[test]
fn sequence_of_canonical_versions_matches_stored_keys() {
    let profile = profile_from(json!({
        "ReleasePattern": r"\Astable-(\d+\.\d+)\z",
    }));
    let discovered: Vec<String> = ["stable-1.10", "stable-1.4", "1.11-rc1"]
        .into_iter()
        .map(String::from)
        .collect();

    let versions = canonical_versions(&discovered, &profile);

    assert_eq!(
        build_natural_sequence(versions.iter().map(String::as_str), &profile),
        vec!["1.4", "1.10", "1.11-rc1"]
    );
}
