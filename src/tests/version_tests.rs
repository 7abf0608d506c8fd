use super::*;

#[test]
fn parses_plain_semver() {
    let v = Version::parse("1.2.3", false).expect("must parse");
    assert_eq!(v.major(), 1);
    assert_eq!(v.minor(), 2);
    assert_eq!(v.micro(), 3);
    assert_eq!(v.to_string(), "1.2.3");
}

#[test]
fn parses_leading_v_prefix() {
    let v = Version::parse("v2.41.0", false).expect("must parse");
    assert_eq!(v.to_string(), "2.41.0");
}

#[test]
fn parses_release_candidate_suffix() {
    let v = Version::parse("2.41.0-rc2", false).expect("must parse");
    assert_eq!(v.pre(), Some((PreLabel::Rc, 2)));
    assert!(v.is_prerelease());
}

#[test]
fn parses_dev_release() {
    let v = Version::parse("1.0.0.dev3", false).expect("must parse");
    assert_eq!(v.dev(), Some(3));
    assert!(v.is_prerelease());
}

#[test]
fn rejects_empty_string() {
    assert!(Version::parse("", false).is_err());
}

#[test]
fn rejects_non_numeric_garbage() {
    assert!(Version::parse("not-a-version-at-all", false).is_err());
}

#[test]
fn ordering_treats_prerelease_as_lower_than_final() {
    let pre = Version::parse("1.0.0-rc1", false).unwrap();
    let final_release = Version::parse("1.0.0", false).unwrap();
    assert!(pre < final_release);
}

#[test]
fn ordering_compares_release_segments_numerically_not_lexically() {
    let v9 = Version::parse("1.9.0", false).unwrap();
    let v10 = Version::parse("1.10.0", false).unwrap();
    assert!(v9 < v10);
}

#[test]
fn ordering_treats_dev_release_as_lower_than_prerelease() {
    let dev = Version::parse("1.0.0.dev1", false).unwrap();
    let pre = Version::parse("1.0.0-rc1", false).unwrap();
    assert!(dev < pre);
}

#[test]
fn trailing_zero_release_segments_compare_equal() {
    let a = Version::parse("1.2.0", false).unwrap();
    let b = Version::parse("1.2", false).unwrap();
    assert_eq!(a, b);
}

#[test]
fn update_style_version_is_normalized_to_semver_like() {
    // "8u462-b08" is the Java "update" versioning style.
    let v = Version::parse("8u462-b08", false).expect("must parse java update style");
    assert_eq!(v.major(), 8);
    assert_eq!(v.minor(), 462);
}

#[test]
fn char_fix_turns_trailing_letter_into_post_release() {
    // A trailing release letter ("3.0a") becomes a numeric `.post` segment
    // built from the letter's ascii code, so it still compares above the
    // plain release it's a sub-release of.
    let fixed = Version::parse("3.0a", true).expect("char-fix must parse");
    let plain = Version::parse("3.0", true).expect("must parse");
    assert!(fixed > plain);
}

#[test]
fn sem_extract_base_truncates_to_major() {
    let v = Version::parse("3.7.2", false).unwrap();
    assert_eq!(v.sem_extract_base(SemLevel::Major).to_string(), "3");
}

#[test]
fn sem_extract_base_truncates_to_minor() {
    let v = Version::parse("3.7.2", false).unwrap();
    assert_eq!(v.sem_extract_base(SemLevel::Minor).to_string(), "3.7");
}

#[test]
fn sem_extract_base_truncates_to_patch() {
    let v = Version::parse("3.7.2.dev1", false).unwrap();
    assert_eq!(v.sem_extract_base(SemLevel::Patch).to_string(), "3.7.2");
}

#[test]
fn even_minor_is_considered_stable_track() {
    let even = Version::parse("1.2.0", false).unwrap();
    let odd = Version::parse("1.3.0", false).unwrap();
    assert!(even.even());
    assert!(!odd.even());
}

#[test]
fn high_micro_is_prerelease_unless_date_like() {
    let high_micro = Version::parse("2.4.95", false).unwrap();
    assert!(high_micro.is_prerelease());

    let date_like = Version::parse("2.4.20230615", false).unwrap();
    assert!(!date_like.is_prerelease());
}

#[test]
fn is_semver_requires_at_least_two_release_segments() {
    let single = Version::parse("5", false).unwrap();
    let double = Version::parse("5.9", false).unwrap();
    assert!(!single.is_semver());
    assert!(double.is_semver());
}

#[test]
fn epoch_prefix_is_parsed_and_rendered() {
    let v = Version::parse("1!2.0", false).expect("epoch must parse");
    assert_eq!(v.epoch(), 1);
    assert_eq!(v.to_string(), "1!2.0");
}

#[test]
fn post_release_suffix_is_recognized() {
    let v = Version::parse("1.0.post2", false).expect("post release must parse");
    assert_eq!(v.post(), Some(2));
}

#[test]
fn local_version_segment_is_preserved() {
    let v = Version::parse("1.0.0+build.5", false).expect("local segment must parse");
    assert_eq!(v.local(), Some("build.5"));
}
