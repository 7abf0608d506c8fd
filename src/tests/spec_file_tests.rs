use super::*;

const FORMAL_SPEC: &str = "\
Name: mytool
Version: 1.2.3
Release: 1%{?dist}
URL: https://github.com/someorg/mytool
Source0: https://github.com/someorg/mytool/archive/v1.2.3.tar.gz
%global lastversion_repo someorg/mytool
%global lastversion_major 1
";

const COMMIT_SPEC: &str = "\
Name: mytool
Version: 0
Release: 0.20230101git%{commit}%{?dist}
URL: https://github.com/someorg/mytool
%global upstream_github https://github.com
%global upstream_name mytool
%global commit abc1234
%global commit_date 20230101
";

fn write_temp_spec(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("mytool.spec");
    fs::write(&path, content).expect("write spec fixture");
    (dir, path)
}

#[test]
fn parse_spec_reads_formal_release_fields() {
    let (_dir, path) = write_temp_spec(FORMAL_SPEC);
    let data = parse_spec(&path).expect("formal spec must parse");

    assert_eq!(data.name, "mytool");
    assert_eq!(data.repo, "someorg/mytool");
    assert_eq!(data.major.as_deref(), Some("1"));
    assert!(!data.commit_based);
    assert_eq!(data.current_version.as_ref().map(|v| v.to_string()), Some("1.2.3".to_string()));
}

#[test]
fn parse_spec_falls_back_to_url_when_no_lastversion_repo_macro() {
    let content = "\
Name: othertool
Version: 2.0.0
URL: https://github.com/anotherorg/othertool
";
    let (_dir, path) = write_temp_spec(content);
    let data = parse_spec(&path).expect("spec must parse");
    assert_eq!(data.repo, "https://github.com/anotherorg/othertool");
}

#[test]
fn parse_spec_detects_commit_based_snapshot() {
    let (_dir, path) = write_temp_spec(COMMIT_SPEC);
    let data = parse_spec(&path).expect("commit-based spec must parse");

    assert!(data.commit_based);
    assert_eq!(data.current_commit.as_deref(), Some("abc1234"));
    assert_eq!(data.spec_name_macro, "%{upstream_name}");
    assert_eq!(data.repo, "https://github.com/mytool");
}

#[test]
fn parse_spec_errors_when_name_and_version_are_both_missing() {
    let (_dir, path) = write_temp_spec("URL: https://github.com/someorg/mytool\n");
    let err = parse_spec(&path).expect_err("missing Version: must error");
    assert!(matches!(err, LastVersionError::Other(_)));
}

#[test]
fn update_spec_rewrites_version_when_newer() {
    let (_dir, path) = write_temp_spec(FORMAL_SPEC);
    let data = parse_spec(&path).expect("parse fixture");
    let new_version = Version::parse("1.3.0", false).expect("valid version");

    let changed = update_spec(&path, &data, &new_version, "v1.3.0").expect("update must succeed");
    assert!(changed);

    let rewritten = fs::read_to_string(&path).expect("read rewritten spec");
    assert!(rewritten.contains("Version: 1.3.0"));
}

#[test]
fn update_spec_is_a_no_op_when_not_newer() {
    let (_dir, path) = write_temp_spec(FORMAL_SPEC);
    let data = parse_spec(&path).expect("parse fixture");
    let same_version = Version::parse("1.2.3", false).expect("valid version");

    let changed = update_spec(&path, &data, &same_version, "v1.2.3").expect("update must succeed");
    assert!(!changed);

    let untouched = fs::read_to_string(&path).expect("read spec");
    assert_eq!(untouched, FORMAL_SPEC);
}

#[test]
fn update_spec_commit_rewrites_commit_and_date() {
    let (_dir, path) = write_temp_spec(COMMIT_SPEC);
    let data = parse_spec(&path).expect("parse fixture");

    let changed = update_spec_commit(&path, &data, "def5678", "20230615").expect("update must succeed");
    assert!(changed);

    let rewritten = fs::read_to_string(&path).expect("read rewritten spec");
    assert!(rewritten.contains("%global commit def5678"));
    assert!(rewritten.contains("%global commit_date 20230615"));
}

#[test]
fn update_spec_commit_is_a_no_op_when_commit_unchanged() {
    let (_dir, path) = write_temp_spec(COMMIT_SPEC);
    let data = parse_spec(&path).expect("parse fixture");

    let changed = update_spec_commit(&path, &data, "abc1234", "20230101").expect("update must succeed");
    assert!(!changed);
}

#[test]
fn update_spec_commit_inserts_missing_globals() {
    let content = "\
Name: mytool
Version: 0
Release: 0.%{snapinfo}%{?dist}
%global upstream_github https://github.com
%global upstream_name mytool
";
    let (_dir, path) = write_temp_spec(content);
    let mut data = parse_spec(&path).expect("parse fixture");
    data.commit_based = true;

    let changed = update_spec_commit(&path, &data, "aaa1111", "20240101").expect("update must succeed");
    assert!(changed);

    let rewritten = fs::read_to_string(&path).expect("read rewritten spec");
    assert!(rewritten.contains("%global commit aaa1111"));
    assert!(rewritten.contains("%global commit_date 20240101"));
}
