use super::*;

fn holder_with_dir(repo: &str, dir: &std::path::Path) -> LocalHolder {
    LocalHolder {
        version_dir: dir.to_string_lossy().to_string(),
        ..LocalHolder::new(repo, None)
    }
}

#[test]
fn get_latest_is_none_when_the_version_file_is_missing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let holder = holder_with_dir("myapp", dir.path());
    assert!(holder.get_latest().expect("must not error").is_none());
}

#[test]
fn get_latest_reads_the_stable_branch_file_by_default() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("myapp-stable.ver"), "2.4.1\n").expect("write fixture");
    let holder = holder_with_dir("myapp", dir.path());
    let release = holder.get_latest().expect("must not error").expect("must find a release");
    assert_eq!(release.version_str, "2.4.1");
}

#[test]
fn get_latest_reads_the_major_filtered_branch_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("myapp-mainline.ver"), "3.0.0\n").expect("write fixture");
    let holder = LocalHolder {
        filters: HolderFilters {
            major: Some("mainline".to_string()),
            ..HolderFilters::default()
        },
        ..holder_with_dir("myapp", dir.path())
    };
    let release = holder.get_latest().expect("must not error").expect("must find a release");
    assert_eq!(release.version_str, "3.0.0");
}

#[test]
fn get_latest_is_none_when_the_file_contents_do_not_parse_as_a_version() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("myapp-stable.ver"), "not-a-version-at-all").expect("write fixture");
    let holder = holder_with_dir("myapp", dir.path());
    assert!(holder.get_latest().expect("must not error").is_none());
}

#[test]
fn name_and_hostname() {
    let holder = LocalHolder::new("myapp", None);
    assert_eq!(holder.name(), "myapp");
    assert!(holder.hostname().is_none());
}
