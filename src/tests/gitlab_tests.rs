use super::*;
use crate::version::Version;

#[test]
fn hostname_defaults_to_gitlab_dot_com() {
    let holder = GitLabHolder::new("owner/name", None);
    assert_eq!(holder.hostname(), Some("gitlab.com"));
}

#[test]
fn hostname_can_be_overridden_for_self_hosted_instances() {
    let holder = GitLabHolder::new("owner/name", Some("gitlab.example.com"));
    assert_eq!(holder.hostname(), Some("gitlab.example.com"));
}

#[test]
fn api_base_uses_v4_under_the_configured_host() {
    let holder = GitLabHolder::new("owner/name", Some("gitlab.example.com"));
    assert_eq!(holder.api_base(), "https://gitlab.example.com/api/v4");
}

#[test]
fn encoded_repo_percent_encodes_the_path_separator() {
    let holder = GitLabHolder::new("owner/name", None);
    assert_eq!(holder.encoded_repo(), "owner%2Fname");
}

#[test]
fn name_returns_only_the_last_path_segment() {
    let holder = GitLabHolder::new("group/subgroup/name", None);
    assert_eq!(holder.name(), "name");
}

#[test]
fn release_download_url_uses_the_short_name_twice() {
    let holder = GitLabHolder::new("group/name", None);
    let version = Version::parse("1.0.0", false).unwrap();
    let release = Release::new("v1.0.0", version, Utc::now());
    let url = holder.release_download_url(&release, false).expect("must build url");
    assert!(url.contains("/-/archive/v1.0.0/name-v1.0.0."));
}
