use super::*;

#[test]
fn new_appends_chart_yaml_when_missing() {
    let holder = HelmHolder::new("owner/mychart", None);
    assert_eq!(holder.repo, "owner/mychart/Chart.yaml");
}

#[test]
fn new_leaves_an_explicit_chart_yaml_path_untouched() {
    let holder = HelmHolder::new("owner/mychart/Chart.yaml", None);
    assert_eq!(holder.repo, "owner/mychart/Chart.yaml");
}

#[test]
fn new_trims_a_trailing_slash_before_appending() {
    let holder = HelmHolder::new("owner/mychart/", None);
    assert_eq!(holder.repo, "owner/mychart/Chart.yaml");
}

#[test]
fn name_is_the_chart_directory_not_the_file_name() {
    let holder = HelmHolder::new("owner/mychart", None);
    assert_eq!(holder.name(), "mychart");
}

#[test]
fn chart_url_uses_raw_githubusercontent_for_the_default_host() {
    let holder = HelmHolder::new("owner/mychart", None);
    assert_eq!(
        holder.chart_url(),
        "https://raw.githubusercontent.com/owner/mychart/Chart.yaml"
    );
}

#[test]
fn chart_url_strips_a_blob_segment_for_github_web_urls() {
    let holder = HelmHolder::new("owner/mychart/blob/main/Chart.yaml", None);
    assert_eq!(
        holder.chart_url(),
        "https://raw.githubusercontent.com/owner/mychart/main/Chart.yaml"
    );
}

#[test]
fn chart_url_uses_the_host_directly_for_non_github_hostnames() {
    let holder = HelmHolder::new("owner/mychart", Some("git.example.com"));
    assert_eq!(
        holder.chart_url(),
        "https://git.example.com/owner/mychart/Chart.yaml"
    );
}

#[test]
fn hostname_is_none_when_not_provided() {
    let holder = HelmHolder::new("owner/mychart", None);
    assert!(holder.hostname().is_none());
}
