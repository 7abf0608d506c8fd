use super::*;

#[test]
fn name_is_the_raw_package_name() {
    let holder = SystemHolder::new("nginx", None);
    assert_eq!(holder.name(), "nginx");
}

#[test]
fn hostname_is_always_none() {
    let holder = SystemHolder::new("nginx", None);
    assert!(holder.hostname().is_none());
}

#[test]
fn set_filters_replaces_the_stored_filters() {
    let mut holder = SystemHolder::new("nginx", None);
    let filters = HolderFilters {
        major: Some("1".to_string()),
        ..HolderFilters::default()
    };
    holder.set_filters(filters);
    assert_eq!(holder.filters().major.as_deref(), Some("1"));
}

#[test]
fn via_dnf_and_via_apt_return_none_when_neither_manager_is_on_path_or_matches() {
    // The repo name is deliberately implausible so a real apt/dnf on the
    // test host still reports it as unavailable rather than matching.
    let holder = SystemHolder::new("definitely-not-a-real-package-xyz123", None);
    assert!(holder.via_dnf().is_none());
    assert!(holder.via_apt().is_none());
}
