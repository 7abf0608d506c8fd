use super::*;

#[test]
fn matches_filter_with_no_filter_always_matches() {
    assert!(matches_filter(None, true, "anything"));
}

#[test]
fn matches_filter_plain_substring() {
    assert!(matches_filter(Some("linux"), true, "app-linux-amd64"));
    assert!(!matches_filter(Some("linux"), true, "app-windows-amd64"));
}

#[test]
fn matches_filter_negation_prefix_inverts_polarity() {
    assert!(matches_filter(Some("!linux"), true, "app-windows-amd64"));
    assert!(!matches_filter(Some("!linux"), true, "app-linux-amd64"));
}

#[test]
fn matches_filter_regex_prefix() {
    assert!(matches_filter(Some("~^app-\\d+$"), true, "app-123"));
    assert!(!matches_filter(Some("~^app-\\d+$"), true, "app-abc"));
}

#[test]
fn matches_filter_exclude_semantics_use_positive_false() {
    // exclude filters are checked with positive=false: match => excluded => false.
    assert!(!matches_filter(Some("beta"), false, "1.0.0-beta"));
    assert!(matches_filter(Some("beta"), false, "1.0.0"));
}

#[test]
fn matches_major_filter_accepts_dotted_prefix_or_exact() {
    let v = Version::parse("2.4.1", false).unwrap();
    let branches = HashMap::new();
    assert!(matches_major_filter(&v, "2", &branches));
    assert!(!matches_major_filter(&v, "3", &branches));

    let exact = Version::parse("2", false).unwrap();
    assert!(matches_major_filter(&exact, "2", &branches));
}

#[test]
fn matches_major_filter_honors_branch_regex_override() {
    let v = Version::parse("9.0.1", false).unwrap();
    let mut branches = HashMap::new();
    branches.insert("lts".to_string(), r"^9\.".to_string());
    assert!(matches_major_filter(&v, "lts", &branches));
}

#[test]
fn remove_prefix_strips_name_dash_or_underscore() {
    assert_eq!(remove_prefix("myapp", "myapp-1.2.3"), "1.2.3");
    assert_eq!(remove_prefix("myapp", "myapp_1.2.3"), "1.2.3");
    assert_eq!(remove_prefix("myapp", "v1.2.3"), "v1.2.3");
}

#[test]
fn sanitize_version_parses_plain_tag() {
    let filters = HolderFilters::default();
    let v = sanitize_version("myapp", &filters, "v1.2.3", false).expect("must parse");
    assert_eq!(v.to_string(), "1.2.3");
}

#[test]
fn sanitize_version_rejects_prerelease_unless_pre_ok() {
    let filters = HolderFilters::default();
    assert!(sanitize_version("myapp", &filters, "v1.2.3-rc1", false).is_none());

    let pre_ok = HolderFilters {
        pre_ok: true,
        ..HolderFilters::default()
    };
    assert!(sanitize_version("myapp", &pre_ok, "v1.2.3-rc1", false).is_some());
}

#[test]
fn sanitize_version_applies_only_and_exclude_filters() {
    let only_linux = HolderFilters {
        only: Some("linux".to_string()),
        ..HolderFilters::default()
    };
    assert!(sanitize_version("myapp", &only_linux, "v1.2.3", false).is_none());
    assert!(sanitize_version("myapp", &only_linux, "linux-v1.2.3", false).is_some());

    let exclude_beta = HolderFilters {
        exclude: Some("beta".to_string()),
        ..HolderFilters::default()
    };
    assert!(sanitize_version("myapp", &exclude_beta, "v1.2.3-beta", false).is_none());
}

#[test]
fn sanitize_version_applies_major_filter() {
    let filters = HolderFilters {
        major: Some("2".to_string()),
        ..HolderFilters::default()
    };
    assert!(sanitize_version("myapp", &filters, "v1.9.0", false).is_none());
    assert!(sanitize_version("myapp", &filters, "v2.1.0", false).is_some());
}

#[test]
fn sanitize_version_applies_even_filter() {
    let filters = HolderFilters {
        even: true,
        ..HolderFilters::default()
    };
    assert!(sanitize_version("myapp", &filters, "v1.3.0", false).is_none());
    assert!(sanitize_version("myapp", &filters, "v1.2.0", false).is_some());
}

#[test]
fn sanitize_version_falls_back_to_embedded_version_search() {
    let filters = HolderFilters::default();
    let v = sanitize_version("myapp", &filters, "release_20230615", false);
    assert!(v.is_some());
}

struct StubHolder {
    filters: HolderFilters,
}

impl Holder for StubHolder {
    fn name(&self) -> &str {
        "stub"
    }

    fn hostname(&self) -> Option<&str> {
        None
    }

    fn filters(&self) -> &HolderFilters {
        &self.filters
    }

    fn set_filters(&mut self, filters: HolderFilters) {
        self.filters = filters;
    }

    fn get_latest(&self) -> crate::error::Result<Option<Release>> {
        Ok(None)
    }
}

fn sample_release_with_assets(names: &[&str]) -> Release {
    let version = Version::parse("1.0.0", false).unwrap();
    let mut release = Release::new("1.0.0", version, chrono::Utc::now());
    for name in names {
        release.assets.push(crate::release::Asset {
            name: name.to_string(),
            download_url: format!("https://example.com/{name}"),
            size: None,
            label: None,
            digest: None,
        });
    }
    release
}

#[test]
fn get_assets_falls_back_to_source_url_when_no_assets() {
    let holder = StubHolder {
        filters: HolderFilters::default(),
    };
    let release = sample_release_with_assets(&[]);
    assert!(holder.get_assets(&release, false, None).is_empty());
}

#[test]
fn get_assets_applies_explicit_filter_regex() {
    let holder = StubHolder {
        filters: HolderFilters::default(),
    };
    let release = sample_release_with_assets(&["app.deb", "app.rpm"]);
    let filter = Regex::new(r"\.deb$").unwrap();
    let urls = holder.get_assets(&release, false, Some(&filter));
    assert_eq!(urls, vec!["https://example.com/app.deb".to_string()]);
}

#[cfg(all(target_os = "linux", target_arch = "x86_64"))]
#[test]
fn get_assets_filters_out_incompatible_platform_assets_by_default() {
    let holder = StubHolder {
        filters: HolderFilters::default(),
    };
    let release = sample_release_with_assets(&["app-windows.exe", "app-linux-amd64.tar.gz"]);
    let urls = holder.get_assets(&release, false, None);
    assert!(urls.iter().any(|u| u.contains("app-linux-amd64.tar.gz")));
    assert!(!urls.iter().any(|u| u.contains("app-windows.exe")));
}

#[test]
fn get_canonical_link_falls_back_to_name_without_hostname() {
    let holder = StubHolder {
        filters: HolderFilters::default(),
    };
    assert_eq!(holder.get_canonical_link(), "stub");
}
