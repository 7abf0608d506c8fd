use super::*;
use crate::version::Version;
use chrono::Utc;

fn sample_release(tag: &str) -> Release {
    let version = Version::parse(tag, false).expect("valid version");
    Release::new(tag, version, Utc::now())
}

#[test]
fn cache_key_differs_when_filters_differ() {
    let base = Query {
        repo: "owner/name".to_string(),
        ..Query::default()
    };
    let with_pre = Query {
        pre_ok: true,
        ..base.clone()
    };
    assert_ne!(base.cache_key(), with_pre.cache_key());
}

#[test]
fn cache_key_is_stable_for_identical_queries() {
    let a = Query {
        repo: "owner/name".to_string(),
        major: Some("2".to_string()),
        ..Query::default()
    };
    let b = Query {
        repo: "owner/name".to_string(),
        major: Some("2".to_string()),
        ..Query::default()
    };
    assert_eq!(a.cache_key(), b.cache_key());
}

#[test]
fn latest_returns_cached_release_without_resolving() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cache = ReleaseCache::new(dir.path().to_path_buf(), 3600);
    let query = Query {
        repo: "owner/cached-project".to_string(),
        ..Query::default()
    };
    cache.set(&query.cache_key(), &sample_release("9.9.9"));

    let outcome = latest(&query, Some(&cache))
        .expect("cache hit must not error")
        .expect("cache hit must return Some");
    assert_eq!(outcome.release.tag_name, "9.9.9");
    assert_eq!(outcome.canonical_link, "owner/cached-project");
}

#[test]
fn is_newer_than_compares_versions() {
    let older = Version::parse("1.0.0", false).unwrap();
    let newer = Version::parse("1.1.0", false).unwrap();
    assert!(is_newer_than(&newer, &older));
    assert!(!is_newer_than(&older, &newer));
    assert!(!is_newer_than(&older, &older));
}

#[test]
fn build_release_cache_is_none_when_no_cache_flag_is_set() {
    let config = ConfigManager::load_or_default().expect("config must load");
    assert!(build_release_cache(&config, true).is_none());
}

#[test]
fn build_release_cache_is_none_when_disabled_by_default_config() {
    let config = ConfigManager::load_or_default().expect("config must load");
    // Release caching defaults to disabled absent a config file.
    if !config.release_cache_enabled() {
        assert!(build_release_cache(&config, false).is_none());
    }
}
