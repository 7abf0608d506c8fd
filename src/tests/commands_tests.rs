use super::*;
use crate::cli::{Action, OutputFormat, SemChoice};
use crate::release::{Asset, Release};
use crate::version::Version;
use chrono::Utc;
use clap::Parser;

#[test]
fn sem_level_maps_each_choice() {
    assert!(matches!(sem_level(Some(SemChoice::Major)), Some(SemLevel::Major)));
    assert!(matches!(sem_level(Some(SemChoice::Minor)), Some(SemLevel::Minor)));
    assert!(matches!(sem_level(Some(SemChoice::Patch)), Some(SemLevel::Patch)));
    assert!(sem_level(Some(SemChoice::Any)).is_none());
    assert!(sem_level(None).is_none());
}

fn base_cli() -> Cli {
    Cli::try_parse_from(["lastversion", "get", "owner/name"]).expect("must parse")
}

#[test]
fn effective_format_honors_assets_shortcut_over_everything() {
    let mut cli = base_cli();
    cli.assets = true;
    cli.format = Some(OutputFormat::Json);
    assert_eq!(effective_format(&cli), OutputFormat::Assets);
}

#[test]
fn effective_format_honors_source_shortcut() {
    let mut cli = base_cli();
    cli.source = true;
    assert_eq!(effective_format(&cli), OutputFormat::Source);
}

#[test]
fn effective_format_uses_explicit_format_when_set() {
    let mut cli = base_cli();
    cli.format = Some(OutputFormat::Tag);
    assert_eq!(effective_format(&cli), OutputFormat::Tag);
}

#[test]
fn effective_format_defaults_by_action() {
    let mut cli = base_cli();
    cli.action = Action::Download;
    assert_eq!(effective_format(&cli), OutputFormat::Source);

    cli.action = Action::Install;
    assert_eq!(effective_format(&cli), OutputFormat::Json);

    cli.action = Action::Get;
    assert_eq!(effective_format(&cli), OutputFormat::Version);
}

#[test]
fn assets_filter_regex_parses_valid_pattern() {
    let mut cli = base_cli();
    cli.filter = Some(r"\.tar\.gz$".to_string());
    assert!(assets_filter_regex(&cli).is_some());
}

#[test]
fn assets_filter_regex_is_none_when_absent() {
    let cli = base_cli();
    assert!(assets_filter_regex(&cli).is_none());
}

fn sample_release(assets: Vec<Asset>, source_url: Option<&str>) -> (Release, Option<String>) {
    let version = Version::parse("1.0.0", false).expect("valid version");
    let mut release = Release::new("v1.0.0", version, Utc::now());
    release.assets = assets;
    (release, source_url.map(str::to_string))
}

#[test]
fn asset_urls_falls_back_to_source_url_when_no_assets() {
    let (release, source_url) = sample_release(vec![], Some("https://example.com/src.tar.gz"));
    let urls = asset_urls(&release, source_url.as_deref(), None);
    assert_eq!(urls, vec!["https://example.com/src.tar.gz".to_string()]);
}

#[test]
fn asset_urls_applies_explicit_filter_regex() {
    let assets = vec![
        Asset { name: "tool-linux-amd64.tar.gz".to_string(), download_url: "u1".to_string(), size: None, label: None, digest: None },
        Asset { name: "tool-windows-amd64.zip".to_string(), download_url: "u2".to_string(), size: None, label: None, digest: None },
    ];
    let (release, _) = sample_release(assets, None);
    let filter = Regex::new("linux").unwrap();
    let urls = asset_urls(&release, None, Some(&filter));
    assert_eq!(urls, vec!["u1".to_string()]);
}

#[test]
fn asset_urls_returns_empty_when_no_assets_and_no_source() {
    let (release, _) = sample_release(vec![], None);
    let urls = asset_urls(&release, None, None);
    assert!(urls.is_empty());
}
