//! GitHub release-selection state machine: an Atom feed pass, a formal
//! `/releases` pass, and (for repos where neither is conclusive) a deep
//! tag search — the GraphQL tags API when a token is present, the
//! paginated REST `/tags` endpoint otherwise.

use super::{sanitize_version, Holder, HolderFilters};
use crate::error::{LastVersionError, Result};
use crate::http::HttpSession;
use crate::release::{Asset, Release};
use crate::version::Version;
use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;

/// Repos with a trailing version-like letter that is part of the version,
/// not a beta/rc marker (e.g. OpenSSL's `1.1.1b`).
const LAST_CHAR_FIX_REQUIRED_ON: &[&str] = &["openssl/openssl"];

/// Known repos whose canonical release source is elsewhere (mirrors
/// `KNOWN_REPOS_BY_NAME`/`KNOWN_REPO_URLS` in the original).
fn known_repo(name: &str) -> Option<&'static str> {
    match name {
        "php" => Some("php/php-src"),
        "linux" => Some("torvalds/linux"),
        "cmake" => Some("Kitware/CMake"),
        "kodi" => Some("xbmc/xbmc"),
        "quictls" => Some("quictls/openssl"),
        "nginx" => Some("nginx/nginx"),
        "freenginx" => Some("freenginx/freenginx"),
        _ => None,
    }
}

const FEED_BREAK_DAYS: i64 = 30;
const RECENCY_WINDOW_DAYS: i64 = 365;

#[derive(Debug, Deserialize)]
struct GhReleaseAsset {
    name: String,
    browser_download_url: String,
    size: Option<u64>,
    label: Option<String>,
    digest: Option<String>,
}

fn asset_field_matches(value: &str, wanted: &str) -> bool {
    if let Some(pattern) = wanted.strip_prefix('~') {
        Regex::new(pattern).map(|re| re.is_match(value)).unwrap_or(false)
    } else {
        value == wanted
    }
}

/// `set_matching_formal_release`'s asset acceptance rule: the wanted string
/// must equal (or, prefixed with `~`, match as a regex) an asset's `name`
/// or `label`.
fn asset_matches_having(assets: &[GhReleaseAsset], wanted: &str) -> bool {
    assets.iter().any(|a| {
        asset_field_matches(&a.name, wanted)
            || a.label.as_deref().map(|l| asset_field_matches(l, wanted)).unwrap_or(false)
    })
}

/// Once any candidate has parsed as semver, later non-semver candidates are
/// discarded outright; among comparable candidates (both semver or both
/// not), a candidate no better than the current best is also discarded.
fn semver_check_skip(seen_semver: &mut bool, version: &Version, best: Option<&Version>) -> bool {
    if version.is_semver() {
        *seen_semver = true;
    }
    let comparable = best.map(|b| b.is_semver() == version.is_semver()).unwrap_or(true);
    if comparable {
        if let Some(best) = best {
            if best > version {
                return true;
            }
        }
    }
    *seen_semver && !version.is_semver()
}

#[derive(Debug, Deserialize)]
struct GhRelease {
    tag_name: String,
    draft: bool,
    prerelease: bool,
    published_at: Option<DateTime<Utc>>,
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    assets: Vec<GhReleaseAsset>,
}

#[derive(Debug, Deserialize)]
struct GhTag {
    name: String,
    commit: GhTagCommit,
}

#[derive(Debug, Deserialize)]
struct GhTagCommit {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct GhCommit {
    commit: GhCommitDetail,
}

#[derive(Debug, Deserialize)]
struct GhCommitDetail {
    committer: GhCommitter,
}

#[derive(Debug, Deserialize)]
struct GhCommitter {
    date: DateTime<Utc>,
}

pub struct GitHubHolder {
    pub repo: String,
    pub hostname: String,
    pub filters: HolderFilters,
    http: HttpSession,
    token: Option<String>,
}

impl GitHubHolder {
    pub fn new(repo: &str, hostname: Option<&str>) -> Self {
        let repo = known_repo(repo).map(str::to_string).unwrap_or_else(|| repo.to_string());
        let hostname = hostname.unwrap_or("github.com").to_string();
        let token = std::env::var("LASTVERSION_GITHUB_API_TOKEN")
            .or_else(|_| std::env::var("GITHUB_API_TOKEN"))
            .or_else(|_| std::env::var("GITHUB_TOKEN"))
            .ok();
        GitHubHolder {
            repo,
            hostname,
            filters: HolderFilters::default(),
            http: HttpSession::new("lastversion", dirs::cache_dir().map(|d| d.join("lastversion"))),
            token,
        }
    }

    fn api_base(&self) -> String {
        if self.hostname == "github.com" {
            "https://api.github.com".to_string()
        } else {
            format!("https://{}/api/v3", self.hostname)
        }
    }

    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("token {t}"))
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        match self.http.get_with_auth(url, self.auth_header().as_deref()) {
            Ok(body) => Ok(serde_json::from_str(&body).ok()),
            Err(LastVersionError::Transient(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn char_fix_required(&self) -> bool {
        LAST_CHAR_FIX_REQUIRED_ON.contains(&self.repo.as_str())
    }

    fn sanitize(&self, tag: &str) -> Option<Version> {
        sanitize_version(self.name(), &self.filters, tag, self.char_fix_required())
    }

    /// Pass 1: the Atom releases feed. Stops scanning once entries are more
    /// than [`FEED_BREAK_DAYS`] older than the current best match.
    fn feed_pass(&self) -> Option<(String, Version, DateTime<Utc>)> {
        let url = format!("https://{}/{}/releases.atom", self.hostname, self.repo);
        let body = self.http.get(&url).ok()?;
        let feed = feed_rs::parser::parse(body.as_bytes()).ok()?;

        let mut best: Option<(String, Version, DateTime<Utc>)> = None;
        let mut seen_semver = false;
        for entry in feed.entries {
            // e.g. https://github.com/apache/incubator-pagespeed-ngx/releases/tag/v1.13.35.2-stable
            let tag_name = entry
                .links
                .first()
                .map(|l| l.href.as_str())
                .and_then(|href| href.rsplit('/').next())
                .map(|seg| urlencoding::decode(seg).map(|c| c.into_owned()).unwrap_or_else(|_| seg.to_string()))
                .unwrap_or_default();
            if tag_name.is_empty() {
                continue;
            }
            let tag_date = entry
                .published
                .or(entry.updated)
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(Utc::now);

            let Some(version) = self.sanitize(&tag_name) else {
                continue;
            };

            let best_version = best.as_ref().map(|(_, v, _)| v);
            if semver_check_skip(&mut seen_semver, &version, best_version) {
                continue;
            }

            if let Some((_, best_version, best_date)) = &best {
                if &version == best_version && *best_date >= tag_date {
                    continue;
                }
                if tag_date + Duration::days(FEED_BREAK_DAYS) < *best_date {
                    break;
                }
            }

            match &best {
                // only a strictly greater version replaces the feed-pass
                // selection; a tag-date-only win never does.
                Some((_, best_version, _)) if &version <= best_version => {}
                _ => best = Some((tag_name, version, tag_date)),
            }
        }
        best
    }

    fn formal_releases(&self) -> Vec<GhRelease> {
        let url = format!("{}/repos/{}/releases?per_page=100", self.api_base(), self.repo);
        self.get_json::<Vec<GhRelease>>(&url).ok().flatten().unwrap_or_default()
    }

    /// `set_matching_formal_release`'s draft/prerelease/`having_asset`
    /// rejection, shared by the formal-releases pass and the deep-tag
    /// passes' per-tag formal-release lookup.
    fn formal_release_eligible(&self, gh: &GhRelease) -> bool {
        if gh.draft {
            return false;
        }
        if gh.prerelease && !self.filters.pre_ok {
            return false;
        }
        if let Some(wanted_asset) = &self.filters.having_asset {
            if gh.assets.is_empty() || !asset_matches_having(&gh.assets, wanted_asset) {
                return false;
            }
        }
        true
    }

    fn release_from_formal(&self, gh: &GhRelease, version: &Version) -> Release {
        let tag_date = gh.published_at.or(gh.created_at).unwrap_or_else(Utc::now);
        let mut release = Release::new(gh.tag_name.clone(), version.clone(), tag_date);
        release.assets = gh
            .assets
            .iter()
            .map(|a| Asset {
                name: a.name.clone(),
                download_url: a.browser_download_url.clone(),
                size: a.size,
                label: a.label.clone(),
                digest: a.digest.clone(),
            })
            .collect();
        release
    }

    /// Pass 2: enumerate `/releases`, honoring draft/prerelease rejection
    /// and the `having_asset`/`formal` filters.
    fn formal_releases_pass(&self) -> Option<(Release, Version)> {
        let mut best: Option<(GhRelease, Version)> = None;
        for release in self.formal_releases() {
            if !self.formal_release_eligible(&release) {
                continue;
            }
            let Some(version) = self.sanitize(&release.tag_name) else {
                continue;
            };
            match &best {
                Some((_, best_version)) if &version <= best_version => {}
                _ => best = Some((release, version)),
            }
        }

        best.map(|(gh, version)| {
            let release = self.release_from_formal(&gh, &version);
            (release, version)
        })
    }

    /// Pass 3: paginated `/tags` with a per-tag commit lookup for the
    /// tag's actual date, used only when the earlier passes were
    /// inconclusive (no formal releases, or `having_asset`/`formal`
    /// requested a stronger guarantee than the feed alone provides).
    fn tags_pass(&self) -> Option<(String, Version, DateTime<Utc>)> {
        let mut page = 1;
        let mut best: Option<(String, Version, DateTime<Utc>)> = None;
        let mut seen_semver = false;
        loop {
            let url = format!(
                "{}/repos/{}/tags?per_page=100&page={}",
                self.api_base(),
                self.repo,
                page
            );
            let tags: Vec<GhTag> = match self.get_json(&url) {
                Ok(Some(t)) => t,
                _ => break,
            };
            if tags.is_empty() {
                break;
            }
            for tag in &tags {
                let Some(version) = self.sanitize(&tag.name) else {
                    continue;
                };
                let best_version = best.as_ref().map(|(_, v, _)| v);
                if semver_check_skip(&mut seen_semver, &version, best_version) {
                    continue;
                }
                let commit_url = format!(
                    "{}/repos/{}/commits/{}",
                    self.api_base(),
                    self.repo,
                    tag.commit.sha
                );
                let tag_date = self
                    .get_json::<GhCommit>(&commit_url)
                    .ok()
                    .flatten()
                    .map(|c| c.commit.committer.date)
                    .unwrap_or_else(Utc::now);

                match &best {
                    Some((_, best_version, best_date)) => {
                        if &version > best_version
                            || (&version == best_version && tag_date > *best_date + Duration::hours(1))
                        {
                            best = Some((tag.name.clone(), version, tag_date));
                        }
                    }
                    None => best = Some((tag.name.clone(), version, tag_date)),
                }
            }
            page += 1;
            if page > 10 {
                break;
            }
        }
        best
    }

    /// Pass 3 (token present): batches of 100 tags ordered by commit date,
    /// cursor-paginated through the GraphQL API, which spares us a
    /// per-tag commit lookup. Stops once a candidate is selected or the
    /// 365-day look-back limit is crossed.
    fn graphql_tags_pass(&self) -> Option<(Release, Version)> {
        const QUERY: &str = r#"
        query($owner: String!, $name: String!, $after: String) {
          repository(owner: $owner, name: $name) {
            tags: refs(refPrefix: "refs/tags/", first: 100, after: $after,
              orderBy: {field: TAG_COMMIT_DATE, direction: DESC}) {
              edges {
                cursor
                node {
                  name
                  target {
                    __typename
                    ... on Tag {
                      tagger { date }
                      target { ... on Commit { committedDate } }
                    }
                    ... on Commit { committedDate }
                  }
                }
              }
            }
          }
        }
        "#;

        let token = self.token.as_ref()?;
        let (owner, name) = self.repo.split_once('/')?;
        let formal_by_tag: HashMap<String, GhRelease> =
            self.formal_releases().into_iter().map(|r| (r.tag_name.clone(), r)).collect();

        let url = format!("{}/graphql", self.api_base());
        let auth = format!("token {token}");

        let mut cursor: Option<String> = None;
        let mut best: Option<(String, Version, DateTime<Utc>)> = None;
        let mut seen_semver = false;
        let mut page = 0;

        loop {
            page += 1;
            if page > 10 {
                break;
            }
            let body = serde_json::json!({
                "query": QUERY,
                "variables": { "owner": owner, "name": name, "after": cursor },
            });
            let response = self.http.post_json(&url, &body, Some(&auth)).ok()?;
            let parsed: serde_json::Value = serde_json::from_str(&response).ok()?;
            let edges = parsed
                .pointer("/data/repository/tags/edges")
                .and_then(|e| e.as_array())
                .cloned()
                .unwrap_or_default();
            if edges.is_empty() {
                break;
            }

            let mut stop = false;
            for edge in &edges {
                cursor = edge.get("cursor").and_then(|c| c.as_str()).map(str::to_string);
                let Some(node) = edge.get("node") else { continue };
                let Some(tag_name) = node.get("name").and_then(|n| n.as_str()) else { continue };
                let Some(version) = self.sanitize(tag_name) else { continue };

                let best_version = best.as_ref().map(|(_, v, _)| v);
                if semver_check_skip(&mut seen_semver, &version, best_version) {
                    continue;
                }

                let target = node.get("target");
                let date_str = target
                    .and_then(|t| t.get("tagger"))
                    .and_then(|t| t.get("date"))
                    .and_then(|d| d.as_str())
                    .or_else(|| target.and_then(|t| t.get("committedDate")).and_then(|d| d.as_str()))
                    .or_else(|| target.and_then(|t| t.pointer("/target/committedDate")).and_then(|d| d.as_str()));
                let Some(tag_date) = date_str
                    .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                    .map(|d| d.with_timezone(&Utc))
                else {
                    continue;
                };

                if let Some((_, _, best_date)) = &best {
                    if tag_date + Duration::days(RECENCY_WINDOW_DAYS) < *best_date {
                        stop = true;
                        break;
                    }
                }

                let better = match &best {
                    Some((_, best_version, best_date)) => {
                        &version >= best_version || tag_date - *best_date > Duration::hours(1)
                    }
                    None => true,
                };
                if better {
                    best = Some((tag_name.to_string(), version, tag_date));
                }
            }
            if stop || best.is_some() || cursor.is_none() {
                break;
            }
        }

        let (tag_name, version, tag_date) = best?;
        match formal_by_tag.get(&tag_name) {
            Some(gh) if self.formal_release_eligible(gh) => {
                let release = self.release_from_formal(gh, &version);
                Some((release, version))
            }
            Some(_) => None,
            None => {
                if self.filters.having_asset.is_some() {
                    return None;
                }
                Some((Release::new(tag_name, version.clone(), tag_date), version))
            }
        }
    }

    pub fn get_latest_commit(&self, branch: &str) -> Result<Option<(String, DateTime<Utc>, String)>> {
        #[derive(Deserialize)]
        struct Commit {
            sha: String,
            commit: CommitDetail,
        }
        #[derive(Deserialize)]
        struct CommitDetail {
            message: String,
            committer: GhCommitter,
        }
        let url = format!(
            "{}/repos/{}/commits/{}",
            self.api_base(),
            self.repo,
            branch
        );
        Ok(self
            .get_json::<Commit>(&url)?
            .map(|c| (c.sha, c.commit.committer.date, c.commit.message)))
    }

    fn changelog_candidates() -> &'static [&'static str] {
        &["CHANGELOG.md", "CHANGES.md", "NEWS.md", "HISTORY.md"]
    }

    fn fetch_text_file_at_tag(&self, tag: &str, path: &str) -> Option<String> {
        let raw_url = format!(
            "https://raw.githubusercontent.com/{}/{}/{}",
            self.repo, tag, path
        );
        if let Ok(body) = self.http.get(&raw_url) {
            if !body.trim().is_empty() {
                return Some(body);
            }
        }
        None
    }
}

impl Holder for GitHubHolder {
    fn name(&self) -> &str {
        self.repo.rsplit('/').next().unwrap_or(&self.repo)
    }

    fn hostname(&self) -> Option<&str> {
        Some(&self.hostname)
    }

    fn filters(&self) -> &HolderFilters {
        &self.filters
    }

    fn set_filters(&mut self, filters: HolderFilters) {
        self.filters = filters;
    }

    fn is_instance(&self) -> bool {
        !self.repo.is_empty()
    }

    fn get_latest(&self) -> Result<Option<Release>> {
        let feed_best = self.feed_pass();

        if let Some((tag, version, tag_date)) = &feed_best {
            let recent_enough = Utc::now() - *tag_date < Duration::days(RECENCY_WINDOW_DAYS);
            if recent_enough && self.filters.having_asset.is_none() && !self.filters.formal {
                let mut release = Release::new(tag.clone(), version.clone(), *tag_date);
                release.source_download_url = Some(self.release_download_url(&release, false).unwrap_or_default());
                return Ok(Some(release));
            }
        }

        if let Some((release, _)) = self.formal_releases_pass() {
            return Ok(Some(release));
        }

        // tag-only records can never satisfy `having_asset`, and `formal`
        // requires a formal release; there is nothing further to try.
        if self.filters.having_asset.is_some() || self.filters.formal {
            return Ok(None);
        }

        let deep = if self.token.is_some() {
            self.graphql_tags_pass()
        } else {
            self.tags_pass().map(|(tag, version, tag_date)| {
                (Release::new(tag, version.clone(), tag_date), version)
            })
        };
        if let Some((mut release, _)) = deep {
            release.source_download_url = Some(self.release_download_url(&release, false).unwrap_or_default());
            return Ok(Some(release));
        }

        if let Some((tag, version, tag_date)) = feed_best {
            let mut release = Release::new(tag, version, tag_date);
            release.source_download_url = Some(self.release_download_url(&release, false).unwrap_or_default());
            return Ok(Some(release));
        }

        Ok(None)
    }

    fn repo_license(&self) -> Option<String> {
        self.fetch_text_file_at_tag("HEAD", "LICENSE")
    }

    fn repo_readme(&self) -> Option<String> {
        self.fetch_text_file_at_tag("HEAD", "README.md")
    }

    fn repo_changelog(&self, tag: &str) -> Option<String> {
        for candidate in Self::changelog_candidates() {
            if let Some(text) = self.fetch_text_file_at_tag(tag, candidate) {
                return Some(text);
            }
        }
        None
    }

    fn release_download_url(&self, release: &Release, _shorter: bool) -> Option<String> {
        let ext = if cfg!(target_os = "windows") { "zip" } else { "tar.gz" };
        Some(format!(
            "https://github.com/{}/archive/refs/tags/{}.{}",
            self.repo, release.tag_name, ext
        ))
    }
}

#[cfg(test)]
#[path = "../tests/github_tests.rs"]
mod tests;
