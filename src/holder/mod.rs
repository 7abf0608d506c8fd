//! The `Holder` trait and the filtering/sanitization logic shared by every
//! adapter (GitHub, GitLab, BitBucket, the consolidated feed holder, PyPI,
//! WordPress, Helm, Alpine, System, Local).

pub mod alpine;
pub mod bitbucket;
pub mod feed;
pub mod github;
pub mod gitlab;
pub mod helm;
pub mod local;
pub mod pypi;
pub mod system;
pub mod wordpress;

use crate::asset_filter::asset_does_not_belong_to_machine;
use crate::release::Release;
use crate::version::{Version, FALLBACK_SEARCH};
use regex::Regex;
use std::collections::HashMap;

/// User-settable selection filters, common to every holder. Mirrors
/// `BaseProjectHolder`'s `set_only`/`set_exclude`/`set_even`/`set_formal`/
/// `set_having_asset`/`set_branches`.
#[derive(Debug, Clone, Default)]
pub struct HolderFilters {
    pub only: Option<String>,
    pub exclude: Option<String>,
    pub even: bool,
    pub formal: bool,
    pub having_asset: Option<String>,
    pub branches: HashMap<String, String>,
    pub pre_ok: bool,
    pub major: Option<String>,
}

/// A resolved release together with the download URLs selected for it,
/// the final product the orchestrator hands back to the CLI.
pub struct LatestResult {
    pub release: Release,
    pub urls: Vec<String>,
}

impl std::fmt::Debug for dyn Holder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Holder").field("name", &self.name()).finish()
    }
}

pub trait Holder {
    /// The short project name, e.g. the second path component of `owner/repo`.
    fn name(&self) -> &str;

    fn hostname(&self) -> Option<&str>;

    fn filters(&self) -> &HolderFilters;

    /// Installs the filters resolved from CLI flags / `.yml`/`.spec`
    /// overrides, mirroring `BaseProjectHolder.set_only`/`set_exclude`/
    /// `set_even`/`set_formal`/`set_having_asset` (collapsed into one call
    /// since every adapter stores filters in a single struct field).
    fn set_filters(&mut self, filters: HolderFilters);

    /// Probes whether this holder is actually the right one for its
    /// configured repo/hostname (self-hosted instance detection).
    fn is_instance(&self) -> bool {
        true
    }

    fn get_latest(&self) -> crate::error::Result<Option<Release>>;

    fn repo_license(&self) -> Option<String> {
        None
    }

    fn repo_readme(&self) -> Option<String> {
        None
    }

    fn repo_changelog(&self, _tag: &str) -> Option<String> {
        None
    }

    fn release_download_url(&self, _release: &Release, _shorter: bool) -> Option<String> {
        None
    }

    fn get_canonical_link(&self) -> String {
        match self.hostname() {
            Some(h) => format!("https://{h}/{}", self.name()),
            None => self.name().to_string(),
        }
    }

    /// Download URLs for a release: asset-filtered when the release has
    /// assets, falling back to a single source-archive URL otherwise.
    fn get_assets(&self, release: &Release, shorter: bool, assets_filter: Option<&Regex>) -> Vec<String> {
        let mut urls = Vec::new();

        if !release.assets.is_empty() {
            let arch_matched: Vec<_> = if assets_filter.is_none() && std::env::consts::ARCH == "x86_64" {
                release
                    .assets
                    .iter()
                    .filter(|a| a.name.contains("x86_64"))
                    .collect()
            } else {
                Vec::new()
            };
            let candidates: Vec<_> = if !arch_matched.is_empty() {
                arch_matched
            } else {
                release.assets.iter().collect()
            };

            for asset in candidates {
                if let Some(filter) = assets_filter {
                    if !filter.is_match(&asset.name) {
                        continue;
                    }
                } else if asset_does_not_belong_to_machine(&asset.name) {
                    continue;
                }
                urls.push(asset.download_url.clone());
            }
        } else if let Some(url) = self.release_download_url(release, shorter) {
            if assets_filter.map(|f| f.is_match(&url)).unwrap_or(true) {
                urls.push(url);
            }
        }

        urls
    }
}

/// `+`/`!`/`~regex` filter semantics shared by `only`/`exclude`.
pub fn matches_filter(filter: Option<&str>, positive: bool, value: &str) -> bool {
    let Some(filter) = filter else {
        return true;
    };
    let mut positive = positive;
    let mut filter = filter;
    if let Some(stripped) = filter.strip_prefix('!') {
        positive = !positive;
        filter = stripped;
    }
    if let Some(pattern) = filter.strip_prefix('~') {
        return match Regex::new(pattern) {
            Ok(re) => positive == re.is_match(value),
            Err(_) => positive,
        };
    }
    positive == value.contains(filter)
}

pub fn matches_major_filter(version: &Version, major: &str, branches: &HashMap<String, String>) -> bool {
    let v_str = version.to_string();
    if let Some(pattern) = branches.get(major) {
        if let Ok(re) = Regex::new(pattern) {
            if re.is_match(&v_str) {
                return true;
            }
        }
    }
    if v_str.starts_with(&format!("{major}.")) {
        return true;
    }
    v_str == major
}

pub fn remove_prefix(name: &str, version_s: &str) -> String {
    for prefix in [format!("{name}-"), format!("{name}_")] {
        if let Some(stripped) = version_s.strip_prefix(&prefix) {
            return stripped.to_string();
        }
    }
    version_s.to_string()
}

/// Turns a raw tag name into a satisfying [`Version`], applying the
/// `only`/`exclude`/`major`/`even` filters and the PEP 440 fallback search,
/// mirroring `BaseProjectHolder.sanitize_version`.
pub fn sanitize_version(
    name: &str,
    filters: &HolderFilters,
    raw_tag: &str,
    char_fix_required: bool,
) -> Option<Version> {
    let version_s = remove_prefix(name, raw_tag);

    if !matches_filter(filters.only.as_deref(), true, &version_s) {
        return None;
    }
    if !matches_filter(filters.exclude.as_deref(), false, &version_s) {
        return None;
    }

    let mut res = match Version::parse(&version_s, char_fix_required) {
        Ok(v) => {
            if !v.is_prerelease() || filters.pre_ok {
                Some(v)
            } else {
                None
            }
        }
        Err(_) => {
            let mut found = None;
            for caps in FALLBACK_SEARCH.captures_iter(&version_s) {
                let candidate = caps[1].to_string();
                if let Ok(v) = Version::parse(&candidate, false) {
                    found = Some(v);
                    break;
                }
            }
            if found.is_none() {
                let parts: Vec<&str> = version_s.split('_').collect();
                if parts.len() >= 2 && parts[0].chars().all(|c| c.is_ascii_alphabetic()) {
                    let joined = parts[1..].join(".");
                    if let Ok(v) = Version::parse(&joined, false) {
                        if !v.is_prerelease() || filters.pre_ok {
                            found = Some(v);
                        }
                    }
                }
            }
            found
        }
    };

    if let Some(v) = &res {
        if let Some(major) = &filters.major {
            if !matches_major_filter(v, major, &filters.branches) {
                res = None;
            }
        }
    }

    if let Some(v) = &res {
        if filters.even && !v.even() {
            res = None;
        }
    }

    res
}

#[cfg(test)]
#[path = "../tests/holder_tests.rs"]
mod tests;
