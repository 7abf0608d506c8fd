//! Alpine Linux APKINDEX adapter: downloads and parses `APKINDEX.tar.gz`
//! for `main`/`community` on a given branch (default `edge`).

use super::{Holder, HolderFilters};
use crate::error::Result;
use crate::http::HttpSession;
use crate::release::Release;
use crate::version::Version;
use chrono::Utc;
use flate2::read::GzDecoder;
use std::collections::HashMap;
use std::io::Read;
use tar::Archive;

const CDN_HOSTNAME: &str = "dl-cdn.alpinelinux.org";
const DEFAULT_BRANCH: &str = "edge";
const DEFAULT_ARCH: &str = "x86_64";
const REPOS: &[&str] = &["main", "community"];

pub struct AlpineHolder {
    pub repo: String,
    pub filters: HolderFilters,
    http: HttpSession,
}

impl AlpineHolder {
    pub fn new(repo: &str, _hostname: Option<&str>) -> Self {
        AlpineHolder {
            repo: repo.to_string(),
            filters: HolderFilters::default(),
            http: HttpSession::new("lastversion", dirs::cache_dir().map(|d| d.join("lastversion"))),
        }
    }

    fn branch(&self) -> String {
        self.filters
            .major
            .clone()
            .unwrap_or_else(|| DEFAULT_BRANCH.to_string())
    }

    fn apkindex_url(branch: &str, apk_repo: &str, arch: &str) -> String {
        let branch_path = if branch == "edge" { branch.to_string() } else { format!("v{branch}") };
        format!("https://{CDN_HOSTNAME}/alpine/{branch_path}/{apk_repo}/{arch}/APKINDEX.tar.gz")
    }

    fn fetch_package(&self, branch: &str, apk_repo: &str, arch: &str) -> Option<HashMap<String, String>> {
        let url = Self::apkindex_url(branch, apk_repo, arch);
        let body = self.http.get_bytes(&url).ok()?;
        let decoder = GzDecoder::new(body.as_slice());
        let mut archive = Archive::new(decoder);
        for entry in archive.entries().ok()? {
            let mut entry = entry.ok()?;
            if entry.path().ok()?.to_str() != Some("APKINDEX") {
                continue;
            }
            let mut content = String::new();
            entry.read_to_string(&mut content).ok()?;
            return parse_apkindex(&content).remove(&self.repo);
        }
        None
    }

    fn find_package(&self, branch: &str) -> Option<(String, HashMap<String, String>)> {
        for apk_repo in REPOS {
            if let Some(pkg) = self.fetch_package(branch, apk_repo, DEFAULT_ARCH) {
                return Some((apk_repo.to_string(), pkg));
            }
        }
        None
    }
}

fn parse_apkindex(content: &str) -> HashMap<String, HashMap<String, String>> {
    let mut packages = HashMap::new();
    let mut current: HashMap<String, String> = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            if let (Some(name), true) = (current.get("P").cloned(), current.contains_key("V")) {
                packages.insert(name, std::mem::take(&mut current));
            }
            current.clear();
            continue;
        }
        if let Some((key, value)) = line.split_once(':') {
            current.insert(key.to_string(), value.to_string());
        }
    }
    if let (Some(name), true) = (current.get("P").cloned(), current.contains_key("V")) {
        packages.insert(name, current);
    }
    packages
}

impl Holder for AlpineHolder {
    fn name(&self) -> &str {
        &self.repo
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

    fn is_instance(&self) -> bool {
        self.find_package(&self.branch()).is_some()
    }

    fn get_latest(&self) -> Result<Option<Release>> {
        let branch = self.branch();
        let Some((_apk_repo, pkg)) = self.find_package(&branch) else {
            return Ok(None);
        };
        let Some(version_str) = pkg.get("V") else {
            return Ok(None);
        };
        let version = Version::parse(version_str, false)
            .or_else(|_| {
                let numeric: String = version_str
                    .chars()
                    .take_while(|c| c.is_ascii_digit() || *c == '.')
                    .collect();
                Version::parse(&numeric, false)
            })
            .ok();
        let Some(version) = version else {
            return Ok(None);
        };
        Ok(Some(Release::new(version_str.clone(), version, Utc::now())))
    }

    fn release_download_url(&self, release: &Release, _shorter: bool) -> Option<String> {
        let branch = self.branch();
        let (apk_repo, _) = self.find_package(&branch)?;
        let branch_path = if branch == "edge" { branch.clone() } else { format!("v{branch}") };
        Some(format!(
            "https://{CDN_HOSTNAME}/alpine/{branch_path}/{apk_repo}/{DEFAULT_ARCH}/{}-{}.apk",
            self.repo, release.tag_name
        ))
    }
}

#[cfg(test)]
#[path = "../tests/alpine_tests.rs"]
mod tests;
