//! BitBucket adapter: downloads list first (paid-plan "official downloads"),
//! falling back to the paginated tags API.

use super::{sanitize_version, Holder, HolderFilters};
use crate::error::Result;
use crate::http::HttpSession;
use crate::release::Release;
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct BbDownloadsResponse {
    values: Vec<BbDownload>,
}

#[derive(Debug, Deserialize)]
struct BbDownload {
    name: String,
    created_on: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct BbTagsResponse {
    values: Vec<BbTag>,
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BbTag {
    name: String,
    target: BbTagTarget,
}

#[derive(Debug, Deserialize)]
struct BbTagTarget {
    date: DateTime<Utc>,
}

pub struct BitBucketHolder {
    pub repo: String,
    pub hostname: String,
    pub filters: HolderFilters,
    http: HttpSession,
}

impl BitBucketHolder {
    pub fn new(repo: &str, hostname: Option<&str>) -> Self {
        BitBucketHolder {
            repo: repo.to_string(),
            hostname: hostname.unwrap_or("bitbucket.org").to_string(),
            filters: HolderFilters::default(),
            http: HttpSession::new("lastversion", dirs::cache_dir().map(|d| d.join("lastversion"))),
        }
    }

    fn from_downloads(&self) -> Option<Release> {
        let url = format!("https://api.bitbucket.org/2.0/repositories/{}/downloads", self.repo);
        let body = self.http.get(&url).ok()?;
        let resp: BbDownloadsResponse = serde_json::from_str(&body).ok()?;
        let first = resp.values.into_iter().next()?;
        let version = sanitize_version(self.name(), &self.filters, &first.name, false)?;
        Some(Release::new(first.name, version, first.created_on))
    }

    fn from_tags(&self) -> Result<Option<Release>> {
        let mut best: Option<(String, crate::version::Version, DateTime<Utc>)> = None;
        let mut url = Some(format!(
            "https://api.bitbucket.org/2.0/repositories/{}/refs/tags?pagelen=100",
            self.repo
        ));
        while let Some(u) = url {
            let body = self.http.get(&u)?;
            let Ok(page) = serde_json::from_str::<BbTagsResponse>(&body) else {
                break;
            };
            for tag in page.values {
                let Some(version) = sanitize_version(self.name(), &self.filters, &tag.name, false) else {
                    continue;
                };
                let better = match &best {
                    Some((_, best_version, _)) => &version > best_version,
                    None => true,
                };
                if better {
                    best = Some((tag.name, version, tag.target.date));
                }
            }
            url = page.next;
        }
        Ok(best.map(|(tag, version, date)| Release::new(tag, version, date)))
    }
}

impl Holder for BitBucketHolder {
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

    fn get_latest(&self) -> Result<Option<Release>> {
        if let Some(release) = self.from_downloads() {
            return Ok(Some(release));
        }
        self.from_tags()
    }

    fn release_download_url(&self, release: &Release, _shorter: bool) -> Option<String> {
        let ext = if cfg!(target_os = "windows") { "zip" } else { "tar.gz" };
        Some(format!(
            "https://bitbucket.org/{}/get/{}.{}",
            self.repo, release.tag_name, ext
        ))
    }
}

#[cfg(test)]
#[path = "../tests/bitbucket_tests.rs"]
mod tests;
