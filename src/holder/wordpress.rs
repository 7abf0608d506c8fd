//! WordPress.org plugin directory adapter.

use super::{sanitize_version, Holder, HolderFilters};
use crate::error::Result;
use crate::http::HttpSession;
use crate::release::Release;
use crate::version::Version;
use chrono::Utc;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
struct WpPlugin {
    version: String,
    #[serde(default)]
    versions: HashMap<String, String>,
}

pub struct WordPressHolder {
    pub repo: String,
    pub hostname: String,
    pub filters: HolderFilters,
    http: HttpSession,
}

impl WordPressHolder {
    pub fn new(repo: &str, hostname: Option<&str>) -> Self {
        WordPressHolder {
            repo: repo.to_string(),
            hostname: hostname.unwrap_or("wordpress.org").to_string(),
            filters: HolderFilters::default(),
            http: HttpSession::new("lastversion", dirs::cache_dir().map(|d| d.join("lastversion"))),
        }
    }

    fn project(&self) -> Option<WpPlugin> {
        let url = format!("https://api.{}/plugins/info/1.0/{}.json", self.hostname, self.repo);
        let body = self.http.get(&url).ok()?;
        serde_json::from_str(&body).ok()
    }
}

impl Holder for WordPressHolder {
    fn name(&self) -> &str {
        &self.repo
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
        self.project().is_some()
    }

    fn get_latest(&self) -> Result<Option<Release>> {
        let Some(project) = self.project() else {
            return Ok(None);
        };

        if self.filters.major.is_none() {
            let Ok(version) = Version::parse(&project.version, false) else {
                return Ok(None);
            };
            return Ok(Some(Release::new(project.version, version, Utc::now())));
        }

        let mut best: Option<(String, Version)> = None;
        for release_ver in project.versions.keys() {
            let Some(version) = sanitize_version(self.name(), &self.filters, release_ver, false) else {
                continue;
            };
            let better = match &best {
                Some((_, best_version)) => &version > best_version,
                None => true,
            };
            if better {
                best = Some((release_ver.clone(), version));
            }
        }
        Ok(best.map(|(tag, version)| Release::new(tag, version, Utc::now())))
    }

    fn release_download_url(&self, release: &Release, _shorter: bool) -> Option<String> {
        Some(format!(
            "https://downloads.wordpress.org/plugin/{}.{}.zip",
            self.repo, release.version_str
        ))
    }

    fn get_canonical_link(&self) -> String {
        format!("https://{}/plugins/{}/", self.hostname, self.repo)
    }
}

#[cfg(test)]
#[path = "../tests/wordpress_tests.rs"]
mod tests;
