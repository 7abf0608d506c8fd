//! PyPI adapter: reads the project JSON API, either the current stable
//! release or (with `--major`) the best matching entry from `releases`.

use super::{sanitize_version, Holder, HolderFilters};
use crate::error::Result;
use crate::http::HttpSession;
use crate::release::Release;
use crate::version::Version;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
struct PypiProject {
    info: PypiInfo,
    releases: HashMap<String, Vec<PypiFile>>,
}

#[derive(Debug, Deserialize)]
struct PypiInfo {
    version: String,
}

#[derive(Debug, Clone, Deserialize)]
struct PypiFile {
    packagetype: String,
    url: String,
    upload_time: String,
}

pub struct PypiHolder {
    pub repo: String,
    pub hostname: String,
    pub filters: HolderFilters,
    http: HttpSession,
}

impl PypiHolder {
    pub fn new(repo: &str, hostname: Option<&str>) -> Self {
        PypiHolder {
            repo: repo.to_string(),
            hostname: hostname.unwrap_or("pypi.org").to_string(),
            filters: HolderFilters::default(),
            http: HttpSession::new("lastversion", dirs::cache_dir().map(|d| d.join("lastversion"))),
        }
    }

    fn project(&self) -> Option<PypiProject> {
        let url = format!("https://{}/pypi/{}/json", self.hostname, self.repo);
        let body = self.http.get(&url).ok()?;
        serde_json::from_str(&body).ok()
    }
}

impl Holder for PypiHolder {
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

        let (tag_name, version) = if self.filters.major.is_none() {
            let v = Version::parse(&project.info.version, false).ok();
            match v {
                Some(v) => (project.info.version.clone(), v),
                None => return Ok(None),
            }
        } else {
            let mut best: Option<(String, Version)> = None;
            for release_ver in project.releases.keys() {
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
            match best {
                Some(b) => b,
                None => return Ok(None),
            }
        };

        let files = project.releases.get(&tag_name).cloned().unwrap_or_default();
        let tag_date = files
            .first()
            .and_then(|f| f.upload_time.parse::<DateTime<Utc>>().ok())
            .unwrap_or_else(Utc::now);

        let mut release = Release::new(tag_name, version, tag_date);
        release.source_download_url = files
            .iter()
            .find(|f| f.packagetype == "sdist")
            .map(|f| f.url.clone());
        Ok(Some(release))
    }
}

#[cfg(test)]
#[path = "../tests/pypi_tests.rs"]
mod tests;
