//! Reads a fixed version file written by some other process, e.g. an RPM
//! build script recording which upstream "stable"/"mainline" branch was
//! last packaged (`/usr/local/share/builder/<repo>-<branch>.ver`).

use super::{Holder, HolderFilters};
use crate::error::Result;
use crate::release::Release;
use crate::version::Version;
use chrono::Utc;
use std::fs;

pub struct LocalHolder {
    pub repo: String,
    pub filters: HolderFilters,
    pub version_dir: String,
}

impl LocalHolder {
    pub fn new(repo: &str, _hostname: Option<&str>) -> Self {
        LocalHolder {
            repo: repo.to_string(),
            filters: HolderFilters::default(),
            version_dir: "/usr/local/share/builder".to_string(),
        }
    }
}

impl Holder for LocalHolder {
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

    fn get_latest(&self) -> Result<Option<Release>> {
        if self.filters.pre_ok {
            log::info!("--pre is not supported for local version sources");
        }
        let branch = self.filters.major.clone().unwrap_or_else(|| "stable".to_string());
        let path = format!("{}/{}-{}.ver", self.version_dir, self.repo, branch);
        let Ok(contents) = fs::read_to_string(&path) else {
            return Ok(None);
        };
        let version_s = contents.trim().to_string();
        let Ok(version) = Version::parse(&version_s, false) else {
            return Ok(None);
        };
        Ok(Some(Release::new(version_s, version, Utc::now())))
    }
}

#[cfg(test)]
#[path = "../tests/local_tests.rs"]
mod tests;
