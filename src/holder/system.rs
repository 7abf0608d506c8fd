//! System package-manager adapter: shells out to `apt-cache`/`dnf`/`rpm`
//! rather than linking the upstream package-manager libraries the Python
//! implementation imports directly (`dnf`, `yum`, `python-apt`), none of
//! which have a Rust binding in the retrieval pack. Tries each manager in
//! turn and uses whichever is present on `PATH`.

use super::{sanitize_version, Holder, HolderFilters};
use crate::error::Result;
use crate::release::Release;
use chrono::Utc;
use std::process::Command;

pub struct SystemHolder {
    pub repo: String,
    pub filters: HolderFilters,
}

impl SystemHolder {
    pub fn new(repo: &str, _hostname: Option<&str>) -> Self {
        SystemHolder {
            repo: repo.to_string(),
            filters: HolderFilters::default(),
        }
    }

    fn via_apt(&self) -> Option<(String, String)> {
        let output = Command::new("apt-cache")
            .args(["policy", &self.repo])
            .output()
            .ok()?;
        if !output.status.success() {
            return None;
        }
        let text = String::from_utf8_lossy(&output.stdout);
        let line = text.lines().find(|l| l.trim_start().starts_with("Candidate:"))?;
        let version = line.split(':').nth(1)?.trim().to_string();
        let version = version.split('-').next().unwrap_or(&version).to_string();
        Some((version.clone(), version))
    }

    fn via_dnf(&self) -> Option<(String, String)> {
        let output = Command::new("dnf")
            .args(["list", "--available", &self.repo])
            .output()
            .ok()?;
        if !output.status.success() {
            return None;
        }
        let text = String::from_utf8_lossy(&output.stdout);
        let line = text.lines().find(|l| l.starts_with(&self.repo))?;
        let evr = line.split_whitespace().nth(1)?.to_string();
        let version = evr.split('-').next().unwrap_or(&evr).to_string();
        Some((evr, version))
    }
}

impl Holder for SystemHolder {
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
        let found = self.via_dnf().or_else(|| self.via_apt());
        let Some((tag_name, version_s)) = found else {
            return Ok(None);
        };
        let Some(version) = sanitize_version(self.name(), &self.filters, &version_s, false) else {
            return Ok(None);
        };
        Ok(Some(Release::new(tag_name, version, Utc::now())))
    }
}

#[cfg(test)]
#[path = "../tests/system_tests.rs"]
mod tests;
