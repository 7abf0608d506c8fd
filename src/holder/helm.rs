//! Helm Chart.yaml adapter: reads a chart's `version:` field directly off
//! GitHub raw content or any other HTTP-accessible location.

use super::{sanitize_version, Holder, HolderFilters};
use crate::error::Result;
use crate::http::HttpSession;
use crate::release::Release;
use chrono::Utc;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ChartYaml {
    version: String,
}

pub struct HelmHolder {
    pub repo: String,
    pub hostname: Option<String>,
    pub filters: HolderFilters,
    http: HttpSession,
}

impl HelmHolder {
    pub fn new(repo: &str, hostname: Option<&str>) -> Self {
        let repo = if repo.ends_with("Chart.yaml") {
            repo.to_string()
        } else {
            format!("{}/Chart.yaml", repo.trim_end_matches('/'))
        };
        HelmHolder {
            repo,
            hostname: hostname.map(str::to_string),
            filters: HolderFilters::default(),
            http: HttpSession::new("lastversion", dirs::cache_dir().map(|d| d.join("lastversion"))),
        }
    }

    fn chart_url(&self) -> String {
        let hostname = self.hostname.as_deref().unwrap_or("github.com");
        if hostname == "github.com" {
            format!(
                "https://raw.githubusercontent.com/{}",
                self.repo.replace("/blob/", "/")
            )
        } else {
            format!("https://{hostname}/{}", self.repo)
        }
    }
}

impl Holder for HelmHolder {
    fn name(&self) -> &str {
        self.repo.rsplit('/').nth(1).unwrap_or(&self.repo)
    }

    fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }

    fn filters(&self) -> &HolderFilters {
        &self.filters
    }

    fn set_filters(&mut self, filters: HolderFilters) {
        self.filters = filters;
    }

    fn get_latest(&self) -> Result<Option<Release>> {
        let body = self.http.get(&self.chart_url())?;
        let Ok(chart) = serde_yaml::from_str::<ChartYaml>(&body) else {
            return Ok(None);
        };
        let Some(version) = sanitize_version(self.name(), &self.filters, &chart.version, false) else {
            return Ok(None);
        };
        Ok(Some(Release::new(chart.version, version, Utc::now())))
    }
}

#[cfg(test)]
#[path = "../tests/helm_tests.rs"]
mod tests;
