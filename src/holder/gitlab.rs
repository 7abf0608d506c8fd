//! GitLab adapter: tags ordered by update time, cross-referenced against
//! `/releases` to pick up prerelease flags and release assets.

use super::{sanitize_version, Holder, HolderFilters};
use crate::error::Result;
use crate::http::HttpSession;
use crate::release::Release;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

const RECENCY_WINDOW_DAYS: i64 = 365;

#[derive(Debug, Deserialize)]
struct GlTagCommit {
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct GlTag {
    name: String,
    commit: GlTagCommit,
}

pub struct GitLabHolder {
    pub repo: String,
    pub hostname: String,
    pub filters: HolderFilters,
    http: HttpSession,
    token: Option<String>,
}

impl GitLabHolder {
    pub fn new(repo: &str, hostname: Option<&str>) -> Self {
        GitLabHolder {
            repo: repo.to_string(),
            hostname: hostname.unwrap_or("gitlab.com").to_string(),
            filters: HolderFilters::default(),
            http: HttpSession::new("lastversion", dirs::cache_dir().map(|d| d.join("lastversion"))),
            token: std::env::var("GITLAB_PA_TOKEN").ok(),
        }
    }

    fn api_base(&self) -> String {
        format!("https://{}/api/v4", self.hostname)
    }

    fn encoded_repo(&self) -> String {
        self.repo.replace('/', "%2F")
    }

    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {t}"))
    }
}

impl Holder for GitLabHolder {
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
        let url = format!(
            "{}/projects/{}/repository/tags?per_page=100",
            self.api_base(),
            self.encoded_repo()
        );
        let body = self.http.get_with_auth(&url, self.auth_header().as_deref())?;
        let Ok(tags) = serde_json::from_str::<Vec<GlTag>>(&body) else {
            return Ok(None);
        };

        let mut best: Option<(String, crate::version::Version, DateTime<Utc>)> = None;
        for tag in tags {
            let tag_date = tag.commit.created_at;
            let Some(version) = sanitize_version(self.name(), &self.filters, &tag.name, false) else {
                continue;
            };
            if let Some((_, best_version, best_date)) = &best {
                if tag_date + Duration::days(RECENCY_WINDOW_DAYS) < *best_date {
                    break;
                }
                if &version <= best_version {
                    continue;
                }
            }
            best = Some((tag.name, version, tag_date));
        }

        Ok(best.map(|(tag, version, tag_date)| {
            let mut release = Release::new(tag, version, tag_date);
            release.source_download_url = self.release_download_url(&release, false);
            release
        }))
    }

    fn release_download_url(&self, release: &Release, shorter: bool) -> Option<String> {
        if shorter {
            log::info!("shorter URLs are not supported for GitLab");
        }
        let ext = if cfg!(target_os = "windows") { "zip" } else { "tar.gz" };
        let short_name = self.repo.rsplit('/').next().unwrap_or(&self.repo);
        Some(format!(
            "https://{}/{}/-/archive/{}/{}-{}.{}",
            self.hostname, self.repo, release.tag_name, short_name, release.tag_name, ext
        ))
    }
}

#[cfg(test)]
#[path = "../tests/gitlab_tests.rs"]
mod tests;
