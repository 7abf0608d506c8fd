//! One holder implementation standing in for five near-duplicate upstream
//! classes (Mercurial, Gitea/Codeberg, SourceForge, Wikipedia, and
//! generic-website feed discovery), each of which differed only in its feed
//! URL template and, for Wikipedia, an infobox-scraping override instead of
//! a feed at all.

use super::{sanitize_version, Holder, HolderFilters};
use crate::error::Result;
use crate::http::HttpSession;
use crate::release::Release;
use chrono::{DateTime, Utc};
use scraper::{Html, Selector};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFlavor {
    Mercurial,
    Gitea,
    SourceForge,
    Wikipedia,
    /// Homepage link/RSS discovery, used as the holder factory's last
    /// resort before defaulting to GitHub.
    Generic,
}

pub struct FeedHolder {
    pub repo: String,
    pub hostname: String,
    pub filters: HolderFilters,
    pub flavor: FeedFlavor,
    http: HttpSession,
    feed_url: Option<String>,
}

impl FeedHolder {
    pub fn new(repo: &str, hostname: &str, flavor: FeedFlavor) -> Self {
        let http = HttpSession::new("lastversion", dirs::cache_dir().map(|d| d.join("lastversion")));
        let feed_url = Self::feed_url_for(flavor, repo, hostname, &http);
        FeedHolder {
            repo: repo.to_string(),
            hostname: hostname.to_string(),
            filters: HolderFilters::default(),
            flavor,
            http,
            feed_url,
        }
    }

    fn feed_url_for(flavor: FeedFlavor, repo: &str, hostname: &str, http: &HttpSession) -> Option<String> {
        match flavor {
            FeedFlavor::Mercurial => Some(format!("https://{hostname}/{repo}/atom-tags")),
            FeedFlavor::Gitea => Some(format!("https://{hostname}/{repo}/tags.atom")),
            FeedFlavor::SourceForge => Some(format!("https://{hostname}/projects/{repo}/rss?path=/")),
            FeedFlavor::Wikipedia => None,
            FeedFlavor::Generic => Self::discover_feed(hostname, http),
        }
    }

    /// Scans the homepage for an RSS/Atom `<link rel="alternate">`, falling
    /// back to anchors whose href mentions rss/xml/feed.
    fn discover_feed(hostname: &str, http: &HttpSession) -> Option<String> {
        let home = format!("https://{hostname}/");
        let body = http.get(&home).ok()?;
        let doc = Html::parse_document(&body);
        let link_sel = Selector::parse(r#"link[rel="alternate"]"#).ok()?;
        for el in doc.select(&link_sel) {
            let ty = el.value().attr("type").unwrap_or("");
            if ty.contains("rss") || ty.contains("xml") {
                if let Some(href) = el.value().attr("href") {
                    return Some(resolve_href(hostname, href));
                }
            }
        }
        let a_sel = Selector::parse("a").ok()?;
        for el in doc.select(&a_sel) {
            if let Some(href) = el.value().attr("href") {
                if href.contains("xml") || href.contains("rss") || href.contains("feed") {
                    return Some(resolve_href(hostname, href));
                }
            }
        }
        None
    }

    fn parse_feed(&self, body: &str) -> Option<(String, crate::version::Version, DateTime<Utc>, Option<String>)> {
        let feed = feed_rs::parser::parse(body.as_bytes()).ok()?;
        let mut best: Option<(String, crate::version::Version, DateTime<Utc>, Option<String>)> = None;
        for entry in feed.entries {
            let title = entry.title.map(|t| t.content).unwrap_or_default();
            let tag_date = entry
                .published
                .or(entry.updated)
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(Utc::now);
            let Some(version) = sanitize_version(self.name(), &self.filters, &title, false) else {
                continue;
            };
            let better = match &best {
                Some((_, best_version, ..)) => &version > best_version,
                None => true,
            };
            if better {
                let link = entry.links.first().map(|l| l.href.clone());
                best = Some((title, version, tag_date, link));
            }
        }
        best
    }

    /// SourceForge RSS entries link to the file's HTML landing page;
    /// rewrite that into the direct `downloads.sourceforge.net` URL.
    fn rewrite_sourceforge_download(&self, link: &str) -> Option<String> {
        let rest = link.split("/projects/").nth(1)?;
        let mut parts = rest.trim_end_matches('/').splitn(2, "/files/");
        let project = parts.next()?;
        let file_path = parts.next()?.trim_end_matches("/download");
        Some(format!("https://downloads.sourceforge.net/{project}/{file_path}"))
    }

    fn get_from_wikipedia_infobox(&self) -> Option<Release> {
        let url = format!("https://{}/wiki/{}", self.hostname, self.repo);
        let body = self.http.get(&url).ok()?;
        let doc = Html::parse_document(&body);
        let infobox_sel = Selector::parse(".infobox").ok()?;
        let infobox = doc.select(&infobox_sel).next()?;
        let data_sel = Selector::parse(".infobox-data").ok()?;
        let text = infobox
            .select(&data_sel)
            .next()?
            .text()
            .collect::<String>();
        let tag_name = text
            .split_whitespace()
            .filter(|w| !w.chars().all(char::is_alphabetic))
            .collect::<Vec<_>>()
            .join(" ");
        let version = sanitize_version(self.name(), &self.filters, &tag_name, false)?;
        Some(Release::new(tag_name, version, Utc::now()))
    }
}

fn resolve_href(hostname: &str, href: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else {
        format!("https://{hostname}/{}", href.trim_start_matches('/'))
    }
}

impl Holder for FeedHolder {
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
        match self.flavor {
            FeedFlavor::Wikipedia => true,
            _ => self.feed_url.is_some(),
        }
    }

    fn get_latest(&self) -> Result<Option<Release>> {
        if self.flavor == FeedFlavor::Wikipedia {
            return Ok(self.get_from_wikipedia_infobox());
        }
        let Some(feed_url) = &self.feed_url else {
            return Ok(None);
        };
        let body = self.http.get(feed_url)?;
        Ok(self.parse_feed(&body).map(|(tag, version, date, link)| {
            let mut release = Release::new(tag, version, date);
            if self.flavor == FeedFlavor::SourceForge {
                release.source_download_url = link.and_then(|l| self.rewrite_sourceforge_download(&l));
            }
            release
        }))
    }

    fn release_download_url(&self, release: &Release, _shorter: bool) -> Option<String> {
        match self.flavor {
            FeedFlavor::Mercurial => {
                let ext = if cfg!(target_os = "windows") { "zip" } else { "tar.gz" };
                Some(format!(
                    "https://{}/{}/archive/{}.{}",
                    self.hostname, self.repo, release.tag_name, ext
                ))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../tests/feed_tests.rs"]
mod tests;
