//! Dispatches a repo argument (URL or bare name) to the right [`Holder`]
//! implementation, mirroring `HolderFactory.get_instance_for_repo`.

use crate::error::{LastVersionError, Result};
use crate::holder::feed::{FeedFlavor, FeedHolder};
use crate::holder::{
    alpine::AlpineHolder, bitbucket::BitBucketHolder, github::GitHubHolder, gitlab::GitLabHolder,
    helm::HelmHolder, local::LocalHolder, pypi::PypiHolder, system::SystemHolder,
    wordpress::WordPressHolder, Holder,
};
use url::Url;

/// A user `--at` override, or a known-repo table entry, naming which
/// holder kind to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HolderKind {
    GitHub,
    GitLab,
    BitBucket,
    Pypi,
    WordPress,
    Helm,
    Alpine,
    System,
    Local,
    Mercurial,
    Gitea,
    SourceForge,
    Wikipedia,
    WebsiteFeed,
}

impl HolderKind {
    pub fn parse(name: &str) -> Option<HolderKind> {
        Some(match name {
            "github" => HolderKind::GitHub,
            "gitlab" => HolderKind::GitLab,
            "bitbucket" => HolderKind::BitBucket,
            "pip" => HolderKind::Pypi,
            "wp" => HolderKind::WordPress,
            "helm_chart" => HolderKind::Helm,
            "alpine" => HolderKind::Alpine,
            "system" => HolderKind::System,
            "local" => HolderKind::Local,
            "hg" => HolderKind::Mercurial,
            "gitea" => HolderKind::Gitea,
            "sf" => HolderKind::SourceForge,
            "wiki" => HolderKind::Wikipedia,
            "website-feed" => HolderKind::WebsiteFeed,
            _ => return None,
        })
    }

    fn build(self, repo: &str, hostname: Option<&str>) -> Box<dyn Holder> {
        match self {
            HolderKind::GitHub => Box::new(GitHubHolder::new(repo, hostname)),
            HolderKind::GitLab => Box::new(GitLabHolder::new(repo, hostname)),
            HolderKind::BitBucket => Box::new(BitBucketHolder::new(repo, hostname)),
            HolderKind::Pypi => Box::new(PypiHolder::new(repo, hostname)),
            HolderKind::WordPress => Box::new(WordPressHolder::new(repo, hostname)),
            HolderKind::Helm => Box::new(HelmHolder::new(repo, hostname)),
            HolderKind::Alpine => Box::new(AlpineHolder::new(repo, hostname)),
            HolderKind::System => Box::new(SystemHolder::new(repo, hostname)),
            HolderKind::Local => Box::new(LocalHolder::new(repo, hostname)),
            HolderKind::Mercurial => Box::new(FeedHolder::new(
                repo,
                hostname.unwrap_or_default(),
                FeedFlavor::Mercurial,
            )),
            HolderKind::Gitea => Box::new(FeedHolder::new(
                repo,
                hostname.unwrap_or_default(),
                FeedFlavor::Gitea,
            )),
            HolderKind::SourceForge => Box::new(FeedHolder::new(
                repo,
                hostname.unwrap_or("sourceforge.net"),
                FeedFlavor::SourceForge,
            )),
            HolderKind::Wikipedia => Box::new(FeedHolder::new(
                repo,
                hostname.unwrap_or("en.wikipedia.org"),
                FeedFlavor::Wikipedia,
            )),
            HolderKind::WebsiteFeed => Box::new(FeedHolder::new(
                repo,
                hostname.unwrap_or_default(),
                FeedFlavor::Generic,
            )),
        }
    }
}

fn known_by_hostname(hostname: &str) -> Option<HolderKind> {
    let host = hostname.split(':').next().unwrap_or(hostname);
    match host {
        "github.com" => Some(HolderKind::GitHub),
        "gitlab.com" => Some(HolderKind::GitLab),
        "bitbucket.org" => Some(HolderKind::BitBucket),
        "pypi.org" => Some(HolderKind::Pypi),
        "wordpress.org" => Some(HolderKind::WordPress),
        "pkgs.alpinelinux.org" => Some(HolderKind::Alpine),
        "sourceforge.net" => Some(HolderKind::SourceForge),
        "en.wikipedia.org" => Some(HolderKind::Wikipedia),
        _ => {
            if host.starts_with("gitlab.") {
                Some(HolderKind::GitLab)
            } else if host.starts_with("hg.") {
                Some(HolderKind::Mercurial)
            } else {
                None
            }
        }
    }
}

/// `KNOWN_REPOS_BY_NAME`-equivalent: bare names that resolve to a specific
/// holder + repo + hostname combination regardless of the default GitHub
/// fallback.
fn known_by_name(repo: &str) -> Option<(HolderKind, &'static str, Option<&'static str>)> {
    match repo {
        "monit" => Some((HolderKind::BitBucket, "tildeslash/monit", Some("mmonit.com"))),
        "nginx" => Some((HolderKind::Mercurial, "nginx", Some("hg.nginx.org"))),
        "filezilla" => Some((HolderKind::WebsiteFeed, "filezilla", Some("filezilla-project.org"))),
        "rocky" | "rockylinux" => Some((HolderKind::Wikipedia, "Rocky_Linux", None)),
        "fedora" => Some((HolderKind::Wikipedia, "Fedora_(operating_system)", None)),
        _ => None,
    }
}

/// Resolves `repo` (a bare project name or a full URL) to a concrete
/// [`Holder`]. `at` overrides automatic dispatch with an explicit holder
/// kind name (the CLI's `--at` flag).
pub fn get_instance_for_repo(repo: &str, at: Option<&str>) -> Result<Box<dyn Holder>> {
    let (hostname, repo) = if repo.starts_with("http://") || repo.starts_with("https://") {
        let parsed = Url::parse(repo).map_err(|_| LastVersionError::BadProject(repo.to_string()))?;
        let host = parsed.host_str().map(str::to_string);
        let path = parsed.path().trim_start_matches('/').to_string();
        (host, if path.is_empty() { repo.to_string() } else { path })
    } else {
        (None, repo.to_string())
    };

    if let Some(at) = at {
        let kind = HolderKind::parse(at).ok_or_else(|| LastVersionError::BadProject(at.to_string()))?;
        return Ok(kind.build(&repo, hostname.as_deref()));
    }

    if let Some(hostname) = &hostname {
        if let Some(kind) = known_by_hostname(hostname) {
            return Ok(kind.build(&repo, Some(hostname)));
        }
    }

    if let Some((kind, known_repo, known_hostname)) = known_by_name(&repo) {
        return Ok(kind.build(known_repo, known_hostname));
    }

    if let Some(hostname) = &hostname {
        for kind in [
            HolderKind::GitHub,
            HolderKind::GitLab,
            HolderKind::BitBucket,
            HolderKind::Pypi,
            HolderKind::Mercurial,
            HolderKind::Gitea,
        ] {
            let holder = kind.build(&repo, Some(hostname));
            if holder.is_instance() {
                return Ok(holder);
            }
        }

        let generic = FeedHolder::new(&repo, hostname, FeedFlavor::Generic);
        if generic.is_instance() {
            return Ok(Box::new(generic));
        }

        return Err(LastVersionError::BadProject(format!("{repo} at {hostname}")));
    }

    Ok(Box::new(GitHubHolder::new(&repo, None)))
}

#[cfg(test)]
#[path = "tests/factory_tests.rs"]
mod tests;
