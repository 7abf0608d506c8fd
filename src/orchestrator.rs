//! Ties the holder factory, filters, and release cache together behind one
//! `latest()` entry point, mirroring `lastversion.lastversion.latest`.

use crate::cache::ReleaseCache;
use crate::config::ConfigManager;
use crate::error::{LastVersionError, Result};
use crate::factory;
use crate::holder::{Holder, HolderFilters};
use crate::release::Release;
use crate::version::Version;
use std::path::PathBuf;

/// Selection filters plus output-shaping knobs, gathered from the CLI's
/// flags into one value the orchestrator threads through to the holder.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub repo: String,
    pub pre_ok: bool,
    pub major: Option<String>,
    pub only: Option<String>,
    pub at: Option<String>,
    pub having_asset: Option<String>,
    pub exclude: Option<String>,
    pub even: bool,
    pub formal: bool,
}

impl Query {
    /// Composite cache key mirroring `latest()`'s `cache_key_params`.
    fn cache_key(&self) -> String {
        format!(
            "{}|{:?}|{:?}|{:?}|{:?}|{:?}|{:?}|{}",
            self.repo,
            self.pre_ok,
            self.major,
            self.only,
            self.at,
            self.having_asset,
            self.exclude,
            self.even
        )
    }
}

/// The resolved outcome of a `latest()` call: the release, the holder's
/// canonical link, and the source/download URLs worth surfacing.
pub struct Outcome {
    pub release: Release,
    pub canonical_link: String,
    pub source_url: Option<String>,
}

/// Resolves `query.repo` to a holder, applies filters, and returns the best
/// matching release. Falls back to stale release-cache data on a transient
/// network error, matching the `network_errors` catch block in the original.
pub fn latest(query: &Query, cache: Option<&ReleaseCache>) -> Result<Option<Outcome>> {
    let cache_key = query.cache_key();

    if let Some(cache) = cache {
        if let Some(release) = cache.get(&cache_key) {
            log::info!("using cached release data for: {}", query.repo);
            let canonical_link = query.repo.clone();
            let source_url = release.source_download_url.clone();
            return Ok(Some(Outcome {
                release,
                canonical_link,
                source_url,
            }));
        }
    }

    let result = resolve(query);

    match result {
        Ok(outcome) => {
            if let (Some(cache), Some(outcome)) = (cache, &outcome) {
                cache.set(&cache_key, &outcome.release);
            }
            Ok(outcome)
        }
        Err(LastVersionError::Transient(e)) => {
            log::warn!("network/API error while fetching release data: {e}");
            if let Some(cache) = cache {
                if let Some(release) = cache.get_stale(&cache_key) {
                    log::warn!(
                        "network/API error occurred; returning stale cached data for: {}",
                        query.repo
                    );
                    let canonical_link = query.repo.clone();
                    let source_url = release.source_download_url.clone();
                    return Ok(Some(Outcome {
                        release,
                        canonical_link,
                        source_url,
                    }));
                }
            }
            Err(LastVersionError::Transient(e))
        }
        Err(e) => Err(e),
    }
}

fn resolve(query: &Query) -> Result<Option<Outcome>> {
    let mut holder = factory::get_instance_for_repo(&query.repo, query.at.as_deref())?;

    let filters = HolderFilters {
        only: query.only.clone(),
        exclude: query.exclude.clone(),
        even: query.even,
        formal: query.formal,
        having_asset: query.having_asset.clone(),
        branches: holder.filters().branches.clone(),
        pre_ok: query.pre_ok,
        major: query.major.clone(),
    };
    holder.set_filters(filters);

    let release = match holder.get_latest()? {
        Some(r) => r,
        None => return Ok(None),
    };

    log::info!(
        "located the latest release tag {} at: {}",
        release.tag_name,
        holder.get_canonical_link()
    );

    let canonical_link = holder.get_canonical_link();
    let source_url = holder.release_download_url(&release, false);

    Ok(Some(Outcome {
        release,
        canonical_link,
        source_url,
    }))
}

/// Applies `-gt`/`--newer-than`: returns `true` if `candidate` is strictly
/// newer than `baseline`.
pub fn is_newer_than(candidate: &Version, baseline: &Version) -> bool {
    candidate > baseline
}

/// Builds the release cache from `ConfigManager` settings, or `None` if the
/// user passed `--no-cache` or the config disables it.
pub fn build_release_cache(config: &ConfigManager, no_cache: bool) -> Option<ReleaseCache> {
    if no_cache || !config.release_cache_enabled() {
        return None;
    }
    let dir = release_cache_dir(config);
    Some(ReleaseCache::new(dir, config.release_cache_ttl()))
}

fn release_cache_dir(config: &ConfigManager) -> PathBuf {
    config.file_cache_dir().join("release_cache")
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
