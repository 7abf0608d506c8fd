pub mod download_cmd;
pub mod extract_cmd;
pub mod get_cmd;
pub mod install_cmd;
pub mod testfmt_cmd;
pub mod update_spec_cmd;

use crate::cli::{Action, Cli, OutputFormat, SemChoice};
use crate::config::ConfigManager;
use crate::error::Result;
use crate::orchestrator::{self, Query};
use crate::version::SemLevel;
use regex::Regex;

pub fn sem_level(sem: Option<SemChoice>) -> Option<SemLevel> {
    match sem {
        Some(SemChoice::Major) => Some(SemLevel::Major),
        Some(SemChoice::Minor) => Some(SemLevel::Minor),
        Some(SemChoice::Patch) => Some(SemLevel::Patch),
        Some(SemChoice::Any) | None => None,
    }
}

/// Resolves the effective output format, applying `--assets`/`--source`
/// shortcuts and the implicit formats `download`/`extract`/`install` force.
pub fn effective_format(cli: &Cli) -> OutputFormat {
    if cli.assets {
        return OutputFormat::Assets;
    }
    if cli.source {
        return OutputFormat::Source;
    }
    if let Some(format) = cli.format {
        return format;
    }
    match cli.action {
        Action::Download => OutputFormat::Source,
        Action::Extract | Action::Unzip => OutputFormat::Source,
        Action::Install => OutputFormat::Json,
        _ => OutputFormat::Version,
    }
}

pub fn assets_filter_regex(cli: &Cli) -> Option<Regex> {
    cli.filter.as_deref().and_then(|p| Regex::new(p).ok())
}

/// Runs the orchestrator for `cli`, building the [`Query`] from its
/// selection flags. Shared by every action except `test`/`format` (which
/// never touch the network) and `update-spec` (which has its own spec-file
/// derived filters).
pub fn resolve_query(cli: &Cli, repo: &str, major: Option<String>) -> Result<Option<orchestrator::Outcome>> {
    let config = ConfigManager::load_or_default()?;
    let cache = orchestrator::build_release_cache(&config, cli.no_cache);

    let query = Query {
        repo: repo.to_string(),
        pre_ok: cli.pre,
        major,
        only: cli.only.clone(),
        at: cli.at.clone(),
        having_asset: cli.having_asset.clone(),
        exclude: cli.exclude.clone(),
        even: cli.even,
        formal: cli.formal,
    };

    orchestrator::latest(&query, cache.as_ref())
}

/// Replicates `Holder::get_assets`'s selection logic without needing the
/// holder itself, since the orchestrator only returns the resolved
/// [`crate::release::Release`] and its source URL.
pub fn asset_urls(
    release: &crate::release::Release,
    source_url: Option<&str>,
    assets_filter: Option<&Regex>,
) -> Vec<String> {
    let mut urls = Vec::new();

    if !release.assets.is_empty() {
        let arch_matched: Vec<_> = if assets_filter.is_none() && std::env::consts::ARCH == "x86_64" {
            release.assets.iter().filter(|a| a.name.contains("x86_64")).collect()
        } else {
            Vec::new()
        };
        let candidates: Vec<_> = if !arch_matched.is_empty() {
            arch_matched
        } else {
            release.assets.iter().collect()
        };
        for asset in candidates {
            if let Some(filter) = assets_filter {
                if !filter.is_match(&asset.name) {
                    continue;
                }
            } else if crate::asset_filter::asset_does_not_belong_to_machine(&asset.name) {
                continue;
            }
            urls.push(asset.download_url.clone());
        }
    } else if let Some(url) = source_url {
        if assets_filter.map(|f| f.is_match(url)).unwrap_or(true) {
            urls.push(url.to_string());
        }
    }

    urls
}

#[cfg(test)]
#[path = "../tests/commands_tests.rs"]
mod tests;
