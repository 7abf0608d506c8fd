//! `download`/`-d`/`-o`/`--download` action.

use super::{asset_urls, assets_filter_regex, effective_format, resolve_query};
use crate::cli::{Cli, OutputFormat};
use crate::download;
use crate::error::LastVersionError;
use crate::http::HttpSession;
use std::path::Path;
use std::process::ExitCode;

pub fn run(cli: &Cli) -> ExitCode {
    let (repo, major_from_shorthand) = crate::cli::split_repo_major(&cli.repo);
    let major = cli.major.clone().or(major_from_shorthand);

    let outcome = match resolve_query(cli, &repo, major) {
        Ok(Some(outcome)) => outcome,
        Ok(None) => {
            log::error!("no release was found");
            return ExitCode::from(1);
        }
        Err(LastVersionError::Credentials(msg)) => {
            log::error!("no credentials available for {msg}");
            return ExitCode::from(4);
        }
        Err(e) => {
            log::error!("{e}");
            return ExitCode::from(e.exit_code() as u8);
        }
    };

    let wants_assets = effective_format(cli) == OutputFormat::Assets;
    let urls = if wants_assets {
        asset_urls(&outcome.release, outcome.source_url.as_deref(), assets_filter_regex(cli).as_ref())
    } else {
        match &outcome.source_url {
            Some(url) => vec![url.clone()],
            None => Vec::new(),
        }
    };

    if urls.is_empty() {
        log::error!("no downloadable URL for {}", outcome.release.tag_name);
        return ExitCode::from(if wants_assets { 3 } else { 1 });
    }

    let http = HttpSession::new("lastversion", dirs::cache_dir().map(|d| d.join("lastversion")));
    let destination_dir = Path::new(".");
    let filename_override = if urls.len() == 1 {
        cli.download.as_deref().filter(|s| !s.is_empty())
    } else {
        None
    };

    for url in &urls {
        log::info!("downloading {url} ...");
        match download::download_to_dir(&http, url, destination_dir, filename_override) {
            Ok(path) => println!("{}", path.display()),
            Err(e) => {
                log::error!("download failed for {url}: {e}");
                return ExitCode::from(1);
            }
        }
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
#[path = "../tests/download_cmd_tests.rs"]
mod tests;
