//! The default `get` action: resolve the latest release and print it in
//! the requested format, mirroring the tail end of `main()` after `latest()`
//! returns in the original CLI.

use super::{asset_urls, assets_filter_regex, effective_format, resolve_query, sem_level};
use crate::cli::{Cli, OutputFormat};
use crate::error::LastVersionError;
use crate::version::Version;
use std::process::ExitCode;

pub fn run(cli: &Cli) -> ExitCode {
    let (repo, major_from_shorthand) = crate::cli::split_repo_major(&cli.repo);
    let major = cli.major.clone().or(major_from_shorthand);

    // If `repo` is itself a bare version (not a project specifier) and
    // `-gt` was given, this is a pure version comparison: no network call.
    if let Some(newer_than) = &cli.newer_than {
        if let Ok(candidate) = Version::parse(&repo, true) {
            if let Ok(baseline) = Version::parse(newer_than, true) {
                let sem = sem_level(cli.sem);
                let (candidate, baseline) = match sem {
                    Some(level) => (candidate.sem_extract_base(level), baseline.sem_extract_base(level)),
                    None => (candidate, baseline),
                };
                let winner = std::cmp::max(&candidate, &baseline);
                println!("{winner}");
                return ExitCode::from(if candidate <= baseline { 2 } else { 0 });
            }
        }
    }

    let outcome = match resolve_query(cli, &repo, major) {
        Ok(outcome) => outcome,
        Err(LastVersionError::Credentials(msg)) => {
            log::error!("no credentials available for {msg}");
            if std::env::var("GITHUB_API_TOKEN").is_err() && std::env::var("GITHUB_TOKEN").is_err() {
                log::error!("set GITHUB_API_TOKEN (or GITHUB_TOKEN) to raise your rate limit and avoid this");
            }
            return ExitCode::from(4);
        }
        Err(e) => {
            log::error!("{e}");
            return ExitCode::from(e.exit_code() as u8);
        }
    };

    let format = effective_format(cli);

    let Some(outcome) = outcome else {
        if format == OutputFormat::Assets {
            return ExitCode::from(3);
        }
        log::error!("no release was found");
        return ExitCode::from(1);
    };

    let release = &outcome.release;
    let sem = sem_level(cli.sem);

    match format {
        OutputFormat::Assets => {
            let urls = asset_urls(release, outcome.source_url.as_deref(), assets_filter_regex(cli).as_ref());
            if urls.is_empty() {
                return ExitCode::from(3);
            }
            println!("{}", urls.join("\n"));
            ExitCode::SUCCESS
        }
        OutputFormat::Source => match &outcome.source_url {
            Some(url) => {
                println!("{url}");
                ExitCode::SUCCESS
            }
            None => {
                log::error!("no source URL available for {}", release.tag_name);
                ExitCode::from(1)
            }
        },
        OutputFormat::Json => {
            match serde_json::to_string(release) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    log::error!("failed to serialize release: {e}");
                    return ExitCode::from(1);
                }
            }
            ExitCode::SUCCESS
        }
        OutputFormat::Tag => {
            println!("{}", release.tag_name);
            ExitCode::SUCCESS
        }
        OutputFormat::Version => {
            let Some(version) = release.version() else {
                log::error!("release {} has no parseable version", release.tag_name);
                return ExitCode::from(1);
            };
            let printed = match sem {
                Some(level) => version.sem_extract_base(level),
                None => version.clone(),
            };
            println!("{printed}");

            if let Some(newer_than) = &cli.newer_than {
                let Ok(baseline) = Version::parse(newer_than, true) else {
                    log::error!("failed to parse --newer-than version: {newer_than}");
                    return ExitCode::from(1);
                };
                let baseline = match sem {
                    Some(level) => baseline.sem_extract_base(level),
                    None => baseline,
                };
                if printed <= baseline {
                    return ExitCode::from(2);
                }
            }
            ExitCode::SUCCESS
        }
    }
}

#[cfg(test)]
#[path = "../tests/get_cmd_tests.rs"]
mod tests;
