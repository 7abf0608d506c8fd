//! `update-spec` action, and the implicit switch to it when `repo` ends in
//! `.spec`, mirroring `update_spec`/`update_spec_commit`.

use super::sem_level;
use crate::cli::Cli;
use crate::config::ConfigManager;
use crate::error::LastVersionError;
use crate::orchestrator::{self, Query};
use crate::spec_file;
use chrono::Utc;
use std::path::Path;
use std::process::ExitCode;

pub fn run(cli: &Cli) -> ExitCode {
    let path = Path::new(&cli.repo);
    let data = match spec_file::parse_spec(path) {
        Ok(data) => data,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::from(1);
        }
    };

    let sem = sem_level(cli.sem).or(Some(crate::version::SemLevel::Minor));

    let config = match ConfigManager::load_or_default() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::from(1);
        }
    };
    let cache = orchestrator::build_release_cache(&config, cli.no_cache);

    let query = Query {
        repo: data.repo.clone(),
        pre_ok: cli.pre || data.formal == Some(false),
        major: data.major.clone(),
        only: data.only.clone(),
        at: cli.at.clone(),
        having_asset: data.having_asset.clone(),
        exclude: data.exclude.clone(),
        even: cli.even,
        formal: data.formal.unwrap_or(cli.formal),
    };

    let outcome = match orchestrator::latest(&query, cache.as_ref()) {
        Ok(Some(outcome)) => outcome,
        Ok(None) => {
            log::error!("no release was found for {}", data.repo);
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

    let release = outcome.release;
    let Some(new_version) = release.version().cloned() else {
        log::error!("resolved release {} has no parseable version", release.tag_name);
        return ExitCode::from(1);
    };

    if data.commit_based {
        return update_spec_commit(path, &data, &new_version, &release.tag_name);
    }

    if let Some(sem) = sem {
        if let Some(current) = &data.current_version {
            if new_version > *current {
                let current_major = current.major();
                let latest_major = new_version.major();
                if matches!(sem, crate::version::SemLevel::Minor | crate::version::SemLevel::Patch)
                    && latest_major != current_major
                {
                    log::error!(
                        "new version {new_version} fails semantic versioning constraint {sem:?} against current {current}"
                    );
                    return ExitCode::from(4);
                }
                if matches!(sem, crate::version::SemLevel::Patch) && new_version.minor() != current.minor() {
                    log::error!(
                        "new version {new_version} fails semantic versioning constraint {sem:?} against current {current}"
                    );
                    return ExitCode::from(4);
                }
            }
        }
    }

    println!("{new_version}");
    match spec_file::update_spec(path, &data, &new_version, &release.tag_name) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            log::info!("no newer version than already present in spec file");
            ExitCode::from(2)
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::from(1)
        }
    }
}

fn update_spec_commit(
    path: &Path,
    data: &crate::spec_file::SpecData,
    new_version: &crate::version::Version,
    tag_name: &str,
) -> ExitCode {
    let _ = new_version;
    let commit_sha = tag_name;
    let commit_date = Utc::now().format("%Y%m%d").to_string();
    match spec_file::update_spec_commit(path, data, commit_sha, &commit_date) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            log::info!("commit {commit_sha} is already current in spec file");
            ExitCode::from(2)
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
#[path = "../tests/update_spec_cmd_tests.rs"]
mod tests;
