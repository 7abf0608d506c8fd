//! `install` action: prefers native package formats (RPM/deb) for
//! package-manager integration, falls back to AppImages then standalone
//! binaries, adapted from `install_release`/`install_rpms`/`install_debs`/
//! `install_standalone_binary`/`install_app_image`.

use super::resolve_query;
use crate::cli::Cli;
use crate::download;
use crate::error::LastVersionError;
use crate::http::HttpSession;
use std::path::PathBuf;
use std::process::{Command, ExitCode};

fn applications_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join("Applications"))
}

fn install_standalone_binary(http: &HttpSession, url: &str, install_name: &str) -> anyhow::Result<PathBuf> {
    let apps_dir = applications_dir().ok_or_else(|| anyhow::anyhow!("could not determine home directory"))?;
    std::fs::create_dir_all(&apps_dir)?;
    let downloaded = download::download_to_dir(http, url, &apps_dir, Some(install_name))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&downloaded, std::fs::Permissions::from_mode(0o755))?;
    }
    Ok(downloaded)
}

fn install_app_image(http: &HttpSession, url: &str, install_name: &str) -> anyhow::Result<PathBuf> {
    let install_name = if install_name.ends_with(".AppImage") {
        install_name.to_string()
    } else {
        format!("{install_name}.AppImage")
    };
    install_standalone_binary(http, url, &install_name)
}

fn install_rpms(rpm_urls: &[String], assumeyes: bool) -> ExitCode {
    let mut cmd = Command::new("dnf");
    cmd.arg("install").args(rpm_urls);
    if assumeyes {
        cmd.arg("-y");
    }
    match cmd.status() {
        Ok(status) if status.success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(_) => {
            log::error!("failed to launch dnf for package install");
            ExitCode::from(1)
        }
    }
}

fn install_debs(http: &HttpSession, deb_urls: &[String], assumeyes: bool) -> ExitCode {
    let staging = match tempfile::tempdir() {
        Ok(dir) => dir,
        Err(_) => {
            log::error!("failed to create a temporary directory for deb install");
            return ExitCode::from(1);
        }
    };
    let mut local_debs = Vec::new();
    for url in deb_urls {
        match download::download_to_dir(http, url, staging.path(), None) {
            Ok(path) => local_debs.push(path),
            Err(e) => {
                log::error!("failed to download {url}: {e}");
                return ExitCode::from(1);
            }
        }
    }

    let mut cmd = Command::new("apt");
    cmd.arg("install").args(&local_debs);
    if assumeyes {
        cmd.arg("-y");
    }
    match cmd.status() {
        Ok(status) if status.success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(_) => {
            log::error!("failed to launch apt for package install");
            ExitCode::from(1)
        }
    }
}

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

    let assets = &outcome.release.assets;
    let rpms: Vec<String> = assets.iter().filter(|a| a.name.ends_with(".rpm")).map(|a| a.download_url.clone()).collect();
    if !rpms.is_empty() {
        return install_rpms(&rpms, cli.assumeyes);
    }

    let http = HttpSession::new("lastversion", dirs::cache_dir().map(|d| d.join("lastversion")));

    let debs: Vec<String> = assets.iter().filter(|a| a.name.ends_with(".deb")).map(|a| a.download_url.clone()).collect();
    if !debs.is_empty() {
        return install_debs(&http, &debs, cli.assumeyes);
    }

    let install_name = outcome.release.install_name.clone().unwrap_or_else(|| repo.rsplit('/').next().unwrap_or(&repo).to_string());

    if let Some(app_image) = assets.iter().find(|a| a.name.ends_with(".AppImage")) {
        return match install_app_image(&http, &app_image.download_url, &install_name) {
            Ok(path) => {
                println!("{}", path.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                log::error!("AppImage install failed: {e}");
                ExitCode::from(1)
            }
        };
    }

    if let Some(static_binary) = assets.iter().find(|a| !a.name.contains('.')) {
        return match install_standalone_binary(&http, &static_binary.download_url, &install_name) {
            Ok(path) => {
                println!("{}", path.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                log::error!("standalone binary install failed: {e}");
                ExitCode::from(1)
            }
        };
    }

    log::error!("no installable assets found to install");
    ExitCode::from(1)
}

#[cfg(test)]
#[path = "../tests/install_cmd_tests.rs"]
mod tests;
