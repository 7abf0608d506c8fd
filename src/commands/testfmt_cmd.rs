//! `test`/`format` actions: parse `repo` directly as a version string, with
//! no network access, mirroring the `args.action in ["test", "format"]`
//! branch taken before `latest()` is ever called.

use crate::cli::{Action, Cli};
use crate::version::Version;
use std::process::ExitCode;

pub fn run(cli: &Cli) -> ExitCode {
    let Ok(version) = Version::parse(&cli.repo, true) else {
        log::error!("failed to parse as a valid version");
        return ExitCode::from(1);
    };

    let sem = super::sem_level(cli.sem);
    let version = match sem {
        Some(level) => version.sem_extract_base(level),
        None => version,
    };

    match cli.action {
        Action::Test => {
            println!("Parsed as: {version}");
            println!("Stable: {}", !version.is_prerelease());
        }
        Action::Format => {
            println!("{version}");
        }
        _ => unreachable!("run() is only called for Action::Test / Action::Format"),
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
#[path = "../tests/testfmt_cmd_tests.rs"]
mod tests;
