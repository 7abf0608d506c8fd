mod archive;
mod asset_filter;
mod cache;
mod cli;
mod commands;
mod config;
mod download;
mod error;
mod factory;
mod holder;
mod http;
mod logger;
mod orchestrator;
mod release;
mod spec_file;
mod version;

use clap::Parser;
use mimalloc::MiMalloc;
use std::process::ExitCode;

use cli::{Action, Cli};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> ExitCode {
    let raw_args: Vec<String> = std::env::args().collect();
    let args = cli::normalize_action_arg(cli::rewrite_short_aliases(raw_args));

    let mut cli = match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(e) => {
            let code = e.exit_code();
            e.print().ok();
            return ExitCode::from(code.clamp(0, 255) as u8);
        }
    };

    logger::init_console_logging(logger::level_for_verbosity(cli.verbose));

    if cli.assets {
        cli.format = Some(cli::OutputFormat::Assets);
    }
    if cli.source {
        cli.format = Some(cli::OutputFormat::Source);
    }
    if cli.repo.ends_with(".spec") {
        cli.action = Action::UpdateSpec;
    }
    if cli.download.is_some() && cli.action == Action::Get {
        cli.action = Action::Download;
    }

    if cli.input.is_some() {
        return run_bulk(&cli);
    }

    dispatch(&cli)
}

fn dispatch(cli: &Cli) -> ExitCode {
    match cli.action {
        Action::Test | Action::Format => commands::testfmt_cmd::run(cli),
        Action::Download => commands::download_cmd::run(cli),
        Action::Extract | Action::Unzip => commands::extract_cmd::run(cli),
        Action::Install => commands::install_cmd::run(cli),
        Action::UpdateSpec => commands::update_spec_cmd::run(cli),
        Action::Get => commands::get_cmd::run(cli),
    }
}

/// Bulk mode (`-i/--input FILE`): one repo per line, `#` comments, runs
/// each line through the same dispatch as if it were `cli.repo`.
fn run_bulk(cli: &Cli) -> ExitCode {
    let Some(input_path) = &cli.input else {
        unreachable!("run_bulk is only called when cli.input is Some");
    };
    let content = match std::fs::read_to_string(input_path) {
        Ok(content) => content,
        Err(e) => {
            log::error!("failed to read input file {input_path:?}: {e}");
            return ExitCode::from(1);
        }
    };

    let mut worst = ExitCode::SUCCESS;
    let mut any_failed = false;
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut per_repo = clone_cli_with_repo(cli, line.to_string());
        if per_repo.repo.ends_with(".spec") {
            per_repo.action = Action::UpdateSpec;
        }
        let code = dispatch(&per_repo);
        if code != ExitCode::SUCCESS {
            any_failed = true;
        }
    }
    if any_failed {
        worst = ExitCode::from(1);
    }
    worst
}

fn clone_cli_with_repo(cli: &Cli, repo: String) -> Cli {
    Cli {
        action: cli.action,
        repo,
        pre: cli.pre,
        formal: cli.formal,
        sem: cli.sem,
        verbose: cli.verbose,
        download: cli.download.clone(),
        format: cli.format,
        assets: cli.assets,
        source: cli.source,
        newer_than: cli.newer_than.clone(),
        major: cli.major.clone(),
        only: cli.only.clone(),
        exclude: cli.exclude.clone(),
        filter: cli.filter.clone(),
        having_asset: cli.having_asset.clone(),
        shorter_urls: cli.shorter_urls,
        even: cli.even,
        at: cli.at.clone(),
        assumeyes: cli.assumeyes,
        no_cache: cli.no_cache,
        input: None,
    }
}
