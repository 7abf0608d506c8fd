use super::*;
use clap::Parser;

fn cli_with(args: &[&str]) -> Cli {
    let mut full = vec!["lastversion"];
    full.extend_from_slice(args);
    Cli::try_parse_from(full).expect("cli must parse")
}

#[test]
fn format_prints_the_normalized_version_and_succeeds() {
    let cli = cli_with(&["format", "v1.2.3"]);
    let code = run(&cli);
    assert!(code == ExitCode::SUCCESS);
}

#[test]
fn test_action_succeeds_for_a_parseable_version() {
    let cli = cli_with(&["test", "2.0.0-rc1"]);
    let code = run(&cli);
    assert!(code == ExitCode::SUCCESS);
}

#[test]
fn unparseable_version_exits_one() {
    let cli = cli_with(&["format", "not-a-version-at-all"]);
    let code = run(&cli);
    assert!(code == ExitCode::from(1));
}

#[test]
fn sem_flag_truncates_before_printing() {
    let cli = cli_with(&["format", "3.7.2", "--sem", "minor"]);
    let code = run(&cli);
    assert!(code == ExitCode::SUCCESS);
}
