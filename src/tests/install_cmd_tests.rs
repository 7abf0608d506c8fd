use super::*;
use clap::Parser;

fn cli_with(args: &[&str]) -> Cli {
    let mut full = vec!["lastversion"];
    full.extend_from_slice(args);
    Cli::try_parse_from(full).expect("cli must parse")
}

#[test]
fn unknown_at_override_exits_one_without_touching_the_network() {
    let cli = cli_with(&["install", "owner/name", "--at", "not-a-real-holder"]);
    let code = run(&cli);
    assert!(code == ExitCode::from(1));
}

#[test]
fn applications_dir_is_under_the_home_directory() {
    let dir = applications_dir().expect("home dir must resolve in a test environment");
    assert!(dir.ends_with("Applications"));
}
