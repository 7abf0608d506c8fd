use super::*;
use clap::Parser;

fn cli_with(args: &[&str]) -> Cli {
    let mut full = vec!["lastversion"];
    full.extend_from_slice(args);
    Cli::try_parse_from(full).expect("cli must parse")
}

#[test]
fn unknown_at_override_exits_one_without_touching_the_network() {
    let cli = cli_with(&["download", "owner/name", "--at", "not-a-real-holder"]);
    let code = run(&cli);
    assert!(code == ExitCode::from(1));
}
