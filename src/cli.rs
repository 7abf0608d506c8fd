use clap::{Parser, ValueEnum};

/// Actions `<tool> [action] <repo-or-url> [flags]` can run. `action` is
/// optional and defaults to `Get`; see [`normalize_action_arg`] for how the
/// CLI figures out whether the first positional was an action or the repo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum Action {
    Get,
    Download,
    Extract,
    Unzip,
    Install,
    UpdateSpec,
    Test,
    Format,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    Version,
    Assets,
    Source,
    Json,
    Tag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum SemChoice {
    Major,
    Minor,
    Patch,
    Any,
}

#[derive(Parser, Debug)]
#[command(name = "lastversion")]
#[command(about = "Find the latest stable release of any project")]
pub struct Cli {
    /// Action to run. Default: get
    #[arg(value_enum)]
    pub action: Action,

    /// Repository in format owner/name, any URL belonging to it, a known
    /// project name, a `.spec`/`.yml` file path, or (for test/format) a
    /// bare version string
    pub repo: String,

    /// Include pre-releases in potential versions
    #[arg(long)]
    pub pre: bool,

    /// Include only formally tagged versions
    #[arg(long)]
    pub formal: bool,

    /// Semantic versioning level base to print or compare against
    #[arg(long, value_enum)]
    pub sem: Option<SemChoice>,

    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Download with an optional custom filename. `-o` is accepted as an
    /// alias for `-d` (rewritten before clap parses, same reasoning as
    /// `-gt` above).
    #[arg(short = 'd', long = "download", alias = "output", num_args = 0..=1, default_missing_value = "")]
    pub download: Option<String>,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Shortcut for --format=assets
    #[arg(long)]
    pub assets: bool,

    /// Shortcut for --format=source
    #[arg(long)]
    pub source: bool,

    /// Output only if the latest version is newer than this one. `-gt` is
    /// accepted too (rewritten to `--newer-than` before clap ever sees it,
    /// since clap's short options are single-character only).
    #[arg(long = "newer-than", value_name = "VER")]
    pub newer_than: Option<String>,

    /// Only consider releases of a specific major version, e.g. 2.1.x
    #[arg(short = 'b', long = "major", visible_alias = "branch", value_name = "MAJOR")]
    pub major: Option<String>,

    /// Only consider releases containing this text/regex
    #[arg(long, value_name = "REGEX")]
    pub only: Option<String>,

    /// Only consider releases NOT containing this text/regex
    #[arg(long, value_name = "REGEX")]
    pub exclude: Option<String>,

    /// Filters --assets output by a regular expression
    #[arg(long, value_name = "REGEX")]
    pub filter: Option<String>,

    /// Only consider releases with this asset; flag alone means "any asset"
    #[arg(long, num_args = 0..=1, default_missing_value = "")]
    pub having_asset: Option<String>,

    /// A tiny bit shorter URLs produced
    #[arg(short = 's', long = "shorter-urls")]
    pub shorter_urls: bool,

    /// Only even versions like 1.[2].x are considered stable
    #[arg(long)]
    pub even: bool,

    /// Forces a specific holder instead of automatic dispatch
    #[arg(long)]
    pub at: Option<String>,

    /// Automatically answer yes for all questions
    #[arg(short = 'y', long)]
    pub assumeyes: bool,

    /// Do not use cache for HTTP requests
    #[arg(long)]
    pub no_cache: bool,

    /// Bulk mode: one repo per line, `#` comments
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input: Option<std::path::PathBuf>,
}

/// Splits `repo:MAJOR` shorthand into `(repo, Some(major))`, preserving the
/// `://` of URLs (only a trailing, single, non-URL colon is treated as the
/// major-version separator).
pub fn split_repo_major(repo: &str) -> (String, Option<String>) {
    let is_url = repo.starts_with("https://") || repo.starts_with("http://");
    if is_url && repo.matches(':').count() == 1 {
        return (repo.to_string(), None);
    }
    if let Some(idx) = repo.rfind(':') {
        let (head, tail) = repo.split_at(idx);
        let major = &tail[1..];
        if !major.is_empty() {
            return (head.to_string(), Some(major.to_string()));
        }
    }
    (repo.to_string(), None)
}

const ACTION_WORDS: &[&str] = &[
    "get",
    "download",
    "extract",
    "unzip",
    "install",
    "update-spec",
    "test",
    "format",
];

/// `action` is an optional leading positional; if the first non-flag
/// argument isn't one of [`ACTION_WORDS`], insert the default `get` so
/// clap's two required positionals (`action`, `repo`) always line up.
pub fn normalize_action_arg(args: Vec<String>) -> Vec<String> {
    for (idx, arg) in args.iter().enumerate().skip(1) {
        if arg.starts_with('-') {
            continue;
        }
        if !ACTION_WORDS.contains(&arg.as_str()) {
            let mut out = args.clone();
            out.insert(idx, "get".to_string());
            return out;
        }
        break;
    }
    args
}

/// Rewrites legacy two-letter single-dash flags (`-gt`, `-o`) to the long
/// forms clap understands, since clap short options are single-character.
pub fn rewrite_short_aliases(args: Vec<String>) -> Vec<String> {
    args.into_iter()
        .map(|arg| match arg.as_str() {
            "-gt" => "--newer-than".to_string(),
            "-o" => "-d".to_string(),
            other => other.to_string(),
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/cli_tests.rs"]
mod tests;
