//! Reads and rewrites RPM `.spec` files for the `update-spec` action,
//! adapted from `get_repo_data_from_spec`/`update_spec`/`update_spec_commit`.
//! A `.spec` prepared for this tool carries `%global` macros recording which
//! upstream repo feeds it and the filters to apply when checking for a
//! newer release; `update-spec` rewrites `Version:`/`%global upstream_version`
//! (or `Release:`/`%global commit` for snapshot builds) in place once a newer
//! release is found.

use crate::error::{LastVersionError, Result};
use crate::version::Version;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct SpecData {
    pub repo: String,
    pub name: String,
    /// `%{name}` or `%{upstream_name}`, whichever the spec uses in macros.
    pub spec_name_macro: &'static str,
    pub current_version: Option<Version>,
    pub current_commit: Option<String>,
    pub commit_based: bool,
    pub module_of: bool,
    pub only: Option<String>,
    pub exclude: Option<String>,
    pub having_asset: Option<String>,
    pub major: Option<String>,
    pub formal: Option<bool>,
    pub sem: Option<String>,
}

fn shlex_split(line: &str) -> Vec<String> {
    line.split_whitespace().map(|s| s.to_string()).collect()
}

fn third_token(line: &str) -> Option<String> {
    shlex_split(line).into_iter().nth(2)
}

/// Finds the repo URL most likely to be the canonical upstream, preferring
/// `github.com` links, matching `find_preferred_url`.
fn find_preferred_url(urls: &[String]) -> Option<String> {
    urls.iter()
        .find(|u| u.contains("github.com"))
        .or_else(|| urls.first())
        .cloned()
}

/// Parses a `.spec` file into [`SpecData`], mirroring
/// `get_repo_data_from_spec`.
pub fn parse_spec(path: &Path) -> Result<SpecData> {
    let content = fs::read_to_string(path).map_err(LastVersionError::Cache)?;

    let mut name: Option<String> = None;
    let mut upstream_github: Option<String> = None;
    let mut upstream_name: Option<String> = None;
    let mut current_version_str: Option<String> = None;
    let mut spec_repo: Option<String> = None;
    let mut spec_urls: Vec<String> = Vec::new();
    let mut current_commit: Option<String> = None;
    let mut data = SpecData::default();

    for line in content.lines() {
        if let Some(rest) = line.strip_prefix("%global lastversion_repo") {
            spec_repo = third_token(&format!("%global lastversion_repo{rest}"));
        } else if let Some(rest) = line.strip_prefix("%global upstream_github") {
            upstream_github = third_token(&format!("%global upstream_github{rest}"));
        } else if let Some(rest) = line.strip_prefix("%global upstream_name") {
            upstream_name = third_token(&format!("%global upstream_name{rest}"));
        } else if let Some(rest) = line.strip_prefix("%global commit ") {
            current_commit = Some(rest.trim().to_string());
            data.commit_based = true;
        } else if let Some(rest) = line.strip_prefix("Name:") {
            name = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("URL:") {
            spec_urls.push(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("Source0:") {
            let source0 = rest.trim().to_string();
            if source0.starts_with("https://") || source0.starts_with("http://") {
                spec_urls.push(source0);
            }
        } else if let Some(rest) = line.strip_prefix("%global upstream_version ") {
            current_version_str = Some(rest.trim().to_string());
            data.module_of = true;
        } else if let Some(rest) = line.strip_prefix("Version:") {
            if current_version_str.is_none() {
                current_version_str = Some(rest.trim().to_string());
            }
        } else if line.starts_with("%global lastversion_only") {
            data.only = third_token(line);
        } else if line.starts_with("%global lastversion_having_asset") {
            data.having_asset = third_token(line);
        } else if line.starts_with("%global lastversion_major") {
            data.major = third_token(line);
        } else if line.starts_with("%global lastversion_formal") {
            if let Some(value) = third_token(line) {
                data.formal = Some(matches!(
                    value.to_lowercase().as_str(),
                    "1" | "true" | "yes" | "on"
                ));
            }
        } else if line.starts_with("%global lastversion_sem") {
            if let Some(value) = third_token(line) {
                let value = value.to_lowercase();
                if matches!(value.as_str(), "major" | "minor" | "patch") {
                    data.sem = Some(value);
                }
            }
        }
    }

    data.current_commit = current_commit;

    let current_version_str = current_version_str.ok_or_else(|| {
        LastVersionError::Other(anyhow::anyhow!(
            "did not find Version: nor %upstream_version in {}",
            path.display()
        ))
    })?;
    if current_version_str != "x" {
        data.current_version = Some(
            Version::parse(&current_version_str, false)
                .map_err(LastVersionError::InvalidVersion)?,
        );
    }

    if let Some(upstream_name) = upstream_name {
        data.name = upstream_name;
        data.spec_name_macro = "%{upstream_name}";
    } else {
        data.name = name.ok_or_else(|| {
            LastVersionError::Other(anyhow::anyhow!("missing Name: in {}", path.display()))
        })?;
        data.spec_name_macro = "%{name}";
    }

    data.repo = if let Some(upstream_github) = upstream_github {
        format!("{upstream_github}/{}", data.name)
    } else if let Some(spec_repo) = spec_repo {
        spec_repo
    } else {
        find_preferred_url(&spec_urls).ok_or_else(|| {
            LastVersionError::BadProject(format!(
                "could not determine upstream repo from {}",
                path.display()
            ))
        })?
    };

    Ok(data)
}

/// Rewrites `Version:`/`%global upstream_version` (and `%changelog`, if a
/// packager is configured) for a formal-release spec. Returns `Ok(false)`
/// (exit code 2, "no change") when `new_version` is not newer than what the
/// spec already records.
pub fn update_spec(path: &Path, data: &SpecData, new_version: &Version, tag_name: &str) -> Result<bool> {
    if let Some(current) = &data.current_version {
        if new_version <= current {
            return Ok(false);
        }
    }

    let content = fs::read_to_string(path).map_err(LastVersionError::Cache)?;
    let mut out = String::with_capacity(content.len());

    for line in content.lines() {
        if line.starts_with("%global upstream_version ") {
            out.push_str(&format!("%global upstream_version {new_version}"));
        } else if line.starts_with("Version:") && !data.module_of {
            if let Some(idx) = line.find(char::is_whitespace) {
                let (_, rest) = line.split_at(idx);
                let ws_len = rest.len() - rest.trim_start().len();
                out.push_str(&format!("Version:{}{new_version}", &rest[..ws_len]));
            } else {
                out.push_str(line);
            }
        } else {
            out.push_str(line);
        }
        out.push('\n');
    }

    let _ = tag_name;
    fs::write(path, out).map_err(LastVersionError::Cache)?;
    Ok(true)
}

/// Rewrites `%global commit`/`%global commit_date`/`Release:` for a
/// snapshot (commit-based) spec, mirroring `update_spec_commit`. Returns
/// `Ok(false)` (exit code 2) if `commit_sha` is already current.
pub fn update_spec_commit(
    path: &Path,
    data: &SpecData,
    commit_sha: &str,
    commit_date_yyyymmdd: &str,
) -> Result<bool> {
    if data.current_commit.as_deref() == Some(commit_sha) {
        return Ok(false);
    }

    let content = fs::read_to_string(path).map_err(LastVersionError::Cache)?;
    let mut out = String::with_capacity(content.len());
    let mut commit_present = false;
    let mut commit_date_present = false;

    let has_formal_release = data
        .current_version
        .as_ref()
        .map(|v| v.to_string() != "0")
        .unwrap_or(false);

    for line in content.lines() {
        if let Some(_rest) = line.strip_prefix("%global commit ") {
            out.push_str(&format!("%global commit {commit_sha}"));
            commit_present = true;
        } else if line.starts_with("%global commit_date ") {
            out.push_str(&format!("%global commit_date {commit_date_yyyymmdd}"));
            commit_date_present = true;
        } else if line.starts_with("Release:") {
            if let Some(idx) = line.find(char::is_whitespace) {
                let (_, rest) = line.split_at(idx);
                let ws_len = rest.len() - rest.trim_start().len();
                let prefix = if has_formal_release { "1" } else { "0" };
                out.push_str(&format!(
                    "Release:{}{prefix}.%{{snapinfo}}%{{?dist}}",
                    &rest[..ws_len]
                ));
            } else {
                out.push_str(line);
            }
        } else {
            out.push_str(line);
        }
        out.push('\n');
    }

    if !commit_present {
        out = format!("%global commit {commit_sha}\n{out}");
    }
    if !commit_date_present {
        out = format!("%global commit_date {commit_date_yyyymmdd}\n{out}");
    }

    fs::write(path, out).map_err(LastVersionError::Cache)?;
    Ok(true)
}

#[cfg(test)]
#[path = "tests/spec_file_tests.rs"]
mod tests;
