//! Streams a release asset/source archive to disk for the `download` and
//! `install` actions, adapted from `src/bin/updater.rs::download_asset`.
//! Unlike the updater (which always knows its target filename up front),
//! this boundary honors `Content-Disposition` and falls back to the URL's
//! last path segment, matching the `-d/-o/--download [FILENAME]` contract.

use crate::error::{LastVersionError, Result};
use crate::http::HttpSession;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

fn filename_from_content_disposition(value: &str) -> Option<String> {
    for part in value.split(';') {
        let part = part.trim();
        if let Some(name) = part.strip_prefix("filename=") {
            return Some(name.trim_matches('"').to_string());
        }
    }
    None
}

fn filename_from_url(url: &str) -> String {
    url.rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("download")
        .split(['?', '#'])
        .next()
        .unwrap_or("download")
        .to_string()
}

/// Downloads `url` into `destination_dir`, using `filename_override` when
/// given, else `Content-Disposition`, else the URL's last segment. Returns
/// the path written to.
pub fn download_to_dir(
    http: &HttpSession,
    url: &str,
    destination_dir: &Path,
    filename_override: Option<&str>,
) -> Result<PathBuf> {
    std::fs::create_dir_all(destination_dir).map_err(LastVersionError::Cache)?;

    let mut response = http
        .feedless_client()
        .get(url)
        .header("User-Agent", "lastversion")
        .send()
        .map_err(LastVersionError::Transient)?;

    if response.status() == reqwest::StatusCode::UNAUTHORIZED {
        return Err(LastVersionError::Credentials(url.to_string()));
    }

    let content_disposition_name = response
        .headers()
        .get(reqwest::header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .and_then(filename_from_content_disposition);

    let filename = filename_override
        .map(str::to_string)
        .or(content_disposition_name)
        .unwrap_or_else(|| filename_from_url(url));

    let destination = destination_dir.join(&filename);
    let mut output = File::create(&destination).map_err(LastVersionError::Cache)?;
    io::copy(&mut response, &mut output).map_err(|e| {
        LastVersionError::Cache(io::Error::new(io::ErrorKind::Other, e.to_string()))
    })?;
    Ok(destination)
}

#[cfg(test)]
#[path = "tests/download_tests.rs"]
mod tests;
