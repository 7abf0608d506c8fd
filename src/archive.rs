//! Archive extraction for the `download`/`extract`/`install` actions,
//! adapted from `src/bin/updater.rs::extract_zip_archive`/`extract_archive`.
//! Unlike the updater (which only ever unpacks its own signed release
//! asset), this boundary extracts arbitrary upstream archives, so every
//! entry path is checked against the destination directory before being
//! written.

use crate::error::{LastVersionError, Result};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// Joins `dest` with `entry_path`, rejecting any entry whose resolved path
/// would land outside `dest` (`..` components, absolute paths).
fn safe_join(dest: &Path, entry_path: &Path) -> Result<PathBuf> {
    let mut resolved = dest.to_path_buf();
    for component in entry_path.components() {
        use std::path::Component;
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(LastVersionError::PathTraversal(
                    entry_path.display().to_string(),
                ));
            }
        }
    }
    if !resolved.starts_with(dest) {
        return Err(LastVersionError::PathTraversal(
            entry_path.display().to_string(),
        ));
    }
    Ok(resolved)
}

pub fn extract_zip(archive_path: &Path, destination_dir: &Path) -> Result<()> {
    let file = File::open(archive_path).map_err(LastVersionError::Cache)?;
    let mut zip = zip::ZipArchive::new(file)
        .map_err(|e| LastVersionError::Other(anyhow::anyhow!("bad zip archive: {e}")))?;

    for idx in 0..zip.len() {
        let mut entry = zip
            .by_index(idx)
            .map_err(|e| LastVersionError::Other(anyhow::anyhow!("bad zip entry: {e}")))?;
        let Some(enclosed) = entry.enclosed_name().map(|p| p.to_path_buf()) else {
            continue;
        };
        let output_path = safe_join(destination_dir, &enclosed)?;

        if entry.is_dir() {
            fs::create_dir_all(&output_path).map_err(LastVersionError::Cache)?;
            continue;
        }
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(LastVersionError::Cache)?;
        }
        let mut output = File::create(&output_path).map_err(LastVersionError::Cache)?;
        io::copy(&mut entry, &mut output).map_err(LastVersionError::Cache)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                fs::set_permissions(&output_path, fs::Permissions::from_mode(mode))
                    .map_err(LastVersionError::Cache)?;
            }
        }
    }
    Ok(())
}

pub fn extract_tar_gz(archive_path: &Path, destination_dir: &Path) -> Result<()> {
    let file = File::open(archive_path).map_err(LastVersionError::Cache)?;
    let decoder = flate2::read::GzDecoder::new(file);
    let mut archive = tar::Archive::new(decoder);
    let entries = archive
        .entries()
        .map_err(|e| LastVersionError::Other(anyhow::anyhow!("bad tar.gz archive: {e}")))?;

    for entry in entries {
        let mut entry = entry.map_err(|e| LastVersionError::Other(anyhow::anyhow!("bad tar entry: {e}")))?;
        let entry_path = entry
            .path()
            .map_err(|e| LastVersionError::Other(anyhow::anyhow!("bad tar entry path: {e}")))?
            .to_path_buf();
        let output_path = safe_join(destination_dir, &entry_path)?;

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(LastVersionError::Cache)?;
        }
        entry.unpack(&output_path).map_err(LastVersionError::Cache)?;
    }
    Ok(())
}

/// Dispatches on `archive_name`'s extension.
pub fn extract(archive_path: &Path, archive_name: &str, destination_dir: &Path) -> Result<()> {
    fs::create_dir_all(destination_dir).map_err(LastVersionError::Cache)?;
    if archive_name.ends_with(".tar.gz") || archive_name.ends_with(".tgz") {
        return extract_tar_gz(archive_path, destination_dir);
    }
    if archive_name.ends_with(".zip") {
        return extract_zip(archive_path, destination_dir);
    }
    Err(LastVersionError::Other(anyhow::anyhow!(
        "unsupported archive format: {archive_name}"
    )))
}

#[cfg(test)]
#[path = "tests/archive_tests.rs"]
mod tests;
