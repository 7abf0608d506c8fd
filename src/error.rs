//! Error taxonomy for the library and CLI boundary.
//!
//! Internal, expected conditions (an individual tag failing to parse) are
//! handled locally and never surface as a [`LastVersionError`] — only the
//! outcomes enumerated here cross the library/CLI seam, and [`crate::cli`]
//! maps each variant to one of the exit codes the external interface
//! promises.

use crate::version::InvalidVersion;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LastVersionError {
    #[error("no credentials available for this source: {0}")]
    Credentials(String),

    #[error("could not resolve a project/repository for {0}")]
    BadProject(String),

    #[error(transparent)]
    InvalidVersion(#[from] InvalidVersion),

    #[error("network request failed: {0}")]
    Transient(#[from] reqwest::Error),

    #[error("refusing to extract {0}: path would escape the destination directory")]
    PathTraversal(String),

    #[error("no release matched the requested filters for {0}")]
    NoReleaseFound(String),

    #[error(transparent)]
    Cache(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] serde_yaml::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LastVersionError {
    /// Exit code per the CLI's documented taxonomy. Codes 2 (not-newer-than /
    /// no-change) and 3 (empty asset list) are situational rather than
    /// per-error-variant, so the commands that can produce them exit with
    /// those codes directly instead of going through this mapping.
    pub fn exit_code(&self) -> i32 {
        match self {
            LastVersionError::Credentials(_) => 4,
            LastVersionError::BadProject(_) => 1,
            LastVersionError::NoReleaseFound(_) => 1,
            LastVersionError::Transient(_) => 1,
            LastVersionError::PathTraversal(_) => 1,
            LastVersionError::InvalidVersion(_) => 1,
            LastVersionError::Cache(_) | LastVersionError::Config(_) => 1,
            LastVersionError::Other(_) => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, LastVersionError>;
