//! Data model shared by every holder: a resolved [`Release`] and its
//! downloadable [`Asset`]s.

use crate::version::Version;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub name: String,
    pub download_url: String,
    pub size: Option<u64>,
    /// A human-readable label a provider may attach to an asset, distinct
    /// from its filename; `having_asset` matches against either.
    pub label: Option<String>,
    /// A content digest (e.g. `sha256:...`) when the provider supplies one,
    /// surfaced as part of `assets_with_digests` for `json`/`dict` output.
    pub digest: Option<String>,
}

/// A single resolved release, as returned by `Holder::get_latest` and
/// surfaced by the `get`/`download`/`update-spec` CLI actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    /// The tag exactly as reported by the upstream source, before any
    /// `Version` normalization was applied.
    pub tag_name: String,
    #[serde(skip)]
    pub version: Option<Version>,
    /// `version.to_string()`, cached for serialization since `Version`
    /// itself isn't (de)serializable.
    pub version_str: String,
    pub tag_date: DateTime<Utc>,
    pub is_prerelease: bool,
    pub assets: Vec<Asset>,
    /// A canonical download URL for the source archive at this tag, used
    /// when no asset matches the requested filters.
    pub source_download_url: Option<String>,
    /// Preferred filename stem for `download`/`update-spec`, e.g. a
    /// project's canonical distribution name when it differs from the
    /// repository's short name (ported from `enrich_release_info`).
    pub install_name: Option<String>,
}

impl Release {
    pub fn new(tag_name: impl Into<String>, version: Version, tag_date: DateTime<Utc>) -> Self {
        let tag_name = tag_name.into();
        let is_prerelease = version.is_prerelease();
        Release {
            tag_name,
            version_str: version.to_string(),
            version: Some(version),
            tag_date,
            is_prerelease,
            assets: Vec::new(),
            source_download_url: None,
            install_name: None,
        }
    }

    pub fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }
}
