//! Loads `lastversion.yml` from the platform config directory and exposes
//! cache-related settings, mirroring `lastversion.config.Config`. Unlike the
//! teacher's `settings.json` (JSON, written next to the executable), this
//! config is YAML under the platform config dir and is read-only from the
//! CLI's point of view: there is no `add_source`/`remove_source`-style
//! mutation surface, since nothing in this tool persists project lists.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

fn default_release_cache_enabled() -> bool {
    false
}

fn default_release_cache_ttl() -> u64 {
    3600
}

fn default_file_cache_max_age() -> u64 {
    86400
}

fn default_file_cache_max_size() -> u64 {
    100 * 1024 * 1024
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseCacheConfig {
    pub enabled: bool,
    pub ttl: u64,
}

impl Default for ReleaseCacheConfig {
    fn default() -> Self {
        ReleaseCacheConfig {
            enabled: default_release_cache_enabled(),
            ttl: default_release_cache_ttl(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCacheConfig {
    /// `None` means use the platform cache directory.
    pub path: Option<PathBuf>,
    pub max_age: u64,
    pub max_size: u64,
}

impl Default for FileCacheConfig {
    fn default() -> Self {
        FileCacheConfig {
            path: None,
            max_age: default_file_cache_max_age(),
            max_size: default_file_cache_max_size(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub release_cache: ReleaseCacheConfig,
    pub file: FileCacheConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub cache: CacheConfig,
}

pub struct ConfigManager {
    pub config_path: PathBuf,
    config: AppConfig,
}

impl ConfigManager {
    /// Loads `lastversion.yml` if present, deep-merging it over defaults;
    /// does not write a default file to disk the way the teacher's JSON
    /// config does, since an absent file is itself a valid, silent default.
    pub fn load_or_default() -> Result<Self> {
        let config_path = get_config_path()?;
        let config = if config_path.exists() {
            let content = fs::read_to_string(&config_path)
                .with_context(|| format!("failed to read {config_path:?}"))?;
            serde_yaml::from_str(&content)
                .with_context(|| format!("failed to parse {config_path:?}"))?
        } else {
            log::debug!("no config file found at {config_path:?}, using defaults");
            AppConfig::default()
        };

        Ok(Self {
            config_path,
            config,
        })
    }

    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    pub fn release_cache_enabled(&self) -> bool {
        self.config.cache.release_cache.enabled
    }

    pub fn release_cache_ttl(&self) -> u64 {
        self.config.cache.release_cache.ttl
    }

    pub fn file_cache_dir(&self) -> PathBuf {
        self.config
            .cache
            .file
            .path
            .clone()
            .or_else(|| dirs::cache_dir().map(|d| d.join("lastversion")))
            .unwrap_or_else(|| PathBuf::from(".lastversion-cache"))
    }

    pub fn file_cache_max_age(&self) -> u64 {
        self.config.cache.file.max_age
    }

    pub fn file_cache_max_size(&self) -> u64 {
        self.config.cache.file.max_size
    }
}

fn get_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("could not determine platform config directory"))?
        .join("lastversion");
    Ok(config_dir.join("lastversion.yml"))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
