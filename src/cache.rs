//! Release-data cache: a second, higher-level cache layered above
//! [`crate::http::HttpSession`]'s raw response cache. Keyed by repo +
//! active filters, with a TTL and stale-on-error fallback, matching
//! `lastversion.cache.FileCacheBackend`/`ReleaseDataCache`.

use crate::release::Release;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

const CLEANUP_MARKER_FILE: &str = ".last_cleanup";
const CLEANUP_INTERVAL_SECS: u64 = 24 * 3600;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    created_at: u64,
    expires_at: u64,
    release: Release,
}

pub struct ReleaseCache {
    dir: PathBuf,
    ttl_secs: u64,
}

impl ReleaseCache {
    pub fn new(dir: PathBuf, ttl_secs: u64) -> Self {
        let _ = fs::create_dir_all(&dir);
        ReleaseCache { dir, ttl_secs }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        self.dir.join(format!("{:x}.json", hasher.finalize()))
    }

    /// Returns a cached [`Release`] if present and not expired. Use
    /// [`ReleaseCache::get_stale`] for the error-fallback path.
    pub fn get(&self, key: &str) -> Option<Release> {
        let entry = self.read_entry(key)?;
        let now = now_secs();
        if now < entry.expires_at {
            Some(entry.release)
        } else {
            None
        }
    }

    /// Returns a cached release regardless of expiry, for use when the
    /// network call that would refresh it failed.
    pub fn get_stale(&self, key: &str) -> Option<Release> {
        self.read_entry(key).map(|e| e.release)
    }

    pub fn set(&self, key: &str, release: &Release) {
        let now = now_secs();
        let entry = CacheEntry {
            created_at: now,
            expires_at: now + self.ttl_secs,
            release: release.clone(),
        };
        if let Ok(data) = serde_json::to_vec(&entry) {
            let _ = fs::write(self.key_path(key), data);
        }
        self.maybe_cleanup();
    }

    fn read_entry(&self, key: &str) -> Option<CacheEntry> {
        let data = fs::read(self.key_path(key)).ok()?;
        serde_json::from_slice(&data).ok()
    }

    /// Sweeps expired entries at most once per [`CLEANUP_INTERVAL_SECS`],
    /// tracked via a sentinel file's mtime (`cache.py`'s `CLEANUP_MARKER_FILE`).
    fn maybe_cleanup(&self) {
        let marker = self.dir.join(CLEANUP_MARKER_FILE);
        let due = fs::metadata(&marker)
            .and_then(|m| m.modified())
            .map(|m| {
                SystemTime::now()
                    .duration_since(m)
                    .map(|d| d.as_secs() >= CLEANUP_INTERVAL_SECS)
                    .unwrap_or(true)
            })
            .unwrap_or(true);
        if !due {
            return;
        }
        self.cleanup();
        let _ = fs::write(&marker, now_secs().to_string());
    }

    fn cleanup(&self) {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return;
        };
        let now = now_secs();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(cache_entry) = read_entry_at(&path) {
                if cache_entry.expires_at < now {
                    let _ = fs::remove_file(&path);
                }
            }
        }
    }
}

fn read_entry_at(path: &Path) -> Option<CacheEntry> {
    let data = fs::read(path).ok()?;
    serde_json::from_slice(&data).ok()
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
#[path = "tests/cache_tests.rs"]
mod tests;
