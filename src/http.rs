//! Conditional-cached HTTP session shared by every holder.
//!
//! Mirrors `requests.Session` + `CacheControlAdapter` from the original
//! implementation: a single [`HttpSession`] wraps a `reqwest::blocking::Client`,
//! stores one JSON sidecar file per request URL under `<cache_dir>/http/`,
//! and honors `ETag`/`Expires` without re-fetching bodies that haven't
//! changed. A directory lock, guarded by a PID liveness probe, protects
//! concurrent `lastversion` invocations from corrupting the same cache file.

use crate::error::{LastVersionError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const LOCK_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedResponse {
    status: u16,
    etag: Option<String>,
    expires_at: Option<u64>,
    body: String,
}

pub struct HttpSession {
    client: reqwest::blocking::Client,
    cache_dir: Option<PathBuf>,
    user_agent: String,
}

impl HttpSession {
    pub fn new(user_agent: impl Into<String>, cache_dir: Option<PathBuf>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("reqwest client builds with default TLS backend");
        if let Some(dir) = &cache_dir {
            let _ = fs::create_dir_all(dir.join("http"));
        }
        HttpSession {
            client,
            cache_dir,
            user_agent: user_agent.into(),
        }
    }

    /// A client with no cookie persistence, used for feed requests (the
    /// original clears cookies after feed fetches; we simply never keep
    /// any for them).
    pub fn feedless_client(&self) -> &reqwest::blocking::Client {
        &self.client
    }

    fn cache_path(&self, url: &str) -> Option<PathBuf> {
        let dir = self.cache_dir.as_ref()?;
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        let hex = format!("{:x}", hasher.finalize());
        Some(dir.join("http").join(hex))
    }

    fn read_cached(&self, url: &str) -> Option<CachedResponse> {
        let path = self.cache_path(url)?;
        let data = fs::read(&path).ok()?;
        serde_json::from_slice(&data).ok()
    }

    fn write_cached(&self, url: &str, entry: &CachedResponse) {
        let Some(path) = self.cache_path(url) else {
            return;
        };
        let Some(dir) = self.cache_dir.as_ref() else {
            return;
        };
        let lock = DirLock::acquire(dir, LOCK_TIMEOUT_SECS);
        if lock.is_none() {
            log::debug!("cache write skipped, directory locked: {}", dir.display());
            return;
        }
        if let Ok(data) = serde_json::to_vec(entry) {
            let _ = fs::write(path, data);
        }
    }

    /// GET `url`, honoring a previously cached `ETag`/`Expires` pair. On a
    /// transient network failure, falls back to a stale cached body if one
    /// exists rather than propagating the error, matching the release
    /// cache's own stale-on-error behavior at the layer above.
    pub fn get(&self, url: &str) -> Result<String> {
        self.get_with_auth(url, None)
    }

    /// Same as [`HttpSession::get`], with an optional `Authorization` header
    /// value attached (e.g. `"token ghp_..."`), for adapters that read a
    /// credential from the environment.
    pub fn get_with_auth(&self, url: &str, auth_header: Option<&str>) -> Result<String> {
        let cached = self.read_cached(url);

        if let Some(c) = &cached {
            if let Some(expires_at) = c.expires_at {
                let now = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .unwrap_or_default()
                    .as_secs();
                if now < expires_at {
                    return Ok(c.body.clone());
                }
            }
        }

        let mut req = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent);
        if let Some(auth) = auth_header {
            req = req.header("Authorization", auth);
        }
        if let Some(c) = &cached {
            if let Some(etag) = &c.etag {
                req = req.header("If-None-Match", etag.clone());
            }
        }

        let response = match req.send() {
            Ok(r) => r,
            Err(e) => {
                if let Some(c) = cached {
                    log::warn!("request to {url} failed ({e}), using stale cache");
                    return Ok(c.body);
                }
                return Err(LastVersionError::Transient(e));
            }
        };

        if response.status() == reqwest::StatusCode::NOT_MODIFIED {
            if let Some(c) = cached {
                return Ok(c.body);
            }
        }

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(LastVersionError::Credentials(url.to_string()));
        }

        let status = response.status();
        let etag = response
            .headers()
            .get("etag")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let expires_at = response
            .headers()
            .get("expires")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| httpdate::parse_http_date(v).ok())
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs());

        let body = response
            .text()
            .map_err(LastVersionError::Transient)?;

        self.write_cached(
            url,
            &CachedResponse {
                status: status.as_u16(),
                etag,
                expires_at,
                body: body.clone(),
            },
        );

        Ok(body)
    }

    /// POST a JSON body and return the raw response text, uncached (used
    /// for GraphQL queries, whose response shape depends on the cursor and
    /// so isn't a cache key the ETag/Expires model fits).
    pub fn post_json(&self, url: &str, body: &serde_json::Value, auth_header: Option<&str>) -> Result<String> {
        let mut req = self
            .client
            .post(url)
            .header("User-Agent", &self.user_agent)
            .json(body);
        if let Some(auth) = auth_header {
            req = req.header("Authorization", auth);
        }
        let response = req.send().map_err(LastVersionError::Transient)?;
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(LastVersionError::Credentials(url.to_string()));
        }
        response.text().map_err(LastVersionError::Transient)
    }

    /// GET `url` and return the raw response body, uncached. Used for
    /// binary downloads (release archives, Alpine's `APKINDEX.tar.gz`)
    /// where the two-level string cache doesn't apply.
    pub fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .send()
            .map_err(LastVersionError::Transient)?;
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(LastVersionError::Credentials(url.to_string()));
        }
        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(LastVersionError::Transient)
    }
}

/// Best-effort PID-file directory lock. Stale locks (owning process no
/// longer alive, or lock older than `timeout_secs`) are reclaimed rather
/// than honored.
struct DirLock {
    path: PathBuf,
}

impl DirLock {
    fn acquire(dir: &Path, timeout_secs: u64) -> Option<DirLock> {
        let lock_path = dir.join(".lastversion.lock");
        if let Ok(existing) = fs::read_to_string(&lock_path) {
            if let Ok(pid) = existing.trim().parse::<u32>() {
                let age_ok = fs::metadata(&lock_path)
                    .and_then(|m| m.modified())
                    .map(|m| {
                        SystemTime::now()
                            .duration_since(m)
                            .map(|d| d.as_secs() < timeout_secs)
                            .unwrap_or(false)
                    })
                    .unwrap_or(false);
                if age_ok && pid_is_alive(pid) {
                    return None;
                }
            }
        }
        let _ = fs::write(&lock_path, std::process::id().to_string());
        Some(DirLock { path: lock_path })
    }
}

impl Drop for DirLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

#[cfg(unix)]
fn pid_is_alive(pid: u32) -> bool {
    unsafe { libc::kill(pid as i32, 0) == 0 || std::io::Error::last_os_error().raw_os_error() == Some(libc::EPERM) }
}

#[cfg(windows)]
fn pid_is_alive(pid: u32) -> bool {
    use windows_sys::Win32::Foundation::CloseHandle;
    use windows_sys::Win32::System::Threading::{OpenProcess, PROCESS_QUERY_LIMITED_INFORMATION};
    unsafe {
        let handle = OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, 0, pid);
        if handle == 0 {
            false
        } else {
            CloseHandle(handle);
            true
        }
    }
}

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod tests;
