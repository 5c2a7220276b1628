// Allow dead code: the cache surface mirrors the browser Cache API
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fetch::FetchedResponse;

/// A named snapshot of captured responses, keyed by request URL.
///
/// One cache version corresponds to one JSON file on disk. Only one version
/// is considered current; the rest are purged when the worker activates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cache {
    name: String,
    pub cached_at: DateTime<Utc>,
    entries: HashMap<String, FetchedResponse>,
}

impl Cache {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cached_at: Utc::now(),
            entries: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn put(&mut self, url: impl Into<String>, response: FetchedResponse) {
        self.entries.insert(url.into(), response);
    }

    pub fn match_url(&self, url: &str) -> Option<&FetchedResponse> {
        self.entries.get(url)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.entries.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            format!("{}h ago", minutes / 60)
        } else {
            format!("{}d ago", minutes / 1440)
        }
    }
}

/// Directory-backed storage for named cache versions.
///
/// Each version lives in its own `{name}.json` file under the cache
/// directory. Writes go through a temp file and rename so a partially
/// written snapshot never becomes current.
pub struct CacheStorage {
    cache_dir: PathBuf,
}

impl CacheStorage {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)?;
        let storage = Self { cache_dir };
        storage.sweep_temp_files();
        Ok(storage)
    }

    /// Remove temp files left behind by a save interrupted between write
    /// and rename. They never become current, so dropping them is safe.
    fn sweep_temp_files(&self) {
        let Ok(entries) = std::fs::read_dir(&self.cache_dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("tmp") {
                debug!(path = %path.display(), "removing orphaned temp file");
                let _ = std::fs::remove_file(path);
            }
        }
    }

    fn version_path(&self, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", name))
    }

    /// Load the named cache version, or an empty one if it does not exist.
    pub fn open(&self, name: &str) -> Result<Cache> {
        let path = self.version_path(name);
        if !path.exists() {
            return Ok(Cache::new(name));
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache version: {}", name))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache version: {}", name))
    }

    pub fn has(&self, name: &str) -> bool {
        self.version_path(name).exists()
    }

    /// Persist a cache version atomically.
    pub fn save(&self, cache: &Cache) -> Result<()> {
        let path = self.version_path(cache.name());
        let tmp = path.with_extension("json.tmp");
        let contents = serde_json::to_string(cache)?;
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to store cache version: {}", cache.name()))?;
        Ok(())
    }

    /// Names of all stored cache versions.
    pub fn version_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.cache_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Delete a cache version. Returns true if it existed.
    pub fn delete(&self, name: &str) -> Result<bool> {
        let path = self.version_path(name);
        if !path.exists() {
            return Ok(false);
        }
        debug!(version = name, "deleting cache version");
        std::fs::remove_file(path)?;
        Ok(true)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn response(body: &str) -> FetchedResponse {
        FetchedResponse {
            status: 200,
            headers: HashMap::new(),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_put_and_match() {
        let mut cache = Cache::new("v1");
        cache.put("/index.html", response("<html>"));

        assert_eq!(cache.len(), 1);
        assert!(cache.match_url("/index.html").is_some());
        assert!(cache.match_url("/missing").is_none());
    }

    #[test]
    fn test_save_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let storage = CacheStorage::new(dir.path().to_path_buf()).unwrap();

        let mut cache = Cache::new("clamping-admin-v1");
        cache.put("http://localhost/", response("home"));
        storage.save(&cache).unwrap();

        let reopened = storage.open("clamping-admin-v1").unwrap();
        assert_eq!(reopened.len(), 1);
        assert_eq!(
            reopened.match_url("http://localhost/").unwrap().body_text(),
            "home"
        );
    }

    #[test]
    fn test_open_missing_version_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = CacheStorage::new(dir.path().to_path_buf()).unwrap();

        let cache = storage.open("nope").unwrap();
        assert!(cache.is_empty());
        assert!(!storage.has("nope"));
    }

    #[test]
    fn test_version_names_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let storage = CacheStorage::new(dir.path().to_path_buf()).unwrap();

        storage.save(&Cache::new("v1")).unwrap();
        storage.save(&Cache::new("v2")).unwrap();
        assert_eq!(storage.version_names().unwrap(), vec!["v1", "v2"]);

        assert!(storage.delete("v1").unwrap());
        assert!(!storage.delete("v1").unwrap());
        assert_eq!(storage.version_names().unwrap(), vec!["v2"]);
    }

    #[test]
    fn test_orphaned_temp_files_are_swept() {
        let dir = tempfile::tempdir().unwrap();
        let storage = CacheStorage::new(dir.path().to_path_buf()).unwrap();
        storage.save(&Cache::new("v1")).unwrap();

        // Simulate a save that died between write and rename.
        let orphan = dir.path().join("v2.json.tmp");
        std::fs::write(&orphan, "{").unwrap();

        let storage = CacheStorage::new(dir.path().to_path_buf()).unwrap();
        assert!(!orphan.exists());
        assert_eq!(storage.version_names().unwrap(), vec!["v1"]);
    }

    #[test]
    fn test_age_display() {
        let mut cache = Cache::new("v1");
        assert_eq!(cache.age_display(), "just now");

        cache.cached_at = Utc::now() - Duration::minutes(5);
        assert_eq!(cache.age_display(), "5m ago");

        cache.cached_at = Utc::now() - Duration::hours(3);
        assert_eq!(cache.age_display(), "3h ago");
    }
}
