// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON file cache with atomic replace.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::CacheError;
use crate::models::{Activity, GearMap};

/// Cached activities (ascending by start date) and the gear they reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub activities: Vec<Activity>,
    pub gear: GearMap,
}

/// Write `data` to `path` via a temp file in the same directory and a rename,
/// so a crash mid-write never corrupts the previous contents.
pub fn write_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// One JSON document stored at a fixed path. An empty path disables the cache.
#[derive(Debug, Clone)]
pub struct JsonCache {
    path: PathBuf,
}

impl JsonCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn is_enabled(&self) -> bool {
        !self.path.as_os_str().is_empty()
    }

    /// Read and parse the cache. `Ok(None)` if disabled or not yet written.
    pub fn read<T: DeserializeOwned>(&self) -> Result<Option<T>, CacheError> {
        if !self.is_enabled() {
            return Ok(None);
        }
        let data = match std::fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CacheError::Read {
                    path: self.path.clone(),
                    message: e.to_string(),
                })
            }
        };
        serde_json::from_slice(&data)
            .map(Some)
            .map_err(|e| CacheError::Parse {
                path: self.path.clone(),
                message: e.to_string(),
            })
    }

    /// Serialize and atomically replace the cache. No-op if disabled.
    pub fn write<T: Serialize>(&self, value: &T) -> Result<(), CacheError> {
        if !self.is_enabled() {
            return Ok(());
        }
        let write_err = |message: String| CacheError::Write {
            path: self.path.clone(),
            message,
        };
        let data = serde_json::to_vec(value).map_err(|e| write_err(e.to_string()))?;
        write_atomic(&self.path, &data).map_err(|e| write_err(e.to_string()))?;
        tracing::debug!(path = %self.path.display(), bytes = data.len(), "Cache written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = JsonCache::new(dir.path().join("nope.json"));
        let value: Option<Vec<u32>> = cache.read().unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let cache = JsonCache::new(dir.path().join("gear.json"));
        let mut map = HashMap::new();
        map.insert("b1".to_string(), 3u32);

        cache.write(&map).unwrap();
        cache.write(&map).unwrap(); // replace existing

        let back: HashMap<String, u32> = cache.read().unwrap().unwrap();
        assert_eq!(back, map);
        // No temp files left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_corrupt_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("activities.json");
        std::fs::write(&path, "[{").unwrap();
        let err = JsonCache::new(&path).read::<Vec<Activity>>().unwrap_err();
        assert!(matches!(err, CacheError::Parse { .. }));
    }

    #[test]
    fn test_disabled_cache_is_noop() {
        let cache = JsonCache::new("");
        assert!(!cache.is_enabled());
        cache.write(&vec![1, 2, 3]).unwrap();
        assert!(cache.read::<Vec<u32>>().unwrap().is_none());
    }
}
