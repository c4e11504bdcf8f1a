//! Persisted aggregate sizes for quick scans.
//!
//! The whole cache is one JSON document mapping absolute directory paths to
//! their last computed totals. Every operation is a whole-document
//! read-modify-write with no locking; concurrent writers may lose updates,
//! which only costs a recomputation on a later scan.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CacheError;

use super::meta::now_secs;
use super::state::Totals;

/// Name of the cache document inside the cache directory
pub const CACHE_FILE_NAME: &str = "directory_sizes.json";

/// Cached totals for one directory subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub size: u64,
    #[serde(default)]
    pub files: u64,
    #[serde(default)]
    pub dirs: u64,
    /// Unix seconds at which the entry was written
    pub timestamp: u64,
    /// Scan settings the totals were computed under; empty when unknown
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub fingerprint: String,
}

impl CacheEntry {
    pub fn totals(&self) -> Totals {
        Totals {
            size: self.size,
            files: self.files,
            dirs: self.dirs,
        }
    }

    fn is_fresh(&self, now: u64, expiry_secs: u64) -> bool {
        now.saturating_sub(self.timestamp) <= expiry_secs
    }
}

/// The full persisted document, keyed by absolute path
pub type CacheDocument = BTreeMap<String, CacheEntry>;

/// Handle to a cache document on disk.
#[derive(Debug, Clone)]
pub struct SizeCache {
    file: PathBuf,
    expiry_secs: u64,
}

impl SizeCache {
    /// Cache backed by an explicit document path
    pub fn new(file: impl Into<PathBuf>, expiry_secs: u64) -> Self {
        Self {
            file: file.into(),
            expiry_secs,
        }
    }

    /// Cache stored as `directory_sizes.json` inside `dir`
    pub fn in_dir(dir: &Path, expiry_secs: u64) -> Self {
        Self::new(dir.join(CACHE_FILE_NAME), expiry_secs)
    }

    /// Cache under the user's cache directory (`~/.cache/sizewalk` on Linux)
    pub fn default_location(expiry_secs: u64) -> Result<Self, CacheError> {
        let dir = dirs::cache_dir().ok_or(CacheError::NoCacheDir)?;
        Ok(Self::in_dir(&dir.join("sizewalk"), expiry_secs))
    }

    pub fn file_path(&self) -> &Path {
        &self.file
    }

    pub fn expiry_secs(&self) -> u64 {
        self.expiry_secs
    }

    /// Load every entry. A missing document is an empty cache.
    pub fn load_all(&self) -> Result<CacheDocument, CacheError> {
        let content = match fs::read_to_string(&self.file) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(CacheDocument::new()),
            Err(source) => {
                return Err(CacheError::Read {
                    path: self.file.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&content).map_err(|source| CacheError::Parse {
            path: self.file.clone(),
            source,
        })
    }

    fn save_all(&self, doc: &CacheDocument) -> Result<(), CacheError> {
        let write_err = |source| CacheError::Write {
            path: self.file.clone(),
            source,
        };

        if let Some(parent) = self.file.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let json = serde_json::to_string_pretty(doc)
            .map_err(|e| write_err(std::io::Error::new(ErrorKind::InvalidData, e)))?;
        fs::write(&self.file, json).map_err(write_err)
    }

    /// Load for a mutation; an unreadable or corrupt document starts over empty
    fn load_for_update(&self) -> CacheDocument {
        self.load_all().unwrap_or_else(|err| {
            tracing::debug!(%err, "Discarding unusable cache document");
            CacheDocument::new()
        })
    }

    /// Fresh entry for `path`, if any
    pub fn get(&self, path: &Path) -> Option<CacheEntry> {
        self.get_at(path, now_secs())
    }

    /// Fresh entry for `path` as of `now` (unix seconds)
    pub fn get_at(&self, path: &Path, now: u64) -> Option<CacheEntry> {
        let mut doc = match self.load_all() {
            Ok(doc) => doc,
            Err(err) => {
                tracing::debug!(%err, "Cache unavailable, treating as miss");
                return None;
            }
        };

        doc.remove(&cache_key(path))
            .filter(|entry| entry.is_fresh(now, self.expiry_secs))
    }

    /// Cached subtree size for `path`, if fresh
    pub fn get_cached_size(&self, path: &Path) -> Option<u64> {
        self.get(path).map(|entry| entry.size)
    }

    /// Upsert an entry as given
    pub fn set_entry(&self, path: &Path, entry: CacheEntry) -> Result<(), CacheError> {
        let mut doc = self.load_for_update();
        doc.insert(cache_key(path), entry);
        self.save_all(&doc)
    }

    /// Upsert the totals for `path` computed under `fingerprint`, stamped
    /// with the current time
    pub fn set_totals(
        &self,
        path: &Path,
        totals: Totals,
        fingerprint: &str,
    ) -> Result<(), CacheError> {
        self.set_entry(
            path,
            CacheEntry {
                size: totals.size,
                files: totals.files,
                dirs: totals.dirs,
                timestamp: now_secs(),
                fingerprint: fingerprint.to_owned(),
            },
        )
    }

    /// Best-effort upsert of a size; persistence failures are logged and dropped
    pub fn set_cached_size(&self, path: &Path, size: u64) {
        let totals = Totals {
            size,
            ..Totals::default()
        };
        if let Err(err) = self.set_totals(path, totals, "") {
            tracing::debug!(%err, path = %path.display(), "Failed to persist cache entry");
        }
    }

    /// Remove one entry; returns whether it existed
    pub fn remove(&self, path: &Path) -> Result<bool, CacheError> {
        let mut doc = self.load_all()?;
        if doc.remove(&cache_key(path)).is_none() {
            return Ok(false);
        }
        self.save_all(&doc)?;
        Ok(true)
    }

    /// Delete the whole document
    pub fn clear(&self) -> Result<(), CacheError> {
        match fs::remove_file(&self.file) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CacheError::Write {
                path: self.file.clone(),
                source,
            }),
        }
    }

    /// Remove the entry for `path`, or the whole cache when `path` is None
    pub fn clear_cache(&self, path: Option<&Path>) -> Result<(), CacheError> {
        match path {
            Some(path) => self.remove(path).map(|_| ()),
            None => self.clear(),
        }
    }
}

fn cache_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
