//! Response cache: deterministic keys, get-or-compute, and the bundled
//! memory and JSON-file stores.
//!
//! The wrapper sits in front of provider invocation. Keys are derived from
//! (configured prefix, canonical query token); values are the normalized
//! result sequence serialized as JSON, so a write-then-read round trip
//! reproduces an equivalent sequence. Store failures surface as
//! [`Error::Cache`], never as "no results".

use crate::error::Error;
use crate::query::Query;
use crate::result::Location;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Backing store contract. Implementations must be safe for concurrent
/// `&self` use; the read/write pair is not atomic as a unit, and the benign
/// race where two callers compute the same result and both write it is
/// accepted (idempotent overwrite).
pub trait CacheStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>, String>;
    fn write(&self, key: &str, value: &str) -> Result<(), String>;
}

/// Shared handles work as stores, so several cache users (with their own
/// prefixes) can sit on one physical store.
impl<S: CacheStore + ?Sized> CacheStore for Arc<S> {
    fn read(&self, key: &str) -> Result<Option<String>, String> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), String> {
        (**self).write(key, value)
    }
}

// ─── Cache wrapper ──────────────────────────────────────────────

/// The optional layer between the engine and a provider.
pub struct ResponseCache {
    store: Box<dyn CacheStore>,
    prefix: String,
}

impl ResponseCache {
    pub fn new(store: Box<dyn CacheStore>, prefix: impl Into<String>) -> Self {
        Self { store, prefix: prefix.into() }
    }

    /// The full cache key for a query: prefix + canonical token.
    pub fn key(&self, query: &Query) -> String {
        format!("{}{}", self.prefix, query.cache_token())
    }

    /// Return the stored result set for `query`, or run `compute`, store its
    /// output, and return it. A hit never invokes `compute`.
    pub fn fetch_or_compute<F>(&self, query: &Query, compute: F) -> Result<Vec<Location>, Error>
    where
        F: FnOnce() -> Result<Vec<Location>, Error>,
    {
        let key = self.key(query);
        if let Some(raw) = self.store.read(&key).map_err(Error::Cache)? {
            return serde_json::from_str(&raw)
                .map_err(|e| Error::Cache(format!("undecodable entry at '{}': {}", key, e)));
        }
        let results = compute()?;
        let raw = serde_json::to_string(&results).map_err(|e| Error::Cache(e.to_string()))?;
        self.store.write(&key, &raw).map_err(Error::Cache)?;
        Ok(results)
    }
}

// ─── Memory store ───────────────────────────────────────────────

/// In-process store. Useful for tests and single-process deployments.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), String> {
        self.entries.lock().unwrap().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ─── File store ─────────────────────────────────────────────────

#[derive(Serialize, Deserialize, Clone)]
struct FileEntry {
    value: String,
    written_ms: i64,
}

/// JSON-file store at `~/.waypost/cache.json` (or a caller-supplied path),
/// persisted on every write. Entries carry a write timestamp; with a TTL
/// configured, stale entries read as misses. An unreadable file starts the
/// store empty, but a failed persist is reported, not swallowed.
pub struct FileStore {
    path: PathBuf,
    ttl_ms: Option<i64>,
    entries: Mutex<HashMap<String, FileEntry>>,
}

impl FileStore {
    /// Open the store at the default location (`~/.waypost/cache.json`).
    pub fn open_default() -> Self {
        Self::open(Self::default_path())
    }

    /// Open the store at a specific path (tests use a tempdir).
    pub fn open(path: PathBuf) -> Self {
        let entries = Self::read_file(&path).unwrap_or_default();
        Self { path, ttl_ms: None, entries: Mutex::new(entries) }
    }

    /// Expire entries older than `ttl` on read.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl_ms = Some(ttl.as_millis() as i64);
        self
    }

    fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".waypost")
            .join("cache.json")
    }

    fn read_file(path: &PathBuf) -> Option<HashMap<String, FileEntry>> {
        let data = fs::read_to_string(path).ok()?;
        serde_json::from_str(&data).ok()
    }

    fn fresh(&self, entry: &FileEntry) -> bool {
        match self.ttl_ms {
            Some(ttl) => chrono::Utc::now().timestamp_millis() - entry.written_ms <= ttl,
            None => true,
        }
    }

    fn persist(&self, entries: &HashMap<String, FileEntry>) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let json = serde_json::to_string_pretty(entries).map_err(|e| e.to_string())?;
        fs::write(&self.path, json).map_err(|e| e.to_string())
    }
}

impl CacheStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, String> {
        let entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some(entry) if self.fresh(entry) => Ok(Some(entry.value.clone())),
            _ => Ok(None),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), String> {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            key.to_string(),
            FileEntry {
                value: value.to_string(),
                written_ms: chrono::Utc::now().timestamp_millis(),
            },
        );
        self.persist(&entries)
    }
}
