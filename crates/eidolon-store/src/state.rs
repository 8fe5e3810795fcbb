#![forbid(unsafe_code)]

//! Key/value existence cache.
//!
//! The state cache mirrors "this variant exists" facts so the hot path can
//! skip storage round-trips. The filesystem remains the source of truth:
//! entries may be missing or stale and callers must treat them as hints.

use std::{collections::HashMap, path::PathBuf};

use async_trait::async_trait;

use crate::{StoreResult, disk::persist_atomic};

/// Key/value existence-tracking cache.
///
/// ## Normative
/// - Values are opaque strings chosen by higher layers.
/// - `delete` of a missing key is `Ok`.
/// - Implementations are best-effort: a lost entry is a cache miss, never
///   data loss.
#[async_trait]
pub trait StateCache: Send + Sync + 'static {
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    async fn delete(&self, key: &str) -> StoreResult<()>;
}

/// [`StateCache`] persisted as one JSON object in a single file.
///
/// Every mutation loads the file, applies the change, and rewrites it
/// atomically. Missing or corrupted files read as an empty map (best-effort,
/// the cache can always be rebuilt from the blob tree).
#[derive(Clone, Debug)]
pub struct JsonStateCache {
    path: PathBuf,
}

impl JsonStateCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> HashMap<String, String> {
        let Ok(raw) = tokio::fs::read(&self.path).await else {
            return HashMap::new();
        };
        serde_json::from_slice(&raw).unwrap_or_default()
    }

    fn store(&self, entries: &HashMap<String, String>) -> StoreResult<()> {
        let bytes = serde_json::to_vec(entries)?;
        persist_atomic(&self.path, &bytes)
    }
}

#[async_trait]
impl StateCache for JsonStateCache {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.load().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self.load().await;
        entries.insert(key.to_string(), value.to_string());
        self.store(&entries)
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        let mut entries = self.load().await;
        if entries.remove(key).is_some() {
            self.store(&entries)?;
        }
        Ok(())
    }
}
