#![forbid(unsafe_code)]

//! In-memory implementations for ephemeral use and tests.
//!
//! `MemBlobStore` keeps objects in a `DashMap` keyed by relative path;
//! directories exist implicitly as key prefixes. Same trait semantics as
//! [`DiskBlobStore`](crate::DiskBlobStore), so the two are interchangeable
//! behind [`BlobStore`].

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use crate::{
    StateCache, StoreError, StoreResult,
    blob::{BlobStore, DirListing, sanitize_rel},
};

/// In-memory [`BlobStore`].
#[derive(Clone, Debug, Default)]
pub struct MemBlobStore {
    objects: Arc<DashMap<String, Bytes>>,
}

impl MemBlobStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn check(path: &str) -> StoreResult<String> {
        sanitize_rel(path).map_err(|()| StoreError::InvalidPath(path.to_string()))
    }

    fn dir_prefix(dir: &str) -> StoreResult<String> {
        if dir.is_empty() {
            return Ok(String::new());
        }
        Ok(format!("{}/", Self::check(dir)?))
    }
}

#[async_trait]
impl BlobStore for MemBlobStore {
    async fn exists(&self, path: &str) -> StoreResult<bool> {
        Ok(self.objects.contains_key(&Self::check(path)?))
    }

    async fn read(&self, path: &str) -> StoreResult<Bytes> {
        let key = Self::check(path)?;
        self.objects
            .get(&key)
            .map(|entry| entry.clone())
            .ok_or_else(|| {
                StoreError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("no object at {key}"),
                ))
            })
    }

    async fn write(&self, path: &str, data: Bytes) -> StoreResult<()> {
        self.objects.insert(Self::check(path)?, data);
        Ok(())
    }

    async fn delete(&self, path: &str) -> StoreResult<()> {
        self.objects.remove(&Self::check(path)?);
        Ok(())
    }

    async fn list(&self, dir: &str) -> StoreResult<DirListing> {
        let prefix = Self::dir_prefix(dir)?;
        let mut listing = DirListing::default();
        for entry in self.objects.iter() {
            let Some(rest) = entry.key().strip_prefix(&prefix) else {
                continue;
            };
            match rest.split_once('/') {
                Some((child, _)) => {
                    if !listing.dirs.iter().any(|d| d == child) {
                        listing.dirs.push(child.to_string());
                    }
                }
                None => listing.files.push(rest.to_string()),
            }
        }
        listing.dirs.sort();
        listing.files.sort();
        Ok(listing)
    }

    async fn remove_dir(&self, dir: &str) -> StoreResult<()> {
        let prefix = Self::dir_prefix(dir)?;
        if self.objects.iter().any(|e| e.key().starts_with(&prefix)) {
            return Err(StoreError::Failed(format!("directory {dir:?} not empty")));
        }
        Ok(())
    }
}

/// In-memory [`StateCache`].
#[derive(Clone, Debug, Default)]
pub struct MemStateCache {
    entries: Arc<DashMap<String, String>>,
}

impl MemStateCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl StateCache for MemStateCache {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(key).map(|entry| entry.clone()))
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}
