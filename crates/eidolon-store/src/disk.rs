#![forbid(unsafe_code)]

//! Filesystem-backed [`BlobStore`].
//!
//! Writes go through the write-temp → rename pattern: data lands in a
//! uniquely-named temp file in the target's directory (same filesystem, so
//! the rename is atomic), then replaces the target in one step. The target
//! is always either the old object or the new one.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;

use crate::{
    StoreError, StoreResult,
    blob::{BlobStore, DirListing, sanitize_rel},
};

/// [`BlobStore`] rooted at a directory on the local filesystem.
#[derive(Clone, Debug)]
pub struct DiskBlobStore {
    root: PathBuf,
}

impl DiskBlobStore {
    /// Create a store rooted at `root`. No I/O happens until first use;
    /// `write` creates missing directories on demand.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_path(&self, path: &str) -> StoreResult<PathBuf> {
        let rel = sanitize_rel(path).map_err(|()| StoreError::InvalidPath(path.to_string()))?;
        Ok(self.root.join(rel))
    }

    fn dir_path(&self, dir: &str) -> StoreResult<PathBuf> {
        if dir.is_empty() {
            return Ok(self.root.clone());
        }
        self.file_path(dir)
    }
}

/// Atomically replace `path` with `data`.
///
/// 1. Create a unique temp file next to the target (`tempfile` crate).
/// 2. Write the payload.
/// 3. `persist()` renames over the target and disarms the auto-delete.
pub(crate) fn persist_atomic(path: &Path, data: &[u8]) -> StoreResult<()> {
    let parent = path
        .parent()
        .ok_or_else(|| StoreError::Failed("atomic write: no parent dir".to_string()))?;
    std::fs::create_dir_all(parent)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)
        .map_err(|e| StoreError::Failed(format!("atomic write tmpfile: {e}")))?;
    std::io::Write::write_all(&mut tmp, data)
        .map_err(|e| StoreError::Failed(format!("atomic write: {e}")))?;
    tmp.persist(path)
        .map_err(|e| StoreError::Failed(format!("atomic rename: {e}")))?;
    Ok(())
}

#[async_trait]
impl BlobStore for DiskBlobStore {
    async fn exists(&self, path: &str) -> StoreResult<bool> {
        let path = self.file_path(path)?;
        Ok(tokio::fs::try_exists(&path).await?)
    }

    async fn read(&self, path: &str) -> StoreResult<Bytes> {
        let path = self.file_path(path)?;
        Ok(Bytes::from(tokio::fs::read(&path).await?))
    }

    async fn write(&self, path: &str, data: Bytes) -> StoreResult<()> {
        let path = self.file_path(path)?;
        persist_atomic(&path, &data)
    }

    async fn delete(&self, path: &str) -> StoreResult<()> {
        let path = self.file_path(path)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self, dir: &str) -> StoreResult<DirListing> {
        let path = self.dir_path(dir)?;
        let mut read_dir = match tokio::fs::read_dir(&path).await {
            Ok(rd) => rd,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(DirListing::default());
            }
            Err(e) => return Err(e.into()),
        };

        let mut listing = DirListing::default();
        while let Some(entry) = read_dir.next_entry().await? {
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                tracing::warn!(path = %entry.path().display(), "skipping non-utf8 entry");
                continue;
            };
            if entry.file_type().await?.is_dir() {
                listing.dirs.push(name);
            } else {
                listing.files.push(name);
            }
        }
        listing.dirs.sort();
        listing.files.sort();
        Ok(listing)
    }

    async fn remove_dir(&self, dir: &str) -> StoreResult<()> {
        let path = self.dir_path(dir)?;
        match tokio::fs::remove_dir(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
