#![forbid(unsafe_code)]

use async_trait::async_trait;
use bytes::Bytes;

use crate::StoreResult;

/// One level of a directory tree: child directories and files, by name.
///
/// Both lists are sorted so that walks are deterministic across runs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirListing {
    pub dirs: Vec<String>,
    pub files: Vec<String>,
}

impl DirListing {
    /// True when the directory holds neither files nor subdirectories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty() && self.files.is_empty()
    }
}

/// Whole-object byte storage addressed by `/`-separated relative paths.
///
/// ## Normative
/// - `write` is atomic: a concurrent reader sees either the previous object
///   or the new one, never a partial write.
/// - `delete` is idempotent; deleting a missing object is `Ok`.
/// - `list` of a missing directory returns an empty listing.
/// - `remove_dir` removes a directory only when empty; removing a missing
///   directory is `Ok`, removing a non-empty one is an error.
/// - Paths must be relative: no leading `/`, no `..`, no empty segments.
///   The empty string addresses the root directory (for `list` only).
#[async_trait]
pub trait BlobStore: Send + Sync + 'static {
    async fn exists(&self, path: &str) -> StoreResult<bool>;

    async fn read(&self, path: &str) -> StoreResult<Bytes>;

    /// Atomically replace the object at `path`, creating parent directories
    /// as needed.
    async fn write(&self, path: &str, data: Bytes) -> StoreResult<()>;

    async fn delete(&self, path: &str) -> StoreResult<()>;

    async fn list(&self, dir: &str) -> StoreResult<DirListing>;

    /// Remove `dir` if it is empty.
    async fn remove_dir(&self, dir: &str) -> StoreResult<()>;
}

/// Validate and normalize a relative path: backslashes become `/`; absolute
/// paths, `..` segments, and empty segments are rejected.
pub fn sanitize_rel(input: &str) -> Result<String, ()> {
    let s = input.replace('\\', "/");
    if s.is_empty() || s.starts_with('/') || s.split('/').any(|seg| seg.is_empty() || seg == "..") {
        return Err(());
    }
    Ok(s)
}
