#![forbid(unsafe_code)]

use thiserror::Error;

/// Result type used by `eidolon-store`.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors produced by storage primitives.
///
/// Higher-level crates wrap this to add domain context (cache key, source
/// name, etc.).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid relative path: {0:?}")]
    InvalidPath(String),

    #[error("store operation failed: {0}")]
    Failed(String),
}
