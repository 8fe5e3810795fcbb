#![forbid(unsafe_code)]

use eidolon_store::StoreError;
use thiserror::Error;

use crate::resize::ResizeError;

/// Result type used by `eidolon-cache`.
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors produced by the cache layer.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Resize(#[from] ResizeError),

    /// One width's generation failed. Scoped: sibling widths are unaffected
    /// and the coordinator does not retry.
    #[error("variant generation failed for width {width}: {source}")]
    VariantGeneration {
        width: u32,
        #[source]
        source: Box<CacheError>,
    },

    /// An expected variant vanished between plan and read (raced with the
    /// garbage collector). Callers recover by degrading to the source-only
    /// output.
    #[error("variant vanished for key {0}")]
    RaceNotFound(String),
}

impl CacheError {
    /// Wrap an error as a generation failure scoped to one width.
    #[must_use]
    pub fn generation(width: u32, source: impl Into<CacheError>) -> Self {
        Self::VariantGeneration {
            width,
            source: Box::new(source.into()),
        }
    }

    /// True when the whole call should degrade to source-only output.
    #[must_use]
    pub fn is_race(&self) -> bool {
        matches!(self, Self::RaceNotFound(_))
    }
}
