#![forbid(unsafe_code)]

use eidolon_cache::CacheError;
use eidolon_plan::PlanError;
use thiserror::Error;

/// Errors surfaced by the rendering facade.
///
/// Configuration problems fail loudly; generation problems are degraded
/// inside [`Srcset`](crate::Srcset) and never reach callers as errors.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The image reference did not resolve to a readable source. Fatal, no
    /// fallback.
    #[error("source not found: {0}")]
    MissingSource(String),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}
