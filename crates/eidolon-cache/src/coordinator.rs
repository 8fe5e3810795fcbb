#![forbid(unsafe_code)]

//! At-most-once variant materialization.
//!
//! The coordinator never holds a lock around generation. Safety under
//! concurrent renders — including across processes sharing one blob store —
//! comes from path-existence checks plus the store's atomic write: two
//! racing generators produce identical bytes for the same key, and the
//! rename makes whichever lands last a no-op.

use std::sync::Arc;

use eidolon_core::{ImageKind, SourceImage};
use eidolon_plan::{PlanResult, ResolvedConfig};
use eidolon_store::{BlobStore, StateCache};
use tracing::{debug, warn};

use crate::{
    CacheError, CacheResult, Resizer,
    key::{variant_rel_path, variant_token},
    record::VariantRecord,
};

/// One served variant: public URL and actual raster dimensions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariantHandle {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// Maps planned widths onto cache files, generating only what is missing.
pub struct CacheCoordinator {
    blobs: Arc<dyn BlobStore>,
    state: Arc<dyn StateCache>,
    resizer: Arc<dyn Resizer>,
    url_base: String,
}

impl CacheCoordinator {
    /// `url_base` is the public prefix variants are served under, e.g.
    /// `/media/cache`.
    pub fn new(
        blobs: Arc<dyn BlobStore>,
        state: Arc<dyn StateCache>,
        resizer: Arc<dyn Resizer>,
        url_base: impl Into<String>,
    ) -> Self {
        Self {
            blobs,
            state,
            resizer,
            url_base: url_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Materialize every planned target, in plan order.
    ///
    /// Failures are scoped: one width's error occupies its slot and the
    /// siblings proceed. The caller decides between a partial plan and a
    /// full fallback.
    pub async fn materialize(
        &self,
        plan: &PlanResult,
        source: &SourceImage,
        config: &ResolvedConfig,
    ) -> Vec<CacheResult<VariantHandle>> {
        let format = config.format.unwrap_or(source.kind);
        let mut handles = Vec::with_capacity(plan.targets.len());
        for target in &plan.targets {
            handles.push(
                self.materialize_one(source, target.width, config, format)
                    .await,
            );
        }
        handles
    }

    async fn materialize_one(
        &self,
        source: &SourceImage,
        width: u32,
        config: &ResolvedConfig,
        format: ImageKind,
    ) -> CacheResult<VariantHandle> {
        let token = variant_token(&source.name, width, format, config.quality, &config.operation);
        let rel_path = variant_rel_path(source, &token, format);

        // Fast path: the state cache remembers the variant.
        if let Some(raw) = self.state.get(&token).await? {
            if let Ok(record) = serde_json::from_str::<VariantRecord>(&raw) {
                if self.blobs.exists(&rel_path).await? {
                    debug!(key = %token, width, "variant served from state cache");
                    return Ok(self.handle_for(&record));
                }
                // State said present but the file is gone: the collector
                // won the race.
                return Err(CacheError::RaceNotFound(token));
            }
            // Unreadable record: fall through and rebuild it.
        }

        // The file may exist with no state entry (cache flushed, state
        // lost). Reseed the record instead of re-encoding.
        if self.blobs.exists(&rel_path).await? {
            if let Some((src_w, src_h)) = source.dimensions() {
                let height = scaled_height(src_w, src_h, width);
                let record = VariantRecord::new(token.clone(), rel_path.clone(), width, height);
                self.persist_record(&record).await;
                debug!(key = %token, width, "state entry reseeded from existing file");
                return Ok(self.handle_for(&record));
            }
        }

        // Miss: generate, write atomically, record.
        let resized = self
            .resizer
            .resize(source.data.clone(), width, format, config.quality)
            .await
            .map_err(|e| CacheError::generation(width, e))?;
        self.blobs
            .write(&rel_path, resized.data.clone())
            .await
            .map_err(|e| CacheError::generation(width, e))?;

        let record = VariantRecord::new(
            token.clone(),
            rel_path.clone(),
            resized.width,
            resized.height,
        );
        self.persist_record(&record).await;
        debug!(key = %token, width, path = %rel_path, "variant generated");
        Ok(self.handle_for(&record))
    }

    /// Best-effort: the blob is the truth, a lost record is only a future
    /// reseed.
    async fn persist_record(&self, record: &VariantRecord) {
        match serde_json::to_string(record) {
            Ok(json) => {
                if let Err(e) = self.state.set(&record.cache_key, &json).await {
                    warn!(key = %record.cache_key, error = %e, "failed to persist variant record");
                }
            }
            Err(e) => warn!(key = %record.cache_key, error = %e, "failed to encode variant record"),
        }
    }

    fn handle_for(&self, record: &VariantRecord) -> VariantHandle {
        VariantHandle {
            url: format!("{}/{}", self.url_base, record.rel_path),
            width: record.width,
            height: record.height,
        }
    }
}

/// Proportional height for a fit-to-width scale, rounded, never zero.
fn scaled_height(src_width: u32, src_height: u32, width: u32) -> u32 {
    if src_width == 0 {
        return src_height.max(1);
    }
    let scaled = (u64::from(src_height) * u64::from(width) + u64::from(src_width) / 2)
        / u64::from(src_width);
    (scaled as u32).max(1)
}
