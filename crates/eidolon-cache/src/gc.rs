#![forbid(unsafe_code)]

//! Orphan collection for the variant cache tree.
//!
//! A depth-first sweep that compares every variant file against the source
//! stores and deletes what no longer has a source, then reclaims emptied
//! directories bottom-up. The sweep runs off the request path and is safe
//! alongside the coordinator: files only ever become visible fully written,
//! so a variant created mid-sweep is either observed and kept or simply not
//! yet seen.

use std::{future::Future, pin::Pin, sync::Arc};

use eidolon_core::{join_rel, stem_of};
use eidolon_store::{BlobStore, StateCache};
use tracing::{debug, warn};

use crate::key::parse_variant_name;

/// Outcome counts for one sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Files examined.
    pub scanned: usize,
    /// Orphaned variants removed (with their state entries).
    pub deleted: usize,
    /// Variants whose source still exists.
    pub kept: usize,
    /// Files skipped: non-variant names, ambiguous names, or per-file
    /// errors.
    pub skipped: usize,
    /// Emptied directories removed.
    pub pruned_dirs: usize,
}

enum Presence {
    Present,
    Absent,
    /// At least one source store could not be consulted.
    Unknown,
}

/// Reconciles the cache tree against the current set of sources.
pub struct GarbageCollector {
    cache: Arc<dyn BlobStore>,
    sources: Vec<Arc<dyn BlobStore>>,
    state: Arc<dyn StateCache>,
}

impl GarbageCollector {
    /// `sources` are consulted in order; a stem found in any of them keeps
    /// the variant.
    pub fn new(
        cache: Arc<dyn BlobStore>,
        sources: Vec<Arc<dyn BlobStore>>,
        state: Arc<dyn StateCache>,
    ) -> Self {
        Self {
            cache,
            sources,
            state,
        }
    }

    /// Run one full sweep. Never fails: per-file errors are logged and
    /// counted as skipped.
    pub async fn sweep(&self) -> SweepStats {
        let mut stats = SweepStats::default();
        self.sweep_dir(String::new(), &mut stats).await;
        debug!(?stats, "cache sweep finished");
        stats
    }

    fn sweep_dir<'a>(
        &'a self,
        dir: String,
        stats: &'a mut SweepStats,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(async move {
            let listing = match self.cache.list(&dir).await {
                Ok(listing) => listing,
                Err(e) => {
                    warn!(dir = %dir, error = %e, "cannot list cache directory; skipping subtree");
                    return;
                }
            };

            for file in &listing.files {
                stats.scanned += 1;
                self.process_file(&dir, file, stats).await;
            }

            for sub in &listing.dirs {
                let sub_path = join_rel(&dir, sub);
                self.sweep_dir(sub_path.clone(), stats).await;
                self.prune_if_empty(&sub_path, stats).await;
            }
        })
    }

    async fn process_file(&self, dir: &str, file: &str, stats: &mut SweepStats) {
        let Some(variant) = parse_variant_name(file) else {
            debug!(dir = %dir, file = %file, "not a variant filename; leaving in place");
            stats.skipped += 1;
            return;
        };

        match self.source_present(dir, variant.stem).await {
            Presence::Present => stats.kept += 1,
            Presence::Unknown => {
                // Cannot prove the source is gone; keep.
                stats.kept += 1;
            }
            Presence::Absent => {
                let path = join_rel(dir, file);

                // State first: if the file deletion then fails, the variant
                // survives as an orphan until the next sweep, and a lost
                // state entry alone is reseeded by the coordinator.
                if let Err(e) = self.state.delete(variant.token).await {
                    warn!(path = %path, error = %e, "state delete failed; keeping variant");
                    stats.skipped += 1;
                    return;
                }
                match self.cache.delete(&path).await {
                    Ok(()) => {
                        debug!(path = %path, "deleted orphan variant");
                        stats.deleted += 1;
                    }
                    Err(e) => {
                        warn!(path = %path, error = %e, "delete failed; skipping");
                        stats.skipped += 1;
                    }
                }
            }
        }
    }

    /// A source is present when any file with the stem — any extension —
    /// exists in the matching directory of any source store. Re-encoding a
    /// source to a different format must not orphan its variants.
    async fn source_present(&self, dir: &str, stem: &str) -> Presence {
        let mut unknown = false;
        for store in &self.sources {
            match store.list(dir).await {
                Ok(listing) => {
                    if listing.files.iter().any(|f| stem_of(f) == stem) {
                        return Presence::Present;
                    }
                }
                Err(e) => {
                    warn!(dir = %dir, error = %e, "source store listing failed");
                    unknown = true;
                }
            }
        }
        if unknown {
            Presence::Unknown
        } else {
            Presence::Absent
        }
    }

    async fn prune_if_empty(&self, dir: &str, stats: &mut SweepStats) {
        match self.cache.list(dir).await {
            Ok(listing) if listing.is_empty() => match self.cache.remove_dir(dir).await {
                Ok(()) => {
                    debug!(dir = %dir, "pruned empty directory");
                    stats.pruned_dirs += 1;
                }
                Err(e) => warn!(dir = %dir, error = %e, "failed to prune directory"),
            },
            Ok(_) => {}
            Err(e) => warn!(dir = %dir, error = %e, "failed to re-list directory"),
        }
    }
}
