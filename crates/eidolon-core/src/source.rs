#![forbid(unsafe_code)]

use bytes::Bytes;

use crate::{ImageKind, path};

/// A resolved source image, valid for one invocation.
///
/// ## Normative
/// - `name` is the storage-relative path of the source (`photos/cat.jpg`) and
///   doubles as the stable identity token hashed into cache keys. It must not
///   depend on any in-memory handle identity.
/// - `width`/`height` are the intrinsic pixel dimensions. They are always
///   present for raster sources; vector sources may not declare them.
/// - Instances are built fresh per invocation by a source provider and never
///   cached across calls.
#[derive(Clone, Debug)]
pub struct SourceImage {
    /// Storage-relative path, also the cache identity token.
    pub name: String,
    /// Public URL the original is served from.
    pub url: String,
    pub kind: ImageKind,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Full source payload.
    pub data: Bytes,
}

impl SourceImage {
    /// Intrinsic dimensions, when both are known.
    #[must_use]
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.width.zip(self.height)
    }

    /// Directory part of `name`, `""` for top-level sources.
    #[must_use]
    pub fn rel_dir(&self) -> &str {
        path::rel_dir(&self.name)
    }

    /// File stem of `name` (no directory, no extension).
    #[must_use]
    pub fn stem(&self) -> &str {
        path::stem_of(&self.name)
    }
}
