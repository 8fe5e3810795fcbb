#![forbid(unsafe_code)]

//! Source resolution.
//!
//! Callers hand the facade either an already-open [`SourceImage`] or a
//! path-style reference. The distinction is an explicit tagged variant,
//! resolved exactly once at the API boundary — nothing downstream ever
//! sniffs for "does this look like an open handle".

use std::{io::Cursor, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use eidolon_core::{ImageKind, SourceImage};
use eidolon_store::sanitize_rel;

use crate::{RenderError, svg::svg_dimensions};

/// An image handed to the facade: resolved, or a reference to resolve.
#[derive(Clone, Debug)]
pub enum ImageSource {
    /// Already-open source; used as-is.
    Handle(SourceImage),
    /// Storage-relative reference, resolved via the configured
    /// [`SourceProvider`].
    Reference(String),
}

impl From<SourceImage> for ImageSource {
    fn from(image: SourceImage) -> Self {
        Self::Handle(image)
    }
}

impl From<&str> for ImageSource {
    fn from(reference: &str) -> Self {
        Self::Reference(reference.to_string())
    }
}

impl From<String> for ImageSource {
    fn from(reference: String) -> Self {
        Self::Reference(reference)
    }
}

/// Resolves a logical image reference to a [`SourceImage`].
///
/// Implementations read the full payload and probe intrinsic dimensions;
/// resolution failure is fatal for the render call (no fallback exists
/// without a source).
#[async_trait]
pub trait SourceProvider: Send + Sync + 'static {
    async fn resolve(&self, reference: &str) -> Result<SourceImage, RenderError>;
}

/// [`SourceProvider`] over one or more source directories, probed in order —
/// typically the managed media root first, then the static-assets root.
pub struct DirSourceProvider {
    roots: Vec<PathBuf>,
    url_base: String,
}

impl DirSourceProvider {
    /// `url_base` is the public prefix originals are served under, e.g.
    /// `/media`.
    pub fn new<I, P>(roots: I, url_base: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            url_base: url_base.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SourceProvider for DirSourceProvider {
    async fn resolve(&self, reference: &str) -> Result<SourceImage, RenderError> {
        let rel = sanitize_rel(reference)
            .map_err(|()| RenderError::MissingSource(reference.to_string()))?;

        for root in &self.roots {
            let path = root.join(&rel);
            let data = match tokio::fs::read(&path).await {
                Ok(data) => Bytes::from(data),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(RenderError::MissingSource(format!("{reference}: {e}")));
                }
            };
            return build_source(&rel, &self.url_base, data);
        }
        Err(RenderError::MissingSource(reference.to_string()))
    }
}

/// In-memory [`SourceProvider`] for tests and fixtures.
#[derive(Clone, Debug, Default)]
pub struct MemSourceProvider {
    images: Arc<DashMap<String, Bytes>>,
    url_base: String,
}

impl MemSourceProvider {
    #[must_use]
    pub fn new(url_base: impl Into<String>) -> Self {
        Self {
            images: Arc::new(DashMap::new()),
            url_base: url_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Register raw bytes under a reference.
    pub fn insert(&self, reference: impl Into<String>, data: Bytes) {
        self.images.insert(reference.into(), data);
    }
}

#[async_trait]
impl SourceProvider for MemSourceProvider {
    async fn resolve(&self, reference: &str) -> Result<SourceImage, RenderError> {
        let Some(entry) = self.images.get(reference) else {
            return Err(RenderError::MissingSource(reference.to_string()));
        };
        let data = entry.clone();
        drop(entry);
        build_source(reference, &self.url_base, data)
    }
}

/// Assemble a [`SourceImage`]: classify the format from the extension and
/// probe intrinsic dimensions (header sniff for rasters, attribute scan for
/// SVG).
fn build_source(rel: &str, url_base: &str, data: Bytes) -> Result<SourceImage, RenderError> {
    let kind = ImageKind::from_path(rel)
        .ok_or_else(|| RenderError::MissingSource(format!("{rel}: unsupported format")))?;

    let (width, height) = if kind.is_vector() {
        svg_dimensions(&data)
    } else {
        let (w, h) = raster_dimensions(&data)
            .map_err(|e| RenderError::MissingSource(format!("{rel}: {e}")))?;
        (Some(w), Some(h))
    };

    Ok(SourceImage {
        name: rel.to_string(),
        url: format!("{url_base}/{rel}"),
        kind,
        width,
        height,
        data,
    })
}

fn raster_dimensions(data: &[u8]) -> Result<(u32, u32), image::ImageError> {
    image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()?
        .into_dimensions()
}
