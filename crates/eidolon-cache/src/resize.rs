#![forbid(unsafe_code)]

use async_trait::async_trait;
use bytes::Bytes;
use eidolon_core::ImageKind;
use thiserror::Error;

/// Resize failure: unsupported or corrupt input, or an encoder refusing the
/// requested output.
#[derive(Debug, Error)]
#[error("resize error: {0}")]
pub struct ResizeError(pub String);

/// Output of one resize: encoded bytes plus the actual raster dimensions.
#[derive(Clone, Debug)]
pub struct ResizedImage {
    pub data: Bytes,
    pub width: u32,
    pub height: u32,
}

/// The bitmap decode/resize/encode capability.
///
/// ## Normative
/// - Proportional fit-to-width: the output width equals `target_width` when
///   the source is at least that wide; sources are never upscaled.
/// - `quality` applies where the encoder supports it and is ignored
///   elsewhere.
/// - Implementations must be pure with respect to their inputs: identical
///   (bytes, width, format, quality) produce an identical raster.
#[async_trait]
pub trait Resizer: Send + Sync + 'static {
    async fn resize(
        &self,
        data: Bytes,
        target_width: u32,
        format: ImageKind,
        quality: Option<u8>,
    ) -> Result<ResizedImage, ResizeError>;
}
