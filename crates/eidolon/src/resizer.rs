#![forbid(unsafe_code)]

//! Default [`Resizer`] built on the `image` crate.

use async_trait::async_trait;
use bytes::Bytes;
use eidolon_cache::{ResizeError, ResizedImage, Resizer};
use eidolon_core::ImageKind;
use image::{DynamicImage, ImageFormat, codecs::jpeg::JpegEncoder, imageops::FilterType};
use std::io::Cursor;

/// Proportional fit-to-width resizer.
///
/// Decodes the source, downscales with Lanczos3 so the output width equals
/// the target (never upscaling), and encodes to the requested format. JPEG
/// honors `quality`; the PNG, WebP and GIF encoders ignore it.
///
/// Decode and encode are CPU work and run on the blocking pool.
#[derive(Clone, Copy, Debug, Default)]
pub struct FitWidthResizer;

impl FitWidthResizer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Resizer for FitWidthResizer {
    async fn resize(
        &self,
        data: Bytes,
        target_width: u32,
        format: ImageKind,
        quality: Option<u8>,
    ) -> Result<ResizedImage, ResizeError> {
        tokio::task::spawn_blocking(move || resize_blocking(&data, target_width, format, quality))
            .await
            .map_err(|e| ResizeError(format!("resize task failed: {e}")))?
    }
}

fn resize_blocking(
    data: &[u8],
    target_width: u32,
    format: ImageKind,
    quality: Option<u8>,
) -> Result<ResizedImage, ResizeError> {
    let output_format = raster_format(format)?;

    let decoded = image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ResizeError(format!("unreadable input: {e}")))?
        .decode()
        .map_err(|e| ResizeError(format!("decode failed: {e}")))?;

    let resized = if decoded.width() > target_width {
        decoded.resize(target_width, u32::MAX, FilterType::Lanczos3)
    } else {
        decoded
    };

    // JPEG has no alpha channel; flatten before encoding.
    let resized = if output_format == ImageFormat::Jpeg && resized.color().has_alpha() {
        DynamicImage::ImageRgb8(resized.to_rgb8())
    } else {
        resized
    };

    let mut buf = Cursor::new(Vec::new());
    match (output_format, quality) {
        (ImageFormat::Jpeg, Some(q)) => {
            let encoder = JpegEncoder::new_with_quality(&mut buf, q);
            resized
                .write_with_encoder(encoder)
                .map_err(|e| ResizeError(format!("jpeg encode failed: {e}")))?;
        }
        (format, _) => {
            resized
                .write_to(&mut buf, format)
                .map_err(|e| ResizeError(format!("encode failed: {e}")))?;
        }
    }

    Ok(ResizedImage {
        data: Bytes::from(buf.into_inner()),
        width: resized.width(),
        height: resized.height(),
    })
}

fn raster_format(kind: ImageKind) -> Result<ImageFormat, ResizeError> {
    match kind {
        ImageKind::Jpeg => Ok(ImageFormat::Jpeg),
        ImageKind::Png => Ok(ImageFormat::Png),
        ImageKind::Webp => Ok(ImageFormat::WebP),
        ImageKind::Gif => Ok(ImageFormat::Gif),
        ImageKind::Svg => Err(ResizeError("vector input cannot be rastered".to_string())),
    }
}
