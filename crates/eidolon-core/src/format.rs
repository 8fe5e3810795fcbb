#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

/// Image format as eidolon understands it.
///
/// Raster kinds can be produced by a resizer; `Svg` is vector and bypasses
/// variant generation entirely.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Jpeg,
    Png,
    Webp,
    Gif,
    Svg,
}

impl ImageKind {
    /// Canonical file extension (no dot). `Jpeg` normalizes to `"jpg"`.
    #[must_use]
    pub fn ext(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Gif => "gif",
            Self::Svg => "svg",
        }
    }

    /// Parse from a file extension, case-insensitive. `jpe?g` both map to `Jpeg`.
    #[must_use]
    pub fn from_ext(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "webp" => Some(Self::Webp),
            "gif" => Some(Self::Gif),
            "svg" => Some(Self::Svg),
            _ => None,
        }
    }

    /// Parse from the extension of a relative path.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let (_, ext) = path.rsplit_once('.')?;
        Self::from_ext(ext)
    }

    /// True for vector formats that cannot be rastered into width variants.
    #[must_use]
    pub fn is_vector(self) -> bool {
        matches!(self, Self::Svg)
    }
}

impl std::fmt::Display for ImageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.ext())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("jpg", Some(ImageKind::Jpeg))]
    #[case("jpeg", Some(ImageKind::Jpeg))]
    #[case("JPEG", Some(ImageKind::Jpeg))]
    #[case("png", Some(ImageKind::Png))]
    #[case("webp", Some(ImageKind::Webp))]
    #[case("gif", Some(ImageKind::Gif))]
    #[case("svg", Some(ImageKind::Svg))]
    #[case("tiff", None)]
    #[case("", None)]
    fn from_ext_cases(#[case] ext: &str, #[case] expected: Option<ImageKind>) {
        assert_eq!(ImageKind::from_ext(ext), expected);
    }

    #[rstest]
    #[case("photos/cat.JPG", Some(ImageKind::Jpeg))]
    #[case("logo.svg", Some(ImageKind::Svg))]
    #[case("noext", None)]
    #[case("dir.with.dots/file.png", Some(ImageKind::Png))]
    fn from_path_cases(#[case] path: &str, #[case] expected: Option<ImageKind>) {
        assert_eq!(ImageKind::from_path(path), expected);
    }

    #[test]
    fn jpeg_normalizes_to_jpg() {
        assert_eq!(ImageKind::Jpeg.ext(), "jpg");
        assert_eq!(ImageKind::from_ext("jpeg"), Some(ImageKind::Jpeg));
    }
}
