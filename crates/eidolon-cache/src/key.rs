#![forbid(unsafe_code)]

//! Cache key derivation and the variant filename grammar.
//!
//! A variant file is named `<stem>.<token>.<ext>` and lives under the cache
//! root in the same relative directory as its source. The token is a pure
//! function of the request parameters, so the same request always lands on
//! the same path, and the collector can reverse the mapping by stripping
//! the token.

use eidolon_core::{ImageKind, SourceImage, join_rel};
use sha2::{Digest, Sha256};

/// Deterministic content token for one variant request.
///
/// Digest of (source name, width, output format, quality, operation) with
/// `:` separators, truncated to 16 bytes and hex-encoded. The source name is
/// the storage-relative path — a stable identity, never an in-memory handle.
#[must_use]
pub fn variant_token(
    source_name: &str,
    width: u32,
    format: ImageKind,
    quality: Option<u8>,
    operation: &str,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source_name.as_bytes());
    hasher.update(b":");
    hasher.update(width.to_string().as_bytes());
    hasher.update(b":");
    hasher.update(format.ext().as_bytes());
    hasher.update(b":");
    match quality {
        Some(q) => hasher.update(q.to_string().as_bytes()),
        None => hasher.update(b"-"),
    }
    hasher.update(b":");
    hasher.update(operation.as_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..16])
}

/// Cache-relative path for a variant of `source`: same directory as the
/// source, `<stem>.<token>.<ext>` filename.
#[must_use]
pub fn variant_rel_path(source: &SourceImage, token: &str, format: ImageKind) -> String {
    let name = format!("{}.{token}.{}", source.stem(), format.ext());
    join_rel(source.rel_dir(), &name)
}

/// A variant filename split into its grammar parts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VariantName<'a> {
    pub stem: &'a str,
    pub token: &'a str,
    pub ext: &'a str,
}

/// Parse `<stem>.<token>.<ext>`, the reverse of [`variant_rel_path`]'s
/// filename part.
///
/// The token must be the single plausible strip point: exactly one interior
/// `.`-delimited segment of lowercase ASCII alphanumerics, sitting
/// immediately before the extension. Filenames with zero or multiple
/// plausible segments return `None` — the caller cannot determine the
/// source and must keep the file.
#[must_use]
pub fn parse_variant_name(file_name: &str) -> Option<VariantName<'_>> {
    let parts: Vec<&str> = file_name.split('.').collect();
    if parts.len() < 3 {
        return None;
    }

    let ext = parts[parts.len() - 1];
    let token = parts[parts.len() - 2];
    if ext.is_empty() {
        return None;
    }

    let interior = &parts[1..parts.len() - 1];
    let plausible = interior.iter().filter(|seg| is_token(seg)).count();
    if plausible != 1 || !is_token(token) {
        return None;
    }

    let stem_len = file_name.len() - ext.len() - token.len() - 2;
    let stem = &file_name[..stem_len];
    if stem.is_empty() {
        return None;
    }

    Some(VariantName { stem, token, ext })
}

fn is_token(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
}
