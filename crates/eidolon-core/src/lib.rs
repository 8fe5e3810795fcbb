#![forbid(unsafe_code)]

//! # eidolon-core
//!
//! Shared vocabulary for the eidolon workspace: image formats, the resolved
//! source-image model, and the relative-path helpers every layer agrees on.
//!
//! Nothing in this crate performs I/O. Higher crates (`eidolon-store`,
//! `eidolon-cache`, `eidolon`) build on these types; this crate depends on
//! none of them.

mod format;
mod path;
mod source;

pub use format::ImageKind;
pub use path::{join_rel, rel_dir, stem_of};
pub use source::SourceImage;
