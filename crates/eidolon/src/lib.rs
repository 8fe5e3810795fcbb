#![forbid(unsafe_code)]

//! # eidolon
//!
//! Responsive image variants: plan which widths are worth materializing,
//! generate them at most once into a shared cache tree, and hand the
//! template layer everything an `<img>` tag needs.
//!
//! ```ignore
//! use eidolon::{Srcset, DirSourceProvider};
//! use eidolon_store::{DiskBlobStore, JsonStateCache};
//! use std::sync::Arc;
//!
//! let srcset = Srcset::builder()
//!     .provider(Arc::new(DirSourceProvider::new(["/srv/media"], "/media")))
//!     .blobs(Arc::new(DiskBlobStore::new("/srv/media/cache")))
//!     .state(Arc::new(JsonStateCache::new("/srv/media/cache/.state.json")))
//!     .url_base("/media/cache")
//!     .build();
//!
//! let rendered = srcset.plan_and_render("photos/cat.jpg", &Default::default()).await?;
//! // rendered.src, rendered.srcset_attr(), rendered.sizes_attr(), ...
//! ```
//!
//! The heavy lifting lives in the member crates: `eidolon-plan` (pure
//! planning), `eidolon-cache` (keys, coordinator, collector) and
//! `eidolon-store` (blob store, state cache). This crate adds the concrete
//! capabilities — a fit-to-width resizer on the `image` crate, directory-
//! and memory-backed source providers, SVG dimension probing — and the
//! rendering surface.

mod error;
mod render;
mod resizer;
mod source;
mod svg;

pub use eidolon_cache::{
    CacheCoordinator, CacheError, GarbageCollector, Resizer, SweepStats, VariantHandle,
};
pub use eidolon_core::{ImageKind, SourceImage};
pub use eidolon_plan::{
    ConfigTable, NamedConfig, PlanError, PlanOverrides, SizeSpec, SizeUnit, SizeValue,
};
pub use error::RenderError;
pub use render::{RenderedImage, Srcset, SrcsetBuilder, SrcsetEntry};
pub use resizer::FitWidthResizer;
pub use source::{DirSourceProvider, ImageSource, MemSourceProvider, SourceProvider};
