#![forbid(unsafe_code)]

//! # eidolon-store
//!
//! Byte-storage and existence-tracking primitives for eidolon.
//!
//! ## Public contract
//!
//! Two capability traits and their stock implementations:
//! - [`BlobStore`] — whole-object byte storage with directory listing.
//!   [`DiskBlobStore`] maps relative paths under a root directory and
//!   materializes writes via the write-temp → rename pattern so no reader
//!   ever observes a partial file. [`MemBlobStore`] backs tests and
//!   ephemeral use.
//! - [`StateCache`] — a small key/value existence cache. [`MemStateCache`]
//!   is process-local; [`JsonStateCache`] persists to a single JSON file,
//!   itself written atomically.
//!
//! Path mapping is encapsulated here: relative paths are `/`-separated, never
//! absolute, never contain `..` or empty segments.

mod blob;
mod disk;
mod error;
mod mem;
mod state;

pub use blob::{BlobStore, DirListing, sanitize_rel};
pub use disk::DiskBlobStore;
pub use error::{StoreError, StoreResult};
pub use mem::{MemBlobStore, MemStateCache};
pub use state::{JsonStateCache, StateCache};
