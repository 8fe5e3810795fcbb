#![forbid(unsafe_code)]

//! # eidolon-cache
//!
//! The variant cache: deterministic cache keys, at-most-once bitmap
//! generation, and the orphan-collecting sweep.
//!
//! ## Public contract
//!
//! - [`CacheCoordinator`] maps planned target widths onto cache files,
//!   invoking the [`Resizer`] capability only for paths that do not exist
//!   yet. Correctness under concurrent access rests on path-existence
//!   checks plus the blob store's atomic materialization, not on locks.
//! - [`GarbageCollector`] reconciles the cache tree against the source
//!   stores and removes variants whose source is gone, along with their
//!   state-cache entries.
//! - [`variant_token`] / [`parse_variant_name`] define the filename grammar
//!   (`<stem>.<token>.<ext>`) that makes the key ↔ file mapping reversible.

mod coordinator;
mod error;
mod gc;
mod key;
mod record;
mod resize;

pub use coordinator::{CacheCoordinator, VariantHandle};
pub use error::{CacheError, CacheResult};
pub use gc::{GarbageCollector, SweepStats};
pub use key::{VariantName, parse_variant_name, variant_rel_path, variant_token};
pub use record::VariantRecord;
pub use resize::{ResizeError, ResizedImage, Resizer};
