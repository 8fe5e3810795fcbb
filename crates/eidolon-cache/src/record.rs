#![forbid(unsafe_code)]

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Persisted facts about one generated variant.
///
/// The blob file is the byte truth; the record is mirrored into the state
/// cache (keyed by `cache_key`) so the hot path can answer "does this
/// variant exist and what are its dimensions" without storage round-trips.
/// Records are never mutated in place, only created or deleted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRecord {
    pub cache_key: String,
    pub rel_path: String,
    pub width: u32,
    pub height: u32,
    /// Unix seconds at generation time.
    pub created_at: u64,
}

impl VariantRecord {
    #[must_use]
    pub fn new(
        cache_key: impl Into<String>,
        rel_path: impl Into<String>,
        width: u32,
        height: u32,
    ) -> Self {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        Self {
            cache_key: cache_key.into(),
            rel_path: rel_path.into(),
            width,
            height,
            created_at,
        }
    }
}
