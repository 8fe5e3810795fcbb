#![forbid(unsafe_code)]

//! Named size configurations and per-call override resolution.
//!
//! The configuration table is immutable once built and passed by reference
//! into [`resolve`]; per-call adjustments travel in an explicit
//! [`PlanOverrides`] value. Nothing here mutates shared state.

use std::collections::HashMap;

use eidolon_core::ImageKind;
use serde::{Deserialize, Serialize};

use crate::{SizeSpec, SizeValue};

/// Width delta (px) below which an optional variant is considered too
/// similar to bother materializing, when no config or override says
/// otherwise.
pub const DEFAULT_THRESHOLD: u32 = 69;

/// Operation identifier stamped into cache keys when a config names none.
pub const DEFAULT_OPERATION: &str = "eidolon:fit-width";

/// One named size configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NamedConfig {
    /// Viewport breakpoints in px. Order does not matter; resolution sorts
    /// ascending.
    pub breakpoints: Vec<u32>,
    /// Widest variant to materialize. Clamped to the source width at plan
    /// time.
    pub max_width: Option<u32>,
    /// Encoder quality passed through to the resizer.
    pub quality: Option<u8>,
    /// Output format; the source format is kept when unset.
    pub format: Option<ImageKind>,
    /// Minimum width delta for optional variants.
    pub threshold: Option<u32>,
    /// Trailing `sizes` entry; derived from the greatest breakpoint when
    /// unset.
    pub default_size: Option<SizeValue>,
    /// Cache-key operation identifier.
    pub operation: Option<String>,
}

/// Immutable table of named configurations, built once at startup.
///
/// Lookup of an unknown key falls back to the `"default"` entry.
#[derive(Clone, Debug)]
pub struct ConfigTable {
    configs: HashMap<String, NamedConfig>,
}

impl ConfigTable {
    /// Empty table. Resolution against it yields an empty breakpoint set.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            configs: HashMap::new(),
        }
    }

    /// Add or replace a named configuration.
    #[must_use]
    pub fn with_config(mut self, name: impl Into<String>, config: NamedConfig) -> Self {
        self.configs.insert(name.into(), config);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&NamedConfig> {
        self.configs.get(name)
    }
}

impl Default for ConfigTable {
    /// The stock table: one `"default"` entry with the conventional web
    /// breakpoint ladder, WebP output, and the process-wide threshold.
    fn default() -> Self {
        Self::empty().with_config(
            "default",
            NamedConfig {
                breakpoints: vec![640, 1024, 1280, 1580, 1920],
                max_width: Some(2560),
                quality: Some(91),
                format: Some(ImageKind::Webp),
                threshold: Some(DEFAULT_THRESHOLD),
                default_size: None,
                operation: Some(DEFAULT_OPERATION.to_string()),
            },
        )
    }
}

/// Per-call overrides, all optional.
///
/// A non-empty [`breakpoint_sizes`](Self::breakpoint_sizes) map fully
/// replaces the named config's breakpoints and the positional
/// [`sizes`](Self::sizes) list is then ignored.
#[derive(Clone, Debug, Default)]
pub struct PlanOverrides {
    /// Named config to resolve against; unknown or unset falls back to
    /// `"default"`.
    pub config: Option<String>,
    /// Positional sizes aligned to the named config's breakpoints ascending;
    /// unmatched trailing breakpoints default to `100vw`.
    pub sizes: Vec<SizeValue>,
    /// Explicit breakpoint → size map.
    pub breakpoint_sizes: SizeSpec,
    pub max_width: Option<u32>,
    pub quality: Option<u8>,
    pub threshold: Option<u32>,
    pub default_size: Option<SizeValue>,
    pub format: Option<ImageKind>,
}

impl PlanOverrides {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(mut self, name: impl Into<String>) -> Self {
        self.config = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_sizes<I: IntoIterator<Item = SizeValue>>(mut self, sizes: I) -> Self {
        self.sizes = sizes.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_breakpoint_sizes(mut self, spec: SizeSpec) -> Self {
        self.breakpoint_sizes = spec;
        self
    }

    #[must_use]
    pub fn with_max_width(mut self, max_width: u32) -> Self {
        self.max_width = Some(max_width);
        self
    }

    #[must_use]
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = Some(quality);
        self
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.threshold = Some(threshold);
        self
    }

    #[must_use]
    pub fn with_default_size(mut self, size: SizeValue) -> Self {
        self.default_size = Some(size);
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: ImageKind) -> Self {
        self.format = Some(format);
        self
    }
}

/// Fully resolved planning input, built once per invocation.
#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    /// Breakpoint → size mapping the planner walks.
    pub spec: SizeSpec,
    pub max_width: Option<u32>,
    pub quality: Option<u8>,
    pub format: Option<ImageKind>,
    pub threshold: u32,
    pub default_size: Option<SizeValue>,
    pub operation: String,
}

/// Merge per-call overrides with a named configuration.
pub fn resolve(table: &ConfigTable, overrides: &PlanOverrides) -> ResolvedConfig {
    let named = overrides
        .config
        .as_deref()
        .and_then(|name| table.get(name))
        .or_else(|| table.get("default"));

    let spec = if overrides.breakpoint_sizes.is_empty() {
        align_positional(named, &overrides.sizes)
    } else {
        overrides.breakpoint_sizes.clone()
    };

    ResolvedConfig {
        spec,
        max_width: overrides.max_width.or(named.and_then(|c| c.max_width)),
        quality: overrides.quality.or(named.and_then(|c| c.quality)),
        format: overrides.format.or(named.and_then(|c| c.format)),
        threshold: overrides
            .threshold
            .or(named.and_then(|c| c.threshold))
            .unwrap_or(DEFAULT_THRESHOLD),
        default_size: overrides
            .default_size
            .or(named.and_then(|c| c.default_size)),
        operation: named
            .and_then(|c| c.operation.clone())
            .unwrap_or_else(|| DEFAULT_OPERATION.to_string()),
    }
}

/// Zip positional sizes onto the named config's breakpoints ascending,
/// padding the tail with `100vw`.
fn align_positional(named: Option<&NamedConfig>, sizes: &[SizeValue]) -> SizeSpec {
    let mut breakpoints: Vec<u32> = named.map(|c| c.breakpoints.clone()).unwrap_or_default();
    breakpoints.sort_unstable();
    breakpoints.dedup();

    let mut spec = SizeSpec::new();
    for (i, bp) in breakpoints.into_iter().filter(|bp| *bp > 0).enumerate() {
        let size = sizes.get(i).copied().unwrap_or(SizeValue::vw(100));
        // Breakpoints are non-zero here, insert cannot fail.
        let _ = spec.insert(bp, size);
    }
    spec
}
