#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use crate::{PlanError, SizeValue};

/// Ordered mapping from viewport breakpoint (px) to display size.
///
/// Breakpoints are unique by construction and iterate ascending. A zero
/// breakpoint is rejected; inserting an existing breakpoint replaces its
/// size.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SizeSpec {
    entries: BTreeMap<u32, SizeValue>,
}

impl SizeSpec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a breakpoint. Fails on a zero breakpoint.
    pub fn insert(&mut self, breakpoint: u32, size: SizeValue) -> Result<(), PlanError> {
        if breakpoint == 0 {
            return Err(PlanError::InvalidBreakpoint("0".to_string()));
        }
        self.entries.insert(breakpoint, size);
        Ok(())
    }

    /// Build from typed pairs.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, PlanError>
    where
        I: IntoIterator<Item = (u32, SizeValue)>,
    {
        let mut spec = Self::new();
        for (breakpoint, size) in pairs {
            spec.insert(breakpoint, size)?;
        }
        Ok(spec)
    }

    /// Build from string pairs as they arrive from a template or request
    /// layer, e.g. `[("1024", "50"), ("1920", "25vw")]`.
    pub fn parse_entries<'a, I>(pairs: I) -> Result<Self, PlanError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut spec = Self::new();
        for (key, value) in pairs {
            let trimmed = key.trim();
            if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
                return Err(PlanError::InvalidBreakpoint(key.to_string()));
            }
            let breakpoint: u32 = trimmed
                .parse()
                .map_err(|_| PlanError::InvalidBreakpoint(key.to_string()))?;
            spec.insert(breakpoint, value.parse()?)?;
        }
        Ok(spec)
    }

    /// Breakpoints ascending with their sizes.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (u32, &SizeValue)> {
        self.entries.iter().map(|(bp, size)| (*bp, size))
    }

    /// Size at the greatest breakpoint, if any.
    #[must_use]
    pub fn largest(&self) -> Option<&SizeValue> {
        self.entries.last_key_value().map(|(_, size)| size)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
