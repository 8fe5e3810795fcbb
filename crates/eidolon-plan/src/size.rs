#![forbid(unsafe_code)]

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::PlanError;

/// Unit of a display size expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeUnit {
    /// Relative to the viewport width.
    Vw,
    /// Absolute pixels.
    Px,
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vw => "vw",
            Self::Px => "px",
        })
    }
}

/// A display size: positive magnitude plus unit, e.g. `25vw` or `300px`.
///
/// Parsing accepts a bare integer (implied vw) or an integer with a `px` or
/// `vw` suffix; anything else is [`PlanError::InvalidSize`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SizeValue {
    pub value: u32,
    pub unit: SizeUnit,
}

impl SizeValue {
    /// Viewport-relative size. `value` must be positive.
    #[must_use]
    pub fn vw(value: u32) -> Self {
        Self {
            value,
            unit: SizeUnit::Vw,
        }
    }

    /// Absolute pixel size. `value` must be positive.
    #[must_use]
    pub fn px(value: u32) -> Self {
        Self {
            value,
            unit: SizeUnit::Px,
        }
    }
}

impl fmt::Display for SizeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit)
    }
}

impl FromStr for SizeValue {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || PlanError::InvalidSize(s.to_string());

        let (digits, unit) = if let Some(prefix) = trimmed.strip_suffix("px") {
            (prefix, SizeUnit::Px)
        } else if let Some(prefix) = trimmed.strip_suffix("vw") {
            (prefix, SizeUnit::Vw)
        } else {
            (trimmed, SizeUnit::Vw)
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let value: u32 = digits.parse().map_err(|_| invalid())?;
        if value == 0 {
            return Err(invalid());
        }
        Ok(Self { value, unit })
    }
}
