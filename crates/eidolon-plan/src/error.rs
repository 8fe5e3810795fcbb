#![forbid(unsafe_code)]

use thiserror::Error;

/// Errors from size-spec parsing and resolution.
///
/// Both indicate misconfiguration and are fatal for the call that produced
/// them; there is no fallback for a spec that cannot be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    /// A display size was neither a bare vw integer nor an integer with a
    /// `px`/`vw` suffix, or its value was zero.
    #[error("invalid size {0:?}: expected a positive integer, optionally suffixed px or vw")]
    InvalidSize(String),

    /// A breakpoint key did not parse as a positive integer pixel width.
    #[error("invalid breakpoint {0:?}: expected a positive integer pixel width")]
    InvalidBreakpoint(String),
}
