#![forbid(unsafe_code)]

//! # eidolon-plan
//!
//! Pure variant planning: turns a size specification (breakpoints,
//! relative/absolute display sizes, a maximum width, a "too-similar"
//! threshold) into a minimal deduplicated set of target widths plus the
//! `sizes` hint list a renderer consumes.
//!
//! Everything in this crate is synchronous computation over plain values.
//! No I/O, nothing suspends; the cache layer (`eidolon-cache`) turns the
//! resulting [`PlanResult`] into actual files.

mod config;
mod error;
mod planner;
mod size;
mod spec;

pub use config::{
    ConfigTable, DEFAULT_OPERATION, DEFAULT_THRESHOLD, NamedConfig, PlanOverrides, ResolvedConfig,
    resolve,
};
pub use error::PlanError;
pub use planner::{PlanResult, PlanTarget, plan_variants};
pub use size::{SizeUnit, SizeValue};
pub use spec::SizeSpec;
