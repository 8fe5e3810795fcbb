#![forbid(unsafe_code)]

//! Variant planning and threshold decimation.
//!
//! The planner walks the resolved breakpoint spec once, collects candidate
//! widths, then decimates optional candidates that sit too close to an
//! already-kept width. Decimation trades a few pixels of fit precision for
//! materially fewer cache entries.

use std::collections::BTreeMap;

use crate::{ResolvedConfig, SizeUnit, SizeValue};

/// One planned target width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlanTarget {
    pub width: u32,
    /// Required targets (the base width and explicit px sizes) survive
    /// decimation unconditionally.
    pub required: bool,
}

/// Output of [`plan_variants`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlanResult {
    /// Surviving target widths, descending. The first entry is always the
    /// base width.
    pub targets: Vec<PlanTarget>,
    /// `sizes` hints, ascending by breakpoint, with the trailing default
    /// entry last. Always `breakpoint count + 1` entries.
    pub sizes: Vec<String>,
    /// Widest variant: `min(max_width, source width)`.
    pub base_width: u32,
}

/// Plan the variant set for one source image.
///
/// Invariants upheld:
/// - no target exceeds the source width (no upscaling);
/// - the base width is always present and required;
/// - consecutive kept widths differ by at least the threshold unless the
///   narrower one is required.
#[must_use]
pub fn plan_variants(source_width: u32, config: &ResolvedConfig) -> PlanResult {
    let base_width = config
        .max_width
        .map_or(source_width, |m| m.min(source_width));

    // Width → required. Duplicate widths keep required=true if any source
    // claims it; BTreeMap gives the descending walk for decimation.
    let mut candidates: BTreeMap<u32, bool> = BTreeMap::new();
    candidates.insert(base_width, true);

    let mut sizes = Vec::with_capacity(config.spec.len() + 1);
    for (breakpoint, size) in config.spec.iter() {
        sizes.push(format!("(max-width: {breakpoint}px) {size}"));

        match size.unit {
            SizeUnit::Px => {
                // Explicit pixel sizes are never skipped, but upscaling is
                // still off the table.
                let width = size.value.min(base_width);
                candidates.insert(width, true);
            }
            SizeUnit::Vw => {
                let width = (u64::from(breakpoint) * u64::from(size.value)).div_ceil(100);
                if width >= u64::from(base_width) {
                    continue;
                }
                candidates.entry(width as u32).or_insert(false);
            }
        }
    }

    let default_size = config
        .default_size
        .or_else(|| config.spec.largest().copied())
        .unwrap_or(SizeValue::vw(100));
    sizes.push(default_size.to_string());

    let targets = decimate(&candidates, base_width, config.threshold);

    PlanResult {
        targets,
        sizes,
        base_width,
    }
}

/// Walk candidates descending, dropping optional widths within `threshold`
/// of the last kept width.
fn decimate(candidates: &BTreeMap<u32, bool>, base_width: u32, threshold: u32) -> Vec<PlanTarget> {
    let mut current = base_width;
    let mut targets = Vec::with_capacity(candidates.len());

    for (&width, &required) in candidates.iter().rev() {
        if required {
            targets.push(PlanTarget { width, required });
            current = width;
        } else if current - width >= threshold {
            targets.push(PlanTarget { width, required });
            current = width;
        }
    }
    targets
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::{ConfigTable, PlanOverrides, SizeSpec, resolve};

    fn config_with(spec: SizeSpec, max_width: Option<u32>, threshold: u32) -> ResolvedConfig {
        let mut overrides = PlanOverrides::new()
            .with_breakpoint_sizes(spec)
            .with_threshold(threshold);
        overrides.max_width = max_width;
        resolve(&ConfigTable::empty(), &overrides)
    }

    fn widths(result: &PlanResult) -> Vec<u32> {
        result.targets.iter().map(|t| t.width).collect()
    }

    #[test]
    fn worked_example() {
        // breakpoints {1920: 25vw, 1024: 50vw}, source 2000, no max_width,
        // threshold 0.
        let spec =
            SizeSpec::from_pairs([(1920, SizeValue::vw(25)), (1024, SizeValue::vw(50))]).unwrap();
        let result = plan_variants(2000, &config_with(spec, None, 0));

        assert_eq!(result.base_width, 2000);
        assert_eq!(widths(&result), vec![2000, 512, 480]);
        assert_eq!(
            result.sizes,
            vec![
                "(max-width: 1024px) 50vw".to_string(),
                "(max-width: 1920px) 25vw".to_string(),
                "25vw".to_string(),
            ]
        );
    }

    #[rstest]
    #[case(None, 2000, 2000, "unset max_width clamps to source")]
    #[case(Some(2560), 2000, 2000, "oversized max_width clamps to source")]
    #[case(Some(1600), 2000, 1600, "smaller max_width wins")]
    fn base_width_clamping(
        #[case] max_width: Option<u32>,
        #[case] source_width: u32,
        #[case] expected: u32,
        #[case] _description: &str,
    ) {
        let result = plan_variants(source_width, &config_with(SizeSpec::new(), max_width, 0));
        assert_eq!(result.base_width, expected);
        assert_eq!(widths(&result), vec![expected]);
    }

    #[test]
    fn empty_breakpoints_yield_default_hint_only() {
        let result = plan_variants(1200, &config_with(SizeSpec::new(), None, 0));
        assert_eq!(result.sizes, vec!["100vw".to_string()]);
        assert_eq!(widths(&result), vec![1200]);
    }

    #[test]
    fn vw_candidates_at_or_above_base_are_discarded() {
        // 1024 * 100vw = 1024 >= base 800: discarded, not clamped.
        let spec = SizeSpec::from_pairs([(1024, SizeValue::vw(100))]).unwrap();
        let result = plan_variants(800, &config_with(spec, None, 0));
        assert_eq!(widths(&result), vec![800]);
        // The hint entry is still emitted for the breakpoint.
        assert_eq!(result.sizes.len(), 2);
    }

    #[test]
    fn threshold_decimates_near_widths() {
        // Candidates 480 and 512 are 32 apart; threshold 69 keeps only the
        // first one seen walking down from the base.
        let spec =
            SizeSpec::from_pairs([(1920, SizeValue::vw(25)), (1024, SizeValue::vw(50))]).unwrap();
        let result = plan_variants(2000, &config_with(spec, None, 69));
        assert_eq!(widths(&result), vec![2000, 512]);
    }

    #[test]
    fn all_candidates_within_threshold_of_base_leaves_base_only() {
        let spec = SizeSpec::from_pairs([(1024, SizeValue::vw(95))]).unwrap();
        // Candidate ceil(1024*95/100) = 973; base 1000; delta 27 < 69.
        let result = plan_variants(1000, &config_with(spec, None, 69));
        assert_eq!(widths(&result), vec![1000]);
    }

    #[test]
    fn px_override_is_required_regardless_of_threshold() {
        let spec = SizeSpec::from_pairs([(1024, SizeValue::px(300))]).unwrap();
        let result = plan_variants(320, &config_with(spec, None, 1000));
        assert_eq!(widths(&result), vec![320, 300]);
        assert!(result.targets[1].required);
    }

    #[test]
    fn px_wider_than_base_is_clamped_and_required() {
        let spec = SizeSpec::from_pairs([(1024, SizeValue::px(3000))]).unwrap();
        let result = plan_variants(2000, &config_with(spec, None, 0));
        assert_eq!(widths(&result), vec![2000]);
        assert!(result.targets[0].required);
    }

    #[test]
    fn duplicate_width_keeps_required() {
        // 400px explicit and 800*50vw = 400 optional collapse into one
        // required candidate.
        let spec =
            SizeSpec::from_pairs([(600, SizeValue::px(400)), (800, SizeValue::vw(50))]).unwrap();
        let result = plan_variants(2000, &config_with(spec, None, 0));
        assert_eq!(widths(&result), vec![2000, 400]);
        assert!(result.targets[1].required);
    }

    #[test]
    fn required_resets_decimation_current() {
        // Walk: base 1000, optional 990 dropped (delta 10), required 985
        // kept, optional 905 kept (delta 80 from 985).
        let spec = SizeSpec::from_pairs([
            (1100, SizeValue::vw(90)),  // ceil(990)
            (1000, SizeValue::px(985)),
            (1810, SizeValue::vw(50)),  // ceil(905)
        ])
        .unwrap();
        let result = plan_variants(1000, &config_with(spec, None, 69));
        assert_eq!(widths(&result), vec![1000, 985, 905]);
    }

    #[test]
    fn optional_widths_are_strictly_below_base() {
        let spec = SizeSpec::from_pairs([
            (640, SizeValue::vw(100)),
            (1024, SizeValue::vw(50)),
            (1920, SizeValue::vw(25)),
        ])
        .unwrap();
        let result = plan_variants(700, &config_with(spec, None, 0));
        for target in &result.targets {
            if !target.required {
                assert!(target.width < result.base_width);
            }
        }
    }

    #[test]
    fn consecutive_kept_widths_honor_threshold_or_required() {
        let spec = SizeSpec::from_pairs([
            (640, SizeValue::vw(100)),
            (900, SizeValue::vw(80)),
            (1024, SizeValue::vw(50)),
            (1300, SizeValue::px(500)),
            (1920, SizeValue::vw(25)),
        ])
        .unwrap();
        let threshold = 69;
        let result = plan_variants(2400, &config_with(spec, None, threshold));

        for pair in result.targets.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert!(a.width > b.width, "targets must be strictly descending");
            assert!(
                a.width - b.width >= threshold || b.required,
                "gap {} below threshold and {} not required",
                a.width - b.width,
                b.width
            );
        }
    }

    #[test]
    fn default_hint_prefers_explicit_override() {
        let spec = SizeSpec::from_pairs([(1024, SizeValue::vw(50))]).unwrap();
        let mut overrides = PlanOverrides::new()
            .with_breakpoint_sizes(spec)
            .with_threshold(0);
        overrides.default_size = Some(SizeValue::px(480));
        let config = resolve(&ConfigTable::empty(), &overrides);

        let result = plan_variants(2000, &config);
        assert_eq!(result.sizes.last().unwrap(), "480px");
    }

    #[test]
    fn sizes_count_is_breakpoints_plus_one() {
        let spec = SizeSpec::from_pairs([
            (640, SizeValue::vw(100)),
            (1024, SizeValue::vw(50)),
            (1920, SizeValue::vw(25)),
        ])
        .unwrap();
        let result = plan_variants(2000, &config_with(spec, None, 0));
        assert_eq!(result.sizes.len(), 4);
    }
}
