//! Pattern engine: structural regularities across a draw history.
//!
//! Three detectors, each a pure function of the draw sequence:
//!
//! - **Consecutive runs**: maximal runs of consecutive values, bucketed as
//!   pair / triple / four-plus.
//! - **Odd/even balance**: per-draw odd-count distribution.
//! - **Decade ranges**: spread of each draw across the five decade buckets.
//!
//! Every aggregated pattern carries a significance score: the relative
//! deviation of its observed rate from the exact uniform-draw expectation,
//! clamped to 0..=1. The score ranks findings within the historical sample;
//! it is not a p-value and implies nothing about future draws.
//!
//! Unlike the frequency engine, the detectors accept arbitrarily small
//! inputs: patterns over zero draws are trivially absent, so an empty slice
//! yields an empty pattern list rather than an error.

pub mod consecutive;
pub mod helpers;
pub mod odd_even;
pub mod ranges;

pub use consecutive::{consecutive_patterns, RunBucket};
pub use helpers::significance;
pub use odd_even::{odd_even_distribution, odd_even_patterns, OddEvenDistribution};
pub use ranges::{
    range_distribution, range_patterns, RangeDistribution, DECADES, EXPECTED_PER_BUCKET,
};

use crate::config::AnalysisConfig;
use crate::{DrawOrder, DrawResult, Result, NUMBERS_PER_DRAW};

/// Kind of structural pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Consecutive,
    OddEven,
    Range,
}

/// One detected structural regularity.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Pattern {
    pub kind: PatternKind,
    /// Human-readable summary, e.g. "3 consecutive numbers".
    pub description: String,
    /// Draws exhibiting the pattern.
    pub frequency: usize,
    /// Relative deviation from the uniform-draw expectation, 0.0..=1.0.
    pub significance: f64,
    /// Example number sets from qualifying draws, newest first, capped.
    pub examples: Vec<[u8; NUMBERS_PER_DRAW]>,
}

/// Pattern engine output: the ordered pattern list plus the structured
/// distributions the recommendation engine steers by.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PatternSummary {
    pub total_draws: usize,
    /// Consecutive patterns first, then odd/even, then ranges.
    pub patterns: Vec<Pattern>,
    pub odd_even: OddEvenDistribution,
    pub ranges: RangeDistribution,
}

/// Detect all patterns in one pass over the history. Empty input yields an
/// empty list.
pub fn detect_patterns(
    draws: &[DrawResult],
    order: DrawOrder,
    config: &AnalysisConfig,
) -> Result<Vec<Pattern>> {
    Ok(analyze_patterns(draws, order, config)?.patterns)
}

/// Detect all patterns and keep the underlying distributions alongside.
pub fn analyze_patterns(
    draws: &[DrawResult],
    order: DrawOrder,
    config: &AnalysisConfig,
) -> Result<PatternSummary> {
    config.validate()?;

    let mut patterns = consecutive_patterns(draws, order, config.example_cap)?;
    patterns.extend(odd_even_patterns(draws, order, config.example_cap)?);
    patterns.extend(range_patterns(draws, order, config.example_cap)?);

    Ok(PatternSummary {
        total_draws: draws.len(),
        patterns,
        odd_even: odd_even_distribution(draws),
        ranges: range_distribution(draws),
    })
}
