//! Consecutive-run detection.
//!
//! Scans each draw's sorted numbers for maximal runs of consecutive values
//! (length >= 2) and aggregates across draws into pair / triple / four-plus
//! buckets.

use super::helpers;
use super::{Pattern, PatternKind};
use crate::{validate_draws, DrawOrder, DrawResult, Result, NUMBERS_PER_DRAW};

/// Run-length bucket for aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunBucket {
    /// Maximal run of exactly two consecutive numbers.
    Pair,
    /// Maximal run of exactly three consecutive numbers.
    Triple,
    /// Any run of four or more consecutive numbers.
    FourPlus,
}

impl RunBucket {
    pub const ALL: [RunBucket; 3] = [RunBucket::Pair, RunBucket::Triple, RunBucket::FourPlus];

    pub fn label(self) -> &'static str {
        match self {
            RunBucket::Pair => "2 consecutive numbers",
            RunBucket::Triple => "3 consecutive numbers",
            RunBucket::FourPlus => "4 or more consecutive numbers",
        }
    }

    fn matches(self, run_len: usize) -> bool {
        match self {
            RunBucket::Pair => run_len == 2,
            RunBucket::Triple => run_len == 3,
            RunBucket::FourPlus => run_len >= 4,
        }
    }

    /// Share of uniform draws containing a qualifying run.
    fn expected_rate(self) -> f64 {
        match self {
            RunBucket::Pair => helpers::prob_maximal_run_exact(2),
            RunBucket::Triple => helpers::prob_maximal_run_exact(3),
            RunBucket::FourPlus => helpers::prob_run_at_least(4),
        }
    }
}

/// Lengths of maximal runs of consecutive values (each >= 2) in a sorted
/// number set.
pub(crate) fn maximal_runs(numbers: &[u8; NUMBERS_PER_DRAW]) -> Vec<usize> {
    let mut runs = Vec::new();
    let mut len = 1;
    for pair in numbers.windows(2) {
        if pair[1] == pair[0] + 1 {
            len += 1;
        } else {
            if len >= 2 {
                runs.push(len);
            }
            len = 1;
        }
    }
    if len >= 2 {
        runs.push(len);
    }
    runs
}

/// Detect consecutive-run patterns, one per bucket observed at least once.
/// Examples are the most recent qualifying draws, capped at `example_cap`.
pub fn consecutive_patterns(
    draws: &[DrawResult],
    order: DrawOrder,
    example_cap: usize,
) -> Result<Vec<Pattern>> {
    validate_draws(draws)?;

    let len = draws.len();
    let mut frequency = [0usize; RunBucket::ALL.len()];
    let mut examples: [Vec<[u8; NUMBERS_PER_DRAW]>; RunBucket::ALL.len()] = Default::default();

    // newest first so example lists lead with the most recent draws
    for chrono_index in (0..len).rev() {
        let draw = &draws[order.slice_index(chrono_index, len)];
        let runs = maximal_runs(draw.numbers());
        if runs.is_empty() {
            continue;
        }
        for (slot, bucket) in RunBucket::ALL.iter().enumerate() {
            if runs.iter().any(|&r| bucket.matches(r)) {
                frequency[slot] += 1;
                if examples[slot].len() < example_cap {
                    examples[slot].push(*draw.numbers());
                }
            }
        }
    }

    let mut patterns = Vec::new();
    for (slot, bucket) in RunBucket::ALL.iter().enumerate() {
        if frequency[slot] == 0 {
            continue;
        }
        patterns.push(Pattern {
            kind: PatternKind::Consecutive,
            description: bucket.label().to_string(),
            frequency: frequency[slot],
            significance: helpers::significance(frequency[slot], len, bucket.expected_rate()),
            examples: std::mem::take(&mut examples[slot]),
        });
    }
    Ok(patterns)
}
