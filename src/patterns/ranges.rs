//! Decade-range distribution.
//!
//! Partitions the pool into five decade buckets and tracks how each draw's
//! seven numbers spread across them. Under the uniform model a bucket holds
//! 7/5 = 1.4 numbers per draw on average; the detector reports buckets that
//! run above that expectation (two or more numbers) or are absent entirely.

use super::helpers;
use super::{Pattern, PatternKind};
use crate::{validate_draws, DrawOrder, DrawResult, Result, MIN_NUMBER, NUMBERS_PER_DRAW};

/// Decade buckets partitioning 1..=50.
pub const DECADES: [(u8, u8); 5] = [(1, 10), (11, 20), (21, 30), (31, 40), (41, 50)];

/// Uniform expectation for numbers per bucket per draw (7 / 5).
pub const EXPECTED_PER_BUCKET: f64 = NUMBERS_PER_DRAW as f64 / DECADES.len() as f64;

/// Numbers in each bucket.
const BUCKET_POOL: u64 = 10;

/// Index of the decade bucket holding `number`.
#[inline]
pub(crate) fn bucket_of(number: u8) -> usize {
    ((number - MIN_NUMBER) / 10) as usize
}

/// Per-bucket spread statistics over one draw history.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RangeDistribution {
    total_draws: usize,
    /// Average numbers per draw falling in each bucket.
    average_per_draw: [f64; DECADES.len()],
    /// Draws with two or more numbers from the bucket.
    over_represented: [usize; DECADES.len()],
    /// Draws with no number from the bucket.
    absent: [usize; DECADES.len()],
}

impl RangeDistribution {
    #[inline]
    pub fn total_draws(&self) -> usize {
        self.total_draws
    }

    pub fn average_per_draw(&self, bucket: usize) -> f64 {
        self.average_per_draw.get(bucket).copied().unwrap_or(0.0)
    }

    /// Draws with two or more numbers from `bucket`.
    pub fn over_represented(&self, bucket: usize) -> usize {
        self.over_represented.get(bucket).copied().unwrap_or(0)
    }

    /// Draws with no number from `bucket`.
    pub fn absent(&self, bucket: usize) -> usize {
        self.absent.get(bucket).copied().unwrap_or(0)
    }

    /// Share of draws where `bucket` exceeds the uniform expectation.
    pub fn over_share(&self, bucket: usize) -> f64 {
        if self.total_draws == 0 {
            return 0.0;
        }
        self.over_represented(bucket) as f64 / self.total_draws as f64
    }
}

/// Tally bucket spreads across the whole history.
pub fn range_distribution(draws: &[DrawResult]) -> RangeDistribution {
    let mut sums = [0usize; DECADES.len()];
    let mut over = [0usize; DECADES.len()];
    let mut absent = [0usize; DECADES.len()];

    for draw in draws {
        let mut per_draw = [0usize; DECADES.len()];
        for &number in draw.numbers() {
            per_draw[bucket_of(number)] += 1;
        }
        for (bucket, &count) in per_draw.iter().enumerate() {
            sums[bucket] += count;
            if count >= 2 {
                over[bucket] += 1;
            }
            if count == 0 {
                absent[bucket] += 1;
            }
        }
    }

    let total = draws.len();
    let mut average = [0.0f64; DECADES.len()];
    if total > 0 {
        for (bucket, &sum) in sums.iter().enumerate() {
            average[bucket] = sum as f64 / total as f64;
        }
    }

    RangeDistribution {
        total_draws: total,
        average_per_draw: average,
        over_represented: over,
        absent,
    }
}

/// One pattern per decade bucket that was over-represented at least once,
/// in bucket order. Examples are the most recent draws with two or more
/// numbers from the bucket.
pub fn range_patterns(
    draws: &[DrawResult],
    order: DrawOrder,
    example_cap: usize,
) -> Result<Vec<Pattern>> {
    validate_draws(draws)?;

    let len = draws.len();
    let distribution = range_distribution(draws);
    let mut examples: [Vec<[u8; NUMBERS_PER_DRAW]>; DECADES.len()] = Default::default();

    for chrono_index in (0..len).rev() {
        let draw = &draws[order.slice_index(chrono_index, len)];
        let mut per_draw = [0usize; DECADES.len()];
        for &number in draw.numbers() {
            per_draw[bucket_of(number)] += 1;
        }
        for (bucket, &count) in per_draw.iter().enumerate() {
            if count >= 2 && examples[bucket].len() < example_cap {
                examples[bucket].push(*draw.numbers());
            }
        }
    }

    let expected = helpers::hypergeometric_at_least(BUCKET_POOL, 2);
    let mut patterns = Vec::new();
    for (bucket, &(lo, hi)) in DECADES.iter().enumerate() {
        let frequency = distribution.over_represented(bucket);
        if frequency == 0 {
            continue;
        }
        patterns.push(Pattern {
            kind: PatternKind::Range,
            description: format!(
                "{lo}-{hi} over-represented ({:.2} numbers per draw)",
                distribution.average_per_draw(bucket)
            ),
            frequency,
            significance: helpers::significance(frequency, len, expected),
            examples: std::mem::take(&mut examples[bucket]),
        });
    }
    Ok(patterns)
}
