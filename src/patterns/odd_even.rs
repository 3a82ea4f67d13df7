//! Odd/even balance across draws.
//!
//! Each draw's seven numbers produce an odd-count key (0..=7); the detector
//! aggregates occurrence counts per key and scores each against the exact
//! hypergeometric expectation (25 odd and 25 even numbers in the pool).

use super::helpers;
use super::{Pattern, PatternKind};
use crate::{validate_draws, DrawOrder, DrawResult, Result, NUMBERS_PER_DRAW, POOL_SIZE};

/// Odd numbers in the pool (1, 3, ..., 49).
const ODD_POOL: u64 = (POOL_SIZE as u64 + 1) / 2;

/// Occurrence counts keyed by per-draw odd count.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OddEvenDistribution {
    total_draws: usize,
    counts: [usize; NUMBERS_PER_DRAW + 1],
}

impl OddEvenDistribution {
    #[inline]
    pub fn total_draws(&self) -> usize {
        self.total_draws
    }

    /// Draws with exactly `odd` odd numbers.
    pub fn count(&self, odd: usize) -> usize {
        self.counts.get(odd).copied().unwrap_or(0)
    }

    /// Share of draws with exactly `odd` odd numbers.
    pub fn share(&self, odd: usize) -> f64 {
        if self.total_draws == 0 {
            return 0.0;
        }
        self.count(odd) as f64 / self.total_draws as f64
    }

    /// The most frequent (odd, even) split. Ties resolve to the lower odd
    /// count; an empty distribution reports (0, 7).
    pub fn most_common_split(&self) -> (usize, usize) {
        let mut best = 0;
        for (odd, &count) in self.counts.iter().enumerate() {
            if count > self.counts[best] {
                best = odd;
            }
        }
        (best, NUMBERS_PER_DRAW - best)
    }
}

/// Tally the odd-count key of every draw.
pub fn odd_even_distribution(draws: &[DrawResult]) -> OddEvenDistribution {
    let mut counts = [0usize; NUMBERS_PER_DRAW + 1];
    for draw in draws {
        counts[draw.odd_count()] += 1;
    }
    OddEvenDistribution {
        total_draws: draws.len(),
        counts,
    }
}

/// One pattern per observed odd/even split, in ascending odd-count order.
pub fn odd_even_patterns(
    draws: &[DrawResult],
    order: DrawOrder,
    example_cap: usize,
) -> Result<Vec<Pattern>> {
    validate_draws(draws)?;

    let len = draws.len();
    let distribution = odd_even_distribution(draws);
    let mut examples: [Vec<[u8; NUMBERS_PER_DRAW]>; NUMBERS_PER_DRAW + 1] = Default::default();

    for chrono_index in (0..len).rev() {
        let draw = &draws[order.slice_index(chrono_index, len)];
        let slot = draw.odd_count();
        if examples[slot].len() < example_cap {
            examples[slot].push(*draw.numbers());
        }
    }

    let mut patterns = Vec::new();
    for odd in 0..=NUMBERS_PER_DRAW {
        let frequency = distribution.count(odd);
        if frequency == 0 {
            continue;
        }
        let expected = helpers::hypergeometric(ODD_POOL, odd as u64);
        patterns.push(Pattern {
            kind: PatternKind::OddEven,
            description: format!("{odd} odd / {} even", NUMBERS_PER_DRAW - odd),
            frequency,
            significance: helpers::significance(frequency, len, expected),
            examples: std::mem::take(&mut examples[odd]),
        });
    }
    Ok(patterns)
}
