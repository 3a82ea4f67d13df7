//! Null-model combinatorics shared across the pattern detectors.
//!
//! Every expectation is an exact probability under uniform sampling of a
//! 7-subset from 1..=50, obtained by integer counting. No Monte Carlo, no
//! tabulated approximations.

use crate::{NUMBERS_PER_DRAW, POOL_SIZE};

/// Binomial coefficient n choose k, exact for every value this crate needs
/// (the largest is 50 choose 7, far below the u128 ceiling).
pub(crate) fn binomial(n: u64, k: u64) -> f64 {
    binomial_exact(n, k) as f64
}

fn binomial_exact(n: u64, k: u64) -> u128 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        // exact at every step: C(n, i+1) = C(n, i) * (n - i) / (i + 1)
        acc = acc * (n - i) as u128 / (i + 1) as u128;
    }
    acc
}

/// P(exactly `k` of the 7 drawn numbers come from a fixed sub-population of
/// `m` numbers out of the 50).
pub(crate) fn hypergeometric(m: u64, k: u64) -> f64 {
    let draws = NUMBERS_PER_DRAW as u64;
    let pool = POOL_SIZE as u64;
    if k > draws {
        return 0.0;
    }
    binomial(m, k) * binomial(pool - m, draws - k) / binomial(pool, draws)
}

/// P(at least `k` of the 7 drawn numbers come from a sub-population of `m`).
pub(crate) fn hypergeometric_at_least(m: u64, k: u64) -> f64 {
    (k..=NUMBERS_PER_DRAW as u64)
        .map(|j| hypergeometric(m, j))
        .sum()
}

/// Number of 7-subsets of 1..=50 whose longest run of consecutive values is
/// at most `cap`.
///
/// Counts binary strings of length 50 with exactly 7 ones and no 1-run
/// longer than `cap`; states are (ones placed, current trailing run).
fn subsets_with_max_run_at_most(cap: usize) -> u64 {
    let mut dp = vec![vec![0u64; cap + 1]; NUMBERS_PER_DRAW + 1];
    dp[0][0] = 1;

    for _position in 0..POOL_SIZE {
        let mut next = vec![vec![0u64; cap + 1]; NUMBERS_PER_DRAW + 1];
        for ones in 0..=NUMBERS_PER_DRAW {
            for run in 0..=cap {
                let ways = dp[ones][run];
                if ways == 0 {
                    continue;
                }
                // skip this value: the trailing run ends
                next[ones][0] += ways;
                // draw this value: the trailing run grows
                if ones < NUMBERS_PER_DRAW && run < cap {
                    next[ones + 1][run + 1] += ways;
                }
            }
        }
        dp = next;
    }

    dp[NUMBERS_PER_DRAW].iter().sum()
}

/// Number of 7-subsets of 1..=50 containing at least one maximal run of
/// exactly `len` consecutive values.
fn subsets_with_maximal_run_exact(len: usize) -> u64 {
    // states: (seen a maximal run of exactly `len`, ones placed, trailing run)
    let mut dp = [[[0u64; NUMBERS_PER_DRAW + 1]; NUMBERS_PER_DRAW + 1]; 2];
    dp[0][0][0] = 1;

    for _position in 0..POOL_SIZE {
        let mut next = [[[0u64; NUMBERS_PER_DRAW + 1]; NUMBERS_PER_DRAW + 1]; 2];
        for seen in 0..2 {
            for ones in 0..=NUMBERS_PER_DRAW {
                for run in 0..=ones {
                    let ways = dp[seen][ones][run];
                    if ways == 0 {
                        continue;
                    }
                    // skip this value: the trailing run becomes maximal
                    let now_seen = (seen == 1 || run == len) as usize;
                    next[now_seen][ones][0] += ways;
                    // draw this value: the trailing run grows
                    if ones < NUMBERS_PER_DRAW {
                        next[seen][ones + 1][run + 1] += ways;
                    }
                }
            }
        }
        dp = next;
    }

    // the final trailing run is maximal too
    let mut count = 0u64;
    for seen in 0..2 {
        for run in 0..=NUMBERS_PER_DRAW {
            if seen == 1 || run == len {
                count += dp[seen][NUMBERS_PER_DRAW][run];
            }
        }
    }
    count
}

/// P(a uniform draw contains a run of `min_len` or more consecutive numbers).
pub(crate) fn prob_run_at_least(min_len: usize) -> f64 {
    let total = binomial(POOL_SIZE as u64, NUMBERS_PER_DRAW as u64);
    1.0 - subsets_with_max_run_at_most(min_len - 1) as f64 / total
}

/// P(a uniform draw contains at least one maximal run of exactly `len`).
pub(crate) fn prob_maximal_run_exact(len: usize) -> f64 {
    let total = binomial(POOL_SIZE as u64, NUMBERS_PER_DRAW as u64);
    subsets_with_maximal_run_exact(len) as f64 / total
}

/// Relative deviation of an observed pattern rate from its null expectation:
/// `|f/N - e| / e`, clamped to 0.0..=1.0.
///
/// A ranking heuristic over the historical sample, not a p-value.
pub fn significance(frequency: usize, total_draws: usize, expected_rate: f64) -> f64 {
    if total_draws == 0 {
        return 0.0;
    }
    if expected_rate <= 0.0 {
        return if frequency > 0 { 1.0 } else { 0.0 };
    }
    let observed = frequency as f64 / total_draws as f64;
    ((observed - expected_rate).abs() / expected_rate).clamp(0.0, 1.0)
}
