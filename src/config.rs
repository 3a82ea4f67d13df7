//! Analysis configuration.
//!
//! Every tunable is an explicit value threaded into engine calls. The
//! engines hold no ambient state, so two calls with different configs never
//! interfere and each call is independently testable.

use crate::{AnalysisError, Result, Threshold, NUMBERS_PER_DRAW, POOL_SIZE};

/// Minimum sample size before frequency statistics are considered reliable.
pub const DEFAULT_MIN_DRAWS: usize = 50;

/// Expected share of draws containing any given number under the uniform
/// model: 7 / 50.
pub const EXPECTED_NUMBER_RATE: f64 = NUMBERS_PER_DRAW as f64 / POOL_SIZE as f64;

/// Default hot threshold: a number is hot when it appears in at least this
/// share of draws (the uniform expectation is 0.14).
pub const DEFAULT_HOT_THRESHOLD: Threshold = Threshold::new_const(0.16);

/// Default cold threshold: a number is cold when it appears in at most this
/// share of draws.
pub const DEFAULT_COLD_THRESHOLD: Threshold = Threshold::new_const(0.12);

/// Example draws kept per detected pattern.
pub const DEFAULT_EXAMPLE_CAP: usize = 5;

/// Slot allocation for the balanced strategy.
///
/// The exact ratio is a tunable, not a load-bearing constant; any split
/// whose total stays within the pick count is valid, and the fall-forward
/// rule fills whatever the slots leave open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SlotSplit {
    /// Slots taken from the top of the hot ranking.
    pub hot: usize,
    /// Slots taken from the top of the cold ranking.
    pub cold: usize,
    /// Slots filled by pattern-normalizing picks.
    pub pattern: usize,
}

impl Default for SlotSplit {
    fn default() -> Self {
        Self {
            hot: 3,
            cold: 2,
            pattern: 2,
        }
    }
}

impl SlotSplit {
    #[inline]
    pub fn total(&self) -> usize {
        self.hot + self.cold + self.pattern
    }
}

/// Configuration for a single analysis run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnalysisConfig {
    /// Smallest sample the frequency engine accepts.
    pub min_draws: usize,
    /// Share of draws at or above which a number counts as hot.
    pub hot_threshold: Threshold,
    /// Share of draws at or below which a number counts as cold.
    pub cold_threshold: Threshold,
    /// Numbers per recommendation.
    pub pick_count: usize,
    /// Example draws kept per detected pattern.
    pub example_cap: usize,
    /// Balanced-strategy slot allocation.
    pub slot_split: SlotSplit,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_draws: DEFAULT_MIN_DRAWS,
            hot_threshold: DEFAULT_HOT_THRESHOLD,
            cold_threshold: DEFAULT_COLD_THRESHOLD,
            pick_count: NUMBERS_PER_DRAW,
            example_cap: DEFAULT_EXAMPLE_CAP,
            slot_split: SlotSplit::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_draws == 0 {
            return Err(AnalysisError::InvalidConfig(
                "min_draws must be > 0".to_string(),
            ));
        }
        if self.pick_count == 0 {
            return Err(AnalysisError::InvalidConfig(
                "pick_count must be > 0".to_string(),
            ));
        }
        if self.pick_count > POOL_SIZE {
            return Err(AnalysisError::InvalidConfig(format!(
                "pick_count {} exceeds the pool of {POOL_SIZE} numbers",
                self.pick_count
            )));
        }
        if self.slot_split.total() > self.pick_count {
            return Err(AnalysisError::InvalidConfig(format!(
                "slot split {}+{}+{} exceeds pick_count {}",
                self.slot_split.hot, self.slot_split.cold, self.slot_split.pattern, self.pick_count
            )));
        }
        Ok(())
    }
}
