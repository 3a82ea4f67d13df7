//! # YALDA - Yet Another Lottery Draw Analyzer
//!
//! Descriptive statistics, structural pattern detection, and ranked number
//! recommendations for "pick 7 of 1..=50 plus bonus" lottery histories.
//!
//! The crate is a pure computation core: it consumes a chronologically
//! ordered slice of validated [`DrawResult`] records and produces a dense
//! per-number [`frequency::FrequencyTable`], an ordered list of
//! [`patterns::Pattern`] findings, and one [`recommend::Recommendation`]
//! per strategy. Acquisition, storage, rendering, and command parsing are
//! external collaborators.
//!
//! ## Quick Start
//!
//! ```rust
//! use yalda::prelude::*;
//! use chrono::{Days, NaiveDate};
//!
//! # fn main() -> yalda::Result<()> {
//! let start = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
//! let draws: Vec<DrawResult> = (0..60u64)
//!     .map(|i| {
//!         DrawResult::new(
//!             start + Days::new(i * 3),
//!             [1 + (i % 5) as u8, 9, 14, 23, 30, 38, 45],
//!             17,
//!             50_000_000.0,
//!             format!("2024-{i:04}"),
//!         )
//!     })
//!     .collect::<yalda::Result<_>>()?;
//!
//! let config = AnalysisConfig::default();
//! let analysis = analyze(&draws, DrawOrder::Ascending, &config)?;
//!
//! for rec in &analysis.recommendations {
//!     println!("{}: {:?} ({:.0}%)", rec.strategy, rec.numbers, rec.confidence * 100.0);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! All engines are pure functions of their inputs. A word of caution that
//! also appears in every generated rationale: the statistics describe the
//! historical sample only. Draws are independent random events and nothing
//! here predicts future outcomes.

use chrono::NaiveDate;

pub mod config;
pub mod frequency;
pub mod patterns;
pub mod recommend;

pub mod prelude {
    pub use crate::{
        // Pipeline
        analyze,
        // Configuration
        config::{AnalysisConfig, SlotSplit},
        // Frequency engine
        frequency::{
            cold_numbers, compute_frequency, compute_frequency_with_bonus, frequency_trends,
            hot_numbers, overdue_numbers, rank_cold, rank_hot, FrequencyStats, FrequencyTable,
            TrendWindow,
        },
        // Pattern engine
        patterns::{
            analyze_patterns, detect_patterns, significance, OddEvenDistribution, Pattern,
            PatternKind, PatternSummary, RangeDistribution, RunBucket, DECADES,
        },
        // Recommendation engine
        recommend::{generate, generate_all, Recommendation, Strategy},
        Analysis,
        // Errors
        AnalysisError,
        DrawOrder,
        // Types
        DrawResult,
        Result,
        Threshold,
        MAX_NUMBER,
        MIN_NUMBER,
        NUMBERS_PER_DRAW,
        POOL_SIZE,
    };
}

// ============================================================
// GAME CONSTANTS
// ============================================================

/// Smallest drawable number.
pub const MIN_NUMBER: u8 = 1;
/// Largest drawable number.
pub const MAX_NUMBER: u8 = 50;
/// Main numbers drawn per draw (the bonus number is separate).
pub const NUMBERS_PER_DRAW: usize = 7;
/// Size of the number pool.
pub const POOL_SIZE: usize = (MAX_NUMBER - MIN_NUMBER + 1) as usize;

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors that can occur during analysis
#[derive(Debug, Clone, thiserror::Error)]
pub enum AnalysisError {
    #[error("Invalid value: {0}")]
    InvalidValue(&'static str),

    #[error("{field} = {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Insufficient data: need {need} draws, got {got}")]
    InsufficientData { need: usize, got: usize },

    #[error("Invalid draw {draw_id:?}: {reason}")]
    InvalidDraw {
        draw_id: String,
        reason: &'static str,
    },

    #[error("Unknown strategy: {0:?}")]
    InvalidStrategy(String),
}

// ============================================================
// VALIDATED TYPES
// ============================================================

/// Normalized value in range 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Threshold(f64);

impl Threshold {
    /// Create a new Threshold, validating the value is in [0.0, 1.0]
    pub fn new(value: f64) -> Result<Self> {
        if value.is_nan() || value.is_infinite() {
            return Err(AnalysisError::InvalidValue(
                "Threshold cannot be NaN or infinite",
            ));
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(AnalysisError::OutOfRange {
                field: "Threshold",
                value,
                min: 0.0,
                max: 1.0,
            });
        }
        Ok(Self(value))
    }

    /// Create a Threshold from a compile-time constant (library internal use)
    #[doc(hidden)]
    pub const fn new_const(value: f64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl serde::Serialize for Threshold {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Threshold {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = f64::deserialize(d)?;
        Threshold::new(value).map_err(serde::de::Error::custom)
    }
}

// ============================================================
// DRAW RECORD
// ============================================================

/// One historical draw: date, seven distinct main numbers, a bonus number,
/// and the jackpot amount.
///
/// Immutable once constructed; [`DrawResult::new`] validates the structural
/// invariants and keeps the main numbers sorted ascending. Deserialization
/// routes through the same validation.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DrawResult {
    date: NaiveDate,
    numbers: [u8; NUMBERS_PER_DRAW],
    bonus: u8,
    jackpot_amount: f64,
    draw_id: String,
}

impl DrawResult {
    /// Build a validated draw record. The bonus number is not required to
    /// be distinct from the main numbers.
    pub fn new(
        date: NaiveDate,
        mut numbers: [u8; NUMBERS_PER_DRAW],
        bonus: u8,
        jackpot_amount: f64,
        draw_id: impl Into<String>,
    ) -> Result<Self> {
        numbers.sort_unstable();
        let draw = Self {
            date,
            numbers,
            bonus,
            jackpot_amount,
            draw_id: draw_id.into(),
        };
        draw.validate()?;
        Ok(draw)
    }

    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Main numbers, sorted ascending.
    #[inline]
    pub fn numbers(&self) -> &[u8; NUMBERS_PER_DRAW] {
        &self.numbers
    }

    #[inline]
    pub fn bonus(&self) -> u8 {
        self.bonus
    }

    #[inline]
    pub fn jackpot_amount(&self) -> f64 {
        self.jackpot_amount
    }

    #[inline]
    pub fn draw_id(&self) -> &str {
        &self.draw_id
    }

    /// True if `number` is among the main numbers (bonus excluded).
    #[inline]
    pub fn contains(&self, number: u8) -> bool {
        self.numbers.binary_search(&number).is_ok()
    }

    /// How many of the main numbers are odd.
    #[inline]
    pub fn odd_count(&self) -> usize {
        self.numbers.iter().filter(|n| *n % 2 == 1).count()
    }

    /// Re-check the structural invariants.
    ///
    /// The constructor already enforces them; the engines call this again
    /// on every input slice and fail fast instead of computing over garbage.
    pub fn validate(&self) -> Result<()> {
        if self.numbers[0] < MIN_NUMBER || self.numbers[NUMBERS_PER_DRAW - 1] > MAX_NUMBER {
            return Err(self.invalid("number outside 1..=50"));
        }
        for pair in self.numbers.windows(2) {
            if pair[0] >= pair[1] {
                return Err(self.invalid("numbers must be distinct"));
            }
        }
        if !(MIN_NUMBER..=MAX_NUMBER).contains(&self.bonus) {
            return Err(self.invalid("bonus outside 1..=50"));
        }
        if !self.jackpot_amount.is_finite() || self.jackpot_amount < 0.0 {
            return Err(self.invalid("jackpot amount must be finite and non-negative"));
        }
        if self.draw_id.is_empty() {
            return Err(self.invalid("empty draw id"));
        }
        Ok(())
    }

    fn invalid(&self, reason: &'static str) -> AnalysisError {
        AnalysisError::InvalidDraw {
            draw_id: self.draw_id.clone(),
            reason,
        }
    }
}

impl<'de> serde::Deserialize<'de> for DrawResult {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct Raw {
            date: NaiveDate,
            numbers: Vec<u8>,
            bonus: u8,
            jackpot_amount: f64,
            draw_id: String,
        }

        let raw = Raw::deserialize(d)?;
        let numbers: [u8; NUMBERS_PER_DRAW] = raw
            .numbers
            .try_into()
            .map_err(|_| serde::de::Error::custom("expected exactly 7 numbers"))?;
        DrawResult::new(raw.date, numbers, raw.bonus, raw.jackpot_amount, raw.draw_id)
            .map_err(serde::de::Error::custom)
    }
}

/// Chronological order of an input slice.
///
/// Gap and recency statistics depend on draw order, so the caller declares
/// which end of the slice is oldest instead of the engines guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DrawOrder {
    /// Oldest draw first.
    Ascending,
    /// Newest draw first.
    Descending,
}

impl DrawOrder {
    /// Map a chronological index (0 = oldest) to a slice index.
    #[inline]
    pub(crate) fn slice_index(self, chrono_index: usize, len: usize) -> usize {
        match self {
            DrawOrder::Ascending => chrono_index,
            DrawOrder::Descending => len - 1 - chrono_index,
        }
    }
}

/// Fail fast if any draw in the slice violates the structural invariants.
pub(crate) fn validate_draws(draws: &[DrawResult]) -> Result<()> {
    for draw in draws {
        draw.validate()?;
    }
    Ok(())
}

// ============================================================
// TOP-LEVEL PIPELINE
// ============================================================

/// Full output of one analysis run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Analysis {
    pub frequency: frequency::FrequencyTable,
    pub patterns: patterns::PatternSummary,
    pub recommendations: Vec<recommend::Recommendation>,
}

/// Run the full pipeline over one draw history.
///
/// The frequency and pattern engines are independent pure functions of the
/// same immutable slice and run on separate rayon tasks; the recommendation
/// engine joins both results.
pub fn analyze(
    draws: &[DrawResult],
    order: DrawOrder,
    config: &config::AnalysisConfig,
) -> Result<Analysis> {
    config.validate()?;

    let (frequency, patterns) = rayon::join(
        || frequency::compute_frequency(draws, order, config),
        || patterns::analyze_patterns(draws, order, config),
    );
    let frequency = frequency?;
    let patterns = patterns?;

    let recommendations = recommend::generate_all(&frequency, &patterns, config)?;

    Ok(Analysis {
        frequency,
        patterns,
        recommendations,
    })
}

// ============================================================
// TESTS
// ============================================================
