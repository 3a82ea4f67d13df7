//! Frequency engine: per-number counts, recency, and gap statistics.
//!
//! Single pass over the draw history, O(draws × 7) time and O(50) state.
//! The output table is dense: every number 1..=50 has an entry even when
//! its count is zero.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::config::AnalysisConfig;
use crate::{
    validate_draws, AnalysisError, DrawOrder, DrawResult, Result, Threshold, MAX_NUMBER,
    MIN_NUMBER, POOL_SIZE,
};

/// Per-number frequency summary.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrequencyStats {
    pub number: u8,
    /// Draws containing the number.
    pub count: usize,
    /// Share of draws containing the number, 0.0..=1.0.
    pub percentage: f64,
    /// Date of the most recent appearance.
    pub last_seen: Option<NaiveDate>,
    /// Mean number of draws between consecutive appearances. Absent when
    /// the number appeared fewer than twice (zero would wrongly read as
    /// back-to-back recurrence).
    pub average_gap: Option<f64>,
}

/// Dense per-number statistics over one draw history.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FrequencyTable {
    total_draws: usize,
    earliest: NaiveDate,
    latest: NaiveDate,
    stats: Vec<FrequencyStats>,
}

impl FrequencyTable {
    #[inline]
    pub fn total_draws(&self) -> usize {
        self.total_draws
    }

    #[inline]
    pub fn earliest_draw(&self) -> NaiveDate {
        self.earliest
    }

    #[inline]
    pub fn latest_draw(&self) -> NaiveDate {
        self.latest
    }

    /// Stats for one number; `None` outside 1..=50.
    pub fn get(&self, number: u8) -> Option<&FrequencyStats> {
        if !(MIN_NUMBER..=MAX_NUMBER).contains(&number) {
            return None;
        }
        self.stats.get((number - MIN_NUMBER) as usize)
    }

    /// All 50 entries in ascending number order.
    pub fn iter(&self) -> impl Iterator<Item = &FrequencyStats> {
        self.stats.iter()
    }
}

/// Whether the bonus number participates in counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CountMode {
    MainOnly,
    WithBonus,
}

/// Compute the dense frequency table over a draw history. The bonus number
/// is excluded; see [`compute_frequency_with_bonus`] for the inclusive mode.
///
/// Fails with `InsufficientData` below `config.min_draws` and re-validates
/// every draw defensively.
pub fn compute_frequency(
    draws: &[DrawResult],
    order: DrawOrder,
    config: &AnalysisConfig,
) -> Result<FrequencyTable> {
    compute(draws, order, config, CountMode::MainOnly)
}

/// Bonus-inclusive variant of [`compute_frequency`]. A draw whose bonus
/// duplicates one of its main numbers still counts once for that number.
pub fn compute_frequency_with_bonus(
    draws: &[DrawResult],
    order: DrawOrder,
    config: &AnalysisConfig,
) -> Result<FrequencyTable> {
    compute(draws, order, config, CountMode::WithBonus)
}

fn compute(
    draws: &[DrawResult],
    order: DrawOrder,
    config: &AnalysisConfig,
    mode: CountMode,
) -> Result<FrequencyTable> {
    config.validate()?;
    if draws.len() < config.min_draws {
        return Err(AnalysisError::InsufficientData {
            need: config.min_draws,
            got: draws.len(),
        });
    }
    validate_draws(draws)?;

    let len = draws.len();
    let mut count = [0usize; POOL_SIZE];
    let mut gap_sum = [0usize; POOL_SIZE];
    let mut gap_count = [0usize; POOL_SIZE];
    let mut prev_index = [usize::MAX; POOL_SIZE];
    let mut last_seen: [Option<NaiveDate>; POOL_SIZE] = [None; POOL_SIZE];

    for chrono_index in 0..len {
        let draw = &draws[order.slice_index(chrono_index, len)];
        let date = draw.date();

        let mut mark = |number: u8| {
            let slot = (number - MIN_NUMBER) as usize;
            count[slot] += 1;
            if prev_index[slot] != usize::MAX {
                gap_sum[slot] += chrono_index - prev_index[slot];
                gap_count[slot] += 1;
            }
            prev_index[slot] = chrono_index;
            last_seen[slot] = Some(date);
        };

        for &number in draw.numbers() {
            mark(number);
        }
        if mode == CountMode::WithBonus && !draw.contains(draw.bonus()) {
            mark(draw.bonus());
        }
    }

    let total = len as f64;
    let stats = (0..POOL_SIZE)
        .map(|slot| FrequencyStats {
            number: MIN_NUMBER + slot as u8,
            count: count[slot],
            percentage: count[slot] as f64 / total,
            last_seen: last_seen[slot],
            average_gap: (gap_count[slot] > 0)
                .then(|| gap_sum[slot] as f64 / gap_count[slot] as f64),
        })
        .collect();

    // min/max scan rather than trusting the declared order for the range
    let earliest = draws.iter().map(DrawResult::date).min().unwrap_or_default();
    let latest = draws.iter().map(DrawResult::date).max().unwrap_or_default();

    Ok(FrequencyTable {
        total_draws: len,
        earliest,
        latest,
        stats,
    })
}

#[inline]
fn gap_or_inf(stats: &FrequencyStats) -> f64 {
    stats.average_gap.unwrap_or(f64::INFINITY)
}

/// Threshold-free hot ordering over all 50 numbers: percentage descending,
/// then smaller average gap (absent gap sorts last), then ascending number.
pub fn rank_hot(table: &FrequencyTable) -> Vec<u8> {
    let mut entries: Vec<&FrequencyStats> = table.iter().collect();
    entries.sort_by(|a, b| {
        b.percentage
            .total_cmp(&a.percentage)
            .then_with(|| gap_or_inf(a).total_cmp(&gap_or_inf(b)))
            .then_with(|| a.number.cmp(&b.number))
    });
    entries.into_iter().map(|s| s.number).collect()
}

/// Threshold-free cold ordering over all 50 numbers: percentage ascending,
/// then larger average gap (absent gap sorts first), then ascending number.
pub fn rank_cold(table: &FrequencyTable) -> Vec<u8> {
    let mut entries: Vec<&FrequencyStats> = table.iter().collect();
    entries.sort_by(|a, b| {
        a.percentage
            .total_cmp(&b.percentage)
            .then_with(|| gap_or_inf(b).total_cmp(&gap_or_inf(a)))
            .then_with(|| a.number.cmp(&b.number))
    });
    entries.into_iter().map(|s| s.number).collect()
}

/// Numbers whose share of draws is at or above `threshold`, hottest first.
pub fn hot_numbers(table: &FrequencyTable, threshold: Threshold) -> Vec<u8> {
    rank_hot(table)
        .into_iter()
        .filter(|&n| {
            table
                .get(n)
                .map_or(false, |s| s.percentage >= threshold.get())
        })
        .collect()
}

/// Numbers whose share of draws is at or below `threshold`, coldest first.
pub fn cold_numbers(table: &FrequencyTable, threshold: Threshold) -> Vec<u8> {
    rank_cold(table)
        .into_iter()
        .filter(|&n| {
            table
                .get(n)
                .map_or(false, |s| s.percentage <= threshold.get())
        })
        .collect()
}

/// Per-window frequency counts from [`frequency_trends`].
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TrendWindow {
    /// Chronological index of the first draw in the window (0 = oldest).
    pub start_index: usize,
    /// One past the chronological index of the last draw.
    pub end_index: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    counts: Vec<usize>,
}

impl TrendWindow {
    /// Appearances of `number` within this window.
    pub fn count(&self, number: u8) -> usize {
        if !(MIN_NUMBER..=MAX_NUMBER).contains(&number) {
            return 0;
        }
        self.counts[(number - MIN_NUMBER) as usize]
    }

    /// All 50 counts in ascending number order.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end_index - self.start_index
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Split the history into fixed-size trailing windows and count per-number
/// appearances in each, oldest window first. A leading remainder shorter
/// than `window` is dropped, not zero-padded, so every window covers the
/// same number of draws.
pub fn frequency_trends(
    draws: &[DrawResult],
    order: DrawOrder,
    window: usize,
    config: &AnalysisConfig,
) -> Result<Vec<TrendWindow>> {
    config.validate()?;
    if window == 0 {
        return Err(AnalysisError::InvalidConfig(
            "trend window must be > 0".to_string(),
        ));
    }
    if draws.len() < config.min_draws {
        return Err(AnalysisError::InsufficientData {
            need: config.min_draws,
            got: draws.len(),
        });
    }
    validate_draws(draws)?;

    let len = draws.len();
    let mut windows = Vec::with_capacity(len / window);
    let mut start = len % window;

    while start + window <= len {
        let mut counts = vec![0usize; POOL_SIZE];
        for chrono_index in start..start + window {
            let draw = &draws[order.slice_index(chrono_index, len)];
            for &number in draw.numbers() {
                counts[(number - MIN_NUMBER) as usize] += 1;
            }
        }
        windows.push(TrendWindow {
            start_index: start,
            end_index: start + window,
            start_date: draws[order.slice_index(start, len)].date(),
            end_date: draws[order.slice_index(start + window - 1, len)].date(),
            counts,
        });
        start += window;
    }

    Ok(windows)
}

/// Numbers not drawn within `threshold_days` of the latest draw date, most
/// overdue first (ties broken by ascending number). Numbers never drawn in
/// the sample measure from the earliest draw date.
pub fn overdue_numbers(table: &FrequencyTable, threshold_days: i64) -> Vec<(u8, i64)> {
    let latest = table.latest_draw();
    let mut overdue: Vec<(u8, i64)> = table
        .iter()
        .filter_map(|stats| {
            let since = match stats.last_seen {
                Some(date) => (latest - date).num_days(),
                None => (latest - table.earliest_draw()).num_days(),
            };
            (since >= threshold_days).then_some((stats.number, since))
        })
        .collect();
    overdue.sort_by(|a, b| match b.1.cmp(&a.1) {
        Ordering::Equal => a.0.cmp(&b.0),
        other => other,
    });
    overdue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NUMBERS_PER_DRAW;
    use chrono::Days;

    fn day(offset: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 5).unwrap() + Days::new(offset * 3)
    }

    fn draw(offset: u64, numbers: [u8; NUMBERS_PER_DRAW]) -> DrawResult {
        DrawResult::new(day(offset), numbers, 11, 60_000_000.0, format!("d{offset}")).unwrap()
    }

    fn small_config() -> AnalysisConfig {
        AnalysisConfig {
            min_draws: 1,
            ..AnalysisConfig::default()
        }
    }

    /// 10 draws; number 5 appears at chronological indices 1, 4 and 9.
    fn gap_fixture() -> Vec<DrawResult> {
        (0..10)
            .map(|i| {
                let lead = if i == 1 || i == 4 || i == 9 { 5 } else { 6 };
                draw(i, [lead, 10, 20, 30, 40, 49, 50])
            })
            .collect()
    }

    #[test]
    fn test_average_gap_formula() {
        let draws = gap_fixture();
        let table = compute_frequency(&draws, DrawOrder::Ascending, &small_config()).unwrap();

        let five = table.get(5).unwrap();
        assert_eq!(five.count, 3);
        // gaps (4-1) and (9-4) -> mean 4.0
        assert_eq!(five.average_gap, Some(4.0));
        assert_eq!(five.last_seen, Some(day(9)));
    }

    #[test]
    fn test_average_gap_absent_below_two_appearances() {
        let mut draws = gap_fixture();
        // number 1 appears exactly once
        draws[3] = draw(3, [1, 10, 20, 30, 40, 49, 50]);
        let table = compute_frequency(&draws, DrawOrder::Ascending, &small_config()).unwrap();

        assert_eq!(table.get(1).unwrap().count, 1);
        assert_eq!(table.get(1).unwrap().average_gap, None);
        assert_eq!(table.get(2).unwrap().count, 0);
        assert_eq!(table.get(2).unwrap().average_gap, None);
        assert_eq!(table.get(2).unwrap().last_seen, None);
    }

    #[test]
    fn test_descending_input_matches_ascending() {
        let draws = gap_fixture();
        let mut reversed = draws.clone();
        reversed.reverse();

        let asc = compute_frequency(&draws, DrawOrder::Ascending, &small_config()).unwrap();
        let desc = compute_frequency(&reversed, DrawOrder::Descending, &small_config()).unwrap();

        for number in MIN_NUMBER..=MAX_NUMBER {
            assert_eq!(asc.get(number), desc.get(number), "number {number}");
        }
    }

    #[test]
    fn test_table_is_dense() {
        let draws = gap_fixture();
        let table = compute_frequency(&draws, DrawOrder::Ascending, &small_config()).unwrap();
        assert_eq!(table.iter().count(), POOL_SIZE);

        let appearances: usize = table.iter().map(|s| s.count).sum();
        assert_eq!(appearances, NUMBERS_PER_DRAW * draws.len());
    }

    #[test]
    fn test_percentage_scale() {
        let draws = gap_fixture();
        let table = compute_frequency(&draws, DrawOrder::Ascending, &small_config()).unwrap();

        // 10, 20, 30, 40, 49, 50 appear in every draw
        assert_eq!(table.get(10).unwrap().percentage, 1.0);
        assert_eq!(table.get(2).unwrap().percentage, 0.0);
        for stats in table.iter() {
            assert!((0.0..=1.0).contains(&stats.percentage));
            assert_eq!(stats.percentage == 0.0, stats.count == 0);
        }
    }

    #[test]
    fn test_bonus_mode() {
        let draws: Vec<DrawResult> = (0..4)
            .map(|i| {
                // bonus 11 never among the main numbers
                DrawResult::new(day(i), [1, 9, 14, 23, 30, 38, 45], 11, 0.0, format!("b{i}"))
                    .unwrap()
            })
            .collect();

        let main = compute_frequency(&draws, DrawOrder::Ascending, &small_config()).unwrap();
        assert_eq!(main.get(11).unwrap().count, 0);

        let with_bonus =
            compute_frequency_with_bonus(&draws, DrawOrder::Ascending, &small_config()).unwrap();
        assert_eq!(with_bonus.get(11).unwrap().count, 4);
    }

    #[test]
    fn test_bonus_duplicate_counts_once() {
        let draws: Vec<DrawResult> = (0..3)
            .map(|i| {
                DrawResult::new(day(i), [1, 9, 14, 23, 30, 38, 45], 9, 0.0, format!("b{i}"))
                    .unwrap()
            })
            .collect();

        let with_bonus =
            compute_frequency_with_bonus(&draws, DrawOrder::Ascending, &small_config()).unwrap();
        assert_eq!(with_bonus.get(9).unwrap().count, 3);
    }

    #[test]
    fn test_insufficient_data() {
        let draws = gap_fixture();
        let config = AnalysisConfig::default();
        let result = compute_frequency(&draws, DrawOrder::Ascending, &config);
        assert!(matches!(
            result,
            Err(AnalysisError::InsufficientData { need: 50, got: 10 })
        ));
    }

    #[test]
    fn test_hot_cold_thresholds() {
        let draws = gap_fixture();
        let table = compute_frequency(&draws, DrawOrder::Ascending, &small_config()).unwrap();

        let hot = hot_numbers(&table, Threshold::new(0.9).unwrap());
        assert_eq!(hot, vec![10, 20, 30, 40, 49, 50]);

        let cold = cold_numbers(&table, Threshold::new(0.05).unwrap());
        assert!(cold.contains(&2));
        assert!(!cold.contains(&10));
    }

    #[test]
    fn test_rankings_are_total_and_stable() {
        let draws = gap_fixture();
        let table = compute_frequency(&draws, DrawOrder::Ascending, &small_config()).unwrap();

        let hot = rank_hot(&table);
        let cold = rank_cold(&table);
        assert_eq!(hot.len(), POOL_SIZE);
        assert_eq!(cold.len(), POOL_SIZE);
        assert_eq!(hot, rank_hot(&table));
        assert_eq!(cold, rank_cold(&table));

        // every-draw numbers lead the hot ranking; never-drawn lead the cold
        assert_eq!(hot[0], 10);
        assert!(table.get(cold[0]).unwrap().count == 0);
    }

    #[test]
    fn test_hot_tie_break_prefers_smaller_gap() {
        // 5 and 6 both appear 3 times; 6 recurs in a tighter rhythm.
        // 5 at indices 0, 4, 8 (gaps 4, 4); 6 at indices 2, 4, 6 (gaps 2, 2).
        let draws: Vec<DrawResult> = (0..10)
            .map(|i| match i {
                4 => draw(4, [5, 6, 20, 30, 40, 49, 50]),
                0 | 8 => draw(i, [5, 10, 20, 30, 40, 49, 50]),
                2 | 6 => draw(i, [6, 10, 20, 30, 40, 49, 50]),
                _ => draw(i, [7, 10, 20, 30, 40, 49, 50]),
            })
            .collect();

        let table = compute_frequency(&draws, DrawOrder::Ascending, &small_config()).unwrap();
        assert_eq!(table.get(5).unwrap().count, 3);
        assert_eq!(table.get(6).unwrap().count, 3);

        let hot = rank_hot(&table);
        let pos5 = hot.iter().position(|&n| n == 5).unwrap();
        let pos6 = hot.iter().position(|&n| n == 6).unwrap();
        assert!(pos6 < pos5, "tighter gap should rank hotter on equal count");
    }

    #[test]
    fn test_trend_windows_drop_leading_remainder() {
        let draws = gap_fixture();
        let windows = frequency_trends(&draws, DrawOrder::Ascending, 4, &small_config()).unwrap();

        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].start_index, 2);
        assert_eq!(windows[0].end_index, 6);
        assert_eq!(windows[1].start_index, 6);
        assert_eq!(windows[1].end_index, 10);
        assert_eq!(windows[0].len(), 4);

        // number 5 appears at chronological indices 1, 4, 9
        assert_eq!(windows[0].count(5), 1);
        assert_eq!(windows[1].count(5), 1);
    }

    #[test]
    fn test_trend_window_rejects_zero() {
        let draws = gap_fixture();
        let result = frequency_trends(&draws, DrawOrder::Ascending, 0, &small_config());
        assert!(matches!(result, Err(AnalysisError::InvalidConfig(_))));
    }

    #[test]
    fn test_overdue_numbers() {
        let draws = gap_fixture();
        let table = compute_frequency(&draws, DrawOrder::Ascending, &small_config()).unwrap();

        // draws are 3 days apart; 5 last seen on the final draw
        let overdue = overdue_numbers(&table, 1);
        assert!(overdue.iter().all(|&(n, _)| n != 5 && n != 10));

        // never-drawn numbers measure from the earliest draw (27 days)
        let (number, days) = overdue[0];
        assert_eq!(table.get(number).unwrap().count, 0);
        assert_eq!(days, 27);
    }
}
