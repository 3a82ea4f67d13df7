//! Recommendation engine: strategy-specific number sets synthesized from
//! the frequency and pattern outputs.
//!
//! Three closed strategies: hot (most-drawn), cold (least-drawn), and
//! balanced (a deterministic slot merge of both plus pattern-normalizing
//! picks). Every selection is exactly `pick_count` distinct numbers in
//! 1..=50, sorted ascending, with a confidence score and a rationale built
//! from the actual statistics of the chosen numbers. There is no hidden
//! randomness: identical inputs produce identical recommendations.

use std::fmt;
use std::str::FromStr;

use crate::config::{AnalysisConfig, EXPECTED_NUMBER_RATE};
use crate::frequency::{rank_cold, rank_hot, FrequencyStats, FrequencyTable};
use crate::patterns::ranges::bucket_of;
use crate::patterns::{PatternSummary, DECADES};
use crate::{AnalysisError, Result, MAX_NUMBER, MIN_NUMBER, NUMBERS_PER_DRAW, POOL_SIZE};

/// Caveat attached to every rationale.
const HEURISTIC_CAVEAT: &str = " Scores describe deviation in the historical sample only; \
     draws are independent and past frequency does not predict future outcomes.";

/// Closed set of selection strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Hot,
    Cold,
    Balanced,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Hot, Strategy::Cold, Strategy::Balanced];

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Hot => "hot",
            Strategy::Cold => "cold",
            Strategy::Balanced => "balanced",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = AnalysisError;

    /// Unknown names are rejected at the boundary rather than matched
    /// loosely.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "hot" => Ok(Strategy::Hot),
            "cold" => Ok(Strategy::Cold),
            "balanced" => Ok(Strategy::Balanced),
            other => Err(AnalysisError::InvalidStrategy(other.to_string())),
        }
    }
}

/// One strategy's ranked selection.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Recommendation {
    pub strategy: Strategy,
    /// Exactly `pick_count` distinct numbers, sorted ascending.
    pub numbers: Vec<u8>,
    /// 0.0..=1.0
    pub confidence: f64,
    /// Which signals drove the selection, in terms of the selected numbers'
    /// own statistics.
    pub rationale: String,
}

/// Generate one recommendation. Fails with `InsufficientData` when the
/// upstream table was computed over fewer than `config.min_draws` draws.
pub fn generate(
    strategy: Strategy,
    table: &FrequencyTable,
    summary: &PatternSummary,
    config: &AnalysisConfig,
) -> Result<Recommendation> {
    config.validate()?;
    if table.total_draws() < config.min_draws {
        return Err(AnalysisError::InsufficientData {
            need: config.min_draws,
            got: table.total_draws(),
        });
    }

    match strategy {
        Strategy::Hot => Ok(hot_recommendation(table, config)),
        Strategy::Cold => Ok(cold_recommendation(table, config)),
        Strategy::Balanced => Ok(balanced_recommendation(table, summary, config)),
    }
}

/// One recommendation per strategy, each independently computed.
pub fn generate_all(
    table: &FrequencyTable,
    summary: &PatternSummary,
    config: &AnalysisConfig,
) -> Result<Vec<Recommendation>> {
    Strategy::ALL
        .iter()
        .map(|&strategy| generate(strategy, table, summary, config))
        .collect()
}

// ============================================================
// HOT / COLD
// ============================================================

fn hot_recommendation(table: &FrequencyTable, config: &AnalysisConfig) -> Recommendation {
    let mut numbers: Vec<u8> = rank_hot(table)
        .into_iter()
        .take(config.pick_count)
        .collect();
    numbers.sort_unstable();

    // percentage is already on the 0..=1 scale where 1.0 means the number
    // appeared in every draw
    let confidence = mean_percentage(table, &numbers).clamp(0.0, 1.0);
    let rationale = frequency_rationale(Strategy::Hot, table, &numbers);

    Recommendation {
        strategy: Strategy::Hot,
        numbers,
        confidence,
        rationale,
    }
}

fn cold_recommendation(table: &FrequencyTable, config: &AnalysisConfig) -> Recommendation {
    let mut numbers: Vec<u8> = rank_cold(table)
        .into_iter()
        .take(config.pick_count)
        .collect();
    numbers.sort_unstable();

    let confidence = (1.0 - mean_percentage(table, &numbers)).clamp(0.0, 1.0);
    let rationale = frequency_rationale(Strategy::Cold, table, &numbers);

    Recommendation {
        strategy: Strategy::Cold,
        numbers,
        confidence,
        rationale,
    }
}

// ============================================================
// BALANCED
// ============================================================

fn balanced_recommendation(
    table: &FrequencyTable,
    summary: &PatternSummary,
    config: &AnalysisConfig,
) -> Recommendation {
    let pick = config.pick_count;
    let split = config.slot_split;
    let hot_rank = rank_hot(table);
    let cold_rank = rank_cold(table);

    let mut chosen: Vec<u8> = Vec::with_capacity(pick);
    let mut used = [false; POOL_SIZE + 1];

    fn claim(n: u8, used: &mut [bool; POOL_SIZE + 1], chosen: &mut Vec<u8>) -> bool {
        if used[n as usize] {
            return false;
        }
        used[n as usize] = true;
        chosen.push(n);
        true
    }

    // hot slots
    let mut hot_part = Vec::new();
    for &n in hot_rank.iter() {
        if hot_part.len() >= split.hot || chosen.len() >= pick {
            break;
        }
        if claim(n, &mut used, &mut chosen) {
            hot_part.push(n);
        }
    }

    // cold slots, skipping anything the hot slots already claimed
    let mut cold_part = Vec::new();
    for &n in cold_rank.iter() {
        if cold_part.len() >= split.cold || chosen.len() >= pick {
            break;
        }
        if claim(n, &mut used, &mut chosen) {
            cold_part.push(n);
        }
    }

    // pattern-normalizing slots steer toward the observed odd/even split
    // and fill short decade buckets
    let target_odd = target_odd_count(summary, pick);
    let mut pattern_part = Vec::new();
    for _ in 0..split.pattern {
        if chosen.len() >= pick {
            break;
        }
        if let Some(n) = pattern_slot_pick(&chosen, &used, target_odd, table, pick) {
            if claim(n, &mut used, &mut chosen) {
                pattern_part.push(n);
            }
        }
    }

    // fall forward: remaining hot ranking, then cold ranking, then any
    // unused number ascending; the pool always exceeds the pick count
    for &n in hot_rank.iter() {
        if chosen.len() >= pick {
            break;
        }
        claim(n, &mut used, &mut chosen);
    }
    for &n in cold_rank.iter() {
        if chosen.len() >= pick {
            break;
        }
        claim(n, &mut used, &mut chosen);
    }
    for n in MIN_NUMBER..=MAX_NUMBER {
        if chosen.len() >= pick {
            break;
        }
        claim(n, &mut used, &mut chosen);
    }

    let confidence = balanced_confidence(&chosen, table, target_odd, pick);
    let rationale = balanced_rationale(
        table, summary, &hot_part, &cold_part, &pattern_part, &chosen, target_odd,
    );

    let mut numbers = chosen;
    numbers.sort_unstable();

    Recommendation {
        strategy: Strategy::Balanced,
        numbers,
        confidence,
        rationale,
    }
}

/// Odd-count target for a selection of `pick` numbers, scaled from the most
/// common observed split. Falls back to an even split when no draws were
/// summarized.
fn target_odd_count(summary: &PatternSummary, pick: usize) -> usize {
    if summary.odd_even.total_draws() == 0 {
        return pick.div_ceil(2);
    }
    let (odd, _) = summary.odd_even.most_common_split();
    let scaled = (odd * pick) as f64 / NUMBERS_PER_DRAW as f64;
    (scaled.round() as usize).min(pick)
}

/// Greedy pick for one pattern slot: prefer the parity the selection still
/// needs, then decade buckets currently short of the uniform expectation,
/// then numbers whose frequency sits closest to the expected rate. Ties
/// resolve to the smaller number.
fn pattern_slot_pick(
    chosen: &[u8],
    used: &[bool; POOL_SIZE + 1],
    target_odd: usize,
    table: &FrequencyTable,
    pick: usize,
) -> Option<u8> {
    let odd_now = chosen.iter().filter(|n| *n % 2 == 1).count();
    let even_now = chosen.len() - odd_now;
    let target_even = pick - target_odd;
    let need_odd = target_odd.saturating_sub(odd_now);
    let need_even = target_even.saturating_sub(even_now);

    let mut bucket_counts = [0usize; DECADES.len()];
    for &n in chosen {
        bucket_counts[bucket_of(n)] += 1;
    }

    let mut best: Option<(u32, f64, u8)> = None;
    for n in MIN_NUMBER..=MAX_NUMBER {
        if used[n as usize] {
            continue;
        }
        let Some(stats) = table.get(n) else { continue };

        let mut score = 0u32;
        if (n % 2 == 1 && need_odd > 0) || (n % 2 == 0 && need_even > 0) {
            score += 2;
        }
        match bucket_counts[bucket_of(n)] {
            0 => score += 2,
            1 => score += 1,
            _ => {}
        }
        let distance = (stats.percentage - EXPECTED_NUMBER_RATE).abs();

        let better = match best {
            None => true,
            Some((best_score, best_distance, best_number)) => {
                score > best_score
                    || (score == best_score
                        && (distance < best_distance
                            || (distance == best_distance && n < best_number)))
            }
        };
        if better {
            best = Some((score, distance, n));
        }
    }
    best.map(|(_, _, n)| n)
}

/// Structure-fit score scaled by sample size: how close the selection's
/// parity sits to the observed target and how many decade buckets it
/// covers, discounted on small histories.
fn balanced_confidence(chosen: &[u8], table: &FrequencyTable, target_odd: usize, pick: usize) -> f64 {
    if chosen.is_empty() {
        return 0.0;
    }
    let odd = chosen.iter().filter(|n| *n % 2 == 1).count();
    let parity_score = 1.0 - (odd as f64 - target_odd as f64).abs() / pick as f64;

    let mut buckets = [false; DECADES.len()];
    for &n in chosen {
        buckets[bucket_of(n)] = true;
    }
    let spread_score =
        buckets.iter().filter(|b| **b).count() as f64 / DECADES.len().min(pick) as f64;

    let data_factor = (table.total_draws() as f64 / 200.0).min(1.0);

    ((parity_score + spread_score) / 2.0 * data_factor).clamp(0.0, 1.0)
}

// ============================================================
// RATIONALE
// ============================================================

fn join_numbers(numbers: &[u8]) -> String {
    let mut out = String::new();
    for (i, n) in numbers.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&n.to_string());
    }
    out
}

fn selected_stats<'a>(table: &'a FrequencyTable, numbers: &[u8]) -> Vec<&'a FrequencyStats> {
    numbers.iter().filter_map(|&n| table.get(n)).collect()
}

fn mean_percentage(table: &FrequencyTable, numbers: &[u8]) -> f64 {
    let stats = selected_stats(table, numbers);
    if stats.is_empty() {
        return 0.0;
    }
    stats.iter().map(|s| s.percentage).sum::<f64>() / stats.len() as f64
}

/// Percentage band and mean recurrence gap of the selection, phrased for
/// the hot or cold reading.
fn frequency_rationale(strategy: Strategy, table: &FrequencyTable, numbers: &[u8]) -> String {
    let stats = selected_stats(table, numbers);
    let total = table.total_draws();

    let lo = stats
        .iter()
        .map(|s| s.percentage)
        .fold(f64::INFINITY, f64::min);
    let hi = stats
        .iter()
        .map(|s| s.percentage)
        .fold(f64::NEG_INFINITY, f64::max);

    let gaps: Vec<f64> = stats.iter().filter_map(|s| s.average_gap).collect();

    let band = match strategy {
        Strategy::Hot => "most-drawn",
        _ => "least-drawn",
    };
    let mut out = format!(
        "{} strategy over {total} draws: {} occupy the {band} band, appearing in \
         {:.1}%-{:.1}% of draws against a uniform expectation of {:.1}%.",
        match strategy {
            Strategy::Hot => "Hot",
            _ => "Cold",
        },
        join_numbers(numbers),
        lo * 100.0,
        hi * 100.0,
        EXPECTED_NUMBER_RATE * 100.0,
    );
    if gaps.is_empty() {
        out.push_str(" None of the selection has recurred within the sample.");
    } else {
        let mean_gap = gaps.iter().sum::<f64>() / gaps.len() as f64;
        out.push_str(&format!(
            " Mean recurrence gap of the selection is {mean_gap:.1} draws."
        ));
    }
    out.push_str(HEURISTIC_CAVEAT);
    out
}

fn balanced_rationale(
    table: &FrequencyTable,
    summary: &PatternSummary,
    hot_part: &[u8],
    cold_part: &[u8],
    pattern_part: &[u8],
    chosen: &[u8],
    target_odd: usize,
) -> String {
    let total = table.total_draws();
    let odd = chosen.iter().filter(|n| *n % 2 == 1).count();
    let even = chosen.len() - odd;

    let mut buckets = [false; DECADES.len()];
    for &n in chosen {
        buckets[bucket_of(n)] = true;
    }
    let covered = buckets.iter().filter(|b| **b).count();

    let mut out = format!(
        "Balanced strategy over {total} draws: {} from the most-drawn band, {} from the \
         least-drawn band",
        join_numbers(hot_part),
        join_numbers(cold_part),
    );
    if pattern_part.is_empty() {
        out.push('.');
    } else {
        out.push_str(&format!(
            ", and {} chosen to steer the mix toward the sample's structure.",
            join_numbers(pattern_part)
        ));
    }

    let (target, _) = if summary.odd_even.total_draws() > 0 {
        summary.odd_even.most_common_split()
    } else {
        (target_odd, 0)
    };
    out.push_str(&format!(
        " The final split is {odd} odd / {even} even (most common in the sample: {target} odd) \
         across {covered} of {} decade ranges.",
        DECADES.len()
    ));
    out.push_str(HEURISTIC_CAVEAT);
    out
}

// ============================================================
// TESTS
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::compute_frequency;
    use crate::patterns::analyze_patterns;
    use crate::{DrawOrder, DrawResult};
    use chrono::{Days, NaiveDate};

    fn draw(offset: u64, numbers: [u8; NUMBERS_PER_DRAW]) -> DrawResult {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap() + Days::new(offset * 3);
        DrawResult::new(date, numbers, 11, 60_000_000.0, format!("d{offset}")).unwrap()
    }

    fn small_config() -> AnalysisConfig {
        AnalysisConfig {
            min_draws: 1,
            ..AnalysisConfig::default()
        }
    }

    /// Varied but deterministic history.
    fn make_history(n: u64) -> Vec<DrawResult> {
        (0..n)
            .map(|i| {
                let mut numbers = [0u8; NUMBERS_PER_DRAW];
                for (j, slot) in numbers.iter_mut().enumerate() {
                    *slot = (((i as usize * 3) + j * 7) % POOL_SIZE) as u8 + MIN_NUMBER;
                }
                draw(i, numbers)
            })
            .collect()
    }

    fn engines(
        draws: &[DrawResult],
        config: &AnalysisConfig,
    ) -> (FrequencyTable, PatternSummary) {
        let table = compute_frequency(draws, DrawOrder::Ascending, config).unwrap();
        let summary = analyze_patterns(draws, DrawOrder::Ascending, config).unwrap();
        (table, summary)
    }

    fn assert_valid_selection(rec: &Recommendation, pick: usize) {
        assert_eq!(rec.numbers.len(), pick);
        for pair in rec.numbers.windows(2) {
            assert!(pair[0] < pair[1], "sorted and distinct: {:?}", rec.numbers);
        }
        for &n in &rec.numbers {
            assert!((MIN_NUMBER..=MAX_NUMBER).contains(&n));
        }
        assert!((0.0..=1.0).contains(&rec.confidence));
        assert!(!rec.rationale.is_empty());
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("hot".parse::<Strategy>().unwrap(), Strategy::Hot);
        assert_eq!("cold".parse::<Strategy>().unwrap(), Strategy::Cold);
        assert_eq!("balanced".parse::<Strategy>().unwrap(), Strategy::Balanced);
        assert!(matches!(
            "lucky".parse::<Strategy>(),
            Err(AnalysisError::InvalidStrategy(s)) if s == "lucky"
        ));
        assert!("Hot".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_every_strategy_yields_valid_selection() {
        let draws = make_history(60);
        let config = small_config();
        let (table, summary) = engines(&draws, &config);

        for rec in generate_all(&table, &summary, &config).unwrap() {
            assert_valid_selection(&rec, config.pick_count);
        }
    }

    #[test]
    fn test_hot_takes_top_of_ranking() {
        let draws = make_history(60);
        let config = small_config();
        let (table, summary) = engines(&draws, &config);

        let rec = generate(Strategy::Hot, &table, &summary, &config).unwrap();
        let mut expected: Vec<u8> = rank_hot(&table)
            .into_iter()
            .take(config.pick_count)
            .collect();
        expected.sort_unstable();
        assert_eq!(rec.numbers, expected);
    }

    #[test]
    fn test_cold_confidence_complements_percentage() {
        let draws = make_history(60);
        let config = small_config();
        let (table, summary) = engines(&draws, &config);

        let rec = generate(Strategy::Cold, &table, &summary, &config).unwrap();
        let mean = mean_percentage(&table, &rec.numbers);
        assert!((rec.confidence - (1.0 - mean)).abs() < 1e-12);
    }

    #[test]
    fn test_balanced_handles_total_pool_overlap() {
        // every draw identical: the hot and cold rankings coincide, so the
        // slot allocation overlaps maximally and fall-forward must fill
        let draws: Vec<DrawResult> = (0..60)
            .map(|i| draw(i, [1, 9, 14, 23, 30, 38, 45]))
            .collect();
        let config = small_config();
        let (table, summary) = engines(&draws, &config);

        let rec = generate(Strategy::Balanced, &table, &summary, &config).unwrap();
        assert_valid_selection(&rec, config.pick_count);
    }

    #[test]
    fn test_balanced_respects_custom_split() {
        let draws = make_history(80);
        let config = AnalysisConfig {
            min_draws: 1,
            slot_split: crate::config::SlotSplit {
                hot: 5,
                cold: 1,
                pattern: 1,
            },
            ..AnalysisConfig::default()
        };
        let (table, summary) = engines(&draws, &config);

        let rec = generate(Strategy::Balanced, &table, &summary, &config).unwrap();
        assert_valid_selection(&rec, config.pick_count);

        // the top of the hot ranking must be present
        let hottest = rank_hot(&table)[0];
        assert!(rec.numbers.contains(&hottest));
    }

    #[test]
    fn test_generate_all_is_deterministic() {
        let draws = make_history(70);
        let config = small_config();
        let (table, summary) = engines(&draws, &config);

        let first = generate_all(&table, &summary, &config).unwrap();
        let second = generate_all(&table, &summary, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_insufficient_data_propagates() {
        let draws = make_history(10);
        let config = small_config();
        let (table, summary) = engines(&draws, &config);

        let strict = AnalysisConfig::default();
        let result = generate(Strategy::Hot, &table, &summary, &strict);
        assert!(matches!(
            result,
            Err(AnalysisError::InsufficientData { need: 50, got: 10 })
        ));
    }

    #[test]
    fn test_rationales_cite_selection_statistics() {
        let draws = make_history(60);
        let config = small_config();
        let (table, summary) = engines(&draws, &config);

        let hot = generate(Strategy::Hot, &table, &summary, &config).unwrap();
        for n in &hot.numbers {
            assert!(hot.rationale.contains(&n.to_string()));
        }
        assert!(hot.rationale.contains("60 draws"));

        let balanced = generate(Strategy::Balanced, &table, &summary, &config).unwrap();
        assert!(balanced.rationale.contains("odd"));
        assert!(balanced.rationale.contains("decade"));

        // every rationale carries the heuristic caveat
        for rec in generate_all(&table, &summary, &config).unwrap() {
            assert!(rec.rationale.contains("independent"));
        }
    }

    #[test]
    fn test_custom_pick_count() {
        let draws = make_history(60);
        let config = AnalysisConfig {
            min_draws: 1,
            pick_count: 10,
            ..AnalysisConfig::default()
        };
        let (table, summary) = engines(&draws, &config);

        for rec in generate_all(&table, &summary, &config).unwrap() {
            assert_valid_selection(&rec, 10);
        }
    }

    #[test]
    fn test_target_odd_scaling() {
        let draws = make_history(60);
        let config = small_config();
        let (_, summary) = engines(&draws, &config);

        let target7 = target_odd_count(&summary, 7);
        assert!(target7 <= 7);
        let target10 = target_odd_count(&summary, 10);
        assert!(target10 <= 10);

        let empty = analyze_patterns(&[], DrawOrder::Ascending, &config).unwrap();
        assert_eq!(target_odd_count(&empty, 7), 4);
    }
}
