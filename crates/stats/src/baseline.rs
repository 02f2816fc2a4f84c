//! Baseline estimation — a single grams/day reference value derived from
//! aggregated daily totals, with a confidence flag.

use pufflog_core::types::{round_dp, BaselineResult, DailyTotal};

/// Usage days considered when enough history exists.
const BASELINE_WINDOW_DAYS: usize = 14;
/// Below this many usage days the estimate is flagged low-confidence.
const LOW_CONFIDENCE_FLOOR: usize = 7;

/// Estimate the pre-taper daily consumption from daily totals.
///
/// Only days with `grams > 0` count. The most recent 14 such days are
/// preferred; with fewer, every usage day in the input is used. The
/// baseline is the arithmetic mean of the selected days, 2-decimal
/// rounded, or 0 when no usage days exist (always low-confidence then).
pub fn compute_baseline(daily_totals: &[DailyTotal]) -> BaselineResult {
    let with_use: Vec<&DailyTotal> = daily_totals.iter().filter(|d| d.grams > 0.0).collect();

    let used = if with_use.len() > BASELINE_WINDOW_DAYS {
        &with_use[with_use.len() - BASELINE_WINDOW_DAYS..]
    } else {
        &with_use[..]
    };

    let days_used = used.len();
    let baseline_g = if days_used > 0 {
        let sum: f64 = used.iter().map(|d| d.grams).sum();
        round_dp(sum / days_used as f64, 2)
    } else {
        0.0
    };

    BaselineResult {
        baseline_g,
        days_used,
        low_confidence: days_used < LOW_CONFIDENCE_FLOOR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn totals(grams: &[f64]) -> Vec<DailyTotal> {
        let start = NaiveDate::from_ymd_opt(2026, 7, 1).expect("valid date");
        grams
            .iter()
            .enumerate()
            .map(|(i, &g)| DailyTotal {
                date: start + Duration::days(i as i64),
                grams: g,
            })
            .collect()
    }

    #[test]
    fn test_prefers_most_recent_fourteen_usage_days() {
        // 20 usage days ramping 1..=20; only the last 14 (7..=20) count.
        let grams: Vec<f64> = (1..=20).map(f64::from).collect();
        let result = compute_baseline(&totals(&grams));

        assert_eq!(result.days_used, 14);
        // mean of 7..=20 = 13.5
        assert_eq!(result.baseline_g, 13.5);
        assert!(!result.low_confidence);
    }

    #[test]
    fn test_falls_back_to_all_usage_days() {
        let result = compute_baseline(&totals(&[2.0, 0.0, 4.0, 0.0, 3.0]));
        assert_eq!(result.days_used, 3);
        assert_eq!(result.baseline_g, 3.0);
        assert!(result.low_confidence);
    }

    #[test]
    fn test_zero_days_are_excluded_from_the_mean() {
        let mut grams = vec![0.0; 10];
        grams.extend([1.5; 8]);
        let result = compute_baseline(&totals(&grams));
        assert_eq!(result.days_used, 8);
        assert_eq!(result.baseline_g, 1.5);
        assert!(!result.low_confidence);
    }

    #[test]
    fn test_all_zero_history_yields_zero_low_confidence() {
        let result = compute_baseline(&totals(&[0.0; 30]));
        assert_eq!(result.baseline_g, 0.0);
        assert_eq!(result.days_used, 0);
        assert!(result.low_confidence);
    }

    #[test]
    fn test_mean_is_rounded_to_two_decimals() {
        let result = compute_baseline(&totals(&[1.0, 1.0, 1.1]));
        // 3.1 / 3 = 1.0333...
        assert_eq!(result.baseline_g, 1.03);
    }
}
