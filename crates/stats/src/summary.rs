//! Usage summary — window-level headline figures for the stats surface:
//! totals, per-day average, spend, and a half-over-half change signal.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use pufflog_core::types::{round_dp, UsageEvent};

use crate::aggregate::aggregate_daily_totals;

/// Headline usage figures over the aggregation window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageSummary {
    pub total_g: f64,
    pub per_day_avg_g: f64,
    pub total_spend_eur: f64,
    /// Consumption change of the window's second half against its first
    /// half, in percent. 0 when the first half had no usage.
    pub change_pct: f64,
}

/// Summarize consumption over `window_days` calendar days ending `today`.
pub fn summarize_usage(events: &[UsageEvent], window_days: u32, today: NaiveDate) -> UsageSummary {
    let totals = aggregate_daily_totals(events, window_days, today);

    let total_g: f64 = totals.iter().map(|t| t.grams).sum();
    let per_day_avg_g = total_g / totals.len().max(1) as f64;

    let window_start = today - Duration::days(totals.len() as i64 - 1);
    let total_spend_eur: f64 = events
        .iter()
        .filter(|e| {
            let day = e.timestamp.date_naive();
            day >= window_start && day <= today
        })
        .filter_map(|e| e.price_eur)
        .sum();

    let half = totals.len() / 2;
    let first_half: f64 = totals[..half].iter().map(|t| t.grams).sum();
    let second_half: f64 = totals[half..].iter().map(|t| t.grams).sum();
    let change_pct = if first_half == 0.0 {
        0.0
    } else {
        (second_half - first_half) / first_half * 100.0
    };

    UsageSummary {
        total_g: round_dp(total_g, 2),
        per_day_avg_g: round_dp(per_day_avg_g, 2),
        total_spend_eur: round_dp(total_spend_eur, 2),
        change_pct: round_dp(change_pct, 2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn event(date: &str, grams: f64, price_eur: Option<f64>) -> UsageEvent {
        let day: NaiveDate = date.parse().expect("valid date");
        UsageEvent {
            id: Uuid::new_v4(),
            grams,
            timestamp: Utc.from_utc_datetime(&day.and_hms_opt(12, 0, 0).expect("valid time")),
            price_eur,
        }
    }

    #[test]
    fn test_totals_and_average() {
        let today: NaiveDate = "2026-08-07".parse().expect("valid date");
        let events = vec![
            event("2026-08-05", 1.0, Some(10.0)),
            event("2026-08-06", 2.0, None),
            event("2026-08-07", 1.5, Some(12.5)),
        ];
        let summary = summarize_usage(&events, 10, today);

        assert_eq!(summary.total_g, 4.5);
        assert_eq!(summary.per_day_avg_g, 0.45);
        assert_eq!(summary.total_spend_eur, 22.5);
    }

    #[test]
    fn test_spend_outside_window_is_excluded() {
        let today: NaiveDate = "2026-08-07".parse().expect("valid date");
        let events = vec![
            event("2026-08-01", 1.0, Some(100.0)),
            event("2026-08-07", 1.0, Some(5.0)),
        ];
        let summary = summarize_usage(&events, 3, today);
        assert_eq!(summary.total_spend_eur, 5.0);
    }

    #[test]
    fn test_change_pct_second_half_versus_first() {
        let today: NaiveDate = "2026-08-07".parse().expect("valid date");
        // 4-day window: first half 2.0, second half 3.0 -> +50%.
        let events = vec![
            event("2026-08-04", 1.0, None),
            event("2026-08-05", 1.0, None),
            event("2026-08-06", 1.5, None),
            event("2026-08-07", 1.5, None),
        ];
        let summary = summarize_usage(&events, 4, today);
        assert_eq!(summary.change_pct, 50.0);
    }

    #[test]
    fn test_change_pct_zero_when_first_half_empty() {
        let today: NaiveDate = "2026-08-07".parse().expect("valid date");
        let events = vec![event("2026-08-07", 2.0, None)];
        let summary = summarize_usage(&events, 4, today);
        assert_eq!(summary.change_pct, 0.0);
    }
}
