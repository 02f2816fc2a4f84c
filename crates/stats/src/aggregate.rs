//! Daily aggregation — collapses the raw event log into one total per
//! calendar day over a fixed trailing window.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};

use pufflog_core::types::{DailyTotal, UsageEvent};

/// Collapse `events` into per-day totals covering exactly `window_days`
/// consecutive calendar days ending at `today` (inclusive), in
/// chronological order. Days with no qualifying events stay at zero;
/// events outside the window are ignored.
///
/// Day boundaries are the event's calendar date, not a 24h rolling
/// window. Pure function of its inputs; `today` is injected by the
/// caller so evaluation stays deterministic.
pub fn aggregate_daily_totals(
    events: &[UsageEvent],
    window_days: u32,
    today: NaiveDate,
) -> Vec<DailyTotal> {
    let window_days = i64::from(window_days.max(1));
    let start = today - Duration::days(window_days - 1);

    let mut buckets: BTreeMap<NaiveDate, f64> = (0..window_days)
        .map(|offset| (start + Duration::days(offset), 0.0))
        .collect();

    for event in events {
        let day = event.timestamp.date_naive();
        if let Some(grams) = buckets.get_mut(&day) {
            *grams += event.grams;
        }
    }

    buckets
        .into_iter()
        .map(|(date, grams)| DailyTotal { date, grams })
        .collect()
}
