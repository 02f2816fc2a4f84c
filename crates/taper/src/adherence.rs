//! Adherence and streak evaluation — compares actual daily totals against
//! a plan's per-day targets over a rolling window and a running lookback.

use chrono::{Duration, NaiveDate};

use pufflog_core::types::{round_dp, DailyTotal, DerivedTaperState, Plan, PlanStatus};

/// Floating-point tolerance when comparing a total against its target.
pub const ADHERENCE_EPSILON_G: f64 = 1e-9;

/// How many trailing plan days the adherence window covers.
const ADHERENCE_WINDOW_DAYS: usize = 7;

/// Rolling 7-day adherence outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adherence {
    pub adherence_pct7: u32,
    pub misses7: u32,
}

/// Index of `on` into the plan's day-indexed target array: whole calendar
/// days since the plan start. `None` when `on` precedes the start or the
/// plan's generated targets are exhausted.
pub fn plan_day_index(plan: &Plan, on: NaiveDate) -> Option<usize> {
    let elapsed = (on - plan.start_date).num_days();
    if elapsed < 0 {
        return None;
    }
    let idx = elapsed as usize;
    if idx >= plan.daily_targets_g.len() {
        return None;
    }
    Some(idx)
}

fn total_on(daily_totals: &[DailyTotal], date: NaiveDate) -> f64 {
    daily_totals
        .iter()
        .find(|d| d.date == date)
        .map(|d| d.grams)
        .unwrap_or(0.0)
}

/// Adherence over the window `[today-6 .. today]` intersected with the
/// plan's elapsed days. Days with a zero target are excluded from the
/// denominator (use on a full-abstinence day cannot be "missed" in
/// percentage terms). A day is met when its total stays within the target
/// plus epsilon. Outside the plan's range no conclusion can be drawn and
/// the result defaults to 100% / 0 misses.
pub fn compute_adherence(plan: &Plan, daily_totals: &[DailyTotal], today: NaiveDate) -> Adherence {
    let Some(idx_today) = plan_day_index(plan, today) else {
        return Adherence {
            adherence_pct7: 100,
            misses7: 0,
        };
    };

    let start_window = idx_today.saturating_sub(ADHERENCE_WINDOW_DAYS - 1);
    let mut considered = 0u32;
    let mut met = 0u32;
    for i in start_window..=idx_today {
        let target = plan.daily_targets_g.get(i).copied().unwrap_or(0.0);
        if target <= 0.0 {
            continue;
        }
        considered += 1;
        let date = plan.start_date + Duration::days(i as i64);
        if total_on(daily_totals, date) <= target + ADHERENCE_EPSILON_G {
            met += 1;
        }
    }

    let adherence_pct7 = if considered > 0 {
        (f64::from(met) / f64::from(considered) * 100.0).round() as u32
    } else {
        100
    };
    Adherence {
        adherence_pct7,
        misses7: considered - met,
    }
}

/// Full derived state for the presentation layer. Without an active plan
/// the target/adherence fields are `None` but today's raw total is still
/// reported. The streak walks backward from today counting consecutive
/// compliant days, today included, stopping at the first miss or at the
/// plan start.
pub fn compute_derived(
    plan: Option<&Plan>,
    daily_totals: &[DailyTotal],
    today: NaiveDate,
) -> DerivedTaperState {
    let today_total_g = total_on(daily_totals, today);

    let Some(plan) = plan.filter(|p| p.status == PlanStatus::Active) else {
        return DerivedTaperState {
            today_target_g: None,
            today_total_g,
            remaining_today_g: None,
            adherence_pct7: None,
            misses7: None,
            streak_days: 0,
        };
    };

    let idx = plan_day_index(plan, today);
    let today_target_g = idx.map(|i| plan.daily_targets_g.get(i).copied().unwrap_or(0.0));
    // May go negative; callers read negative remaining as overage.
    let remaining_today_g = today_target_g.map(|t| round_dp(t - today_total_g, 2));
    let adherence = compute_adherence(plan, daily_totals, today);

    let mut streak_days = 0u32;
    if let Some(idx) = idx {
        for i in (0..=idx).rev() {
            let date = plan.start_date + Duration::days(i as i64);
            let target = plan.daily_targets_g.get(i).copied().unwrap_or(0.0);
            if total_on(daily_totals, date) <= target + ADHERENCE_EPSILON_G {
                streak_days += 1;
            } else {
                break;
            }
        }
    }

    DerivedTaperState {
        today_target_g,
        today_total_g,
        remaining_today_g,
        adherence_pct7: Some(adherence.adherence_pct7),
        misses7: Some(adherence.misses7),
        streak_days,
    }
}
