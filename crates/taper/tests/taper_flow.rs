//! Integration test for the full log-to-suggestion flow: raw events are
//! aggregated, a baseline estimated, a plan created and evaluated, and a
//! degrading week drives the suggestion queue and an applied adjustment.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use pufflog_core::config::TaperConfig;
use pufflog_core::signal_bus::{capture_sink, TaperSignal};
use pufflog_core::types::{PlanSpec, PlanStatus, TaperStrategy, UsageEvent};
use pufflog_stats::{aggregate_daily_totals, compute_baseline};
use pufflog_taper::TaperController;

fn event_on(date: NaiveDate, hour: u32, grams: f64) -> UsageEvent {
    UsageEvent {
        id: Uuid::new_v4(),
        grams,
        timestamp: Utc.from_utc_datetime(&date.and_hms_opt(hour, 0, 0).expect("valid time")),
        price_eur: None,
    }
}

/// Two weeks of steady 2 g/day history followed by a taper week that goes
/// off the rails.
fn sample_log(today: NaiveDate) -> Vec<UsageEvent> {
    let mut events = Vec::new();
    // Days 20..7 ago: two sessions a day, 2 g total.
    for back in 7..=20 {
        let date = today - Duration::days(back);
        events.push(event_on(date, 10, 1.2));
        events.push(event_on(date, 21, 0.8));
    }
    // The last 7 days: consistently above any sensible taper target.
    for back in 0..7 {
        let date = today - Duration::days(back);
        events.push(event_on(date, 20, 2.5));
    }
    events
}

#[test]
fn test_full_flow_from_log_to_applied_suggestion() {
    let today: NaiveDate = "2026-08-07".parse().expect("valid date");
    let events = sample_log(today);

    let totals = aggregate_daily_totals(&events, 30, today);
    assert_eq!(totals.len(), 30);

    let baseline = compute_baseline(&totals);
    assert_eq!(baseline.days_used, 14);
    assert!(!baseline.low_confidence);
    assert!(baseline.baseline_g > 2.0);

    let sink = capture_sink();
    let mut controller =
        TaperController::new(TaperConfig::default()).with_signal_sink(sink.clone());

    // Plan started a week ago, aiming from the baseline down to 0.5 g.
    controller.create_plan(PlanSpec {
        baseline_g: 2.0,
        strategy: TaperStrategy::Sigmoid,
        weekly_pct: None,
        goal_g: Some(0.5),
        length_weeks: 8,
        sessions_per_day: Some(2),
        start_date: today - Duration::days(6),
    });

    let derived = controller.evaluate(&totals, &baseline, today);

    // 2.5 g against a sub-2.0 first-week target, every day: zero adherence.
    assert_eq!(derived.today_total_g, 2.5);
    assert_eq!(derived.adherence_pct7, Some(0));
    assert_eq!(derived.misses7, Some(7));
    assert_eq!(derived.streak_days, 0);
    assert!(derived.remaining_today_g.expect("target present") < 0.0);

    let suggestions = controller.suggestions().to_vec();
    assert_eq!(suggestions.len(), 2);
    assert_eq!(suggestions[0].id, "ease-raise-goal");
    assert_eq!(suggestions[1].id, "extend-length");
    assert_eq!(suggestions[1].new_length_weeks, Some(12));
    assert_eq!(suggestions[1].preview_daily_targets.len(), 84);

    // Apply the extension and confirm the plan absorbed it.
    let extend = suggestions[1].clone();
    let plan = controller
        .apply_suggestion(&extend, Utc::now())
        .expect("plan exists");
    assert_eq!(plan.length_weeks, 12);
    assert_eq!(plan.daily_targets_g.len(), 84);
    assert_eq!(plan.status, PlanStatus::Active);
    assert_eq!(plan.adjustments.len(), 1);
    assert_eq!(plan.adjustments[0].previous_length_weeks, Some(8));
    assert!(controller.suggestions().is_empty());

    // Snapshot round-trip: the adjusted plan survives serialization.
    let snapshot = serde_json::to_string(controller.plan().expect("plan")).expect("serializes");
    let hydrated: pufflog_core::types::Plan =
        serde_json::from_str(&snapshot).expect("hydrates");
    assert_eq!(hydrated.length_weeks, 12);
    assert_eq!(hydrated.adjustments.len(), 1);

    let signals = sink.signals();
    assert!(signals.iter().any(|s| matches!(s, TaperSignal::PlanCreated { .. })));
    assert!(signals.iter().any(|s| matches!(s, TaperSignal::SuggestionsUpdated { count: 2 })));
    assert!(signals
        .iter()
        .any(|s| matches!(s, TaperSignal::PlanAdjusted { .. })));
}
