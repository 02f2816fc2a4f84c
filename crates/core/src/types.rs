use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fallback weekly reduction used when a legacy plan carries no explicit
/// percentage (older snapshots may lack the field entirely).
pub const DEFAULT_WEEKLY_PCT: f64 = 0.2;

/// A single logged consumption event. Events are append-only and owned by
/// the surrounding log store; the engine only ever reads them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageEvent {
    pub id: Uuid,
    /// Amount consumed, in grams. Assumed positive (validated upstream).
    pub grams: f64,
    pub timestamp: DateTime<Utc>,
    /// Optional purchase price attributed to this event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_eur: Option<f64>,
}

/// One calendar day's total consumption. Produced fresh on every
/// aggregation pass, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub grams: f64,
}

/// The curve shape used to interpolate between baseline and goal.
/// `Fixed` and `Hybrid` are accepted for backward compatibility and
/// generate a linear curve unless specialized later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaperStrategy {
    Linear,
    Exponential,
    Sigmoid,
    Fixed,
    Hybrid,
}

/// Lifecycle status of a taper plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Active,
    Paused,
    Completed,
}

/// Append-only audit record written whenever a suggestion is applied to a
/// plan. Never mutated or removed after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanAdjustment {
    pub date: DateTime<Utc>,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_weekly_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_length_weeks: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_goal_g: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_weekly_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_length_weeks: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_goal_g: Option<f64>,
}

/// The control scheme a plan's targets are generated under, resolved once
/// at generation time. Goal-based control is preferred; weekly-percentage
/// control is the legacy scheme kept for hydrated older plans.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum PlanControl {
    Goal { goal_g: f64 },
    WeeklyPct { weekly_pct: f64 },
}

/// An active taper plan: the one mutable entity the engine manages.
///
/// `weekly_pct` and `goal_g` are both optional in the serialized form so
/// snapshots written under either control scheme hydrate cleanly; see
/// [`Plan::control`] for how they resolve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub baseline_g: f64,
    pub strategy: TaperStrategy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_g: Option<f64>,
    pub length_weeks: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sessions_per_day: Option<u32>,
    pub start_date: NaiveDate,
    /// Explicit per-day allowances for the entire plan length
    /// (`7 * length_weeks` entries at generation time).
    pub daily_targets_g: Vec<f64>,
    pub status: PlanStatus,
    #[serde(default)]
    pub adjustments: Vec<PlanAdjustment>,
}

impl Plan {
    /// Resolve the control scheme once. A present goal always wins; a plan
    /// with neither field falls back to the default weekly percentage.
    pub fn control(&self) -> PlanControl {
        match self.goal_g {
            Some(goal_g) => PlanControl::Goal { goal_g },
            None => PlanControl::WeeklyPct {
                weekly_pct: self.weekly_pct.unwrap_or(DEFAULT_WEEKLY_PCT),
            },
        }
    }
}

/// Inputs for creating a plan. Constraint checking (non-negative baseline,
/// goal below baseline, positive length) is the caller's responsibility;
/// the curve generator clamps as a safety net.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSpec {
    pub baseline_g: f64,
    pub strategy: TaperStrategy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_g: Option<f64>,
    pub length_weeks: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sessions_per_day: Option<u32>,
    pub start_date: NaiveDate,
}

/// Partial update for an existing plan. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_g: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<TaperStrategy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_g: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_weeks: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sessions_per_day: Option<u32>,
}

impl PlanUpdate {
    /// Whether any field that feeds target generation changed, forcing a
    /// wholesale regeneration of `daily_targets_g`.
    pub fn regenerates_targets(&self) -> bool {
        self.baseline_g.is_some()
            || self.strategy.is_some()
            || self.weekly_pct.is_some()
            || self.goal_g.is_some()
            || self.length_weeks.is_some()
    }
}

/// Baseline estimate derived from aggregated daily totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineResult {
    /// Mean grams/day over the usage days considered, 2-decimal rounded.
    pub baseline_g: f64,
    /// Number of days with non-zero usage that informed the estimate.
    pub days_used: usize,
    /// Set whenever fewer than 7 usage days informed the estimate.
    pub low_confidence: bool,
}

/// An ephemeral easing proposal. Regenerated on every health evaluation
/// and superseded wholesale; carries a full preview curve so the decision
/// can be shown without mutating the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    pub title: String,
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_weekly_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_goal_g: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_length_weeks: Option<u32>,
    pub preview_daily_targets: Vec<f64>,
}

/// Pure evaluation output: today's target and total, remaining allowance
/// (negative means overage), rolling adherence, and the current streak.
/// Recomputed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedTaperState {
    pub today_target_g: Option<f64>,
    pub today_total_g: f64,
    pub remaining_today_g: Option<f64>,
    pub adherence_pct7: Option<u32>,
    pub misses7: Option<u32>,
    pub streak_days: u32,
}

/// Round to `places` decimal places, half away from zero.
pub fn round_dp(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_dp() {
        assert_eq!(round_dp(4.096, 2), 4.10);
        assert_eq!(round_dp(1.2344, 3), 1.234);
        assert_eq!(round_dp(2.0, 2), 2.0);
    }

    #[test]
    fn test_plan_control_prefers_goal() {
        let plan = sample_plan(Some(0.15), Some(1.0));
        assert_eq!(plan.control(), PlanControl::Goal { goal_g: 1.0 });
    }

    #[test]
    fn test_plan_control_falls_back_to_weekly_pct() {
        let plan = sample_plan(Some(0.15), None);
        assert_eq!(plan.control(), PlanControl::WeeklyPct { weekly_pct: 0.15 });

        let bare = sample_plan(None, None);
        assert_eq!(
            bare.control(),
            PlanControl::WeeklyPct {
                weekly_pct: DEFAULT_WEEKLY_PCT
            }
        );
    }

    #[test]
    fn test_legacy_snapshot_hydrates_without_goal() {
        // Snapshot written before goal-based control existed.
        let raw = r#"{
            "baseline_g": 2.5,
            "strategy": "linear",
            "weekly_pct": 0.2,
            "length_weeks": 6,
            "start_date": "2026-07-01",
            "daily_targets_g": [2.0, 2.0],
            "status": "active"
        }"#;
        let plan: Plan = serde_json::from_str(raw).expect("legacy snapshot should hydrate");
        assert_eq!(plan.goal_g, None);
        assert!(plan.adjustments.is_empty());
        assert_eq!(plan.control(), PlanControl::WeeklyPct { weekly_pct: 0.2 });
    }

    fn sample_plan(weekly_pct: Option<f64>, goal_g: Option<f64>) -> Plan {
        Plan {
            baseline_g: 2.0,
            strategy: TaperStrategy::Linear,
            weekly_pct,
            goal_g,
            length_weeks: 4,
            sessions_per_day: None,
            start_date: NaiveDate::from_ymd_opt(2026, 7, 1).expect("valid date"),
            daily_targets_g: vec![1.5; 28],
            status: PlanStatus::Active,
            adjustments: Vec::new(),
        }
    }
}
