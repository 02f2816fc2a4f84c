//! Target curve generation — turns a starting value, a goal, a duration,
//! and a curve shape into an explicit per-day allowance sequence.

use pufflog_core::types::{round_dp, PlanControl, TaperStrategy};

/// Week targets below this are treated as abstinent and floored to 0.
const ABSTINENCE_FLOOR_G: f64 = 0.005;

pub const DAYS_PER_WEEK: usize = 7;

fn finish_week_target(w: f64) -> f64 {
    if w < ABSTINENCE_FLOOR_G {
        0.0
    } else {
        round_dp(w, 2)
    }
}

/// Generate per-day targets that start at `current_g` and end at `goal_g`
/// across `length_weeks` weeks under the given curve shape. The change
/// granularity is weekly: each week's target is replicated across its 7
/// days, so the output length is always `7 * max(1, length_weeks)`.
///
/// Inputs are clamped rather than rejected: `current_g` to non-negative,
/// `goal_g` into `[0, current_g]` (the goal can never exceed the current
/// baseline). `Fixed` and `Hybrid` strategies produce a linear curve.
pub fn generate_plan_from_goal(
    current_g: f64,
    goal_g: f64,
    length_weeks: u32,
    strategy: TaperStrategy,
) -> Vec<f64> {
    let weeks = length_weeks.max(1) as usize;
    let current = current_g.max(0.0);
    let goal = goal_g.clamp(0.0, current);

    let mut daily = Vec::with_capacity(weeks * DAYS_PER_WEEK);
    for i in 1..=weeks {
        let t = i as f64 / weeks as f64;
        let week_target = match strategy {
            // Geometric interpolation; epsilon floor guards the ratio when
            // current is ~0.
            TaperStrategy::Exponential => current * (goal / current.max(1e-9)).powf(t),
            // Centered logistic easing: slow start and tail, faster middle.
            TaperStrategy::Sigmoid => {
                let s = 1.0 / (1.0 + (-10.0 * (t - 0.5)).exp());
                current - (current - goal) * s
            }
            TaperStrategy::Linear | TaperStrategy::Fixed | TaperStrategy::Hybrid => {
                current - (current - goal) * t
            }
        };
        let clamped = finish_week_target(week_target);
        for _ in 0..DAYS_PER_WEEK {
            daily.push(clamped);
        }
    }
    daily
}

/// Legacy percentage-decay generator: week `i` targets
/// `baseline * (1 - weekly_pct)^i`. Retained for plans created under the
/// old control scheme.
pub fn generate_linear_pct_plan(baseline_g: f64, weekly_pct: f64, length_weeks: u32) -> Vec<f64> {
    let weeks = length_weeks.max(1) as usize;
    let mut daily = Vec::with_capacity(weeks * DAYS_PER_WEEK);
    for i in 1..=weeks {
        let week_target = baseline_g * (1.0 - weekly_pct).powi(i as i32);
        let clamped = finish_week_target(week_target);
        for _ in 0..DAYS_PER_WEEK {
            daily.push(clamped);
        }
    }
    daily
}

/// The one regeneration path every plan mutation goes through: dispatch on
/// the resolved control scheme, then optionally snap targets to the
/// configured increment (the external "round targets" preference).
pub fn generate_targets(
    baseline_g: f64,
    control: PlanControl,
    length_weeks: u32,
    strategy: TaperStrategy,
    round_step_g: Option<f64>,
) -> Vec<f64> {
    let mut targets = match control {
        PlanControl::Goal { goal_g } => {
            generate_plan_from_goal(baseline_g, goal_g, length_weeks, strategy)
        }
        PlanControl::WeeklyPct { weekly_pct } => {
            generate_linear_pct_plan(baseline_g, weekly_pct, length_weeks)
        }
    };
    if let Some(step) = round_step_g.filter(|s| *s > 0.0) {
        for target in &mut targets {
            *target = round_dp((*target / step).round() * step, 2);
        }
    }
    targets
}
