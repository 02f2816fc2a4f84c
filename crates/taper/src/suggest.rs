//! Suggestion engine — ranked easing proposals for a struggling plan,
//! each carrying a full preview curve so the decision can be shown
//! without touching the plan itself.

use pufflog_core::types::{round_dp, Plan, Suggestion};

use crate::curve::generate_plan_from_goal;

/// Stable suggestion ids: regenerating under unchanged inputs must yield
/// the same ids so the queue can be diffed and dismissed reliably.
pub const SUGGESTION_RAISE_GOAL: &str = "ease-raise-goal";
pub const SUGGESTION_EXTEND_LENGTH: &str = "extend-length";

/// Produce exactly two ranked easing proposals:
///
/// 1. Raise the goal halfway back toward baseline, keeping the duration.
/// 2. Keep the goal but extend the duration by half, lowering the slope.
///
/// Legacy percentage plans get a goal derived from half the baseline, so
/// both proposals are expressible as goal-based previews.
pub fn make_ease_suggestions(plan: &Plan, baseline_g: f64) -> Vec<Suggestion> {
    let goal = plan.goal_g.unwrap_or_else(|| (baseline_g * 0.5).min(baseline_g));
    let ease_goal = round_dp(goal.max((goal + baseline_g) / 2.0), 2);
    let extend_weeks = ((f64::from(plan.length_weeks)) * 1.5).ceil() as u32;

    let raise_preview =
        generate_plan_from_goal(baseline_g, ease_goal, plan.length_weeks, plan.strategy);
    let extend_preview = generate_plan_from_goal(baseline_g, goal, extend_weeks, plan.strategy);

    vec![
        Suggestion {
            id: SUGGESTION_RAISE_GOAL.to_string(),
            title: "Ease pace (raise goal)".to_string(),
            details: format!(
                "Temporarily raise the daily goal to {ease_goal:.2}g/day to reduce pressure."
            ),
            new_weekly_pct: None,
            new_goal_g: Some(ease_goal),
            new_length_weeks: None,
            preview_daily_targets: raise_preview,
        },
        Suggestion {
            id: SUGGESTION_EXTEND_LENGTH.to_string(),
            title: "Extend plan by 50%".to_string(),
            details: format!(
                "Extend length from {} to {} weeks to lower daily targets.",
                plan.length_weeks, extend_weeks
            ),
            new_weekly_pct: None,
            new_goal_g: None,
            new_length_weeks: Some(extend_weeks),
            preview_daily_targets: extend_preview,
        },
    ]
}
