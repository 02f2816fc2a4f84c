//! Plan lifecycle controller — owns the active plan, its state
//! transitions, and the reactive suggestion queue. Every state change is
//! announced through the signal bus so any presentation or service layer
//! can observe without being wired into the engine.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info};

use pufflog_core::config::TaperConfig;
use pufflog_core::signal_bus::{noop_sink, SignalSink, TaperSignal};
use pufflog_core::types::{
    BaselineResult, DailyTotal, DerivedTaperState, Plan, PlanAdjustment, PlanControl, PlanSpec,
    PlanStatus, PlanUpdate, Suggestion,
};
use pufflog_stats::trend::{trend_flags, TrendThresholds};

use crate::adherence::compute_derived;
use crate::curve::generate_targets;
use crate::suggest::make_ease_suggestions;

/// Owns at most one plan at a time; the surrounding system sequences all
/// calls on a single logical thread, so no internal locking is needed.
pub struct TaperController {
    config: TaperConfig,
    plan: Option<Plan>,
    suggestion_queue: Vec<Suggestion>,
    sink: Arc<dyn SignalSink>,
}

impl std::fmt::Debug for TaperController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaperController")
            .field("plan", &self.plan)
            .field("suggestions", &self.suggestion_queue.len())
            .finish()
    }
}

impl TaperController {
    /// Creates a controller with no plan and a no-op signal sink.
    pub fn new(config: TaperConfig) -> Self {
        Self {
            config,
            plan: None,
            suggestion_queue: Vec::new(),
            sink: noop_sink(),
        }
    }

    /// Creates a controller around a hydrated plan snapshot. Accepts plans
    /// saved under either control scheme, including older snapshots that
    /// lack `goal_g` entirely.
    pub fn hydrate(config: TaperConfig, plan: Option<Plan>) -> Self {
        Self {
            plan,
            ..Self::new(config)
        }
    }

    /// Attach a signal sink for observing lifecycle changes.
    pub fn with_signal_sink(mut self, sink: Arc<dyn SignalSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn plan(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestion_queue
    }

    fn round_step(&self) -> Option<f64> {
        self.config.round_targets.then_some(self.config.round_step_g)
    }

    /// Build a new active plan, replacing any existing one. Goal-based
    /// generation is preferred when a goal is supplied; otherwise the
    /// legacy weekly-percentage path is used.
    pub fn create_plan(&mut self, spec: PlanSpec) -> &Plan {
        let weekly_pct = spec.weekly_pct.unwrap_or(self.config.default_weekly_pct);
        let control = match spec.goal_g {
            Some(goal_g) => PlanControl::Goal { goal_g },
            None => PlanControl::WeeklyPct { weekly_pct },
        };
        let daily_targets_g = generate_targets(
            spec.baseline_g,
            control,
            spec.length_weeks,
            spec.strategy,
            self.round_step(),
        );

        let plan = Plan {
            baseline_g: spec.baseline_g,
            strategy: spec.strategy,
            weekly_pct: Some(weekly_pct),
            goal_g: spec.goal_g,
            length_weeks: spec.length_weeks,
            sessions_per_day: spec.sessions_per_day,
            start_date: spec.start_date,
            daily_targets_g,
            status: PlanStatus::Active,
            adjustments: Vec::new(),
        };

        info!(
            strategy = ?plan.strategy,
            length_weeks = plan.length_weeks,
            goal_g = ?plan.goal_g,
            "Creating taper plan"
        );
        self.suggestion_queue.clear();
        self.sink.emit(TaperSignal::PlanCreated {
            strategy: plan.strategy,
        });
        self.plan.insert(plan)
    }

    /// Merge updates into the current plan. When any control field changed
    /// (`baseline_g`, `goal_g`, `weekly_pct`, `length_weeks`, `strategy`),
    /// the whole target array is regenerated through the plan's resolved
    /// control scheme. Silent no-op when no plan exists.
    pub fn edit_plan(&mut self, updates: PlanUpdate) -> Option<&Plan> {
        let round_step = self.round_step();
        let regenerate = updates.regenerates_targets();
        let Some(plan) = self.plan.as_mut() else {
            debug!("edit_plan ignored: no plan");
            return None;
        };

        if let Some(v) = updates.baseline_g {
            plan.baseline_g = v;
        }
        if let Some(v) = updates.strategy {
            plan.strategy = v;
        }
        if let Some(v) = updates.weekly_pct {
            plan.weekly_pct = Some(v);
        }
        if let Some(v) = updates.goal_g {
            plan.goal_g = Some(v);
        }
        if let Some(v) = updates.length_weeks {
            plan.length_weeks = v;
        }
        if let Some(v) = updates.sessions_per_day {
            plan.sessions_per_day = Some(v);
        }

        if regenerate {
            let control = plan.control();
            plan.daily_targets_g = generate_targets(
                plan.baseline_g,
                control,
                plan.length_weeks,
                plan.strategy,
                round_step,
            );
            debug!(targets = plan.daily_targets_g.len(), "Regenerated plan targets");
        }

        self.sink.emit(TaperSignal::PlanEdited);
        self.plan.as_ref()
    }

    /// Pause an active plan. The day-index clock is NOT frozen: calendar
    /// time keeps advancing against `start_date` while paused.
    pub fn pause_plan(&mut self) -> Option<&Plan> {
        if let Some(plan) = self.plan.as_mut() {
            if plan.status == PlanStatus::Active {
                plan.status = PlanStatus::Paused;
                info!("Taper plan paused");
                self.sink.emit(TaperSignal::PlanPaused);
            }
        }
        self.plan.as_ref()
    }

    /// Resume a paused plan. A completed plan cannot be revived.
    pub fn resume_plan(&mut self) -> Option<&Plan> {
        if let Some(plan) = self.plan.as_mut() {
            if plan.status == PlanStatus::Paused {
                plan.status = PlanStatus::Active;
                info!("Taper plan resumed");
                self.sink.emit(TaperSignal::PlanResumed);
            }
        }
        self.plan.as_ref()
    }

    /// Discard the plan entirely, along with any pending suggestions.
    pub fn cancel_plan(&mut self) {
        if self.plan.take().is_some() {
            self.suggestion_queue.clear();
            info!("Taper plan cancelled");
            self.sink.emit(TaperSignal::PlanCancelled);
        }
    }

    /// Apply an easing suggestion: merge its control deltas into the plan,
    /// regenerate targets through the resolved control scheme, and append
    /// an adjustment record capturing the change. Clears the queue.
    pub fn apply_suggestion(
        &mut self,
        suggestion: &Suggestion,
        now: DateTime<Utc>,
    ) -> Option<&Plan> {
        let round_step = self.round_step();
        let Some(plan) = self.plan.as_mut() else {
            debug!("apply_suggestion ignored: no plan");
            return None;
        };

        let previous_weekly_pct = plan.weekly_pct;
        let previous_length_weeks = Some(plan.length_weeks);
        let previous_goal_g = plan.goal_g;

        if let Some(pct) = suggestion.new_weekly_pct {
            plan.weekly_pct = Some(pct);
        }
        if let Some(goal) = suggestion.new_goal_g {
            plan.goal_g = Some(goal);
        }
        if let Some(weeks) = suggestion.new_length_weeks {
            plan.length_weeks = weeks;
        }

        let control = plan.control();
        plan.daily_targets_g = generate_targets(
            plan.baseline_g,
            control,
            plan.length_weeks,
            plan.strategy,
            round_step,
        );

        plan.adjustments.push(PlanAdjustment {
            date: now,
            reason: suggestion.title.clone(),
            previous_weekly_pct,
            previous_length_weeks,
            previous_goal_g,
            new_weekly_pct: plan.weekly_pct,
            new_length_weeks: Some(plan.length_weeks),
            new_goal_g: plan.goal_g,
        });

        info!(reason = %suggestion.title, "Applied taper suggestion");
        self.suggestion_queue.clear();
        self.sink.emit(TaperSignal::PlanAdjusted {
            reason: suggestion.title.clone(),
        });
        self.plan.as_ref()
    }

    /// Remove a single suggestion from the queue by id. The plan itself is
    /// untouched.
    pub fn dismiss_suggestion(&mut self, id: &str) {
        let before = self.suggestion_queue.len();
        self.suggestion_queue.retain(|s| s.id != id);
        if self.suggestion_queue.len() != before {
            debug!(id, "Dismissed suggestion");
            self.sink.emit(TaperSignal::SuggestionsUpdated {
                count: self.suggestion_queue.len(),
            });
        }
    }

    /// The reactive evaluation step: recompute derived state for `today`,
    /// auto-complete a plan whose targets are exhausted, and repopulate or
    /// clear the suggestion queue from the adherence and trend triggers.
    /// The queue is always replaced wholesale, never merged.
    pub fn evaluate(
        &mut self,
        daily_totals: &[DailyTotal],
        baseline: &BaselineResult,
        today: NaiveDate,
    ) -> DerivedTaperState {
        if let Some(plan) = self.plan.as_mut() {
            if plan.status == PlanStatus::Active
                && (today - plan.start_date).num_days() >= plan.daily_targets_g.len() as i64
            {
                plan.status = PlanStatus::Completed;
                info!("Taper plan completed");
                self.sink.emit(TaperSignal::PlanCompleted);
            }
        }

        let derived = compute_derived(self.plan.as_ref(), daily_totals, today);

        let next_queue = match self.plan.as_ref() {
            Some(plan) if plan.status == PlanStatus::Active => {
                let baseline_g = if plan.baseline_g > 0.0 {
                    plan.baseline_g
                } else {
                    baseline.baseline_g
                };
                let values: Vec<f64> = daily_totals.iter().map(|d| d.grams).collect();
                let trend = trend_flags(
                    &values,
                    baseline_g,
                    TrendThresholds {
                        rising: self.config.rising_slope_frac,
                        strong_rising: self.config.strong_rising_slope_frac,
                    },
                );
                let bad_adherence = derived.adherence_pct7.unwrap_or(100)
                    < self.config.adherence_floor_pct
                    || derived.misses7.unwrap_or(0) >= self.config.miss_limit;

                if bad_adherence || trend.rising {
                    make_ease_suggestions(plan, baseline_g)
                } else {
                    Vec::new()
                }
            }
            _ => Vec::new(),
        };

        if next_queue != self.suggestion_queue {
            debug!(count = next_queue.len(), "Suggestion queue replaced");
            self.suggestion_queue = next_queue;
            self.sink.emit(TaperSignal::SuggestionsUpdated {
                count: self.suggestion_queue.len(),
            });
        }

        derived
    }
}
