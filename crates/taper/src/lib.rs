//! Taper planning — target curve generation, adherence and streak
//! evaluation, easing suggestions, and the plan lifecycle controller.

pub mod adherence;
pub mod controller;
pub mod curve;
pub mod suggest;

pub use adherence::{compute_adherence, compute_derived, plan_day_index, Adherence};
pub use controller::TaperController;
pub use curve::{generate_linear_pct_plan, generate_plan_from_goal, generate_targets};
pub use suggest::{make_ease_suggestions, SUGGESTION_EXTEND_LENGTH, SUGGESTION_RAISE_GOAL};
