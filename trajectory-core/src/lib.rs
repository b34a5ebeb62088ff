//! trajectory-core: goal-text parsing and progress computation for the Trajectory tracker

pub mod goal;
pub mod goal_form;
pub mod goal_parser;
pub mod inference;
pub mod numerals;
pub mod progress;
pub mod stats;
pub mod units;

pub use goal::{
    color_for, Goal, GoalCategory, GoalError, GoalStatus, ProgressUpdate, UnknownCategory, GOAL_COLORS,
};
pub use goal_form::{onboarding_fallback_target, FormError, GoalDraft, GoalForm};
pub use goal_parser::{clamp_target, parse_goal_input, ParsedGoal, MAX_TARGET, MIN_TARGET};
pub use inference::{infer_progress_mode, infer_unit_by_context};
pub use progress::{calc_progress_percent, ProgressMode, UnknownProgressMode};
pub use stats::UserStats;
pub use units::{resolve_unit_token, Unit, UnknownUnit};
