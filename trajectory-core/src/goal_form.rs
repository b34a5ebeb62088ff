//! Merge explicitly entered goal fields with what the parser inferred from the title.
//!
//! Explicit values always win; parsed values fill the gaps.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::goal::{color_for, Goal, GoalCategory, GoalStatus};
use crate::goal_parser::{clamp_target, parse_goal_input, ParsedGoal};
use crate::progress::ProgressMode;
use crate::units::Unit;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("goal title is empty")]
    EmptyTitle,
    #[error("no target: enter a number or put one in the title (e.g. \"Отжимания 100 раз\")")]
    MissingTarget,
    #[error("current progress must be a non-negative number")]
    InvalidCurrent,
}

/// Raw form input. `None` means the field was left blank.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalForm {
    pub title: String,
    pub description: Option<String>,
    pub category: GoalCategory,
    pub target: Option<f64>,
    pub current: Option<f64>,
    pub unit: Option<Unit>,
    pub progress_mode: Option<ProgressMode>,
    pub color: Option<String>,
}

/// Target used at onboarding when the goal text carries no number: twice the
/// progress already made, at least 100; 100 when nothing was made yet.
pub fn onboarding_fallback_target(progress: f64) -> f64 {
    let fallback = if progress.is_finite() && progress > 0.0 {
        (progress * 2.0).max(100.0)
    } else {
        100.0
    };
    f64::from(clamp_target(fallback))
}

/// A validated goal ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalDraft {
    pub title: String,
    pub description: Option<String>,
    pub category: GoalCategory,
    pub target_value: f64,
    pub current_value: f64,
    pub unit: Unit,
    pub progress_mode: ProgressMode,
    pub color: Option<String>,
}

impl GoalForm {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    fn explicit_target(&self) -> Option<f64> {
        self.target.filter(|t| t.is_finite() && *t > 0.0)
    }

    /// Every problem with the form, not just the first.
    pub fn validate(&self) -> Vec<FormError> {
        let parsed = parse_goal_input(&self.title);
        self.validate_with(&parsed)
    }

    fn validate_with(&self, parsed: &ParsedGoal) -> Vec<FormError> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push(FormError::EmptyTitle);
        }
        if self.explicit_target().is_none() && parsed.target_value.is_none() {
            errors.push(FormError::MissingTarget);
        }
        if let Some(current) = self.current {
            if !current.is_finite() || current < 0.0 {
                errors.push(FormError::InvalidCurrent);
            }
        }
        errors
    }

    /// Validate and merge; returns the first error when invalid.
    pub fn resolve(&self) -> Result<GoalDraft, FormError> {
        let parsed = parse_goal_input(&self.title);
        if let Some(err) = self.validate_with(&parsed).into_iter().next() {
            return Err(err);
        }

        let target_value = self
            .explicit_target()
            .or(parsed.target_value.map(f64::from))
            .unwrap_or(1.0);
        let current_value = self.current.unwrap_or(0.0).clamp(0.0, target_value);
        let title = if parsed.title.is_empty() {
            self.title.trim().to_string()
        } else {
            parsed.title
        };

        Ok(GoalDraft {
            title,
            description: self
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            category: self.category,
            target_value,
            current_value,
            unit: self.unit.unwrap_or(parsed.unit),
            progress_mode: self.progress_mode.unwrap_or(parsed.progress_mode),
            color: self.color.clone(),
        })
    }

    /// Like [`GoalForm::resolve`], but a missing target never fails: it falls
    /// back to [`onboarding_fallback_target`] of the entered progress.
    pub fn resolve_onboarding(&self) -> Result<GoalDraft, FormError> {
        if self.explicit_target().is_some() || parse_goal_input(&self.title).target_value.is_some() {
            return self.resolve();
        }
        let progress = self.current.unwrap_or(0.0);
        let form = GoalForm {
            target: Some(onboarding_fallback_target(progress)),
            ..self.clone()
        };
        form.resolve()
    }
}

impl GoalDraft {
    pub fn into_goal(self, id: impl Into<String>, now: DateTime<Utc>) -> Goal {
        let id = id.into();
        let color = self.color.unwrap_or_else(|| color_for(&id).to_string());
        let status = if self.current_value >= self.target_value {
            GoalStatus::Completed
        } else {
            GoalStatus::Active
        };
        Goal {
            completed_at: (status == GoalStatus::Completed).then_some(now),
            id,
            title: self.title,
            description: self.description,
            category: self.category,
            current_value: self.current_value,
            target_value: self.target_value,
            unit: self.unit,
            progress_mode: self.progress_mode,
            status,
            created_at: now,
            updated_at: now,
            color,
        }
    }
}
