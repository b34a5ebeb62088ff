//! Persisted goal entity seeded from a parsed goal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::progress::{calc_progress_percent, ProgressMode};
use crate::units::Unit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GoalCategory {
    Finance,
    Travel,
    Health,
    Education,
    Business,
    #[default]
    Other,
}

impl GoalCategory {
    pub const ALL: [GoalCategory; 6] = [
        GoalCategory::Finance,
        GoalCategory::Travel,
        GoalCategory::Health,
        GoalCategory::Education,
        GoalCategory::Business,
        GoalCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GoalCategory::Finance => "finance",
            GoalCategory::Travel => "travel",
            GoalCategory::Health => "health",
            GoalCategory::Education => "education",
            GoalCategory::Business => "business",
            GoalCategory::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GoalCategory::Finance => "Финансы",
            GoalCategory::Travel => "Путешествия",
            GoalCategory::Health => "Здоровье",
            GoalCategory::Education => "Обучение",
            GoalCategory::Business => "Бизнес",
            GoalCategory::Other => "Другое",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            GoalCategory::Finance => "💰",
            GoalCategory::Travel => "✈️",
            GoalCategory::Health => "💪",
            GoalCategory::Education => "📚",
            GoalCategory::Business => "🚀",
            GoalCategory::Other => "🎯",
        }
    }
}

impl fmt::Display for GoalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category: {0} (expected finance, travel, health, education, business or other)")]
pub struct UnknownCategory(pub String);

impl FromStr for GoalCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        GoalCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == key)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Card palette, picked per goal.
pub const GOAL_COLORS: [&str; 8] = [
    "#007AFF", "#00C853", "#FF9500", "#FF3B30", "#AF52DE", "#FF2D55", "#5856D6", "#FFCC00",
];

/// Stable palette pick so the same goal id always gets the same colour.
pub fn color_for(id: &str) -> &'static str {
    let sum = id.bytes().fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
    GOAL_COLORS[sum % GOAL_COLORS.len()]
}

#[derive(Debug, Error, PartialEq)]
pub enum GoalError {
    #[error("goal {0} is paused; resume it before logging progress")]
    Paused(String),
    #[error("progress report must be a finite number, got {0}")]
    InvalidReport(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: GoalCategory,
    pub current_value: f64,
    pub target_value: f64,
    pub unit: Unit,
    #[serde(default)]
    pub progress_mode: ProgressMode,
    pub status: GoalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub color: String,
}

/// What happened when a report was recorded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressUpdate {
    pub previous: f64,
    pub current: f64,
    /// True only on the report that first reaches the target.
    pub just_completed: bool,
}

impl Goal {
    pub fn progress_percent(&self) -> u8 {
        calc_progress_percent(self.current_value, self.target_value)
    }

    pub fn is_reached(&self) -> bool {
        self.current_value >= self.target_value
    }

    /// Fold a progress report in according to the goal's mode.
    pub fn record_progress(&mut self, report: f64, now: DateTime<Utc>) -> Result<ProgressUpdate, GoalError> {
        if !report.is_finite() {
            return Err(GoalError::InvalidReport(report));
        }
        if self.status == GoalStatus::Paused {
            return Err(GoalError::Paused(self.id.clone()));
        }

        let previous = self.current_value;
        self.current_value = self.progress_mode.apply(previous, report);
        self.updated_at = now;

        let just_completed = self.status == GoalStatus::Active && self.is_reached();
        if just_completed {
            self.status = GoalStatus::Completed;
            self.completed_at = Some(now);
        }

        tracing::debug!(
            goal = %self.id,
            mode = %self.progress_mode,
            previous,
            current = self.current_value,
            just_completed,
            "progress recorded"
        );

        Ok(ProgressUpdate {
            previous,
            current: self.current_value,
            just_completed,
        })
    }

    pub fn pause(&mut self, now: DateTime<Utc>) {
        if self.status == GoalStatus::Active {
            self.status = GoalStatus::Paused;
            self.updated_at = now;
        }
    }

    pub fn resume(&mut self, now: DateTime<Utc>) {
        if self.status == GoalStatus::Paused {
            self.status = if self.is_reached() { GoalStatus::Completed } else { GoalStatus::Active };
            self.updated_at = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(mode: ProgressMode, target: f64) -> Goal {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        Goal {
            id: "g1".to_string(),
            title: "Отжимания".to_string(),
            description: None,
            category: GoalCategory::Health,
            current_value: 0.0,
            target_value: target,
            unit: Unit::Reps,
            progress_mode: mode,
            status: GoalStatus::Active,
            created_at: now,
            updated_at: now,
            completed_at: None,
            color: color_for("g1").to_string(),
        }
    }

    #[test]
    fn test_record_progress_best_keeps_maximum() {
        let mut goal = sample(ProgressMode::Best, 100.0);
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        goal.record_progress(40.0, now).unwrap();
        let update = goal.record_progress(25.0, now).unwrap();
        assert_eq!(update.previous, 40.0);
        assert_eq!(goal.current_value, 40.0);
        assert_eq!(goal.progress_percent(), 40);
        assert_eq!(goal.updated_at, now);
    }

    #[test]
    fn test_record_progress_completes_once() {
        let mut goal = sample(ProgressMode::Increment, 10.0);
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        assert!(!goal.record_progress(6.0, now).unwrap().just_completed);
        assert!(goal.record_progress(6.0, now).unwrap().just_completed);
        assert_eq!(goal.status, GoalStatus::Completed);
        assert_eq!(goal.completed_at, Some(now));
        assert!(!goal.record_progress(1.0, now).unwrap().just_completed);
        assert_eq!(goal.progress_percent(), 100);
    }

    #[test]
    fn test_paused_goal_rejects_reports() {
        let mut goal = sample(ProgressMode::Absolute, 10.0);
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        goal.pause(now);
        assert_eq!(goal.record_progress(3.0, now), Err(GoalError::Paused("g1".to_string())));
        goal.resume(now);
        assert_eq!(goal.status, GoalStatus::Active);
        assert!(matches!(goal.record_progress(f64::NAN, now), Err(GoalError::InvalidReport(_))));
    }

    #[test]
    fn test_category_labels_and_parse() {
        assert_eq!("Travel".parse::<GoalCategory>(), Ok(GoalCategory::Travel));
        let err = "sport".parse::<GoalCategory>().unwrap_err();
        assert_eq!(err, UnknownCategory("sport".to_string()));
        assert!(err.to_string().starts_with("unknown category: sport"));
        assert_eq!(GoalCategory::Finance.label(), "Финансы");
        assert_eq!(GoalCategory::default(), GoalCategory::Other);
    }

    #[test]
    fn test_color_for_is_stable() {
        assert_eq!(color_for("abc"), color_for("abc"));
        assert!(GOAL_COLORS.contains(&color_for("goal-42")));
    }

    #[test]
    fn test_goal_json_shape() {
        let goal = sample(ProgressMode::Best, 100.0);
        let json = serde_json::to_value(&goal).unwrap();
        assert_eq!(json["progressMode"], "best");
        assert_eq!(json["unit"], "раз");
        assert_eq!(json["status"], "active");
        assert!(json.get("completedAt").is_none());
        let back: Goal = serde_json::from_value(json).unwrap();
        assert_eq!(back, goal);
    }
}
