//! Profile counters over a user's goals.

use serde::Serialize;

use crate::goal::{Goal, GoalStatus};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_goals: usize,
    pub completed_goals: usize,
    pub active_goals: usize,
    pub paused_goals: usize,
    /// Mean progress of active goals, 0 when there are none.
    pub average_active_percent: u8,
}

impl UserStats {
    pub fn from_goals(goals: &[Goal]) -> Self {
        let count = |status: GoalStatus| goals.iter().filter(|g| g.status == status).count();
        let active: Vec<u32> = goals
            .iter()
            .filter(|g| g.status == GoalStatus::Active)
            .map(|g| u32::from(g.progress_percent()))
            .collect();
        let average_active_percent = if active.is_empty() {
            0
        } else {
            (active.iter().sum::<u32>() as f64 / active.len() as f64).round() as u8
        };

        Self {
            total_goals: goals.len(),
            completed_goals: count(GoalStatus::Completed),
            active_goals: active.len(),
            paused_goals: count(GoalStatus::Paused),
            average_active_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal_form::GoalForm;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_user_stats() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let mut goals: Vec<Goal> = ["Отжимания 100 раз", "Пробежать 10 км", "Накопить 500 руб"]
            .iter()
            .enumerate()
            .map(|(i, t)| GoalForm::new(*t).resolve().unwrap().into_goal(format!("g{i}"), now))
            .collect();

        goals[0].record_progress(50.0, now).unwrap();
        goals[1].record_progress(10.0, now).unwrap();
        goals[2].pause(now);

        let stats = UserStats::from_goals(&goals);
        assert_eq!(stats.total_goals, 3);
        assert_eq!(stats.completed_goals, 1);
        assert_eq!(stats.active_goals, 1);
        assert_eq!(stats.paused_goals, 1);
        assert_eq!(stats.average_active_percent, 50);
    }

    #[test]
    fn test_empty_stats() {
        assert_eq!(UserStats::from_goals(&[]), UserStats::default());
    }
}
