//! Progress percentage and progress-report accumulation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How successive progress reports fold into a goal's current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProgressMode {
    /// Reports are summed (savings, income).
    #[default]
    Increment,
    /// The latest report replaces the value.
    Absolute,
    /// The best report seen is kept (personal records).
    Best,
}

impl ProgressMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressMode::Increment => "increment",
            ProgressMode::Absolute => "absolute",
            ProgressMode::Best => "best",
        }
    }

    /// Fold a new report into the stored value. Never goes below zero.
    pub fn apply(&self, current: f64, report: f64) -> f64 {
        let next = match self {
            ProgressMode::Increment => current + report,
            ProgressMode::Absolute => report,
            ProgressMode::Best => current.max(report),
        };
        next.max(0.0)
    }

    /// Caption shown next to the progress input.
    pub fn hint(&self) -> &'static str {
        match self {
            ProgressMode::Increment => "Накапливаем прогресс",
            ProgressMode::Absolute => "Обновляем текущее значение",
            ProgressMode::Best => "Сохраняем лучший результат",
        }
    }
}

impl fmt::Display for ProgressMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown progress mode: {0} (expected increment, absolute or best)")]
pub struct UnknownProgressMode(pub String);

impl FromStr for ProgressMode {
    type Err = UnknownProgressMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "increment" => Ok(ProgressMode::Increment),
            "absolute" => Ok(ProgressMode::Absolute),
            "best" => Ok(ProgressMode::Best),
            _ => Err(UnknownProgressMode(s.to_string())),
        }
    }
}

/// Percentage of `target` reached by `current`, always within 0..=100.
///
/// Non-finite inputs give 0, a non-positive target counts as 1 and negative
/// progress counts as none.
pub fn calc_progress_percent(current: f64, target: f64) -> u8 {
    if !current.is_finite() || !target.is_finite() {
        return 0;
    }
    let safe_target = if target > 0.0 { target } else { 1.0 };
    let normalized = current.max(0.0);
    let raw = (normalized / safe_target * 100.0).round();
    raw.clamp(0.0, 100.0) as u8
}
