//! Canonical goal units and the alias table that collapses user spellings onto them.
//!
//! Lookups are exact first, then fuzzy (Levenshtein distance <= 1) so a typo
//! right after a quantity ("100 аз") still lands on the intended unit.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Closed set of unit tokens a goal can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Unit {
    #[serde(rename = "руб")]
    Rub,
    #[serde(rename = "раз")]
    Reps,
    #[serde(rename = "км")]
    Km,
    #[serde(rename = "кг")]
    Kg,
    #[default]
    #[serde(rename = "шаг")]
    Step,
    #[serde(rename = "поездка")]
    Trip,
    #[serde(rename = "usd")]
    Usd,
    #[serde(rename = "eur")]
    Eur,
}

impl Unit {
    pub const ALL: [Unit; 8] = [
        Unit::Rub,
        Unit::Reps,
        Unit::Km,
        Unit::Kg,
        Unit::Step,
        Unit::Trip,
        Unit::Usd,
        Unit::Eur,
    ];

    /// Canonical token as stored on a goal.
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Rub => "руб",
            Unit::Reps => "раз",
            Unit::Km => "км",
            Unit::Kg => "кг",
            Unit::Step => "шаг",
            Unit::Trip => "поездка",
            Unit::Usd => "usd",
            Unit::Eur => "eur",
        }
    }

    /// Money units accumulate; see `inference`.
    pub fn is_monetary(&self) -> bool {
        matches!(self, Unit::Rub | Unit::Usd | Unit::Eur)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown unit: {0} (expected руб, раз, км, кг, шаг, поездка, usd, eur or an alias)")]
pub struct UnknownUnit(pub String);

impl FromStr for Unit {
    type Err = UnknownUnit;

    /// Accepts a canonical token or any alias, exact match only.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_token(s);
        Unit::ALL
            .iter()
            .find(|unit| unit.as_str() == key)
            .copied()
            .or_else(|| {
                UNIT_ALIASES
                    .iter()
                    .find(|(alias, _)| *alias == key)
                    .map(|(_, unit)| *unit)
            })
            .ok_or_else(|| UnknownUnit(s.to_string()))
    }
}

/// Ordered alias table. Order matters: fuzzy ties resolve to the earliest entry.
pub const UNIT_ALIASES: &[(&str, Unit)] = &[
    ("руб", Unit::Rub),
    ("р", Unit::Rub),
    ("рубль", Unit::Rub),
    ("рубля", Unit::Rub),
    ("рублей", Unit::Rub),
    ("₽", Unit::Rub),
    ("раз", Unit::Reps),
    ("раза", Unit::Reps),
    ("км", Unit::Km),
    ("километр", Unit::Km),
    ("километра", Unit::Km),
    ("километров", Unit::Km),
    ("кг", Unit::Kg),
    ("килограмм", Unit::Kg),
    ("килограмма", Unit::Kg),
    ("килограммов", Unit::Kg),
    ("шаг", Unit::Step),
    ("шага", Unit::Step),
    ("шагов", Unit::Step),
    ("$", Unit::Usd),
    ("usd", Unit::Usd),
    ("доллар", Unit::Usd),
    ("доллара", Unit::Usd),
    ("долларов", Unit::Usd),
    ("€", Unit::Eur),
    ("eur", Unit::Eur),
    ("евро", Unit::Eur),
];

const MAX_FUZZY_DISTANCE: usize = 1;

fn is_token_char(c: char) -> bool {
    c.is_ascii_digit()
        || c.is_ascii_lowercase()
        || ('а'..='я').contains(&c)
        || matches!(c, 'ё' | '$' | '€' | '₽')
}

/// Lowercase and strip surrounding punctuation: "Руб." -> "руб".
pub fn normalize_token(value: &str) -> String {
    value
        .to_lowercase()
        .trim_matches(|c: char| !is_token_char(c))
        .to_string()
}

/// Classic two-row dynamic-programming edit distance over chars.
pub fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut diag = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            let cost = usize::from(ca != cb);
            row[j + 1] = (above + 1).min(row[j] + 1).min(diag + cost);
            diag = above;
        }
    }
    row[b.len()]
}

/// Resolve a raw token to a canonical unit: exact alias, then nearest alias
/// within one edit.
pub fn resolve_unit_token(value: &str) -> Option<Unit> {
    let key = normalize_token(value);
    if key.is_empty() {
        return None;
    }
    if let Some((_, unit)) = UNIT_ALIASES.iter().find(|(alias, _)| *alias == key) {
        return Some(*unit);
    }

    let mut best: Option<(usize, Unit, &str)> = None;
    for (alias, unit) in UNIT_ALIASES {
        let distance = levenshtein(&key, alias);
        if distance > MAX_FUZZY_DISTANCE {
            continue;
        }
        match best {
            Some((best_distance, _, _)) if distance >= best_distance => {}
            _ => best = Some((distance, *unit, *alias)),
        }
    }

    best.map(|(distance, unit, alias)| {
        tracing::trace!(token = %key, alias, distance, "fuzzy unit match");
        unit
    })
}
