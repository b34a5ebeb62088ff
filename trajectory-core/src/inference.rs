//! Keyword heuristics for filling in what the user did not say explicitly.
//!
//! Both cascades are ordered rule tables: rules are evaluated top to bottom and
//! the first one that matches decides. Reordering a table changes behaviour.

use std::sync::LazyLock;

use regex::Regex;

use crate::progress::ProgressMode;
use crate::units::Unit;

/// What a rule looks at.
pub enum Condition {
    /// Lowercased input contains a stem from the pattern.
    Mentions(Regex),
    /// The already-resolved unit is one of these.
    UnitIn(&'static [Unit]),
}

impl Condition {
    fn holds(&self, text: &str, unit: Unit) -> bool {
        match self {
            Condition::Mentions(re) => re.is_match(text),
            Condition::UnitIn(units) => units.contains(&unit),
        }
    }
}

pub struct Rule<T> {
    pub name: &'static str,
    pub condition: Condition,
    pub result: T,
}

fn mentions(pattern: &str) -> Condition {
    // Patterns are compile-time literals; a typo here is a programming error.
    Condition::Mentions(Regex::new(pattern).expect("keyword pattern must compile"))
}

/// Context rules for the unit when no explicit unit token resolved.
pub static UNIT_RULES: LazyLock<Vec<Rule<Unit>>> = LazyLock::new(|| {
    vec![
        Rule {
            name: "money",
            condition: mentions(r"руб|₽|деньг|сбереж|накоп|капитал|доход"),
            result: Unit::Rub,
        },
        Rule {
            name: "repetitions",
            condition: mentions(r"отжим|подтяг|присед|повтор|раз"),
            result: Unit::Reps,
        },
        Rule {
            name: "travel",
            condition: mentions(r"поездк|путешеств|тайланд|дубай|тур|отпуск"),
            result: Unit::Trip,
        },
    ]
});

/// Rules deciding how repeated progress reports combine.
pub static PROGRESS_MODE_RULES: LazyLock<Vec<Rule<ProgressMode>>> = LazyLock::new(|| {
    vec![
        Rule {
            name: "accumulation vocabulary",
            condition: mentions(r"накоп|коплю|сбереж|капитал|доход|выруч|заработ|руб|₽|\$|usd|eur|евро"),
            result: ProgressMode::Increment,
        },
        Rule {
            name: "personal-best vocabulary",
            condition: mentions(r"отжим|подтяг|присед|повтор|рекорд|максимум|макс|жим|планк"),
            result: ProgressMode::Best,
        },
        Rule {
            name: "count or weight unit",
            condition: Condition::UnitIn(&[Unit::Reps, Unit::Kg]),
            result: ProgressMode::Best,
        },
        Rule {
            name: "monetary unit",
            condition: Condition::UnitIn(&[Unit::Rub, Unit::Usd, Unit::Eur]),
            result: ProgressMode::Increment,
        },
    ]
});

fn first_match<'a, T: Copy>(rules: &'a [Rule<T>], text: &str, unit: Unit) -> Option<&'a Rule<T>> {
    rules.iter().find(|rule| rule.condition.holds(text, unit))
}

/// Guess a unit from the vocabulary of the whole input.
pub fn infer_unit_by_context(input: &str) -> Unit {
    let text = input.to_lowercase();
    match first_match(&UNIT_RULES, &text, Unit::default()) {
        Some(rule) => {
            tracing::trace!(rule = rule.name, unit = %rule.result, "unit inferred from context");
            rule.result
        }
        None => Unit::default(),
    }
}

/// Decide the progress mode from the input and the unit already chosen.
pub fn infer_progress_mode(input: &str, unit: Unit) -> ProgressMode {
    let text = input.to_lowercase();
    match first_match(&PROGRESS_MODE_RULES, &text, unit) {
        Some(rule) => {
            tracing::trace!(rule = rule.name, mode = %rule.result, "progress mode inferred");
            rule.result
        }
        None => ProgressMode::Absolute,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_by_context_priority() {
        assert_eq!(infer_unit_by_context("Накопить на отпуск"), Unit::Rub);
        assert_eq!(infer_unit_by_context("Подтягивания каждый день"), Unit::Reps);
        assert_eq!(infer_unit_by_context("Поездка в Тайланд"), Unit::Trip);
        assert_eq!(infer_unit_by_context("Читать книги"), Unit::Step);
    }

    #[test]
    fn test_unit_by_context_substring_stems() {
        // "раз" is a bare stem, so it also fires inside longer words.
        assert_eq!(infer_unit_by_context("образование"), Unit::Reps);
        assert_eq!(infer_unit_by_context("Получать доход"), Unit::Rub);
    }

    #[test]
    fn test_progress_mode_vocabulary_wins_over_unit() {
        assert_eq!(infer_progress_mode("Коплю на машину", Unit::Km), ProgressMode::Increment);
        assert_eq!(infer_progress_mode("Новый рекорд в планке", Unit::Rub), ProgressMode::Best);
        assert_eq!(infer_progress_mode("Собрать 100$", Unit::Step), ProgressMode::Increment);
    }

    #[test]
    fn test_progress_mode_from_unit() {
        assert_eq!(infer_progress_mode("Бег", Unit::Reps), ProgressMode::Best);
        assert_eq!(infer_progress_mode("Бег", Unit::Kg), ProgressMode::Best);
        assert_eq!(infer_progress_mode("Цель", Unit::Usd), ProgressMode::Increment);
        assert_eq!(infer_progress_mode("Цель", Unit::Km), ProgressMode::Absolute);
        assert_eq!(infer_progress_mode("", Unit::Step), ProgressMode::Absolute);
    }

    #[test]
    fn test_rule_tables_are_ordered() {
        let names: Vec<_> = PROGRESS_MODE_RULES.iter().map(|r| r.name).collect();
        assert_eq!(names[0], "accumulation vocabulary");
        assert_eq!(UNIT_RULES.len(), 3);
    }

    #[test]
    fn test_first_match_borrows_from_table() {
        let text = String::from("накопить на отпуск и подтягивания");
        let rule = first_match(&UNIT_RULES, &text, Unit::default());
        drop(text);
        assert_eq!(rule.map(|r| r.result), Some(Unit::Rub));

        let rule = first_match(&PROGRESS_MODE_RULES, "бег", Unit::Kg).unwrap();
        assert_eq!(rule.name, "count or weight unit");
        assert!(first_match(&UNIT_RULES, "читать", Unit::default()).is_none());
    }
}
