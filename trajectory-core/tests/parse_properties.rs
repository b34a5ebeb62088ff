use proptest::prelude::*;
use trajectory_core::{
    calc_progress_percent, parse_goal_input, ProgressMode, Unit, MAX_TARGET, MIN_TARGET,
};

fn goal_like_text() -> impl Strategy<Value = String> {
    let words = prop::sample::select(vec![
        "Отжимания", "накопить", "пробежать", "раз", "руб", "тыс", "к", "млн", "км", "кг",
        "двадцать", "сто", "и", "пять", "тысяча", "миллион", "поездка", "в", "Дубай", "$", "€",
        "1 000", "42", "3,5", "0", "-", ",", "аз", "книг", "рекорд",
    ]);
    prop::collection::vec(words, 0..8).prop_map(|w| w.join(" "))
}

/// Goal text with exactly one quantity phrase and no travel vocabulary, so
/// nothing but the quantity can produce a target.
fn single_quantity_text() -> impl Strategy<Value = String> {
    let filler = prop::sample::select(vec![
        "Отжимания", "накопить", "пробежать", "в", "книг", "рекорд", "на", "машину", "-", ",",
    ]);
    let digits = (
        prop::sample::select(vec!["0", "7", "42", "1 000", "3,5", "250"]),
        prop::sample::select(vec!["", " тыс", " к", " млн"]),
        prop::sample::select(vec!["", " раз", " руб", " км", " $", " аз"]),
    )
        .prop_map(|(n, scale, unit)| format!("{n}{scale}{unit}"));
    let words = (
        prop::sample::select(vec!["сто", "двадцать пять", "три тысячи", "пятьсот сорок"]),
        prop::sample::select(vec!["", " раз", " рублей", " километров"]),
    )
        .prop_map(|(n, unit)| format!("{n}{unit}"));
    (
        prop::collection::vec(filler.clone(), 0..4),
        prop_oneof![digits, words],
        prop::collection::vec(filler, 0..4),
    )
        .prop_map(|(before, quantity, after)| {
            before
                .into_iter()
                .map(str::to_string)
                .chain(std::iter::once(quantity))
                .chain(after.into_iter().map(str::to_string))
                .collect::<Vec<_>>()
                .join(" ")
        })
}

proptest! {
    #[test]
    fn reparsed_title_loses_the_quantity(input in single_quantity_text()) {
        let first = parse_goal_input(&input);
        prop_assert!(first.target_value.is_some());
        // A title that fell back to the whole input still carries the quantity.
        prop_assume!(first.title != input.trim());
        let second = parse_goal_input(&first.title);
        prop_assert_ne!(second.target_value, first.target_value);
    }

    #[test]
    fn target_is_none_or_in_range(input in any::<String>()) {
        let parsed = parse_goal_input(&input);
        if let Some(t) = parsed.target_value {
            prop_assert!((MIN_TARGET..=MAX_TARGET).contains(&t));
        }
    }

    #[test]
    fn fields_stay_in_closed_sets(input in goal_like_text()) {
        let parsed = parse_goal_input(&input);
        prop_assert!(Unit::ALL.contains(&parsed.unit));
        prop_assert!(matches!(
            parsed.progress_mode,
            ProgressMode::Increment | ProgressMode::Absolute | ProgressMode::Best
        ));
        if let Some(t) = parsed.target_value {
            prop_assert!((MIN_TARGET..=MAX_TARGET).contains(&t));
        }
    }

    #[test]
    fn title_non_empty_for_non_empty_input(input in "\\PC{0,40}") {
        let parsed = parse_goal_input(&input);
        let trimmed = input.replace('\u{a0}', " ");
        if !trimmed.trim().is_empty() {
            prop_assert!(!parsed.title.is_empty());
        } else {
            prop_assert_eq!(parsed.title, "");
        }
    }

    #[test]
    fn title_non_empty_for_goal_like_input(input in goal_like_text()) {
        let parsed = parse_goal_input(&input);
        prop_assert_eq!(parsed.title.is_empty(), input.trim().is_empty());
    }

    #[test]
    fn percent_always_within_bounds(current in any::<f64>(), target in any::<f64>()) {
        prop_assert!(calc_progress_percent(current, target) <= 100);
    }
}

#[test]
fn parse_is_deterministic() {
    for input in ["Отжимания 100 раз", "накопить 50 тыс руб", "Поездка в Дубай", ""] {
        assert_eq!(parse_goal_input(input), parse_goal_input(input));
    }
}
