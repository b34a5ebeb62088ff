//! Free-text goal parsing: "Отжимания 100 раз" -> title, target, unit, progress mode.
//!
//! Recognition is tried in order, first success wins:
//! 1) a digit literal with optional scale word and trailing unit token
//! 2) a spelled-out Russian numeral phrase
//! 3) nothing quantitative: unit and mode come from context alone
//!
//! The parser is total. Anything it cannot make sense of degrades to
//! `target_value: None`, never to an error.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::inference::{infer_progress_mode, infer_unit_by_context};
use crate::numerals::parse_word_number;
use crate::progress::ProgressMode;
use crate::units::{normalize_token, resolve_unit_token, Unit};

pub const MIN_TARGET: u32 = 1;
pub const MAX_TARGET: u32 = 1_000_000;

/// Structured goal extracted from user text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedGoal {
    pub title: String,
    pub target_value: Option<u32>,
    pub unit: Unit,
    pub progress_mode: ProgressMode,
}

impl ParsedGoal {
    fn empty() -> Self {
        Self {
            title: String::new(),
            target_value: None,
            unit: Unit::default(),
            progress_mode: ProgressMode::Absolute,
        }
    }
}

// Digits, optionally grouped by thousands with a space, optionally with a fraction.
static NUMBER_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[0-9]{1,3}(?:[ \x{A0}][0-9]{3})+|[0-9]+)(?:[.,][0-9]+)?")
        .expect("number literal pattern must compile")
});

const MULTIPLIERS: &[(&str, f64)] = &[
    ("тыс", 1_000.0),
    ("тысяч", 1_000.0),
    ("тысяча", 1_000.0),
    ("тысячи", 1_000.0),
    ("к", 1_000.0),
    ("k", 1_000.0),
    ("млн", 1_000_000.0),
    ("миллион", 1_000_000.0),
    ("миллиона", 1_000_000.0),
    ("миллионов", 1_000_000.0),
    ("м", 1_000_000.0),
    ("m", 1_000_000.0),
];

// Abbreviations that may carry a trailing dot: "50 тыс. руб".
const DOTTED_MULTIPLIERS: &[&str] = &["тыс", "млн"];

const TOKEN_TERMINATORS: &[char] = &[',', '.', ';', ':', '!', '?'];

/// Byte span and pieces of a "number [scale] [token]" phrase.
#[derive(Debug, Clone, PartialEq)]
struct QuantityMatch<'a> {
    start: usize,
    end: usize,
    literal: &'a str,
    multiplier: f64,
    trailing: Option<&'a str>,
}

fn skip_whitespace(input: &str, pos: usize) -> usize {
    let rest = &input[pos..];
    pos + (rest.len() - rest.trim_start().len())
}

fn prefix_len(input: &str, pos: usize, keep: impl Fn(char) -> bool) -> usize {
    input[pos..]
        .char_indices()
        .find(|(_, c)| !keep(*c))
        .map(|(i, _)| i)
        .unwrap_or(input.len() - pos)
}

fn scan_quantity(input: &str) -> Option<QuantityMatch<'_>> {
    let literal = NUMBER_LITERAL.find(input)?;
    let mut end = literal.end();
    let mut multiplier = 1.0;

    // A scale word has to be a whole word: "100 км" is not "100 к" + "м".
    let word_start = skip_whitespace(input, end);
    let word_len = prefix_len(input, word_start, char::is_alphabetic);
    if word_len > 0 {
        let word = input[word_start..word_start + word_len].to_lowercase();
        if let Some((_, value)) = MULTIPLIERS.iter().find(|(w, _)| *w == word) {
            multiplier = *value;
            end = word_start + word_len;
            if DOTTED_MULTIPLIERS.contains(&word.as_str()) && input[end..].starts_with('.') {
                end += 1;
            }
        }
    }

    let token_start = skip_whitespace(input, end);
    let token_len = prefix_len(input, token_start, |c| {
        !c.is_whitespace() && !TOKEN_TERMINATORS.contains(&c)
    });
    let trailing = if token_len > 0 {
        end = token_start + token_len;
        Some(&input[token_start..end])
    } else {
        None
    };

    Some(QuantityMatch {
        start: literal.start(),
        end,
        literal: literal.as_str(),
        multiplier,
        trailing,
    })
}

/// Clamp a recognized quantity into the allowed target range.
pub fn clamp_target(value: f64) -> u32 {
    if !value.is_finite() {
        return MIN_TARGET;
    }
    value.round().clamp(MIN_TARGET as f64, MAX_TARGET as f64) as u32
}

/// Collapse whitespace and drop one dangling "," or "-".
fn tidy(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .strip_suffix([',', '-'])
        .unwrap_or(&collapsed)
        .trim()
        .to_string()
}

/// Title with `input[start..end]` cut out; `None` when nothing is left.
fn cut_title(input: &str, start: usize, end: usize) -> Option<String> {
    let title = tidy(&format!("{} {}", &input[..start], &input[end..]));
    (!title.is_empty()).then_some(title)
}

fn is_short_noise(token: &str) -> bool {
    let len = token.chars().count();
    (1..=2).contains(&len)
        && token
            .chars()
            .all(|c| c.is_ascii_lowercase() || ('а'..='я').contains(&c) || c == 'ё')
}

fn parse_digit_quantity(input: &str) -> Option<ParsedGoal> {
    let quantity = scan_quantity(input)?;
    let normalized: String = quantity
        .literal
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .replacen(',', ".", 1);
    let base = match normalized.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => {
            tracing::debug!(literal = quantity.literal, "digit literal is not a finite number");
            return None;
        }
    };

    let target = clamp_target(base * quantity.multiplier);
    let explicit_unit = quantity.trailing.and_then(resolve_unit_token);
    let unit = explicit_unit.unwrap_or_else(|| infer_unit_by_context(input));

    let title = match cut_title(input, quantity.start, quantity.end) {
        Some(cut) => match quantity.trailing {
            // The token was not a unit, so it belongs to the description.
            Some(token) if explicit_unit.is_none() && !is_short_noise(&normalize_token(token)) => {
                tidy(&format!("{cut} {token}"))
            }
            _ => cut,
        },
        None => input.to_string(),
    };

    tracing::debug!(
        literal = quantity.literal,
        multiplier = quantity.multiplier,
        target,
        %unit,
        explicit = explicit_unit.is_some(),
        "digit quantity recognized"
    );

    Some(ParsedGoal {
        title,
        target_value: Some(target),
        unit,
        progress_mode: infer_progress_mode(input, unit),
    })
}

fn parse_word_quantity(input: &str) -> Option<ParsedGoal> {
    let words: Vec<&str> = input.split_whitespace().collect();

    (0..words.len()).find_map(|idx| {
        let number = parse_word_number(&words, idx)?;
        let after = idx + number.length;
        let explicit_unit = words.get(after).and_then(|w| resolve_unit_token(w));
        let unit = explicit_unit.unwrap_or_else(|| infer_unit_by_context(input));
        let remove_end = if explicit_unit.is_some() { after + 1 } else { after };

        let kept: Vec<&str> = words
            .iter()
            .enumerate()
            .filter(|(i, _)| *i < idx || *i >= remove_end)
            .map(|(_, w)| *w)
            .collect();
        let title = tidy(&kept.join(" "));
        let title = if title.is_empty() { input.to_string() } else { title };

        tracing::debug!(value = number.value, words = number.length, %unit, "numeral phrase recognized");

        Some(ParsedGoal {
            title,
            target_value: Some(clamp_target(number.value as f64)),
            unit,
            progress_mode: infer_progress_mode(input, unit),
        })
    })
}

/// Parse free text into a structured goal. Never fails.
pub fn parse_goal_input(raw_input: &str) -> ParsedGoal {
    let normalized = raw_input.replace('\u{a0}', " ");
    let input = normalized.trim();
    if input.is_empty() {
        return ParsedGoal::empty();
    }

    if let Some(parsed) = parse_digit_quantity(input) {
        return parsed;
    }
    if let Some(parsed) = parse_word_quantity(input) {
        return parsed;
    }

    let unit = infer_unit_by_context(input);
    // A trip goal without a number is a single trip.
    let target_value = (unit == Unit::Trip).then_some(1);
    tracing::debug!(%unit, ?target_value, "no quantity recognized");

    ParsedGoal {
        title: input.to_string(),
        target_value,
        unit,
        progress_mode: infer_progress_mode(input, unit),
    }
}
