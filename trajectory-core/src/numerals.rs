//! Spelled-out Russian cardinal numerals ("двести пятьдесят", "три тысячи").
//!
//! Composition is short-scale: unit/tens/hundreds words add into a running
//! sub-total, a scale word multiplies the sub-total (or 1 when empty) and moves
//! it into the total.

use crate::units::normalize_token;

const UNITS: &[(&str, u64)] = &[
    ("ноль", 0),
    ("один", 1),
    ("одна", 1),
    ("одно", 1),
    ("два", 2),
    ("две", 2),
    ("три", 3),
    ("четыре", 4),
    ("пять", 5),
    ("шесть", 6),
    ("семь", 7),
    ("восемь", 8),
    ("девять", 9),
    ("десять", 10),
    ("одиннадцать", 11),
    ("двенадцать", 12),
    ("тринадцать", 13),
    ("четырнадцать", 14),
    ("пятнадцать", 15),
    ("шестнадцать", 16),
    ("семнадцать", 17),
    ("восемнадцать", 18),
    ("девятнадцать", 19),
];

const TENS: &[(&str, u64)] = &[
    ("двадцать", 20),
    ("тридцать", 30),
    ("сорок", 40),
    ("пятьдесят", 50),
    ("шестьдесят", 60),
    ("семьдесят", 70),
    ("восемьдесят", 80),
    ("девяносто", 90),
];

const HUNDREDS: &[(&str, u64)] = &[
    ("сто", 100),
    ("двести", 200),
    ("триста", 300),
    ("четыреста", 400),
    ("пятьсот", 500),
    ("шестьсот", 600),
    ("семьсот", 700),
    ("восемьсот", 800),
    ("девятьсот", 900),
];

const SCALES: &[(&str, u64)] = &[
    ("тысяча", 1_000),
    ("тысячи", 1_000),
    ("тысяч", 1_000),
    ("миллион", 1_000_000),
    ("миллиона", 1_000_000),
    ("миллионов", 1_000_000),
];

const CONNECTOR: &str = "и";

fn lookup(table: &[(&str, u64)], token: &str) -> Option<u64> {
    table.iter().find(|(word, _)| *word == token).map(|(_, v)| *v)
}

enum NumeralWord {
    Additive(u64),
    Scale(u64),
}

fn classify(token: &str) -> Option<NumeralWord> {
    lookup(UNITS, token)
        .or_else(|| lookup(TENS, token))
        .or_else(|| lookup(HUNDREDS, token))
        .map(NumeralWord::Additive)
        .or_else(|| lookup(SCALES, token).map(NumeralWord::Scale))
}

/// A numeral phrase recognized at some word offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordNumber {
    pub value: u64,
    /// Words consumed, connectors included.
    pub length: usize,
}

/// Read a numeral phrase starting at `words[start]`, stopping at the first
/// word that does not fit. `None` when the first word is not a numeral.
pub fn parse_word_number<S: AsRef<str>>(words: &[S], start: usize) -> Option<WordNumber> {
    let mut total: u64 = 0;
    let mut current: u64 = 0;
    let mut consumed = 0usize;
    let mut saw_number_word = false;

    for word in words.iter().skip(start) {
        let token = normalize_token(word.as_ref());
        if token.is_empty() {
            break;
        }

        if token == CONNECTOR && saw_number_word {
            consumed += 1;
            continue;
        }

        match classify(&token) {
            Some(NumeralWord::Additive(v)) => current = current.saturating_add(v),
            Some(NumeralWord::Scale(scale)) => {
                let base = if current == 0 { 1 } else { current };
                total = total.saturating_add(base.saturating_mul(scale));
                current = 0;
            }
            None => break,
        }
        consumed += 1;
        saw_number_word = true;
    }

    saw_number_word.then(|| WordNumber {
        value: total.saturating_add(current),
        length: consumed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(s: &str) -> Vec<&str> {
        s.split_whitespace().collect()
    }

    #[test]
    fn test_simple_numerals() {
        assert_eq!(
            parse_word_number(&words("двадцать километров"), 0),
            Some(WordNumber { value: 20, length: 1 })
        );
        assert_eq!(
            parse_word_number(&words("сто пятьдесят дней"), 0),
            Some(WordNumber { value: 150, length: 2 })
        );
        assert_eq!(
            parse_word_number(&words("двести пятьдесят три"), 0),
            Some(WordNumber { value: 253, length: 3 })
        );
    }

    #[test]
    fn test_scale_words() {
        assert_eq!(parse_word_number(&words("тысяча"), 0).map(|n| n.value), Some(1_000));
        assert_eq!(
            parse_word_number(&words("три тысячи двести"), 0),
            Some(WordNumber { value: 3_200, length: 3 })
        );
        assert_eq!(
            parse_word_number(&words("два миллиона пятьсот тысяч"), 0).map(|n| n.value),
            Some(2_500_000)
        );
    }

    #[test]
    fn test_connector_only_after_numeral() {
        assert_eq!(parse_word_number(&words("и пять"), 0), None);
        assert_eq!(
            parse_word_number(&words("сто и пять раз"), 0),
            Some(WordNumber { value: 105, length: 3 })
        );
    }

    #[test]
    fn test_offset_and_punctuation() {
        let w = words("пробежать Десять, км");
        assert_eq!(parse_word_number(&w, 0), None);
        assert_eq!(parse_word_number(&w, 1), Some(WordNumber { value: 10, length: 1 }));
        assert_eq!(parse_word_number(&w, 10), None);
    }

    #[test]
    fn test_zero() {
        assert_eq!(parse_word_number(&words("ноль"), 0), Some(WordNumber { value: 0, length: 1 }));
    }
}
