use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Collapses runs of whitespace to single spaces and trims, keeping case.
#[must_use]
pub fn squash(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// Lowercases and squashes whitespace; the form detectors match against.
#[must_use]
pub fn normalize(text: &str) -> String {
    squash(&text.to_lowercase())
}

/// Trims whitespace, wrapping quotes and trailing punctuation from a capture.
#[must_use]
pub fn clean_phrase(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '“' | '”' | '‘' | '’'))
        .trim_end_matches(|c: char| matches!(c, '.' | ',' | '!' | '?' | ';' | ':'))
        .trim()
        .to_string()
}

/// Parses a spoken count: digits, "a"/"an", or a number word up to twelve.
#[must_use]
pub fn parse_count(token: &str) -> Option<i64> {
    let token = token.trim().to_lowercase();
    if let Ok(value) = token.parse::<i64>() {
        return Some(value);
    }
    let value = match token.as_str() {
        "a" | "an" | "one" => 1,
        "two" | "couple" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        _ => return None,
    };
    Some(value)
}

/// Parses a spoken amount such as `1,200.50`.
#[must_use]
pub fn parse_amount(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse::<f64>().ok()
}
