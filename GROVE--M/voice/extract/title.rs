use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    cues::WEEKDAYS,
    helper::{clean_phrase, squash},
};

// Words that end a spoken title: trailing prepositions and date phrasing.
const STOP: &str = r"in|at|near|for|with|located|based|due|by|on|under|tomorrow|today|next|this";

// A quoted title is taken whole; stop words only end unquoted titles.
static QUOTED_NAMED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\b(?:called|named|titled)\s+["“](?P<title>[^"”]+)["”]"#)
        .expect("quoted named title regex")
});

static QUOTED_CREATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\b(?:add|create|make|set up)\s+(?:(?:a|an)\s+)?(?:new\s+)?(?:(?:task|todo|to-do|project|inventory item|item)\s+)?["“](?P<title>[^"”]+)["”]"#,
    )
    .expect("quoted create title regex")
});

static NAMED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r#"(?i)\b(?:called|named|titled)\s+["“']?(?P<title>[^"”',.!?]+?)["”']?(?:\s+(?:{STOP})\b|\s*[,.!?"”]|$)"#
    ))
    .expect("named title regex")
});

static CREATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r#"(?i)\b(?:add|create|make|set up)\s+(?:(?:a|an)\s+)?(?:new\s+)?(?:(?:task|todo|to-do|project|inventory item|item)\s+)?(?:(?:called|named|titled)\s+)?(?:to\s+)?["“']?(?P<title>[^"”',.!?]+?)["”']?(?:\s+(?:{STOP})\b|\s*[,.!?"”]|$)"#
    ))
    .expect("create title regex")
});

static REMINDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:remind me to|don['’]?t forget to|remember to)\s+(?P<title>[^,.!?]+)")
        .expect("reminder title regex")
});

static TRAILING_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\s+(?:today|tomorrow|tonight|next (?:week|month|{WEEKDAYS})|this (?:week|month|{WEEKDAYS})|(?:on|by|before|until) (?:(?:this|next) )?(?:{WEEKDAYS})|in (?:\d+|an?|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve) (?:days?|weeks?|months?)|asap|urgently|right away)\s*$"
    ))
    .expect("trailing date regex")
});

// Leads that follow "make"/"set up" without naming anything.
const NOT_A_TITLE: [&str; 4] = ["sure", "it", "that", "this"];

/// Picks the title: an explicitly named title, then a create-command object,
/// then a reminder body, then the whole utterance.
#[must_use]
pub fn title(text: &str) -> String {
    named(text)
        .or_else(|| created(text))
        .or_else(|| reminder(text))
        .unwrap_or_else(|| squash(text))
}

/// `called|named|titled "X"`.
#[must_use]
pub fn named(text: &str) -> Option<String> {
    capture(&QUOTED_NAMED, text).or_else(|| capture(&NAMED, text))
}

/// `add|create|make|set up (a|an)? (new)? (kind)? (called)? "X"`.
#[must_use]
pub fn created(text: &str) -> Option<String> {
    let title = capture(&QUOTED_CREATE, text).or_else(|| capture(&CREATE, text))?;
    let lead = title
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase();
    (!NOT_A_TITLE.contains(&lead.as_str())).then_some(title)
}

/// `remind me to X` with trailing date phrasing removed.
#[must_use]
pub fn reminder(text: &str) -> Option<String> {
    let mut body = capture(&REMINDER, text)?;
    loop {
        let trimmed = TRAILING_DATE.replace(&body, "").into_owned();
        if trimmed == body {
            break;
        }
        body = trimmed;
    }
    let body = clean_phrase(&body);
    (!body.is_empty()).then_some(body)
}

fn capture(pattern: &Regex, text: &str) -> Option<String> {
    let caps = pattern.captures(text)?;
    let title = squash(&clean_phrase(caps.name("title")?.as_str()));
    (!title.is_empty()).then_some(title)
}
