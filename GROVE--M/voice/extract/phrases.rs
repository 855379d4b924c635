use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::helper::{clean_phrase, squash};

static LOCATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:located in|based in|in|at|near)\s+(?P<v>[a-z][^,.!?;]*)")
        .expect("location regex")
});

static TAGS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:tags?|tagged(?:\s+as)?|categories|category|labell?ed as)\s+(?:with\s+)?(?P<v>[^.!?;]+)",
    )
    .expect("tags regex")
});

static TAG_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i),|\s+and\s+").expect("tag split regex"));

static DESCRIPTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:described as|description is|details are)\s*:?\s+(?P<v>[^,.!?;]+)")
        .expect("description regex")
});

static MISSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:mission is|goals? (?:is|are)|values are|vision is)\s*:?\s+(?P<v>[^.!?;]+)",
    )
    .expect("mission regex")
});

fn first_phrase(pattern: &Regex, text: &str) -> Option<String> {
    let phrase = squash(&clean_phrase(pattern.captures(text)?.name("v")?.as_str()));
    (!phrase.is_empty()).then_some(phrase)
}

/// `in|at|located in|based in|near <words>` up to punctuation.
#[must_use]
pub fn location(text: &str) -> Option<String> {
    first_phrase(&LOCATION, text)
}

/// `tags|categories|labeled as (with)? a, b and c`, de-duplicated
/// case-insensitively with the first spelling kept.
#[must_use]
pub fn tags(text: &str) -> Option<Vec<String>> {
    let raw = TAGS.captures(text)?.name("v")?.as_str();
    let mut unique: IndexMap<String, String> = IndexMap::new();
    for token in TAG_SPLIT.split(raw) {
        let tag = squash(&clean_phrase(token));
        if !tag.is_empty() {
            unique.entry(tag.to_lowercase()).or_insert(tag);
        }
    }
    (!unique.is_empty()).then(|| unique.into_values().collect())
}

/// `described as|description is|details are <words>` up to punctuation.
#[must_use]
pub fn description(text: &str) -> Option<String> {
    first_phrase(&DESCRIPTION, text)
}

/// `mission is|goals are|values are|vision is <words>` up to the sentence end.
#[must_use]
pub fn mission(text: &str) -> Option<String> {
    first_phrase(&MISSION, text)
}
