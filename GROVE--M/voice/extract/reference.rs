use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::helper::{clean_phrase, squash};

static PREPOSITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:related to|associated with|for|in|to|with|under)\s+")
        .expect("preposition regex")
});

// A mention ends at punctuation or at the next preposition/date word.
static MENTION_END: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)[,.!?;]|\b(?:today|tomorrow|next|this|by|due|on|at|in|for|to|with|under|that|because|so)\b",
    )
    .expect("mention end regex")
});

static MARKER_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:the\s+)?(?:(?P<marker>project|initiative)\s+(?:called\s+|named\s+)?)?")
        .expect("marker prefix regex")
});

static MARKER_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+(?:project|initiative)$").expect("marker suffix regex"));

/// A phrase that might name an existing project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMention {
    /// Candidate project name, markers and articles removed.
    pub name: String,
    /// Whether "project"/"initiative" was spoken next to the name.
    pub explicit: bool,
}

/// Every `(for|in|to|with|under|related to|associated with) (the)? (project)? X`
/// phrase in speaking order.
#[must_use]
pub fn mentions(text: &str) -> Vec<ProjectMention> {
    PREPOSITION
        .find_iter(text)
        .filter_map(|prep| mention_at(&text[prep.end()..]))
        .collect()
}

/// The mention worth one directory lookup: the first explicit one, else the first.
#[must_use]
pub fn best_mention(text: &str) -> Option<ProjectMention> {
    let all = mentions(text);
    let explicit = all.iter().position(|mention| mention.explicit);
    all.into_iter().nth(explicit.unwrap_or(0))
}

fn mention_at(tail: &str) -> Option<ProjectMention> {
    let prefix = MARKER_PREFIX.captures(tail)?;
    let mut explicit = prefix.name("marker").is_some();
    let rest = &tail[prefix.get(0).map_or(0, |m| m.end())..];
    let end = MENTION_END.find(rest).map_or(rest.len(), |m| m.start());
    if end == 0 {
        return None;
    }
    let mut name = squash(&clean_phrase(&rest[..end]));
    if let Some(suffix) = MARKER_SUFFIX.find(&name) {
        name.truncate(suffix.start());
        explicit = true;
    }
    let starts_with_letter = name.chars().next().is_some_and(char::is_alphabetic);
    starts_with_letter.then_some(ProjectMention { name, explicit })
}
