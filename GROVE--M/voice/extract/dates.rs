use chrono::{Datelike, Duration, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{cues::WEEKDAYS, helper::parse_count};

static RELATIVE_DAYS: Lazy<Vec<(Regex, i64)>> = Lazy::new(|| {
    [
        (r"\btoday\b", 0),
        (r"\btomorrow\b", 1),
        (r"\bnext week\b", 7),
        (r"\bnext month\b", 30),
    ]
    .into_iter()
    .map(|(pattern, days)| (Regex::new(pattern).expect("relative day regex"), days))
    .collect()
});

static SPAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\bin\s+(?P<count>\d+|an?|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve)\s+(?P<unit>days?|weeks?|months?)\b",
    )
    .expect("span regex")
});

static NAMED_WEEKDAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b(?P<lead>next|this|on|by|before|until)\s+(?P<day>{WEEKDAYS})\b"
    ))
    .expect("weekday regex")
});

/// Resolves the first matching date rule against `today`: relative day
/// words, then `in N units`, then a named weekday.
#[must_use]
pub fn due_date(normalized: &str, today: NaiveDate) -> Option<NaiveDate> {
    let offset = relative_day(normalized)
        .or_else(|| span(normalized))
        .or_else(|| weekday_offset(normalized, today.weekday()))?;
    today.checked_add_signed(Duration::try_days(offset)?)
}

/// today=0, tomorrow=1, next week=7, next month=30.
#[must_use]
pub fn relative_day(normalized: &str) -> Option<i64> {
    RELATIVE_DAYS
        .iter()
        .find(|(pattern, _)| pattern.is_match(normalized))
        .map(|(_, days)| *days)
}

/// `in N days|weeks|months` with weeks as 7 days and months as 30.
#[must_use]
pub fn span(normalized: &str) -> Option<i64> {
    let caps = SPAN.captures(normalized)?;
    let count = parse_count(&caps["count"])?;
    let scale = match &caps["unit"] {
        unit if unit.starts_with("week") => 7,
        unit if unit.starts_with("month") => 30,
        _ => 1,
    };
    count.checked_mul(scale)
}

/// Days until the spoken weekday. The next occurrence is strictly after
/// today; "this <weekday>" said on that weekday means today.
#[must_use]
pub fn weekday_offset(normalized: &str, today: Weekday) -> Option<i64> {
    let caps = NAMED_WEEKDAY.captures(normalized)?;
    let target = caps["day"].parse::<Weekday>().ok()?;
    let ahead = (i64::from(target.num_days_from_monday()) + 7
        - i64::from(today.num_days_from_monday()))
        % 7;
    let ahead = if ahead == 0 { 7 } else { ahead };
    Some(if &caps["lead"] == "this" && ahead == 7 {
        0
    } else {
        ahead
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-01-01 was a Monday.
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn days_from(text: &str, today: NaiveDate) -> Option<i64> {
        due_date(text, today).map(|date| (date - today).num_days())
    }

    #[test]
    fn relative_words() {
        assert_eq!(days_from("do it today", monday()), Some(0));
        assert_eq!(days_from("water the garden tomorrow", monday()), Some(1));
        assert_eq!(days_from("sometime next week", monday()), Some(7));
        assert_eq!(days_from("next month", monday()), Some(30));
    }

    #[test]
    fn numeric_spans() {
        assert_eq!(days_from("in 3 days", monday()), Some(3));
        assert_eq!(days_from("in two weeks", monday()), Some(14));
        assert_eq!(days_from("in a month", monday()), Some(30));
    }

    #[test]
    fn next_weekday_on_same_day_is_a_week_out() {
        assert_eq!(days_from("next monday", monday()), Some(7));
        assert_eq!(days_from("this monday", monday()), Some(0));
        assert_eq!(days_from("next friday", monday()), Some(4));
        assert_eq!(days_from("this sunday", monday()), Some(6));
        assert_eq!(days_from("fix it by wednesday", monday()), Some(2));
    }

    #[test]
    fn weekday_wraps_across_the_week() {
        let friday = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(days_from("next tuesday", friday), Some(4));
        assert_eq!(days_from("this friday", friday), Some(0));
    }

    #[test]
    fn first_rule_wins_without_accumulating() {
        assert_eq!(days_from("tomorrow or in 5 days", monday()), Some(1));
        assert_eq!(days_from("in 5 days, not next friday", monday()), Some(5));
        assert_eq!(days_from("no date here", monday()), None);
    }

    #[test]
    fn out_of_range_span_has_no_due_date() {
        assert_eq!(due_date("plant garlic in 200000000000000 days", monday()), None);
        assert_eq!(due_date("in 9223372036854775807 days", monday()), None);
        assert_eq!(due_date("in 40000000 months", monday()), None);
    }
}
