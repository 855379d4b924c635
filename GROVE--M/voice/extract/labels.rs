use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    cues::URGENCY,
    model::{ItemType, PropertyStatus, TaskPriority, TaskStatus},
};

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("label regex")
}

static PRIORITY_RULES: Lazy<Vec<(Regex, TaskPriority)>> = Lazy::new(|| {
    vec![
        (compile(URGENCY), TaskPriority::Urgent),
        (
            compile(r"\b(?:important|high priority|high-priority|top priority|soon)\b"),
            TaskPriority::High,
        ),
        (
            compile(r"\b(?:low priority|low-priority|whenever|someday|eventually|no rush)\b"),
            TaskPriority::Low,
        ),
    ]
});

static STATUS_RULES: Lazy<Vec<(Regex, TaskStatus)>> = Lazy::new(|| {
    vec![
        (
            compile(r"\b(?:in progress|in-progress|working on|started|ongoing|underway)\b"),
            TaskStatus::InProgress,
        ),
        (
            compile(r"\b(?:done|completed|finished|already did)\b"),
            TaskStatus::Done,
        ),
        (
            compile(r"\b(?:blocked|stuck|waiting on|waiting for|on hold)\b"),
            TaskStatus::Blocked,
        ),
    ]
});

static ITEM_TYPE_RULES: Lazy<Vec<(Regex, ItemType)>> = Lazy::new(|| {
    vec![
        (
            compile(r"\b(?:i|we) (?:already )?(?:own|have)\b|\bowned\b|\bin stock\b"),
            ItemType::OwnedResource,
        ),
        (
            compile(
                r"\b(?:borrow|borrowed|borrowing|rent|rented|renting|rental|lease|leased|leasing|loaner|on loan)\b",
            ),
            ItemType::BorrowedOrRental,
        ),
    ]
});

static OWNED_LAND: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"\b(?:owned land|owned property|own the (?:land|property)|own this (?:land|property)|our (?:own )?(?:land|property)|land (?:that )?we own|we own (?:the|this) (?:land|property))\b",
    )
});

static FUNDRAISER: Lazy<Regex> =
    Lazy::new(|| compile(r"\b(?:fundrais(?:er|ers|ing)|for donation|donated)\b"));

fn first_label<T: Copy>(rules: &[(Regex, T)], normalized: &str) -> Option<T> {
    rules
        .iter()
        .find(|(pattern, _)| pattern.is_match(normalized))
        .map(|(_, label)| *label)
}

/// urgent, then high, then low, defaulting to medium.
#[must_use]
pub fn priority(normalized: &str) -> TaskPriority {
    first_label(&PRIORITY_RULES, normalized).unwrap_or_default()
}

/// in progress, then done, then blocked, defaulting to todo.
#[must_use]
pub fn status(normalized: &str) -> TaskStatus {
    first_label(&STATUS_RULES, normalized).unwrap_or_default()
}

/// owned, then borrowed/rented, defaulting to a needed supply.
#[must_use]
pub fn item_type(normalized: &str) -> ItemType {
    first_label(&ITEM_TYPE_RULES, normalized).unwrap_or_default()
}

/// owned land when ownership of the land is spoken, else potential property.
#[must_use]
pub fn property_status(normalized: &str) -> PropertyStatus {
    if OWNED_LAND.is_match(normalized) {
        PropertyStatus::OwnedLand
    } else {
        PropertyStatus::PotentialProperty
    }
}

/// Whether the item is for a fundraiser.
#[must_use]
pub fn fundraiser(normalized: &str) -> bool {
    FUNDRAISER.is_match(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_checks_urgency_first() {
        assert_eq!(priority("fix the pump asap"), TaskPriority::Urgent);
        assert_eq!(priority("important: call the vet"), TaskPriority::High);
        assert_eq!(priority("prune the hedge whenever"), TaskPriority::Low);
        assert_eq!(priority("prune the hedge"), TaskPriority::Medium);
        assert_eq!(priority("urgent but low priority"), TaskPriority::Urgent);
    }

    #[test]
    fn status_labels() {
        assert_eq!(status("i started the mulching"), TaskStatus::InProgress);
        assert_eq!(status("the swale is done"), TaskStatus::Done);
        assert_eq!(status("stuck waiting on the permit"), TaskStatus::Blocked);
        assert_eq!(status("dig the pond"), TaskStatus::Todo);
    }

    #[test]
    fn item_type_prefers_ownership() {
        assert_eq!(item_type("we have 3 shovels"), ItemType::OwnedResource);
        assert_eq!(item_type("renting a chipper"), ItemType::BorrowedOrRental);
        assert_eq!(item_type("buy a chipper"), ItemType::NeededSupply);
    }

    #[test]
    fn land_status_and_fundraiser() {
        assert_eq!(
            property_status("create a project in oregon, owned land"),
            PropertyStatus::OwnedLand
        );
        assert_eq!(
            property_status("a parcel we might buy"),
            PropertyStatus::PotentialProperty
        );
        assert!(fundraiser("jam jars for the fundraiser"));
        assert!(!fundraiser("jam jars"));
    }
}
