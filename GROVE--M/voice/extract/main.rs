//! Field extractors. Each one is an independent pure function returning an
//! optional value; [`ExtractedFields::extract`] composes them.

/// Numeric amounts: quantity and price.
pub mod amounts;
/// Relative due-date resolution.
pub mod dates;
/// Enumerated labels: priority, status, item type, property status.
pub mod labels;
/// Free-text phrases: location, tags, description, mission.
pub mod phrases;
/// Project-name mentions for directory lookup.
pub mod reference;
/// Title selection.
pub mod title;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{ItemType, PropertyStatus, TaskPriority, TaskStatus};

/// Quantity attached to inventory items when none was spoken.
pub const DEFAULT_QUANTITY: f64 = 1.0;

/// Every field pulled from one utterance, before a variant is chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFields {
    /// Non-empty title.
    pub title: String,
    /// Priority label.
    pub priority: TaskPriority,
    /// Status label.
    pub status: TaskStatus,
    /// Resolved due date.
    pub due_date: Option<NaiveDate>,
    /// Spoken quantity, or [`DEFAULT_QUANTITY`].
    pub quantity: f64,
    /// Spoken price.
    pub price: Option<f64>,
    /// Inventory relationship.
    pub item_type: ItemType,
    /// Land status.
    pub property_status: PropertyStatus,
    /// Location phrase.
    pub location: Option<String>,
    /// Tag list.
    pub tags: Option<Vec<String>>,
    /// Description phrase.
    pub description: Option<String>,
    /// Values/mission/goals phrase.
    pub mission: Option<String>,
    /// Fundraiser marker.
    pub fundraiser: bool,
}

impl ExtractedFields {
    /// Runs every extractor. `text` keeps the speaker's casing, `normalized`
    /// is its lower-cased form.
    #[must_use]
    pub fn extract(text: &str, normalized: &str, today: NaiveDate) -> Self {
        Self {
            title: title::title(text),
            priority: labels::priority(normalized),
            status: labels::status(normalized),
            due_date: dates::due_date(normalized, today),
            quantity: amounts::quantity(normalized).unwrap_or(DEFAULT_QUANTITY),
            price: amounts::price(normalized),
            item_type: labels::item_type(normalized),
            property_status: labels::property_status(normalized),
            location: phrases::location(text),
            tags: phrases::tags(text),
            description: phrases::description(text),
            mission: phrases::mission(text),
            fundraiser: labels::fundraiser(normalized),
        }
    }
}
