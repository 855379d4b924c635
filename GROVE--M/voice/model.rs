use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::VoiceError;

/// Currency stamped on voice-created inventory prices unless configured otherwise.
pub const DEFAULT_CURRENCY: &str = "USD";
/// Provenance label stamped on voice-created inventory prices.
pub const DEFAULT_PRICE_SOURCE: &str = "Voice Input";

/// Speech-to-text output that is known to contain something.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Transcript(String);

impl Transcript {
    /// Trims `raw` and rejects empty or whitespace-only input.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, VoiceError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(VoiceError::EmptyTranscript);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Trimmed transcript text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of the acting user, supplied by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Wraps an identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Minimal project handle returned by the project directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    /// Durable project identifier.
    pub id: String,
    /// Display title.
    pub title: String,
}

impl ProjectRef {
    /// Convenience constructor.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// What the caller knows before the utterance is interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbientContext {
    /// Project currently open in the UI, if any.
    pub project: Option<ProjectRef>,
    /// Acting user.
    pub user: UserId,
}

impl AmbientContext {
    /// Context with no open project.
    #[must_use]
    pub fn for_user(user: UserId) -> Self {
        Self {
            project: None,
            user,
        }
    }

    /// Context scoped to an open project.
    #[must_use]
    pub fn in_project(user: UserId, project: ProjectRef) -> Self {
        Self {
            project: Some(project),
            user,
        }
    }
}

/// Workflow state of a task.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started.
    #[default]
    Todo,
    /// Being worked on.
    InProgress,
    /// Finished.
    Done,
    /// Waiting on something else.
    Blocked,
}

/// Task urgency.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Whenever there is time.
    Low,
    /// Default.
    #[default]
    Medium,
    /// Important.
    High,
    /// Drop everything.
    Urgent,
}

/// How an inventory item relates to the project.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    /// Something that still has to be acquired.
    #[default]
    NeededSupply,
    /// Something already owned.
    OwnedResource,
    /// Something borrowed or rented.
    BorrowedOrRental,
}

impl ItemType {
    /// Label used in confirmations.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NeededSupply => "needed supply",
            Self::OwnedResource => "owned resource",
            Self::BorrowedOrRental => "borrowed or rental",
        }
    }
}

/// Land status of a project site.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PropertyStatus {
    /// Land already owned.
    OwnedLand,
    /// Land still being considered.
    #[default]
    PotentialProperty,
}

/// Request to create a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRequest {
    /// Short title, never empty.
    pub title: String,
    /// Optional longer description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Initial status.
    pub status: TaskStatus,
    /// Priority.
    pub priority: TaskPriority,
    /// Due date, if one was spoken.
    pub due_date: Option<NaiveDate>,
    /// Owning project.
    pub project_id: Option<String>,
    /// Creator.
    pub created_by: UserId,
    /// Assignees; always just the creator.
    pub assignees: Vec<UserId>,
}

/// Request to create an inventory item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRequest {
    /// Item title, never empty.
    pub title: String,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Needed, owned or borrowed.
    pub item_type: ItemType,
    /// Whether the item is earmarked for a fundraiser.
    pub fundraiser: bool,
    /// Free-form tags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Set only for [`ItemType::NeededSupply`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_needed: Option<f64>,
    /// Set only for [`ItemType::OwnedResource`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_owned: Option<f64>,
    /// Set only for [`ItemType::BorrowedOrRental`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_borrowed: Option<f64>,
    /// Spoken price.
    pub price: Option<f64>,
    /// `Some(true)` whenever a price was spoken.
    pub estimated_price: Option<bool>,
    /// ISO currency code.
    pub price_currency: String,
    /// Provenance of the price.
    pub price_source: String,
    /// Owning project.
    pub project_id: Option<String>,
    /// Creator.
    pub added_by: UserId,
    /// Assignees; always just the creator.
    pub assignees: Vec<UserId>,
}

impl InventoryRequest {
    /// Whichever quantity field the item type selected.
    #[must_use]
    pub fn quantity(&self) -> Option<f64> {
        self.quantity_needed
            .or(self.quantity_owned)
            .or(self.quantity_borrowed)
    }
}

/// Request to create a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRequest {
    /// Project title, never empty.
    pub title: String,
    /// Where the site is.
    pub location: Option<String>,
    /// Land status.
    pub property_status: PropertyStatus,
    /// Values, mission or goals statement.
    pub values_mission_goals: Option<String>,
    /// Creator.
    pub created_by: UserId,
}

/// Request to open business-plan assistance for a known project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessPlanRequest {
    /// Project the plan belongs to.
    pub project_id: String,
    /// The utterance, passed through as the assistant query.
    pub query: String,
}

/// Typed outcome of interpreting one utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CreationRequest {
    /// Create a task.
    Task(TaskRequest),
    /// Create an inventory item.
    Inventory(InventoryRequest),
    /// Create a project.
    Project(ProjectRequest),
    /// Start business-plan assistance.
    BusinessPlan(BusinessPlanRequest),
}

impl CreationRequest {
    /// Destination collection for persistence.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Task(_) => EntityKind::Task,
            Self::Inventory(_) => EntityKind::InventoryItem,
            Self::Project(_) => EntityKind::Project,
            Self::BusinessPlan(_) => EntityKind::BusinessPlan,
        }
    }

    /// Human-facing title (the query for business-plan requests).
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Task(task) => &task.title,
            Self::Inventory(item) => &item.title,
            Self::Project(project) => &project.title,
            Self::BusinessPlan(plan) => &plan.query,
        }
    }

    /// Project the request is bound to, if any.
    #[must_use]
    pub fn project_id(&self) -> Option<&str> {
        match self {
            Self::Task(task) => task.project_id.as_deref(),
            Self::Inventory(item) => item.project_id.as_deref(),
            Self::Project(_) => None,
            Self::BusinessPlan(plan) => Some(&plan.project_id),
        }
    }
}

/// Persistence collection a request lands in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// `tasks`.
    Task,
    /// `inventory_items`.
    InventoryItem,
    /// `projects`.
    Project,
    /// `business_plan_requests`.
    BusinessPlan,
}

impl EntityKind {
    /// Table/collection name.
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Task => "tasks",
            Self::InventoryItem => "inventory_items",
            Self::Project => "projects",
            Self::BusinessPlan => "business_plan_requests",
        }
    }

    /// Label used in confirmations and logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::InventoryItem => "inventory item",
            Self::Project => "project",
            Self::BusinessPlan => "business plan request",
        }
    }
}
