#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rust_2018_idioms,
    missing_docs
)]

//! Voice command interpretation for Grove: turns one spoken utterance into a
//! typed task, inventory, project or business-plan request.

/// Domain types: transcripts, context and creation requests.
#[path = "../model.rs"]
pub mod model;

/// Typed failures for the runtime and its collaborators.
#[path = "../error.rs"]
pub mod error;

/// Injected notion of "today".
#[path = "../clock.rs"]
pub mod clock;

/// Text normalization and number parsing.
#[path = "../helper.rs"]
pub mod helper;

/// Intent detectors.
#[path = "../cues.rs"]
pub mod cues;

/// Field extractors.
#[path = "../extract/main.rs"]
pub mod extract;

/// Rule-table arbitration and request construction.
#[path = "../arbitration.rs"]
pub mod arbitration;

/// Project lookup collaborator.
#[path = "../directory.rs"]
pub mod directory;

/// Record persistence collaborator.
#[path = "../store.rs"]
pub mod store;

/// Telemetry builder/hook for voice components.
#[path = "../telemetry.rs"]
pub mod telemetry;

/// TOML configuration.
#[path = "../config.rs"]
pub mod config;

/// The classifier entry point.
#[path = "../classifier.rs"]
pub mod classifier;

/// Command runtime: validate, classify, persist, announce.
#[path = "../main.rs"]
pub mod runtime;

pub use arbitration::{ClassifierSettings, Intent, Scope};
pub use classifier::{interpret, VoiceClassifier, VoiceClassifierBuilder};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::VoiceConfig;
pub use directory::{InMemoryProjectDirectory, ProjectDirectory};
pub use error::{DirectoryError, StoreError, VoiceError};
pub use model::{
    AmbientContext, BusinessPlanRequest, CreationRequest, EntityKind, InventoryRequest, ItemType,
    ProjectRef, ProjectRequest, PropertyStatus, TaskPriority, TaskRequest, TaskStatus, Transcript,
    UserId,
};
pub use runtime::{CommandOutcome, VoiceCommandRuntime};
pub use store::{JsonlRecordStore, MemoryRecordStore, RecordId, RecordStore, StoredRecord};
pub use telemetry::{VoiceTelemetry, VoiceTelemetryBuilder};
