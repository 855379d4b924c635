use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use shared_logging::LogLevel;

use crate::{
    classifier::VoiceClassifier,
    error::VoiceError,
    model::{AmbientContext, CreationRequest, EntityKind, Transcript},
    store::{RecordId, RecordStore},
    telemetry::VoiceTelemetry,
};

/// Result of one handled voice command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOutcome {
    /// Id assigned by the record store.
    pub record_id: RecordId,
    /// Collection the request landed in.
    pub kind: EntityKind,
    /// Title shown back to the user.
    pub title: String,
    /// The persisted request.
    pub request: CreationRequest,
    /// Confirmation line, e.g. `Task created: water the garden`.
    pub message: String,
}

/// Validates, classifies and persists voice commands.
pub struct VoiceCommandRuntime {
    classifier: VoiceClassifier,
    store: Arc<dyn RecordStore>,
    telemetry: Option<VoiceTelemetry>,
}

impl VoiceCommandRuntime {
    /// Creates a runtime over a classifier and a store.
    #[must_use]
    pub fn new(classifier: VoiceClassifier, store: Arc<dyn RecordStore>) -> Self {
        Self {
            classifier,
            store,
            telemetry: None,
        }
    }

    /// Injects telemetry.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: VoiceTelemetry) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Classifier in use.
    #[must_use]
    pub const fn classifier(&self) -> &VoiceClassifier {
        &self.classifier
    }

    /// Classifies without persisting. Empty input is rejected.
    pub async fn preview(
        &self,
        raw: &str,
        context: &AmbientContext,
    ) -> Result<CreationRequest, VoiceError> {
        let transcript = self.validate(raw)?;
        let request = self.classifier.classify(&transcript, context).await;
        self.event(
            "voice.request.classified",
            json!({ "kind": request.kind(), "title": request.title(), "persisted": false }),
        )
        .await;
        Ok(request)
    }

    /// Classifies and stores one utterance.
    pub async fn handle(
        &self,
        raw: &str,
        context: &AmbientContext,
    ) -> Result<CommandOutcome, VoiceError> {
        let transcript = self.validate(raw)?;
        let request = self.classifier.classify(&transcript, context).await;
        let kind = request.kind();
        self.event(
            "voice.request.classified",
            json!({ "kind": kind, "title": request.title(), "persisted": true }),
        )
        .await;

        let payload = serde_json::to_value(&request)?;
        let record_id = match self.store.insert(kind, payload).await {
            Ok(id) => id,
            Err(err) => {
                self.log(
                    LogLevel::Error,
                    "voice.command.persist_failed",
                    json!({ "table": kind.table(), "error": err.to_string() }),
                );
                return Err(err.into());
            }
        };

        let title = request.title().to_string();
        let message = confirmation(kind, &title);
        self.log(
            LogLevel::Info,
            "voice.command.persisted",
            json!({ "record_id": record_id, "table": kind.table(), "user": context.user }),
        );
        self.event(
            "voice.request.persisted",
            json!({
                "record_id": record_id,
                "kind": kind,
                "table": kind.table(),
                "project_id": request.project_id(),
            }),
        )
        .await;
        Ok(CommandOutcome {
            record_id,
            kind,
            title,
            request,
            message,
        })
    }

    fn validate(&self, raw: &str) -> Result<Transcript, VoiceError> {
        Transcript::new(raw).inspect_err(|_| {
            self.log(LogLevel::Warn, "voice.command.rejected", json!({ "reason": "empty" }));
        })
    }

    fn log(&self, level: LogLevel, message: &str, metadata: serde_json::Value) {
        if let Some(tel) = &self.telemetry {
            let _ = tel.log(level, message, metadata);
        }
    }

    async fn event(&self, event_type: &str, payload: serde_json::Value) {
        if let Some(tel) = &self.telemetry {
            let _ = tel.event(event_type, payload).await;
        }
    }
}

fn confirmation(kind: EntityKind, title: &str) -> String {
    match kind {
        EntityKind::Task => format!("Task created: {title}"),
        EntityKind::InventoryItem => format!("Inventory item added: {title}"),
        EntityKind::Project => format!("Project created: {title}"),
        EntityKind::BusinessPlan => "Opening business plan assistant".to_string(),
    }
}
