//! Utterance interpreter: detect, resolve scope, extract, arbitrate.

use std::{fmt, sync::Arc};

use chrono::NaiveDate;
use serde_json::json;
use shared_logging::LogLevel;

use crate::{
    arbitration::{arbitrate, ClassifierSettings, Draft, RuleInput, Scope},
    clock::{Clock, SystemClock},
    cues::detect,
    directory::ProjectDirectory,
    extract::{reference::best_mention, ExtractedFields},
    helper::normalize,
    model::{AmbientContext, CreationRequest, Transcript, UserId},
    telemetry::VoiceTelemetry,
};

/// Interprets one utterance at a time into a [`CreationRequest`].
///
/// Holds no per-call state; clones share their collaborators.
#[derive(Clone)]
pub struct VoiceClassifier {
    directory: Option<Arc<dyn ProjectDirectory>>,
    clock: Arc<dyn Clock>,
    settings: ClassifierSettings,
    telemetry: Option<VoiceTelemetry>,
}

impl fmt::Debug for VoiceClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoiceClassifier")
            .field("directory", &self.directory.is_some())
            .field("settings", &self.settings)
            .field("telemetry", &self.telemetry)
            .finish_non_exhaustive()
    }
}

impl Default for VoiceClassifier {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`VoiceClassifier`].
#[derive(Default)]
pub struct VoiceClassifierBuilder {
    directory: Option<Arc<dyn ProjectDirectory>>,
    clock: Option<Arc<dyn Clock>>,
    settings: ClassifierSettings,
    telemetry: Option<VoiceTelemetry>,
}

impl VoiceClassifierBuilder {
    /// Project lookup used to bind spoken project names.
    #[must_use]
    pub fn directory(mut self, directory: Arc<dyn ProjectDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Source of "today". Defaults to the system clock.
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Currency and price-source constants.
    #[must_use]
    pub fn settings(mut self, settings: ClassifierSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Telemetry handle.
    #[must_use]
    pub fn telemetry(mut self, telemetry: VoiceTelemetry) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Finishes the classifier.
    #[must_use]
    pub fn build(self) -> VoiceClassifier {
        VoiceClassifier {
            directory: self.directory,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            settings: self.settings,
            telemetry: self.telemetry,
        }
    }
}

impl VoiceClassifier {
    /// Returns a builder.
    #[must_use]
    pub fn builder() -> VoiceClassifierBuilder {
        VoiceClassifierBuilder::default()
    }

    /// Stamped constants in use.
    #[must_use]
    pub const fn settings(&self) -> &ClassifierSettings {
        &self.settings
    }

    /// Classifies `transcript` under `context`. Never fails: lookup problems
    /// degrade to an unbound scope.
    pub async fn classify(
        &self,
        transcript: &Transcript,
        context: &AmbientContext,
    ) -> CreationRequest {
        let scope = self.resolve_scope(transcript, context).await;
        let request = interpret(
            transcript,
            &scope,
            self.clock.today(),
            &context.user,
            &self.settings,
        );
        self.log(
            LogLevel::Info,
            "voice.classify.completed",
            json!({
                "kind": request.kind(),
                "title": request.title(),
                "project_id": request.project_id(),
                "scope": scope,
            }),
        );
        request
    }

    /// Ambient project first; otherwise one lookup of the best spoken mention.
    pub async fn resolve_scope(&self, transcript: &Transcript, context: &AmbientContext) -> Scope {
        if let Some(project) = &context.project {
            return Scope::Ambient(project.clone());
        }
        let (Some(directory), Some(mention)) = (&self.directory, best_mention(transcript.as_str()))
        else {
            return Scope::Unbound;
        };
        match directory.find_by_name(&mention.name).await {
            Ok(Some(project)) => {
                tracing::debug!(name = %mention.name, id = %project.id, "project mention resolved");
                Scope::Resolved(project)
            }
            Ok(None) => Scope::Unbound,
            Err(err) => {
                tracing::warn!(name = %mention.name, error = %err, "project lookup failed");
                self.log(
                    LogLevel::Warn,
                    "voice.project.lookup_failed",
                    json!({ "name": mention.name, "error": err.to_string() }),
                );
                Scope::Unbound
            }
        }
    }

    fn log(&self, level: LogLevel, message: &str, metadata: serde_json::Value) {
        if let Some(tel) = &self.telemetry {
            let _ = tel.log(level, message, metadata);
        }
    }
}

/// Pure interpretation once the scope is known: detectors, extractors, then
/// the first matching arbitration rule.
#[must_use]
pub fn interpret(
    transcript: &Transcript,
    scope: &Scope,
    today: NaiveDate,
    user: &UserId,
    settings: &ClassifierSettings,
) -> CreationRequest {
    let text = transcript.as_str();
    let normalized = normalize(text);
    let hits = detect(&normalized, scope.is_ambient());
    tracing::debug!(?hits, "detector hits");
    let fields = ExtractedFields::extract(text, &normalized, today);
    let rule = arbitrate(&RuleInput::new(hits, scope));
    (rule.build)(&Draft {
        transcript,
        fields: &fields,
        scope,
        user,
        settings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clock::FixedClock,
        directory::InMemoryProjectDirectory,
        error::DirectoryError,
        model::{ItemType, PropertyStatus, ProjectRef, TaskPriority, TaskStatus},
    };
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use shared_logging::MemoryLogSink;

    fn today() -> NaiveDate {
        // A Wednesday.
        NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
    }

    fn classifier() -> VoiceClassifier {
        VoiceClassifier::builder()
            .clock(Arc::new(FixedClock(today())))
            .build()
    }

    fn alice() -> AmbientContext {
        AmbientContext::for_user(UserId::new("alice"))
    }

    fn say(text: &str) -> Transcript {
        Transcript::new(text).unwrap()
    }

    #[tokio::test]
    async fn reminder_becomes_task_due_tomorrow() {
        let request = classifier()
            .classify(&say("Remind me to water the garden tomorrow"), &alice())
            .await;
        let CreationRequest::Task(task) = &request else {
            panic!("expected task, got {request:?}");
        };
        assert_eq!(task.title, "water the garden");
        assert_eq!(task.due_date, today().succ_opt());
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert_eq!(task.project_id, None);
        assert_eq!(task.assignees, vec![UserId::new("alice")]);
    }

    #[tokio::test]
    async fn supply_need_becomes_inventory() {
        let request = classifier()
            .classify(&say("I need 5 bags of compost for $40"), &alice())
            .await;
        let CreationRequest::Inventory(item) = &request else {
            panic!("expected inventory, got {request:?}");
        };
        assert_eq!(item.item_type, ItemType::NeededSupply);
        assert_eq!(item.quantity_needed, Some(5.0));
        assert_eq!(item.quantity_owned, None);
        assert_eq!(item.price, Some(40.0));
        assert_eq!(item.price_currency, "USD");
        assert_eq!(item.price_source, "Voice Input");
        assert_eq!(item.estimated_price, Some(true));
    }

    #[tokio::test]
    async fn grouped_quantity_is_needed_in_full() {
        let request = classifier()
            .classify(&say("I need 1,000 bags of compost"), &alice())
            .await;
        let CreationRequest::Inventory(item) = &request else {
            panic!("expected inventory, got {request:?}");
        };
        assert_eq!(item.quantity_needed, Some(1000.0));
    }

    #[tokio::test]
    async fn owned_stock_fills_only_quantity_owned() {
        let request = classifier()
            .classify(&say("We already own 4 bales of straw"), &alice())
            .await;
        let CreationRequest::Inventory(item) = &request else {
            panic!("expected inventory, got {request:?}");
        };
        assert_eq!(item.item_type, ItemType::OwnedResource);
        assert_eq!(item.quantity_owned, Some(4.0));
        assert_eq!(item.quantity_needed, None);
        assert_eq!(item.quantity_borrowed, None);
    }

    #[tokio::test]
    async fn rented_stock_fills_only_quantity_borrowed() {
        let request = classifier()
            .classify(&say("We are renting 2 pallets of pavers"), &alice())
            .await;
        let CreationRequest::Inventory(item) = &request else {
            panic!("expected inventory, got {request:?}");
        };
        assert_eq!(item.item_type, ItemType::BorrowedOrRental);
        assert_eq!(item.quantity_borrowed, Some(2.0));
        assert_eq!(item.quantity_needed, None);
        assert_eq!(item.quantity_owned, None);
    }

    #[tokio::test]
    async fn need_to_buy_is_a_chore() {
        let request = classifier()
            .classify(&say("I need to buy 10 bags of mulch"), &alice())
            .await;
        assert!(
            matches!(request, CreationRequest::Task(_)),
            "expected task, got {request:?}"
        );
    }

    #[tokio::test]
    async fn quoted_titles_survive_classification() {
        let request = classifier()
            .classify(&say("Add a task called \"Plant in spring\""), &alice())
            .await;
        let CreationRequest::Task(task) = &request else {
            panic!("expected task, got {request:?}");
        };
        assert_eq!(task.title, "Plant in spring");

        let request = classifier()
            .classify(&say("Create a project called \"Meet with the county\""), &alice())
            .await;
        let CreationRequest::Project(project) = &request else {
            panic!("expected project, got {request:?}");
        };
        assert_eq!(project.title, "Meet with the county");
    }

    #[tokio::test]
    async fn unreachable_due_date_is_dropped() {
        let request = classifier()
            .classify(&say("Remind me to plant garlic in 200000000000000 days"), &alice())
            .await;
        let CreationRequest::Task(task) = &request else {
            panic!("expected task, got {request:?}");
        };
        assert_eq!(task.title, "plant garlic");
        assert_eq!(task.due_date, None);
    }

    #[tokio::test]
    async fn project_creation() {
        let request = classifier()
            .classify(
                &say("Create a new project called Willow Creek Farm in Oregon, owned land"),
                &alice(),
            )
            .await;
        let CreationRequest::Project(project) = &request else {
            panic!("expected project, got {request:?}");
        };
        assert_eq!(project.title, "Willow Creek Farm");
        assert_eq!(project.location.as_deref(), Some("Oregon"));
        assert_eq!(project.property_status, PropertyStatus::OwnedLand);
    }

    #[tokio::test]
    async fn business_plan_with_ambient_project() {
        let context =
            AmbientContext::in_project(UserId::new("alice"), ProjectRef::new("p1", "Willow Creek"));
        let text = "Help with executive summary and financial plan";
        let request = classifier().classify(&say(text), &context).await;
        let CreationRequest::BusinessPlan(plan) = &request else {
            panic!("expected business plan, got {request:?}");
        };
        assert_eq!(plan.project_id, "p1");
        assert_eq!(plan.query, text);
    }

    #[tokio::test]
    async fn business_plan_without_project_falls_back_to_task() {
        let request = classifier()
            .classify(&say("Help with executive summary"), &alice())
            .await;
        let CreationRequest::Task(task) = &request else {
            panic!("expected task, got {request:?}");
        };
        assert_eq!(task.title, "Help with executive summary");
        assert_eq!(task.project_id, None);
    }

    #[tokio::test]
    async fn spoken_project_name_binds_scope() {
        let directory = InMemoryProjectDirectory::new(vec![ProjectRef::new("p7", "Hillside Terraces")]);
        let classifier = VoiceClassifier::builder()
            .clock(Arc::new(FixedClock(today())))
            .directory(Arc::new(directory))
            .build();

        let request = classifier
            .classify(&say("Remind me to prune the apples for the Hillside project"), &alice())
            .await;
        assert_eq!(request.project_id(), Some("p7"));

        let request = classifier
            .classify(&say("Help with the executive summary for the Hillside project"), &alice())
            .await;
        assert!(matches!(request, CreationRequest::BusinessPlan(ref plan) if plan.project_id == "p7"));
    }

    struct CountingDirectory {
        calls: Mutex<Vec<String>>,
        result: Result<Option<ProjectRef>, DirectoryError>,
    }

    #[async_trait]
    impl ProjectDirectory for CountingDirectory {
        async fn find_by_name(&self, name: &str) -> Result<Option<ProjectRef>, DirectoryError> {
            self.calls.lock().push(name.to_string());
            self.result.clone()
        }
    }

    #[tokio::test]
    async fn lookup_failure_degrades_to_unbound_and_is_logged() {
        let directory = Arc::new(CountingDirectory {
            calls: Mutex::new(Vec::new()),
            result: Err(DirectoryError::Unavailable("timeout".into())),
        });
        let sink = MemoryLogSink::new();
        let telemetry = VoiceTelemetry::builder("voice")
            .sink(Arc::new(sink.clone()))
            .build()
            .unwrap();
        let classifier = VoiceClassifier::builder()
            .clock(Arc::new(FixedClock(today())))
            .directory(directory.clone())
            .telemetry(telemetry)
            .build();

        let request = classifier
            .classify(
                &say("Remind me to draft the executive summary for the Willow Creek project"),
                &alice(),
            )
            .await;
        assert!(matches!(request, CreationRequest::Task(_)));
        assert_eq!(request.project_id(), None);
        assert_eq!(directory.calls.lock().as_slice(), ["Willow Creek"]);
        assert!(sink
            .messages()
            .contains(&"voice.project.lookup_failed".to_string()));
    }

    #[tokio::test]
    async fn ambient_project_skips_lookup() {
        let directory = Arc::new(CountingDirectory {
            calls: Mutex::new(Vec::new()),
            result: Ok(None),
        });
        let classifier = VoiceClassifier::builder()
            .clock(Arc::new(FixedClock(today())))
            .directory(directory.clone())
            .build();
        let context =
            AmbientContext::in_project(UserId::new("alice"), ProjectRef::new("p1", "Willow Creek"));
        let request = classifier
            .classify(&say("I need 3 shovels for the North Orchard project"), &context)
            .await;
        assert!(directory.calls.lock().is_empty());
        assert_eq!(request.project_id(), Some("p1"));
    }

    #[tokio::test]
    async fn classification_is_idempotent() {
        let directory = Arc::new(CountingDirectory {
            calls: Mutex::new(Vec::new()),
            result: Ok(Some(ProjectRef::new("p2", "North Orchard"))),
        });
        let classifier = VoiceClassifier::builder()
            .clock(Arc::new(FixedClock(today())))
            .directory(directory)
            .build();
        let transcript = say("Urgent: fix the irrigation for the North Orchard project by Friday");
        let first = classifier.classify(&transcript, &alice()).await;
        let second = classifier.classify(&transcript, &alice()).await;
        assert_eq!(first, second);
    }

    #[test]
    fn interpret_is_pure_over_scope() {
        let transcript = say("Help with executive summary");
        let user = UserId::new("alice");
        let settings = ClassifierSettings::default();
        let unbound = interpret(&transcript, &Scope::Unbound, today(), &user, &settings);
        let resolved = interpret(
            &transcript,
            &Scope::Resolved(ProjectRef::new("p1", "Willow Creek")),
            today(),
            &user,
            &settings,
        );
        assert!(matches!(unbound, CreationRequest::Task(_)));
        assert!(matches!(resolved, CreationRequest::BusinessPlan(_)));
    }
}
