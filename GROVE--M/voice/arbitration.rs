//! Intent arbitration: an ordered table of (predicate, constructor) rules.
//! The first rule whose predicate holds builds the request.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    cues::DetectorHits,
    extract::ExtractedFields,
    model::{
        BusinessPlanRequest, CreationRequest, InventoryRequest, ItemType, ProjectRef,
        ProjectRequest, TaskRequest, Transcript, UserId, DEFAULT_CURRENCY, DEFAULT_PRICE_SOURCE,
    },
};

/// Constants stamped onto requests, overridable through configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierSettings {
    /// Currency code for inventory prices.
    pub currency: String,
    /// Provenance label for inventory prices.
    pub price_source: String,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            price_source: DEFAULT_PRICE_SOURCE.to_string(),
        }
    }
}

/// Where the project binding for a call came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Scope {
    /// No project is known.
    Unbound,
    /// Project open in the caller's context.
    Ambient(ProjectRef),
    /// Project found by name in the utterance.
    Resolved(ProjectRef),
}

impl Scope {
    /// Bound project, whatever its source.
    #[must_use]
    pub const fn project(&self) -> Option<&ProjectRef> {
        match self {
            Self::Unbound => None,
            Self::Ambient(project) | Self::Resolved(project) => Some(project),
        }
    }

    /// Whether the caller supplied the project.
    #[must_use]
    pub const fn is_ambient(&self) -> bool {
        matches!(self, Self::Ambient(_))
    }
}

/// Intent chosen by arbitration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Business-plan assistance.
    BusinessPlan,
    /// Task creation.
    Task,
    /// Inventory item creation.
    Inventory,
    /// Project creation.
    Project,
}

/// Facts the predicates look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleInput {
    /// Detector results.
    pub hits: DetectorHits,
    /// A project is bound (ambient or resolved).
    pub project_in_scope: bool,
    /// The bound project came from the caller.
    pub ambient_project: bool,
}

impl RuleInput {
    /// Derives the input from detector hits and the call's scope.
    #[must_use]
    pub const fn new(hits: DetectorHits, scope: &Scope) -> Self {
        Self {
            hits,
            project_in_scope: scope.project().is_some(),
            ambient_project: scope.is_ambient(),
        }
    }
}

/// Everything a constructor needs to build a request.
#[derive(Debug, Clone, Copy)]
pub struct Draft<'a> {
    /// Original transcript.
    pub transcript: &'a Transcript,
    /// Extracted fields.
    pub fields: &'a ExtractedFields,
    /// Project binding.
    pub scope: &'a Scope,
    /// Acting user.
    pub user: &'a UserId,
    /// Stamped constants.
    pub settings: &'a ClassifierSettings,
}

/// One arbitration rule.
#[derive(Clone, Copy)]
pub struct IntentRule {
    /// Intent produced when the rule fires.
    pub intent: Intent,
    /// Predicate over detector hits and scope.
    pub matches: fn(&RuleInput) -> bool,
    /// Variant constructor.
    pub build: fn(&Draft<'_>) -> CreationRequest,
}

impl fmt::Debug for IntentRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntentRule")
            .field("intent", &self.intent)
            .finish_non_exhaustive()
    }
}

/// Rules in priority order. Task is both the common case and the catch-all.
pub static RULES: [IntentRule; 4] = [
    IntentRule {
        intent: Intent::BusinessPlan,
        matches: |input| input.hits.business_plan && input.project_in_scope,
        build: build_business_plan,
    },
    IntentRule {
        intent: Intent::Task,
        matches: |input| input.hits.task || (!input.hits.inventory && !input.hits.project),
        build: build_task,
    },
    IntentRule {
        intent: Intent::Inventory,
        matches: |input| input.hits.inventory && !input.hits.task,
        build: build_inventory,
    },
    IntentRule {
        intent: Intent::Project,
        matches: |input| {
            input.hits.project && !input.hits.task && !input.hits.inventory && !input.ambient_project
        },
        build: build_project,
    },
];

/// Used when no rule matches; the table above is exhaustive, so this only
/// backs the totality guarantee.
pub static FALLBACK: IntentRule = IntentRule {
    intent: Intent::Task,
    matches: |_| true,
    build: build_task,
};

/// First rule whose predicate holds.
#[must_use]
pub fn arbitrate(input: &RuleInput) -> &'static IntentRule {
    RULES
        .iter()
        .find(|rule| (rule.matches)(input))
        .unwrap_or(&FALLBACK)
}

fn bound_project_id(draft: &Draft<'_>) -> Option<String> {
    draft.scope.project().map(|project| project.id.clone())
}

fn build_task(draft: &Draft<'_>) -> CreationRequest {
    let fields = draft.fields;
    CreationRequest::Task(TaskRequest {
        title: fields.title.clone(),
        description: fields.description.clone(),
        status: fields.status,
        priority: fields.priority,
        due_date: fields.due_date,
        project_id: bound_project_id(draft),
        created_by: draft.user.clone(),
        assignees: vec![draft.user.clone()],
    })
}

fn build_inventory(draft: &Draft<'_>) -> CreationRequest {
    let fields = draft.fields;
    let quantity = Some(fields.quantity);
    let (quantity_needed, quantity_owned, quantity_borrowed) = match fields.item_type {
        ItemType::NeededSupply => (quantity, None, None),
        ItemType::OwnedResource => (None, quantity, None),
        ItemType::BorrowedOrRental => (None, None, quantity),
    };
    CreationRequest::Inventory(InventoryRequest {
        title: fields.title.clone(),
        description: fields.description.clone(),
        item_type: fields.item_type,
        fundraiser: fields.fundraiser,
        tags: fields.tags.clone(),
        quantity_needed,
        quantity_owned,
        quantity_borrowed,
        price: fields.price,
        estimated_price: fields.price.map(|_| true),
        price_currency: draft.settings.currency.clone(),
        price_source: draft.settings.price_source.clone(),
        project_id: bound_project_id(draft),
        added_by: draft.user.clone(),
        assignees: vec![draft.user.clone()],
    })
}

fn build_project(draft: &Draft<'_>) -> CreationRequest {
    let fields = draft.fields;
    CreationRequest::Project(ProjectRequest {
        title: fields.title.clone(),
        location: fields.location.clone(),
        property_status: fields.property_status,
        values_mission_goals: fields.mission.clone().or_else(|| fields.description.clone()),
        created_by: draft.user.clone(),
    })
}

fn build_business_plan(draft: &Draft<'_>) -> CreationRequest {
    match draft.scope.project() {
        Some(project) => CreationRequest::BusinessPlan(BusinessPlanRequest {
            project_id: project.id.clone(),
            query: draft.transcript.as_str().to_string(),
        }),
        None => build_task(draft),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(task: bool, inventory: bool, project: bool, plan: bool, scope: &Scope) -> RuleInput {
        RuleInput::new(
            DetectorHits {
                task,
                inventory,
                project,
                business_plan: plan,
            },
            scope,
        )
    }

    fn p1() -> ProjectRef {
        ProjectRef::new("p1", "Willow Creek")
    }

    #[test]
    fn business_plan_needs_a_bound_project() {
        let unbound = Scope::Unbound;
        assert_eq!(
            arbitrate(&input(false, false, false, true, &unbound)).intent,
            Intent::Task
        );
        let ambient = Scope::Ambient(p1());
        assert_eq!(
            arbitrate(&input(true, true, false, true, &ambient)).intent,
            Intent::BusinessPlan
        );
        let resolved = Scope::Resolved(p1());
        assert_eq!(
            arbitrate(&input(false, false, false, true, &resolved)).intent,
            Intent::BusinessPlan
        );
    }

    #[test]
    fn task_beats_inventory_and_project() {
        let scope = Scope::Unbound;
        assert_eq!(
            arbitrate(&input(true, true, true, false, &scope)).intent,
            Intent::Task
        );
        assert_eq!(
            arbitrate(&input(false, true, true, false, &scope)).intent,
            Intent::Inventory
        );
        assert_eq!(
            arbitrate(&input(false, false, true, false, &scope)).intent,
            Intent::Project
        );
    }

    #[test]
    fn nothing_detected_falls_back_to_task() {
        assert_eq!(
            arbitrate(&input(false, false, false, false, &Scope::Unbound)).intent,
            Intent::Task
        );
    }

    #[test]
    fn every_combination_yields_exactly_one_rule() {
        for bits in 0u8..16 {
            for scope in [Scope::Unbound, Scope::Ambient(p1()), Scope::Resolved(p1())] {
                // Project cues never fire under an ambient project.
                let project = bits & 4 != 0 && !scope.is_ambient();
                let rule_input = input(bits & 1 != 0, bits & 2 != 0, project, bits & 8 != 0, &scope);
                let matching = RULES
                    .iter()
                    .filter(|rule| (rule.matches)(&rule_input))
                    .count();
                assert!(matching >= 1, "no rule for {rule_input:?}");
                let _ = arbitrate(&rule_input);
            }
        }
    }
}
