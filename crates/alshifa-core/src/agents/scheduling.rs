//! Scheduling agent - visit history and appointment triage
//!
//! Answers two kinds of patient questions: "when was my last root canal?"
//! (a lookup in the patient's history star) and "I need an appointment"
//! (symptom triage followed by slot availability).

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::AgentType;
use super::traits::Agent;
use crate::domain::knowledge::KnowledgeGraphStore;
use crate::matching::{EntityResolver, IntentClassifier, KeywordRules, Vocabulary, contains_any};

/// Patient assumed when the request carries none
pub const DEFAULT_PATIENT_ID: &str = "PATIENT_89201";

/// Symptoms that turn a booking into an emergency
pub const EMERGENCY_KEYWORDS: &[&str] = &["severe", "blood", "trauma", "broken", "pain"];

const EMERGENCY_MESSAGE: &str = "⚠️ I detect this is an Emergency. I have alerted Dr. Bilal. \
                                 Please come in immediately at 10:00 AM.";

const HELP_MESSAGE: &str = "I can help you book an appointment or check your history. \
                            Try asking 'When was my last visit?'.";

const NO_HISTORY: &str = "No history found.";

/// Scheduling request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingRequest {
    pub user_query: String,
    #[serde(default)]
    pub patient_id: Option<String>,
    pub session_id: String,
}

impl SchedulingRequest {
    pub fn new(user_query: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            user_query: user_query.into(),
            patient_id: None,
            session_id: session_id.into(),
        }
    }

    pub fn with_patient(mut self, patient_id: impl Into<String>) -> Self {
        self.patient_id = Some(patient_id.into());
        self
    }
}

/// What the scheduling agent did, for UI branching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulingAction {
    Booked,
    Queried,
    Triaged,
    None,
}

/// Triage outcome for a symptom description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Urgency {
    Normal,
    Emergency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
}

/// Structured payload attached to a scheduling answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchedulingData {
    Triage { priority: Priority, urgency: Urgency },
    Slots { slots: Vec<String> },
    History { patient_id: String, concept: Option<String> },
}

/// Scheduling response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulingResponse {
    pub response_text: String,
    pub action_taken: SchedulingAction,
    #[serde(default)]
    pub data: Option<SchedulingData>,
}

/// Scheduling intents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulingIntent {
    HistoryQuery,
    BookingRequest,
    Fallback,
}

/// Source of bookable slots
///
/// Stands in for a real calendar store.
pub trait SlotCalendar: Send + Sync {
    fn available_slots(&self, day: &str) -> Vec<String>;
}

/// Calendar that offers the same three slots every day
#[derive(Debug, Clone, Default)]
pub struct FixedSlotCalendar;

impl SlotCalendar for FixedSlotCalendar {
    fn available_slots(&self, _day: &str) -> Vec<String> {
        vec![
            "10:00 AM".to_string(),
            "02:00 PM".to_string(),
            "04:30 PM".to_string(),
        ]
    }
}

/// Scheduling agent
pub struct SchedulingAgent {
    store: Arc<KnowledgeGraphStore>,
    default_patient_id: String,
    intents: Box<dyn IntentClassifier<SchedulingIntent>>,
    concepts: Box<dyn EntityResolver>,
    calendar: Box<dyn SlotCalendar>,
}

impl SchedulingAgent {
    pub fn new(store: Arc<KnowledgeGraphStore>) -> Self {
        Self {
            store,
            default_patient_id: DEFAULT_PATIENT_ID.to_string(),
            intents: Box::new(default_intents()),
            concepts: Box::new(default_concepts()),
            calendar: Box::new(FixedSlotCalendar),
        }
    }

    pub fn with_default_patient(mut self, patient_id: impl Into<String>) -> Self {
        self.default_patient_id = patient_id.into();
        self
    }

    pub fn with_calendar(mut self, calendar: impl SlotCalendar + 'static) -> Self {
        self.calendar = Box::new(calendar);
        self
    }

    pub fn with_intents(
        mut self,
        intents: impl IntentClassifier<SchedulingIntent> + 'static,
    ) -> Self {
        self.intents = Box::new(intents);
        self
    }

    pub fn with_concepts(mut self, concepts: impl EntityResolver + 'static) -> Self {
        self.concepts = Box::new(concepts);
        self
    }

    /// Classify a query into a scheduling intent
    pub fn classify(&self, query: &str) -> SchedulingIntent {
        self.intents
            .classify(query)
            .unwrap_or(SchedulingIntent::Fallback)
    }

    /// Emergency when the text mentions any emergency symptom
    pub fn triage(&self, symptom: &str) -> Urgency {
        if contains_any(symptom, EMERGENCY_KEYWORDS) {
            Urgency::Emergency
        } else {
            Urgency::Normal
        }
    }

    /// Describe history events mentioning the concept
    ///
    /// With no concept every event matches. When nothing matches, the
    /// latest visit is offered instead.
    pub fn query_history(&self, patient_id: &str, concept: Option<&str>) -> String {
        let Some(patient) = self.store.patients().get(patient_id) else {
            return NO_HISTORY.to_string();
        };

        let facts: Vec<String> = patient
            .history
            .iter()
            .filter(|event| concept.is_none_or(|c| event.mentions(c)))
            .map(|event| event.summary())
            .collect();

        if !facts.is_empty() {
            return facts.join("\n");
        }

        match patient.latest_event() {
            Some(latest) => format!(
                "I couldn't find '{}', but your last visit was on {} for {}.",
                concept.unwrap_or_default(),
                latest.date,
                latest.kind
            ),
            None => NO_HISTORY.to_string(),
        }
    }

    fn resolve_patient<'a>(&'a self, request: &'a SchedulingRequest) -> &'a str {
        match request.patient_id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => &self.default_patient_id,
        }
    }

    fn answer_history(&self, query: &str, patient_id: &str) -> SchedulingResponse {
        let concept = self.concepts.resolve(query).map(|hit| hit.canonical);
        debug!(patient_id, concept = ?concept, "Looking up patient history");

        let observation = self.query_history(patient_id, concept);
        SchedulingResponse {
            response_text: format!("According to your records: {}", observation),
            action_taken: SchedulingAction::Queried,
            data: Some(SchedulingData::History {
                patient_id: patient_id.to_string(),
                concept: concept.map(str::to_string),
            }),
        }
    }

    fn answer_booking(&self, query: &str) -> SchedulingResponse {
        let urgency = self.triage(query);
        if urgency == Urgency::Emergency {
            return SchedulingResponse {
                response_text: EMERGENCY_MESSAGE.to_string(),
                action_taken: SchedulingAction::Triaged,
                data: Some(SchedulingData::Triage {
                    priority: Priority::High,
                    urgency,
                }),
            };
        }

        let slots = self.calendar.available_slots("today");
        SchedulingResponse {
            response_text: format!(
                "I can book you for a checkup. Available slots today: {}.",
                slots.join(", ")
            ),
            action_taken: SchedulingAction::None,
            data: Some(SchedulingData::Slots { slots }),
        }
    }
}

impl Agent for SchedulingAgent {
    type Request = SchedulingRequest;
    type Response = SchedulingResponse;

    fn agent_type(&self) -> AgentType {
        AgentType::Scheduling
    }

    fn name(&self) -> &'static str {
        "Scheduling Bot"
    }

    fn process(&self, request: &SchedulingRequest) -> SchedulingResponse {
        let patient_id = self.resolve_patient(request);
        let intent = self.classify(&request.user_query);
        info!(
            agent = %self.agent_type(),
            session_id = %request.session_id,
            patient_id,
            intent = ?intent,
            "Processing scheduling request"
        );

        match intent {
            SchedulingIntent::HistoryQuery => self.answer_history(&request.user_query, patient_id),
            SchedulingIntent::BookingRequest => self.answer_booking(&request.user_query),
            SchedulingIntent::Fallback => SchedulingResponse {
                response_text: HELP_MESSAGE.to_string(),
                action_taken: SchedulingAction::None,
                data: None,
            },
        }
    }
}

fn default_intents() -> KeywordRules<SchedulingIntent> {
    KeywordRules::new()
        .rule(
            &["history", "last", "previous", "record", "when", "past", "done"],
            SchedulingIntent::HistoryQuery,
        )
        .rule(
            &["book", "appointment", "schedule", "visit", "pain", "see a doctor"],
            SchedulingIntent::BookingRequest,
        )
}

fn default_concepts() -> Vocabulary {
    Vocabulary::from_pairs(&[
        ("root canal", "root canal"),
        ("checkup", "checkup"),
        ("cleaning", "cleaning"),
    ])
}
