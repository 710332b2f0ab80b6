//! Case tracking agent - treatment progress and lab order status
//!
//! Finds the patient named in the query, walks the patient's active cases
//! and answers per case. Intent is classified for each case separately
//! because one question may cover several open cases at once.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::AgentType;
use super::traits::Agent;
use crate::domain::knowledge::{CaseRecord, KnowledgeGraphStore};
use crate::matching::{EntityResolver, IntentClassifier, KeywordRules, Vocabulary};

const CLARIFICATION: &str = "Please specify a patient name. Example: 'Status of Ali's crown?'";

const LAB_ORDER_NOT_FOUND: &str = "Order Not Found";

/// Case tracking request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseRequest {
    pub user_query: String,
    /// Used only when the query names no patient
    #[serde(default)]
    pub patient_id: Option<String>,
}

impl CaseRequest {
    pub fn new(user_query: impl Into<String>) -> Self {
        Self {
            user_query: user_query.into(),
            patient_id: None,
        }
    }

    pub fn with_patient(mut self, patient_id: impl Into<String>) -> Self {
        self.patient_id = Some(patient_id.into());
        self
    }
}

/// Overall status reported for the patient's cases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseStatus {
    Active,
    Completed,
    #[serde(rename = "On Hold")]
    OnHold,
    Unknown,
    None,
}

/// Case tracking response
///
/// `next_step` is always the first matched case's milestone, even when the
/// answer covers several cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseResponse {
    pub response_text: String,
    pub case_status: CaseStatus,
    #[serde(default)]
    pub next_step: Option<String>,
}

impl CaseResponse {
    fn without_cases(text: impl Into<String>, status: CaseStatus) -> Self {
        Self {
            response_text: text.into(),
            case_status: status,
            next_step: None,
        }
    }
}

/// Per-case intents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseIntent {
    LabStatus,
    GeneralProgress,
}

/// A case together with the patient who owns it
struct CaseInContext<'a> {
    patient_name: &'a str,
    case: &'a CaseRecord,
}

/// Case tracking agent
pub struct CaseTrackingAgent {
    store: Arc<KnowledgeGraphStore>,
    names: Box<dyn EntityResolver>,
    intents: Box<dyn IntentClassifier<CaseIntent>>,
}

impl CaseTrackingAgent {
    pub fn new(store: Arc<KnowledgeGraphStore>) -> Self {
        Self {
            store,
            names: Box::new(Vocabulary::from_pairs(&[("ali", "Ali"), ("sara", "Sara")])),
            intents: Box::new(default_intents()),
        }
    }

    pub fn with_names(mut self, names: impl EntityResolver + 'static) -> Self {
        self.names = Box::new(names);
        self
    }

    pub fn with_intents(mut self, intents: impl IntentClassifier<CaseIntent> + 'static) -> Self {
        self.intents = Box::new(intents);
        self
    }

    /// Shipping status of a lab order
    ///
    /// Unknown orders are a normal outcome, reported as "Order Not Found".
    pub fn lab_status(&self, order_id: &str) -> &str {
        self.store
            .lab_status(order_id)
            .unwrap_or(LAB_ORDER_NOT_FOUND)
    }

    /// Cases of every patient whose name contains the fragment
    fn cases_for_name<'a>(&'a self, fragment: &str) -> Vec<CaseInContext<'a>> {
        self.store
            .cases()
            .filter_by_name(fragment)
            .flat_map(|patient| {
                patient.active_cases.iter().map(move |case| CaseInContext {
                    patient_name: &patient.name,
                    case,
                })
            })
            .collect()
    }

    fn cases_for_id<'a>(&'a self, patient_id: &str) -> Vec<CaseInContext<'a>> {
        self.store
            .cases()
            .get(patient_id)
            .map(|patient| {
                patient
                    .active_cases
                    .iter()
                    .map(|case| CaseInContext {
                        patient_name: &patient.name,
                        case,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn describe_case(&self, query: &str, entry: &CaseInContext<'_>) -> Option<String> {
        let case = entry.case;
        match self.intents.classify(query)? {
            CaseIntent::LabStatus => {
                let lab_status = case
                    .lab_order_id
                    .as_deref()
                    .map(|order_id| self.lab_status(order_id))
                    .unwrap_or("N/A");
                Some(format!(
                    "**Case:** {}\n- Current Stage: {}\n- Lab Status: {}\n- Next Step: {}",
                    case.kind, case.stage, lab_status, case.next_milestone
                ))
            }
            CaseIntent::GeneralProgress => Some(format!(
                "Patient {} is currently in the **{}** stage for {}.",
                entry.patient_name, case.stage, case.kind
            )),
        }
    }
}

impl Agent for CaseTrackingAgent {
    type Request = CaseRequest;
    type Response = CaseResponse;

    fn agent_type(&self) -> AgentType {
        AgentType::CaseTracking
    }

    fn name(&self) -> &'static str {
        "Clinical Case Manager"
    }

    fn process(&self, request: &CaseRequest) -> CaseResponse {
        let query = request.user_query.as_str();

        let (target, cases) = match self.names.resolve(query) {
            Some(hit) => (hit.canonical.to_string(), self.cases_for_name(hit.canonical)),
            None => match request
                .patient_id
                .as_deref()
                .and_then(|id| self.store.cases().get(id))
            {
                Some(patient) => (patient.name.clone(), self.cases_for_id(&patient.id)),
                None => {
                    debug!("No patient named in case query");
                    return CaseResponse::without_cases(CLARIFICATION, CaseStatus::Unknown);
                }
            },
        };

        info!(
            agent = %self.agent_type(),
            patient = %target,
            cases = cases.len(),
            "Processing case request"
        );

        let Some(first) = cases.first() else {
            return CaseResponse::without_cases(
                format!("No active medical cases found for {}.", target),
                CaseStatus::None,
            );
        };

        let mut lines: Vec<String> = cases
            .iter()
            .filter_map(|entry| self.describe_case(query, entry))
            .collect();

        if lines.is_empty() {
            lines.push(format!(
                "Found active case: {}. Ask about 'lab status' or 'next steps'.",
                first.case.kind
            ));
        }

        CaseResponse {
            response_text: lines.join("\n\n"),
            case_status: CaseStatus::Active,
            next_step: Some(first.case.next_milestone.clone()),
        }
    }
}

fn default_intents() -> KeywordRules<CaseIntent> {
    KeywordRules::new()
        .rule(&["lab", "ready", "crown", "status", "where"], CaseIntent::LabStatus)
        .rule(&["progress", "stage", "step", "plan"], CaseIntent::GeneralProgress)
}
