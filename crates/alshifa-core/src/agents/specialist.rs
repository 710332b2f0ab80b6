//! Specialist agent - symptom text to recommended specialist

use serde::{Deserialize, Serialize};
use tracing::info;

use super::AgentType;
use super::traits::Agent;
use crate::matching::{EntityResolver, Vocabulary};

/// Recommended when no condition is detected
pub const GENERAL_DENTIST: &str = "General Dentist";

const MATCHED_CONFIDENCE: f64 = 0.95;
const UNMATCHED_CONFIDENCE: f64 = 0.50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialistRequest {
    pub user_query: String,
}

impl SpecialistRequest {
    pub fn new(user_query: impl Into<String>) -> Self {
        Self {
            user_query: user_query.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialistResponse {
    pub agent_name: String,
    pub analysis: String,
    pub suggested_specialist: String,
    pub confidence_score: f64,
}

/// Specialist agent
pub struct SpecialistAgent {
    conditions: Box<dyn EntityResolver>,
}

impl SpecialistAgent {
    pub fn new() -> Self {
        Self {
            conditions: Box::new(Vocabulary::from_pairs(&[
                ("root canal", "Endodontist"),
                ("cavity", "Restorative Dentist"),
                ("implant", "Prosthodontist"),
                ("braces", "Orthodontist"),
                ("pain", GENERAL_DENTIST),
                ("cleaning", "Hygienist"),
                ("child", "Pediatric Dentist"),
                ("gum", "Periodontist"),
            ])),
        }
    }

    pub fn with_conditions(mut self, conditions: impl EntityResolver + 'static) -> Self {
        self.conditions = Box::new(conditions);
        self
    }
}

impl Default for SpecialistAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for SpecialistAgent {
    type Request = SpecialistRequest;
    type Response = SpecialistResponse;

    fn agent_type(&self) -> AgentType {
        AgentType::Specialist
    }

    fn name(&self) -> &'static str {
        "Dr. AI"
    }

    fn process(&self, request: &SpecialistRequest) -> SpecialistResponse {
        let (analysis, specialist, confidence) = match self.conditions.resolve(&request.user_query) {
            Some(hit) => (
                format!(
                    "Based on your mention of '{}', I recommend seeing a **{}**.",
                    hit.alias, hit.canonical
                ),
                hit.canonical.to_string(),
                MATCHED_CONFIDENCE,
            ),
            None => (
                "I couldn't detect a specific condition. I recommend a General Checkup first."
                    .to_string(),
                GENERAL_DENTIST.to_string(),
                UNMATCHED_CONFIDENCE,
            ),
        };

        info!(agent = %self.agent_type(), specialist = %specialist, "Symptoms analysed");

        SpecialistResponse {
            agent_name: self.name().to_string(),
            analysis,
            suggested_specialist: specialist,
            confidence_score: confidence,
        }
    }
}
