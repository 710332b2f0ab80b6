//! Clinic agents
//!
//! Every agent follows the same cycle: resolve an entity from the query,
//! classify the intent, read the entity's star in the knowledge graph, and
//! format a natural-language answer with derived fields.

pub mod case_tracking;
pub mod inventory;
pub mod revenue;
pub mod scheduling;
pub mod specialist;
pub mod traits;

use std::sync::Arc;

pub use case_tracking::{CaseRequest, CaseResponse, CaseStatus, CaseTrackingAgent};
pub use inventory::{AlertLevel, InventoryAgent, InventoryRequest, InventoryResponse, SuggestedAction};
pub use revenue::{FinanceRequest, FinanceResponse, RevenueAction, RevenueAgent, RevenueData};
pub use scheduling::{
    FixedSlotCalendar, SchedulingAction, SchedulingAgent, SchedulingData, SchedulingRequest,
    SchedulingResponse, SlotCalendar, Urgency,
};
pub use specialist::{SpecialistAgent, SpecialistRequest, SpecialistResponse};
pub use traits::Agent;

use crate::config::AgentsConfig;
use crate::domain::knowledge::{InvoiceLedger, KnowledgeGraphStore};

/// Agent types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentType {
    Scheduling,
    CaseTracking,
    Inventory,
    Revenue,
    Specialist,
}

impl AgentType {
    /// Endpoint name used by the HTTP boundary
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Scheduling => "appointment",
            Self::CaseTracking => "case",
            Self::Inventory => "inventory",
            Self::Revenue => "finance",
            Self::Specialist => "specialist",
        }
    }

    /// Parse from an endpoint or agent name
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "appointment" | "scheduling" | "schedule" => Some(Self::Scheduling),
            "case" | "case_tracking" | "cases" => Some(Self::CaseTracking),
            "inventory" | "supply" => Some(Self::Inventory),
            "finance" | "revenue" => Some(Self::Revenue),
            "specialist" | "medical" => Some(Self::Specialist),
            _ => None,
        }
    }

    pub fn all() -> &'static [AgentType] {
        &[
            Self::Scheduling,
            Self::CaseTracking,
            Self::Inventory,
            Self::Revenue,
            Self::Specialist,
        ]
    }
}

impl std::fmt::Display for AgentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scheduling => write!(f, "scheduling"),
            Self::CaseTracking => write!(f, "case_tracking"),
            Self::Inventory => write!(f, "inventory"),
            Self::Revenue => write!(f, "revenue"),
            Self::Specialist => write!(f, "specialist"),
        }
    }
}

/// All clinic agents sharing one graph snapshot
pub struct ClinicAgents {
    pub scheduling: SchedulingAgent,
    pub cases: CaseTrackingAgent,
    pub inventory: InventoryAgent,
    pub revenue: RevenueAgent,
    pub specialist: SpecialistAgent,
    store: Arc<KnowledgeGraphStore>,
}

impl ClinicAgents {
    /// Build every agent over the store with the configured policies
    pub fn new(store: Arc<KnowledgeGraphStore>, config: &AgentsConfig) -> Self {
        let ledger: Arc<dyn InvoiceLedger> = store.clone();
        Self {
            scheduling: SchedulingAgent::new(Arc::clone(&store))
                .with_default_patient(config.default_patient_id.clone()),
            cases: CaseTrackingAgent::new(Arc::clone(&store)),
            inventory: InventoryAgent::new(Arc::clone(&store))
                .with_warning_days(config.runout_warning_days),
            revenue: RevenueAgent::new(ledger)
                .with_allowed_role(config.finance_role.clone()),
            specialist: SpecialistAgent::new(),
            store,
        }
    }

    /// Agents over the built-in fixture with default policies
    pub fn with_defaults() -> Self {
        Self::new(
            Arc::new(KnowledgeGraphStore::clinic_fixture()),
            &crate::config::Config::default().agents,
        )
    }

    /// The graph snapshot the agents read from
    pub fn store(&self) -> &KnowledgeGraphStore {
        &self.store
    }

    /// Role allowed through the revenue gate
    pub fn finance_role(&self) -> &str {
        self.revenue.allowed_role()
    }
}
