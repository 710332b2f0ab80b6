//! Service health report

use serde::{Deserialize, Serialize};

use crate::agents::{AgentType, ClinicAgents};
use crate::domain::knowledge::KnowledgeGraphStats;

/// Snapshot of what the service has loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub message: String,
    pub version: String,
    /// Endpoint names of every loaded agent
    pub agents: Vec<String>,
    pub graph: KnowledgeGraphStats,
    /// Inventory items whose stock disagrees with their batches
    pub stock_drift: usize,
}

impl HealthReport {
    pub fn collect(agents: &ClinicAgents) -> Self {
        let store = agents.store();
        Self {
            message: "Al-Shifa API is Running".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            agents: AgentType::all()
                .iter()
                .map(|agent| agent.endpoint().to_string())
                .collect(),
            graph: store.stats(),
            stock_drift: store.drift_report().len(),
        }
    }

    /// Healthy when the graph has content and no stock drift
    pub fn is_healthy(&self) -> bool {
        self.stock_drift == 0 && self.graph.patients + self.graph.inventory_items > 0
    }
}
