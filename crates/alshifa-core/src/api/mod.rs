//! JSON boundary over the clinic agents
//!
//! Transport layers (the HTTP server, the CLI) hand raw JSON to
//! [`dispatch`] and get the agent's serialized response back. The doctor
//! dashboard read models and the health report live here as well.

pub mod health;
pub mod overview;

pub use health::HealthReport;
pub use overview::{
    FinanceSummary, InventoryRow, StockStatus, finance_summary, inventory_overview,
};

use serde_json::Value;
use tracing::debug;

use crate::agents::{Agent, AgentType, ClinicAgents};
use crate::error::{Error, Result};

/// Route a JSON request to the agent behind `endpoint`
///
/// Accepts endpoint names (`appointment`, `case`, `inventory`, `finance`,
/// `specialist`) and agent names. A body that does not match the agent's
/// request shape is `InvalidInput`; agents themselves never fail.
pub fn dispatch(agents: &ClinicAgents, endpoint: &str, body: Value) -> Result<Value> {
    let agent_type =
        AgentType::parse(endpoint).ok_or_else(|| Error::UnknownAgent(endpoint.to_string()))?;
    debug!(endpoint, agent = %agent_type, "Dispatching agent request");

    match agent_type {
        AgentType::Scheduling => run(&agents.scheduling, body),
        AgentType::CaseTracking => run(&agents.cases, body),
        AgentType::Inventory => run(&agents.inventory, body),
        AgentType::Revenue => run(&agents.revenue, body),
        AgentType::Specialist => run(&agents.specialist, body),
    }
}

fn run<A: Agent>(agent: &A, body: Value) -> Result<Value> {
    let request: A::Request = serde_json::from_value(body)
        .map_err(|e| Error::InvalidInput(format!("{} request: {}", agent.agent_type(), e)))?;
    Ok(serde_json::to_value(agent.process(&request))?)
}
