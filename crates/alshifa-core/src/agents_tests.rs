//! Agents module tests

use std::sync::Arc;

use crate::agents::{
    Agent, AgentType, AlertLevel, CaseRequest, CaseStatus, ClinicAgents, FinanceRequest,
    InventoryRequest, RevenueAction, SchedulingAction, SchedulingRequest, SpecialistRequest,
};
use crate::config::AgentsConfig;
use crate::domain::knowledge::KnowledgeGraphStore;

#[test]
fn test_agent_type_display() {
    assert_eq!(AgentType::Scheduling.to_string(), "scheduling");
    assert_eq!(AgentType::CaseTracking.to_string(), "case_tracking");
    assert_eq!(AgentType::Inventory.to_string(), "inventory");
    assert_eq!(AgentType::Revenue.to_string(), "revenue");
    assert_eq!(AgentType::Specialist.to_string(), "specialist");
}

#[test]
fn test_agent_type_parse() {
    assert_eq!(AgentType::parse("appointment"), Some(AgentType::Scheduling));
    assert_eq!(AgentType::parse("CASE"), Some(AgentType::CaseTracking));
    assert_eq!(AgentType::parse("finance"), Some(AgentType::Revenue));
    assert_eq!(AgentType::parse("revenue"), Some(AgentType::Revenue));
    assert_eq!(AgentType::parse("medical"), Some(AgentType::Specialist));
    assert_eq!(AgentType::parse("billing"), None);
}

#[test]
fn test_agent_type_endpoint_roundtrip() {
    for agent_type in AgentType::all() {
        assert_eq!(AgentType::parse(agent_type.endpoint()), Some(*agent_type));
        assert_eq!(AgentType::parse(&agent_type.to_string()), Some(*agent_type));
    }
}

#[test]
fn test_agent_type_all() {
    assert_eq!(AgentType::all().len(), 5);
}

#[test]
fn test_agent_names() {
    let agents = ClinicAgents::with_defaults();
    assert_eq!(agents.scheduling.name(), "Scheduling Bot");
    assert_eq!(agents.cases.name(), "Clinical Case Manager");
    assert_eq!(agents.inventory.name(), "SupplyChain Bot");
    assert_eq!(agents.revenue.name(), "Finance Controller");
    assert_eq!(agents.specialist.name(), "Dr. AI");
}

#[test]
fn test_agents_report_their_type() {
    let agents = ClinicAgents::with_defaults();
    assert_eq!(agents.scheduling.agent_type(), AgentType::Scheduling);
    assert_eq!(agents.cases.agent_type(), AgentType::CaseTracking);
    assert_eq!(agents.inventory.agent_type(), AgentType::Inventory);
    assert_eq!(agents.revenue.agent_type(), AgentType::Revenue);
    assert_eq!(agents.specialist.agent_type(), AgentType::Specialist);
}

#[test]
fn test_clinic_agents_apply_config() {
    let config = AgentsConfig {
        default_patient_id: "PATIENT_0".to_string(),
        finance_role: "admin".to_string(),
        runout_warning_days: 2,
    };
    let agents = ClinicAgents::new(Arc::new(KnowledgeGraphStore::clinic_fixture()), &config);

    let history = agents
        .scheduling
        .process(&SchedulingRequest::new("show my history", "s"));
    assert!(history.response_text.ends_with("No history found."));

    assert_eq!(agents.finance_role(), "admin");
    let blocked = agents.revenue.process(&FinanceRequest::new("total revenue"));
    assert_eq!(blocked.action_taken, RevenueAction::Blocked);

    assert_eq!(agents.inventory.warning_days(), 2);
    let runout = agents
        .inventory
        .process(&InventoryRequest::new("will lidocaine last?"));
    assert_eq!(runout.alert_level, AlertLevel::Stable);
}

#[test]
fn test_agents_share_one_store() {
    let agents = ClinicAgents::with_defaults();
    assert_eq!(agents.store().stats().inventory_items, 2);
}

#[test]
fn test_every_agent_is_deterministic() {
    let agents = ClinicAgents::with_defaults();

    let scheduling = SchedulingRequest::new("I need an appointment", "s");
    assert_eq!(
        agents.scheduling.process(&scheduling),
        agents.scheduling.process(&scheduling)
    );

    let case = CaseRequest::new("Is Ali's crown ready?");
    assert_eq!(agents.cases.process(&case), agents.cases.process(&case));

    let inventory = InventoryRequest::new("lidocaine stock");
    assert_eq!(
        agents.inventory.process(&inventory),
        agents.inventory.process(&inventory)
    );

    let finance = FinanceRequest::new("who owes us?");
    assert_eq!(agents.revenue.process(&finance), agents.revenue.process(&finance));

    let specialist = SpecialistRequest::new("my gum bleeds");
    assert_eq!(
        agents.specialist.process(&specialist),
        agents.specialist.process(&specialist)
    );
}

#[test]
fn test_fallbacks_are_ordinary_responses() {
    let agents = ClinicAgents::with_defaults();
    assert_eq!(
        agents
            .scheduling
            .process(&SchedulingRequest::new("hello", "s"))
            .action_taken,
        SchedulingAction::None
    );
    assert_eq!(
        agents.cases.process(&CaseRequest::new("hello")).case_status,
        CaseStatus::Unknown
    );
    assert_eq!(
        agents.inventory.process(&InventoryRequest::new("hello")).alert_level,
        AlertLevel::Stable
    );
    assert_eq!(
        agents.revenue.process(&FinanceRequest::new("hello")).action_taken,
        RevenueAction::None
    );
}

#[test]
fn test_agents_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClinicAgents>();
}
