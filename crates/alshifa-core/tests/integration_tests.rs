//! Al-Shifa Core Integration Tests

use std::sync::Arc;
use std::thread;

use alshifa_core::{
    Error,
    agents::{
        Agent, AlertLevel, CaseRequest, CaseStatus, ClinicAgents, FinanceRequest,
        InventoryRequest, RevenueAction, RevenueData, SchedulingAction, SchedulingRequest,
    },
    api::{self, HealthReport, StockStatus},
    config::Config,
    domain::knowledge::KnowledgeGraphStore,
    matching::{EntityResolver, Vocabulary},
};
use serde_json::json;

fn agents() -> ClinicAgents {
    ClinicAgents::with_defaults()
}

#[test]
fn test_unrecognized_entities_fall_back_without_errors() {
    let agents = agents();
    let query = "tell me something nice";

    let case = agents.cases.process(&CaseRequest::new(query));
    assert_eq!(case.case_status, CaseStatus::Unknown);

    let inventory = agents.inventory.process(&InventoryRequest::new(query));
    assert_eq!(inventory.alert_level, AlertLevel::Stable);
    assert!(inventory.response_text.starts_with("I can track inventory"));

    let finance = agents.revenue.process(&FinanceRequest::new(query));
    assert_eq!(finance.action_taken, RevenueAction::None);

    let scheduling = agents
        .scheduling
        .process(&SchedulingRequest::new(query, "session"));
    assert_eq!(scheduling.action_taken, SchedulingAction::None);
}

#[test]
fn test_first_declared_alias_wins() {
    let vocab = Vocabulary::new()
        .alias("root canal", "root canal")
        .alias("canal", "canal");
    let hit = vocab.resolve("When was my root canal?").unwrap();
    assert_eq!(hit.canonical, "root canal");
}

#[test]
fn test_emergency_triage_over_json() {
    let response = api::dispatch(
        &agents(),
        "appointment",
        json!({"user_query": "severe pain, broken tooth", "session_id": "s1"}),
    )
    .unwrap();
    assert_eq!(response["action_taken"], "triaged");
    assert_eq!(response["data"]["priority"], "high");
    assert_eq!(response["data"]["urgency"], "Emergency");
}

#[test]
fn test_history_lookup_over_json() {
    let response = api::dispatch(
        &agents(),
        "appointment",
        json!({"user_query": "When was my last root canal?", "session_id": "s1"}),
    )
    .unwrap();
    assert_eq!(response["action_taken"], "queried");
    assert_eq!(response["data"]["concept"], "root canal");
    assert_eq!(response["data"]["patient_id"], "PATIENT_89201");
    let text = response["response_text"].as_str().unwrap();
    assert!(text.contains("On 2024-12-12, Root Canal with Dr. Bilal"));
}

#[test]
fn test_low_stock_alert_over_json() {
    let response = api::dispatch(
        &agents(),
        "inventory",
        json!({"user_query": "check lidocaine stock"}),
    )
    .unwrap();
    assert_eq!(response["alert_level"], "Critical");
    assert_eq!(response["action_suggested"], "Reorder");
    assert!(
        response["response_text"]
            .as_str()
            .unwrap()
            .contains("below the reorder level of 20")
    );
}

#[test]
fn test_zero_usage_rate_from_snapshot() {
    let mut snapshot: serde_json::Value =
        serde_json::from_str(&KnowledgeGraphStore::clinic_fixture().to_json_pretty().unwrap())
            .unwrap();
    snapshot["inventory"][0]["usage_rate"] = json!(0.0);
    let store = KnowledgeGraphStore::from_json_str(&snapshot.to_string()).unwrap();
    let agents = ClinicAgents::new(Arc::new(store), &Config::default().agents);

    let response = agents
        .inventory
        .process(&InventoryRequest::new("how many days of lidocaine left?"));
    assert_eq!(response.days_left, Some(999));
    assert_eq!(response.alert_level, AlertLevel::Stable);
}

#[test]
fn test_patient_role_is_blocked_everywhere() {
    let agents = agents();
    let response = api::dispatch(
        &agents,
        "finance",
        json!({"user_query": "total revenue", "role": "patient"}),
    )
    .unwrap();
    assert_eq!(response["action_taken"], "blocked");
    assert!(response["data"].is_null());

    assert!(matches!(
        api::finance_summary(&agents, "patient"),
        Err(Error::AccessDenied(_))
    ));
}

#[test]
fn test_root_canal_revenue() {
    let response = agents()
        .revenue
        .process(&FinanceRequest::new("revenue from root canals"));
    assert_eq!(response.data, Some(RevenueData::Report { total: 5000, count: 1 }));
}

#[test]
fn test_identical_requests_give_identical_bytes() {
    let agents = agents();
    for (endpoint, body) in [
        ("appointment", json!({"user_query": "book a visit", "session_id": "s"})),
        ("case", json!({"user_query": "Is Ali's crown ready?"})),
        ("inventory", json!({"user_query": "Who supplies the gloves batch?"})),
        ("finance", json!({"user_query": "pending invoices"})),
        ("specialist", json!({"user_query": "I need braces"})),
    ] {
        let first = api::dispatch(&agents, endpoint, body.clone()).unwrap().to_string();
        let second = api::dispatch(&agents, endpoint, body).unwrap().to_string();
        assert_eq!(first, second, "{endpoint} is not deterministic");
    }
}

#[test]
fn test_concurrent_readers_share_the_store() {
    let agents = Arc::new(agents());
    let expected = agents
        .cases
        .process(&CaseRequest::new("Is Ali's crown ready?"));

    thread::scope(|scope| {
        for _ in 0..8 {
            let agents = Arc::clone(&agents);
            let expected = expected.clone();
            scope.spawn(move || {
                for _ in 0..50 {
                    let response = agents
                        .cases
                        .process(&CaseRequest::new("Is Ali's crown ready?"));
                    assert_eq!(response, expected);
                }
            });
        }
    });
}

#[test]
fn test_dashboard_and_health() {
    let agents = agents();
    let rows = api::inventory_overview(&agents, "doctor").unwrap();
    assert_eq!(rows[0].status, StockStatus::Critical);

    let summary = api::finance_summary(&agents, "doctor").unwrap();
    assert_eq!(summary.total_revenue + summary.total_pending, 12000);

    let health = HealthReport::collect(&agents);
    assert!(health.is_healthy());
    assert_eq!(health.agents.len(), 5);
}

#[test]
fn test_graph_snapshot_roundtrip_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graph.json");
    std::fs::write(
        &path,
        KnowledgeGraphStore::clinic_fixture().to_json_pretty().unwrap(),
    )
    .unwrap();

    let store = KnowledgeGraphStore::load(&path).unwrap();
    assert_eq!(store.stats(), KnowledgeGraphStore::clinic_fixture().stats());
}
