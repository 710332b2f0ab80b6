//! CLI tests

use clap::Parser;

use crate::{Cli, Commands, ConfigAction, GraphAction, OutputFormat, ask_body};

#[test]
fn test_parse_ask() {
    let cli = Cli::try_parse_from([
        "alshifa",
        "ask",
        "case",
        "Is Ali's crown ready?",
        "--patient-id",
        "PAT_89201",
    ])
    .unwrap();
    match cli.command {
        Commands::Ask {
            agent,
            query,
            patient_id,
            role,
            ..
        } => {
            assert_eq!(agent, "case");
            assert_eq!(query, "Is Ali's crown ready?");
            assert_eq!(patient_id.as_deref(), Some("PAT_89201"));
            assert!(role.is_none());
        }
        _ => panic!("expected ask command"),
    }
    assert_eq!(cli.format, OutputFormat::Text);
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "alshifa",
        "graph",
        "stats",
        "--format",
        "json",
        "--graph",
        "/tmp/graph.json",
        "-q",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Commands::Graph {
            action: GraphAction::Stats
        }
    ));
    assert_eq!(cli.format, OutputFormat::Json);
    assert!(cli.quiet);
    assert_eq!(cli.graph.unwrap().to_str(), Some("/tmp/graph.json"));
}

#[test]
fn test_dashboard_role_is_optional() {
    let cli = Cli::try_parse_from(["alshifa", "finance"]).unwrap();
    assert!(matches!(cli.command, Commands::Finance { role: None }));

    let cli = Cli::try_parse_from(["alshifa", "inventory", "--role", "admin"]).unwrap();
    assert!(matches!(cli.command, Commands::Inventory { role: Some(ref r) } if r == "admin"));
}

#[test]
fn test_config_actions() {
    let cli = Cli::try_parse_from(["alshifa", "config", "set", "agents.finance_role", "admin"])
        .unwrap();
    assert!(matches!(
        cli.command,
        Commands::Config {
            action: ConfigAction::Set { ref key, ref value }
        } if key == "agents.finance_role" && value == "admin"
    ));
}

#[test]
fn test_ask_requires_query() {
    assert!(Cli::try_parse_from(["alshifa", "ask", "case"]).is_err());
}

#[test]
fn test_invalid_format_rejected() {
    assert!(Cli::try_parse_from(["alshifa", "doctor", "--format", "yaml"]).is_err());
}

#[test]
fn test_ask_body_includes_only_given_hints() {
    let body = ask_body(
        "check stock".to_string(),
        None,
        Some("ITEM_002".to_string()),
        None,
        Some("s-1".to_string()),
    );
    assert_eq!(body["user_query"], "check stock");
    assert_eq!(body["item_id"], "ITEM_002");
    assert_eq!(body["session_id"], "s-1");
    assert!(body.get("patient_id").is_none());
    assert!(body.get("role").is_none());
}

#[test]
fn test_ask_body_generates_session_id() {
    let body = ask_body("hello".to_string(), None, None, None, None);
    let session = body["session_id"].as_str().unwrap();
    assert!(uuid::Uuid::parse_str(session).is_ok());
}
