//! Error module tests

use crate::error::{Error, Result};

#[test]
fn test_unknown_agent_error() {
    let error = Error::UnknownAgent("billing".to_string());
    assert_eq!(error.code(), "E100");
    assert_eq!(error.suggestion(), Some("alshifa ask --help".to_string()));
    assert!(error.to_string().contains("billing"));
}

#[test]
fn test_access_denied_error() {
    let error = Error::AccessDenied("patient".to_string());
    assert_eq!(error.code(), "E200");
    assert!(error.to_string().contains("Financial data is restricted"));
    assert!(error.is_client_error());
}

#[test]
fn test_invalid_input_error() {
    let error = Error::InvalidInput("missing field `user_query`".to_string());
    assert_eq!(error.code(), "E300");
    assert!(error.is_client_error());
}

#[test]
fn test_graph_load_error() {
    let error = Error::GraphLoad("bad json".to_string());
    assert_eq!(error.code(), "E400");
    assert_eq!(
        error.suggestion(),
        Some("alshifa graph dump > graph.json".to_string())
    );
    assert!(!error.is_client_error());
}

#[test]
fn test_config_error() {
    let error = Error::ConfigError("bad".to_string());
    assert_eq!(error.code(), "E600");
    assert_eq!(error.suggestion(), Some("alshifa config show".to_string()));
}

#[test]
fn test_serialization_error_from() {
    let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
    let error: Error = json_err.into();
    assert_eq!(error.code(), "E601");
}

#[test]
fn test_result_alias() {
    fn fails() -> Result<()> {
        Err(Error::InvalidInput("boom".to_string()))
    }
    assert_eq!(fails().unwrap_err().to_string(), "Invalid input: boom");
}
