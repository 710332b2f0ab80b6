//! Error types for Al-Shifa
//!
//! Agents never return these for business-logic outcomes; unresolved
//! entities, empty results and unmatched intents are ordinary responses.
//! Errors come from the boundary: malformed requests, unknown endpoints,
//! the finance role gate on read models, and fixture/config loading.

use thiserror::Error;

/// Result type alias using Al-Shifa's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Al-Shifa error types with helpful messages and suggestions
#[derive(Error, Debug)]
pub enum Error {
    // Routing errors (E100-E199)
    #[error("Unknown agent '{0}'. Expected one of: appointment, case, inventory, finance, specialist.")]
    UnknownAgent(String),

    // Access errors (E200-E299)
    #[error("Access denied for role '{0}'. Financial data is restricted.")]
    AccessDenied(String),

    // Input errors (E300-E399)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Graph errors (E400-E499)
    #[error("Failed to load knowledge graph: {0}")]
    GraphLoad(String),

    // Config errors (E600-E699)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownAgent(_) => "E100",
            Self::AccessDenied(_) => "E200",
            Self::InvalidInput(_) => "E300",
            Self::GraphLoad(_) => "E400",
            Self::ConfigError(_) => "E600",
            Self::Serialization(_) => "E601",
        }
    }

    /// Get suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::UnknownAgent(_) => Some("alshifa ask --help".to_string()),
            Self::GraphLoad(_) => Some("alshifa graph dump > graph.json".to_string()),
            Self::ConfigError(_) => Some("alshifa config show".to_string()),
            _ => None,
        }
    }

    /// Whether the error was caused by the caller rather than the server
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownAgent(_)
                | Self::AccessDenied(_)
                | Self::InvalidInput(_)
                | Self::Serialization(_)
        )
    }
}
