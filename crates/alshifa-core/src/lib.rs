//! Al-Shifa Core Library
//!
//! This crate provides the clinic backend core, including:
//! - Knowledge graphs (patient history, cases, inventory, invoices)
//! - Entity resolution and intent classification
//! - Agents (scheduling, case tracking, inventory, revenue, specialist)
//! - JSON dispatch and dashboard read models
//! - Configuration

pub mod agents;
pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod matching;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::agents::{Agent, AgentType, ClinicAgents};
    pub use crate::config::Config;
    pub use crate::domain::knowledge::KnowledgeGraphStore;
    pub use crate::error::{Error, Result};
}

#[cfg(test)]
mod agents_tests;
#[cfg(test)]
mod error_tests;
