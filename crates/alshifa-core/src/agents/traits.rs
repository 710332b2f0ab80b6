//! Agent trait shared by the clinic agents

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::AgentType;

/// A rule-based clinic agent
///
/// `process` is a pure function of the request and the agent's read-only
/// graph snapshot: it never fails, never blocks, and returns identical
/// responses for identical requests. Unresolved entities, empty results
/// and unmatched intents come back as ordinary responses.
pub trait Agent: Send + Sync {
    /// Typed request, as received from the boundary
    type Request: DeserializeOwned + Send;
    /// Typed response, serialized by the boundary
    type Response: Serialize + Send;

    /// Get the type of this agent
    fn agent_type(&self) -> AgentType;

    /// Display name of the agent
    fn name(&self) -> &'static str;

    /// Answer one request
    fn process(&self, request: &Self::Request) -> Self::Response;
}
