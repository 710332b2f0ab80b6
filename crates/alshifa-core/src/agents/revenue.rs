//! Revenue agent - collected revenue and outstanding invoices
//!
//! Financial data sits behind a role gate. The gate runs before the ledger
//! is touched; a denied request never reads a single invoice.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::AgentType;
use super::traits::Agent;
use crate::domain::knowledge::{Invoice, InvoiceLedger, InvoiceStatus, total_amount};
use crate::matching::{IntentClassifier, KeywordRules, contains_any};

/// Role allowed to read financial data unless configured otherwise
pub const DEFAULT_FINANCE_ROLE: &str = "doctor";

/// Procedure fragments recognised as revenue filters, in priority order
const PROCEDURE_FILTERS: &[&str] = &["root canal"];

const ACCESS_DENIED: &str = "⛔ Access Denied. Financial data is restricted.";

const ALL_CLEAR: &str = "✅ No pending invoices. All clear.";

const HELP_MESSAGE: &str =
    "I can track Revenue and Pending Invoices. Try asking 'Who has unpaid bills?'.";

fn default_role() -> String {
    DEFAULT_FINANCE_ROLE.to_string()
}

/// Finance request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinanceRequest {
    pub user_query: String,
    #[serde(default = "default_role")]
    pub role: String,
}

impl FinanceRequest {
    pub fn new(user_query: impl Into<String>) -> Self {
        Self {
            user_query: user_query.into(),
            role: default_role(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevenueAction {
    Blocked,
    ReportGenerated,
    Alert,
    Lookup,
    None,
}

/// Structured payload attached to a finance answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RevenueData {
    Report { total: u64, count: usize },
    Pending { pending_list: Vec<Invoice>, total: u64 },
}

/// Finance response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceResponse {
    pub response_text: String,
    #[serde(default)]
    pub data: Option<RevenueData>,
    pub action_taken: RevenueAction,
}

impl FinanceResponse {
    fn text_only(text: &str, action: RevenueAction) -> Self {
        Self {
            response_text: text.to_string(),
            data: None,
            action_taken: action,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevenueIntent {
    RevenueReport,
    PendingOutstanding,
}

/// Revenue agent
pub struct RevenueAgent {
    ledger: Arc<dyn InvoiceLedger>,
    allowed_role: String,
    intents: Box<dyn IntentClassifier<RevenueIntent>>,
}

impl RevenueAgent {
    pub fn new(ledger: Arc<dyn InvoiceLedger>) -> Self {
        Self {
            ledger,
            allowed_role: default_role(),
            intents: Box::new(default_intents()),
        }
    }

    pub fn with_allowed_role(mut self, role: impl Into<String>) -> Self {
        self.allowed_role = role.into();
        self
    }

    pub fn with_intents(mut self, intents: impl IntentClassifier<RevenueIntent> + 'static) -> Self {
        self.intents = Box::new(intents);
        self
    }

    pub fn allowed_role(&self) -> &str {
        &self.allowed_role
    }

    /// Exact, case-sensitive role comparison
    pub fn is_authorized(&self, role: &str) -> bool {
        role == self.allowed_role
    }

    fn revenue_report(&self, query: &str) -> FinanceResponse {
        let procedure = PROCEDURE_FILTERS
            .iter()
            .copied()
            .find(|p| contains_any(query, &[*p]));
        let paid = self
            .ledger
            .query_invoices(Some(InvoiceStatus::Paid), procedure);
        let total = total_amount(paid.iter().copied());

        let context = procedure
            .map(|p| format!(" from {}s", p))
            .unwrap_or_default();
        FinanceResponse {
            response_text: format!("💰 Total Revenue Collected{}: **Rs. {}**.", context, total),
            data: Some(RevenueData::Report {
                total,
                count: paid.len(),
            }),
            action_taken: RevenueAction::ReportGenerated,
        }
    }

    fn pending_report(&self) -> FinanceResponse {
        let pending = self.ledger.query_invoices(Some(InvoiceStatus::Pending), None);
        if pending.is_empty() {
            return FinanceResponse::text_only(ALL_CLEAR, RevenueAction::Lookup);
        }

        let total = total_amount(pending.iter().copied());
        let details: Vec<String> = pending
            .iter()
            .map(|inv| format!("- {}: Rs. {} ({})", inv.patient_name, inv.amount, inv.procedure))
            .collect();

        FinanceResponse {
            response_text: format!(
                "⚠️ **Pending Invoices:**\n{}\n\n**Total Outstanding:** Rs. {}",
                details.join("\n"),
                total
            ),
            data: Some(RevenueData::Pending {
                pending_list: pending.into_iter().cloned().collect(),
                total,
            }),
            action_taken: RevenueAction::Alert,
        }
    }
}

impl Agent for RevenueAgent {
    type Request = FinanceRequest;
    type Response = FinanceResponse;

    fn agent_type(&self) -> AgentType {
        AgentType::Revenue
    }

    fn name(&self) -> &'static str {
        "Finance Controller"
    }

    fn process(&self, request: &FinanceRequest) -> FinanceResponse {
        if !self.is_authorized(&request.role) {
            warn!(agent = %self.agent_type(), role = %request.role, "Finance access denied");
            return FinanceResponse::text_only(ACCESS_DENIED, RevenueAction::Blocked);
        }

        let intent = self.intents.classify(&request.user_query);
        info!(agent = %self.agent_type(), intent = ?intent, "Processing finance request");

        match intent {
            Some(RevenueIntent::RevenueReport) => self.revenue_report(&request.user_query),
            Some(RevenueIntent::PendingOutstanding) => self.pending_report(),
            None => FinanceResponse::text_only(HELP_MESSAGE, RevenueAction::None),
        }
    }
}

fn default_intents() -> KeywordRules<RevenueIntent> {
    KeywordRules::new()
        .rule(
            &["revenue", "earned", "income", "total", "made"],
            RevenueIntent::RevenueReport,
        )
        .rule(
            &["pending", "unpaid", "due", "owe", "outstanding"],
            RevenueIntent::PendingOutstanding,
        )
}
