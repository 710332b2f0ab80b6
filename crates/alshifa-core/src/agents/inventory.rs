//! Inventory agent - stock levels, suppliers and runout prediction

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::AgentType;
use super::traits::Agent;
use crate::domain::knowledge::{InventoryItem, KnowledgeGraphStore};
use crate::matching::{EntityResolver, IntentClassifier, KeywordRules, Vocabulary, contains_any};

/// Days of remaining stock below which a runout warning is raised
pub const DEFAULT_RUNOUT_WARNING_DAYS: u32 = 7;

/// Reported when usage is zero and stock never runs out
pub const NO_RUNOUT_DAYS: u32 = 999;

const HELP_MESSAGE: &str = "I can track inventory, suppliers, and predict shortages. \
                            Ask me 'Do we have enough Lidocaine?'";

/// Inventory request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryRequest {
    pub user_query: String,
    /// Used only when the query names no item
    #[serde(default)]
    pub item_id: Option<String>,
}

impl InventoryRequest {
    pub fn new(user_query: impl Into<String>) -> Self {
        Self {
            user_query: user_query.into(),
            item_id: None,
        }
    }

    pub fn with_item(mut self, item_id: impl Into<String>) -> Self {
        self.item_id = Some(item_id.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertLevel {
    Critical,
    Warning,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuggestedAction {
    Reorder,
    None,
    #[serde(rename = "Check Expiry")]
    CheckExpiry,
}

/// Inventory response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryResponse {
    pub response_text: String,
    pub alert_level: AlertLevel,
    pub action_suggested: SuggestedAction,
    /// Predicted days of stock left, set for runout questions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_left: Option<u32>,
}

impl InventoryResponse {
    fn stable(text: impl Into<String>) -> Self {
        Self {
            response_text: text.into(),
            alert_level: AlertLevel::Stable,
            action_suggested: SuggestedAction::None,
            days_left: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryIntent {
    StockCheck,
    SupplierBatch,
    RunoutPrediction,
}

/// Whole days until stock runs out at the given daily usage
///
/// Zero or negative usage means the item never runs out.
pub fn runout_days(stock: u32, usage_rate: f64) -> u32 {
    if usage_rate <= 0.0 {
        return NO_RUNOUT_DAYS;
    }
    (f64::from(stock) / usage_rate).floor() as u32
}

/// Inventory agent
pub struct InventoryAgent {
    store: Arc<KnowledgeGraphStore>,
    warning_days: u32,
    items: Box<dyn EntityResolver>,
    intents: Box<dyn IntentClassifier<InventoryIntent>>,
}

impl InventoryAgent {
    pub fn new(store: Arc<KnowledgeGraphStore>) -> Self {
        Self {
            store,
            warning_days: DEFAULT_RUNOUT_WARNING_DAYS,
            items: Box::new(Vocabulary::from_pairs(&[
                ("lidocaine", "Lidocaine"),
                ("gloves", "Gloves"),
            ])),
            intents: Box::new(default_intents()),
        }
    }

    pub fn with_warning_days(mut self, days: u32) -> Self {
        self.warning_days = days;
        self
    }

    pub fn with_items(mut self, items: impl EntityResolver + 'static) -> Self {
        self.items = Box::new(items);
        self
    }

    pub fn with_intents(
        mut self,
        intents: impl IntentClassifier<InventoryIntent> + 'static,
    ) -> Self {
        self.intents = Box::new(intents);
        self
    }

    pub fn warning_days(&self) -> u32 {
        self.warning_days
    }

    fn check_stock(&self, item: &InventoryItem) -> InventoryResponse {
        let mut response =
            InventoryResponse::stable(format!("We have {} units of {}.", item.stock, item.name));
        if item.below_threshold() {
            response.response_text.push_str(&format!(
                " ⚠️ WARNING: This is below the reorder level of {}.",
                item.threshold
            ));
            response.alert_level = AlertLevel::Critical;
            response.action_suggested = SuggestedAction::Reorder;
        }
        response
    }

    fn describe_supplier(&self, query: &str, item: &InventoryItem) -> InventoryResponse {
        let mut response = InventoryResponse::stable(format!(
            "{} is supplied by **{}**.",
            item.name, item.supplier
        ));
        if contains_any(query, &["expiry", "batch"]) {
            let batches: Vec<String> = item
                .batches
                .iter()
                .map(|b| format!("{} (Exp: {})", b.batch_id, b.expiry))
                .collect();
            response
                .response_text
                .push_str(&format!(" Current batches: {}.", batches.join(", ")));
            // Batch listings suggest an expiry check rather than `None`.
            response.action_suggested = SuggestedAction::CheckExpiry;
        }
        response
    }

    fn predict_runout(&self, item: &InventoryItem) -> InventoryResponse {
        let days = runout_days(item.stock, item.usage_rate);
        let mut response = InventoryResponse::stable(format!(
            "At current usage rate ({:?}/day), {} will run out in approx **{} days**.",
            item.usage_rate, item.name, days
        ));
        response.days_left = Some(days);
        if days < self.warning_days {
            response.response_text.push_str(" You should reorder this week.");
            response.alert_level = AlertLevel::Warning;
            response.action_suggested = SuggestedAction::Reorder;
        }
        response
    }
}

impl Agent for InventoryAgent {
    type Request = InventoryRequest;
    type Response = InventoryResponse;

    fn agent_type(&self) -> AgentType {
        AgentType::Inventory
    }

    fn name(&self) -> &'static str {
        "SupplyChain Bot"
    }

    fn process(&self, request: &InventoryRequest) -> InventoryResponse {
        let query = request.user_query.as_str();

        let item = match self.items.resolve(query) {
            Some(hit) => match self.store.inventory().find_by_name(hit.canonical) {
                Some(item) => item,
                None => {
                    return InventoryResponse::stable(format!(
                        "Item '{}' not found in Knowledge Graph.",
                        hit.canonical
                    ));
                }
            },
            None => match request
                .item_id
                .as_deref()
                .and_then(|id| self.store.inventory().get(id))
            {
                Some(item) => item,
                None => {
                    debug!("No inventory item named in query");
                    return InventoryResponse::stable(HELP_MESSAGE);
                }
            },
        };

        let intent = self.intents.classify(query);
        info!(
            agent = %self.agent_type(),
            item_id = %item.id,
            intent = ?intent,
            "Processing inventory request"
        );

        match intent {
            Some(InventoryIntent::StockCheck) => self.check_stock(item),
            Some(InventoryIntent::SupplierBatch) => self.describe_supplier(query, item),
            Some(InventoryIntent::RunoutPrediction) => self.predict_runout(item),
            None => InventoryResponse::stable(HELP_MESSAGE),
        }
    }
}

fn default_intents() -> KeywordRules<InventoryIntent> {
    KeywordRules::new()
        .rule(
            &["stock", "have", "check", "status", "inventory"],
            InventoryIntent::StockCheck,
        )
        .rule(
            &["supplier", "who", "from", "batch", "expiry"],
            InventoryIntent::SupplierBatch,
        )
        .rule(
            &["last", "enough", "predict", "run out", "days"],
            InventoryIntent::RunoutPrediction,
        )
}
