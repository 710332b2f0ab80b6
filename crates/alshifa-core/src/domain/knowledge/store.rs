//! Read-only store holding one star graph per clinic domain
//!
//! The store is built once at startup, either from the embedded clinic
//! fixture or from a JSON snapshot, and shared between agents behind an
//! `Arc`. No mutation paths are exposed, so concurrent readers need no
//! locking.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::entity::{InventoryItem, Invoice, InvoiceStatus, PatientCases, PatientRecord};
use super::graph::StarGraph;
use crate::error::{Error, Result};

const CLINIC_FIXTURE: &str = include_str!("clinic_fixture.json");

/// Clinic knowledge graphs: patient history, treatment cases, inventory and
/// invoices, plus the lab order status table consulted by case tracking
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeGraphStore {
    #[serde(default)]
    patients: StarGraph<PatientRecord>,
    #[serde(default)]
    cases: StarGraph<PatientCases>,
    #[serde(default)]
    inventory: StarGraph<InventoryItem>,
    #[serde(default)]
    invoices: StarGraph<Invoice>,
    #[serde(default)]
    lab_orders: BTreeMap<String, String>,
}

/// An item whose recorded stock disagrees with its batch quantities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockDrift {
    pub item_id: String,
    pub stock: u32,
    pub batch_total: u64,
}

/// Node counts per graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeGraphStats {
    pub patients: usize,
    pub case_patients: usize,
    pub inventory_items: usize,
    pub invoices: usize,
    pub lab_orders: usize,
}

impl KnowledgeGraphStore {
    /// The built-in clinic fixture
    pub fn clinic_fixture() -> Self {
        // The fixture is compiled in and covered by tests.
        Self::from_json_str(CLINIC_FIXTURE).expect("embedded clinic fixture is valid")
    }

    /// Parse a JSON graph snapshot
    pub fn from_json_str(json: &str) -> Result<Self> {
        let store: Self =
            serde_json::from_str(json).map_err(|e| Error::GraphLoad(e.to_string()))?;
        store.check_values()?;
        store.log_drift();
        Ok(store)
    }

    /// Load a JSON graph snapshot from disk
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::GraphLoad(format!("{}: {}", path.display(), e)))?;
        let store = Self::from_json_str(&contents)?;
        info!(path = %path.display(), stats = ?store.stats(), "Knowledge graph loaded");
        Ok(store)
    }

    /// Serialize the whole store as pretty JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn patients(&self) -> &StarGraph<PatientRecord> {
        &self.patients
    }

    pub fn cases(&self) -> &StarGraph<PatientCases> {
        &self.cases
    }

    pub fn inventory(&self) -> &StarGraph<InventoryItem> {
        &self.inventory
    }

    pub fn invoices(&self) -> &StarGraph<Invoice> {
        &self.invoices
    }

    /// Shipping status of a lab order, if the lab knows the order
    pub fn lab_status(&self, order_id: &str) -> Option<&str> {
        self.lab_orders.get(order_id).map(String::as_str)
    }

    pub fn stats(&self) -> KnowledgeGraphStats {
        KnowledgeGraphStats {
            patients: self.patients.len(),
            case_patients: self.cases.len(),
            inventory_items: self.inventory.len(),
            invoices: self.invoices.len(),
            lab_orders: self.lab_orders.len(),
        }
    }

    /// Items whose stock differs from the sum of their batch quantities
    ///
    /// Drift is reported, never corrected.
    pub fn drift_report(&self) -> Vec<StockDrift> {
        self.inventory
            .iter()
            .filter(|item| u64::from(item.stock) != item.batch_total())
            .map(|item| StockDrift {
                item_id: item.id.clone(),
                stock: item.stock,
                batch_total: item.batch_total(),
            })
            .collect()
    }

    /// Reject values outside the data model: invoice amounts must be
    /// positive and fit a u64 total, usage rates must be finite and >= 0
    fn check_values(&self) -> Result<()> {
        if let Some(inv) = self.invoices.iter().find(|inv| inv.amount == 0) {
            return Err(Error::GraphLoad(format!(
                "invoice {} has a zero amount",
                inv.id
            )));
        }
        self.invoices
            .iter()
            .try_fold(0u64, |total, inv| total.checked_add(inv.amount))
            .ok_or_else(|| Error::GraphLoad("invoice amounts overflow a u64 total".to_string()))?;

        if let Some(item) = self
            .inventory
            .iter()
            .find(|item| !item.usage_rate.is_finite() || item.usage_rate < 0.0)
        {
            return Err(Error::GraphLoad(format!(
                "inventory item {} has invalid usage rate {}",
                item.id, item.usage_rate
            )));
        }
        Ok(())
    }

    fn log_drift(&self) {
        for drift in self.drift_report() {
            warn!(
                item_id = %drift.item_id,
                stock = drift.stock,
                batch_total = drift.batch_total,
                "Inventory stock does not match batch quantities"
            );
        }
    }
}

/// Read access to invoices
///
/// The revenue agent reads invoices only through this trait, which lets
/// callers observe whether the access gate let a request reach the data.
pub trait InvoiceLedger: Send + Sync {
    /// All invoices in declaration order
    fn all_invoices(&self) -> Vec<&Invoice>;

    /// Invoices filtered by status and by a case-insensitive procedure fragment
    fn query_invoices(
        &self,
        status: Option<InvoiceStatus>,
        procedure: Option<&str>,
    ) -> Vec<&Invoice> {
        self.all_invoices()
            .into_iter()
            .filter(|inv| status.is_none_or(|s| inv.status == s))
            .filter(|inv| procedure.is_none_or(|p| inv.is_procedure(p)))
            .collect()
    }
}

impl InvoiceLedger for KnowledgeGraphStore {
    fn all_invoices(&self) -> Vec<&Invoice> {
        self.invoices.iter().collect()
    }
}

/// Integer total of invoice amounts
///
/// Saturates at `u64::MAX` rather than overflowing. Loaded stores never get
/// there: snapshots whose invoice total overflows are rejected.
pub fn total_amount<'a>(invoices: impl IntoIterator<Item = &'a Invoice>) -> u64 {
    invoices
        .into_iter()
        .fold(0u64, |total, inv| total.saturating_add(inv.amount))
}
