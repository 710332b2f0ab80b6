//! Record types held by the clinic knowledge graphs
//!
//! Each domain graph is a star: the center (patient, inventory item,
//! invoice) owns its satellites (history events, treatment cases, stock
//! batches) directly.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::graph::StarNode;

/// A past visit in a patient's history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEvent {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: String,
    pub doctor: String,
    pub notes: String,
}

impl HistoryEvent {
    /// Whether any field of the event contains the concept, ignoring case
    pub fn mentions(&self, concept: &str) -> bool {
        let concept = concept.to_lowercase();
        [
            self.date.to_string(),
            self.kind.to_lowercase(),
            self.doctor.to_lowercase(),
            self.notes.to_lowercase(),
        ]
        .iter()
        .any(|field| field.contains(&concept))
    }

    /// One-line description used in history answers
    pub fn summary(&self) -> String {
        format!(
            "On {}, {} with {}: {}",
            self.date, self.kind, self.doctor, self.notes
        )
    }
}

/// Patient center of the scheduling graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub history: Vec<HistoryEvent>,
}

impl PatientRecord {
    /// Most recent event by declaration order
    pub fn latest_event(&self) -> Option<&HistoryEvent> {
        self.history.last()
    }
}

impl StarNode for PatientRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// An open treatment case
///
/// `stage` is a free-form label; no transition rules are enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub case_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub stage: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub lab_order_id: Option<String>,
    pub next_milestone: String,
}

/// Patient center of the case-tracking graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientCases {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub active_cases: Vec<CaseRecord>,
}

impl StarNode for PatientCases {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A received lot of an inventory item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    pub batch_id: String,
    pub expiry: NaiveDate,
    pub qty: u32,
}

/// Inventory center with its supplier and batch satellites
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub stock: u32,
    pub threshold: u32,
    pub supplier: String,
    #[serde(default)]
    pub batches: Vec<Batch>,
    /// Average units consumed per day
    pub usage_rate: f64,
}

impl InventoryItem {
    /// Sum of quantities across batches
    pub fn batch_total(&self) -> u64 {
        self.batches.iter().map(|b| u64::from(b.qty)).sum()
    }

    /// Whether stock has fallen below the reorder threshold
    pub fn below_threshold(&self) -> bool {
        self.stock < self.threshold
    }
}

impl StarNode for InventoryItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Payment state of an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvoiceStatus {
    Paid,
    Pending,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => "Paid",
            Self::Pending => "Pending",
        }
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Invoice center of the finance graph
///
/// Amounts are whole rupees; all totals are integer sums.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub procedure: String,
    pub amount: u64,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

impl Invoice {
    /// Whether the procedure contains the fragment, ignoring case
    pub fn is_procedure(&self, fragment: &str) -> bool {
        self.procedure
            .to_lowercase()
            .contains(&fragment.to_lowercase())
    }
}

impl StarNode for Invoice {
    fn id(&self) -> &str {
        &self.id
    }

    // Invoices are looked up by the patient they bill.
    fn name(&self) -> &str {
        &self.patient_name
    }
}
