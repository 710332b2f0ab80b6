//! Clinic knowledge graphs
//!
//! Four small star graphs back the clinic agents:
//!
//! - **Patients**: patient → visit history events (scheduling)
//! - **Cases**: patient → active treatment cases (case tracking)
//! - **Inventory**: item → batches, supplier, usage rate
//! - **Invoices**: invoice nodes with patient, procedure and status
//!
//! ## Usage
//!
//! ```rust
//! use alshifa_core::domain::knowledge::KnowledgeGraphStore;
//!
//! let store = KnowledgeGraphStore::clinic_fixture();
//! let item = store.inventory().find_by_name("lidocaine").unwrap();
//! assert_eq!(item.supplier, "MediSupply Corp");
//! ```

mod entity;
mod graph;
mod store;

pub use entity::{
    Batch, CaseRecord, HistoryEvent, InventoryItem, Invoice, InvoiceStatus, PatientCases,
    PatientRecord,
};
pub use graph::{StarGraph, StarNode};
pub use store::{InvoiceLedger, KnowledgeGraphStats, KnowledgeGraphStore, StockDrift, total_amount};
