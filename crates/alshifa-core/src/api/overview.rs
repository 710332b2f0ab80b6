//! Doctor dashboard read models
//!
//! Both views read the graph snapshot directly and sit behind the same role
//! gate as the revenue agent.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::agents::ClinicAgents;
use crate::domain::knowledge::{Invoice, InvoiceLedger, InvoiceStatus, InventoryItem, total_amount};
use crate::error::{Error, Result};

/// Stock health shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockStatus {
    Good,
    Low,
    Critical,
}

impl StockStatus {
    /// Critical below the threshold, Low below one and a half times it
    pub fn classify(stock: u32, threshold: u32) -> Self {
        if stock < threshold {
            Self::Critical
        } else if u64::from(stock) * 2 < u64::from(threshold) * 3 {
            Self::Low
        } else {
            Self::Good
        }
    }
}

/// One inventory item as listed on the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRow {
    pub id: String,
    pub name: String,
    pub stock: u32,
    pub reorder_level: u32,
    pub status: StockStatus,
    pub supplier: String,
}

impl From<&InventoryItem> for InventoryRow {
    fn from(item: &InventoryItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            stock: item.stock,
            reorder_level: item.threshold,
            status: StockStatus::classify(item.stock, item.threshold),
            supplier: item.supplier.clone(),
        }
    }
}

/// Revenue totals plus every invoice, for the finance table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinanceSummary {
    pub total_revenue: u64,
    pub total_pending: u64,
    pub invoices: Vec<Invoice>,
}

fn authorize(agents: &ClinicAgents, role: &str) -> Result<()> {
    if agents.revenue.is_authorized(role) {
        Ok(())
    } else {
        warn!(role, "Dashboard access denied");
        Err(Error::AccessDenied(role.to_string()))
    }
}

/// Every inventory item with its stock status, in graph order
pub fn inventory_overview(agents: &ClinicAgents, role: &str) -> Result<Vec<InventoryRow>> {
    authorize(agents, role)?;
    Ok(agents
        .store()
        .inventory()
        .iter()
        .map(InventoryRow::from)
        .collect())
}

/// Paid and pending totals over all invoices
pub fn finance_summary(agents: &ClinicAgents, role: &str) -> Result<FinanceSummary> {
    authorize(agents, role)?;
    let store = agents.store();
    let invoices = store.all_invoices();
    let total_with = |status: InvoiceStatus| {
        total_amount(invoices.iter().copied().filter(|inv| inv.status == status))
    };

    Ok(FinanceSummary {
        total_revenue: total_with(InvoiceStatus::Paid),
        total_pending: total_with(InvoiceStatus::Pending),
        invoices: invoices.iter().map(|inv| (*inv).clone()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_status_bands() {
        assert_eq!(StockStatus::classify(12, 20), StockStatus::Critical);
        assert_eq!(StockStatus::classify(20, 20), StockStatus::Low);
        assert_eq!(StockStatus::classify(29, 20), StockStatus::Low);
        assert_eq!(StockStatus::classify(30, 20), StockStatus::Good);
        assert_eq!(StockStatus::classify(45, 10), StockStatus::Good);
        // 1.5 x 3 = 4.5, so 4 is Low
        assert_eq!(StockStatus::classify(4, 3), StockStatus::Low);
        assert_eq!(StockStatus::classify(5, 3), StockStatus::Good);
        assert_eq!(StockStatus::classify(0, 0), StockStatus::Good);
    }

    #[test]
    fn test_inventory_overview() {
        let agents = ClinicAgents::with_defaults();
        let rows = inventory_overview(&agents, "doctor").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "ITEM_001");
        assert_eq!(rows[0].status, StockStatus::Critical);
        assert_eq!(rows[0].reorder_level, 20);
        assert_eq!(rows[1].status, StockStatus::Good);
        assert_eq!(rows[1].supplier, "SafeHands Ltd");
    }

    #[test]
    fn test_finance_summary() {
        let agents = ClinicAgents::with_defaults();
        let summary = finance_summary(&agents, "doctor").unwrap();
        assert_eq!(summary.total_revenue, 5000);
        assert_eq!(summary.total_pending, 7000);
        assert_eq!(summary.invoices.len(), 3);
    }

    #[test]
    fn test_read_models_are_gated() {
        let agents = ClinicAgents::with_defaults();
        assert!(matches!(
            inventory_overview(&agents, "patient"),
            Err(Error::AccessDenied(_))
        ));
        let err = finance_summary(&agents, "receptionist").unwrap_err();
        assert_eq!(err.code(), "E200");
    }
}
