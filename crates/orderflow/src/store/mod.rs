//! Order store abstraction.
//!
//! The engine depends only on [`OrderStore`]; persistence technology is the
//! implementor's concern. [`InMemoryOrderStore`] is the reference
//! implementation used by tests and embedders without a database.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::model::{Order, Workflow};

pub mod error;
pub mod memory;

pub use error::StoreError;
pub use memory::InMemoryOrderStore;

/// Source of order records and sink for status and workflow updates.
pub trait OrderStore: Send + Sync {
    /// Orders matching `filter`, ordered by id.
    fn get_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, StoreError>;

    fn get_order(&self, order_id: &str) -> Result<Order, StoreError>;

    /// The live workflow attached to an order, if production accepted it.
    fn get_workflow(&self, order_id: &str) -> Result<Option<Workflow>, StoreError>;

    /// Stores a workflow. When one is already stored at version `v`, only
    /// version `v + 1` is accepted.
    fn save_workflow(&self, order_id: &str, workflow: Workflow) -> Result<(), StoreError>;

    fn update_status(&self, order_id: &str, raw_status: &str) -> Result<(), StoreError>;

    /// Detaches the live workflow and keeps it as history.
    fn archive_workflow(&self, order_id: &str) -> Result<(), StoreError>;

    /// Workflows archived for an order, oldest first.
    fn archived_workflows(&self, order_id: &str) -> Result<Vec<Workflow>, StoreError>;

    /// Applies a status post as one unit: the optional workflow save (same
    /// version rule as [`OrderStore::save_workflow`]), the status update and
    /// the optional archive. Either every part is applied or none is.
    fn commit_status(
        &self,
        order_id: &str,
        raw_status: &str,
        workflow: Option<Workflow>,
        archive: bool,
    ) -> Result<(), StoreError>;
}

/// Filter for [`OrderStore::get_orders`].
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFilter {
    pub customer: Option<String>,
    /// Only orders due strictly before this instant.
    pub due_before: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        if let Some(customer) = &self.customer {
            if &order.customer != customer {
                return false;
            }
        }
        if let Some(due_before) = self.due_before {
            match order.due_date {
                Some(due) if due < due_before => {}
                _ => return false,
            }
        }
        true
    }
}
