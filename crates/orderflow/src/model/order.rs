//! Order records as provided by the order store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::workflow::Workflow;

/// A made-to-order job tracked across departments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Opaque order identifier.
    pub id: String,
    /// Customer reference.
    pub customer: String,
    /// Product description.
    pub product: String,
    /// Free-text status last posted by any department.
    pub raw_status: String,
    /// Due date, if one was agreed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    /// When sales created the order.
    pub created_at: DateTime<Utc>,
    /// Checklist workflow, present once production accepted the order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow: Option<Workflow>,
}

impl Order {
    pub fn new(
        id: impl Into<String>,
        customer: impl Into<String>,
        product: impl Into<String>,
        raw_status: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            customer: customer.into(),
            product: product.into(),
            raw_status: raw_status.into(),
            due_date: None,
            created_at,
            workflow: None,
        }
    }

    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_workflow(mut self, workflow: Workflow) -> Self {
        self.workflow = Some(workflow);
        self
    }
}
