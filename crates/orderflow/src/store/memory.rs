//! In-memory order store.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use crate::model::{Order, Workflow};

use super::{OrderFilter, OrderStore, StoreError};

/// Thread-safe order store backed by `RwLock`-guarded maps.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<BTreeMap<String, Order>>,
    archived: RwLock<HashMap<String, Vec<Workflow>>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_orders(orders: impl IntoIterator<Item = Order>) -> Self {
        let store = Self::new();
        if let Ok(mut map) = store.orders.write() {
            for order in orders {
                map.insert(order.id.clone(), order);
            }
        }
        store
    }

    /// Inserts or replaces an order record.
    pub fn insert_order(&self, order: Order) -> Result<(), StoreError> {
        let mut orders = self.orders.write().map_err(|_| StoreError::LockPoisoned)?;
        orders.insert(order.id.clone(), order);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.orders.read().map(|o| o.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OrderStore for InMemoryOrderStore {
    fn get_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, StoreError> {
        let orders = self.orders.read().map_err(|_| StoreError::LockPoisoned)?;
        let limit = filter.limit.unwrap_or(usize::MAX);
        Ok(orders
            .values()
            .filter(|o| filter.matches(o))
            .take(limit)
            .cloned()
            .collect())
    }

    fn get_order(&self, order_id: &str) -> Result<Order, StoreError> {
        let orders = self.orders.read().map_err(|_| StoreError::LockPoisoned)?;
        orders
            .get(order_id)
            .cloned()
            .ok_or_else(|| StoreError::OrderNotFound(order_id.to_string()))
    }

    fn get_workflow(&self, order_id: &str) -> Result<Option<Workflow>, StoreError> {
        Ok(self.get_order(order_id)?.workflow)
    }

    fn save_workflow(&self, order_id: &str, workflow: Workflow) -> Result<(), StoreError> {
        let mut orders = self.orders.write().map_err(|_| StoreError::LockPoisoned)?;
        let order = orders
            .get_mut(order_id)
            .ok_or_else(|| StoreError::OrderNotFound(order_id.to_string()))?;

        check_version(order, &workflow)?;
        order.workflow = Some(workflow);
        Ok(())
    }

    fn update_status(&self, order_id: &str, raw_status: &str) -> Result<(), StoreError> {
        let mut orders = self.orders.write().map_err(|_| StoreError::LockPoisoned)?;
        let order = orders
            .get_mut(order_id)
            .ok_or_else(|| StoreError::OrderNotFound(order_id.to_string()))?;
        order.raw_status = raw_status.to_string();
        Ok(())
    }

    fn archive_workflow(&self, order_id: &str) -> Result<(), StoreError> {
        let mut orders = self.orders.write().map_err(|_| StoreError::LockPoisoned)?;
        let order = orders
            .get_mut(order_id)
            .ok_or_else(|| StoreError::OrderNotFound(order_id.to_string()))?;

        if let Some(workflow) = order.workflow.take() {
            let mut archived = self.archived.write().map_err(|_| StoreError::LockPoisoned)?;
            archived
                .entry(order_id.to_string())
                .or_default()
                .push(workflow);
            log::info!("Archived workflow for order {}", order_id);
        }
        Ok(())
    }

    fn archived_workflows(&self, order_id: &str) -> Result<Vec<Workflow>, StoreError> {
        let archived = self.archived.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(archived.get(order_id).cloned().unwrap_or_default())
    }

    fn commit_status(
        &self,
        order_id: &str,
        raw_status: &str,
        workflow: Option<Workflow>,
        archive: bool,
    ) -> Result<(), StoreError> {
        // Both locks are held for the whole commit, orders first as in
        // `archive_workflow`.
        let mut orders = self.orders.write().map_err(|_| StoreError::LockPoisoned)?;
        let mut archived = self.archived.write().map_err(|_| StoreError::LockPoisoned)?;
        let order = orders
            .get_mut(order_id)
            .ok_or_else(|| StoreError::OrderNotFound(order_id.to_string()))?;

        if let Some(next) = &workflow {
            check_version(order, next)?;
        }

        if let Some(next) = workflow {
            order.workflow = Some(next);
        }
        order.raw_status = raw_status.to_string();
        if archive {
            if let Some(done) = order.workflow.take() {
                archived.entry(order_id.to_string()).or_default().push(done);
                log::info!("Archived workflow for order {}", order_id);
            }
        }
        Ok(())
    }
}

/// A stored workflow at version `v` only accepts `v + 1`.
fn check_version(order: &Order, next: &Workflow) -> Result<(), StoreError> {
    if let Some(current) = &order.workflow {
        let expected = current.version + 1;
        if next.version != expected {
            return Err(StoreError::VersionConflict {
                order_id: order.id.clone(),
                expected,
                found: next.version,
            });
        }
    }
    Ok(())
}
