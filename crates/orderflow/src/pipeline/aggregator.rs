use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use super::snapshot::{PipelineSnapshot, UrgentOrder};
use crate::model::Order;
use crate::registry::StatusRegistry;
use crate::urgency::UrgencyClassifier;
use crate::workflow::order_stage;

/// Groups orders by stage and picks out the ones needing attention.
///
/// Borrows the registry; every call recomputes from the given orders.
#[derive(Debug, Clone, Copy)]
pub struct PipelineAggregator<'a> {
    registry: &'a StatusRegistry,
    classifier: UrgencyClassifier,
}

impl<'a> PipelineAggregator<'a> {
    pub fn new(registry: &'a StatusRegistry, classifier: UrgencyClassifier) -> Self {
        Self {
            registry,
            classifier,
        }
    }

    /// Stage counts without urgency badges.
    pub fn aggregate(&self, orders: &[Order]) -> PipelineSnapshot {
        let mut counts = [0usize; 5];
        for order in orders {
            counts[order_stage(self.registry, order).index()] += 1;
        }
        PipelineSnapshot::from_counts(counts, [0; 5])
    }

    /// Stage counts including the number of urgent orders per stage.
    pub fn aggregate_at(&self, now: DateTime<Utc>, orders: &[Order]) -> PipelineSnapshot {
        let mut counts = [0usize; 5];
        let mut urgent = [0usize; 5];
        for order in orders {
            let stage = order_stage(self.registry, order);
            counts[stage.index()] += 1;
            if self.classifier.classify(now, order.due_date).is_urgent() {
                urgent[stage.index()] += 1;
            }
        }
        PipelineSnapshot::from_counts(counts, urgent)
    }

    /// Orders in an active stage that are due today, tomorrow or overdue.
    ///
    /// Sorted by due date, then creation time, then id.
    pub fn urgent_subset(&self, now: DateTime<Utc>, orders: &[Order]) -> Vec<UrgentOrder> {
        let mut urgent: Vec<UrgentOrder> = orders
            .iter()
            .filter_map(|order| {
                let stage = order_stage(self.registry, order);
                if !stage.is_active() {
                    return None;
                }
                let urgency = self.classifier.classify(now, order.due_date);
                urgency.is_urgent().then(|| UrgentOrder {
                    order: order.clone(),
                    stage,
                    urgency,
                })
            })
            .collect();

        urgent.sort_by(|a, b| triage_order(&a.order, &b.order));
        urgent
    }
}

fn triage_order(a: &Order, b: &Order) -> Ordering {
    a.due_date
        .cmp(&b.due_date)
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}
