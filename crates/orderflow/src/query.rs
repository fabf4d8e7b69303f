//! Read-side entry point for dashboards and order views.
//!
//! Every method is a pure function of its arguments and the registry, so
//! repeated calls with the same input give the same output.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug_span, warn};

use crate::config::RegistryConfig;
use crate::error::ConfigError;
use crate::model::{ChecklistKind, Order, PipelineStage, WorkflowStep};
use crate::pipeline::{PipelineAggregator, PipelineSnapshot, UrgentOrder};
use crate::registry::StatusRegistry;
use crate::urgency::{DueDateClass, UrgencyClassifier};
use crate::workflow::order_stage;

/// One dot on the five-stage progress indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageMarker {
    pub stage: PipelineStage,
    pub label: String,
    /// At or before the order's current stage.
    pub reached: bool,
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistView {
    pub kind: ChecklistKind,
    /// Gating step index, or the step count once complete.
    pub current_index: usize,
    pub complete: bool,
    pub steps: Vec<WorkflowStep>,
}

/// Everything a stepper widget needs for one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepperView {
    pub order_id: String,
    pub stage: PipelineStage,
    pub stage_index: usize,
    pub stages: Vec<StageMarker>,
    /// Empty until a workflow is attached.
    pub checklists: Vec<ChecklistView>,
}

#[derive(Debug, Clone)]
pub struct QueryFacade {
    registry: Arc<StatusRegistry>,
    classifier: UrgencyClassifier,
}

impl QueryFacade {
    pub fn new(registry: Arc<StatusRegistry>, classifier: UrgencyClassifier) -> Self {
        Self {
            registry,
            classifier,
        }
    }

    /// Builds the registry and classifier from a loaded configuration.
    pub fn from_config(config: &RegistryConfig) -> Result<Self, ConfigError> {
        let registry = StatusRegistry::from_config(config)?;
        Ok(Self::new(
            Arc::new(registry),
            UrgencyClassifier::new(config.offset()),
        ))
    }

    pub fn registry(&self) -> &StatusRegistry {
        &self.registry
    }

    pub fn classifier(&self) -> UrgencyClassifier {
        self.classifier
    }

    /// Stage counts for the dashboard, with urgent badges as of `now`.
    pub fn snapshot(&self, now: DateTime<Utc>, orders: &[Order]) -> PipelineSnapshot {
        let _span = debug_span!("query.snapshot", orders = orders.len()).entered();

        for (status, count) in self.unrecognized_statuses(orders) {
            warn!(status = %status, count, "Unrecognized status counted as order confirmed");
        }

        self.aggregator().aggregate_at(now, orders)
    }

    /// Triage list: active orders due today, tomorrow or overdue.
    pub fn urgent(&self, now: DateTime<Utc>, orders: &[Order]) -> Vec<UrgentOrder> {
        let _span = debug_span!("query.urgent", orders = orders.len()).entered();
        self.aggregator().urgent_subset(now, orders)
    }

    pub fn classify(&self, now: DateTime<Utc>, due_date: Option<DateTime<Utc>>) -> DueDateClass {
        self.classifier.classify(now, due_date)
    }

    pub fn stage_of(&self, order: &Order) -> PipelineStage {
        order_stage(&self.registry, order)
    }

    pub fn stepper(&self, order: &Order) -> StepperView {
        let stage = self.stage_of(order);
        let stages = PipelineStage::ALL
            .iter()
            .map(|&s| StageMarker {
                stage: s,
                label: s.label().to_string(),
                reached: s <= stage,
                current: s == stage,
            })
            .collect();

        let checklists = order
            .workflow
            .as_ref()
            .map(|workflow| {
                ChecklistKind::ALL
                    .iter()
                    .map(|&kind| {
                        let list = workflow.checklist(kind);
                        ChecklistView {
                            kind,
                            current_index: list.current_index(),
                            complete: list.is_complete(),
                            steps: list.steps().to_vec(),
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        StepperView {
            order_id: order.id.clone(),
            stage,
            stage_index: stage.index(),
            stages,
            checklists,
        }
    }

    /// Raw statuses missing from the registry, most frequent first.
    pub fn unrecognized_statuses(&self, orders: &[Order]) -> Vec<(String, usize)> {
        self.registry
            .unrecognized(orders.iter().map(|o| o.raw_status.as_str()))
    }

    fn aggregator(&self) -> PipelineAggregator<'_> {
        PipelineAggregator::new(&self.registry, self.classifier)
    }
}
