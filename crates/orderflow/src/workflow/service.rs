//! Single-writer mutation path for order workflows.
//!
//! Every mutation of an order runs under that order's lock and is checked
//! again by the store's optimistic version check, so two departments
//! updating the same checklist cannot both pass the gating rule.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use tracing::{debug, info, info_span, warn};

use crate::broadcast::{WorkflowEvent, WorkflowEventBroadcaster};
use crate::config::schema::ChecklistTemplates;
use crate::model::{ChecklistKind, PipelineStage, StepOutcome, Workflow, WorkflowStepKey};
use crate::registry::StatusRegistry;
use crate::store::OrderStore;

use super::engine::{self, AutoAdvance};
use super::error::WorkflowError;

/// How a posted status relates to the order's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    /// Ordinary progress; moving to an earlier stage is rejected.
    Normal,
    /// Explicit correction; the order may move to an earlier stage.
    Correction,
}

/// Outcome of [`WorkflowService::record_status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub order_id: String,
    pub previous_stage: PipelineStage,
    pub stage: PipelineStage,
    /// Checklist step passed because of this status.
    pub advanced_step: Option<WorkflowStepKey>,
    /// True when the order reached `Delivered` and its workflow was archived.
    pub archived: bool,
}

pub struct WorkflowService<S: OrderStore> {
    store: Arc<S>,
    registry: Arc<StatusRegistry>,
    templates: ChecklistTemplates,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    events: WorkflowEventBroadcaster,
}

impl<S: OrderStore> WorkflowService<S> {
    pub fn new(store: Arc<S>, registry: Arc<StatusRegistry>, templates: ChecklistTemplates) -> Self {
        Self {
            store,
            registry,
            templates,
            locks: Mutex::new(HashMap::new()),
            events: WorkflowEventBroadcaster::default(),
        }
    }

    pub fn with_broadcaster(mut self, events: WorkflowEventBroadcaster) -> Self {
        self.events = events;
        self
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn registry(&self) -> &Arc<StatusRegistry> {
        &self.registry
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WorkflowEvent> {
        self.events.subscribe()
    }

    /// Creates the checklist workflow when production accepts an order.
    /// Delivered orders and orders with archived history are refused.
    pub fn start_workflow(&self, order_id: &str) -> Result<Workflow, WorkflowError> {
        self.with_order_lock(order_id, || {
            if self.store.get_workflow(order_id)?.is_some() {
                return Err(WorkflowError::WorkflowExists(order_id.to_string()));
            }
            let order = self.store.get_order(order_id)?;
            if engine::current_stage(&self.registry, &order, None) == PipelineStage::Delivered
                || !self.store.archived_workflows(order_id)?.is_empty()
            {
                return Err(WorkflowError::WorkflowArchived(order_id.to_string()));
            }

            let workflow = Workflow::from_templates(order_id, &self.templates);
            self.store.save_workflow(order_id, workflow.clone())?;
            info!(order_id, "Workflow started");
            Ok(workflow)
        })
    }

    /// Resolves the gating step of a checklist.
    pub fn advance_step(
        &self,
        order_id: &str,
        checklist: ChecklistKind,
        step_key: &str,
        outcome: StepOutcome,
    ) -> Result<Workflow, WorkflowError> {
        let _span = info_span!("workflow.advance", order_id, %checklist, step_key).entered();
        self.mutate_workflow(order_id, checklist, step_key, |workflow| {
            engine::advance(workflow, checklist, step_key, outcome)
        })
    }

    /// Marks the gating step of a checklist as in progress.
    pub fn activate_step(
        &self,
        order_id: &str,
        checklist: ChecklistKind,
        step_key: &str,
    ) -> Result<Workflow, WorkflowError> {
        let _span = info_span!("workflow.activate", order_id, %checklist, step_key).entered();
        self.mutate_workflow(order_id, checklist, step_key, |workflow| {
            engine::activate(workflow, checklist, step_key)
        })
    }

    pub fn attach_evidence(
        &self,
        order_id: &str,
        checklist: ChecklistKind,
        step_key: &str,
        evidence: &str,
    ) -> Result<Workflow, WorkflowError> {
        self.with_order_lock(order_id, || {
            let workflow = self.require_workflow(order_id)?;
            let next = engine::attach_evidence(&workflow, checklist, step_key, evidence)?;
            self.store.save_workflow(order_id, next.clone())?;
            Ok(next)
        })
    }

    /// Posts a department status: passes the mapped checklist step, guards
    /// against stage regression, and archives the workflow on delivery.
    /// Nothing is written when any check fails.
    pub fn record_status(
        &self,
        order_id: &str,
        raw_status: &str,
        change: StatusChange,
    ) -> Result<StatusUpdate, WorkflowError> {
        let _span = info_span!("workflow.record_status", order_id).entered();
        self.with_order_lock(order_id, || {
            let order = self.store.get_order(order_id)?;
            let workflow = self.store.get_workflow(order_id)?;
            let previous_stage =
                engine::current_stage(&self.registry, &order, workflow.as_ref());

            let (next_workflow, advanced_step) = match &workflow {
                Some(current) => match engine::apply_status(current, &self.registry, raw_status)? {
                    AutoAdvance::Advanced { step, workflow } => (Some(workflow), Some(step)),
                    AutoAdvance::AlreadyPassed { step } => {
                        debug!(order_id, %step, "Step already passed");
                        (None, None)
                    }
                    AutoAdvance::NotMapped => (None, None),
                },
                None => (None, None),
            };

            let effective = next_workflow.as_ref().or(workflow.as_ref());
            let stage = engine::stage_for_status(&self.registry, raw_status, effective);

            if !self.registry.contains(raw_status) {
                warn!(order_id, raw_status, "Unrecognized status, treated as {}", stage);
            }

            if stage < previous_stage {
                if change == StatusChange::Normal {
                    return Err(WorkflowError::StageRegression {
                        order_id: order_id.to_string(),
                        from: previous_stage,
                        to: stage,
                    });
                }
                info!(order_id, from = %previous_stage, to = %stage, "Stage corrected");
            }

            let archived = stage == PipelineStage::Delivered && effective.is_some();
            self.store
                .commit_status(order_id, raw_status, next_workflow.clone(), archived)?;

            if let (Some(step), Some(next)) = (&advanced_step, &next_workflow) {
                self.emit_step(order_id, next, step.checklist, &step.step);
            }
            if stage != previous_stage {
                self.events
                    .stage_changed(order_id, previous_stage, stage, raw_status);
            }
            if archived {
                self.events.workflow_archived(order_id);
            }

            Ok(StatusUpdate {
                order_id: order_id.to_string(),
                previous_stage,
                stage,
                advanced_step,
                archived,
            })
        })
    }

    fn mutate_workflow<F>(
        &self,
        order_id: &str,
        checklist: ChecklistKind,
        step_key: &str,
        transition: F,
    ) -> Result<Workflow, WorkflowError>
    where
        F: FnOnce(&Workflow) -> Result<Workflow, WorkflowError>,
    {
        self.with_order_lock(order_id, || {
            let order = self.store.get_order(order_id)?;
            let workflow = self.require_workflow(order_id)?;
            let previous_stage = engine::current_stage(&self.registry, &order, Some(&workflow));

            let next = transition(&workflow)?;
            if next == workflow {
                return Ok(next);
            }
            self.store.save_workflow(order_id, next.clone())?;

            self.emit_step(order_id, &next, checklist, step_key);
            let stage = engine::current_stage(&self.registry, &order, Some(&next));
            if stage != previous_stage {
                self.events
                    .stage_changed(order_id, previous_stage, stage, &order.raw_status);
            }

            Ok(next)
        })
    }

    fn require_workflow(&self, order_id: &str) -> Result<Workflow, WorkflowError> {
        self.store
            .get_workflow(order_id)?
            .ok_or_else(|| WorkflowError::NoWorkflow(order_id.to_string()))
    }

    fn emit_step(&self, order_id: &str, workflow: &Workflow, checklist: ChecklistKind, key: &str) {
        if let Some(step) = workflow.checklist(checklist).step(key) {
            self.events.step_changed(order_id, checklist, key, step.state);
        }
    }

    fn with_order_lock<T, F>(&self, order_id: &str, f: F) -> Result<T, WorkflowError>
    where
        F: FnOnce() -> Result<T, WorkflowError>,
    {
        // Only orders the store knows get an entry in the lock table.
        self.store.get_order(order_id)?;
        let lock = {
            let mut locks = self.locks.lock().map_err(|_| WorkflowError::LockPoisoned)?;
            Arc::clone(locks.entry(order_id.to_string()).or_default())
        };
        let _guard = lock.lock().map_err(|_| WorkflowError::LockPoisoned)?;
        f()
    }
}
