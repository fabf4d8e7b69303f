//! Checklist gating and stage derivation.
//!
//! Every transition is a pure function from a workflow to a new workflow.
//! A rejected transition returns an error and leaves the input untouched.

use crate::model::{
    ChecklistKind, Order, PipelineStage, StepOutcome, StepState, Workflow, WorkflowStepKey,
};
use crate::registry::StatusRegistry;

use super::error::WorkflowError;

/// Result of posting a raw status against a workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoAdvance {
    /// The status is not tied to a checklist step.
    NotMapped,
    /// The mapped step was passed; carries the updated workflow.
    Advanced {
        step: WorkflowStepKey,
        workflow: Workflow,
    },
    /// The mapped step had already passed.
    AlreadyPassed { step: WorkflowStepKey },
}

/// Resolves `step_key`, the first non-passed step of `checklist`, with
/// `outcome`. On `Passed` the following step becomes active.
pub fn advance(
    workflow: &Workflow,
    checklist: ChecklistKind,
    step_key: &str,
    outcome: StepOutcome,
) -> Result<Workflow, WorkflowError> {
    let index = gate(workflow, checklist, step_key)?;

    let mut next = workflow.clone();
    let steps = next.checklist_mut(checklist).steps_mut();
    steps[index].state = outcome.into();
    if outcome == StepOutcome::Passed {
        if let Some(following) = steps.get_mut(index + 1) {
            following.state = StepState::Active;
        }
    }
    next.version += 1;

    log::debug!(
        "Order {}: {}.{} -> {:?} (version {})",
        next.order_id,
        checklist,
        step_key,
        outcome,
        next.version
    );

    Ok(next)
}

/// Marks the gating step active: work has started on it, or a failed step
/// is re-opened for rework. Activating an already active step is a no-op.
pub fn activate(
    workflow: &Workflow,
    checklist: ChecklistKind,
    step_key: &str,
) -> Result<Workflow, WorkflowError> {
    let index = gate(workflow, checklist, step_key)?;

    if workflow.checklist(checklist).steps()[index].state == StepState::Active {
        return Ok(workflow.clone());
    }

    let mut next = workflow.clone();
    next.checklist_mut(checklist).steps_mut()[index].state = StepState::Active;
    next.version += 1;
    Ok(next)
}

/// Records an evidence reference on any existing step, regardless of its
/// state.
pub fn attach_evidence(
    workflow: &Workflow,
    checklist: ChecklistKind,
    step_key: &str,
    evidence: impl Into<String>,
) -> Result<Workflow, WorkflowError> {
    let index = workflow
        .checklist(checklist)
        .position(step_key)
        .ok_or_else(|| WorkflowError::UnknownStep {
            checklist,
            key: step_key.to_string(),
        })?;

    let mut next = workflow.clone();
    next.checklist_mut(checklist).steps_mut()[index].evidence = Some(evidence.into());
    next.version += 1;
    Ok(next)
}

/// Passes the checklist step a raw status is tied to, if any.
pub fn apply_status(
    workflow: &Workflow,
    registry: &StatusRegistry,
    raw_status: &str,
) -> Result<AutoAdvance, WorkflowError> {
    let Some(step) = registry.step_key_of(raw_status) else {
        return Ok(AutoAdvance::NotMapped);
    };

    let already_passed = workflow
        .checklist(step.checklist)
        .step(&step.step)
        .is_some_and(|s| s.state == StepState::Passed);
    if already_passed {
        return Ok(AutoAdvance::AlreadyPassed { step: step.clone() });
    }

    let next = advance(workflow, step.checklist, &step.step, StepOutcome::Passed)?;
    Ok(AutoAdvance::Advanced {
        step: step.clone(),
        workflow: next,
    })
}

/// Stage reported for an order given its raw status and workflow.
///
/// The registry decides the stage, except that an order in production
/// whose shipping checklist has started reports `InTransit`.
pub fn current_stage(
    registry: &StatusRegistry,
    order: &Order,
    workflow: Option<&Workflow>,
) -> PipelineStage {
    stage_for_status(registry, &order.raw_status, workflow)
}

/// [`current_stage`] using the workflow attached to the order.
pub fn order_stage(registry: &StatusRegistry, order: &Order) -> PipelineStage {
    current_stage(registry, order, order.workflow.as_ref())
}

pub(crate) fn stage_for_status(
    registry: &StatusRegistry,
    raw_status: &str,
    workflow: Option<&Workflow>,
) -> PipelineStage {
    let stage = registry.stage_of(raw_status);
    let shipping_started = workflow.is_some_and(|w| w.shipping_steps.has_started());

    if stage == PipelineStage::InProduction && shipping_started {
        PipelineStage::InTransit
    } else {
        stage
    }
}

fn gate(
    workflow: &Workflow,
    checklist: ChecklistKind,
    step_key: &str,
) -> Result<usize, WorkflowError> {
    let list = workflow.checklist(checklist);
    let position = list
        .position(step_key)
        .ok_or_else(|| WorkflowError::UnknownStep {
            checklist,
            key: step_key.to_string(),
        })?;

    let gate = list.gate_index();
    if gate != Some(position) {
        return Err(WorkflowError::SequenceViolation {
            checklist,
            requested: step_key.to_string(),
            expected: gate.map(|i| list.steps()[i].key.clone()),
        });
    }

    Ok(position)
}
