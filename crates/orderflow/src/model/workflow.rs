//! Checklist workflow attached to an order once production accepts it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::schema::{ChecklistTemplates, StepTemplate};

/// The three checklists every workflow carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecklistKind {
    Qc,
    Shipping,
    Warehouse,
}

impl ChecklistKind {
    pub const ALL: [ChecklistKind; 3] = [
        ChecklistKind::Qc,
        ChecklistKind::Shipping,
        ChecklistKind::Warehouse,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ChecklistKind::Qc => "qc",
            ChecklistKind::Shipping => "shipping",
            ChecklistKind::Warehouse => "warehouse",
        }
    }
}

impl std::fmt::Display for ChecklistKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of a single checklist step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    #[default]
    Pending,
    Active,
    Passed,
    Failed,
}

/// Result a department reports for a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    Passed,
    Failed,
}

impl From<StepOutcome> for StepState {
    fn from(outcome: StepOutcome) -> Self {
        match outcome {
            StepOutcome::Passed => StepState::Passed,
            StepOutcome::Failed => StepState::Failed,
        }
    }
}

/// Reference to one step inside one checklist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkflowStepKey {
    pub checklist: ChecklistKind,
    #[serde(rename = "key")]
    pub step: String,
}

impl WorkflowStepKey {
    pub fn new(checklist: ChecklistKind, step: impl Into<String>) -> Self {
        Self {
            checklist,
            step: step.into(),
        }
    }
}

impl std::fmt::Display for WorkflowStepKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.checklist, self.step)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStep {
    /// Unique within its checklist.
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub state: StepState,
    /// Reference to supporting material, e.g. an uploaded photo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
}

impl WorkflowStep {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            state: StepState::Pending,
            evidence: None,
        }
    }
}

impl From<&StepTemplate> for WorkflowStep {
    fn from(template: &StepTemplate) -> Self {
        WorkflowStep::new(template.key.clone(), template.label.clone())
    }
}

/// Why a stored step list is not a valid checklist.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChecklistError {
    #[error("Duplicate step key '{0}'")]
    DuplicateKey(String),

    /// Only the gating step may have left `Pending`.
    #[error("Step '{key}' is {state:?} but an earlier step has not passed")]
    StepOutOfOrder { key: String, state: StepState },
}

/// An ordered sequence of steps passed one at a time.
///
/// Deserialized lists are checked: keys are unique and every step after the
/// gating step is still `Pending`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<WorkflowStep>", into = "Vec<WorkflowStep>")]
pub struct Checklist {
    steps: Vec<WorkflowStep>,
}

impl TryFrom<Vec<WorkflowStep>> for Checklist {
    type Error = ChecklistError;

    fn try_from(steps: Vec<WorkflowStep>) -> Result<Self, Self::Error> {
        let mut seen = HashSet::new();
        for step in &steps {
            if !seen.insert(step.key.as_str()) {
                return Err(ChecklistError::DuplicateKey(step.key.clone()));
            }
        }

        let checklist = Self { steps };
        if let Some(gate) = checklist.gate_index() {
            if let Some(step) = checklist.steps[gate + 1..]
                .iter()
                .find(|s| s.state != StepState::Pending)
            {
                return Err(ChecklistError::StepOutOfOrder {
                    key: step.key.clone(),
                    state: step.state,
                });
            }
        }
        Ok(checklist)
    }
}

impl From<Checklist> for Vec<WorkflowStep> {
    fn from(checklist: Checklist) -> Self {
        checklist.steps
    }
}

impl Checklist {
    pub fn new(steps: Vec<WorkflowStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[WorkflowStep] {
        &self.steps
    }

    pub(crate) fn steps_mut(&mut self) -> &mut [WorkflowStep] {
        &mut self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.key == key)
    }

    pub fn step(&self, key: &str) -> Option<&WorkflowStep> {
        self.steps.iter().find(|s| s.key == key)
    }

    /// Index of the first step that has not passed. This is the only step
    /// that may be activated or resolved; `None` once the checklist is
    /// complete.
    pub fn gate_index(&self) -> Option<usize> {
        self.steps.iter().position(|s| s.state != StepState::Passed)
    }

    /// Position shown on a stepper widget: the gating step, or the step
    /// count once everything has passed.
    pub fn current_index(&self) -> usize {
        self.gate_index().unwrap_or(self.steps.len())
    }

    /// True once the first step has left `Pending`.
    pub fn has_started(&self) -> bool {
        self.steps
            .first()
            .is_some_and(|s| s.state != StepState::Pending)
    }

    /// Complete only when the last step has passed. An empty checklist is
    /// never complete.
    pub fn is_complete(&self) -> bool {
        !self.steps.is_empty() && self.gate_index().is_none()
    }
}

/// The checklist sub-record attached to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub order_id: String,
    pub qc_steps: Checklist,
    pub shipping_steps: Checklist,
    pub warehouse_steps: Checklist,
    /// Bumped on every accepted change; the store uses it for optimistic
    /// concurrency.
    #[serde(default)]
    pub version: u64,
}

impl Workflow {
    pub fn new(
        order_id: impl Into<String>,
        qc_steps: Checklist,
        shipping_steps: Checklist,
        warehouse_steps: Checklist,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            qc_steps,
            shipping_steps,
            warehouse_steps,
            version: 0,
        }
    }

    /// Instantiates all three checklists from configured templates, every
    /// step pending.
    pub fn from_templates(order_id: impl Into<String>, templates: &ChecklistTemplates) -> Self {
        let build = |steps: &[StepTemplate]| Checklist::new(steps.iter().map(Into::into).collect());
        Self::new(
            order_id,
            build(&templates.qc),
            build(&templates.shipping),
            build(&templates.warehouse),
        )
    }

    pub fn checklist(&self, kind: ChecklistKind) -> &Checklist {
        match kind {
            ChecklistKind::Qc => &self.qc_steps,
            ChecklistKind::Shipping => &self.shipping_steps,
            ChecklistKind::Warehouse => &self.warehouse_steps,
        }
    }

    pub(crate) fn checklist_mut(&mut self, kind: ChecklistKind) -> &mut Checklist {
        match kind {
            ChecklistKind::Qc => &mut self.qc_steps,
            ChecklistKind::Shipping => &mut self.shipping_steps,
            ChecklistKind::Warehouse => &mut self.warehouse_steps,
        }
    }
}
