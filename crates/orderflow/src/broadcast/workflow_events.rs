//! Workflow event broadcaster for real-time stage and checklist updates.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::model::{ChecklistKind, PipelineStage, StepState};

/// What changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkflowEventKind {
    /// A checklist step changed state.
    StepChanged {
        checklist: ChecklistKind,
        step: String,
        state: StepState,
    },
    /// The order moved to a different pipeline stage.
    StageChanged {
        from: PipelineStage,
        to: PipelineStage,
        #[serde(rename = "rawStatus")]
        raw_status: String,
    },
    /// The order was delivered and its workflow archived.
    WorkflowArchived,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowEvent {
    pub id: Uuid,
    pub order_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: WorkflowEventKind,
}

impl WorkflowEvent {
    pub fn new(order_id: &str, kind: WorkflowEventKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id: order_id.to_string(),
            timestamp: Utc::now(),
            kind,
        }
    }
}

#[derive(Clone)]
pub struct WorkflowEventBroadcaster {
    sender: broadcast::Sender<WorkflowEvent>,
}

impl WorkflowEventBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn send(&self, event: WorkflowEvent) {
        // No active receivers is fine
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WorkflowEvent> {
        self.sender.subscribe()
    }

    pub fn step_changed(
        &self,
        order_id: &str,
        checklist: ChecklistKind,
        step: &str,
        state: StepState,
    ) {
        self.send(WorkflowEvent::new(
            order_id,
            WorkflowEventKind::StepChanged {
                checklist,
                step: step.to_string(),
                state,
            },
        ));
    }

    pub fn stage_changed(
        &self,
        order_id: &str,
        from: PipelineStage,
        to: PipelineStage,
        raw_status: &str,
    ) {
        self.send(WorkflowEvent::new(
            order_id,
            WorkflowEventKind::StageChanged {
                from,
                to,
                raw_status: raw_status.to_string(),
            },
        ));
    }

    pub fn workflow_archived(&self, order_id: &str) {
        self.send(WorkflowEvent::new(order_id, WorkflowEventKind::WorkflowArchived));
    }
}

impl Default for WorkflowEventBroadcaster {
    fn default() -> Self {
        Self::new(256)
    }
}

impl std::fmt::Debug for WorkflowEventBroadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowEventBroadcaster")
            .field("receivers", &self.sender.receiver_count())
            .finish()
    }
}
