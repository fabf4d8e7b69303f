use thiserror::Error;

use crate::model::{ChecklistKind, PipelineStage};
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum WorkflowError {
    /// A caller tried to skip or reorder checklist steps.
    #[error(
        "Sequence violation in {checklist} checklist: step '{requested}' is not the next open step (expected {})",
        .expected.as_deref().unwrap_or("none, checklist complete")
    )]
    SequenceViolation {
        checklist: ChecklistKind,
        requested: String,
        expected: Option<String>,
    },

    #[error("Unknown step '{key}' in {checklist} checklist")]
    UnknownStep { checklist: ChecklistKind, key: String },

    #[error("Order {order_id} would regress from {from} to {to}")]
    StageRegression {
        order_id: String,
        from: PipelineStage,
        to: PipelineStage,
    },

    #[error("Order {0} has no workflow")]
    NoWorkflow(String),

    #[error("Order {0} already has a workflow")]
    WorkflowExists(String),

    /// The order was delivered; its workflow lives in the archive.
    #[error("Order {0} was delivered and its workflow archived")]
    WorkflowArchived(String),

    #[error("Order lock poisoned")]
    LockPoisoned,

    #[error(transparent)]
    Store(#[from] StoreError),
}
