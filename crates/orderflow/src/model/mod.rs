pub mod order;
pub mod stage;
pub mod workflow;

pub use order::Order;
pub use stage::PipelineStage;
pub use workflow::{
    Checklist, ChecklistError, ChecklistKind, StepOutcome, StepState, Workflow, WorkflowStep,
    WorkflowStepKey,
};
