pub mod broadcast;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod query;
pub mod registry;
pub mod store;
pub mod urgency;
pub mod workflow;

pub use broadcast::{WorkflowEvent, WorkflowEventBroadcaster, WorkflowEventKind};
pub use config::{load_config, load_resolved_config, RegistryConfig};
pub use error::{ConfigError, OrderflowError, Result};
pub use model::{
    Checklist, ChecklistKind, Order, PipelineStage, StepOutcome, StepState, Workflow,
    WorkflowStep, WorkflowStepKey,
};
pub use pipeline::{PipelineAggregator, PipelineSnapshot, StageCount, UrgentOrder};
pub use query::{ChecklistView, QueryFacade, StageMarker, StepperView};
pub use registry::StatusRegistry;
pub use store::{InMemoryOrderStore, OrderFilter, OrderStore, StoreError};
pub use urgency::{classify, parse_due_date, DueDateClass, UrgencyClassifier};
pub use workflow::{StatusChange, StatusUpdate, WorkflowError, WorkflowService};
