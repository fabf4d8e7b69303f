//! Broadcasting of workflow changes for live dashboards.

pub mod workflow_events;

pub use workflow_events::{WorkflowEvent, WorkflowEventBroadcaster, WorkflowEventKind};
