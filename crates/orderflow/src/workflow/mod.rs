pub mod engine;
pub mod error;
pub mod service;

pub use engine::{
    activate, advance, apply_status, attach_evidence, current_stage, order_stage, AutoAdvance,
};
pub use error::WorkflowError;
pub use service::{StatusChange, StatusUpdate, WorkflowService};
