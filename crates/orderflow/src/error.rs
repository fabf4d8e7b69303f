use std::path::PathBuf;
use thiserror::Error;

use crate::model::ChecklistKind;

#[derive(Error, Debug)]
pub enum OrderflowError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Workflow error: {0}")]
    Workflow(#[from] crate::workflow::WorkflowError),

    #[error("Store error: {0}")]
    Store(#[from] crate::store::StoreError),

    #[error("Invalid due date '{value}': {reason}")]
    InvalidDueDate { value: String, reason: String },

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Failed to parse config YAML: {0}")]
    ParseYaml(#[from] serde_yaml::Error),

    #[error("Unsupported config file format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },

    #[error("Duplicate status '{status}'")]
    DuplicateStatus { status: String },

    #[error("Duplicate step key '{key}' in {checklist} checklist")]
    DuplicateStepKey { checklist: ChecklistKind, key: String },

    #[error("Status '{status}' references unknown step '{key}' in {checklist} checklist")]
    InvalidStepReference {
        status: String,
        checklist: ChecklistKind,
        key: String,
    },
}

pub type Result<T> = std::result::Result<T, OrderflowError>;
