use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{PipelineStage, WorkflowStepKey};

/// Top-level registry configuration: the status vocabulary, checklist
/// templates and ambient settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub version: String,
    /// Offset used to decide calendar days for due dates.
    #[serde(default)]
    pub utc_offset_minutes: i32,
    #[serde(default)]
    pub statuses: Vec<StatusEntry>,
    #[serde(default)]
    pub checklists: ChecklistTemplates,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RegistryConfig {
    /// The configured business-day offset, UTC if out of range.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }
}

/// One row of the status table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
    /// Raw status text, matched exactly.
    pub status: String,
    pub stage: PipelineStage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<Department>,
    /// Checklist step this status resolves when posted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<WorkflowStepKey>,
}

impl StatusEntry {
    pub fn new(status: impl Into<String>, stage: PipelineStage) -> Self {
        Self {
            status: status.into(),
            stage,
            department: None,
            step: None,
        }
    }

    pub fn department(mut self, department: Department) -> Self {
        self.department = Some(department);
        self
    }

    pub fn step(mut self, step: WorkflowStepKey) -> Self {
        self.step = Some(step);
        self
    }
}

/// Department that posts a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Department {
    Sales,
    Design,
    Procurement,
    Production,
    Shipping,
    Accounting,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistTemplates {
    #[serde(default)]
    pub qc: Vec<StepTemplate>,
    #[serde(default)]
    pub shipping: Vec<StepTemplate>,
    #[serde(default)]
    pub warehouse: Vec<StepTemplate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepTemplate {
    pub key: String,
    pub label: String,
}

impl StepTemplate {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}
