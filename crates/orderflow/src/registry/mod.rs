//! Status registry: the table translating free-text department statuses
//! into pipeline stages.

use std::collections::HashMap;

use crate::config::default_config;
use crate::config::schema::{Department, RegistryConfig, StatusEntry};
use crate::error::ConfigError;
use crate::model::{PipelineStage, WorkflowStepKey};

/// Append-only lookup table of raw status strings.
///
/// Lookups are exact and case-sensitive. Unknown statuses resolve to
/// [`PipelineStage::OrderConfirmed`] so aggregation never fails on dirty
/// data.
#[derive(Debug, Clone, Default)]
pub struct StatusRegistry {
    entries: Vec<StatusEntry>,
    /// Status text to position in `entries`.
    index: HashMap<String, usize>,
}

impl StatusRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(
        entries: impl IntoIterator<Item = StatusEntry>,
    ) -> Result<Self, ConfigError> {
        let mut registry = Self::new();
        for entry in entries {
            registry.register(entry)?;
        }
        Ok(registry)
    }

    pub fn from_config(config: &RegistryConfig) -> Result<Self, ConfigError> {
        Self::from_entries(config.statuses.iter().cloned())
    }

    /// Registry built from the configuration shipped with the crate.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_config(&default_config()?)
    }

    /// Appends a status. Existing entries are never overwritten.
    pub fn register(&mut self, entry: StatusEntry) -> Result<(), ConfigError> {
        if self.index.contains_key(&entry.status) {
            return Err(ConfigError::DuplicateStatus {
                status: entry.status,
            });
        }
        self.index.insert(entry.status.clone(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    /// Stage a raw status maps to; stage 0 for anything unknown.
    pub fn stage_of(&self, raw_status: &str) -> PipelineStage {
        self.entry(raw_status)
            .map(|e| e.stage)
            .unwrap_or(PipelineStage::OrderConfirmed)
    }

    /// Checklist step a raw status resolves, if it is tied to one.
    pub fn step_key_of(&self, raw_status: &str) -> Option<&WorkflowStepKey> {
        self.entry(raw_status).and_then(|e| e.step.as_ref())
    }

    pub fn entry(&self, raw_status: &str) -> Option<&StatusEntry> {
        self.index.get(raw_status).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, raw_status: &str) -> bool {
        self.index.contains_key(raw_status)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in registration order.
    pub fn entries(&self) -> &[StatusEntry] {
        &self.entries
    }

    /// Statuses a department may post, in registration order.
    pub fn statuses_for(&self, department: Department) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.department == Some(department))
            .map(|e| e.status.as_str())
            .collect()
    }

    /// Counts the statuses missing from the table, most frequent first.
    pub fn unrecognized<'a, I>(&self, statuses: I) -> Vec<(String, usize)>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for status in statuses {
            if !self.contains(status) {
                *counts.entry(status).or_insert(0) += 1;
            }
        }

        let mut report: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(status, count)| (status.to_string(), count))
            .collect();
        report.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        report
    }
}
