//! Builders for orders and registry configurations.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};

use orderflow::config::schema::{
    ChecklistTemplates, Department, LoggingConfig, RegistryConfig, StatusEntry, StepTemplate,
};
use orderflow::model::{ChecklistKind, Order, PipelineStage, Workflow, WorkflowStepKey};

/// Fixed reference time used across integration tests: 2024-06-15 09:00 UTC.
pub fn reference_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap()
}

/// Builder for `Order` instances.
pub struct OrderBuilder {
    id: String,
    customer: String,
    product: String,
    raw_status: String,
    due_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    workflow: Option<Workflow>,
}

impl OrderBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            customer: "ACME Co.".to_string(),
            product: "Printed tote bag".to_string(),
            raw_status: "ยืนยันคำสั่งซื้อแล้ว".to_string(),
            due_date: None,
            created_at: reference_now() - Duration::days(14),
            workflow: None,
        }
    }

    pub fn customer(mut self, customer: &str) -> Self {
        self.customer = customer.to_string();
        self
    }

    pub fn status(mut self, raw_status: &str) -> Self {
        self.raw_status = raw_status.to_string();
        self
    }

    pub fn due(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Due date relative to [`reference_now`].
    pub fn due_in_days(self, days: i64) -> Self {
        self.due(reference_now() + Duration::days(days))
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn workflow(mut self, workflow: Workflow) -> Self {
        self.workflow = Some(workflow);
        self
    }

    pub fn build(self) -> Order {
        let mut order = Order::new(
            self.id,
            self.customer,
            self.product,
            self.raw_status,
            self.created_at,
        );
        order.due_date = self.due_date;
        order.workflow = self.workflow;
        order
    }
}

/// Builder for `RegistryConfig` instances.
pub struct RegistryConfigBuilder {
    utc_offset_minutes: i32,
    statuses: Vec<StatusEntry>,
    checklists: ChecklistTemplates,
}

impl RegistryConfigBuilder {
    /// Empty registry with a small checklist in every category.
    pub fn new() -> Self {
        Self {
            utc_offset_minutes: 0,
            statuses: vec![],
            checklists: ChecklistTemplates {
                qc: vec![
                    StepTemplate::new("artwork_check", "Artwork check"),
                    StepTemplate::new("final_qc", "Final QC"),
                ],
                shipping: vec![
                    StepTemplate::new("packing", "Packing"),
                    StepTemplate::new("dispatched", "Dispatched"),
                ],
                warehouse: vec![StepTemplate::new("handed_over", "Handed over")],
            },
        }
    }

    pub fn utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = minutes;
        self
    }

    pub fn status(mut self, status: &str, stage: PipelineStage) -> Self {
        self.statuses.push(StatusEntry::new(status, stage));
        self
    }

    pub fn department_status(
        mut self,
        status: &str,
        stage: PipelineStage,
        department: Department,
    ) -> Self {
        self.statuses
            .push(StatusEntry::new(status, stage).department(department));
        self
    }

    pub fn step_status(
        mut self,
        status: &str,
        stage: PipelineStage,
        checklist: ChecklistKind,
        key: &str,
    ) -> Self {
        self.statuses
            .push(StatusEntry::new(status, stage).step(WorkflowStepKey::new(checklist, key)));
        self
    }

    pub fn checklists(mut self, checklists: ChecklistTemplates) -> Self {
        self.checklists = checklists;
        self
    }

    pub fn build(self) -> RegistryConfig {
        RegistryConfig {
            version: "1.0".to_string(),
            utc_offset_minutes: self.utc_offset_minutes,
            statuses: self.statuses,
            checklists: self.checklists,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for RegistryConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
