use serde::{Deserialize, Serialize};

use crate::model::{Order, PipelineStage};
use crate::urgency::DueDateClass;

/// Count for a single pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageCount {
    pub stage: PipelineStage,
    pub label: String,
    pub count: usize,
    /// Share of all orders as a fraction, `count / total`, from 0.0 to 1.0.
    pub percentage: f64,
    /// Orders in this stage that are due today, tomorrow or overdue.
    pub urgent: usize,
}

/// Orders grouped by pipeline stage at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSnapshot {
    pub total: usize,
    /// One entry per stage, in pipeline order.
    pub stages: Vec<StageCount>,
}

impl PipelineSnapshot {
    pub(crate) fn from_counts(counts: [usize; 5], urgent: [usize; 5]) -> Self {
        let total: usize = counts.iter().sum();
        let stages = PipelineStage::ALL
            .iter()
            .map(|&stage| {
                let count = counts[stage.index()];
                StageCount {
                    stage,
                    label: stage.label().to_string(),
                    count,
                    percentage: percentage(count, total),
                    urgent: urgent[stage.index()],
                }
            })
            .collect();

        Self { total, stages }
    }

    pub fn count(&self, stage: PipelineStage) -> usize {
        self.stage(stage).map(|s| s.count).unwrap_or(0)
    }

    pub fn percentage(&self, stage: PipelineStage) -> f64 {
        self.stage(stage).map(|s| s.percentage).unwrap_or(0.0)
    }

    pub fn urgent(&self, stage: PipelineStage) -> usize {
        self.stage(stage).map(|s| s.urgent).unwrap_or(0)
    }

    fn stage(&self, stage: PipelineStage) -> Option<&StageCount> {
        self.stages.iter().find(|s| s.stage == stage)
    }
}

/// An order flagged for triage, with the values it was selected on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrgentOrder {
    pub order: Order,
    pub stage: PipelineStage,
    pub urgency: DueDateClass,
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}
