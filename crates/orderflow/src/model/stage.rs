//! Coarse pipeline stages used for dashboard-level counting.

use serde::{Deserialize, Serialize};

/// One of the five ordered lifecycle phases an order passes through.
///
/// The discriminant is the stage index; stages compare by that index.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum PipelineStage {
    #[default]
    OrderConfirmed = 0,
    PreProduction = 1,
    InProduction = 2,
    InTransit = 3,
    Delivered = 4,
}

impl PipelineStage {
    /// All stages in pipeline order.
    pub const ALL: [PipelineStage; 5] = [
        PipelineStage::OrderConfirmed,
        PipelineStage::PreProduction,
        PipelineStage::InProduction,
        PipelineStage::InTransit,
        PipelineStage::Delivered,
    ];

    /// Zero-based position in the pipeline.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the stage at `index`, if any.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// True for stages where work is in flight: not merely queued, not yet
    /// delivered.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            PipelineStage::PreProduction | PipelineStage::InProduction | PipelineStage::InTransit
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            PipelineStage::OrderConfirmed => "Order confirmed",
            PipelineStage::PreProduction => "Pre-production",
            PipelineStage::InProduction => "In production",
            PipelineStage::InTransit => "In transit",
            PipelineStage::Delivered => "Delivered",
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
