//! Pipeline aggregation for dashboards.

pub mod aggregator;
pub mod snapshot;

pub use aggregator::PipelineAggregator;
pub use snapshot::{PipelineSnapshot, StageCount, UrgentOrder};
