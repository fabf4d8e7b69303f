//! Shared test utilities for orderflow integration tests.
//!
//! This module provides:
//! - `TestHarness` wiring a store, a workflow service and a query facade
//! - Builders for orders and registry configurations

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::TestHarness;
