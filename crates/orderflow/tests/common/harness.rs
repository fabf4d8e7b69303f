//! Test harness for isolated end-to-end runs.
//!
//! `TestHarness` writes a registry configuration to a temporary directory,
//! loads it back through the config loader and wires:
//! - an `InMemoryOrderStore` seeded with orders
//! - a `WorkflowService` over that store
//! - a `QueryFacade` sharing the same registry

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use orderflow::config::{default_config, load_config, RegistryConfig};
use orderflow::model::Order;
use orderflow::store::{InMemoryOrderStore, OrderFilter, OrderStore};
use orderflow::urgency::UrgencyClassifier;
use orderflow::{QueryFacade, StatusRegistry, WorkflowService};

pub struct TestHarness {
    /// Keeps the registry file alive for the harness lifetime.
    temp_dir: TempDir,
    pub registry_path: PathBuf,
    pub config: RegistryConfig,
    pub store: Arc<InMemoryOrderStore>,
    pub service: WorkflowService<InMemoryOrderStore>,
    pub facade: QueryFacade,
}

impl TestHarness {
    /// Harness over the built-in registry.
    pub fn new() -> Self {
        Self::with_config(default_config().expect("built-in registry must load"))
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let registry_path = temp_dir.path().join("registry.json");
        let json = serde_json::to_string_pretty(&config).expect("Failed to serialize config");
        std::fs::write(&registry_path, json).expect("Failed to write registry file");

        let config = load_config(&registry_path).expect("Failed to load registry file");
        let registry =
            Arc::new(StatusRegistry::from_config(&config).expect("Failed to build registry"));
        let store = Arc::new(InMemoryOrderStore::new());
        let service = WorkflowService::new(
            Arc::clone(&store),
            Arc::clone(&registry),
            config.checklists.clone(),
        );
        let facade = QueryFacade::new(registry, UrgencyClassifier::new(config.offset()));

        Self {
            temp_dir,
            registry_path,
            config,
            store,
            service,
            facade,
        }
    }

    /// Seeds the store.
    pub fn insert(&self, order: Order) {
        self.store
            .insert_order(order)
            .expect("Failed to insert order");
    }

    pub fn order(&self, order_id: &str) -> Order {
        self.store.get_order(order_id).expect("Order not found")
    }

    /// Every order currently in the store.
    pub fn orders(&self) -> Vec<Order> {
        self.store
            .get_orders(&OrderFilter::default())
            .expect("Failed to list orders")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
