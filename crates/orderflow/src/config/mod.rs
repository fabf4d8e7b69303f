pub mod loader;
pub mod schema;

pub use loader::{
    default_config, default_registry_path, load_config, load_config_from_str,
    load_config_from_yaml_str, load_resolved_config, resolve_config_path, REGISTRY_ENV_VAR,
};
pub use schema::{
    ChecklistTemplates, Department, LogFormat, LoggingConfig, RegistryConfig, StatusEntry,
    StepTemplate,
};
