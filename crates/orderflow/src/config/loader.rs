use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::schema::{RegistryConfig, StepTemplate};
use crate::error::ConfigError;
use crate::model::ChecklistKind;

const SCHEMA_JSON: &str = include_str!("../../../../schema/registry-v1.json");
const DEFAULT_REGISTRY_JSON: &str = include_str!("../../../../defaults/registry.json");

/// Environment variable naming a registry file to load.
pub const REGISTRY_ENV_VAR: &str = "ORDERFLOW_REGISTRY";

/// Loads a registry file, choosing the parser from the file extension.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RegistryConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        "json" => load_config_from_str(&content),
        "yaml" | "yml" => load_config_from_yaml_str(&content),
        _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    }
}

pub fn load_config_from_str(content: &str) -> Result<RegistryConfig, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;
    load_config_from_value(json_value)
}

pub fn load_config_from_yaml_str(content: &str) -> Result<RegistryConfig, ConfigError> {
    let json_value: serde_json::Value = serde_yaml::from_str(content)?;
    load_config_from_value(json_value)
}

/// The registry shipped with the crate, holding the reference vocabulary.
pub fn default_config() -> Result<RegistryConfig, ConfigError> {
    load_config_from_str(DEFAULT_REGISTRY_JSON)
}

/// Picks the registry file to load: an explicit path, then
/// `ORDERFLOW_REGISTRY`, then `~/.orderflow/registry.json` if it exists.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(value) = std::env::var(REGISTRY_ENV_VAR) {
        if !value.trim().is_empty() {
            return Some(PathBuf::from(value));
        }
    }

    default_registry_path().filter(|p| p.exists())
}

/// Loads the resolved registry file, or the built-in default when none is
/// configured.
pub fn load_resolved_config(explicit: Option<&Path>) -> Result<RegistryConfig, ConfigError> {
    match resolve_config_path(explicit) {
        Some(path) => {
            log::info!("Loading status registry from {}", path.display());
            load_config(path)
        }
        None => {
            log::info!("No registry file configured, using built-in registry");
            default_config()
        }
    }
}

/// Returns the canonical registry path: `~/.orderflow/registry.json`.
pub fn default_registry_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".orderflow").join("registry.json"))
}

fn load_config_from_value(json_value: serde_json::Value) -> Result<RegistryConfig, ConfigError> {
    validate_schema(&json_value)?;

    let config: RegistryConfig = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();
    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

fn validate_config(config: &RegistryConfig) -> Result<(), ConfigError> {
    if config.version != "1.0" {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    if config.utc_offset_minutes.abs() >= 24 * 60 {
        return Err(ConfigError::Validation {
            message: format!(
                "utc_offset_minutes out of range: {}",
                config.utc_offset_minutes
            ),
        });
    }

    for kind in ChecklistKind::ALL {
        let mut keys = HashSet::new();
        for step in templates_for(config, kind) {
            if !keys.insert(step.key.as_str()) {
                return Err(ConfigError::DuplicateStepKey {
                    checklist: kind,
                    key: step.key.clone(),
                });
            }
        }
    }

    let mut statuses = HashSet::new();
    for entry in &config.statuses {
        if !statuses.insert(entry.status.as_str()) {
            return Err(ConfigError::DuplicateStatus {
                status: entry.status.clone(),
            });
        }

        if let Some(step) = &entry.step {
            let known = templates_for(config, step.checklist)
                .iter()
                .any(|t| t.key == step.step);
            if !known {
                return Err(ConfigError::InvalidStepReference {
                    status: entry.status.clone(),
                    checklist: step.checklist,
                    key: step.step.clone(),
                });
            }
        }
    }

    Ok(())
}

fn templates_for(config: &RegistryConfig, kind: ChecklistKind) -> &[StepTemplate] {
    match kind {
        ChecklistKind::Qc => &config.checklists.qc,
        ChecklistKind::Shipping => &config.checklists.shipping,
        ChecklistKind::Warehouse => &config.checklists.warehouse,
    }
}
