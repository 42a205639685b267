use std::path::Path;

use crate::catalog::{load_catalog, Catalog};
use crate::config::schema::{Config, StorageKind, CONFIG_VERSION};
use crate::error::ConfigError;

const SCHEMA_JSON: &str = include_str!("../../../../schema/config-v1.json");

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;

    validate_schema(&json_value)?;

    let config: Config = serde_json::from_value(json_value)?;

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

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        message: message.into(),
    }
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != CONFIG_VERSION {
        return Err(invalid(format!(
            "Unsupported config version: {}",
            config.version
        )));
    }

    let storage = &config.storage;
    match storage.kind {
        StorageKind::Filesystem => {
            if storage.root.as_deref().is_none_or(|r| r.trim().is_empty()) {
                return Err(invalid("Filesystem storage requires 'root'"));
            }
        }
        StorageKind::Http => {
            for (field, value) in [
                ("endpoint", &storage.endpoint),
                ("bucket", &storage.bucket),
                ("domain", &storage.domain),
            ] {
                if value.as_deref().is_none_or(|v| v.trim().is_empty()) {
                    return Err(invalid(format!("HTTP storage requires '{}'", field)));
                }
            }
        }
    }

    if config.batch.use_ai_synthesis && !config.synthesis.credentials.is_configured() {
        return Err(invalid(
            "AI synthesis is enabled but no synthesis credentials are configured",
        ));
    }

    Ok(())
}

impl Config {
    /// The configured catalog file, or the built-in catalog.
    pub fn load_catalog(&self) -> Result<Catalog, ConfigError> {
        match &self.catalog_path {
            Some(path) => load_catalog(path),
            None => Ok(Catalog::builtin()),
        }
    }
}
