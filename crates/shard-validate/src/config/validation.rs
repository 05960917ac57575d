//! Configuration validation.

use super::Config;
use crate::error::{Result, ValidateError};
use crate::topology::GcsObject;

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    let topology = &config.topology;

    if topology.resource.is_none() && topology.path.is_none() {
        return Err(ValidateError::Config(
            "topology.resource or topology.path is required".into(),
        ));
    }
    if let Some(ref resource) = topology.resource {
        if resource.trim().is_empty() {
            return Err(ValidateError::Config(
                "topology.resource cannot be empty".into(),
            ));
        }
    }
    if let Some(ref path) = topology.path {
        if path.trim().is_empty() {
            return Err(ValidateError::Config("topology.path cannot be empty".into()));
        }
        if path.trim().starts_with("gs://") && GcsObject::parse(path).is_none() {
            return Err(ValidateError::Config(format!(
                "topology.path '{}' must have the form gs://bucket/object",
                path
            )));
        }
    }
    if let Some(ref root) = topology.object_store_root {
        if root.as_os_str().is_empty() {
            return Err(ValidateError::Config(
                "topology.object_store_root cannot be empty".into(),
            ));
        }
    }

    if config.validation.tables.iter().any(|t| t.trim().is_empty()) {
        return Err(ValidateError::Config(
            "validation.tables cannot contain blank names".into(),
        ));
    }

    Ok(())
}
