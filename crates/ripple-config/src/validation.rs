//! Schema validation for loaded configs. No filesystem checks here; alias
//! targets are project-relative paths the resolver probes lazily.

use crate::config::RippleConfig;
use crate::error::{ConfigError, Result};

/// Validate structural invariants of a config.
pub fn validate_schema(config: &RippleConfig) -> Result<()> {
    if config.max_hops == 0 {
        return Err(ConfigError::SchemaValidation(
            "max_hops must be at least 1".to_string(),
        ));
    }
    for ext in &config.extensions {
        if !ext.starts_with('.') || ext.len() < 2 {
            return Err(ConfigError::SchemaValidation(format!(
                "extension {ext:?} must start with a dot"
            )));
        }
    }
    for (key, target) in &config.alias {
        if key.is_empty() || key == "$" {
            return Err(ConfigError::SchemaValidation(format!(
                "alias key {key:?} is empty"
            )));
        }
        if target.is_empty() {
            return Err(ConfigError::SchemaValidation(format!(
                "alias {key:?} maps to an empty target"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        validate_schema(&RippleConfig::default()).expect("valid");
    }

    #[test]
    fn zero_hop_ceiling_is_rejected() {
        let config = RippleConfig {
            max_hops: 0,
            ..RippleConfig::default()
        };
        assert!(validate_schema(&config).is_err());
    }

    #[test]
    fn dotless_extension_is_rejected() {
        let mut config = RippleConfig::default();
        config.extensions.push("ts".to_string());
        assert!(validate_schema(&config).is_err());
    }
}
