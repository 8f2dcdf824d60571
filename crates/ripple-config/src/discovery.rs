//! File-based config discovery.
//!
//! Searches conventional locations and loads them through figment so TOML,
//! the `package.json` `"ripple"` field, and `RIPPLE_*` environment variables
//! merge in a predictable order. Library embedders that already hold a
//! config should use `RippleConfig::from_value` directly.

use std::fs;
use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde_json::Value;

use crate::config::RippleConfig;
use crate::error::{ConfigError, Result};

pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Find a config file in the root directory.
    ///
    /// Searches in this order:
    /// 1. `ripple.toml`
    /// 2. `package.json` (`ripple` field)
    pub fn find(&self) -> Option<PathBuf> {
        let toml_path = self.root.join("ripple.toml");
        if toml_path.exists() {
            return Some(toml_path);
        }

        let pkg_path = self.root.join("package.json");
        if pkg_path.exists() {
            if let Ok(content) = fs::read_to_string(&pkg_path) {
                if let Ok(parsed) = serde_json::from_str::<Value>(&content) {
                    if parsed.get("ripple").is_some_and(|v| !v.is_null()) {
                        return Some(pkg_path);
                    }
                }
            }
        }

        None
    }

    /// Load the discovered config merged over defaults, with `RIPPLE_*`
    /// environment variables applied last. Returns defaults when nothing is
    /// found on disk.
    pub fn load(&self) -> Result<RippleConfig> {
        let mut figment = Figment::from(Serialized::defaults(RippleConfig::default()));
        if let Some(path) = self.find() {
            figment = match path.extension().and_then(|e| e.to_str()) {
                Some("toml") => figment.merge(Toml::file(path)),
                Some("json") => {
                    let content = fs::read_to_string(&path)?;
                    let parsed: Value = serde_json::from_str(&content)
                        .map_err(|e| ConfigError::Parse(e.to_string()))?;
                    let section = parsed.get("ripple").cloned().unwrap_or(Value::Null);
                    let config = RippleConfig::from_value(section)?;
                    figment.merge(Serialized::defaults(config))
                }
                other => {
                    return Err(ConfigError::UnsupportedFormat(
                        other.unwrap_or("<none>").to_string(),
                    ));
                }
            };
        }
        figment
            .merge(Env::prefixed("RIPPLE_"))
            .extract()
            .map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

/// Convenience wrapper: discover and load from `root`.
pub fn discover(root: impl AsRef<Path>) -> Result<RippleConfig> {
    ConfigDiscovery::new(root).load()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = discover(dir.path()).expect("load");
        assert!(config.alias.is_empty());
    }

    #[test]
    fn ripple_toml_is_discovered_and_merged() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("ripple.toml"),
            "max_hops = 3\n\n[alias]\n\"@\" = \"src\"\n",
        )
        .expect("write");
        let config = discover(dir.path()).expect("load");
        assert_eq!(config.max_hops, 3);
        assert_eq!(config.alias.get("@"), Some(&"src".to_string()));
        assert!(config.extensions.contains(&".vue".to_string()));
    }

    #[test]
    fn package_json_ripple_field_is_discovered() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("package.json"),
            r#"{ "name": "app", "ripple": { "max_hops": 5 } }"#,
        )
        .expect("write");
        let config = discover(dir.path()).expect("load");
        assert_eq!(config.max_hops, 5);
    }
}
