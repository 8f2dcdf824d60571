//! The `RippleConfig` structure.
//!
//! Everything the analysis engine is parameterized on: the path alias table,
//! the extension probe order, the ignored declaration-file suffixes, and the
//! transitive-resolution hop ceiling.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result as ConfigResult};

/// Default hop ceiling for transitive impact resolution. A pragmatic bound,
/// not derived from project size; runs that hit it report `truncated`.
pub const DEFAULT_MAX_HOPS: u32 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RippleConfig {
    /// Path aliases, e.g. `"@" -> "src"`. Registration order matters: when
    /// two keys match a specifier, the later registration wins. A key ending
    /// in `$` matches the specifier exactly.
    pub alias: IndexMap<String, String>,

    /// Extensions probed when resolving an extensionless specifier, tried in
    /// order, also used for `index.*` probing.
    pub extensions: Vec<String>,

    /// Suffixes excluded from cross-file resolution entirely.
    pub ignored_suffixes: Vec<String>,

    /// Hop ceiling for transitive impact resolution.
    pub max_hops: u32,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            alias: IndexMap::new(),
            extensions: vec![
                ".js".to_string(),
                ".ts".to_string(),
                ".jsx".to_string(),
                ".tsx".to_string(),
                ".vue".to_string(),
            ],
            ignored_suffixes: vec![
                ".d.ts".to_string(),
                ".d.mts".to_string(),
                ".d.cts".to_string(),
            ],
            max_hops: DEFAULT_MAX_HOPS,
        }
    }
}

impl RippleConfig {
    /// Create from a `serde_json::Value` (for programmatic config).
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: e.to_string(),
        })
    }

    pub fn to_value(&self) -> ConfigResult<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: e.to_string(),
        })
    }

    /// Add or override an alias. Re-registering an existing key moves it to
    /// the back, so the newest registration wins lookups.
    pub fn register_alias(&mut self, key: impl Into<String>, target: impl Into<String>) {
        let key = key.into();
        self.alias.shift_remove(&key);
        self.alias.insert(key, target.into());
    }

    /// True when `path` ends in one of the ignored suffixes.
    pub fn is_ignored_path(&self, path: &str) -> bool {
        self.ignored_suffixes.iter().any(|s| path.ends_with(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_cover_frontend_extensions() {
        let config = RippleConfig::default();
        assert!(config.extensions.contains(&".tsx".to_string()));
        assert!(config.is_ignored_path("src/types.d.ts"));
        assert_eq!(config.max_hops, DEFAULT_MAX_HOPS);
    }

    #[test]
    fn from_value_merges_over_defaults() {
        let config = RippleConfig::from_value(json!({
            "alias": { "@": "src" },
            "max_hops": 4
        }))
        .expect("config");
        assert_eq!(config.alias.get("@"), Some(&"src".to_string()));
        assert_eq!(config.max_hops, 4);
        // Unspecified fields keep their defaults.
        assert!(!config.extensions.is_empty());
    }

    #[test]
    fn register_alias_moves_key_to_back() {
        let mut config = RippleConfig::default();
        config.register_alias("@", "src");
        config.register_alias("lib", "src/lib");
        config.register_alias("@", "app");
        let keys: Vec<&String> = config.alias.keys().collect();
        assert_eq!(keys, ["lib", "@"]);
        assert_eq!(config.alias.get("@"), Some(&"app".to_string()));
    }
}
