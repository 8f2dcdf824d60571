//! # ripple-config
//!
//! Configuration layer for the ripple change-impact engine: the path alias
//! table, extension probe order, ignored declaration-file suffixes, and the
//! transitive-resolution hop ceiling.
//!
//! Configs load from `ripple.toml` or a `package.json` `"ripple"` field via
//! figment, with `RIPPLE_*` environment variables merged last; embedders can
//! also construct [`RippleConfig`] programmatically.

pub mod config;
pub mod discovery;
pub mod error;
pub mod validation;

pub use config::{RippleConfig, DEFAULT_MAX_HOPS};
pub use discovery::{discover, ConfigDiscovery};
pub use error::{ConfigError, Result};
pub use validation::validate_schema;
