//! Parsing and validation of `quell.toml` configuration files.
//!
//! This crate reads the configuration file into a strongly-typed
//! [`QuellConfig`] and builds the [`SkipList`] exclusion policy from its
//! `[skip]` patterns.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod skip;
pub mod types;

pub use error::ConfigError;
pub use loader::{find_config, load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use skip::SkipList;
pub use types::*;
