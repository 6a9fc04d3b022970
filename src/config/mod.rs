//! Configuration loading and validation.
//!
//! - [`types`]: the config structs and [`Config::load`]
//! - [`defaults`]: serde default values
//! - [`validation`]: startup checks returning every problem found

mod defaults;
mod types;
pub mod validation;

pub use types::{
    BlobConfig, BridgeConfig, Config, ConfigError, LimitsConfig, ListenConfig, ServerConfig,
};
