//! Engine configuration.
pub mod engine_config;

pub use engine_config::{EngineConfig, EngineConfigBuilder, DEFAULT_CHAIN_ID};
