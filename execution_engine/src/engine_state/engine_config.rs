//! Support for runtime configuration of the execution engine.
#[cfg(feature = "datasize")]
use datasize::DataSize;
use serde::{Deserialize, Serialize};

use crate::shared::chain_kind::ChainKind;

/// Default chain identifier.
pub const DEFAULT_CHAIN_ID: &str = "ethermint_9000-1";

/// The runtime configuration of the execution engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "datasize", derive(DataSize))]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// The operating mode of the chain.
    #[serde(default)]
    chain_kind: ChainKind,
    /// The chain identifier recorded by the execution environment module.
    #[serde(default = "default_chain_id")]
    chain_id: String,
}

fn default_chain_id() -> String {
    DEFAULT_CHAIN_ID.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            chain_kind: ChainKind::default(),
            chain_id: default_chain_id(),
        }
    }
}

impl EngineConfig {
    /// Returns the operating mode of the chain.
    pub fn chain_kind(&self) -> ChainKind {
        self.chain_kind
    }

    /// Returns the chain identifier.
    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }
}

/// A builder for an [`EngineConfig`].
///
/// Any field that isn't specified will be defaulted.
#[derive(Default, Debug)]
pub struct EngineConfigBuilder {
    chain_kind: Option<ChainKind>,
    chain_id: Option<String>,
}

impl EngineConfigBuilder {
    /// Create new `EngineConfig` builder object.
    pub fn new() -> Self {
        EngineConfigBuilder::default()
    }

    /// Sets the chain kind.
    pub fn with_chain_kind(mut self, chain_kind: ChainKind) -> Self {
        self.chain_kind = Some(chain_kind);
        self
    }

    /// Sets the chain identifier.
    pub fn with_chain_id(mut self, chain_id: impl Into<String>) -> Self {
        self.chain_id = Some(chain_id.into());
        self
    }

    /// Builds a new [`EngineConfig`] object.
    pub fn build(self) -> EngineConfig {
        EngineConfig {
            chain_kind: self.chain_kind.unwrap_or_default(),
            chain_id: self.chain_id.unwrap_or_else(default_chain_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_should_default_unset_fields() {
        let config = EngineConfigBuilder::new().build();
        assert_eq!(config, EngineConfig::default());
        assert!(config.chain_kind().is_public());
        assert_eq!(config.chain_id(), DEFAULT_CHAIN_ID);
    }

    #[test]
    fn builder_should_apply_fields() {
        let config = EngineConfigBuilder::new()
            .with_chain_kind(ChainKind::Development)
            .with_chain_id("ethermint_1337-1")
            .build();
        assert!(config.chain_kind().is_development());
        assert_eq!(config.chain_id(), "ethermint_1337-1");
    }

    #[test]
    fn should_parse_toml() {
        let config: EngineConfig =
            toml::from_str("chain_kind = 'restricted'\nchain_id = 'dymension_1100-1'").unwrap();
        assert!(config.chain_kind().is_restricted());
        assert_eq!(config.chain_id(), "dymension_1100-1");
    }

    #[test]
    fn should_reject_unknown_fields() {
        assert!(toml::from_str::<EngineConfig>("chain_kind = 'public'\nverbose = true").is_err());
    }
}
