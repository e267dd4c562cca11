//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the dapp.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the whitelist front end and deployment runner.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DappConfig {
    /// JSON-RPC network settings.
    pub network: NetworkConfig,

    /// Deployed whitelist contract.
    pub contract: ContractConfig,

    /// Deployment runner settings.
    pub deploy: DeployConfig,

    /// Web front end settings.
    pub ui: UiConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Network configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// The only chain ID the dapp accepts (4 = Rinkeby).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// How long to wait for a transaction to be mined, in seconds.
    pub confirmation_timeout_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            chain_id: 4,
            rpc_timeout_secs: 10,
            confirmation_timeout_secs: 300,
            poll_interval_ms: 2000,
        }
    }
}

/// Whitelist contract configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ContractConfig {
    /// Address of the deployed Whitelist contract (hex, 0x-prefixed).
    pub address: String,
}

/// Deployment runner configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DeployConfig {
    /// Path to the compiled contract artifact (Hardhat JSON).
    pub artifact_path: String,

    /// Capacity passed to the contract constructor.
    pub max_whitelisted_addresses: u8,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            artifact_path: "artifacts/contracts/Whitelist.sol/Whitelist.json".to_string(),
            max_whitelisted_addresses: 10,
        }
    }
}

/// Web front end configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiConfig {
    /// Bind address (e.g., "127.0.0.1:3000").
    pub bind_address: String,

    /// Connect the wallet as soon as the page is mounted.
    pub auto_connect: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
            auto_connect: true,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable, for development.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DappConfig::default();
        assert_eq!(config.network.chain_id, 4);
        assert_eq!(config.deploy.max_whitelisted_addresses, 10);
        assert!(config.contract.address.is_empty());
        assert!(config.ui.auto_connect);
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: DappConfig = toml::from_str(
            r#"
            [network]
            chain_id = 31337

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.network.chain_id, 31337);
        assert_eq!(config.network.rpc_url, "http://localhost:8545");
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.ui.bind_address, "127.0.0.1:3000");
    }
}
