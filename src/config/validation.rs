//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and formats.
//! Every problem is reported, not just the first one.

use alloy::primitives::Address;
use std::net::SocketAddr;

use crate::config::schema::{ContractConfig, DappConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    /// What is wrong with it.
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

impl ContractConfig {
    /// Parse the configured contract address.
    pub fn address(&self) -> Result<Address, ValidationError> {
        if self.address.is_empty() {
            return Err(ValidationError::new(
                "contract.address",
                "no whitelist contract address configured",
            ));
        }
        self.address
            .parse()
            .map_err(|e| ValidationError::new("contract.address", format!("invalid address: {}", e)))
    }
}

/// Validate a parsed configuration.
///
/// An empty `contract.address` is accepted here because the deployment
/// runner runs before any address exists; the front end asks for the
/// address through [`ContractConfig::address`].
pub fn validate_config(config: &DappConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let network = &config.network;
    if let Err(e) = network.rpc_url.parse::<url::Url>() {
        errors.push(ValidationError::new("network.rpc_url", format!("invalid URL: {}", e)));
    }
    if network.chain_id == 0 {
        errors.push(ValidationError::new("network.chain_id", "must be non-zero"));
    }
    if network.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("network.rpc_timeout_secs", "must be greater than 0"));
    }
    if network.confirmation_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "network.confirmation_timeout_secs",
            "must be greater than 0",
        ));
    }
    if network.poll_interval_ms == 0 {
        errors.push(ValidationError::new("network.poll_interval_ms", "must be greater than 0"));
    }

    if !config.contract.address.is_empty() {
        if let Err(e) = config.contract.address() {
            errors.push(e);
        }
    }

    if config.deploy.max_whitelisted_addresses == 0 {
        errors.push(ValidationError::new(
            "deploy.max_whitelisted_addresses",
            "must be greater than 0",
        ));
    }

    if config.ui.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "ui.bind_address",
            format!("'{}' is not a socket address", config.ui.bind_address),
        ));
    }

    let observability = &config.observability;
    if !matches!(
        observability.log_level.as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    ) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", observability.log_level),
        ));
    }
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
