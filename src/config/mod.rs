//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML), path from --config or WHITELIST_CONFIG
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → DappConfig (validated, immutable)
//!     → handed to the gateway, session controller and UI at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - The signing key never appears in config; see `blockchain::wallet`

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from_env, load_or_default, ConfigError};
pub use schema::{
    ContractConfig, DappConfig, DeployConfig, LogFormat, NetworkConfig, ObservabilityConfig,
    UiConfig,
};
pub use validation::{validate_config, ValidationError};
