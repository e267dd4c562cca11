//! Whitelist dapp: web front end and deployment runner for a capped
//! whitelist contract.

pub mod blockchain;
pub mod config;
pub mod deploy;
pub mod lifecycle;
pub mod observability;
pub mod session;
pub mod ui;

pub use config::DappConfig;
pub use session::SessionController;
pub use ui::UiServer;
