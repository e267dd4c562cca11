//! Whitelist dapp front end.
//!
//! # Architecture Overview
//!
//! ```text
//!   Browser                    ┌──────────────────────────────────────────────┐
//!   ─────────── GET / ────────▶│  ui::server ──▶ ui::view (HTML)              │
//!   ─── POST /connect /join ──▶│      │                                       │
//!                              │      ▼                                       │
//!                              │  session::controller ──▶ session::state      │
//!                              │      │                   (reducer, watch)    │
//!                              │      ▼                                       │
//!                              │  blockchain::gateway (lazy transport,        │
//!                              │      │                network gating)        │
//!                              │      ▼                                       │
//!                              │  blockchain::contract ──▶ transport ─────────┼──▶ JSON-RPC
//!                              └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use whitelist_dapp::blockchain::{
    ChainId, ConfirmationPolicy, ProviderGateway, RpcTransport, Wallet,
};
use whitelist_dapp::config::load_or_default;
use whitelist_dapp::lifecycle::{wait_for_signal, Shutdown};
use whitelist_dapp::observability::{init_logging, metrics};
use whitelist_dapp::{SessionController, UiServer};

#[derive(Parser)]
#[command(name = "whitelist-dapp")]
#[command(about = "Web front end for the Crypto Devs whitelist", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;

    init_logging(&config.observability);
    tracing::info!("whitelist-dapp v{} starting", env!("CARGO_PKG_VERSION"));

    let contract_address = config.contract.address()?;
    tracing::info!(
        rpc_url = %config.network.rpc_url,
        chain_id = config.network.chain_id,
        contract = %contract_address,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // The wallet key is read when the first page asks for a connection.
    let network = config.network.clone();
    let gateway = Arc::new(ProviderGateway::new(ChainId(network.chain_id), move || {
        let wallet = Wallet::from_env(network.chain_id)?;
        RpcTransport::connect(&network, wallet)
    }));

    let (controller, notices) = SessionController::new(
        gateway,
        contract_address,
        ConfirmationPolicy::from(&config.network),
    );

    let listener = TcpListener::bind(&config.ui.bind_address).await?;
    let server = UiServer::new(controller, notices, &config.ui);

    let shutdown = Shutdown::new();
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    wait_for_signal().await;
    shutdown.trigger();
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
