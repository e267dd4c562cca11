//! One-shot deployment of the Whitelist contract.
//!
//! Reads configuration from the file named by `WHITELIST_CONFIG` (defaults
//! otherwise) and the deployer key from `WHITELIST_PRIVATE_KEY`. Prints the
//! deployed address on stdout and exits 0, or prints the error and exits 1.

use clap::Parser;
use std::process::ExitCode;

use whitelist_dapp::config::load_from_env;
use whitelist_dapp::deploy::{run_deployment, write_deployment};
use whitelist_dapp::observability::init_logging;

#[derive(Parser)]
#[command(name = "whitelist-deploy")]
#[command(about = "Deploy the Whitelist contract", long_about = None)]
struct Cli {}

#[tokio::main]
async fn main() -> ExitCode {
    let _cli = Cli::parse();

    let config = match load_from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config.observability);

    match run_deployment(&config).await {
        Ok(deployment) => match write_deployment(&mut std::io::stdout().lock(), &deployment) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{}", e);
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            tracing::error!(error = %e, "Deployment failed");
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
