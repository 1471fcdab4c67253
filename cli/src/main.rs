//! authflow - provision a deployment, exchange player credentials, connect, tear down

use authflow_cli::cli::Cli;
use clap::Parser;

#[tokio::main]
async fn main() {
    authflow_cli::logging::init();
    let cli = Cli::parse();
    if let Err(e) = cli.run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
