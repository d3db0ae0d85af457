//! The `fasal serve` command.

use clap::Args;
use fasal_core::{Config, Diagnoser};
use std::sync::Arc;

/// Arguments for the `serve` command.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Interface to bind (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Execute the serve command.
pub async fn execute(args: ServeArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        anyhow::ensure!(port > 0, "--port must be > 0");
        config.server.port = port;
    }

    // Provider selection happens exactly once, here
    let diagnoser = Arc::new(Diagnoser::from_config(&config));
    crate::server::serve(&config.server, diagnoser).await
}
