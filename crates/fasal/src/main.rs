//! FasalRakshak - AI-powered crop disease diagnosis relay.
//!
//! Accepts crop photos over HTTP, forwards them to a multimodal LLM
//! (Anthropic Claude or OpenAI), and returns a fixed-shape diagnosis record.
//!
//! # Usage
//!
//! ```bash
//! # Run the HTTP API
//! ANTHROPIC_API_KEY=... fasal serve --port 8000
//!
//! # Diagnose a local photo without the server
//! fasal diagnose leaf.jpg --crop-type rice --language hi
//!
//! # List supported crops
//! fasal crops
//!
//! # View configuration
//! fasal config show
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;
mod server;

/// FasalRakshak - AI-powered crop disease diagnosis relay.
#[derive(Parser, Debug)]
#[command(name = "fasal")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Path to a config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "FASAL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve(cli::serve::ServeArgs),

    /// Diagnose a local image and print the result as JSON
    Diagnose(cli::diagnose::DiagnoseArgs),

    /// Print the supported crop list as JSON
    Crops,

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match fasal_core::Config::load_with(cli.config.as_deref()) {
        Ok(config) => config,
        // A broken explicit file is fatal; a missing one is allowed so `config init` can create it.
        Err(e) if cli.config.as_deref().is_some_and(|p| p.exists()) => return Err(e.into()),
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `fasal config path`."
            );
            let mut config = fasal_core::Config::default();
            config.apply_overrides(|key| std::env::var(key).ok());
            config
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("FasalRakshak v{}", fasal_core::VERSION);

    match cli.command {
        Commands::Serve(args) => cli::serve::execute(args, config).await,
        Commands::Diagnose(args) => cli::diagnose::execute(args, config).await,
        Commands::Crops => cli::crops::execute(),
        Commands::Config(args) => cli::config::execute(args, config, cli.config).await,
    }
}
