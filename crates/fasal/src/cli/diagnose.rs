//! The `fasal diagnose` command: run the pipeline on a local file.

use anyhow::Context;
use clap::Args;
use fasal_core::types::DEFAULT_LANGUAGE;
use fasal_core::{Config, Diagnoser, DiagnosisRequest};
use std::path::PathBuf;

/// Arguments for the `diagnose` command.
#[derive(Args, Debug)]
pub struct DiagnoseArgs {
    /// Crop image to diagnose
    pub image: PathBuf,

    /// Crop type (rice, wheat, tomato, ...)
    #[arg(long)]
    pub crop_type: Option<String>,

    /// Response language tag ("hi" for Hindi, anything else is English)
    #[arg(short, long, default_value = DEFAULT_LANGUAGE)]
    pub language: String,

    /// Print compact JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,
}

/// Execute the diagnose command.
pub async fn execute(args: DiagnoseArgs, config: Config) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.image)
        .with_context(|| format!("Failed to read {}", args.image.display()))?;

    let diagnoser = Diagnoser::from_config(&config);
    let request = DiagnosisRequest {
        crop_type: args.crop_type,
        language: args.language,
        ..DiagnosisRequest::default()
    };

    let response = diagnoser.diagnose(bytes, &request).await?;

    let json = if args.compact {
        serde_json::to_string(&response)?
    } else {
        serde_json::to_string_pretty(&response)?
    };
    println!("{json}");
    Ok(())
}
