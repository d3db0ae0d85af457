//! FasalRakshak Core - crop disease diagnosis relay.
//!
//! Accepts a crop image, forwards it to one remote multimodal LLM provider,
//! and returns a fixed-shape diagnosis record.
//!
//! # Architecture
//!
//! ```text
//! Upload → Normalize (≤2048px JPEG) → Prompt (en/hi) → Provider (Claude | OpenAI) → Shape → JSON
//! ```
//!
//! The provider is chosen once at startup from configuration; every request
//! shares it read-only.
//!
//! # Usage
//!
//! ```rust,ignore
//! use fasal_core::{Config, Diagnoser, DiagnosisRequest};
//!
//! #[tokio::main]
//! async fn main() -> fasal_core::Result<()> {
//!     let config = Config::load()?;
//!     let diagnoser = Diagnoser::from_config(&config);
//!
//!     let bytes = std::fs::read("leaf.jpg")?;
//!     let response = diagnoser.diagnose(bytes, &DiagnosisRequest::default()).await?;
//!     println!("{}", response.description);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod catalog;
pub mod config;
pub mod diagnoser;
pub mod error;
pub mod llm;
pub mod normalize;
pub mod prompt;
pub mod shape;
pub mod types;

// Re-exports for convenient access
pub use catalog::{supported_crops, Crop, CropCatalog};
pub use config::Config;
pub use diagnoser::Diagnoser;
pub use error::{ConfigError, DiagnosisError, DiagnosisResult, FasalError, Result};
pub use llm::{LlmProvider, ProviderConfig, ProviderKind};
pub use normalize::{ImageNormalizer, NormalizedImage};
pub use prompt::{DiagnosisPrompt, Language};
pub use types::{DiagnosisRequest, DiagnosisResponse, Severity};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, "1.0.0");
    }
}
