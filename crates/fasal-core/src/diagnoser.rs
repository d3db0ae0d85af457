//! Orchestrates one diagnose call.
//!
//! ```text
//! upload → ImageNormalizer → DiagnosisPrompt → LlmProvider → shape_response
//! ```

use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::error::{DiagnosisError, DiagnosisResult};
use crate::llm::{LlmProvider, LlmProviderFactory, LlmRequest, ProviderConfig};
use crate::normalize::ImageNormalizer;
use crate::prompt::DiagnosisPrompt;
use crate::shape::shape_response;
use crate::types::{DiagnosisRequest, DiagnosisResponse};

/// Stateless diagnosis pipeline shared by all requests.
pub struct Diagnoser {
    normalizer: ImageNormalizer,
    provider: Option<Arc<dyn LlmProvider>>,
}

impl Diagnoser {
    /// Create a diagnoser with an explicit provider (`None` = unconfigured).
    pub fn new(normalizer: ImageNormalizer, provider: Option<Arc<dyn LlmProvider>>) -> Self {
        Self {
            normalizer,
            provider,
        }
    }

    /// Build from loaded configuration, resolving the active provider once.
    pub fn from_config(config: &Config) -> Self {
        let provider = match ProviderConfig::resolve(&config.llm) {
            Some(resolved) => {
                tracing::info!(
                    "Using {} provider (model: {})",
                    resolved.kind.label(),
                    resolved.model
                );
                Some(LlmProviderFactory::create(&resolved))
            }
            None => {
                tracing::warn!(
                    "No AI provider configured; diagnose requests will fail until \
                     ANTHROPIC_API_KEY or OPENAI_API_KEY is set"
                );
                None
            }
        };
        Self::new(ImageNormalizer::new(config.image.clone()), provider)
    }

    /// Label of the active provider, or `"none"`.
    pub fn provider_name(&self) -> &str {
        self.provider.as_deref().map_or("none", |p| p.name())
    }

    /// Run the full pipeline for one upload.
    ///
    /// The image is validated before the provider check, so a bad upload is
    /// reported as such even when no provider is configured.
    pub async fn diagnose(
        &self,
        image: Vec<u8>,
        request: &DiagnosisRequest,
    ) -> DiagnosisResult<DiagnosisResponse> {
        let start = Instant::now();

        let normalized = self.normalizer.normalize(image).await?;
        tracing::debug!(
            "Normalized {} upload {}x{} -> {}x{} ({} bytes)",
            normalized.source_format,
            normalized.original_width,
            normalized.original_height,
            normalized.width,
            normalized.height,
            normalized.bytes.len()
        );

        let provider = self
            .provider
            .as_ref()
            .ok_or(DiagnosisError::NoProviderConfigured)?;

        let prompt = DiagnosisPrompt::build(request.crop_type(), &request.language);
        let llm_request = LlmRequest::new(normalized.to_image_input(), prompt);

        let reply = provider.generate(&llm_request).await.inspect_err(|e| {
            tracing::warn!("{} call failed: {e}", provider.name());
        })?;

        tracing::info!(
            provider = provider.name(),
            model = %reply.model,
            latency_ms = reply.latency_ms,
            tokens = ?reply.tokens_used,
            total_ms = start.elapsed().as_millis() as u64,
            "Diagnosis generated"
        );

        Ok(shape_response(&reply.text, &request.language))
    }
}
