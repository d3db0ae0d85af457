//! LLM provider trait, request/response types and startup selection.
//!
//! Defines the interface both remote providers implement, the immutable
//! [`ProviderConfig`] resolved once at startup, and the factory that turns
//! it into a provider.

use crate::config::LlmConfig;
use crate::error::DiagnosisResult;
use crate::prompt::DiagnosisPrompt;
use async_trait::async_trait;
use base64::Engine;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Base64-encoded image ready to send to an LLM API.
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// Base64-encoded image bytes
    pub data: String,
    /// MIME type
    pub media_type: String,
}

impl ImageInput {
    /// Wrap JPEG bytes.
    pub fn jpeg(bytes: &[u8]) -> Self {
        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            media_type: "image/jpeg".to_string(),
        }
    }

    /// Return a data URL suitable for OpenAI-style APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// A request to diagnose one crop image.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    /// The normalized crop image
    pub image: ImageInput,
    /// Locale-specific instructions
    pub prompt: DiagnosisPrompt,
}

impl LlmRequest {
    pub fn new(image: ImageInput, prompt: DiagnosisPrompt) -> Self {
        Self { image, prompt }
    }
}

/// The response from an LLM diagnosis call.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Raw reply text
    pub text: String,
    /// Model identifier reported by the provider
    pub model: String,
    /// Number of tokens used (input + output), if reported
    pub tokens_used: Option<u32>,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Trait that both remote providers implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (the facade holds an `Arc<dyn LlmProvider>`).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Display label, also used in error messages (e.g., "Claude").
    fn name(&self) -> &str;

    /// Configured model identifier.
    fn model(&self) -> &str;

    /// Send the image and prompt; return the model's reply text.
    async fn generate(&self, request: &LlmRequest) -> DiagnosisResult<LlmResponse>;
}

/// The two supported remote providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Anthropic,
    OpenAi,
}

impl ProviderKind {
    /// Human-facing label reported by the health check and in errors.
    pub fn label(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "Claude",
            ProviderKind::OpenAi => "OpenAI",
        }
    }
}

/// The active provider, resolved once at startup.
#[derive(Clone)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("kind", &self.kind)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ProviderConfig {
    /// Resolve the active provider from config and the process environment.
    ///
    /// With `prefer_anthropic` set, Anthropic wins if its key resolves and
    /// OpenAI is the fallback. With it cleared, Anthropic is switched off and
    /// only OpenAI is considered. `None` means no provider is usable.
    pub fn resolve(config: &LlmConfig) -> Option<Self> {
        Self::resolve_with(config, |name| std::env::var(name).ok())
    }

    /// Same as [`ProviderConfig::resolve`] with an explicit variable lookup.
    pub fn resolve_with<F>(config: &LlmConfig, lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let order: &[ProviderKind] = if config.prefer_anthropic {
            &[ProviderKind::Anthropic, ProviderKind::OpenAi]
        } else {
            &[ProviderKind::OpenAi]
        };
        let timeout = Duration::from_millis(config.timeout_ms);

        order.iter().copied().find_map(|kind| {
            let (raw_key, model, endpoint, max_tokens) = match kind {
                ProviderKind::Anthropic => {
                    let c = &config.anthropic;
                    (&c.api_key, &c.model, &c.endpoint, c.max_tokens)
                }
                ProviderKind::OpenAi => {
                    let c = &config.openai;
                    (&c.api_key, &c.model, &c.endpoint, c.max_tokens)
                }
            };
            resolve_env_var_with(raw_key, &lookup).map(|api_key| Self {
                kind,
                api_key,
                model: model.clone(),
                endpoint: endpoint.clone(),
                max_tokens,
                timeout,
            })
        })
    }
}

/// Resolve a `${ENV_VAR}` reference (or literal) in a config string.
fn resolve_env_var_with<F>(value: &str, lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let resolved = if value.starts_with("${") && value.ends_with('}') {
        lookup(&value[2..value.len() - 1])?
    } else {
        value.to_string()
    };
    let resolved = resolved.trim();
    if resolved.is_empty() {
        None
    } else {
        Some(resolved.to_string())
    }
}

/// Factory that creates the provider named by a [`ProviderConfig`].
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    pub fn create(config: &ProviderConfig) -> Arc<dyn LlmProvider> {
        match config.kind {
            ProviderKind::Anthropic => {
                Arc::new(super::anthropic::AnthropicProvider::new(config))
            }
            ProviderKind::OpenAi => Arc::new(super::openai::OpenAiProvider::new(config)),
        }
    }
}
