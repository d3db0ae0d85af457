//! Provider gateway for crop image diagnosis.
//!
//! Provides one provider abstraction over two remote multimodal backends
//! (Anthropic, OpenAI). Exactly one is selected at startup from configuration
//! and shared by every request.

pub(crate) mod anthropic;
pub(crate) mod openai;
pub(crate) mod provider;

pub use provider::{
    ImageInput, LlmProvider, LlmProviderFactory, LlmRequest, LlmResponse, ProviderConfig,
    ProviderKind,
};
