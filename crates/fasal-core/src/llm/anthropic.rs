//! Anthropic provider using the Messages API.
//!
//! Sends the image as a base64 content block followed by the user
//! instruction, with the system instruction on its own `system` field.

use super::provider::{LlmProvider, LlmRequest, LlmResponse, ProviderConfig};
use crate::error::{DiagnosisError, DiagnosisResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic provider using the Messages API.
pub struct AnthropicProvider {
    api_key: String,
    model: String,
    endpoint: String,
    max_tokens: u32,
    timeout: Duration,
    client: reqwest::Client,
}

impl AnthropicProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            endpoint: config.endpoint.clone(),
            max_tokens: config.max_tokens,
            timeout: config.timeout,
            client: reqwest::Client::new(),
        }
    }

    fn error(&self, message: String, status_code: Option<u16>) -> DiagnosisError {
        DiagnosisError::Provider {
            provider: self.name().to_string(),
            message,
            status_code,
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Vec<ContentBlock<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ContentBlock<'a> {
    #[serde(rename = "image")]
    Image { source: ImageSource<'a> },
    #[serde(rename = "text")]
    Text { text: &'a str },
}

#[derive(Serialize)]
struct ImageSource<'a> {
    #[serde(rename = "type")]
    source_type: &'static str,
    media_type: &'a str,
    data: &'a str,
}

// --- Response types ---

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseContent>,
    model: String,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct ResponseContent {
    text: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "Claude"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &LlmRequest) -> DiagnosisResult<LlmResponse> {
        let start = Instant::now();

        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system: &request.prompt.system,
            messages: vec![Message {
                role: "user",
                content: vec![
                    ContentBlock::Image {
                        source: ImageSource {
                            source_type: "base64",
                            media_type: &request.image.media_type,
                            data: &request.image.data,
                        },
                    },
                    ContentBlock::Text {
                        text: &request.prompt.user,
                    },
                ],
            }],
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    self.error(
                        format!("request timed out after {}ms", self.timeout.as_millis()),
                        None,
                    )
                } else {
                    self.error(format!("request failed: {e}"), None)
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(self.error(format!("HTTP {status}: {text}"), Some(status.as_u16())));
        }

        let messages_resp: MessagesResponse = resp
            .json()
            .await
            .map_err(|e| self.error(format!("failed to parse response: {e}"), None))?;

        // First text segment only; tool-use or other block types are skipped
        let text = messages_resp
            .content
            .into_iter()
            .find_map(|c| c.text)
            .ok_or_else(|| self.error("response contained no text content".to_string(), None))?;

        Ok(LlmResponse {
            text,
            model: messages_resp.model,
            tokens_used: messages_resp
                .usage
                .map(|u| u.input_tokens + u.output_tokens),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}
