//! OpenAI provider using the Chat Completions API.
//!
//! There is no separate system channel here: system and user instructions
//! travel as one text part next to a data-URL image part.

use super::provider::{LlmProvider, LlmRequest, LlmResponse, ProviderConfig};
use crate::error::{DiagnosisError, DiagnosisResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// OpenAI provider using Chat Completions API.
pub struct OpenAiProvider {
    api_key: String,
    model: String,
    endpoint: String,
    max_tokens: u32,
    timeout: Duration,
    client: reqwest::Client,
}

impl OpenAiProvider {
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
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Vec<ChatContent>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ChatContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    model: String,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "OpenAI"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &LlmRequest) -> DiagnosisResult<LlmResponse> {
        let start = Instant::now();

        let body = ChatRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ChatContent::Text {
                        text: request.prompt.combined(),
                    },
                    ChatContent::ImageUrl {
                        image_url: ImageUrl {
                            url: request.image.data_url(),
                        },
                    },
                ],
            }],
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
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

        let chat_resp: ChatResponse = resp
            .json()
            .await
            .map_err(|e| self.error(format!("failed to parse response: {e}"), None))?;

        let text = chat_resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| self.error("response contained no choices".to_string(), None))?;

        Ok(LlmResponse {
            text,
            model: chat_resp.model,
            tokens_used: chat_resp.usage.map(|u| u.total_tokens),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::{ImageInput, ProviderKind};
    use crate::prompt::DiagnosisPrompt;
    use httpmock::prelude::*;
    use serde_json::json;

    fn provider_for(server: &MockServer) -> OpenAiProvider {
        OpenAiProvider::new(&ProviderConfig {
            kind: ProviderKind::OpenAi,
            api_key: "sk-test".to_string(),
            model: "gpt-test".to_string(),
            endpoint: server.url("/v1/chat/completions"),
            max_tokens: 2000,
            timeout: Duration::from_secs(5),
        })
    }

    fn request(language: &str) -> LlmRequest {
        LlmRequest::new(
            ImageInput::jpeg(&[0xFF, 0xD8, 0xFF]),
            DiagnosisPrompt::build(Some("wheat"), language),
        )
    }

    #[tokio::test]
    async fn test_generate_sends_combined_message_with_data_url() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/chat/completions")
                    .header("Authorization", "Bearer sk-test")
                    .body_contains("\"url\":\"data:image/jpeg;base64,/9j/\"")
                    .body_contains("You are an expert agricultural scientist")
                    .body_contains("Crop type: wheat")
                    .body_contains("\"max_tokens\":2000");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({
                        "model": "gpt-test",
                        "choices": [
                            {"message": {"role": "assistant", "content": "Yellow rust."}},
                            {"message": {"role": "assistant", "content": "Ignored."}}
                        ],
                        "usage": {"total_tokens": 42}
                    }));
            })
            .await;

        let response = provider_for(&server)
            .generate(&request("en"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.text, "Yellow rust.");
        assert_eq!(response.tokens_used, Some(42));
    }

    #[tokio::test]
    async fn test_no_system_field_is_sent() {
        let server = MockServer::start_async().await;
        let with_system = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/chat/completions")
                    .body_contains("\"role\":\"system\"");
                then.status(500);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(200).json_body(json!({
                    "model": "gpt-test",
                    "choices": [{"message": {"content": "ok"}}]
                }));
            })
            .await;

        let response = provider_for(&server)
            .generate(&request("hi"))
            .await
            .unwrap();
        assert_eq!(response.text, "ok");
        with_system.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_empty_choices_is_provider_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(200)
                    .json_body(json!({"model": "gpt-test", "choices": []}));
            })
            .await;

        let err = provider_for(&server)
            .generate(&request("en"))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("OpenAI API error:"));
    }

    #[tokio::test]
    async fn test_quota_error_not_retried() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(429).body("insufficient_quota");
            })
            .await;

        let err = provider_for(&server)
            .generate(&request("en"))
            .await
            .unwrap_err();

        mock.assert_hits_async(1).await;
        match err {
            DiagnosisError::Provider {
                status_code,
                message,
                ..
            } => {
                assert_eq!(status_code, Some(429));
                assert!(message.contains("insufficient_quota"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_provider_error() {
        let provider = OpenAiProvider::new(&ProviderConfig {
            kind: ProviderKind::OpenAi,
            api_key: "sk-test".to_string(),
            model: "gpt-test".to_string(),
            endpoint: "http://127.0.0.1:1/v1/chat/completions".to_string(),
            max_tokens: 2000,
            timeout: Duration::from_secs(5),
        });
        let err = provider.generate(&request("en")).await.unwrap_err();
        assert!(err.to_string().contains("request failed"));
    }
}
