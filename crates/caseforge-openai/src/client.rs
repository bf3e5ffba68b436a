// SPDX-FileCopyrightText: 2026 Caseforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the OpenAI chat-completions API.
//!
//! Provides [`OpenAiClient`] which handles request construction,
//! authentication, and transient error retry. All settings come from an
//! explicit [`OpenAiConfig`] injected at construction -- there is no
//! ambient credential state.

use std::time::Duration;

use caseforge_config::OpenAiConfig;
use caseforge_core::CaseforgeError;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, ChatMessage, ChatRequest, ChatResponse};

/// Path of the chat-completions endpoint, appended to the configured origin.
const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// HTTP client for OpenAI API communication.
///
/// Manages authentication headers, connection pooling, and retry logic for
/// transient errors (429, 500, 502, 503).
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    model: String,
    temperature: f64,
    max_tokens: u32,
    max_retries: u32,
    base_url: String,
}

impl OpenAiClient {
    /// Creates a new OpenAI API client from explicit configuration.
    ///
    /// Fails with a configuration error when the API key is unset.
    pub fn new(config: &OpenAiConfig) -> Result<Self, CaseforgeError> {
        if config.api_key.trim().is_empty() {
            return Err(CaseforgeError::Config(
                "openai.api_key is not set".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| CaseforgeError::Config(format!("invalid API key header value: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            "content-type",
            HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CaseforgeError::Generation {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            max_retries: 1,
            base_url: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Returns the configured model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Sends a chat-completions request and returns the parsed response.
    ///
    /// On transient errors (429, 500, 502, 503), retries once after a
    /// 1-second delay.
    pub async fn complete_chat(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<ChatResponse, CaseforgeError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };
        let url = format!("{}{CHAT_COMPLETIONS_PATH}", self.base_url);

        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying completion request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(&url)
                .json(&request)
                .send()
                .await
                .map_err(|e| CaseforgeError::Generation {
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, "completion response received");

            if status.is_success() {
                let body = response.text().await.map_err(|e| CaseforgeError::Generation {
                    message: format!("failed to read response body: {e}"),
                    source: Some(Box::new(e)),
                })?;
                let parsed: ChatResponse =
                    serde_json::from_str(&body).map_err(|e| CaseforgeError::Generation {
                        message: format!("failed to parse API response: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                return Ok(parsed);
            }

            if is_transient_error(status) && attempt < self.max_retries {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(CaseforgeError::generation(format!(
                    "API returned {status}: {body}"
                )));
                continue;
            }

            // Non-transient error or exhausted retries.
            let body = response.text().await.unwrap_or_default();
            let message = if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&body) {
                format!(
                    "OpenAI API error ({}): {}",
                    api_err.error.type_.as_deref().unwrap_or("unknown"),
                    api_err.error.message
                )
            } else {
                format!("API returned {status}: {body}")
            };
            return Err(CaseforgeError::generation(message));
        }

        Err(last_error
            .unwrap_or_else(|| CaseforgeError::generation("completion request failed after retries")))
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth
/// retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> OpenAiConfig {
        OpenAiConfig {
            api_key: "sk-test-key".to_string(),
            ..OpenAiConfig::default()
        }
    }

    fn test_client(base_url: &str) -> OpenAiClient {
        OpenAiClient::new(&test_config())
            .unwrap()
            .with_base_url(base_url.to_string())
    }

    fn success_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-test",
            "choices": [
                {"message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 12, "completion_tokens": 7, "total_tokens": 19}
        })
    }

    #[test]
    fn missing_api_key_is_a_config_error() {
        let config = OpenAiConfig::default();
        let err = OpenAiClient::new(&config).unwrap_err();
        assert!(matches!(err, CaseforgeError::Config(_)), "got: {err}");
    }

    #[tokio::test]
    async fn complete_chat_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("{\"ok\": true}")))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let response = client
            .complete_chat(vec![ChatMessage::user("hello")])
            .await
            .unwrap();
        assert_eq!(response.choices[0].message.content, "{\"ok\": true}");
        assert_eq!(response.usage.unwrap().total_tokens, 19);
    }

    #[tokio::test]
    async fn complete_chat_retries_on_429() {
        let server = MockServer::start().await;
        let error_body = serde_json::json!({
            "error": {"message": "Rate limited", "type": "rate_limit_error"}
        });

        // First request returns 429, second returns 200.
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_json(&error_body))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("after retry")))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let response = client
            .complete_chat(vec![ChatMessage::user("hello")])
            .await
            .unwrap();
        assert_eq!(response.choices[0].message.content, "after retry");
    }

    #[tokio::test]
    async fn complete_chat_fails_on_400_with_api_detail() {
        let server = MockServer::start().await;
        let error_body = serde_json::json!({
            "error": {"message": "Bad model", "type": "invalid_request_error"}
        });
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(400).set_body_json(&error_body))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .complete_chat(vec![ChatMessage::user("hello")])
            .await
            .unwrap_err();
        let text = err.to_string();
        assert!(text.contains("invalid_request_error"), "got: {text}");
        assert!(matches!(err, CaseforgeError::Generation { .. }));
    }

    #[tokio::test]
    async fn complete_chat_exhausts_retries_on_503() {
        let server = MockServer::start().await;
        let error_body = serde_json::json!({
            "error": {"message": "Service overloaded", "type": "server_error"}
        });
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(503).set_body_json(&error_body))
            .expect(2)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .complete_chat(vec![ChatMessage::user("hello")])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("server_error"), "got: {err}");
    }

    #[tokio::test]
    async fn client_sends_auth_header_and_model_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test-key"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4o-mini",
                "temperature": 0.55,
                "max_tokens": 1500
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("ok")))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.complete_chat(vec![ChatMessage::user("hello")]).await;
        assert!(result.is_ok(), "headers/payload should match: {result:?}");
    }
}
