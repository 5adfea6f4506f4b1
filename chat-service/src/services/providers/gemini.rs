//! Gemini provider implementation.
//!
//! Forwards the conversation history to Google's `generateContent` endpoint
//! and normalizes the response into text or a [`ProviderError`].

use super::{ChatProvider, ProviderError};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Gemini API base URL.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini provider configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Secret<String>,
    pub model: String,
    /// Overridable so tests can point the client at a local mock server.
    pub api_base: String,
}

/// Gemini chat provider.
pub struct GeminiChatProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiChatProvider {
    pub fn new(config: GeminiConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Check if the provider is configured (API key is set).
    pub fn is_configured(&self) -> bool {
        !self.config.api_key.expose_secret().is_empty()
    }

    fn api_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.config.api_base,
            self.config.model,
            self.config.api_key.expose_secret()
        )
    }
}

#[async_trait]
impl ChatProvider for GeminiChatProvider {
    async fn generate(&self, history: &[Value]) -> Result<String, ProviderError> {
        if !self.is_configured() {
            return Err(ProviderError::NotConfigured(
                "GEMINI_API_KEY is not set; refusing to call the upstream API".to_string(),
            ));
        }

        let request = GenerateContentRequest {
            contents: history.to_vec(),
        };

        tracing::debug!(
            model = %self.config.model,
            message_count = history.len(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(self.api_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        // The upstream embeds a structured error message even on failure
        // statuses, so the body is parsed as JSON regardless of status.
        if !status.is_success() {
            return Err(ProviderError::Api(upstream_error_message(&body)));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::Api(format!("Failed to parse upstream response: {}", e)))?;

        match extract_text(&parsed) {
            Some(text) => Ok(text),
            None => {
                let finish_reason = parsed
                    .candidates
                    .first()
                    .and_then(|c| c.finish_reason.as_deref());
                tracing::warn!(
                    status = %status,
                    finish_reason = ?finish_reason,
                    "Upstream returned no usable text"
                );
                Err(ProviderError::EmptyResponse)
            }
        }
    }
}

/// Pull the generated text out of an upstream response.
///
/// Total over every documented response shape: missing candidates, missing
/// parts, and empty strings all yield `None`.
fn extract_text(response: &GenerateContentResponse) -> Option<String> {
    let text = response
        .candidates
        .first()?
        .content
        .parts
        .first()?
        .text
        .as_deref()?;

    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Extract `error.message` from an upstream failure body, with a generic
/// fallback when the body is not JSON or carries no message.
fn upstream_error_message(body: &str) -> String {
    serde_json::from_str::<UpstreamErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error)
        .and_then(|detail| detail.message)
        .unwrap_or_else(|| "unknown upstream error".to_string())
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    /// The caller's history, forwarded verbatim.
    contents: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Content,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    error: Option<UpstreamErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorDetail {
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response_from(value: Value) -> GenerateContentResponse {
        serde_json::from_value(value).expect("test response should deserialize")
    }

    #[test]
    fn extract_text_returns_first_candidate_text() {
        let response = response_from(json!({
            "candidates": [
                { "content": { "parts": [{ "text": "hello" }] }, "finishReason": "STOP" }
            ]
        }));
        assert_eq!(extract_text(&response).as_deref(), Some("hello"));
    }

    #[test]
    fn extract_text_is_none_without_candidates() {
        let response = response_from(json!({}));
        assert_eq!(extract_text(&response), None);
    }

    #[test]
    fn extract_text_is_none_for_empty_parts() {
        let response = response_from(json!({
            "candidates": [{ "content": { "parts": [] }, "finishReason": "SAFETY" }]
        }));
        assert_eq!(extract_text(&response), None);
    }

    #[test]
    fn extract_text_is_none_for_empty_string() {
        let response = response_from(json!({
            "candidates": [{ "content": { "parts": [{ "text": "" }] } }]
        }));
        assert_eq!(extract_text(&response), None);
    }

    #[test]
    fn upstream_error_message_prefers_embedded_message() {
        let body = json!({
            "error": { "code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT" }
        })
        .to_string();
        assert_eq!(upstream_error_message(&body), "API key not valid");
    }

    #[test]
    fn upstream_error_message_falls_back_on_non_json() {
        assert_eq!(
            upstream_error_message("Service Unavailable"),
            "unknown upstream error"
        );
    }

    #[test]
    fn upstream_error_message_falls_back_on_missing_message() {
        let body = json!({ "error": { "code": 500 } }).to_string();
        assert_eq!(upstream_error_message(&body), "unknown upstream error");
    }

    #[test]
    fn request_payload_forwards_history_verbatim() {
        let history = vec![
            json!({ "role": "user", "parts": [{ "text": "hi" }] }),
            json!({ "custom": true }),
        ];
        let request = GenerateContentRequest {
            contents: history.clone(),
        };
        let payload = serde_json::to_value(&request).expect("request should serialize");
        assert_eq!(payload, json!({ "contents": history }));
    }
}
