//! Google Gemini `generateContent` client.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::config::LlmConfig;
use crate::error::LlmError;
use crate::generator::TextGenerator;

/// Longest provider error body carried into [`LlmError::ApiError`].
const MAX_ERROR_BODY_CHARS: usize = 500;

#[cfg_attr(test, derive(Debug))]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Build a client from config. Fails if no API key is configured.
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = config.api_key.clone().ok_or(LlmError::MissingApiKey)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Endpoint without the key query parameter.
    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "Calling generateContent");

        // Errors carry the request URL, which includes the key.
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Request(e.without_url()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::Request(e.without_url()))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), model = %self.model, "generateContent failed");
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                body: text.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        parse_response(&text)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Concatenated text parts of the first candidate.
pub fn parse_response(body: &str) -> Result<String, LlmError> {
    let response: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn config_with_key(base_url: &str) -> LlmConfig {
        LlmConfig {
            api_key: Some("secret-key".to_string()),
            base_url: base_url.to_string(),
            timeout_secs: 5,
            ..LlmConfig::default()
        }
    }

    #[test]
    fn parses_first_candidate_parts() {
        let body = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "Mara dove "}, {"text": "at dawn."}], "role": "model"}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }"#;
        assert_eq!(parse_response(body).unwrap(), "Mara dove at dawn.");
    }

    #[test]
    fn no_candidates_is_empty_response() {
        let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        assert_matches!(parse_response(body), Err(LlmError::EmptyResponse));
    }

    #[test]
    fn candidate_without_content_is_empty_response() {
        let body = r#"{"candidates": [{"finishReason": "SAFETY"}]}"#;
        assert_matches!(parse_response(body), Err(LlmError::EmptyResponse));
    }

    #[test]
    fn non_json_is_invalid_response() {
        assert_matches!(parse_response("<html>"), Err(LlmError::InvalidResponse(_)));
    }

    #[test]
    fn missing_key_is_rejected() {
        assert_matches!(
            GeminiClient::new(&LlmConfig::default()),
            Err(LlmError::MissingApiKey)
        );
    }

    #[test]
    fn endpoint_uses_model_path() {
        let client = GeminiClient::new(&config_with_key("http://localhost:9/")).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:9/v1beta/models/gemini-2.0-flash:generateContent"
        );
        assert_eq!(client.model(), "gemini-2.0-flash");
    }

    #[tokio::test]
    async fn transport_error_does_not_leak_key() {
        let client = GeminiClient::new(&config_with_key("http://127.0.0.1:1")).unwrap();
        let err = client.generate("hello").await.unwrap_err();
        assert_matches!(err, LlmError::Request(_));
        assert!(!err.to_string().contains("secret-key"));
    }
}
