//! Anthropic Claude API Provider
//!
//! Call strategy using the Anthropic Messages API.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use super::{LlmProvider, validate_api_base};
use crate::config::ProviderSettings;
use crate::types::{ErrorClassifier, PilotError, Result};

const DEFAULT_API_BASE: &str = "https://api.anthropic.com";
const DEFAULT_MODEL: &str = "claude-3-sonnet-20240229";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Claude call strategy with secure API key handling.
pub struct ClaudeProvider {
    api_key: SecretString,
    api_base: String,
    model: String,
    max_tokens: usize,
    client: reqwest::Client,
}

impl std::fmt::Debug for ClaudeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaudeProvider")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl ClaudeProvider {
    pub fn new(api_key: &str, settings: &ProviderSettings) -> Result<Self> {
        let api_base = match &settings.api_base {
            Some(base) => validate_api_base(base)?,
            None => DEFAULT_API_BASE.to_string(),
        };

        let model = settings
            .model
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| PilotError::LlmApi(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: SecretString::from(api_key.to_string()),
            api_base,
            model,
            max_tokens: settings.max_tokens,
            client,
        })
    }

    fn build_request(&self, prompt: &str) -> MessagesRequest {
        MessagesRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        }
    }
}

#[async_trait]
impl LlmProvider for ClaudeProvider {
    async fn generate(&self, prompt: &str) -> Result<String> {
        info!("Generating with Claude (model: {})", self.model);

        let request = self.build_request(prompt);
        let url = format!("{}/v1/messages", self.api_base);

        debug!("Sending request to Anthropic API");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                PilotError::Llm(ErrorClassifier::classify(
                    &format!("Claude request failed: {}", e),
                    "claude",
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PilotError::Llm(ErrorClassifier::classify_http_status(
                status.as_u16(),
                &format!("Anthropic API error ({}): {}", status, body),
                "claude",
            )));
        }

        let response_body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| PilotError::LlmApi(format!("Failed to parse Claude response: {}", e)))?;

        if let Some(usage) = &response_body.usage {
            debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "Claude token usage"
            );
        }

        extract_text(response_body)
    }

    fn name(&self) -> &str {
        "claude"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

fn extract_text(body: MessagesResponse) -> Result<String> {
    let text: String = body
        .content
        .into_iter()
        .filter_map(|block| block.text)
        .collect::<Vec<_>>()
        .join("");

    if text.is_empty() {
        return Err(PilotError::LlmApi(
            "No content in Claude response".to_string(),
        ));
    }

    Ok(text.trim().to_string())
}

// Request/Response types

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: usize,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let provider = ClaudeProvider::new("sk-ant-test", &ProviderSettings::default())
            .expect("Failed to create provider");
        assert_eq!(provider.api_base, DEFAULT_API_BASE);
        assert_eq!(provider.model, DEFAULT_MODEL);
        assert_eq!(provider.name(), "claude");
    }

    #[test]
    fn test_build_request_includes_max_tokens() {
        let settings = ProviderSettings {
            max_tokens: 256,
            ..Default::default()
        };
        let provider =
            ClaudeProvider::new("sk-ant-test", &settings).expect("Failed to create provider");
        let request = provider.build_request("hello");
        assert_eq!(request.max_tokens, 256);
        assert_eq!(request.messages[0].content, "hello");
    }

    #[test]
    fn test_extract_text_joins_blocks() {
        let body: MessagesResponse = serde_json::from_str(
            r#"{"content": [{"type": "text", "text": "Dear "}, {"type": "text", "text": "recruiter\n"}]}"#,
        )
        .expect("valid response");
        assert_eq!(extract_text(body).expect("content"), "Dear recruiter");
    }

    #[test]
    fn test_extract_text_empty_content() {
        let body: MessagesResponse =
            serde_json::from_str(r#"{"content": []}"#).expect("valid response");
        assert!(extract_text(body).is_err());
    }
}
