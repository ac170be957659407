// OpenAI chat-completion provider
//
// Also works with any OpenAI-compatible endpoint via a custom base URL.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::retry::{with_retry_policy, RetryPolicy};
use super::types::{ChatMessage, CompletionRequest};
use super::LlmProvider;

const REQUEST_TIMEOUT_SECS: u64 = 60;
pub const OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4.1";

/// Non-success HTTP status from the completion endpoint
#[derive(Debug, thiserror::Error)]
#[error("OpenAI API request failed\n\nStatus: {status}\nBody: {body}")]
pub struct ApiStatusError {
    pub status: u16,
    pub body: String,
}

#[derive(Clone)]
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    base_url: String,
    default_model: String,
    retry: RetryPolicy,
}

impl OpenAIProvider {
    pub fn new(api_key: String, base_url: String, default_model: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            default_model,
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    /// Convert a CompletionRequest to the OpenAI wire format
    fn to_openai_request<'a>(&'a self, request: &'a CompletionRequest) -> OpenAIRequest<'a> {
        let model = if request.model.is_empty() {
            self.default_model.as_str()
        } else {
            request.model.as_str()
        };

        OpenAIRequest {
            model,
            messages: &request.messages,
            temperature: request.temperature,
            response_format: request.json_response.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        }
    }

    /// Send a single completion request (no retry)
    async fn complete_once(&self, request: &CompletionRequest) -> Result<String> {
        let openai_request = self.to_openai_request(request);

        tracing::debug!("Sending request to OpenAI API: {:?}", openai_request);

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&openai_request)
            .send()
            .await
            .context("Failed to send request to OpenAI API")?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiStatusError {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let openai_response: OpenAIResponse = response
            .json()
            .await
            .context("Failed to parse OpenAI API response")?;

        tracing::debug!("Received response: {:?}", openai_response);

        let choice = openai_response
            .choices
            .into_iter()
            .next()
            .context("OpenAI returned no choices in response")?;

        Ok(choice
            .message
            .content
            .unwrap_or_default()
            .trim()
            .to_string())
    }
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        with_retry_policy(self.retry, || self.complete_once(request)).await
    }

    fn name(&self) -> &str {
        "openai"
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }
}

// OpenAI API types

#[derive(Debug, Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn openai_provider(api_key: &str) -> Result<OpenAIProvider> {
        OpenAIProvider::new(
            api_key.to_string(),
            OPENAI_BASE_URL.to_string(),
            DEFAULT_MODEL.to_string(),
        )
    }

    #[test]
    fn test_openai_provider_creation() {
        let provider = openai_provider("test-key");
        assert!(provider.is_ok());
    }

    #[test]
    fn test_provider_name_and_model() {
        let provider = openai_provider("test-key").unwrap();
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.default_model(), DEFAULT_MODEL);
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let provider = OpenAIProvider::new(
            "k".to_string(),
            "http://localhost:1234/".to_string(),
            "m".to_string(),
        )
        .unwrap();
        assert_eq!(provider.endpoint(), "http://localhost:1234/v1/chat/completions");
    }

    #[test]
    fn test_wire_request_uses_default_model_and_json_format() {
        let provider = openai_provider("k").unwrap();
        let request =
            CompletionRequest::new(vec![ChatMessage::system("s"), ChatMessage::user("u")])
                .with_json_response(true);

        let wire = serde_json::to_value(provider.to_openai_request(&request)).unwrap();
        assert_eq!(wire["model"], DEFAULT_MODEL);
        assert_eq!(wire["messages"][1]["role"], "user");
        assert_eq!(wire["response_format"]["type"], "json_object");
        assert!(wire.get("temperature").is_none());
    }
}
