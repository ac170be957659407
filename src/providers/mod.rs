// Chat-completion provider support
//
// The assistant talks to the LLM through the `LlmProvider` trait so the
// HTTP client can be swapped for a scripted provider in tests.

use anyhow::Result;
use async_trait::async_trait;

pub mod openai;
pub mod retry;
pub mod types;

pub mod factory;

pub use factory::create_provider;
pub use openai::{ApiStatusError, OpenAIProvider, DEFAULT_MODEL, OPENAI_BASE_URL};
pub use retry::RetryPolicy;
pub use types::{ChatMessage, CompletionRequest, ROLE_ASSISTANT, ROLE_SYSTEM, ROLE_USER};

/// Trait for LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send the conversation and return the assistant message text
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;

    /// Get the provider name (e.g., "openai")
    fn name(&self) -> &str;

    /// Get the default model for this provider
    fn default_model(&self) -> &str;
}
