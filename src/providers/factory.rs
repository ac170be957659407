// Provider factory
//
// Creates the LLM provider from configuration

use anyhow::{bail, Result};
use std::sync::Arc;

use super::openai::OpenAIProvider;
use super::LlmProvider;
use crate::config::Config;
use crate::errors::api_key_missing_error;

/// Create the chat-completion provider described by `config`
pub fn create_provider(config: &Config) -> Result<Arc<dyn LlmProvider>> {
    if !config.has_api_key() {
        bail!(api_key_missing_error());
    }

    let provider = OpenAIProvider::new(
        config.api_key.clone(),
        config.base_url.clone(),
        config.model.clone(),
    )?;

    tracing::debug!(model = %config.model, base_url = %config.base_url, "Created provider");
    Ok(Arc::new(provider))
}
