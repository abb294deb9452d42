use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

use crate::config::{AiConfig, AiProvider};
use crate::providers::{ollama::OllamaProvider, openai::OpenAiProvider};

/// Sampling knobs passed through to the backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    pub temperature: f64,
    pub max_tokens: u32,
}

impl From<&AiConfig> for GenerationOptions {
    fn from(config: &AiConfig) -> Self {
        Self {
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

/// Trait for AI providers
#[async_trait]
pub trait AiProviderTrait: Send + Sync {
    /// Generate a chat reply for a system prompt and a user prompt
    async fn generate(&self, system: &str, prompt: &str) -> Result<String>;

    /// Get the model name being used
    fn model_name(&self) -> &str;

    /// Check if the provider is available
    async fn is_available(&self) -> bool {
        true
    }
}

/// Create a provider instance based on configuration
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built or if `OpenAI` is
/// selected without an API key.
pub fn create_provider(config: &AiConfig) -> Result<Box<dyn AiProviderTrait>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds.max(1)))
        .build()
        .context("Failed to build HTTP client")?;
    let options = GenerationOptions::from(config);
    let base_url = config.effective_base_url();

    match config.provider {
        AiProvider::Ollama => Ok(Box::new(OllamaProvider::new(
            client,
            Some(base_url),
            &config.model,
            options,
        ))),
        AiProvider::OpenAi => {
            let api_key = config
                .effective_api_key()
                .context("API Key required for OpenAI")?;
            Ok(Box::new(OpenAiProvider::new(
                client,
                &api_key,
                &config.model,
                Some(base_url),
                options,
            )))
        }
    }
}
