use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::ai_provider::{create_provider, AiProviderTrait};
use crate::config::AiConfig;
use crate::generator::MessageGenerator;

const DEFAULT_SYSTEM_PROMPT: &str = "You are a strict but caring mentor. \
     Scold the user about the time they are wasting on their PC: short, sharp and logical. \
     Keep it under 100 words. \
     End with exactly one concrete suggestion for improvement.";

/// Message generator backed by an LLM provider
///
/// Turns the violation reason and today's usage summary into a short
/// scolding. Any transport or content failure is returned as an error so the
/// caller can substitute a fallback.
pub struct ScoldingService {
    provider: Box<dyn AiProviderTrait>,
    system_prompt: String,
}

impl ScoldingService {
    /// Create a new service from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be constructed
    pub fn new(config: &AiConfig) -> Result<Self> {
        let provider = create_provider(config)?;
        log::info!(
            "Message generator initialized: provider={}, model={}, url={}",
            config.provider,
            provider.model_name(),
            config.effective_base_url()
        );
        Ok(Self::with_provider(provider, config.system_prompt.clone()))
    }

    /// Wrap an existing provider
    #[must_use]
    pub fn with_provider(provider: Box<dyn AiProviderTrait>, system_prompt: Option<String>) -> Self {
        Self {
            provider,
            system_prompt: system_prompt.unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
        }
    }

    /// Check if the backing provider answers
    pub async fn is_available(&self) -> bool {
        self.provider.is_available().await
    }

    fn build_prompt(usage_context: &str) -> String {
        format!("Here is the user's PC usage:\n{usage_context}\n\nScold this user.")
    }
}

#[async_trait]
impl MessageGenerator for ScoldingService {
    async fn generate(&self, usage_context: &str) -> Result<String> {
        let prompt = Self::build_prompt(usage_context);
        let reply = self
            .provider
            .generate(&self.system_prompt, &prompt)
            .await
            .context("Failed to generate intervention message")?;

        let message = reply.trim();
        if message.is_empty() {
            anyhow::bail!("Empty response from {}", self.provider.model_name());
        }

        log::info!("Generated intervention message ({} chars)", message.chars().count());
        Ok(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedProvider(&'static str);

    #[async_trait]
    impl AiProviderTrait for CannedProvider {
        async fn generate(&self, system: &str, prompt: &str) -> Result<String> {
            assert!(!system.is_empty());
            assert!(prompt.contains("chrome.exe"));
            Ok(self.0.to_string())
        }

        fn model_name(&self) -> &str {
            "canned"
        }
    }

    struct DownProvider;

    #[async_trait]
    impl AiProviderTrait for DownProvider {
        async fn generate(&self, _system: &str, _prompt: &str) -> Result<String> {
            anyhow::bail!("connection refused")
        }

        fn model_name(&self) -> &str {
            "down"
        }

        async fn is_available(&self) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn test_generate_trims_reply() {
        let service = ScoldingService::with_provider(Box::new(CannedProvider("  Log off.\n")), None);
        let message = service.generate("Blacklisted chrome.exe").await.unwrap();
        assert_eq!(message, "Log off.");
    }

    #[tokio::test]
    async fn test_empty_reply_is_an_error() {
        let service = ScoldingService::with_provider(Box::new(CannedProvider("   ")), None);
        assert!(service.generate("chrome.exe").await.is_err());
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let service = ScoldingService::with_provider(Box::new(DownProvider), None);
        assert!(service.generate("chrome.exe").await.is_err());
        assert!(!service.is_available().await);
    }

    #[test]
    fn test_custom_system_prompt() {
        let service = ScoldingService::with_provider(
            Box::new(DownProvider),
            Some("Be gentle.".to_string()),
        );
        assert_eq!(service.system_prompt, "Be gentle.");
    }
}
