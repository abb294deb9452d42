use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::ai_provider::{AiProviderTrait, GenerationOptions};

/// Local Ollama Provider
pub struct OllamaProvider {
    client: Client,
    base_url: String,
    model: String,
    options: GenerationOptions,
}

impl OllamaProvider {
    pub fn new(
        client: Client,
        base_url: Option<&str>,
        model: &str,
        options: GenerationOptions,
    ) -> Self {
        Self {
            client,
            base_url: base_url
                .unwrap_or("http://localhost:11434")
                .trim_end_matches('/')
                .to_string(),
            model: model.to_string(),
            options,
        }
    }

    fn request_body(&self, system: &str, prompt: &str) -> Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": prompt }
            ],
            "stream": false,
            "options": {
                "temperature": self.options.temperature,
                "num_predict": self.options.max_tokens
            }
        })
    }
}

/// Extract text from: message.content
fn extract_content(json: &Value) -> Option<String> {
    json["message"]["content"].as_str().map(ToString::to_string)
}

#[async_trait]
impl AiProviderTrait for OllamaProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, system: &str, prompt: &str) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&self.request_body(system, prompt))
            .send()
            .await
            .context("Failed to send request to Ollama")?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Ollama API error: {error_text}");
        }

        let json: Value = response
            .json()
            .await
            .context("Failed to parse Ollama response")?;

        extract_content(&json).context("Failed to extract text from Ollama response")
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                log::warn!("Ollama server not available: {e}");
                false
            }
        }
    }
}
