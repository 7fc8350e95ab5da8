use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[cfg(feature = "rig")]
pub use openrouter::{DEFAULT_MODEL, OpenRouterGenerator};

/// Options passed along with every generation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Token ceiling for the response
    pub max_tokens: u64,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self { max_tokens: 500 }
    }
}

/// External generative-text collaborator
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, options: GenerateOptions) -> Result<String>;
}

/// Offline generator that always answers with the same text
#[derive(Debug, Clone)]
pub struct CannedTextGenerator {
    text: String,
}

impl CannedTextGenerator {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Default for CannedTextGenerator {
    fn default() -> Self {
        Self::new("Analysis queued for manual review.")
    }
}

#[async_trait]
impl TextGenerator for CannedTextGenerator {
    async fn generate(&self, _prompt: &str, _options: GenerateOptions) -> Result<String> {
        Ok(self.text.clone())
    }
}

#[cfg(feature = "rig")]
mod openrouter {
    use async_trait::async_trait;
    use rig::{client::CompletionClient, completion::Prompt, providers::openrouter};
    use tracing::debug;

    use super::{GenerateOptions, TextGenerator};
    use crate::error::{DashboardError, Result};

    pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

    const ANALYST_PREAMBLE: &str = "You are an insurance claims analyst. \
        Assess fraud risk and processing recommendations for the claim you are given.";

    /// Text generator backed by an OpenRouter chat model
    pub struct OpenRouterGenerator {
        client: openrouter::Client,
        model: String,
    }

    impl OpenRouterGenerator {
        pub fn new(api_key: &str, model: impl Into<String>) -> Self {
            Self {
                client: openrouter::Client::new(api_key),
                model: model.into(),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for OpenRouterGenerator {
        async fn generate(&self, prompt: &str, options: GenerateOptions) -> Result<String> {
            debug!(model = %self.model, max_tokens = options.max_tokens, "Requesting completion");
            let agent = self
                .client
                .agent(&self.model)
                .preamble(ANALYST_PREAMBLE)
                .max_tokens(options.max_tokens)
                .build();

            agent
                .prompt(prompt)
                .await
                .map_err(|e| DashboardError::GenerationFailed(e.to_string()))
        }
    }
}
