use crate::config::ProviderConfig;
use crate::model::{InferenceOutcome, ProviderHealth};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait ValidationClient: Send + Sync {
    async fn validate_text(&self, content: &str, file_name: &str) -> InferenceOutcome;
    async fn validate_image(&self, image_b64: &str, file_name: &str) -> InferenceOutcome;
    async fn health(&self) -> ProviderHealth;
    fn provider_name(&self) -> &'static str;
}

/// Build the one client this process uses. Selection is static for the
/// process lifetime; there is no per-call override and no fallback.
pub fn build_client(cfg: &ProviderConfig) -> Arc<dyn ValidationClient> {
    match cfg {
        ProviderConfig::Cloud {
            api_key,
            text_model,
            vision_model,
        } => Arc::new(gemini::GeminiClient::new(
            api_key.clone(),
            text_model.clone(),
            vision_model.clone(),
        )),
        ProviderConfig::Local {
            base_url,
            text_model,
            vision_model,
        } => Arc::new(ollama::OllamaClient::new(
            base_url.clone(),
            text_model.clone(),
            vision_model.clone(),
        )),
    }
}

pub mod extract;
pub mod fake;
pub mod gemini;
pub mod ollama;
pub mod prompt;
