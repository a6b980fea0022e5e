use super::{extract::extract_json, prompt, ValidationClient};
use crate::model::{InferenceOutcome, ProviderHealth};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Instant;

/// Local backend speaking the Ollama generate API.
pub struct OllamaClient {
    pub base_url: String,
    pub text_model: String,
    pub vision_model: String,
    pub client: reqwest::Client,
}

impl OllamaClient {
    pub fn new(base_url: String, text_model: String, vision_model: String) -> Self {
        Self {
            base_url,
            text_model,
            vision_model,
            client: reqwest::Client::new(),
        }
    }

    fn model_id(&self, model: &str) -> String {
        format!("ollama:{}", model)
    }

    async fn generate(
        &self,
        model: &str,
        prompt: String,
        images: Option<Vec<&str>>,
    ) -> anyhow::Result<Value> {
        let mut body = json!({
            "model": model,
            "prompt": prompt,
            "system": prompt::SYSTEM_PROMPT,
            "format": "json",
            "stream": false,
            "options": {
                "temperature": 0.1,
                "num_predict": 2048,
            }
        });
        if let Some(images) = images {
            body["images"] = json!(images);
        }

        let resp = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!(
                "Ollama API error: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            );
        }

        let data: Value = resp.json().await?;
        let text = data
            .get("response")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow::anyhow!("no response text from Ollama"))?;

        extract_json(text)
    }
}

#[async_trait]
impl ValidationClient for OllamaClient {
    async fn validate_text(&self, content: &str, file_name: &str) -> InferenceOutcome {
        let started = Instant::now();
        let model = self.model_id(&self.text_model);
        match self
            .generate(&self.text_model, prompt::text_prompt(content, file_name), None)
            .await
        {
            Ok(result) => {
                InferenceOutcome::ok(result, model, started.elapsed().as_millis() as u64)
            }
            Err(e) => {
                tracing::warn!(error = %e, "ollama text validation failed");
                InferenceOutcome::fail(e.to_string(), model, started.elapsed().as_millis() as u64)
            }
        }
    }

    async fn validate_image(&self, image_b64: &str, file_name: &str) -> InferenceOutcome {
        let started = Instant::now();
        let model = self.model_id(&self.vision_model);
        match self
            .generate(
                &self.vision_model,
                prompt::image_prompt(file_name),
                Some(vec![image_b64]),
            )
            .await
        {
            Ok(result) => {
                InferenceOutcome::ok(result, model, started.elapsed().as_millis() as u64)
            }
            Err(e) => {
                tracing::warn!(error = %e, "ollama image validation failed");
                InferenceOutcome::fail(e.to_string(), model, started.elapsed().as_millis() as u64)
            }
        }
    }

    // Reachability of the tags endpoint, plus whether models matching the
    // configured text/vision prefixes are present in the inventory.
    async fn health(&self) -> ProviderHealth {
        let resp = match self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                return ProviderHealth {
                    provider: "ollama".into(),
                    available: false,
                    models: vec![],
                    has_text_model: false,
                    has_vision_model: false,
                    error: Some(e.to_string()),
                }
            }
        };

        if !resp.status().is_success() {
            return ProviderHealth {
                provider: "ollama".into(),
                available: false,
                models: vec![],
                has_text_model: false,
                has_vision_model: false,
                error: Some("Ollama API not responding".into()),
            };
        }

        let data: Value = resp.json().await.unwrap_or(Value::Null);
        let models: Vec<String> = data
            .get("models")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|m| m.get("name").and_then(|n| n.as_str()))
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let has_text_model = has_model_prefix(&models, &self.text_model);
        let has_vision_model = has_model_prefix(&models, &self.vision_model);

        ProviderHealth {
            provider: "ollama".into(),
            available: true,
            models,
            has_text_model,
            has_vision_model,
            error: None,
        }
    }

    fn provider_name(&self) -> &'static str {
        "ollama"
    }
}

// "qwen2.5:7b" matches any inventory entry starting with "qwen2.5".
fn has_model_prefix(models: &[String], configured: &str) -> bool {
    let prefix = configured.split(':').next().unwrap_or(configured);
    models.iter().any(|m| m.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::has_model_prefix;

    #[test]
    fn prefix_matching_ignores_tag() {
        let models = vec!["qwen2.5:14b-instruct".to_string(), "llava:7b".to_string()];
        assert!(has_model_prefix(&models, "qwen2.5:7b"));
        assert!(has_model_prefix(&models, "llava:7b"));
        assert!(!has_model_prefix(&models, "mistral:7b"));
    }
}
