use super::{extract::extract_json, prompt, ValidationClient};
use crate::model::{InferenceOutcome, ProviderHealth};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Instant;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Cloud backend. One synchronous request per call, no retry; transport
/// errors and non-2xx responses surface through the failure branch of the
/// outcome, never as a process error.
pub struct GeminiClient {
    pub api_key: String,
    pub text_model: String,
    pub vision_model: String,
    pub client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(api_key: String, text_model: String, vision_model: String) -> Self {
        Self {
            api_key,
            text_model,
            vision_model,
            client: reqwest::Client::new(),
        }
    }

    fn model_id(&self, model: &str) -> String {
        format!("gemini:{}", model)
    }

    async fn generate(&self, model: &str, parts: Vec<Value>) -> anyhow::Result<Value> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            API_BASE, model, self.api_key
        );

        let body = json!({
            "contents": [{ "parts": parts }],
            "generationConfig": {
                "temperature": 0.1,
                "maxOutputTokens": 2048,
                "responseMimeType": "application/json",
            }
        });

        let resp = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let detail: Value = resp.json().await.unwrap_or(Value::Null);
            let message = detail
                .pointer("/error/message")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown error");
            anyhow::bail!("Gemini API error: {} - {}", status.as_u16(), message);
        }

        let data: Value = resp.json().await?;
        let text = data
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow::anyhow!("no response text from Gemini"))?;

        extract_json(text)
    }
}

#[async_trait]
impl ValidationClient for GeminiClient {
    async fn validate_text(&self, content: &str, file_name: &str) -> InferenceOutcome {
        let started = Instant::now();
        let prompt = format!(
            "{}\n\n{}",
            prompt::SYSTEM_PROMPT,
            prompt::text_prompt(content, file_name)
        );
        let parts = vec![json!({ "text": prompt })];

        let model = self.model_id(&self.text_model);
        match self.generate(&self.text_model, parts).await {
            Ok(result) => {
                InferenceOutcome::ok(result, model, started.elapsed().as_millis() as u64)
            }
            Err(e) => {
                tracing::warn!(error = %e, "gemini text validation failed");
                InferenceOutcome::fail(e.to_string(), model, started.elapsed().as_millis() as u64)
            }
        }
    }

    async fn validate_image(&self, image_b64: &str, file_name: &str) -> InferenceOutcome {
        let started = Instant::now();
        let prompt = format!(
            "{}\n\n{}",
            prompt::SYSTEM_PROMPT,
            prompt::image_prompt(file_name)
        );
        let parts = vec![
            json!({ "text": prompt }),
            json!({
                "inline_data": {
                    "mime_type": "image/png",
                    "data": image_b64,
                }
            }),
        ];

        let model = self.model_id(&self.vision_model);
        match self.generate(&self.vision_model, parts).await {
            Ok(result) => {
                InferenceOutcome::ok(result, model, started.elapsed().as_millis() as u64)
            }
            Err(e) => {
                tracing::warn!(error = %e, "gemini image validation failed");
                InferenceOutcome::fail(e.to_string(), model, started.elapsed().as_millis() as u64)
            }
        }
    }

    // Credential check: a lightweight list-models call.
    async fn health(&self) -> ProviderHealth {
        let url = format!("{}/models?key={}", API_BASE, self.api_key);
        match self.client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => ProviderHealth {
                provider: "gemini".into(),
                available: true,
                models: vec![self.text_model.clone(), self.vision_model.clone()],
                has_text_model: true,
                has_vision_model: true,
                error: None,
            },
            Ok(_) => ProviderHealth {
                provider: "gemini".into(),
                available: false,
                models: vec![],
                has_text_model: false,
                has_vision_model: false,
                error: Some("invalid Gemini API key or API error".into()),
            },
            Err(e) => ProviderHealth {
                provider: "gemini".into(),
                available: false,
                models: vec![],
                has_text_model: false,
                has_vision_model: false,
                error: Some(e.to_string()),
            },
        }
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}
