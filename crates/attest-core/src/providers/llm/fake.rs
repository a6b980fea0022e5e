use super::ValidationClient;
use crate::model::{InferenceOutcome, ProviderHealth};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

/// Scripted client for tests: returns a canned payload or a canned error
/// and records every call it sees.
pub struct FakeClient {
    canned: Option<Value>,
    error: Option<String>,
    pub model: String,
    pub calls: Mutex<Vec<FakeCall>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeCall {
    Text { file_name: String },
    Image { file_name: String },
}

impl FakeClient {
    pub fn ok(canned: Value) -> Self {
        Self {
            canned: Some(canned),
            error: None,
            model: "fake:test".into(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: impl Into<String>) -> Self {
        Self {
            canned: None,
            error: Some(error.into()),
            model: "fake:test".into(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn outcome(&self) -> InferenceOutcome {
        match (&self.canned, &self.error) {
            (Some(v), _) => InferenceOutcome::ok(v.clone(), self.model.clone(), 7),
            (None, Some(e)) => InferenceOutcome::fail(e.clone(), self.model.clone(), 7),
            (None, None) => InferenceOutcome::fail("unscripted".into(), self.model.clone(), 7),
        }
    }
}

#[async_trait]
impl ValidationClient for FakeClient {
    async fn validate_text(&self, _content: &str, file_name: &str) -> InferenceOutcome {
        self.calls.lock().unwrap().push(FakeCall::Text {
            file_name: file_name.to_string(),
        });
        self.outcome()
    }

    async fn validate_image(&self, _image_b64: &str, file_name: &str) -> InferenceOutcome {
        self.calls.lock().unwrap().push(FakeCall::Image {
            file_name: file_name.to_string(),
        });
        self.outcome()
    }

    async fn health(&self) -> ProviderHealth {
        ProviderHealth {
            provider: "fake".into(),
            available: true,
            models: vec![self.model.clone()],
            has_text_model: true,
            has_vision_model: true,
            error: None,
        }
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}
