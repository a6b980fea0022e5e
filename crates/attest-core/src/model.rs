use serde::{Deserialize, Serialize};

/// One uploaded file plus its lifecycle status and metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceItem {
    pub id: String,
    pub file_path: String,
    pub file_name: String,
    pub file_type: String,
    pub file_size: u64,
    pub uploaded_by: String,
    pub status: EvidenceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_evidence_type: Option<String>,
    pub uploaded_at: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceStatus {
    Pending,
    Validating,
    Validated,
    Failed,
}

impl EvidenceStatus {
    pub fn parse(s: &str) -> Self {
        match s {
            "pending" => EvidenceStatus::Pending,
            "validating" => EvidenceStatus::Validating,
            "validated" => EvidenceStatus::Validated,
            "failed" => EvidenceStatus::Failed,
            _ => EvidenceStatus::Pending, // Default fallback
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EvidenceStatus::Pending => "pending",
            EvidenceStatus::Validating => "validating",
            EvidenceStatus::Validated => "validated",
            EvidenceStatus::Failed => "failed",
        }
    }
}

/// One persisted outcome of running an evidence item through a provider.
/// Immutable once written; multiple rows may accumulate per item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub id: String,
    pub evidence_item_id: String,
    pub result: NormalizedResult,
    pub model: String,
    pub processing_time_ms: u64,
    pub created_at: String,
}

/// The structured payload embedded in a [`ValidationResult`].
///
/// Produced only by [`crate::normalize::normalize`], which guarantees every
/// field is populated and the score sits in [0, 100].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedResult {
    pub evidence_type: String,
    pub mapped_control: MappedControl,
    pub completeness_score: f64,
    pub extracted_data: serde_json::Map<String, serde_json::Value>,
    pub issues: Vec<Issue>,
    pub score_reasoning: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappedControl {
    pub framework: String,
    pub control_id: String,
    pub control_name: String,
}

/// Issues come back from models either as bare strings or as structured
/// risk entries; both shapes are preserved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Issue {
    Structured {
        risk_level: String,
        issue_description: String,
    },
    Text(String),
}

/// Tagged outcome of a single provider call. Provider failures report
/// through the `success: false` branch rather than an `Err`; wall-clock
/// timing is included either way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub model: String,
    pub processing_time_ms: u64,
}

impl InferenceOutcome {
    pub fn ok(result: serde_json::Value, model: String, processing_time_ms: u64) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
            model,
            processing_time_ms,
        }
    }

    pub fn fail(error: String, model: String, processing_time_ms: u64) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error),
            model,
            processing_time_ms,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderHealth {
    pub provider: String,
    pub available: bool,
    #[serde(default)]
    pub models: Vec<String>,
    pub has_text_model: bool,
    pub has_vision_model: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// What `validate` hands back to the caller on success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationOutput {
    pub validation_id: String,
    pub result: NormalizedResult,
    pub model: String,
    pub processing_time_ms: u64,
}
