use crate::model::{Issue, MappedControl, NormalizedResult};
use serde_json::Value;

/// Coerce arbitrary (possibly partial) model output into the fixed result
/// shape. Total: never fails, whatever the provider returned. Missing or
/// wrong-typed fields fall back to sentinels, and the completeness score is
/// clamped to [0, 100].
pub fn normalize(raw: &Value) -> NormalizedResult {
    let evidence_type = str_or(raw.get("evidence_type"), "Unknown Evidence");

    let mc = raw.get("mapped_control");
    let mapped_control = MappedControl {
        framework: str_or(mc.and_then(|m| m.get("framework")), "Unknown"),
        control_id: str_or(mc.and_then(|m| m.get("control_id")), "N/A"),
        control_name: str_or(mc.and_then(|m| m.get("control_name")), "Unknown Control"),
    };

    let completeness_score = raw
        .get("completeness_score")
        .and_then(coerce_number)
        .unwrap_or(0.0)
        .clamp(0.0, 100.0);

    let extracted_data = raw
        .get("extracted_data")
        .and_then(|v| v.as_object())
        .cloned()
        .unwrap_or_default();

    let issues = raw
        .get("issues")
        .and_then(|v| v.as_array())
        .map(|arr| arr.iter().filter_map(issue_from).collect())
        .unwrap_or_default();

    let score_reasoning = str_or(raw.get("score_reasoning"), "No reasoning provided");

    NormalizedResult {
        evidence_type,
        mapped_control,
        completeness_score,
        extracted_data,
        issues,
        score_reasoning,
    }
}

fn str_or(v: Option<&Value>, default: &str) -> String {
    v.and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
        .to_string()
}

// Models occasionally hand the score back as a string ("85").
fn coerce_number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn issue_from(v: &Value) -> Option<Issue> {
    match v {
        Value::String(s) => Some(Issue::Text(s.clone())),
        Value::Object(o) => Some(Issue::Structured {
            risk_level: o
                .get("risk_level")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown")
                .to_string(),
            issue_description: o
                .get("issue_description")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
        }),
        _ => None,
    }
}
