use attest_core::engine::validator::Validator;
use attest_core::errors::ValidateError;
use attest_core::model::EvidenceStatus;
use attest_core::providers::llm::fake::{FakeCall, FakeClient};
use attest_core::providers::llm::ValidationClient;
use attest_core::storage::files::{FileStore, LocalFileStore};
use attest_core::storage::store::Store;
use serde_json::json;
use std::sync::Arc;
use tempfile::tempdir;

fn policy_payload() -> serde_json::Value {
    json!({
        "evidence_type": "Policy Document",
        "mapped_control": {
            "framework": "ISO 27001",
            "control_id": "A.9.4",
            "control_name": "Access Control"
        },
        "completeness_score": 85,
        "extracted_data": {"mfa": "required"},
        "issues": [],
        "score_reasoning": "clear policy statement"
    })
}

fn harness(client: Arc<dyn ValidationClient>) -> anyhow::Result<(Validator, tempfile::TempDir)> {
    let dir = tempdir()?;
    let store = Store::memory()?;
    store.init_schema()?;
    let files = Arc::new(LocalFileStore::new(dir.path()));
    Ok((Validator::new(store, files, client), dir))
}

#[tokio::test]
async fn upload_then_validate_text_end_to_end() -> anyhow::Result<()> {
    let client = Arc::new(FakeClient::ok(policy_payload()));
    let (v, _dir) = harness(client.clone())?;

    let item = v
        .upload(
            "policy.txt",
            b"MFA required for all admins, enforced 2024-01-01",
            "text/plain",
            "auditor-1",
        )
        .await?;
    assert_eq!(item.status, EvidenceStatus::Pending);
    assert!(item.file_path.starts_with("uploads/"));

    let out = v.validate(&item.id, Some("auditor-1")).await?;
    assert_eq!(out.result.completeness_score, 85.0);
    assert_eq!(out.result.evidence_type, "Policy Document");
    assert_eq!(out.model, "fake:test");

    let (stored, results, url) = v.show(&item.id, Some("auditor-1")).await?;
    assert_eq!(stored.status, EvidenceStatus::Validated);
    assert_eq!(stored.detected_evidence_type.as_deref(), Some("Policy Document"));
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, out.validation_id);
    assert_eq!(results[0].result.completeness_score, 85.0);
    assert!(url.is_some());

    // Text path, not image path.
    let calls = client.calls.lock().unwrap();
    assert_eq!(
        *calls,
        vec![FakeCall::Text {
            file_name: "policy.txt".into()
        }]
    );
    Ok(())
}

#[tokio::test]
async fn image_content_type_routes_to_vision_path() -> anyhow::Result<()> {
    let client = Arc::new(FakeClient::ok(policy_payload()));
    let (v, _dir) = harness(client.clone())?;

    let item = v
        .upload("mfa.png", &[0x89, 0x50, 0x4e, 0x47], "image/png", "auditor-1")
        .await?;
    v.validate(&item.id, None).await?;

    let calls = client.calls.lock().unwrap();
    assert_eq!(
        *calls,
        vec![FakeCall::Image {
            file_name: "mfa.png".into()
        }]
    );
    Ok(())
}

#[tokio::test]
async fn adapter_failure_marks_item_failed_with_no_result_rows() -> anyhow::Result<()> {
    let (v, _dir) = harness(Arc::new(FakeClient::failing("model unavailable")))?;

    let item = v
        .upload("access.csv", b"user,role\nalice,admin", "text/csv", "auditor-1")
        .await?;
    let err = v.validate(&item.id, None).await.unwrap_err();
    assert!(matches!(err, ValidateError::Inference { .. }));

    let (stored, results, _) = v.show(&item.id, None).await?;
    assert_eq!(stored.status, EvidenceStatus::Failed);
    assert!(results.is_empty());
    Ok(())
}

#[tokio::test]
async fn failed_item_can_be_revalidated_to_validated() -> anyhow::Result<()> {
    let (v, dir) = harness(Arc::new(FakeClient::failing("timeout")))?;
    let item = v
        .upload("log.txt", b"2024-01-01 login ok", "text/plain", "auditor-1")
        .await?;
    assert!(v.validate(&item.id, None).await.is_err());

    // New run against the same store and objects, healthy provider now.
    let v2 = Validator::new(
        v.store.clone(),
        Arc::new(LocalFileStore::new(dir.path())),
        Arc::new(FakeClient::ok(policy_payload())),
    );
    let out = v2.validate(&item.id, None).await?;
    assert_eq!(out.result.completeness_score, 85.0);

    let (stored, results, _) = v2.show(&item.id, None).await?;
    assert_eq!(stored.status, EvidenceStatus::Validated);
    assert_eq!(results.len(), 1);
    Ok(())
}

#[tokio::test]
async fn missing_file_is_a_storage_failure() -> anyhow::Result<()> {
    let (v, _dir) = harness(Arc::new(FakeClient::ok(policy_payload())))?;
    let item = v
        .upload("gone.txt", b"bytes", "text/plain", "auditor-1")
        .await?;

    // Pull the object out from under the pipeline.
    v.files.remove(&item.file_path).await?;

    let err = v.validate(&item.id, None).await.unwrap_err();
    assert!(matches!(err, ValidateError::Storage { .. }));

    let (stored, _, _) = v.show(&item.id, None).await?;
    assert_eq!(stored.status, EvidenceStatus::Failed);
    Ok(())
}

#[tokio::test]
async fn unknown_id_is_not_found_and_blank_id_is_rejected() -> anyhow::Result<()> {
    let (v, _dir) = harness(Arc::new(FakeClient::ok(policy_payload())))?;
    assert!(matches!(
        v.validate("no-such-id", None).await.unwrap_err(),
        ValidateError::NotFound(_)
    ));
    assert!(matches!(
        v.validate("  ", None).await.unwrap_err(),
        ValidateError::InvalidInput { .. }
    ));
    assert!(matches!(
        v.upload("", b"x", "text/plain", "p").await.unwrap_err(),
        ValidateError::InvalidInput { .. }
    ));
    Ok(())
}

#[tokio::test]
async fn delete_removes_row_results_and_object() -> anyhow::Result<()> {
    let (v, _dir) = harness(Arc::new(FakeClient::ok(policy_payload())))?;
    let item = v
        .upload("policy.txt", b"MFA required", "text/plain", "auditor-1")
        .await?;

    // Two validation runs, two rows of history.
    v.validate(&item.id, None).await?;
    v.validate(&item.id, None).await?;
    let (_, results, _) = v.show(&item.id, None).await?;
    assert_eq!(results.len(), 2);

    v.delete(&item.id, Some("auditor-1")).await?;

    assert!(matches!(
        v.show(&item.id, None).await.unwrap_err(),
        ValidateError::NotFound(_)
    ));
    assert!(v.files.fetch(&item.file_path).await.is_err());

    // Cascade removed the history rows too.
    let conn = v.store.conn.lock().unwrap();
    let orphans: i64 = conn.query_row(
        "SELECT count(*) FROM validation_results WHERE evidence_item_id = ?1",
        [&item.id],
        |r| r.get(0),
    )?;
    assert_eq!(orphans, 0);
    Ok(())
}
