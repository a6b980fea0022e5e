use attest_core::model::{EvidenceItem, EvidenceStatus, ValidationResult};
use attest_core::normalize::normalize;
use attest_core::storage::store::Store;
use serde_json::json;

fn item(id: &str, owner: &str, uploaded_at: &str) -> EvidenceItem {
    EvidenceItem {
        id: id.into(),
        file_path: format!("uploads/{}.txt", id),
        file_name: format!("{}.txt", id),
        file_type: "text/plain".into(),
        file_size: 42,
        uploaded_by: owner.into(),
        status: EvidenceStatus::Pending,
        detected_evidence_type: None,
        uploaded_at: uploaded_at.into(),
    }
}

fn result_row(id: &str, item_id: &str, created_at: &str) -> ValidationResult {
    ValidationResult {
        id: id.into(),
        evidence_item_id: item_id.into(),
        result: normalize(&json!({"evidence_type": "Audit Log", "completeness_score": 60})),
        model: "fake:test".into(),
        processing_time_ms: 5,
        created_at: created_at.into(),
    }
}

#[test]
fn get_is_scoped_to_the_owning_principal() -> anyhow::Result<()> {
    let store = Store::memory()?;
    store.init_schema()?;
    store.insert_item(&item("e1", "alice", "2024-01-01T00:00:00Z"))?;

    assert!(store.get_item("e1", Some("alice"))?.is_some());
    assert!(store.get_item("e1", Some("bob"))?.is_none());
    // Service-level call sees everything.
    assert!(store.get_item("e1", None)?.is_some());
    Ok(())
}

#[test]
fn list_never_leaks_across_principals() -> anyhow::Result<()> {
    let store = Store::memory()?;
    store.init_schema()?;
    store.insert_item(&item("a1", "alice", "2024-01-01T00:00:00Z"))?;
    store.insert_item(&item("a2", "alice", "2024-01-03T00:00:00Z"))?;
    store.insert_item(&item("b1", "bob", "2024-01-02T00:00:00Z"))?;

    let mine = store.list_items(Some("alice"), None, 50, 0)?;
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|i| i.uploaded_by == "alice"));
    // Newest first.
    assert_eq!(mine[0].id, "a2");
    assert_eq!(mine[1].id, "a1");

    let everyone = store.list_items(None, None, 50, 0)?;
    assert_eq!(everyone.len(), 3);
    Ok(())
}

#[test]
fn list_filters_by_status_and_paginates() -> anyhow::Result<()> {
    let store = Store::memory()?;
    store.init_schema()?;
    for (id, at) in [
        ("e1", "2024-01-01T00:00:00Z"),
        ("e2", "2024-01-02T00:00:00Z"),
        ("e3", "2024-01-03T00:00:00Z"),
    ] {
        store.insert_item(&item(id, "alice", at))?;
    }
    store.set_status("e2", EvidenceStatus::Validated)?;

    let pending = store.list_items(Some("alice"), Some(EvidenceStatus::Pending), 50, 0)?;
    assert_eq!(pending.len(), 2);

    let page = store.list_items(Some("alice"), None, 1, 1)?;
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, "e2");
    Ok(())
}

#[test]
fn delete_is_scoped_and_cascades_to_results() -> anyhow::Result<()> {
    let store = Store::memory()?;
    store.init_schema()?;
    store.insert_item(&item("e1", "alice", "2024-01-01T00:00:00Z"))?;
    store.insert_result(&result_row("r1", "e1", "2024-01-01T01:00:00Z"))?;
    store.insert_result(&result_row("r2", "e1", "2024-01-01T02:00:00Z"))?;

    // Wrong principal cannot delete.
    assert!(store.delete_item("e1", Some("bob"))?.is_none());
    assert!(store.get_item("e1", None)?.is_some());

    let path = store.delete_item("e1", Some("alice"))?;
    assert_eq!(path.as_deref(), Some("uploads/e1.txt"));
    assert!(store.get_item("e1", None)?.is_none());

    let conn = store.conn.lock().unwrap();
    let remaining: i64 =
        conn.query_row("SELECT count(*) FROM validation_results", [], |r| r.get(0))?;
    assert_eq!(remaining, 0);
    Ok(())
}

#[test]
fn results_order_newest_first_and_latest_picks_head() -> anyhow::Result<()> {
    let store = Store::memory()?;
    store.init_schema()?;
    store.insert_item(&item("e1", "alice", "2024-01-01T00:00:00Z"))?;
    store.insert_result(&result_row("r1", "e1", "2024-01-01T01:00:00Z"))?;
    store.insert_result(&result_row("r2", "e1", "2024-01-01T02:00:00Z"))?;

    let results = store.results_for_item("e1")?;
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, "r2");

    let latest = store.latest_result("e1")?.unwrap();
    assert_eq!(latest.id, "r2");
    assert_eq!(latest.result.evidence_type, "Audit Log");
    Ok(())
}

#[test]
fn status_roundtrips_through_the_db() -> anyhow::Result<()> {
    let store = Store::memory()?;
    store.init_schema()?;
    store.insert_item(&item("e1", "alice", "2024-01-01T00:00:00Z"))?;

    store.set_status("e1", EvidenceStatus::Validating)?;
    assert_eq!(
        store.get_item("e1", None)?.unwrap().status,
        EvidenceStatus::Validating
    );

    store.set_validated("e1", "User Access List")?;
    let got = store.get_item("e1", None)?.unwrap();
    assert_eq!(got.status, EvidenceStatus::Validated);
    assert_eq!(got.detected_evidence_type.as_deref(), Some("User Access List"));
    Ok(())
}
