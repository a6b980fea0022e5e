use crate::model::{EvidenceItem, EvidenceStatus, ValidationResult};
use anyhow::Context;
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// SQLite-backed evidence repository. Every read/write that receives a
/// principal is scoped to rows owned by that principal; a `None` principal
/// is a service-level call and sees everything.
#[derive(Clone)]
pub struct Store {
    pub conn: Arc<Mutex<Connection>>,
}

impl Store {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let conn = Connection::open(path).context("failed to open sqlite db")?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory sqlite db")?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn init_schema(&self) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(crate::storage::schema::DDL)?;
        Ok(())
    }

    pub fn insert_item(&self, item: &EvidenceItem) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO evidence_items
               (id, file_path, file_name, file_type, file_size, uploaded_by, status,
                detected_evidence_type, uploaded_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                item.id,
                item.file_path,
                item.file_name,
                item.file_type,
                item.file_size as i64,
                item.uploaded_by,
                item.status.as_str(),
                item.detected_evidence_type,
                item.uploaded_at,
            ],
        )
        .context("insert evidence item")?;
        Ok(())
    }

    pub fn get_item(
        &self,
        id: &str,
        principal: Option<&str>,
    ) -> anyhow::Result<Option<EvidenceItem>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, file_path, file_name, file_type, file_size, uploaded_by, status,
                    detected_evidence_type, uploaded_at
             FROM evidence_items
             WHERE id = ?1 AND (?2 IS NULL OR uploaded_by = ?2)",
        )?;
        let mut rows = stmt.query(params![id, principal])?;
        match rows.next()? {
            Some(row) => Ok(Some(item_from_row(row)?)),
            None => Ok(None),
        }
    }

    pub fn list_items(
        &self,
        principal: Option<&str>,
        status: Option<EvidenceStatus>,
        limit: u32,
        offset: u32,
    ) -> anyhow::Result<Vec<EvidenceItem>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, file_path, file_name, file_type, file_size, uploaded_by, status,
                    detected_evidence_type, uploaded_at
             FROM evidence_items
             WHERE (?1 IS NULL OR uploaded_by = ?1)
               AND (?2 IS NULL OR status = ?2)
             ORDER BY uploaded_at DESC, rowid DESC
             LIMIT ?3 OFFSET ?4",
        )?;
        let rows = stmt.query_map(
            params![principal, status.map(|s| s.as_str()), limit, offset],
            |row| {
                item_from_row(row).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        0,
                        rusqlite::types::Type::Text,
                        e.into(),
                    )
                })
            },
        )?;

        let mut items = Vec::new();
        for r in rows {
            items.push(r?);
        }
        Ok(items)
    }

    pub fn set_status(&self, id: &str, status: EvidenceStatus) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE evidence_items SET status = ?1 WHERE id = ?2",
            params![status.as_str(), id],
        )?;
        Ok(())
    }

    /// Terminal success transition: one UPDATE so status and detected type
    /// land together.
    pub fn set_validated(&self, id: &str, detected_type: &str) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE evidence_items
             SET status = 'validated', detected_evidence_type = ?1
             WHERE id = ?2",
            params![detected_type, id],
        )?;
        Ok(())
    }

    pub fn insert_result(&self, row: &ValidationResult) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO validation_results
               (id, evidence_item_id, result_json, model_used, processing_time_ms, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                row.id,
                row.evidence_item_id,
                serde_json::to_string(&row.result)?,
                row.model,
                row.processing_time_ms as i64,
                row.created_at,
            ],
        )
        .context("insert validation result")?;
        Ok(())
    }

    pub fn results_for_item(&self, evidence_item_id: &str) -> anyhow::Result<Vec<ValidationResult>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, evidence_item_id, result_json, model_used, processing_time_ms, created_at
             FROM validation_results
             WHERE evidence_item_id = ?1
             ORDER BY created_at DESC, rowid DESC",
        )?;
        let rows = stmt.query_map(params![evidence_item_id], |row| {
            result_from_row(row).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, e.into())
            })
        })?;

        let mut results = Vec::new();
        for r in rows {
            results.push(r?);
        }
        Ok(results)
    }

    pub fn latest_result(&self, evidence_item_id: &str) -> anyhow::Result<Option<ValidationResult>> {
        Ok(self.results_for_item(evidence_item_id)?.into_iter().next())
    }

    /// Deletes the row (results cascade via FK) and hands back the stored
    /// object key so the caller can remove the file. `None` when the item
    /// does not exist or is owned by someone else.
    pub fn delete_item(
        &self,
        id: &str,
        principal: Option<&str>,
    ) -> anyhow::Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let file_path: Option<String> = conn
            .query_row(
                "SELECT file_path FROM evidence_items
                 WHERE id = ?1 AND (?2 IS NULL OR uploaded_by = ?2)",
                params![id, principal],
                |r| r.get(0),
            )
            .ok();

        let Some(file_path) = file_path else {
            return Ok(None);
        };

        conn.execute("DELETE FROM evidence_items WHERE id = ?1", params![id])
            .context("delete evidence item")?;
        Ok(Some(file_path))
    }
}

fn item_from_row(row: &Row<'_>) -> anyhow::Result<EvidenceItem> {
    Ok(EvidenceItem {
        id: row.get(0)?,
        file_path: row.get(1)?,
        file_name: row.get(2)?,
        file_type: row.get(3)?,
        file_size: row.get::<_, i64>(4)? as u64,
        uploaded_by: row.get(5)?,
        status: EvidenceStatus::parse(&row.get::<_, String>(6)?),
        detected_evidence_type: row.get(7)?,
        uploaded_at: row.get(8)?,
    })
}

fn result_from_row(row: &Row<'_>) -> anyhow::Result<ValidationResult> {
    let result_json: String = row.get(2)?;
    Ok(ValidationResult {
        id: row.get(0)?,
        evidence_item_id: row.get(1)?,
        result: serde_json::from_str(&result_json).context("parse stored result payload")?,
        model: row.get(3)?,
        processing_time_ms: row.get::<_, i64>(4)? as u64,
        created_at: row.get(5)?,
    })
}
