pub const DDL: &str = r#"
CREATE TABLE IF NOT EXISTS evidence_items (
  id TEXT PRIMARY KEY,
  file_path TEXT NOT NULL,
  file_name TEXT NOT NULL,
  file_type TEXT NOT NULL,
  file_size INTEGER NOT NULL,
  uploaded_by TEXT NOT NULL,
  status TEXT NOT NULL,
  detected_evidence_type TEXT,
  uploaded_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS validation_results (
  id TEXT PRIMARY KEY,
  evidence_item_id TEXT NOT NULL REFERENCES evidence_items(id) ON DELETE CASCADE,
  result_json TEXT NOT NULL,
  model_used TEXT NOT NULL,
  processing_time_ms INTEGER NOT NULL,
  created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_results_item ON validation_results(evidence_item_id);
CREATE INDEX IF NOT EXISTS idx_items_uploaded_at ON evidence_items(uploaded_at);
"#;
