use crate::errors::ValidateError;
use crate::model::{
    EvidenceItem, EvidenceStatus, ProviderHealth, ValidationOutput, ValidationResult,
};
use crate::normalize::normalize;
use crate::providers::llm::ValidationClient;
use crate::storage::files::FileStore;
use crate::storage::store::Store;
use base64::Engine as _;
use std::sync::Arc;

/// Drives the evidence pipeline: intake, validation runs, deletion, and
/// provider health. Constructed once at startup and shared by handle.
///
/// Status machine per item: pending -> validating -> {validated | failed}.
/// Terminal states are re-enterable: a later `validate` call simply starts
/// a new run. Two concurrent runs on the same item are allowed to race:
/// both insert a result row and the last status write wins.
pub struct Validator {
    pub store: Store,
    pub files: Arc<dyn FileStore>,
    pub client: Arc<dyn ValidationClient>,
}

impl Validator {
    pub fn new(store: Store, files: Arc<dyn FileStore>, client: Arc<dyn ValidationClient>) -> Self {
        Self {
            store,
            files,
            client,
        }
    }

    /// Store the raw bytes and create a `pending` evidence item. If the row
    /// insert fails after the object was written, the object is removed
    /// best-effort before the error surfaces.
    pub async fn upload(
        &self,
        file_name: &str,
        bytes: &[u8],
        content_type: &str,
        principal: &str,
    ) -> Result<EvidenceItem, ValidateError> {
        if file_name.trim().is_empty() {
            return Err(ValidateError::invalid("file name is required"));
        }

        let file_path = format!(
            "uploads/{}_{}",
            chrono::Utc::now().timestamp_millis(),
            sanitize_file_name(file_name)
        );

        self.files
            .store(&file_path, bytes, content_type)
            .await
            .map_err(ValidateError::storage)?;

        let item = EvidenceItem {
            id: uuid::Uuid::new_v4().to_string(),
            file_path: file_path.clone(),
            file_name: file_name.to_string(),
            file_type: content_type.to_string(),
            file_size: bytes.len() as u64,
            uploaded_by: principal.to_string(),
            status: EvidenceStatus::Pending,
            detected_evidence_type: None,
            uploaded_at: chrono::Utc::now().to_rfc3339(),
        };

        if let Err(e) = self.store.insert_item(&item) {
            if let Err(cleanup) = self.files.remove(&file_path).await {
                tracing::warn!(path = %file_path, error = %cleanup, "orphaned object after failed insert");
            }
            return Err(ValidateError::persistence(e));
        }

        tracing::info!(id = %item.id, file = %item.file_name, "evidence uploaded");
        Ok(item)
    }

    /// Run one validation pass over an evidence item. See module docs for
    /// the status machine; every failure past step 2 leaves the item in
    /// `failed` and reports through the taxonomy.
    pub async fn validate(
        &self,
        evidence_item_id: &str,
        principal: Option<&str>,
    ) -> Result<ValidationOutput, ValidateError> {
        if evidence_item_id.trim().is_empty() {
            return Err(ValidateError::invalid("evidence_item_id is required"));
        }

        let item = self
            .store
            .get_item(evidence_item_id, principal)
            .map_err(ValidateError::persistence)?
            .ok_or_else(|| ValidateError::NotFound(evidence_item_id.to_string()))?;

        // Persisted before any external call so concurrent readers observe
        // the in-flight state.
        self.store
            .set_status(&item.id, EvidenceStatus::Validating)
            .map_err(ValidateError::persistence)?;

        let bytes = match self.files.fetch(&item.file_path).await {
            Ok(b) => b,
            Err(e) => {
                self.mark_failed(&item.id);
                return Err(ValidateError::storage(e));
            }
        };

        let outcome = if item.file_type.starts_with("image/") {
            let b64 = base64::engine::general_purpose::STANDARD.encode(&bytes);
            self.client.validate_image(&b64, &item.file_name).await
        } else {
            let text = String::from_utf8_lossy(&bytes);
            self.client.validate_text(&text, &item.file_name).await
        };

        if !outcome.success {
            self.mark_failed(&item.id);
            return Err(ValidateError::Inference {
                detail: outcome
                    .error
                    .unwrap_or_else(|| "provider reported failure".into()),
                model: outcome.model,
            });
        }

        let result = normalize(outcome.result.as_ref().unwrap_or(&serde_json::Value::Null));

        let row = ValidationResult {
            id: uuid::Uuid::new_v4().to_string(),
            evidence_item_id: item.id.clone(),
            result: result.clone(),
            model: outcome.model.clone(),
            processing_time_ms: outcome.processing_time_ms,
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        // The inference cost is already spent here; a failed write is an
        // accepted lossy outcome, logged and not retried.
        if let Err(e) = self.store.insert_result(&row) {
            tracing::error!(id = %item.id, error = %e, "validation result lost");
            self.mark_failed(&item.id);
            return Err(ValidateError::persistence(e));
        }

        if let Err(e) = self.store.set_validated(&item.id, &result.evidence_type) {
            self.mark_failed(&item.id);
            return Err(ValidateError::persistence(e));
        }

        tracing::info!(
            id = %item.id,
            model = %outcome.model,
            score = result.completeness_score,
            "validation completed"
        );

        Ok(ValidationOutput {
            validation_id: row.id,
            result,
            model: outcome.model,
            processing_time_ms: outcome.processing_time_ms,
        })
    }

    /// Item plus its validation history (newest first) and a download URL
    /// when the file backend can mint one.
    pub async fn show(
        &self,
        evidence_item_id: &str,
        principal: Option<&str>,
    ) -> Result<(EvidenceItem, Vec<ValidationResult>, Option<String>), ValidateError> {
        let item = self
            .store
            .get_item(evidence_item_id, principal)
            .map_err(ValidateError::persistence)?
            .ok_or_else(|| ValidateError::NotFound(evidence_item_id.to_string()))?;
        let results = self
            .store
            .results_for_item(&item.id)
            .map_err(ValidateError::persistence)?;
        let url = self.files.signed_url(&item.file_path, 3600).await;
        Ok((item, results, url))
    }

    /// Remove the row (results cascade) and the stored object.
    pub async fn delete(
        &self,
        evidence_item_id: &str,
        principal: Option<&str>,
    ) -> Result<(), ValidateError> {
        let file_path = self
            .store
            .delete_item(evidence_item_id, principal)
            .map_err(ValidateError::persistence)?
            .ok_or_else(|| ValidateError::NotFound(evidence_item_id.to_string()))?;

        if let Err(e) = self.files.remove(&file_path).await {
            tracing::warn!(path = %file_path, error = %e, "stored object could not be removed");
        }
        Ok(())
    }

    pub async fn health(&self) -> ProviderHealth {
        self.client.health().await
    }

    fn mark_failed(&self, id: &str) {
        if let Err(e) = self.store.set_status(id, EvidenceStatus::Failed) {
            tracing::error!(id = %id, error = %e, "could not mark item failed");
        }
    }
}

fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
