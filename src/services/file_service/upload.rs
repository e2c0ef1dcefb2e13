use crate::api::error::AppError;
use crate::services::records::NewFileRecord;
use crate::services::storage::{FileDescription, StorageError};
use bytes::Bytes;
use chrono::{DateTime, Utc};

use super::FileService;

/// An uploaded multipart file as handed over by the HTTP layer.
pub struct UploadRequest {
    pub original_file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
    pub delete_key: Option<String>,
}

pub struct UploadOutcome {
    pub description: FileDescription,
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub delete_key: Option<String>,
}

impl FileService {
    /// Admission pipeline: validate, name, resolve duplicates, write to
    /// storage, persist metadata.
    pub async fn upload(&self, request: UploadRequest) -> Result<UploadOutcome, AppError> {
        let content_type = request
            .content_type
            .as_deref()
            .filter(|ct| self.classifier.is_allowed(ct))
            .ok_or_else(|| AppError::BadRequest("File type not allowed".to_string()))?
            .to_string();

        let name = self.namer.object_name(&request.original_file_name);
        tracing::info!("Processing upload for file: {}", name);

        // A generated-name collision means "file already exists": the old
        // object is cleaned up best-effort and its record replaced below.
        let existing = self.records.find_by_name(&name).await?;
        if let Some(ref previous) = existing {
            tracing::info!("File already exists, deleting previous version: {}", name);
            match self.gateway.remove(&previous.path).await {
                Ok(()) => {}
                Err(StorageError::NotFound) => {
                    tracing::debug!("Previous object already gone: {}", previous.path);
                }
                Err(e) => {
                    tracing::warn!("Could not delete previous object {}: {}", previous.path, e);
                }
            }
        }

        let folder = self.classifier.classify(Some(&content_type));
        let path = format!("{}/{}", folder, name);

        self.gateway
            .put(&path, request.bytes, &content_type)
            .await
            .map_err(AppError::from)?;

        // Re-describe immediately to capture authoritative metadata.
        let description = self.gateway.describe(&path).await.map_err(AppError::from)?;

        let record = NewFileRecord {
            name,
            path: description.path.clone(),
            url: description.url.clone(),
            size: description.size.clone(),
            mimetype: description.mimetype.clone(),
            storage_class: description.storage_class.clone(),
            modified: description.modified.clone(),
            delete_key: request.delete_key,
        };

        let saved = match self.records.replace(existing.as_ref(), record).await {
            Ok(saved) => saved,
            Err(e) => {
                // Compensate for the committed storage write; if that also
                // fails the orphaned object is handed to reconciliation.
                if let Err(cleanup) = self.gateway.remove(&path).await {
                    tracing::error!(
                        target: "reconciliation",
                        "Orphaned object {} after failed metadata persist: {}",
                        path,
                        cleanup
                    );
                }
                return Err(AppError::Database(e));
            }
        };

        tracing::info!("File uploaded successfully: {}", saved.name);

        Ok(UploadOutcome {
            description,
            id: saved.id,
            created_at: saved.created_at,
            delete_key: saved.delete_key,
        })
    }
}
