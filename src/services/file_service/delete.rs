use crate::api::error::AppError;
use crate::services::storage::FileDescription;
use crate::utils::format::format_timestamp;
use chrono::{DateTime, Utc};

use super::FileService;

pub struct DeleteOutcome {
    pub description: FileDescription,
    pub id: String,
    pub deleted_at: String,
}

pub struct LookupOutcome {
    pub description: FileDescription,
    pub id: String,
    pub created_at: DateTime<Utc>,
}

impl FileService {
    /// Deletion protocol: possession of the record's delete key authorizes
    /// removal; records stored without one are permanently protected.
    pub async fn delete_by_name(
        &self,
        name: &str,
        supplied_key: Option<&str>,
    ) -> Result<DeleteOutcome, AppError> {
        let record = self
            .records
            .find_by_name(name)
            .await?
            .ok_or_else(|| AppError::NotFound("File Not Found".to_string()))?;

        let Some(ref delete_key) = record.delete_key else {
            tracing::warn!("Attempt to delete file without delete key: {}", name);
            return Err(AppError::Forbidden(
                "File Cannot be Deleted (no delete key was set)".to_string(),
            ));
        };
        if supplied_key != Some(delete_key.as_str()) {
            tracing::warn!("Invalid delete key provided for file: {}", name);
            return Err(AppError::Forbidden("Invalid delete key".to_string()));
        }

        // Deletion returns no metadata of its own, so capture the view first.
        let description = self.gateway.describe(&record.path).await?;

        // Storage removal failing keeps the record: it is the only pointer
        // left to the object.
        self.gateway.remove(&record.path).await?;

        let id = record.id.clone();
        self.records.delete(record).await?;
        tracing::info!("File deleted successfully: {}", name);

        Ok(DeleteOutcome {
            description,
            id,
            deleted_at: format_timestamp(Utc::now()),
        })
    }

    /// Read-only lookup by stored path; re-describes storage rather than
    /// trusting the persisted snapshot.
    pub async fn get_by_path(&self, path: &str) -> Result<LookupOutcome, AppError> {
        let record = self
            .records
            .find_by_path(path)
            .await?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        let description = self.gateway.describe(&record.path).await?;

        Ok(LookupOutcome {
            description,
            id: record.id,
            created_at: record.created_at,
        })
    }
}
