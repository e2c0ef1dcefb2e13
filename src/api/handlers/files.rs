use crate::api::error::AppError;
use crate::services::file_service::UploadRequest;
use crate::services::storage::FileDescription;
use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct UploadResponse {
    #[serde(flatten)]
    pub file: FileDescription,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "deleteKey")]
    pub delete_key: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct DeleteRequest {
    #[serde(rename = "fileName")]
    pub file_name: Option<String>,
    #[serde(rename = "deleteKey")]
    pub delete_key: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct DeleteResponse {
    #[serde(flatten)]
    pub file: FileDescription,
    pub deleted: bool,
    #[serde(rename = "deletedAt")]
    pub deleted_at: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "deletedFromDb")]
    pub deleted_from_db: bool,
    #[serde(rename = "deletedFromServer")]
    pub deleted_from_server: bool,
}

#[derive(Serialize, ToSchema)]
pub struct FileInfoResponse {
    #[serde(flatten)]
    pub file: FileDescription,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[utoipa::path(
    post,
    path = "/api/upload",
    request_body(content = Multipart, description = "Multipart body with a `file` field and optional `deleteKey`"),
    responses(
        (status = 200, description = "File uploaded successfully", body = UploadResponse),
        (status = 400, description = "No file or disallowed content type"),
        (status = 429, description = "Upload rate limit exceeded")
    ),
    tag = "files"
)]
pub async fn upload_file(
    State(state): State<crate::AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut file: Option<(String, Option<String>, bytes::Bytes)> = None;
    let mut delete_key: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "file" {
            let original_file_name = field.file_name().unwrap_or("unnamed").to_string();
            let content_type = field.content_type().map(|s| s.to_string());
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            file = Some((original_file_name, content_type, bytes));
        } else if name == "deleteKey" {
            let text = field.text().await.unwrap_or_default();
            if !text.is_empty() {
                delete_key = Some(text);
            }
        }
    }

    let (original_file_name, content_type, bytes) =
        file.ok_or_else(|| AppError::BadRequest("No file uploaded".to_string()))?;

    let outcome = state
        .file_service
        .upload(UploadRequest {
            original_file_name,
            content_type,
            bytes,
            delete_key,
        })
        .await?;

    Ok(Json(UploadResponse {
        file: outcome.description,
        id: outcome.id,
        created_at: outcome.created_at,
        delete_key: outcome.delete_key,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/files",
    request_body = DeleteRequest,
    responses(
        (status = 200, description = "File deleted", body = DeleteResponse),
        (status = 400, description = "Missing filename"),
        (status = 403, description = "Delete key absent or mismatched"),
        (status = 404, description = "File not found")
    ),
    tag = "files"
)]
pub async fn delete_file(
    State(state): State<crate::AppState>,
    Json(req): Json<DeleteRequest>,
) -> Result<Json<DeleteResponse>, AppError> {
    let file_name = req
        .file_name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::BadRequest("Filename is Required".to_string()))?;

    let outcome = state
        .file_service
        .delete_by_name(&file_name, req.delete_key.as_deref())
        .await?;

    Ok(Json(DeleteResponse {
        file: outcome.description,
        deleted: true,
        deleted_at: outcome.deleted_at,
        id: outcome.id,
        deleted_from_db: true,
        deleted_from_server: true,
    }))
}

#[utoipa::path(
    get,
    path = "/file/{path}",
    params(
        ("path" = String, Path, description = "Stored object path, e.g. `image/xYphoto.png`")
    ),
    responses(
        (status = 200, description = "Fresh file metadata", body = FileInfoResponse),
        (status = 404, description = "File not found")
    ),
    tag = "files"
)]
pub async fn get_file(
    State(state): State<crate::AppState>,
    Path(path): Path<String>,
) -> Result<Json<FileInfoResponse>, AppError> {
    if path.is_empty() {
        return Err(AppError::BadRequest("Filename required".to_string()));
    }

    let outcome = state.file_service.get_by_path(&path).await?;

    Ok(Json(FileInfoResponse {
        file: outcome.description,
        id: outcome.id,
        created_at: outcome.created_at,
    }))
}
