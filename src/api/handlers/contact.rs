use crate::api::error::AppError;
use crate::services::contact::{Attachment, ContactMessage};
use axum::{
    Json,
    extract::{Multipart, State},
};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct ContactResponse {
    pub ok: bool,
}

#[utoipa::path(
    post,
    path = "/api/contact",
    request_body(content = Multipart, description = "Fields: name, email, phone, message, optional file attachment"),
    responses(
        (status = 200, description = "Message forwarded", body = ContactResponse),
        (status = 500, description = "Relay failure")
    ),
    tag = "contact"
)]
pub async fn send_contact_message(
    State(state): State<crate::AppState>,
    mut multipart: Multipart,
) -> Result<Json<ContactResponse>, AppError> {
    let mut submission = ContactMessage::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "file" {
            let file_name = field.file_name().unwrap_or("attachment").to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            submission.attachment = Some(Attachment {
                file_name,
                content_type,
                bytes,
            });
            continue;
        }

        let text = field.text().await.unwrap_or_default();
        match name.as_str() {
            "name" => submission.name = text,
            "email" => submission.email = text,
            "phone" => submission.phone = text,
            "message" => submission.message = text,
            _ => {}
        }
    }

    state.contact.forward(submission).await?;

    Ok(Json(ContactResponse { ok: true }))
}
