use crate::api::error::AppError;
use crate::config::TelegramConfig;
use bytes::Bytes;
use serde_json::json;

/// Contact-form submission as parsed from the multipart body.
#[derive(Default)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub attachment: Option<Attachment>,
}

pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Forwards contact-form submissions to the Telegram bot API, as a plain
/// message or as a document with caption when an attachment is present.
pub struct ContactRelay {
    http: reqwest::Client,
    config: TelegramConfig,
}

impl ContactRelay {
    pub fn new(http: reqwest::Client, config: TelegramConfig) -> Self {
        Self { http, config }
    }

    pub async fn forward(&self, submission: ContactMessage) -> Result<(), AppError> {
        let text = format!(
            "NEW MESSAGE FROM CDN CONTACT FORM:\n\nName: {}\nEmail: {}\nPhone: {}\nMessage: {}",
            submission.name, submission.email, submission.phone, submission.message
        );

        match submission.attachment {
            Some(attachment) => self.send_document(&text, attachment).await,
            None => self.send_message(&text).await,
        }
    }

    async fn send_message(&self, text: &str) -> Result<(), AppError> {
        let url = format!(
            "{}/bot{}/sendMessage",
            self.config.api_url, self.config.bot_token
        );

        let response = self
            .http
            .post(&url)
            .json(&json!({
                "chat_id": self.config.chat_id,
                "text": text,
            }))
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Telegram request failed: {}", e)))?;

        Self::check_bot_response(response).await
    }

    async fn send_document(&self, caption: &str, attachment: Attachment) -> Result<(), AppError> {
        let url = format!(
            "{}/bot{}/sendDocument",
            self.config.api_url, self.config.bot_token
        );

        let part = reqwest::multipart::Part::bytes(attachment.bytes.to_vec())
            .file_name(attachment.file_name)
            .mime_str(&attachment.content_type)
            .map_err(|e| AppError::BadRequest(format!("Invalid attachment type: {}", e)))?;

        let form = reqwest::multipart::Form::new()
            .text("chat_id", self.config.chat_id.clone())
            .text("caption", caption.to_string())
            .part("document", part);

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Telegram request failed: {}", e)))?;

        Self::check_bot_response(response).await
    }

    async fn check_bot_response(response: reqwest::Response) -> Result<(), AppError> {
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("Telegram response unreadable: {}", e)))?;

        if body.get("ok").and_then(|v| v.as_bool()).unwrap_or(false) {
            Ok(())
        } else {
            tracing::error!("Telegram bot rejected message: {}", body);
            Err(AppError::Internal("Failed to send message".to_string()))
        }
    }
}
