use crate::api::error::AppError;
use axum::{extract::{Request, State}, middleware::Next, response::Response};
use serde::Deserialize;

#[derive(Deserialize)]
struct SiteverifyResponse {
    success: bool,
    #[serde(rename = "error-codes", default)]
    error_codes: Vec<String>,
}

/// Verifies the Cloudflare Turnstile token on the browser upload route.
pub async fn verify_turnstile(
    State(state): State<crate::AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get("turnstile-token")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());

    let Some(token) = token else {
        tracing::warn!("Turnstile token missing in headers");
        return Err(AppError::BadRequest("CAPTCHA Response is Required".to_string()));
    };

    let url = format!("{}/turnstile/v0/siteverify", state.config.turnstile.api_url);
    let verdict: SiteverifyResponse = state
        .http
        .post(&url)
        .form(&[
            ("secret", state.config.turnstile.secret.as_str()),
            ("response", token.as_str()),
        ])
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| {
            tracing::error!("Turnstile verification error: {}", e);
            AppError::Internal("CAPTCHA verification failed".to_string())
        })?
        .json()
        .await
        .map_err(|e| {
            tracing::error!("Turnstile verification error: {}", e);
            AppError::Internal("CAPTCHA verification failed".to_string())
        })?;

    if !verdict.success {
        tracing::warn!("Turnstile verification failed: {:?}", verdict.error_codes);
        return Err(AppError::BadRequest("Invalid CAPTCHA response".to_string()));
    }

    Ok(next.run(req).await)
}
