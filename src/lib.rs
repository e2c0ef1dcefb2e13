pub mod api;
pub mod config;
pub mod entities;
pub mod infrastructure;
pub mod services;
pub mod utils;

use crate::api::middleware::rate_limit::UploadWindow;
use crate::config::AppConfig;
use crate::services::contact::ContactRelay;
use crate::services::file_service::FileService;
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post},
};
use dashmap::DashMap;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::files::upload_file,
        api::handlers::files::delete_file,
        api::handlers::files::get_file,
        api::handlers::contact::send_contact_message,
        api::handlers::health::health_check,
    ),
    components(
        schemas(
            api::handlers::files::UploadResponse,
            api::handlers::files::DeleteRequest,
            api::handlers::files::DeleteResponse,
            api::handlers::files::FileInfoResponse,
            api::handlers::contact::ContactResponse,
            api::handlers::health::HealthResponse,
            services::storage::FileDescription,
        )
    ),
    tags(
        (name = "files", description = "Upload, lookup and deletion endpoints"),
        (name = "contact", description = "Contact form relay"),
        (name = "system", description = "Health and diagnostics")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub file_service: Arc<FileService>,
    pub contact: Arc<ContactRelay>,
    pub http: reqwest::Client,
    pub upload_windows: Arc<DashMap<String, UploadWindow>>,
    pub config: Arc<AppConfig>,
}

pub fn create_app(state: AppState) -> Router {
    // Route-level layers run bottom-up: rate limit first, then CAPTCHA.
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(api::handlers::health::health_check))
        .route(
            "/upload",
            post(api::handlers::files::upload_file)
                .layer(from_fn_with_state(
                    state.clone(),
                    api::middleware::captcha::verify_turnstile,
                ))
                .layer(from_fn_with_state(
                    state.clone(),
                    api::middleware::rate_limit::limit_uploads,
                )),
        )
        .route(
            "/api/upload",
            post(api::handlers::files::upload_file).layer(from_fn_with_state(
                state.clone(),
                api::middleware::rate_limit::limit_uploads,
            )),
        )
        .route("/api/files", delete(api::handlers::files::delete_file))
        .route("/file/*path", get(api::handlers::files::get_file))
        .route(
            "/api/contact",
            post(api::handlers::contact::send_contact_message),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(axum::extract::DefaultBodyLimit::max(
            state.config.max_file_size + 10 * 1024 * 1024, // multipart overhead headroom
        ))
        .with_state(state)
}
