#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use http_body_util::BodyExt;
use sea_orm::{Database, DatabaseConnection};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tower::ServiceExt;
use upload_gateway::config::AppConfig;
use upload_gateway::infrastructure::database;
use upload_gateway::services::classifier::MimeClassifier;
use upload_gateway::services::contact::ContactRelay;
use upload_gateway::services::file_service::FileService;
use upload_gateway::services::naming::ObjectNamer;
use upload_gateway::services::records::FileRecords;
use upload_gateway::services::storage::{
    ObjectAttributes, ObjectStore, StorageError, StorageGateway,
};
use upload_gateway::{AppState, create_app};

pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub last_modified: DateTime<Utc>,
}

/// In-memory bucket standing in for the S3 client.
pub struct MockObjectStore {
    pub objects: Mutex<HashMap<String, StoredObject>>,
    pub delete_calls: AtomicUsize,
    pub fail_deletes: AtomicBool,
}

impl MockObjectStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            objects: Mutex::new(HashMap::new()),
            delete_calls: AtomicUsize::new(0),
            fail_deletes: AtomicBool::new(false),
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn put_object(
        &self,
        key: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                bytes: bytes.to_vec(),
                content_type: content_type.to_string(),
                last_modified: Utc::now(),
            },
        );
        Ok(())
    }

    async fn head_object(&self, key: &str) -> Result<ObjectAttributes, StorageError> {
        let objects = self.objects.lock().unwrap();
        let stored = objects.get(key).ok_or(StorageError::NotFound)?;
        Ok(ObjectAttributes {
            content_length: stored.bytes.len() as u64,
            content_type: Some(stored.content_type.clone()),
            storage_class: None,
            last_modified: Some(stored.last_modified),
        })
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StorageError::Write("simulated storage outage".to_string()));
        }
        // Deleting an absent key succeeds, as it does against S3.
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }
}

pub const TEST_DOMAIN: &str = "cdn.test.example";

pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    database::run_migrations(&db).await.unwrap();
    db
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    // Keep the limiter out of functional tests' way
    config.rate_limit_max = 1000;
    config
}

pub fn build_file_service(
    db: DatabaseConnection,
    store: Arc<dyn ObjectStore>,
    config: &AppConfig,
    namer: ObjectNamer,
) -> FileService {
    FileService::new(
        FileRecords::new(db),
        StorageGateway::new(store, TEST_DOMAIN.to_string()),
        MimeClassifier::new(&config.mime_policy),
        namer,
    )
}

pub async fn setup_app(store: Arc<dyn ObjectStore>) -> (Router, DatabaseConnection) {
    setup_app_with_config(store, test_config()).await
}

pub async fn setup_app_with_config(
    store: Arc<dyn ObjectStore>,
    config: AppConfig,
) -> (Router, DatabaseConnection) {
    let db = setup_db().await;
    let file_service = Arc::new(build_file_service(
        db.clone(),
        store,
        &config,
        ObjectNamer::new(),
    ));

    let http = reqwest::Client::new();
    let contact = Arc::new(ContactRelay::new(http.clone(), config.telegram.clone()));

    let state = AppState {
        db: db.clone(),
        file_service,
        contact,
        http,
        upload_windows: Arc::new(DashMap::new()),
        config: Arc::new(config),
    };

    (create_app(state), db)
}

pub const BOUNDARY: &str = "---------------------------123456789012345678901234567";

/// Builds a multipart body with a single `file` field and optional extras.
pub fn multipart_body(
    file_name: &str,
    content_type: &str,
    content: &[u8],
    extra_fields: &[(&str, &str)],
) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in extra_fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn upload_request(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn oneshot(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}
