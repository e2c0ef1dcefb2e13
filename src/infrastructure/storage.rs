use crate::config::StorageConfig;
use crate::services::storage::S3ObjectStore;
use aws_sdk_s3::config::Region;
use std::sync::Arc;
use tracing::info;

pub async fn setup_storage(config: &StorageConfig) -> Arc<S3ObjectStore> {
    info!("☁️  Object storage: {} (Bucket: {})", config.endpoint, config.bucket);

    let aws_config = aws_config::from_env()
        .endpoint_url(&config.endpoint)
        .region(Region::new(config.region.clone()))
        .credentials_provider(aws_sdk_s3::config::Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            "static",
        ))
        .load()
        .await;

    let s3_config = aws_sdk_s3::config::Builder::from(&aws_config).build();

    let client = aws_sdk_s3::Client::from_conf(s3_config);
    Arc::new(S3ObjectStore::new(client, config.bucket.clone()))
}
