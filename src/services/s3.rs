use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use uuid::Uuid;

use crate::config::StorageConfig;
use crate::error::AppError;
use crate::services::storage::{extension, ObjectStore, StoredObject};

#[derive(Clone)]
pub struct S3Store {
    client: Client,
    bucket_name: String,
    public_base_url: String,
}

impl S3Store {
    pub fn new(config: &StorageConfig) -> Self {
        let credentials = aws_sdk_s3::config::Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            "papervault_env",
        );

        let region = aws_sdk_s3::config::Region::new(config.region.clone());

        let mut s3_config_builder = aws_sdk_s3::config::Builder::new()
            .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
            .region(region)
            .credentials_provider(credentials);

        if let Some(endpoint) = &config.endpoint {
            s3_config_builder = s3_config_builder
                .endpoint_url(endpoint)
                .force_path_style(true);
        }

        Self {
            client: Client::from_conf(s3_config_builder.build()),
            bucket_name: config.bucket_name.clone(),
            public_base_url: config.public_base_url(),
        }
    }

    fn object_url(&self, key: &str) -> Result<String, AppError> {
        let base = url::Url::parse(&format!("{}/", self.public_base_url)).map_err(|e| {
            AppError::InternalServerError(format!("Invalid storage base URL: {}", e))
        })?;
        base.join(key)
            .map(|u| u.to_string())
            .map_err(|e| AppError::InternalServerError(format!("Invalid object key {}: {}", key, e)))
    }

    /// Creates the bucket when it is missing. Called once at startup.
    pub async fn ensure_bucket_exists(&self) -> Result<(), AppError> {
        if self
            .client
            .head_bucket()
            .bucket(&self.bucket_name)
            .send()
            .await
            .is_ok()
        {
            return Ok(());
        }

        tracing::info!(bucket = %self.bucket_name, "bucket does not exist, creating");
        self.client
            .create_bucket()
            .bucket(&self.bucket_name)
            .send()
            .await
            .map_err(|e| {
                AppError::Storage(format!(
                    "Failed to create bucket {}: {}",
                    self.bucket_name,
                    aws_sdk_s3::error::DisplayErrorContext(&e)
                ))
            })?;

        Ok(())
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn upload(
        &self,
        folder: &str,
        file_name: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, AppError> {
        let key = format!("{}/{}.{}", folder, Uuid::new_v4(), extension(file_name));

        self.client
            .put_object()
            .bucket(&self.bucket_name)
            .key(&key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .acl(aws_sdk_s3::types::ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|e| {
                AppError::Storage(format!(
                    "Failed to upload {}: {}",
                    file_name,
                    aws_sdk_s3::error::DisplayErrorContext(&e)
                ))
            })?;

        tracing::debug!(%key, "object stored");
        Ok(StoredObject {
            url: self.object_url(&key)?,
            storage_id: key,
        })
    }

    async fn delete(&self, storage_id: &str) -> Result<(), AppError> {
        self.client
            .delete_object()
            .bucket(&self.bucket_name)
            .key(storage_id)
            .send()
            .await
            .map_err(|e| {
                AppError::Storage(format!(
                    "Failed to delete {}: {}",
                    storage_id,
                    aws_sdk_s3::error::DisplayErrorContext(&e)
                ))
            })?;

        Ok(())
    }
}
