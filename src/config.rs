use std::env;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub bucket_name: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub endpoint: Option<String>,
    pub public_url: Option<String>,
    pub upload_root: String,
}

impl StorageConfig {
    /// Base URL objects are publicly reachable under, without a trailing slash.
    pub fn public_base_url(&self) -> String {
        if let Some(public_url) = &self.public_url {
            return public_url.trim_end_matches('/').to_string();
        }
        match &self.endpoint {
            Some(endpoint) => format!("{}/{}", endpoint.trim_end_matches('/'), self.bucket_name),
            None => format!("https://{}.s3.{}.amazonaws.com", self.bucket_name, self.region),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub session_ttl_secs: u64,
    pub admin_username: String,
    pub admin_password: String,
    pub max_upload_bytes: usize,
    pub storage: StorageConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let max_upload_mb: usize = parse_or("MAX_UPLOAD_MB", 50)?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            port: parse_or("PORT", 3000)?,
            jwt_secret: required("JWT_SECRET")?,
            session_ttl_secs: parse_or("SESSION_TTL_SECS", 86_400)?,
            admin_username: required("ADMIN_USERNAME")?,
            admin_password: required("ADMIN_PASSWORD")?,
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            storage: StorageConfig {
                bucket_name: required("S3_BUCKET_NAME")?,
                region: required("AWS_REGION")?,
                access_key_id: required("AWS_ACCESS_KEY_ID")?,
                secret_access_key: required("AWS_SECRET_ACCESS_KEY")?,
                endpoint: optional("S3_ENDPOINT"),
                public_url: optional("S3_PUBLIC_URL"),
                upload_root: optional("UPLOAD_ROOT").unwrap_or_else(|| "papervault".to_string()),
            },
        })
    }
}

/// Just the connection string, for maintenance commands that need nothing else.
pub fn database_url() -> Result<String, ConfigError> {
    required("DATABASE_URL")
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    optional(key).ok_or(ConfigError::Missing(key))
}

fn optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match optional(key) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => {
            tracing::debug!("{key} not set, using default");
            Ok(default)
        }
    }
}
