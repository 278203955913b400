#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use migration::{Migrator, MigratorTrait};
use papervault::config::{Config, StorageConfig};
use papervault::entities::file::{self, FileType, PaperType};
use papervault::error::AppError;
use papervault::middleware::auth::issue_token;
use papervault::routes::create_routes;
use papervault::services::storage::{extension, ObjectStore, StoredObject};
use papervault::state::AppState;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

pub const BOUNDARY: &str = "papervault-test-boundary";

/// Object store kept in memory; can fail every upload or hand out one fixed key.
#[derive(Default)]
pub struct MemoryStore {
    pub objects: Mutex<HashMap<String, Vec<u8>>>,
    pub fail_uploads: bool,
    pub fixed_key: Option<String>,
}

impl MemoryStore {
    pub fn failing() -> Self {
        Self {
            fail_uploads: true,
            ..Default::default()
        }
    }

    pub fn with_fixed_key(key: &str) -> Self {
        Self {
            fixed_key: Some(key.to_string()),
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn upload(
        &self,
        folder: &str,
        file_name: &str,
        data: Vec<u8>,
        _content_type: &str,
    ) -> Result<StoredObject, AppError> {
        if self.fail_uploads {
            return Err(AppError::Storage("quota exceeded".to_string()));
        }
        let key = self
            .fixed_key
            .clone()
            .unwrap_or_else(|| format!("{}/{}.{}", folder, Uuid::new_v4(), extension(file_name)));
        self.objects.lock().unwrap().insert(key.clone(), data);
        Ok(StoredObject {
            url: format!("https://cdn.test/{}", key),
            storage_id: key,
        })
    }

    async fn delete(&self, storage_id: &str) -> Result<(), AppError> {
        self.objects.lock().unwrap().remove(storage_id);
        Ok(())
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        port: 0,
        jwt_secret: "test-secret".to_string(),
        session_ttl_secs: 3600,
        admin_username: "admin".to_string(),
        admin_password: "correct horse".to_string(),
        max_upload_bytes: 1024 * 1024,
        storage: StorageConfig {
            bucket_name: "papers".to_string(),
            region: "us-east-1".to_string(),
            access_key_id: "test".to_string(),
            secret_access_key: "test".to_string(),
            endpoint: None,
            public_url: Some("https://cdn.test".to_string()),
            upload_root: "papervault".to_string(),
        },
    }
}

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
    pub storage: Arc<MemoryStore>,
    pub token: String,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::with_store(MemoryStore::default()).await
    }

    pub async fn with_store(store: MemoryStore) -> Self {
        // One connection, or each pool member would see its own empty database.
        let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
        options.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(options).await.expect("sqlite connects");
        Migrator::up(&db, None).await.expect("migrations apply");

        let config = test_config();
        let (token, _) = issue_token(&config, &config.admin_username).expect("token signs");
        let storage = Arc::new(store);
        let state = AppState::new(db.clone(), storage.clone(), config);

        Self {
            router: create_routes(state),
            db,
            storage,
            token,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router responds");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, body)
    }

    pub async fn call(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token));
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.send(builder.body(body).unwrap()).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.call(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.call(Method::DELETE, uri, None).await
    }

    pub async fn upload(&self, fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/files/upload")
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body(fields, file)))
            .unwrap();
        self.send(request).await
    }
}

pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, data)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: application/pdf\r\n\r\n",
                BOUNDARY, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// Descriptive fields for a file record; tweak before calling [`insert_file`].
pub struct FileSeed {
    pub college: &'static str,
    pub course: &'static str,
    pub branch: &'static str,
    pub year: &'static str,
    pub semester: &'static str,
    pub file_type: FileType,
    pub file_name: String,
    /// Seconds after a fixed epoch, so ordering by upload time is deterministic.
    pub uploaded_offset: i64,
    /// Defaults to a unique key under `papervault/seed/`.
    pub storage_id: Option<String>,
}

impl Default for FileSeed {
    fn default() -> Self {
        Self {
            college: "NIT Trichy",
            course: "B.Tech",
            branch: "CSE",
            year: "2023",
            semester: "5",
            file_type: FileType::Notes,
            file_name: "unit1.pdf".to_string(),
            uploaded_offset: 0,
            storage_id: None,
        }
    }
}

pub async fn insert_file(db: &DatabaseConnection, seed: FileSeed) -> file::Model {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let at = base + chrono::Duration::seconds(seed.uploaded_offset);
    let id = Uuid::new_v4();

    file::ActiveModel {
        id: Set(id),
        college: Set(seed.college.to_string()),
        course: Set(seed.course.to_string()),
        branch: Set(seed.branch.to_string()),
        year: Set(seed.year.to_string()),
        semester: Set(seed.semester.to_string()),
        subject: Set(None),
        file_type: Set(seed.file_type),
        paper_type: Set(PaperType::Normal),
        file_name: Set(seed.file_name),
        mime_type: Set("application/pdf".to_string()),
        size: Set(1024),
        file_url: Set(format!("https://cdn.test/{}", id)),
        storage_id: Set(seed
            .storage_id
            .unwrap_or_else(|| format!("papervault/seed/{}.pdf", id))),
        uploaded_at: Set(at),
        updated_at: Set(at),
    }
    .insert(db)
    .await
    .expect("file inserts")
}
