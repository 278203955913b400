mod common;

use axum::http::StatusCode;
use common::{insert_file, FileSeed, MemoryStore, TestApp};
use papervault::entities::file;
use sea_orm::{EntityTrait, PaginatorTrait};

const FIELDS: [(&str, &str); 7] = [
    ("college", "NIT Trichy"),
    ("course", "B.Tech"),
    ("branch", "CSE"),
    ("year", "2023"),
    ("semester", "5"),
    ("fileType", "pyq"),
    ("paperType", "back"),
];

fn without(name: &str) -> Vec<(&'static str, &'static str)> {
    FIELDS.iter().copied().filter(|(k, _)| *k != name).collect()
}

async fn stored_rows(app: &TestApp) -> u64 {
    file::Entity::find().count(&app.db).await.unwrap()
}

#[tokio::test]
async fn upload_stores_object_and_records_file() {
    let app = TestApp::spawn().await;
    let (status, body) = app
        .upload(&FIELDS, Some(("DBMS Endsem.pdf", b"%PDF-1.7 fake".as_slice())))
        .await;

    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["fileType"], "pyq");
    assert_eq!(body["paperType"], "back");
    assert_eq!(body["fileName"], "DBMS Endsem.pdf");
    assert_eq!(body["mimeType"], "application/pdf");
    assert_eq!(body["size"], 13);

    let keys = app.storage.keys();
    assert_eq!(keys.len(), 1);
    assert!(keys[0].starts_with("papervault/nit-trichy/b-tech/pyq/"));
    assert!(keys[0].ends_with(".pdf"));
    assert_eq!(body["storageId"], keys[0].as_str());
    assert_eq!(stored_rows(&app).await, 1);
}

#[tokio::test]
async fn missing_branch_is_400_with_nothing_stored() {
    let app = TestApp::spawn().await;
    let (status, body) = app
        .upload(&without("branch"), Some(("notes.pdf", b"data".as_slice())))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "branch is required");
    assert_eq!(app.storage.len(), 0);
    assert_eq!(stored_rows(&app).await, 0);
}

#[tokio::test]
async fn missing_file_part_is_400() {
    let app = TestApp::spawn().await;
    let (status, body) = app.upload(&FIELDS, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "file is required");

    let (status, _) = app.upload(&FIELDS, Some(("empty.pdf", b"".as_slice()))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.storage.len(), 0);
}

#[tokio::test]
async fn invalid_file_type_is_400() {
    let app = TestApp::spawn().await;
    let mut fields = without("fileType");
    fields.push(("fileType", "slides"));
    let (status, _) = app.upload(&fields, Some(("a.pdf", b"x".as_slice()))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.storage.len(), 0);
}

#[tokio::test]
async fn storage_failure_records_nothing() {
    let app = TestApp::with_store(MemoryStore::failing()).await;
    let (status, body) = app.upload(&FIELDS, Some(("a.pdf", b"x".as_slice()))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(stored_rows(&app).await, 0);
}

#[tokio::test]
async fn failed_insert_removes_the_uploaded_object() {
    let key = "papervault/nit-trichy/b-tech/pyq/taken.pdf";
    let app = TestApp::with_store(MemoryStore::with_fixed_key(key)).await;
    insert_file(
        &app.db,
        FileSeed {
            storage_id: Some(key.to_string()),
            ..Default::default()
        },
    )
    .await;

    let (status, body) = app.upload(&FIELDS, Some(("a.pdf", b"x".as_slice()))).await;
    assert_eq!(status, StatusCode::CONFLICT, "{}", body);
    assert_eq!(body["success"], false);
    assert_eq!(app.storage.len(), 0);
    assert_eq!(stored_rows(&app).await, 1);
}

#[tokio::test]
async fn non_multipart_body_is_400_json() {
    let app = TestApp::spawn().await;
    let (status, body) = app
        .post("/files/upload", serde_json::json!({ "college": "NIT Trichy" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn deleting_the_file_removes_the_object() {
    let app = TestApp::spawn().await;
    let (_, body) = app.upload(&FIELDS, Some(("a.pdf", b"x".as_slice()))).await;
    assert_eq!(app.storage.len(), 1);

    let (status, _) = app
        .delete(&format!("/files/{}", body["id"].as_str().unwrap()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.storage.len(), 0);
    assert_eq!(stored_rows(&app).await, 0);
}
