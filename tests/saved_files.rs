mod common;

use axum::http::StatusCode;
use common::{insert_file, FileSeed, TestApp};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn saving_twice_is_409() {
    let app = TestApp::spawn().await;
    let file = insert_file(&app.db, FileSeed::default()).await;

    let body = json!({ "fileId": file.id, "userId": "asha", "tags": ["midterm", " midterm ", ""] });
    let (status, saved) = app.post("/saved-files", body.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(saved["category"], "general");
    assert_eq!(saved["tags"], json!(["midterm"]));
    assert_eq!(saved["file"]["id"], file.id.to_string());

    let (status, _) = app.post("/saved-files", body).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Another user may bookmark the same file.
    let (status, _) = app
        .post("/saved-files", json!({ "fileId": file.id, "userId": "ravi" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn save_validates_input() {
    let app = TestApp::spawn().await;
    let file = insert_file(&app.db, FileSeed::default()).await;

    assert_eq!(
        app.post("/saved-files", json!({ "userId": "asha" })).await.0,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        app.post("/saved-files", json!({ "fileId": Uuid::new_v4() })).await.0,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        app.post("/saved-files", json!({ "fileId": file.id, "category": "someday" }))
            .await
            .0,
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn deleting_a_file_leaves_bookmarks_that_lists_skip() {
    let app = TestApp::spawn().await;
    let kept = insert_file(&app.db, FileSeed { uploaded_offset: 1, ..Default::default() }).await;
    let doomed = insert_file(&app.db, FileSeed { uploaded_offset: 2, ..Default::default() }).await;

    for id in [kept.id, doomed.id] {
        let (status, _) = app.post("/saved-files", json!({ "fileId": id })).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, _) = app.delete(&format!("/files/{}", doomed.id)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get("/saved-files").await;
    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["fileId"], kept.id.to_string());
    assert_eq!(body["totalItems"], 1);

    // The dangling bookmark row is still there for the pair lookup.
    let (_, status_body) = app
        .get(&format!("/saved-files/check?fileId={}", doomed.id))
        .await;
    assert_eq!(status_body["saved"], true);
}

#[tokio::test]
async fn check_unsave_and_default_user() {
    let app = TestApp::spawn().await;
    let file = insert_file(&app.db, FileSeed::default()).await;
    app.post("/saved-files", json!({ "fileId": file.id })).await;

    let check = format!("/saved-files/check?fileId={}&userId=default-user", file.id);
    let (_, body) = app.get(&check).await;
    assert_eq!(body["saved"], true);

    let (_, body) = app
        .get(&format!("/saved-files/check?fileId={}&userId=someone", file.id))
        .await;
    assert_eq!(body["saved"], false);
    assert!(body["id"].is_null());

    let unsave = format!("/saved-files?fileId={}", file.id);
    assert_eq!(app.delete(&unsave).await.0, StatusCode::OK);
    assert_eq!(app.delete(&unsave).await.0, StatusCode::NOT_FOUND);

    let (_, body) = app.get(&check).await;
    assert_eq!(body["saved"], false);
}

#[tokio::test]
async fn update_and_filter_by_category_and_tag() {
    let app = TestApp::spawn().await;
    let first = insert_file(&app.db, FileSeed { uploaded_offset: 1, ..Default::default() }).await;
    let second = insert_file(&app.db, FileSeed { uploaded_offset: 2, ..Default::default() }).await;

    let (_, saved) = app
        .post("/saved-files", json!({ "fileId": first.id, "userId": "asha" }))
        .await;
    app.post(
        "/saved-files",
        json!({ "fileId": second.id, "userId": "asha", "category": "revision" }),
    )
    .await;

    let uri = format!("/saved-files/{}", saved["id"].as_str().unwrap());
    let (status, updated) = app
        .put(
            &uri,
            json!({ "category": "exam-prep", "tags": ["Unit 3"], "notes": "check q4" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["category"], "exam-prep");
    assert_eq!(updated["notes"], "check q4");

    let (_, body) = app.get("/saved-files?userId=asha&category=exam-prep").await;
    assert_eq!(body["totalItems"], 1);
    assert_eq!(body["data"][0]["fileId"], first.id.to_string());

    let (_, body) = app.get("/saved-files?userId=asha&tag=unit%203").await;
    assert_eq!(body["totalItems"], 1);

    let (_, body) = app.get("/saved-files?userId=asha").await;
    assert_eq!(body["totalItems"], 2);

    assert_eq!(app.delete(&uri).await.0, StatusCode::OK);
    assert_eq!(app.put(&uri, json!({ "notes": "x" })).await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn pages_count_only_bookmarks_with_live_files() {
    let app = TestApp::spawn().await;
    let mut live = Vec::new();
    for i in 0..3 {
        let file = insert_file(&app.db, FileSeed { uploaded_offset: i, ..Default::default() }).await;
        app.post("/saved-files", json!({ "fileId": file.id })).await;
        live.push(file.id.to_string());
    }
    let doomed = insert_file(&app.db, FileSeed { uploaded_offset: 9, ..Default::default() }).await;
    app.post("/saved-files", json!({ "fileId": doomed.id })).await;
    app.delete(&format!("/files/{}", doomed.id)).await;

    let mut seen = Vec::new();
    for page in 1..=3 {
        let (status, body) = app.get(&format!("/saved-files?limit=1&page={}", page)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalItems"], 3);
        assert_eq!(body["totalPages"], 3);
        seen.push(body["data"][0]["fileId"].as_str().unwrap().to_string());
    }
    seen.sort();
    live.sort();
    assert_eq!(seen, live);

    let (status, body) = app
        .get(&format!("/saved-files?page={}&limit=100", u64::MAX))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
}
