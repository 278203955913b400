mod common;

use axum::http::StatusCode;
use common::{insert_file, FileSeed, TestApp};

async fn seeded() -> TestApp {
    let app = TestApp::spawn().await;
    insert_file(&app.db, FileSeed { college: "NIT Trichy", branch: "CSE", ..Default::default() }).await;
    insert_file(&app.db, FileSeed { college: "IIT Madras", branch: "Civil", ..Default::default() }).await;
    insert_file(&app.db, FileSeed { college: "Anna University", course: "MBA", branch: "Finance", ..Default::default() }).await;
    app
}

#[tokio::test]
async fn short_queries_get_no_suggestions() {
    let app = seeded().await;
    for q in ["", "i"] {
        let (status, body) = app.get(&format!("/search?type=suggestions&q={}", q)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["type"], "suggestions");
        assert!(body["suggestions"].as_array().unwrap().is_empty());
    }
}

#[tokio::test]
async fn every_suggestion_contains_the_query() {
    let app = seeded().await;
    let (status, body) = app.get("/search?type=suggestions&q=iT").await;
    assert_eq!(status, StatusCode::OK);

    let suggestions = body["suggestions"].as_array().unwrap();
    assert!(!suggestions.is_empty());
    assert!(suggestions.len() <= 10);
    for s in suggestions {
        let display = s["display"].as_str().unwrap().to_lowercase();
        assert!(display.contains("it"), "{}", display);
    }

    // Colleges come before courses and branches.
    assert_eq!(suggestions[0]["kind"], "college");
    assert!(suggestions
        .iter()
        .any(|s| s["display"] == "IIT Madras (College)"));
}

#[tokio::test]
async fn global_search_matches_any_descriptive_field() {
    let app = seeded().await;

    let (_, body) = app.get("/search?q=finance").await;
    assert_eq!(body["type"], "global");
    assert_eq!(body["total"], 1);
    assert_eq!(body["results"][0]["college"], "Anna University");

    let (_, body) = app.get("/search?q=2023").await;
    assert_eq!(body["total"], 3);

    let (_, body) = app.get("/search?q=%25").await;
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn global_results_are_capped() {
    let app = TestApp::spawn().await;
    for i in 0..55 {
        insert_file(&app.db, FileSeed { uploaded_offset: i, ..Default::default() }).await;
    }
    let (_, body) = app.get("/search?type=global&q=trichy").await;
    assert_eq!(body["total"], 50);
    assert_eq!(body["results"].as_array().unwrap().len(), 50);
}

#[tokio::test]
async fn unknown_search_type_is_400() {
    let app = seeded().await;
    let (status, _) = app.get("/search?type=fuzzy&q=nit").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
