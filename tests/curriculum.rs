mod common;

use axum::http::StatusCode;
use common::TestApp;
use papervault::entities::{course, subject};
use papervault::error::AppError;
use sea_orm::{ActiveModelTrait, EntityTrait, ModelTrait, Set};
use uuid::Uuid;

fn btech() -> course::ActiveModel {
    course::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("Bachelor of Technology".into()),
        code: Set("BTECH".into()),
        duration_years: Set(4),
        total_semesters: Set(8),
        created_at: Set(chrono::Utc::now().naive_utc()),
    }
}

#[tokio::test]
async fn subjects_hang_off_their_course() {
    let app = TestApp::spawn().await;
    let course = btech().insert(&app.db).await.unwrap();

    for (code, semester) in [("CS301", 5), ("CS302", 5)] {
        subject::ActiveModel {
            id: Set(Uuid::new_v4()),
            course_id: Set(course.id),
            name: Set(format!("Subject {}", code)),
            code: Set(code.into()),
            semester: Set(semester),
            created_at: Set(chrono::Utc::now().naive_utc()),
        }
        .insert(&app.db)
        .await
        .unwrap();
    }

    let subjects = course.find_related(subject::Entity).all(&app.db).await.unwrap();
    assert_eq!(subjects.len(), 2);

    let (_, parent) = subject::Entity::find()
        .find_also_related(course::Entity)
        .one(&app.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(parent.unwrap().code, "BTECH");
}

#[tokio::test]
async fn duplicate_course_code_maps_to_conflict() {
    let app = TestApp::spawn().await;
    btech().insert(&app.db).await.unwrap();

    let err: AppError = btech().insert(&app.db).await.unwrap_err().into();
    assert!(matches!(err, AppError::Conflict(_)), "{:?}", err);
    assert_eq!(err.status(), StatusCode::CONFLICT);
}
