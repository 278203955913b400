use axum::{extract::State, http::StatusCode};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::saved_file::{self, SavedCategory};
use crate::entities::{file, StringList};
use crate::error::AppError;
use crate::extract::{Json, Path, Query};
use crate::pagination::{PaginatedResponse, Pagination};
use crate::query::json_array_contains_ci;
use crate::routes::files::{find_file, FileResponse};
use crate::validation::{optional, parse_optional_enum};

/// Stand-in owner for bookmarks when the client sends no `userId`.
/// Bookmarks are not tied to the authenticated session yet.
pub const DEFAULT_USER_ID: &str = "default-user";

fn user_or_default(user_id: Option<&str>) -> String {
    optional(user_id).unwrap_or_else(|| DEFAULT_USER_ID.to_string())
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListSavedQuery {
    pub user_id: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct SavedPairQuery {
    pub file_id: Uuid,
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveFileRequest {
    pub file_id: Option<Uuid>,
    pub user_id: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateSavedRequest {
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavedFileResponse {
    pub id: Uuid,
    pub file_id: Uuid,
    pub user_id: String,
    pub category: SavedCategory,
    pub tags: Vec<String>,
    pub notes: Option<String>,
    pub saved_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<FileResponse>,
}

impl SavedFileResponse {
    fn new(saved: saved_file::Model, file: Option<file::Model>) -> Self {
        Self {
            id: saved.id,
            file_id: saved.file_id,
            user_id: saved.user_id,
            category: saved.category,
            tags: saved.tags.0,
            notes: saved.notes,
            saved_at: saved.saved_at,
            updated_at: saved.updated_at,
            file: file.map(FileResponse::from),
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SavedStatus {
    pub saved: bool,
    pub id: Option<Uuid>,
}

async fn find_pair(
    db: &DatabaseConnection,
    file_id: Uuid,
    user_id: &str,
) -> Result<Option<saved_file::Model>, AppError> {
    Ok(saved_file::Entity::find()
        .filter(saved_file::Column::FileId.eq(file_id))
        .filter(saved_file::Column::UserId.eq(user_id))
        .one(db)
        .await?)
}

async fn find_saved(db: &DatabaseConnection, id: Uuid) -> Result<saved_file::Model, AppError> {
    saved_file::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Saved file not found".into()))
}

#[utoipa::path(
    get,
    path = "/saved-files",
    params(ListSavedQuery),
    responses(
        (status = 200, description = "Bookmarks with their files; dangling ones omitted", body = PaginatedResponse<SavedFileResponse>)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Saved Files"
)]
pub async fn list_saved_files(
    State(db): State<DatabaseConnection>,
    Query(query): Query<ListSavedQuery>,
) -> Result<Json<PaginatedResponse<SavedFileResponse>>, AppError> {
    let pagination = Pagination {
        page: query.page,
        limit: query.limit,
    };
    let user_id = user_or_default(query.user_id.as_deref());

    let mut condition = Condition::all().add(saved_file::Column::UserId.eq(user_id.as_str()));
    if let Some(category) = parse_optional_enum::<SavedCategory>("category", query.category.as_deref())? {
        condition = condition.add(saved_file::Column::Category.eq(category));
    }
    if let Some(tag) = optional(query.tag.as_deref()) {
        condition = condition.add(json_array_contains_ci(saved_file::Column::Tags, &tag));
    }

    // Inner join: bookmarks whose file is gone are neither listed nor counted.
    let paginator = saved_file::Entity::find()
        .join(JoinType::InnerJoin, saved_file::Relation::File.def())
        .select_also(file::Entity)
        .filter(condition)
        .order_by_desc(saved_file::Column::SavedAt)
        .order_by_desc(saved_file::Column::Id)
        .paginate(&db, pagination.limit());

    let total_items = paginator.num_items().await?;
    let rows = paginator.fetch_page(pagination.page() - 1).await?;

    let data = rows
        .into_iter()
        .map(|(saved, file)| SavedFileResponse::new(saved, file))
        .collect();
    Ok(Json(PaginatedResponse::new(
        data,
        total_items,
        pagination.page(),
        pagination.limit(),
    )))
}

#[utoipa::path(
    post,
    path = "/saved-files",
    request_body = SaveFileRequest,
    responses(
        (status = 201, description = "File bookmarked", body = SavedFileResponse),
        (status = 400, description = "Missing fileId or invalid category"),
        (status = 404, description = "File not found"),
        (status = 409, description = "Already saved by this user")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Saved Files"
)]
pub async fn save_file(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<SaveFileRequest>,
) -> Result<(StatusCode, Json<SavedFileResponse>), AppError> {
    let file_id = payload
        .file_id
        .ok_or_else(|| AppError::BadRequest("fileId is required".to_string()))?;
    let user_id = user_or_default(payload.user_id.as_deref());
    let category = parse_optional_enum::<SavedCategory>("category", payload.category.as_deref())?
        .unwrap_or_default();

    let file = find_file(&db, file_id).await?;

    if find_pair(&db, file_id, &user_id).await?.is_some() {
        return Err(AppError::Conflict("File already saved".to_string()));
    }

    let now = chrono::Utc::now().naive_utc();
    let saved = saved_file::ActiveModel {
        id: Set(Uuid::new_v4()),
        file_id: Set(file_id),
        user_id: Set(user_id),
        category: Set(category),
        tags: Set(StringList::normalized(payload.tags.iter().flatten())),
        notes: Set(optional(payload.notes.as_deref())),
        saved_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&db)
    .await?;

    tracing::info!(id = %saved.id, %file_id, user_id = %saved.user_id, "file saved");
    Ok((StatusCode::CREATED, Json(SavedFileResponse::new(saved, Some(file)))))
}

#[utoipa::path(
    get,
    path = "/saved-files/check",
    params(SavedPairQuery),
    responses(
        (status = 200, description = "Whether the user has saved the file", body = SavedStatus)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Saved Files"
)]
pub async fn check_saved(
    State(db): State<DatabaseConnection>,
    Query(query): Query<SavedPairQuery>,
) -> Result<Json<SavedStatus>, AppError> {
    let user_id = user_or_default(query.user_id.as_deref());
    let found = find_pair(&db, query.file_id, &user_id).await?;
    Ok(Json(SavedStatus {
        saved: found.is_some(),
        id: found.map(|s| s.id),
    }))
}

#[utoipa::path(
    delete,
    path = "/saved-files",
    params(SavedPairQuery),
    responses(
        (status = 200, description = "Bookmark removed"),
        (status = 404, description = "Bookmark not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Saved Files"
)]
pub async fn unsave_file(
    State(db): State<DatabaseConnection>,
    Query(query): Query<SavedPairQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user_id = user_or_default(query.user_id.as_deref());
    let res = saved_file::Entity::delete_many()
        .filter(saved_file::Column::FileId.eq(query.file_id))
        .filter(saved_file::Column::UserId.eq(user_id.as_str()))
        .exec(&db)
        .await?;

    if res.rows_affected == 0 {
        return Err(AppError::NotFound("Saved file not found".into()));
    }

    tracing::info!(file_id = %query.file_id, %user_id, "file unsaved");
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "File removed from saved files"
    })))
}

#[utoipa::path(
    put,
    path = "/saved-files/{id}",
    params(
        ("id" = Uuid, Path, description = "Saved file ID")
    ),
    request_body = UpdateSavedRequest,
    responses(
        (status = 200, description = "Bookmark updated", body = SavedFileResponse),
        (status = 404, description = "Bookmark not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Saved Files"
)]
pub async fn update_saved_file(
    State(db): State<DatabaseConnection>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSavedRequest>,
) -> Result<Json<SavedFileResponse>, AppError> {
    let category = parse_optional_enum::<SavedCategory>("category", payload.category.as_deref())?;
    let mut active = find_saved(&db, id).await?.into_active_model();

    if let Some(category) = category {
        active.category = Set(category);
    }
    if let Some(tags) = &payload.tags {
        active.tags = Set(StringList::normalized(tags));
    }
    if payload.notes.is_some() {
        active.notes = Set(optional(payload.notes.as_deref()));
    }
    active.updated_at = Set(chrono::Utc::now().naive_utc());

    let updated = active.update(&db).await?;
    let file = file::Entity::find_by_id(updated.file_id).one(&db).await?;

    tracing::info!(%id, "saved file updated");
    Ok(Json(SavedFileResponse::new(updated, file)))
}

#[utoipa::path(
    delete,
    path = "/saved-files/{id}",
    params(
        ("id" = Uuid, Path, description = "Saved file ID")
    ),
    responses(
        (status = 200, description = "Bookmark removed"),
        (status = 404, description = "Bookmark not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Saved Files"
)]
pub async fn delete_saved_file(
    State(db): State<DatabaseConnection>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let res = saved_file::Entity::delete_by_id(id).exec(&db).await?;
    if res.rows_affected == 0 {
        return Err(AppError::NotFound("Saved file not found".into()));
    }

    tracing::info!(%id, "saved file deleted");
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Saved file deleted",
        "id": id
    })))
}
