use axum::{extract::State, http::StatusCode};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::file::{self, FileType, PaperType};
use crate::error::AppError;
use crate::extract::{Json, Path, Query};
use crate::pagination::{PaginatedResponse, Pagination};
use crate::query::any_contains_ci;
use crate::state::AppState;
use crate::validation::{non_empty, optional, parse_enum, parse_optional_enum, required};

/// Columns the free-text `search` filter looks at.
pub(crate) const SEARCHABLE_COLUMNS: [file::Column; 5] = [
    file::Column::College,
    file::Column::Course,
    file::Column::Branch,
    file::Column::Subject,
    file::Column::FileName,
];

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListFilesQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub college: Option<String>,
    pub course: Option<String>,
    pub branch: Option<String>,
    pub year: Option<String>,
    pub semester: Option<String>,
    pub file_type: Option<String>,
    pub paper_type: Option<String>,
    pub search: Option<String>,
    /// uploadedAt (default), college, course, year, semester, fileName
    pub sort_by: Option<String>,
    /// asc or desc (default)
    pub sort_order: Option<String>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileResponse {
    pub id: Uuid,
    pub college: String,
    pub course: String,
    pub branch: String,
    pub year: String,
    pub semester: String,
    pub subject: Option<String>,
    pub file_type: FileType,
    pub paper_type: PaperType,
    pub file_name: String,
    pub mime_type: String,
    pub size: i64,
    pub file_url: String,
    pub storage_id: String,
    pub uploaded_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl From<file::Model> for FileResponse {
    fn from(model: file::Model) -> Self {
        Self {
            id: model.id,
            college: model.college,
            course: model.course,
            branch: model.branch,
            year: model.year,
            semester: model.semester,
            subject: model.subject,
            file_type: model.file_type,
            paper_type: model.paper_type,
            file_name: model.file_name,
            mime_type: model.mime_type,
            size: model.size,
            file_url: model.file_url,
            storage_id: model.storage_id,
            uploaded_at: model.uploaded_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFileRequest {
    pub college: Option<String>,
    pub course: Option<String>,
    pub branch: Option<String>,
    pub year: Option<String>,
    pub semester: Option<String>,
    pub subject: Option<String>,
    pub file_type: Option<String>,
    pub paper_type: Option<String>,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
    pub size: Option<i64>,
    pub file_url: Option<String>,
    pub storage_id: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFileRequest {
    pub college: Option<String>,
    pub course: Option<String>,
    pub branch: Option<String>,
    pub year: Option<String>,
    pub semester: Option<String>,
    pub subject: Option<String>,
    pub file_type: Option<String>,
    pub paper_type: Option<String>,
    pub file_name: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct FileFilterOptions {
    pub colleges: Vec<String>,
    pub courses: Vec<String>,
    pub branches: Vec<String>,
    pub years: Vec<String>,
    pub semesters: Vec<String>,
}

fn sort_column(sort_by: Option<&str>) -> Result<file::Column, AppError> {
    match sort_by.unwrap_or("uploadedAt") {
        "uploadedAt" => Ok(file::Column::UploadedAt),
        "college" => Ok(file::Column::College),
        "course" => Ok(file::Column::Course),
        "year" => Ok(file::Column::Year),
        "semester" => Ok(file::Column::Semester),
        "fileName" => Ok(file::Column::FileName),
        other => Err(AppError::BadRequest(format!("Cannot sort files by {}", other))),
    }
}

pub(crate) fn sort_order(raw: Option<&str>, default: Order) -> Result<Order, AppError> {
    match raw.map(str::to_lowercase).as_deref() {
        None => Ok(default),
        Some("asc") => Ok(Order::Asc),
        Some("desc") => Ok(Order::Desc),
        Some(other) => Err(AppError::BadRequest(format!(
            "sortOrder must be asc or desc, got {}",
            other
        ))),
    }
}

fn list_condition(query: &ListFilesQuery) -> Result<Condition, AppError> {
    let mut condition = Condition::all();

    let equalities = [
        (file::Column::College, &query.college),
        (file::Column::Course, &query.course),
        (file::Column::Branch, &query.branch),
        (file::Column::Year, &query.year),
        (file::Column::Semester, &query.semester),
    ];
    for (column, value) in equalities {
        if let Some(value) = optional(value.as_deref()) {
            condition = condition.add(column.eq(value));
        }
    }

    if let Some(file_type) = parse_optional_enum::<FileType>("fileType", query.file_type.as_deref())? {
        condition = condition.add(file::Column::FileType.eq(file_type));
    }
    if let Some(paper_type) = parse_optional_enum::<PaperType>("paperType", query.paper_type.as_deref())? {
        condition = condition.add(file::Column::PaperType.eq(paper_type));
    }
    if let Some(term) = optional(query.search.as_deref()) {
        condition = condition.add(any_contains_ci(&SEARCHABLE_COLUMNS, &term));
    }

    Ok(condition)
}

pub(crate) async fn find_file(db: &DatabaseConnection, id: Uuid) -> Result<file::Model, AppError> {
    file::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("File not found".into()))
}

// GET /files
#[utoipa::path(
    get,
    path = "/files",
    params(ListFilesQuery),
    responses(
        (status = 200, description = "Filtered page of files", body = PaginatedResponse<FileResponse>),
        (status = 400, description = "Invalid filter or sort parameter"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Files"
)]
pub async fn list_files(
    State(db): State<DatabaseConnection>,
    Query(query): Query<ListFilesQuery>,
) -> Result<Json<PaginatedResponse<FileResponse>>, AppError> {
    let pagination = Pagination {
        page: query.page,
        limit: query.limit,
    };
    let condition = list_condition(&query)?;
    let column = sort_column(query.sort_by.as_deref())?;
    let order = sort_order(query.sort_order.as_deref(), Order::Desc)?;

    let paginator = file::Entity::find()
        .filter(condition)
        .order_by(column, order.clone())
        .order_by(file::Column::Id, order)
        .paginate(&db, pagination.limit());

    let total_items = paginator.num_items().await?;
    let items = paginator.fetch_page(pagination.page() - 1).await?;

    let data = items.into_iter().map(FileResponse::from).collect();
    Ok(Json(PaginatedResponse::new(
        data,
        total_items,
        pagination.page(),
        pagination.limit(),
    )))
}

// GET /files/{id}
#[utoipa::path(
    get,
    path = "/files/{id}",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File details", body = FileResponse),
        (status = 404, description = "File not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Files"
)]
pub async fn get_file(
    State(db): State<DatabaseConnection>,
    Path(id): Path<Uuid>,
) -> Result<Json<FileResponse>, AppError> {
    Ok(Json(find_file(&db, id).await?.into()))
}

// POST /files
#[utoipa::path(
    post,
    path = "/files",
    request_body = CreateFileRequest,
    responses(
        (status = 201, description = "File record created", body = FileResponse),
        (status = 400, description = "Missing required field"),
        (status = 409, description = "Storage id already registered")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Files"
)]
pub async fn create_file(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<CreateFileRequest>,
) -> Result<(StatusCode, Json<FileResponse>), AppError> {
    let file_type: FileType = parse_enum(
        "fileType",
        &required("fileType", payload.file_type.as_deref())?,
    )?;
    let paper_type = parse_optional_enum::<PaperType>("paperType", payload.paper_type.as_deref())?
        .unwrap_or(PaperType::Normal);
    let now = chrono::Utc::now().naive_utc();

    let model = file::ActiveModel {
        id: Set(Uuid::new_v4()),
        college: Set(required("college", payload.college.as_deref())?),
        course: Set(required("course", payload.course.as_deref())?),
        branch: Set(required("branch", payload.branch.as_deref())?),
        year: Set(required("year", payload.year.as_deref())?),
        semester: Set(required("semester", payload.semester.as_deref())?),
        subject: Set(optional(payload.subject.as_deref())),
        file_type: Set(file_type),
        paper_type: Set(paper_type),
        file_name: Set(required("fileName", payload.file_name.as_deref())?),
        mime_type: Set(optional(payload.mime_type.as_deref())
            .unwrap_or_else(|| "application/octet-stream".to_string())),
        size: Set(payload.size.unwrap_or(0).max(0)),
        file_url: Set(required("fileUrl", payload.file_url.as_deref())?),
        storage_id: Set(required("storageId", payload.storage_id.as_deref())?),
        uploaded_at: Set(now),
        updated_at: Set(now),
    };

    let saved = model.insert(&db).await?;
    tracing::info!(id = %saved.id, file = %saved.file_name, "file record created");
    Ok((StatusCode::CREATED, Json(saved.into())))
}

// PUT /files/{id}
#[utoipa::path(
    put,
    path = "/files/{id}",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    request_body = UpdateFileRequest,
    responses(
        (status = 200, description = "File updated", body = FileResponse),
        (status = 400, description = "Blank or invalid field"),
        (status = 404, description = "File not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Files"
)]
pub async fn update_file(
    State(db): State<DatabaseConnection>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateFileRequest>,
) -> Result<Json<FileResponse>, AppError> {
    let mut active = find_file(&db, id).await?.into_active_model();

    if let Some(v) = non_empty("college", payload.college.as_deref())? {
        active.college = Set(v);
    }
    if let Some(v) = non_empty("course", payload.course.as_deref())? {
        active.course = Set(v);
    }
    if let Some(v) = non_empty("branch", payload.branch.as_deref())? {
        active.branch = Set(v);
    }
    if let Some(v) = non_empty("year", payload.year.as_deref())? {
        active.year = Set(v);
    }
    if let Some(v) = non_empty("semester", payload.semester.as_deref())? {
        active.semester = Set(v);
    }
    if let Some(v) = non_empty("fileName", payload.file_name.as_deref())? {
        active.file_name = Set(v);
    }
    if payload.subject.is_some() {
        active.subject = Set(optional(payload.subject.as_deref()));
    }
    if let Some(v) = parse_optional_enum::<FileType>("fileType", payload.file_type.as_deref())? {
        active.file_type = Set(v);
    }
    if let Some(v) = parse_optional_enum::<PaperType>("paperType", payload.paper_type.as_deref())? {
        active.paper_type = Set(v);
    }
    active.updated_at = Set(chrono::Utc::now().naive_utc());

    let updated = active.update(&db).await?;
    tracing::info!(%id, "file updated");
    Ok(Json(updated.into()))
}

// DELETE /files/{id}
#[utoipa::path(
    delete,
    path = "/files/{id}",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File deleted"),
        (status = 404, description = "File not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Files"
)]
pub async fn delete_file(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let file = find_file(&state.db, id).await?;

    // Bookmarks pointing at this file are left in place and skipped when listed.
    let res = file::Entity::delete_by_id(id).exec(&state.db).await?;
    if res.rows_affected == 0 {
        return Err(AppError::NotFound("File not found".into()));
    }

    if let Err(e) = state.storage.delete(&file.storage_id).await {
        tracing::warn!(%id, storage_id = %file.storage_id, "stored object not removed: {}", e);
    }

    tracing::info!(%id, "file deleted");
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "File deleted successfully",
        "id": id
    })))
}

async fn distinct_values(
    db: &DatabaseConnection,
    column: file::Column,
) -> Result<Vec<String>, AppError> {
    let values: Vec<String> = file::Entity::find()
        .select_only()
        .column(column)
        .distinct()
        .order_by_asc(column)
        .into_tuple()
        .all(db)
        .await?;
    Ok(values)
}

// GET /files/filters
#[utoipa::path(
    get,
    path = "/files/filters",
    responses(
        (status = 200, description = "Distinct values for the file filter dropdowns", body = FileFilterOptions)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Files"
)]
pub async fn file_filters(
    State(db): State<DatabaseConnection>,
) -> Result<Json<FileFilterOptions>, AppError> {
    let (colleges, courses, branches, years, semesters) = tokio::try_join!(
        distinct_values(&db, file::Column::College),
        distinct_values(&db, file::Column::Course),
        distinct_values(&db, file::Column::Branch),
        distinct_values(&db, file::Column::Year),
        distinct_values(&db, file::Column::Semester),
    )?;

    Ok(Json(FileFilterOptions {
        colleges,
        courses,
        branches,
        years,
        semesters,
    }))
}
