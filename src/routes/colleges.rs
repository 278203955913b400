use axum::{extract::State, http::StatusCode};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    Order, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::college::{self, CollegeCategory, CollegeType};
use crate::entities::StringList;
use crate::error::AppError;
use crate::extract::{Json, Path, Query};
use crate::pagination::{PaginatedResponse, Pagination};
use crate::query::{any_contains_ci, contains_ci, equals_ci};
use crate::routes::files::sort_order;
use crate::validation::{non_empty, optional, parse_enum, parse_optional_enum, required};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListCollegesQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// Substring of name, code or city
    pub search: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    #[serde(rename = "type")]
    pub college_type: Option<String>,
    pub category: Option<String>,
    pub is_active: Option<bool>,
    /// name (default), code, city, state, createdAt
    pub sort_by: Option<String>,
    /// asc (default) or desc
    pub sort_order: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct DropdownQuery {
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollegeResponse {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub city: String,
    pub state: String,
    #[serde(rename = "type")]
    pub college_type: CollegeType,
    pub category: CollegeCategory,
    pub courses: Vec<String>,
    pub branches: Vec<String>,
    pub website: Option<String>,
    pub established_year: Option<i32>,
    pub is_active: bool,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl From<college::Model> for CollegeResponse {
    fn from(model: college::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            code: model.code,
            city: model.city,
            state: model.state,
            college_type: model.college_type,
            category: model.category,
            courses: model.courses.0,
            branches: model.branches.0,
            website: model.website,
            established_year: model.established_year,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Body of `POST /colleges`, `PUT /colleges/{id}` and each bulk-import item.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollegeInput {
    pub name: Option<String>,
    pub code: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[serde(rename = "type")]
    pub college_type: Option<String>,
    pub category: Option<String>,
    pub courses: Option<Vec<String>>,
    pub branches: Option<Vec<String>>,
    pub website: Option<String>,
    pub established_year: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct DropdownItem {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub city: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct BulkImportRequest {
    pub colleges: Vec<CollegeInput>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct BulkImportError {
    pub index: usize,
    pub name: Option<String>,
    pub error: String,
}

#[derive(Debug, Default, Serialize, utoipa::ToSchema)]
pub struct BulkImportSummary {
    pub total: usize,
    pub inserted: usize,
    pub updated: usize,
    pub failed: usize,
    pub errors: Vec<BulkImportError>,
}

enum ImportOutcome {
    Inserted,
    Updated,
}

fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

fn sort_column(sort_by: Option<&str>) -> Result<college::Column, AppError> {
    match sort_by.unwrap_or("name") {
        "name" => Ok(college::Column::Name),
        "code" => Ok(college::Column::Code),
        "city" => Ok(college::Column::City),
        "state" => Ok(college::Column::State),
        "createdAt" => Ok(college::Column::CreatedAt),
        other => Err(AppError::BadRequest(format!("Cannot sort colleges by {}", other))),
    }
}

async fn find_college(db: &DatabaseConnection, id: Uuid) -> Result<college::Model, AppError> {
    college::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("College not found".into()))
}

/// Rejects a name (case-insensitive) or code already held by a college other than `exclude`.
async fn ensure_unique(
    db: &DatabaseConnection,
    name: Option<&str>,
    code: Option<&str>,
    exclude: Option<Uuid>,
) -> Result<(), AppError> {
    let mut clash = Condition::any();
    if let Some(name) = name {
        clash = clash.add(equals_ci(college::Column::Name, name));
    }
    if let Some(code) = code {
        clash = clash.add(college::Column::Code.eq(code));
    }
    if clash.is_empty() {
        return Ok(());
    }

    let mut select = college::Entity::find().filter(clash);
    if let Some(id) = exclude {
        select = select.filter(college::Column::Id.ne(id));
    }

    if let Some(existing) = select.one(db).await? {
        let field = if name.is_some_and(|n| existing.name.eq_ignore_ascii_case(n)) {
            "name"
        } else {
            "code"
        };
        return Err(AppError::Conflict(format!(
            "A college with this {} already exists",
            field
        )));
    }
    Ok(())
}

fn new_college(input: &CollegeInput) -> Result<college::ActiveModel, AppError> {
    let now = chrono::Utc::now().naive_utc();
    let college_type: CollegeType = parse_enum(
        "type",
        &required("type", input.college_type.as_deref())?,
    )?;
    let category: CollegeCategory = parse_enum(
        "category",
        &required("category", input.category.as_deref())?,
    )?;

    Ok(college::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(required("name", input.name.as_deref())?),
        code: Set(normalize_code(&required("code", input.code.as_deref())?)),
        city: Set(required("city", input.city.as_deref())?),
        state: Set(required("state", input.state.as_deref())?),
        college_type: Set(college_type),
        category: Set(category),
        courses: Set(StringList::normalized(input.courses.iter().flatten())),
        branches: Set(StringList::normalized(input.branches.iter().flatten())),
        website: Set(optional(input.website.as_deref())),
        established_year: Set(input.established_year),
        is_active: Set(input.is_active.unwrap_or(true)),
        created_at: Set(now),
        updated_at: Set(now),
    })
}

/// Applies the fields present in `input`; blanks are rejected rather than cleared.
fn apply_update(active: &mut college::ActiveModel, input: &CollegeInput) -> Result<(), AppError> {
    if let Some(v) = non_empty("name", input.name.as_deref())? {
        active.name = Set(v);
    }
    if let Some(v) = non_empty("code", input.code.as_deref())? {
        active.code = Set(normalize_code(&v));
    }
    if let Some(v) = non_empty("city", input.city.as_deref())? {
        active.city = Set(v);
    }
    if let Some(v) = non_empty("state", input.state.as_deref())? {
        active.state = Set(v);
    }
    if let Some(v) = parse_optional_enum::<CollegeType>("type", input.college_type.as_deref())? {
        active.college_type = Set(v);
    }
    if let Some(v) = parse_optional_enum::<CollegeCategory>("category", input.category.as_deref())? {
        active.category = Set(v);
    }
    if let Some(courses) = &input.courses {
        active.courses = Set(StringList::normalized(courses));
    }
    if let Some(branches) = &input.branches {
        active.branches = Set(StringList::normalized(branches));
    }
    if input.website.is_some() {
        active.website = Set(optional(input.website.as_deref()));
    }
    if input.established_year.is_some() {
        active.established_year = Set(input.established_year);
    }
    if let Some(is_active) = input.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    Ok(())
}

#[utoipa::path(
    get,
    path = "/colleges",
    params(ListCollegesQuery),
    responses(
        (status = 200, description = "Filtered page of colleges", body = PaginatedResponse<CollegeResponse>),
        (status = 400, description = "Invalid filter or sort parameter")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Colleges"
)]
pub async fn list_colleges(
    State(db): State<DatabaseConnection>,
    Query(query): Query<ListCollegesQuery>,
) -> Result<Json<PaginatedResponse<CollegeResponse>>, AppError> {
    let pagination = Pagination {
        page: query.page,
        limit: query.limit,
    };

    let mut condition = Condition::all();
    if let Some(term) = optional(query.search.as_deref()) {
        condition = condition.add(any_contains_ci(
            &[college::Column::Name, college::Column::Code, college::Column::City],
            &term,
        ));
    }
    if let Some(state) = optional(query.state.as_deref()) {
        condition = condition.add(equals_ci(college::Column::State, &state));
    }
    if let Some(city) = optional(query.city.as_deref()) {
        condition = condition.add(contains_ci(college::Column::City, &city));
    }
    if let Some(t) = parse_optional_enum::<CollegeType>("type", query.college_type.as_deref())? {
        condition = condition.add(college::Column::CollegeType.eq(t));
    }
    if let Some(c) = parse_optional_enum::<CollegeCategory>("category", query.category.as_deref())? {
        condition = condition.add(college::Column::Category.eq(c));
    }
    if let Some(is_active) = query.is_active {
        condition = condition.add(college::Column::IsActive.eq(is_active));
    }

    let column = sort_column(query.sort_by.as_deref())?;
    let order = sort_order(query.sort_order.as_deref(), Order::Asc)?;

    let paginator = college::Entity::find()
        .filter(condition)
        .order_by(column, order.clone())
        .order_by(college::Column::Id, order)
        .paginate(&db, pagination.limit());

    let total_items = paginator.num_items().await?;
    let items = paginator.fetch_page(pagination.page() - 1).await?;

    Ok(Json(PaginatedResponse::new(
        items.into_iter().map(CollegeResponse::from).collect(),
        total_items,
        pagination.page(),
        pagination.limit(),
    )))
}

#[utoipa::path(
    get,
    path = "/colleges/{id}",
    params(
        ("id" = Uuid, Path, description = "College ID")
    ),
    responses(
        (status = 200, description = "College details", body = CollegeResponse),
        (status = 404, description = "College not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Colleges"
)]
pub async fn get_college(
    State(db): State<DatabaseConnection>,
    Path(id): Path<Uuid>,
) -> Result<Json<CollegeResponse>, AppError> {
    Ok(Json(find_college(&db, id).await?.into()))
}

#[utoipa::path(
    post,
    path = "/colleges",
    request_body = CollegeInput,
    responses(
        (status = 201, description = "College created", body = CollegeResponse),
        (status = 400, description = "Missing or invalid field"),
        (status = 409, description = "Name or code already exists")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Colleges"
)]
pub async fn create_college(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<CollegeInput>,
) -> Result<(StatusCode, Json<CollegeResponse>), AppError> {
    let model = new_college(&payload)?;
    ensure_unique(
        &db,
        Some(model.name.as_ref().as_str()),
        Some(model.code.as_ref().as_str()),
        None,
    )
    .await?;

    let created = model.insert(&db).await?;
    tracing::info!(id = %created.id, code = %created.code, "college created");
    Ok((StatusCode::CREATED, Json(created.into())))
}

#[utoipa::path(
    put,
    path = "/colleges/{id}",
    params(
        ("id" = Uuid, Path, description = "College ID")
    ),
    request_body = CollegeInput,
    responses(
        (status = 200, description = "College updated", body = CollegeResponse),
        (status = 404, description = "College not found"),
        (status = 409, description = "Name or code taken by another college")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Colleges"
)]
pub async fn update_college(
    State(db): State<DatabaseConnection>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CollegeInput>,
) -> Result<Json<CollegeResponse>, AppError> {
    let mut active = find_college(&db, id).await?.into_active_model();
    apply_update(&mut active, &payload)?;

    let name = optional(payload.name.as_deref());
    let code = optional(payload.code.as_deref()).map(|c| normalize_code(&c));
    ensure_unique(&db, name.as_deref(), code.as_deref(), Some(id)).await?;

    let updated = active.update(&db).await?;
    tracing::info!(%id, "college updated");
    Ok(Json(updated.into()))
}

#[utoipa::path(
    delete,
    path = "/colleges/{id}",
    params(
        ("id" = Uuid, Path, description = "College ID")
    ),
    responses(
        (status = 200, description = "College deleted"),
        (status = 404, description = "College not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Colleges"
)]
pub async fn delete_college(
    State(db): State<DatabaseConnection>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let res = college::Entity::delete_by_id(id).exec(&db).await?;
    if res.rows_affected == 0 {
        return Err(AppError::NotFound("College not found".into()));
    }

    tracing::info!(%id, "college deleted");
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "College deleted successfully",
        "id": id
    })))
}

#[utoipa::path(
    get,
    path = "/colleges/dropdown",
    params(DropdownQuery),
    responses(
        (status = 200, description = "Active colleges for select inputs", body = [DropdownItem])
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Colleges"
)]
pub async fn college_dropdown(
    State(db): State<DatabaseConnection>,
    Query(query): Query<DropdownQuery>,
) -> Result<Json<Vec<DropdownItem>>, AppError> {
    let mut select = college::Entity::find().filter(college::Column::IsActive.eq(true));
    if let Some(term) = optional(query.search.as_deref()) {
        select = select.filter(any_contains_ci(
            &[college::Column::Name, college::Column::Code],
            &term,
        ));
    }

    let items = select
        .order_by_asc(college::Column::Name)
        .all(&db)
        .await?
        .into_iter()
        .map(|c| DropdownItem {
            id: c.id,
            name: c.name,
            code: c.code,
            city: c.city,
        })
        .collect();

    Ok(Json(items))
}

async fn import_one(db: &DatabaseConnection, input: &CollegeInput) -> Result<ImportOutcome, AppError> {
    let code = normalize_code(&required("code", input.code.as_deref())?);
    let name = required("name", input.name.as_deref())?;

    let existing = match college::Entity::find()
        .filter(college::Column::Code.eq(code.as_str()))
        .one(db)
        .await?
    {
        Some(found) => Some(found),
        None => {
            college::Entity::find()
                .filter(equals_ci(college::Column::Name, &name))
                .one(db)
                .await?
        }
    };

    match existing {
        Some(found) => {
            let id = found.id;
            let mut active = found.into_active_model();
            apply_update(&mut active, input)?;
            ensure_unique(db, Some(&name), Some(&code), Some(id)).await?;
            active.update(db).await?;
            Ok(ImportOutcome::Updated)
        }
        None => {
            new_college(input)?.insert(db).await?;
            Ok(ImportOutcome::Inserted)
        }
    }
}

/// Upserts every item, collecting per-item failures instead of aborting.
pub async fn bulk_import(db: &DatabaseConnection, items: &[CollegeInput]) -> BulkImportSummary {
    let mut summary = BulkImportSummary {
        total: items.len(),
        ..Default::default()
    };

    for (index, input) in items.iter().enumerate() {
        match import_one(db, input).await {
            Ok(ImportOutcome::Inserted) => summary.inserted += 1,
            Ok(ImportOutcome::Updated) => summary.updated += 1,
            Err(e) => {
                summary.failed += 1;
                summary.errors.push(BulkImportError {
                    index,
                    name: input.name.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        total = summary.total,
        inserted = summary.inserted,
        updated = summary.updated,
        failed = summary.failed,
        "college bulk import finished"
    );
    summary
}

#[utoipa::path(
    post,
    path = "/colleges/bulk",
    request_body = BulkImportRequest,
    responses(
        (status = 200, description = "Per-item import summary", body = BulkImportSummary)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Colleges"
)]
pub async fn bulk_import_colleges(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<BulkImportRequest>,
) -> Result<Json<BulkImportSummary>, AppError> {
    if payload.colleges.is_empty() {
        return Err(AppError::BadRequest("colleges must not be empty".to_string()));
    }
    Ok(Json(bulk_import(&db, &payload.colleges).await))
}
