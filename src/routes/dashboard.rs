use axum::{extract::State, Json};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use serde::Serialize;

use crate::entities::file::{self, FileType};
use crate::entities::{college, saved_file};
use crate::error::AppError;
use crate::routes::files::FileResponse;

const TOP_GROUPS: u64 = 10;
const RECENT_UPLOADS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromQueryResult, utoipa::ToSchema)]
pub struct GroupCount {
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub files: u64,
    pub notes: u64,
    pub pyqs: u64,
    pub colleges: u64,
    pub active_colleges: u64,
    pub saved_files: u64,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub totals: Totals,
    pub files_by_college: Vec<GroupCount>,
    pub files_by_course: Vec<GroupCount>,
    pub files_by_year: Vec<GroupCount>,
    pub files_by_type: Vec<GroupCount>,
    pub colleges_by_state: Vec<GroupCount>,
    pub colleges_by_category: Vec<GroupCount>,
    pub recent_uploads: Vec<FileResponse>,
}

/// `SELECT column AS name, COUNT(*) AS count ... GROUP BY column`, largest first.
async fn group_count<E, C>(
    db: &DatabaseConnection,
    column: C,
    limit: Option<u64>,
) -> Result<Vec<GroupCount>, AppError>
where
    E: EntityTrait,
    C: ColumnTrait,
{
    let mut select = E::find()
        .select_only()
        .column_as(column, "name")
        .column_as(Expr::expr(Func::count(Expr::col(column.as_column_ref()))), "count")
        .group_by(column)
        .order_by_desc(Expr::cust("count"))
        .order_by_asc(column);
    if let Some(limit) = limit {
        select = select.limit(limit);
    }

    Ok(select.into_model::<GroupCount>().all(db).await?)
}

#[utoipa::path(
    get,
    path = "/dashboard/stats",
    responses(
        (status = 200, description = "Aggregate counts for the dashboard charts", body = DashboardStats)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Dashboard"
)]
pub async fn dashboard_stats(
    State(db): State<DatabaseConnection>,
) -> Result<Json<DashboardStats>, AppError> {
    let (files, notes, pyqs, colleges, active_colleges, saved_files) = tokio::try_join!(
        file::Entity::find().count(&db),
        file::Entity::find()
            .filter(file::Column::FileType.eq(FileType::Notes))
            .count(&db),
        file::Entity::find()
            .filter(file::Column::FileType.eq(FileType::Pyq))
            .count(&db),
        college::Entity::find().count(&db),
        college::Entity::find()
            .filter(college::Column::IsActive.eq(true))
            .count(&db),
        saved_file::Entity::find().count(&db),
    )?;

    let (
        files_by_college,
        files_by_course,
        files_by_year,
        files_by_type,
        colleges_by_state,
        colleges_by_category,
    ) = tokio::try_join!(
        group_count::<file::Entity, _>(&db, file::Column::College, Some(TOP_GROUPS)),
        group_count::<file::Entity, _>(&db, file::Column::Course, Some(TOP_GROUPS)),
        group_count::<file::Entity, _>(&db, file::Column::Year, None),
        group_count::<file::Entity, _>(&db, file::Column::FileType, None),
        group_count::<college::Entity, _>(&db, college::Column::State, None),
        group_count::<college::Entity, _>(&db, college::Column::Category, None),
    )?;

    let recent_uploads = file::Entity::find()
        .order_by_desc(file::Column::UploadedAt)
        .limit(RECENT_UPLOADS)
        .all(&db)
        .await?
        .into_iter()
        .map(FileResponse::from)
        .collect();

    Ok(Json(DashboardStats {
        totals: Totals {
            files,
            notes,
            pyqs,
            colleges,
            active_colleges,
            saved_files,
        },
        files_by_college,
        files_by_course,
        files_by_year,
        files_by_type,
        colleges_by_state,
        colleges_by_category,
        recent_uploads,
    }))
}
