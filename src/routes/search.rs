use axum::extract::State;
use sea_orm::{DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};

use crate::entities::file;
use crate::error::AppError;
use crate::extract::{Json, Query};
use crate::query::{any_contains_ci, contains_ci};
use crate::routes::files::FileResponse;

pub const MIN_SUGGESTION_QUERY: usize = 2;
pub const SUGGESTIONS_PER_FIELD: u64 = 5;
pub const MAX_SUGGESTIONS: usize = 10;
pub const MAX_GLOBAL_RESULTS: u64 = 50;

const SUGGESTION_FIELDS: [(file::Column, &str, &str); 3] = [
    (file::Column::College, "college", "College"),
    (file::Column::Course, "course", "Course"),
    (file::Column::Branch, "branch", "Branch"),
];

const GLOBAL_FIELDS: [file::Column; 7] = [
    file::Column::College,
    file::Column::Course,
    file::Column::Branch,
    file::Column::Subject,
    file::Column::FileName,
    file::Column::Year,
    file::Column::Semester,
];

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct SearchQuery {
    pub q: Option<String>,
    /// suggestions or global (default)
    #[serde(rename = "type")]
    pub search_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct Suggestion {
    pub kind: String,
    pub value: String,
    pub display: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SearchResponse {
    Suggestions {
        query: String,
        suggestions: Vec<Suggestion>,
    },
    Global {
        query: String,
        total: usize,
        results: Vec<FileResponse>,
    },
}

/// Concatenates per-field suggestion lists in field order, keeping the first `cap`.
fn merge_suggestions(groups: Vec<Vec<Suggestion>>, cap: usize) -> Vec<Suggestion> {
    groups.into_iter().flatten().take(cap).collect()
}

async fn field_suggestions(
    db: &DatabaseConnection,
    column: file::Column,
    kind: &str,
    label: &str,
    term: &str,
) -> Result<Vec<Suggestion>, AppError> {
    let values: Vec<String> = file::Entity::find()
        .select_only()
        .column(column)
        .distinct()
        .filter(contains_ci(column, term))
        .order_by_asc(column)
        .limit(SUGGESTIONS_PER_FIELD)
        .into_tuple()
        .all(db)
        .await?;

    Ok(values
        .into_iter()
        .map(|value| Suggestion {
            kind: kind.to_string(),
            display: format!("{} ({})", value, label),
            value,
        })
        .collect())
}

async fn suggestions(db: &DatabaseConnection, term: &str) -> Result<Vec<Suggestion>, AppError> {
    if term.chars().count() < MIN_SUGGESTION_QUERY {
        return Ok(Vec::new());
    }

    let mut groups = Vec::with_capacity(SUGGESTION_FIELDS.len());
    for (column, kind, label) in SUGGESTION_FIELDS {
        groups.push(field_suggestions(db, column, kind, label, term).await?);
    }
    Ok(merge_suggestions(groups, MAX_SUGGESTIONS))
}

async fn global(db: &DatabaseConnection, term: &str) -> Result<Vec<FileResponse>, AppError> {
    if term.is_empty() {
        return Ok(Vec::new());
    }

    let files = file::Entity::find()
        .filter(any_contains_ci(&GLOBAL_FIELDS, term))
        .order_by_desc(file::Column::UploadedAt)
        .limit(MAX_GLOBAL_RESULTS)
        .all(db)
        .await?;

    Ok(files.into_iter().map(FileResponse::from).collect())
}

#[utoipa::path(
    get,
    path = "/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Suggestions or matching files", body = SearchResponse),
        (status = 400, description = "Unknown search type")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Search"
)]
pub async fn search(
    State(db): State<DatabaseConnection>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    let term = query.q.as_deref().unwrap_or("").trim().to_string();

    let response = match query.search_type.as_deref().unwrap_or("global") {
        "suggestions" => SearchResponse::Suggestions {
            suggestions: suggestions(&db, &term).await?,
            query: term,
        },
        "global" => {
            let results = global(&db, &term).await?;
            SearchResponse::Global {
                query: term,
                total: results.len(),
                results,
            }
        }
        other => {
            return Err(AppError::BadRequest(format!(
                "type must be suggestions or global, got {}",
                other
            )))
        }
    };

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(kind: &str, value: &str) -> Suggestion {
        Suggestion {
            kind: kind.into(),
            value: value.into(),
            display: value.into(),
        }
    }

    #[test]
    fn merge_keeps_field_order_and_caps() {
        let groups = vec![
            vec![s("college", "a1"), s("college", "a2")],
            vec![s("course", "b1")],
            vec![s("branch", "c1"), s("branch", "c2")],
        ];
        let merged = merge_suggestions(groups, 4);
        let values: Vec<_> = merged.iter().map(|s| s.value.as_str()).collect();
        assert_eq!(values, ["a1", "a2", "b1", "c1"]);
    }
}
