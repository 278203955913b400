use std::collections::HashMap;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::Json,
};
use sea_orm::{ActiveModelTrait, ActiveEnum, Set};
use uuid::Uuid;

use crate::entities::file::{self, FileType, PaperType};
use crate::error::AppError;
use crate::routes::files::FileResponse;
use crate::services::storage::upload_folder;
use crate::state::AppState;
use crate::validation::{optional, parse_enum, parse_optional_enum, required};

struct UploadedBlob {
    file_name: String,
    content_type: String,
    data: Vec<u8>,
}

/// Text fields plus the single `file` part of an upload form.
#[derive(Default)]
struct UploadForm {
    fields: HashMap<String, String>,
    file: Option<UploadedBlob>,
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid multipart data: {}", e)))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == "file" {
                let file_name = field.file_name().unwrap_or("unknown").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read file bytes: {}", e)))?;
                form.file = Some(UploadedBlob {
                    file_name,
                    content_type,
                    data: data.to_vec(),
                });
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read field {}: {}", name, e)))?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

#[utoipa::path(
    post,
    path = "/files/upload",
    tag = "File Upload",
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "File stored and recorded", body = FileResponse),
        (status = 400, description = "Missing form field or file"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Storage provider or database failure")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upload_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<FileResponse>), AppError> {
    let form = UploadForm::read(multipart?).await?;

    // Everything is checked before the provider sees a single byte.
    let college = required("college", form.get("college"))?;
    let course = required("course", form.get("course"))?;
    let branch = required("branch", form.get("branch"))?;
    let year = required("year", form.get("year"))?;
    let semester = required("semester", form.get("semester"))?;
    let file_type: FileType = parse_enum("fileType", &required("fileType", form.get("fileType"))?)?;
    let paper_type = parse_optional_enum::<PaperType>("paperType", form.get("paperType"))?
        .unwrap_or(PaperType::Normal);
    let subject = optional(form.get("subject"));

    let blob = form
        .file
        .filter(|b| !b.data.is_empty())
        .ok_or_else(|| AppError::BadRequest("file is required".to_string()))?;

    let folder = upload_folder(
        &state.config.storage.upload_root,
        &college,
        &course,
        &file_type.to_value(),
    );
    let size = blob.data.len() as i64;

    let stored = state
        .storage
        .upload(&folder, &blob.file_name, blob.data, &blob.content_type)
        .await?;

    let now = chrono::Utc::now().naive_utc();
    let model = file::ActiveModel {
        id: Set(Uuid::new_v4()),
        college: Set(college),
        course: Set(course),
        branch: Set(branch),
        year: Set(year),
        semester: Set(semester),
        subject: Set(subject),
        file_type: Set(file_type),
        paper_type: Set(paper_type),
        file_name: Set(blob.file_name),
        mime_type: Set(blob.content_type),
        size: Set(size),
        file_url: Set(stored.url),
        storage_id: Set(stored.storage_id.clone()),
        uploaded_at: Set(now),
        updated_at: Set(now),
    };

    let saved = match model.insert(&state.db).await {
        Ok(saved) => saved,
        Err(e) => {
            // Row never landed, so the object would be orphaned.
            if let Err(cleanup) = state.storage.delete(&stored.storage_id).await {
                tracing::warn!(storage_id = %stored.storage_id, "orphaned upload not removed: {}", cleanup);
            }
            return Err(e.into());
        }
    };

    tracing::info!(
        id = %saved.id,
        file = %saved.file_name,
        %folder,
        size,
        "file uploaded"
    );
    Ok((StatusCode::CREATED, Json(saved.into())))
}
