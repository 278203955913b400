use async_trait::async_trait;

use crate::error::AppError;

/// Where an uploaded object ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub url: String,
    /// Provider-side identifier, needed to delete the object later.
    pub storage_id: String,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn upload(
        &self,
        folder: &str,
        file_name: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, AppError>;

    async fn delete(&self, storage_id: &str) -> Result<(), AppError>;
}

/// Lowercases and replaces anything non-alphanumeric with `-`, collapsing runs.
pub fn slug(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for c in segment.trim().chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    let out = out.trim_matches('-');
    if out.is_empty() {
        "untitled".to_string()
    } else {
        out.to_string()
    }
}

/// `{root}/{college}/{course}/{file_type}` with every segment slugged.
pub fn upload_folder(root: &str, college: &str, course: &str, file_type: &str) -> String {
    [root, college, course, file_type]
        .iter()
        .map(|s| slug(s))
        .collect::<Vec<_>>()
        .join("/")
}

pub fn extension(file_name: &str) -> String {
    std::path::Path::new(file_name)
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .map(str::to_lowercase)
        .unwrap_or_else(|| "bin".to_string())
}
