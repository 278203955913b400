use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "files")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
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
    #[sea_orm(unique)]
    pub storage_id: String,
    pub uploaded_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(
    EnumIter, DeriveActiveEnum, Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    #[sea_orm(string_value = "notes")]
    Notes,
    #[sea_orm(string_value = "pyq")]
    Pyq,
}

/// Only meaningful for past papers; notes carry `Normal`.
#[derive(
    EnumIter, DeriveActiveEnum, Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum PaperType {
    #[sea_orm(string_value = "normal")]
    Normal,
    #[sea_orm(string_value = "back")]
    Back,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::saved_file::Entity")]
    SavedFile,
}

impl Related<super::saved_file::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SavedFile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
