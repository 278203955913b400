use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::StringList;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "saved_files")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub file_id: Uuid,
    // Client supplied; not bound to the session.
    pub user_id: String,
    pub category: SavedCategory,
    #[sea_orm(column_type = "Json")]
    pub tags: StringList,
    pub notes: Option<String>,
    pub saved_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(
    EnumIter,
    DeriveActiveEnum,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Deserialize,
    Serialize,
    utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "kebab-case")]
pub enum SavedCategory {
    #[default]
    #[sea_orm(string_value = "general")]
    General,
    #[sea_orm(string_value = "important")]
    Important,
    #[sea_orm(string_value = "exam-prep")]
    ExamPrep,
    #[sea_orm(string_value = "revision")]
    Revision,
    #[sea_orm(string_value = "reference")]
    Reference,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    // Join only; the table carries no foreign key so file deletes never cascade.
    #[sea_orm(
        belongs_to = "super::file::Entity",
        from = "Column::FileId",
        to = "super::file::Column::Id"
    )]
    File,
}

impl Related<super::file::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::File.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
