use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::StringList;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "colleges")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(unique)]
    pub code: String,
    pub city: String,
    pub state: String,
    pub college_type: CollegeType,
    pub category: CollegeCategory,
    #[sea_orm(column_type = "Json")]
    pub courses: StringList,
    #[sea_orm(column_type = "Json")]
    pub branches: StringList,
    pub website: Option<String>,
    pub established_year: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(
    EnumIter, DeriveActiveEnum, Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum CollegeType {
    #[sea_orm(string_value = "government")]
    Government,
    #[sea_orm(string_value = "private")]
    Private,
    #[sea_orm(string_value = "autonomous")]
    Autonomous,
    #[sea_orm(string_value = "deemed")]
    Deemed,
    #[sea_orm(string_value = "central")]
    Central,
}

#[derive(
    EnumIter, DeriveActiveEnum, Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum CollegeCategory {
    #[sea_orm(string_value = "engineering")]
    Engineering,
    #[sea_orm(string_value = "medical")]
    Medical,
    #[sea_orm(string_value = "management")]
    Management,
    #[sea_orm(string_value = "arts")]
    Arts,
    #[sea_orm(string_value = "science")]
    Science,
    #[sea_orm(string_value = "law")]
    Law,
    #[sea_orm(string_value = "pharmacy")]
    Pharmacy,
    #[sea_orm(string_value = "other")]
    Other,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
