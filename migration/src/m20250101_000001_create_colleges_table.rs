use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Colleges::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Colleges::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Colleges::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(Colleges::Code).string().not_null().unique_key())
                    .col(ColumnDef::new(Colleges::City).string().not_null())
                    .col(ColumnDef::new(Colleges::State).string().not_null())
                    .col(ColumnDef::new(Colleges::CollegeType).string().not_null())
                    .col(ColumnDef::new(Colleges::Category).string().not_null())
                    .col(ColumnDef::new(Colleges::Courses).json().not_null())
                    .col(ColumnDef::new(Colleges::Branches).json().not_null())
                    .col(ColumnDef::new(Colleges::Website).string())
                    .col(ColumnDef::new(Colleges::EstablishedYear).integer())
                    .col(
                        ColumnDef::new(Colleges::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Colleges::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Colleges::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_colleges_state_city")
                    .table(Colleges::Table)
                    .col(Colleges::State)
                    .col(Colleges::City)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Colleges::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Colleges {
    Table,
    Id,
    Name,
    Code,
    City,
    State,
    CollegeType,
    Category,
    Courses,
    Branches,
    Website,
    EstablishedYear,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
