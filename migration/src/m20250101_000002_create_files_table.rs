use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Files::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Files::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Files::College).string().not_null())
                    .col(ColumnDef::new(Files::Course).string().not_null())
                    .col(ColumnDef::new(Files::Branch).string().not_null())
                    .col(ColumnDef::new(Files::Year).string().not_null())
                    .col(ColumnDef::new(Files::Semester).string().not_null())
                    .col(ColumnDef::new(Files::Subject).string())
                    .col(ColumnDef::new(Files::FileType).string().not_null())
                    .col(ColumnDef::new(Files::PaperType).string().not_null())
                    .col(ColumnDef::new(Files::FileName).string().not_null())
                    .col(ColumnDef::new(Files::MimeType).string().not_null())
                    .col(ColumnDef::new(Files::Size).big_integer().not_null())
                    .col(ColumnDef::new(Files::FileUrl).string().not_null())
                    .col(ColumnDef::new(Files::StorageId).string().not_null().unique_key())
                    .col(ColumnDef::new(Files::UploadedAt).timestamp().not_null())
                    .col(ColumnDef::new(Files::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_files_college_course")
                    .table(Files::Table)
                    .col(Files::College)
                    .col(Files::Course)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_files_uploaded_at")
                    .table(Files::Table)
                    .col(Files::UploadedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Files::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Files {
    Table,
    Id,
    College,
    Course,
    Branch,
    Year,
    Semester,
    Subject,
    FileType,
    PaperType,
    FileName,
    MimeType,
    Size,
    FileUrl,
    StorageId,
    UploadedAt,
    UpdatedAt,
}
