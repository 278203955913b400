use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // No foreign key to files: deleting a file leaves bookmarks dangling.
        manager
            .create_table(
                Table::create()
                    .table(SavedFiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SavedFiles::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SavedFiles::FileId).uuid().not_null())
                    .col(ColumnDef::new(SavedFiles::UserId).string().not_null())
                    .col(ColumnDef::new(SavedFiles::Category).string().not_null())
                    .col(ColumnDef::new(SavedFiles::Tags).json().not_null())
                    .col(ColumnDef::new(SavedFiles::Notes).text())
                    .col(ColumnDef::new(SavedFiles::SavedAt).timestamp().not_null())
                    .col(ColumnDef::new(SavedFiles::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_saved_files_file_user")
                    .table(SavedFiles::Table)
                    .col(SavedFiles::FileId)
                    .col(SavedFiles::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_saved_files_user")
                    .table(SavedFiles::Table)
                    .col(SavedFiles::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SavedFiles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SavedFiles {
    Table,
    Id,
    FileId,
    UserId,
    Category,
    Tags,
    Notes,
    SavedAt,
    UpdatedAt,
}
