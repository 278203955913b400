pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_colleges_table;
mod m20250101_000002_create_files_table;
mod m20250101_000003_create_saved_files_table;
mod m20250102_000004_create_courses_table;
mod m20250102_000005_create_subjects_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_colleges_table::Migration),
            Box::new(m20250101_000002_create_files_table::Migration),
            Box::new(m20250101_000003_create_saved_files_table::Migration),
            Box::new(m20250102_000004_create_courses_table::Migration),
            Box::new(m20250102_000005_create_subjects_table::Migration),
        ]
    }
}
