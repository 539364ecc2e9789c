#![forbid(unsafe_code)]
pub use sea_orm_migration::prelude::*;

mod m20240102_000001_create_users_table;
mod m20240102_000002_create_lms_table;
mod m20240102_000003_create_courses_table;
mod m20240102_000004_create_rlms_table;
mod m20240102_000005_create_laboratories_table;
mod m20240102_000006_create_lab_permissions_table;
mod m20240102_000007_create_course_permissions_table;
mod m20240102_000008_create_credentials_table;
mod m20240115_000001_create_embed_applications_table;
mod m20240115_000002_create_embed_translations_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240102_000001_create_users_table::Migration),
            Box::new(m20240102_000002_create_lms_table::Migration),
            Box::new(m20240102_000003_create_courses_table::Migration),
            Box::new(m20240102_000004_create_rlms_table::Migration),
            Box::new(m20240102_000005_create_laboratories_table::Migration),
            Box::new(m20240102_000006_create_lab_permissions_table::Migration),
            Box::new(m20240102_000007_create_course_permissions_table::Migration),
            Box::new(m20240102_000008_create_credentials_table::Migration),
            Box::new(m20240115_000001_create_embed_applications_table::Migration),
            Box::new(m20240115_000002_create_embed_translations_table::Migration),
        ]
    }
}
