use super::m20240102_000003_create_courses_table::Courses;
use super::m20240102_000006_create_lab_permissions_table::LabPermissions;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CoursePermissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CoursePermissions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CoursePermissions::CourseId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CoursePermissions::LabPermissionId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CoursePermissions::Configuration).text())
                    .col(
                        ColumnDef::new(CoursePermissions::Access)
                            .small_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CoursePermissions::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("course_permissions_course_id_fkey")
                            .from(CoursePermissions::Table, CoursePermissions::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("course_permissions_lab_permission_id_fkey")
                            .from(CoursePermissions::Table, CoursePermissions::LabPermissionId)
                            .to(LabPermissions::Table, LabPermissions::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .index(
                        Index::create()
                            .name("course_permissions_course_id_lab_permission_id_unique")
                            .col(CoursePermissions::CourseId)
                            .col(CoursePermissions::LabPermissionId)
                            .unique(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CoursePermissions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum CoursePermissions {
    Table,
    Id,              // STRING PRIMARY KEY,
    CourseId,        // STRING NOT NULL,
    LabPermissionId, // STRING NOT NULL,
    Configuration,   // TEXT NULL (JSON blob),
    Access,          // SMALLINT NOT NULL DEFAULT 0 (pending),
    CreatedAt,       // TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                     // FOREIGN KEY(course_id) REFERENCES courses(id),
                     // FOREIGN KEY(lab_permission_id) REFERENCES lab_permissions(id),
                     // UNIQUE (course_id, lab_permission_id)
}
