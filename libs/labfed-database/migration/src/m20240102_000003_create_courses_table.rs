use super::m20240102_000002_create_lms_table::Lms;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Courses::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Courses::LmsId).string().not_null())
                    .col(ColumnDef::new(Courses::ContextId).string().not_null())
                    .col(ColumnDef::new(Courses::Name).string().not_null())
                    .col(
                        ColumnDef::new(Courses::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("courses_lms_id_fkey")
                            .from(Courses::Table, Courses::LmsId)
                            .to(Lms::Table, Lms::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .index(
                        Index::create()
                            .name("courses_lms_id_context_id_unique")
                            .col(Courses::LmsId)
                            .col(Courses::ContextId)
                            .unique(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Courses {
    Table,
    Id,        // STRING PRIMARY KEY,
    LmsId,     // STRING NOT NULL,
    ContextId, // STRING NOT NULL (identifier inside the LMS),
    Name,      // STRING NOT NULL,
    CreatedAt, // TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
               // FOREIGN KEY(lms_id) REFERENCES lms(id),
               // UNIQUE (lms_id, context_id)
}
