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
                    .table(Credentials::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Credentials::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Credentials::LmsId).string().not_null())
                    .col(ColumnDef::new(Credentials::Key).string().not_null())
                    .col(ColumnDef::new(Credentials::Kind).string().not_null())
                    .col(ColumnDef::new(Credentials::Secret).string().not_null())
                    .col(
                        ColumnDef::new(Credentials::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("credentials_lms_id_fkey")
                            .from(Credentials::Table, Credentials::LmsId)
                            .to(Lms::Table, Lms::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .index(
                        Index::create()
                            .name("credentials_lms_id_key_unique")
                            .col(Credentials::LmsId)
                            .col(Credentials::Key)
                            .unique(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Credentials::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Credentials {
    Table,
    Id,        // STRING PRIMARY KEY,
    LmsId,     // STRING NOT NULL,
    Key,       // STRING NOT NULL,
    Kind,      // STRING NOT NULL (e.g. "OAuth1.0"),
    Secret,    // STRING NOT NULL,
    CreatedAt, // TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
               // FOREIGN KEY(lms_id) REFERENCES lms(id),
               // UNIQUE (lms_id, key)
}
