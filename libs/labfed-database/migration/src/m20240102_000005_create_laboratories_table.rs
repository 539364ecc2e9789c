use super::m20240102_000004_create_rlms_table::Rlms;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Laboratories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Laboratories::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Laboratories::RlmsId).string().not_null())
                    .col(ColumnDef::new(Laboratories::Name).string().not_null())
                    .col(
                        ColumnDef::new(Laboratories::LaboratoryId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Laboratories::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("laboratories_rlms_id_fkey")
                            .from(Laboratories::Table, Laboratories::RlmsId)
                            .to(Rlms::Table, Rlms::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .index(
                        Index::create()
                            .name("laboratories_rlms_id_laboratory_id_unique")
                            .col(Laboratories::RlmsId)
                            .col(Laboratories::LaboratoryId)
                            .unique(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Laboratories::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Laboratories {
    Table,
    Id,           // STRING PRIMARY KEY,
    RlmsId,       // STRING NOT NULL,
    Name,         // STRING NOT NULL,
    LaboratoryId, // STRING NOT NULL (external composite identifier),
    CreatedAt,    // TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                  // FOREIGN KEY(rlms_id) REFERENCES rlms(id),
                  // UNIQUE (rlms_id, laboratory_id)
}
