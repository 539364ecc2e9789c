use super::m20240102_000002_create_lms_table::Lms;
use super::m20240102_000005_create_laboratories_table::Laboratories;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LabPermissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LabPermissions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LabPermissions::LmsId).string().not_null())
                    .col(
                        ColumnDef::new(LabPermissions::LaboratoryId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LabPermissions::Configuration)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LabPermissions::LocalIdentifier)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LabPermissions::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("lab_permissions_lms_id_fkey")
                            .from(LabPermissions::Table, LabPermissions::LmsId)
                            .to(Lms::Table, Lms::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("lab_permissions_laboratory_id_fkey")
                            .from(LabPermissions::Table, LabPermissions::LaboratoryId)
                            .to(Laboratories::Table, Laboratories::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .index(
                        Index::create()
                            .name("lab_permissions_lms_id_laboratory_id_unique")
                            .col(LabPermissions::LmsId)
                            .col(LabPermissions::LaboratoryId)
                            .unique(),
                    )
                    .index(
                        Index::create()
                            .name("lab_permissions_lms_id_local_identifier_unique")
                            .col(LabPermissions::LmsId)
                            .col(LabPermissions::LocalIdentifier)
                            .unique(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LabPermissions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum LabPermissions {
    Table,
    Id,              // STRING PRIMARY KEY,
    LmsId,           // STRING NOT NULL,
    LaboratoryId,    // STRING NOT NULL,
    Configuration,   // TEXT NOT NULL (JSON blob),
    LocalIdentifier, // STRING NOT NULL (name the LMS uses for the lab),
    CreatedAt,       // TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                     // FOREIGN KEY(lms_id) REFERENCES lms(id),
                     // FOREIGN KEY(laboratory_id) REFERENCES laboratories(id),
                     // UNIQUE (lms_id, laboratory_id),
                     // UNIQUE (lms_id, local_identifier)
}
