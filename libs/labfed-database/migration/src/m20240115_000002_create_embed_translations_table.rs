use super::m20240115_000001_create_embed_applications_table::EmbedApplications;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EmbedApplicationTranslations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EmbedApplicationTranslations::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EmbedApplicationTranslations::ApplicationId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmbedApplicationTranslations::Language)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmbedApplicationTranslations::Url)
                            .string()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("embed_application_translations_application_id_fkey")
                            .from(
                                EmbedApplicationTranslations::Table,
                                EmbedApplicationTranslations::ApplicationId,
                            )
                            .to(EmbedApplications::Table, EmbedApplications::Identifier)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .index(
                        Index::create()
                            .name("embed_application_translations_application_language_unique")
                            .col(EmbedApplicationTranslations::ApplicationId)
                            .col(EmbedApplicationTranslations::Language)
                            .unique(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(EmbedApplicationTranslations::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
pub enum EmbedApplicationTranslations {
    Table,
    Id,            // STRING PRIMARY KEY,
    ApplicationId, // STRING NOT NULL,
    Language,      // STRING NOT NULL (two letter code),
    Url,           // STRING NOT NULL,
                   // FOREIGN KEY(application_id) REFERENCES embed_applications(identifier),
                   // UNIQUE (application_id, language)
}
