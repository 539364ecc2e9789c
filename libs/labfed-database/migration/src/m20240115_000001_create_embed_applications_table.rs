use super::m20240102_000001_create_users_table::Users;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EmbedApplications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EmbedApplications::Identifier)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EmbedApplications::OwnerId).string().not_null())
                    .col(ColumnDef::new(EmbedApplications::Name).string().not_null())
                    .col(ColumnDef::new(EmbedApplications::Url).string().not_null())
                    .col(ColumnDef::new(EmbedApplications::Description).text())
                    .col(ColumnDef::new(EmbedApplications::Height).string())
                    .col(ColumnDef::new(EmbedApplications::Scale).integer())
                    .col(ColumnDef::new(EmbedApplications::AgeRangesRange).string())
                    .col(ColumnDef::new(EmbedApplications::DomainsText).string())
                    .col(
                        ColumnDef::new(EmbedApplications::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(EmbedApplications::LastUpdate)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("embed_applications_owner_id_fkey")
                            .from(EmbedApplications::Table, EmbedApplications::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EmbedApplications::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum EmbedApplications {
    Table,
    Identifier,     // STRING PRIMARY KEY,
    OwnerId,        // STRING NOT NULL,
    Name,           // STRING NOT NULL,
    Url,            // STRING NOT NULL,
    Description,    // TEXT NULL,
    Height,         // STRING NULL (CSS height),
    Scale,          // INTEGER NULL (percentage),
    AgeRangesRange, // STRING NULL,
    DomainsText,    // STRING NULL (comma separated),
    CreatedAt,      // TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    LastUpdate,     // TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                    // FOREIGN KEY(owner_id) REFERENCES users(id)
}
