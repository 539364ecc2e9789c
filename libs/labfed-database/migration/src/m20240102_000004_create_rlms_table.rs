use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Rlms::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Rlms::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Rlms::Kind).string().not_null())
                    .col(ColumnDef::new(Rlms::Location).string().not_null())
                    .col(ColumnDef::new(Rlms::Url).string().not_null())
                    .col(ColumnDef::new(Rlms::Version).string().not_null())
                    .col(ColumnDef::new(Rlms::Configuration).text())
                    .col(
                        ColumnDef::new(Rlms::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Rlms::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Rlms {
    Table,
    Id,            // STRING PRIMARY KEY,
    Kind,          // STRING NOT NULL (e.g. "WebLab-Deusto"),
    Location,      // STRING NOT NULL,
    Url,           // STRING NOT NULL,
    Version,       // STRING NOT NULL,
    Configuration, // TEXT NULL (JSON blob),
    CreatedAt,     // TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
}
