use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Lms::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Lms::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Lms::Name).string().not_null())
                    .col(ColumnDef::new(Lms::Url).string().not_null())
                    .col(
                        ColumnDef::new(Lms::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Lms::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Lms {
    Table,
    Id,        // STRING PRIMARY KEY,
    Name,      // STRING NOT NULL,
    Url,       // STRING NOT NULL,
    CreatedAt, // TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
}
