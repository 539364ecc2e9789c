#[forbid(unsafe_code)]
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    cli::run_cli(labfed_database_migration::Migrator).await;
}
