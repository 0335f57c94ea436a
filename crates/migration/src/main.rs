use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    if let Ok(url) = std::env::var("FIELDSERVE_DATABASE_URL") {
        std::env::set_var("DATABASE_URL", url);
    }
    cli::run_cli(migration::Migrator).await;
}
