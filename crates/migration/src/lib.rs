//! # Fieldserve Migrations
//!
//! Schema migrations and database connection helpers. One migration per
//! table, applied in dependency order, plus a bootstrap-admin seed.

pub use sea_orm_migration::prelude::*;

pub mod db;
pub mod seeds;

mod m20260810_000001_create_users_table;
mod m20260810_000002_create_customers_table;
mod m20260810_000003_create_machines_table;
mod m20260810_000004_create_service_records_table;
mod m20260810_000005_create_reports_table;
mod m20260810_000006_create_points_table;
mod m20260810_000007_create_notifications_table;
mod m20260810_000008_create_spares_quotations_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260810_000001_create_users_table::Migration),
            Box::new(m20260810_000002_create_customers_table::Migration),
            Box::new(m20260810_000003_create_machines_table::Migration),
            Box::new(m20260810_000004_create_service_records_table::Migration),
            Box::new(m20260810_000005_create_reports_table::Migration),
            Box::new(m20260810_000006_create_points_table::Migration),
            Box::new(m20260810_000007_create_notifications_table::Migration),
            Box::new(m20260810_000008_create_spares_quotations_table::Migration),
        ]
    }
}

/// Database connection helper for CLI usage
pub async fn connect_to_database(database_url: &str) -> Result<sea_orm::DatabaseConnection, sea_orm::DbErr> {
    sea_orm::Database::connect(database_url).await
}
