//! # CLI Migration Command

use error::Result;
use migration::MigratorTrait as _;
use tracing::info;

use crate::commands::MigrateArgs;

/// Runs database migrations against the configured database.
pub async fn migrate(args: MigrateArgs) -> Result<()> {
    info!(
        target: "migrate",
        dry_run = %args.dry_run,
        rollback = %args.rollback,
        seed = %args.seed,
        "Running database migrations"
    );

    let db = migration::db::connect_from_env().await?;

    if args.dry_run {
        let pending = migration::Migrator::get_pending_migrations(&db)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to get pending migrations: {}", e))?;

        info!(target: "migrate", pending_count = %pending.len(), "Pending migrations");
        for m in &pending {
            info!(target: "migrate", migration = %m.name(), "Would apply");
        }
        return Ok(());
    }

    if args.rollback {
        migration::Migrator::down(&db, None)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to rollback migration: {}", e))?;

        info!(target: "migrate", "Rollback completed");
        return Ok(());
    }

    migration::Migrator::up(&db, None)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;

    info!(target: "migrate", "Migrations completed");

    if args.seed {
        let created = migration::seeds::seed_bootstrap_admin(&db).await?;
        info!(target: "migrate", created, "Bootstrap admin seed completed");
    }

    Ok(())
}
