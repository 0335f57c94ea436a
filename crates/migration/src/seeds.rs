//! # Seeds
//!
//! Bootstrap data inserted after migrations: a single admin account so a
//! fresh deployment can log in and create the rest of the staff.

use chrono::Utc;
use entity::users::{self, Role};
use error::{AppError, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set};
use uuid::Uuid;

/// Insert the bootstrap admin account if no admin exists yet.
///
/// Credentials come from `FIELDSERVE_ADMIN_EMAIL` and
/// `FIELDSERVE_ADMIN_PASSWORD` (defaults: `admin@fieldserve.local` /
/// `change-me`). Returns `true` when a row was inserted.
pub async fn seed_bootstrap_admin(db: &DatabaseConnection) -> Result<bool> {
    let existing = users::Entity::find()
        .filter(users::Column::Role.eq(Role::Admin))
        .count(db)
        .await
        .map_err(AppError::from)?;

    if existing > 0 {
        tracing::debug!(count = existing, "admin account already present, skipping seed");
        return Ok(false);
    }

    let email =
        std::env::var("FIELDSERVE_ADMIN_EMAIL").unwrap_or_else(|_| "admin@fieldserve.local".to_string());
    let password = std::env::var("FIELDSERVE_ADMIN_PASSWORD").unwrap_or_else(|_| "change-me".to_string());

    let id = Uuid::new_v4();
    let now = Utc::now();
    let admin = users::ActiveModel {
        id:            Set(id),
        uid:           Set(users::make_uid(id)),
        name:          Set("Administrator".to_string()),
        email:         Set(email.clone()),
        phone:         Set(String::new()),
        role:          Set(Role::Admin),
        is_active:     Set(true),
        password_hash: Set(Some(auth::hash_password(&password)?)),
        push_token:    Set(None),
        created_at:    Set(now),
        updated_at:    Set(now),
    };
    admin.insert(db).await.map_err(AppError::from)?;

    tracing::info!(%email, "bootstrap admin created");
    Ok(true)
}
