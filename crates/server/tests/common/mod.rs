//! # Common Test Utilities
//!
//! Shared infrastructure for integration tests: an in-memory SQLite
//! database with migrations applied, application state with push delivery
//! disabled, and row fixtures for the core entities.

#![allow(dead_code)]

use std::sync::Once;

use chrono::Utc;
use entity::{customers, machines, points, service_records, users};
use migration::MigratorTrait as _;
use sea_orm::{ActiveModelTrait, DbConn, Set};
use server::{middleware::auth::AuthenticatedUser, notify::push::PushClient, AppState};
use uuid::Uuid;

/// Initialize test logging (run once per test session)
static INIT: Once = Once::new();

/// Initialize test environment including structured logging
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// Plaintext password used by all user fixtures.
pub const TEST_PASSWORD: &str = "TestPassword123!";

/// Create a fresh in-memory database with all migrations applied.
pub async fn setup_test_db() -> DbConn {
    let db = migration::connect_to_database("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// Create application state backed by a fresh database; push is disabled.
pub async fn test_state() -> AppState {
    init_test_env();
    AppState {
        db:   setup_test_db().await,
        push: PushClient::disabled(),
    }
}

/// Get a unique suffix for this test run
pub fn unique_suffix() -> String { Uuid::new_v4().simple().to_string()[.. 8].to_string() }

/// Insert a user with the given role; the email is made unique per call.
pub async fn create_user(db: &DbConn, role: users::Role, email_prefix: &str) -> users::Model {
    let id = Uuid::new_v4();
    let hash = auth::password::hash_password(TEST_PASSWORD).expect("Failed to hash password");

    users::ActiveModel {
        id: Set(id),
        uid: Set(users::make_uid(id)),
        name: Set(format!("{} user", email_prefix)),
        email: Set(format!("{}.{}@test.com", email_prefix, unique_suffix())),
        phone: Set("+15550100".to_string()),
        role: Set(role),
        is_active: Set(true),
        password_hash: Set(Some(hash)),
        push_token: Set(None),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("Failed to insert test user")
}

/// Build the request extension the auth middleware would have produced.
pub fn authed(user: &users::Model) -> AuthenticatedUser {
    AuthenticatedUser {
        id:   user.id,
        uid:  user.uid.clone(),
        name: user.name.clone(),
        role: user.role,
    }
}

/// Insert a customer fixture.
pub async fn create_customer(db: &DbConn, name: &str) -> customers::Model {
    let id = Uuid::new_v4();
    customers::ActiveModel {
        id: Set(id),
        uid: Set(customers::make_uid(id)),
        name: Set(name.to_string()),
        phone: Set("+15550200".to_string()),
        email: Set(None),
        address: Set(None),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("Failed to insert test customer")
}

/// Insert a machine fixture with a 12-month warranty.
pub async fn create_machine(db: &DbConn, name: &str) -> machines::Model {
    machines::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        category: Set("Compressor".to_string()),
        brand: Set("Acme".to_string()),
        warranty_time_in_months: Set(12),
        serial_number: Set(Some(format!("SN-{}", unique_suffix()))),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("Failed to insert test machine")
}

/// Insert a service record linking the given customer and machine.
pub async fn create_service_record(
    db: &DbConn,
    customer: &customers::Model,
    machine: &machines::Model,
    created_by: &users::Model,
) -> service_records::Model {
    let purchase_date = Utc::now();
    service_records::ActiveModel {
        id: Set(Uuid::new_v4()),
        customer_id: Set(customer.id),
        machine_id: Set(machine.id),
        created_by_id: Set(created_by.id),
        purchase_date: Set(purchase_date),
        warranty_expires_at: Set(server::warranty::warranty_expiry(
            purchase_date,
            machine.warranty_time_in_months,
        )),
        pending_amount: Set(0.0),
        status: Set(service_records::ServiceStatus::Active),
        kpis: Set(serde_json::json!({})),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("Failed to insert test service record")
}

/// Insert a point on the given service record.
pub async fn create_point(
    db: &DbConn,
    record: &service_records::Model,
    created_by: &users::Model,
    title: &str,
) -> points::Model {
    points::ActiveModel {
        id: Set(Uuid::new_v4()),
        service_record_id: Set(record.id),
        title: Set(title.to_string()),
        description: Set(None),
        status: Set(points::PointStatus::Created),
        priority: Set(points::PointPriority::Medium),
        assigned_to_id: Set(None),
        created_by_id: Set(created_by.id),
        due_date: Set(None),
        completed_at: Set(None),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("Failed to insert test point")
}
