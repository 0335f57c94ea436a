//! # Request Handlers
//!
//! Per-resource HTTP request handlers. Role gates come from the `auth`
//! policy table; ownership checks (creator, assignee, owner) live inline
//! next to the gate they relax.

pub mod customers;
pub mod machines;
pub mod notifications;
pub mod points;
pub mod quotations;
pub mod reports;
pub mod service_records;
pub mod users;

use axum::Json;
use serde_json::json;

/// Liveness probe
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "fieldserve",
    }))
}
