//! # Fieldserve API Server
//!
//! Axum-based HTTP API server for the fieldserve service-management backend.
//!
//! ## Modules
//!
//! - [`dto`]: Request/response data transfer objects
//! - [`handlers`]: Per-resource request handlers
//! - [`jobs`]: Batch jobs run from the CLI (open-points reminders)
//! - [`middleware`]: HTTP middleware (bearer authentication)
//! - [`notify`]: Notification dispatcher and push client
//! - [`router`]: API route configuration

pub mod dto;
pub mod handlers;
pub mod jobs;
pub mod middleware;
pub mod notify;
pub mod router;
pub mod settings;
pub mod warranty;

pub use router::create_app_router;

/// Application state shared across request handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db:   sea_orm::DbConn,
    /// Best-effort push sender (no-op when unconfigured)
    pub push: notify::push::PushClient,
}
