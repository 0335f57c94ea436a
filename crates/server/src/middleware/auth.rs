//! # Authentication Middleware
//!
//! Bearer authentication for protecting API endpoints. The bearer token is
//! the user's row id, issued at login; the middleware resolves it to an
//! account on every request so deactivation takes effect immediately.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use entity::users::{self, Role};
use sea_orm::EntityTrait;
use serde_json::json;
use uuid::Uuid;

use crate::AppState;

/// User information resolved from the bearer token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// User ID
    pub id:   Uuid,
    /// Human-readable user code
    pub uid:  String,
    /// Display name
    pub name: String,
    /// Role, used by handler-level policy checks
    pub role: Role,
}

/// Authentication middleware
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Resolves it to an active user account
/// 3. Adds the authenticated user to request extensions
/// 4. Rejects requests with missing/unknown tokens or inactive accounts
pub async fn auth_middleware(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let auth_header = match request.headers().get(header::AUTHORIZATION) {
        Some(header) => {
            match header.to_str() {
                Ok(h) => h,
                Err(_) => {
                    return create_auth_error_response("Invalid authorization header encoding");
                },
            }
        },
        None => {
            return create_auth_error_response("Missing authorization header");
        },
    };

    let token = match extract_bearer_token(auth_header) {
        Some(token) => token,
        None => {
            return create_auth_error_response("Invalid authorization header format");
        },
    };

    let user_id = match Uuid::parse_str(&token) {
        Ok(id) => id,
        Err(_) => {
            return create_auth_error_response("Invalid token");
        },
    };

    let db_user = match users::Entity::find_by_id(user_id).one(&state.db).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return create_auth_error_response("Invalid token");
        },
        Err(e) => {
            tracing::error!(error = %e, "failed to resolve bearer token");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(json!({
                    "status": "error",
                    "code": "INTERNAL_ERROR",
                    "message": "Internal server error"
                })),
            )
                .into_response();
        },
    };

    if !db_user.is_active {
        return create_auth_error_response("Account is deactivated");
    }

    let user = AuthenticatedUser {
        id:   db_user.id,
        uid:  db_user.uid,
        name: db_user.name,
        role: db_user.role,
    };

    request.extensions_mut().insert(user);

    next.run(request).await
}

/// Extract the token from a `Bearer <token>` authorization header.
pub fn extract_bearer_token(header: &str) -> Option<String> {
    let rest = header.strip_prefix("Bearer ")?;
    let token = rest.trim();
    if token.is_empty() {
        None
    }
    else {
        Some(token.to_string())
    }
}

/// Create standardized authentication error response
fn create_auth_error_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Bearer")],
        axum::Json(json!({
            "status": "error",
            "code": "UNAUTHORIZED",
            "message": message
        })),
    )
        .into_response()
}
