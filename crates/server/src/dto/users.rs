//! # User Data Transfer Objects
//!
//! Request and response types for user and authentication endpoints.

use chrono::{DateTime, Utc};
use entity::users;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::PaginationInfo;

/// Login request
#[derive(Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct LoginRequest {
    /// Account email
    #[validate(email(message = "Invalid email format"))]
    pub email:    String,
    /// Account password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response; the token is presented as `Authorization: Bearer <token>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests
    pub token: String,
    /// The authenticated user
    pub user:  UserResponse,
}

/// User representation returned by the API (never includes the password hash)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResponse {
    pub id:         Uuid,
    /// Human-readable user code (`USR-xxxxxxxx`)
    pub uid:        String,
    pub name:       String,
    pub email:      String,
    pub phone:      String,
    pub role:       String,
    pub is_active:  bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<users::Model> for UserResponse {
    fn from(user: users::Model) -> Self {
        Self {
            id:         user.id,
            uid:        user.uid,
            name:       user.name,
            email:      user.email,
            phone:      user.phone,
            role:       user.role.to_string(),
            is_active:  user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Request to create a new user (admin operation)
#[derive(Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Full name (required)
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name:     String,
    /// Account email, unique
    #[validate(email(message = "Invalid email format"))]
    pub email:    String,
    /// Contact phone (required)
    #[validate(length(min = 1, max = 32, message = "Phone must be between 1 and 32 characters"))]
    pub phone:    String,
    /// Role wire value (ADMIN, SERVICE_HEAD, ENGINEER, SALES, COMMERCIAL)
    pub role:     String,
    /// Initial password
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Request to update a user. Role and active-flag changes are admin-only.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name:      Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email:     Option<String>,
    #[validate(length(min = 1, max = 32, message = "Phone must be between 1 and 32 characters"))]
    pub phone:     Option<String>,
    /// New role wire value
    pub role:      Option<String>,
    /// Activate or deactivate the account
    pub is_active: Option<bool>,
}

/// Request to change the caller's own password
#[derive(Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password:     String,
}

/// Request to register or clear the caller's push token
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdatePushTokenRequest {
    /// New device token; `null` clears it
    pub push_token: Option<String>,
}

/// Query parameters for the user list
#[derive(Debug, Clone, Deserialize)]
pub struct UserListQuery {
    /// Page number (1-based, default: 1)
    pub page:             Option<u64>,
    /// Items per page (default: 20, max: 100)
    pub per_page:         Option<u64>,
    /// Filter by role wire value
    pub role:             Option<String>,
    /// Include deactivated accounts (default: false)
    pub include_inactive: Option<bool>,
    /// Search term for name/email/uid
    pub search:           Option<String>,
}

impl UserListQuery {
    /// Get page number (1-based, default: 1)
    pub fn page(&self) -> u64 { self.page.unwrap_or(1).max(1) }

    /// Get items per page (default: 20, max: 100)
    pub fn per_page(&self) -> u64 { self.per_page.unwrap_or(20).clamp(1, 100) }
}

/// Response for the user list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserListResponse {
    pub users:      Vec<UserResponse>,
    pub pagination: PaginationInfo,
}

/// Role-specific dashboard counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardResponse {
    /// The caller's role, naming which metric set was computed
    pub role:    String,
    /// Named counts for the role's dashboard
    pub metrics: serde_json::Value,
}
