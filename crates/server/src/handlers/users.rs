//! # User Handlers
//!
//! Authentication and user management. The bearer token issued at login is
//! the user's row id; logout is client-side token disposal (nothing to
//! revoke server-side), kept as an endpoint for API symmetry.

use auth::{policy, Action, UserAction};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension,
    Json,
};
use chrono::Utc;
use entity::users::{self, Role};
use error::{AppError, Result};
use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    Condition,
    EntityTrait,
    PaginatorTrait,
    QueryFilter,
    QueryOrder,
    QuerySelect,
    Set,
};
use serde_json::json;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        users::{
            ChangePasswordRequest,
            CreateUserRequest,
            DashboardResponse,
            LoginRequest,
            LoginResponse,
            UpdatePushTokenRequest,
            UpdateUserRequest,
            UserListQuery,
            UserListResponse,
            UserResponse,
        },
        PaginationInfo,
    },
    middleware::auth::AuthenticatedUser,
    AppState,
};

/// Authenticate with email and password.
///
/// Every failure mode (unknown email, missing hash, wrong password,
/// deactivated account) returns the same 401 to avoid account probing.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    req.validate()?;

    let user = users::Entity::find()
        .filter(users::Column::Email.eq(req.email.as_str()))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

    if !user.is_active {
        return Err(AppError::unauthorized("Invalid credentials"));
    }

    let hash = user
        .password_hash
        .as_deref()
        .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

    if !auth::verify_password(&req.password, hash)? {
        return Err(AppError::unauthorized("Invalid credentials"));
    }

    info!(user_id = %user.id, "user logged in");

    Ok(Json(LoginResponse {
        token: user.id.to_string(),
        user:  user.into(),
    }))
}

/// Logout. The token is the user id, so there is no server-side session to
/// destroy; the endpoint exists so clients have a uniform call to make.
pub async fn logout_handler(Extension(user): Extension<AuthenticatedUser>) -> Json<serde_json::Value> {
    info!(user_id = %user.id, "user logged out");
    Json(json!({ "message": "Logged out" }))
}

/// Fetch the caller's own account.
pub async fn me_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<UserResponse>> {
    let db_user = users::Entity::find_by_id(user.id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(db_user.into()))
}

/// Change the caller's own password.
pub async fn change_password_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<serde_json::Value>> {
    req.validate()?;

    let db_user = users::Entity::find_by_id(user.id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    let hash = db_user
        .password_hash
        .as_deref()
        .ok_or_else(|| AppError::unauthorized("Current password is incorrect"))?;

    if !auth::verify_password(&req.current_password, hash)? {
        return Err(AppError::unauthorized("Current password is incorrect"));
    }

    let new_hash = auth::hash_password(&req.new_password)?;

    let mut active: users::ActiveModel = db_user.into();
    active.password_hash = Set(Some(new_hash));
    active.updated_at = Set(Utc::now());
    active.update(&state.db).await?;

    info!(user_id = %user.id, "password changed");

    Ok(Json(json!({ "message": "Password updated" })))
}

/// Register or clear the caller's push token.
pub async fn update_push_token_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<UpdatePushTokenRequest>,
) -> Result<Json<UserResponse>> {
    let db_user = users::Entity::find_by_id(user.id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    let mut active: users::ActiveModel = db_user.into();
    active.push_token = Set(req.push_token);
    active.updated_at = Set(Utc::now());
    let updated = active.update(&state.db).await?;

    Ok(Json(updated.into()))
}

/// Role-specific dashboard counts for the caller.
pub async fn dashboard_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<DashboardResponse>> {
    use entity::{customers, points, service_records, spares_quotations};

    let db = &state.db;
    let now = Utc::now();
    let open_filter = points::Column::Status.is_in(entity::points::PointStatus::open_statuses());

    let metrics = match user.role {
        Role::Admin => {
            json!({
                "total_users": users::Entity::find().count(db).await?,
                "total_customers": customers::Entity::find().count(db).await?,
                "total_machines": entity::machines::Entity::find().count(db).await?,
                "total_service_records": service_records::Entity::find().count(db).await?,
                "open_points": points::Entity::find().filter(open_filter).count(db).await?,
            })
        },
        Role::ServiceHead => {
            json!({
                "open_points": points::Entity::find().filter(open_filter.clone()).count(db).await?,
                "unassigned_points": points::Entity::find()
                    .filter(open_filter.clone())
                    .filter(points::Column::AssignedToId.is_null())
                    .count(db)
                    .await?,
                "overdue_points": points::Entity::find()
                    .filter(open_filter)
                    .filter(points::Column::DueDate.lt(now))
                    .count(db)
                    .await?,
                "active_service_records": service_records::Entity::find()
                    .filter(service_records::Column::Status.eq(entity::service_records::ServiceStatus::Active))
                    .count(db)
                    .await?,
            })
        },
        Role::Engineer => {
            json!({
                "my_open_points": points::Entity::find()
                    .filter(open_filter.clone())
                    .filter(points::Column::AssignedToId.eq(user.id))
                    .count(db)
                    .await?,
                "my_overdue_points": points::Entity::find()
                    .filter(open_filter)
                    .filter(points::Column::AssignedToId.eq(user.id))
                    .filter(points::Column::DueDate.lt(now))
                    .count(db)
                    .await?,
                "my_reports": entity::reports::Entity::find()
                    .filter(entity::reports::Column::EngineerId.eq(user.id))
                    .count(db)
                    .await?,
            })
        },
        Role::Sales | Role::Commercial => {
            let pending_records = service_records::Entity::find()
                .filter(service_records::Column::PendingAmount.gt(0.0))
                .all(db)
                .await?;
            let total_pending: f64 = pending_records.iter().map(|r| r.pending_amount).sum();
            json!({
                "total_customers": customers::Entity::find().count(db).await?,
                "pending_quotations": spares_quotations::Entity::find()
                    .filter(
                        spares_quotations::Column::Status
                            .eq(entity::spares_quotations::QuotationStatus::Pending),
                    )
                    .count(db)
                    .await?,
                "records_with_pending_amount": pending_records.len(),
                "total_pending_amount": total_pending,
                "expiring_warranties": service_records::Entity::find()
                    .filter(service_records::Column::WarrantyExpiresAt.gt(now))
                    .filter(service_records::Column::WarrantyExpiresAt.lt(now + chrono::Duration::days(30)))
                    .count(db)
                    .await?,
            })
        },
    };

    Ok(Json(DashboardResponse {
        role: user.role.to_string(),
        metrics,
    }))
}

/// Create a user (admin operation).
pub async fn create_user_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    policy::require(user.role, Action::Users(UserAction::Create))?;
    req.validate()?;

    let role = Role::from_string(&req.role).ok_or_else(|| {
        AppError::validation(format!(
            "Invalid role '{}', expected one of: {}",
            req.role,
            Role::VALID_VALUES.join(", ")
        ))
    })?;

    let existing = users::Entity::find()
        .filter(users::Column::Email.eq(req.email.as_str()))
        .count(&state.db)
        .await?;
    if existing > 0 {
        return Err(AppError::conflict("A user with this email already exists"));
    }

    let id = Uuid::new_v4();
    let now = Utc::now();
    let created = users::ActiveModel {
        id:            Set(id),
        uid:           Set(users::make_uid(id)),
        name:          Set(req.name),
        email:         Set(req.email),
        phone:         Set(req.phone),
        role:          Set(role),
        is_active:     Set(true),
        password_hash: Set(Some(auth::hash_password(&req.password)?)),
        push_token:    Set(None),
        created_at:    Set(now),
        updated_at:    Set(now),
    }
    .insert(&state.db)
    .await?;

    info!(user_id = %created.id, uid = %created.uid, role = %created.role, "user created");

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// List users, active by default.
pub async fn list_users_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<UserListResponse>> {
    policy::require(user.role, Action::Users(UserAction::List))?;

    let mut select = users::Entity::find();

    if !query.include_inactive.unwrap_or(false) {
        select = select.filter(users::Column::IsActive.eq(true));
    }
    if let Some(role) = &query.role {
        let role = Role::from_string(role)
            .ok_or_else(|| AppError::validation(format!("Invalid role '{}'", role)))?;
        select = select.filter(users::Column::Role.eq(role));
    }
    if let Some(search) = &query.search {
        let pattern = format!("%{}%", search);
        select = select.filter(
            Condition::any()
                .add(users::Column::Name.like(pattern.clone()))
                .add(users::Column::Email.like(pattern.clone()))
                .add(users::Column::Uid.like(pattern)),
        );
    }

    let total = select.clone().count(&state.db).await?;
    let page = query.page();
    let per_page = query.per_page();

    let rows = select
        .order_by_asc(users::Column::Name)
        .offset((page - 1) * per_page)
        .limit(per_page)
        .all(&state.db)
        .await?;

    Ok(Json(UserListResponse {
        users:      rows.into_iter().map(Into::into).collect(),
        pagination: PaginationInfo::new(page, per_page, total),
    }))
}

/// Fetch a user by id.
pub async fn get_user_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>> {
    let db_user = users::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(db_user.into()))
}

/// Update a user. Admin may update anyone; everyone else only themselves,
/// and only admin may change role or active state.
pub async fn update_user_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>> {
    req.validate()?;

    let is_admin = user.role == Role::Admin;
    if !is_admin && user.id != id {
        return Err(AppError::forbidden("You may only update your own account"));
    }
    if !is_admin && (req.role.is_some() || req.is_active.is_some()) {
        return Err(AppError::forbidden("Only an admin may change role or active state"));
    }

    let db_user = users::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    if let Some(email) = &req.email {
        if email != &db_user.email {
            let taken = users::Entity::find()
                .filter(users::Column::Email.eq(email.as_str()))
                .filter(users::Column::Id.ne(id))
                .count(&state.db)
                .await?;
            if taken > 0 {
                return Err(AppError::conflict("A user with this email already exists"));
            }
        }
    }

    let mut active: users::ActiveModel = db_user.into();
    if let Some(name) = req.name {
        active.name = Set(name);
    }
    if let Some(email) = req.email {
        active.email = Set(email);
    }
    if let Some(phone) = req.phone {
        active.phone = Set(phone);
    }
    if let Some(role) = req.role {
        let role = Role::from_string(&role)
            .ok_or_else(|| AppError::validation(format!("Invalid role '{}'", role)))?;
        active.role = Set(role);
    }
    if let Some(is_active) = req.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(&state.db).await?;

    info!(user_id = %updated.id, "user updated");

    Ok(Json(updated.into()))
}

/// Soft-delete (deactivate) a user. Users are never hard-deleted; rows they
/// created stay attributable.
pub async fn delete_user_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    policy::require(user.role, Action::Users(UserAction::Delete))?;

    if user.id == id {
        return Err(AppError::invalid_state("Cannot deactivate your own account"));
    }

    let db_user = users::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    let mut active: users::ActiveModel = db_user.into();
    active.is_active = Set(false);
    active.updated_at = Set(Utc::now());
    active.update(&state.db).await?;

    info!(user_id = %id, "user deactivated");

    Ok(Json(json!({ "message": "User deactivated" })))
}
