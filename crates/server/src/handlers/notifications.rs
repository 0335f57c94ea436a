//! # Notification Handlers
//!
//! The caller's in-app inbox, plus admin retention and custom send. Read
//! and delete are scoped to the owner via bulk-update filters: touching a
//! foreign notification affects zero rows and still succeeds.

use auth::{policy, Action, NotificationAction};
use axum::{
    extract::{Path, Query, State},
    Extension,
    Json,
};
use chrono::{Duration, Utc};
use entity::{
    notifications::{self, NotificationType},
    users::Role,
};
use error::{AppError, Result};
use sea_orm::{
    sea_query::Expr,
    ColumnTrait,
    EntityTrait,
    PaginatorTrait,
    QueryFilter,
    QueryOrder,
    QuerySelect,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        notifications::{
            AffectedResponse,
            NotificationListQuery,
            NotificationListResponse,
            NotificationResponse,
            NotificationStatisticsResponse,
            PurgeQuery,
            SendNotificationRequest,
            TypeCount,
            UnreadCountResponse,
        },
        PaginationInfo,
    },
    middleware::auth::AuthenticatedUser,
    notify::dispatcher::{self, NotificationInput},
    AppState,
};

fn parse_kind(value: &str) -> Result<NotificationType> {
    NotificationType::from_string(value).ok_or_else(|| {
        AppError::validation(format!(
            "Invalid type '{}', expected one of: {}",
            value,
            NotificationType::VALID_VALUES.join(", ")
        ))
    })
}

/// List the caller's notifications, newest first, with the unread count.
pub async fn list_notifications_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<NotificationListQuery>,
) -> Result<Json<NotificationListResponse>> {
    let mut select = notifications::Entity::find().filter(notifications::Column::UserId.eq(user.id));

    if let Some(is_read) = query.is_read {
        select = select.filter(notifications::Column::IsRead.eq(is_read));
    }
    if let Some(kind) = &query.kind {
        select = select.filter(notifications::Column::Type.eq(parse_kind(kind)?));
    }

    let total = select.clone().count(&state.db).await?;
    let page = query.page();
    let per_page = query.per_page();

    let rows = select
        .order_by_desc(notifications::Column::CreatedAt)
        .offset((page - 1) * per_page)
        .limit(per_page)
        .all(&state.db)
        .await?;

    let unread_count = notifications::Entity::find()
        .filter(notifications::Column::UserId.eq(user.id))
        .filter(notifications::Column::IsRead.eq(false))
        .count(&state.db)
        .await?;

    Ok(Json(NotificationListResponse {
        notifications: rows.into_iter().map(Into::into).collect(),
        unread_count,
        pagination: PaginationInfo::new(page, per_page, total),
    }))
}

/// Unread count only, for badge polling.
pub async fn unread_count_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<UnreadCountResponse>> {
    let unread = notifications::Entity::find()
        .filter(notifications::Column::UserId.eq(user.id))
        .filter(notifications::Column::IsRead.eq(false))
        .count(&state.db)
        .await?;

    Ok(Json(UnreadCountResponse {
        unread,
    }))
}

/// Fetch one of the caller's notifications.
pub async fn get_notification_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<NotificationResponse>> {
    let notification = notifications::Entity::find_by_id(id)
        .filter(notifications::Column::UserId.eq(user.id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Notification not found"))?;

    Ok(Json(notification.into()))
}

/// Mark one notification read. Scoped to the caller: a foreign id affects
/// zero rows and is still a success.
pub async fn mark_read_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<AffectedResponse>> {
    let result = notifications::Entity::update_many()
        .col_expr(notifications::Column::IsRead, Expr::value(true))
        .filter(notifications::Column::Id.eq(id))
        .filter(notifications::Column::UserId.eq(user.id))
        .exec(&state.db)
        .await?;

    Ok(Json(AffectedResponse {
        affected: result.rows_affected,
    }))
}

/// Mark all of the caller's unread notifications read.
pub async fn mark_all_read_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<AffectedResponse>> {
    let result = notifications::Entity::update_many()
        .col_expr(notifications::Column::IsRead, Expr::value(true))
        .filter(notifications::Column::UserId.eq(user.id))
        .filter(notifications::Column::IsRead.eq(false))
        .exec(&state.db)
        .await?;

    Ok(Json(AffectedResponse {
        affected: result.rows_affected,
    }))
}

/// Delete one of the caller's notifications.
pub async fn delete_notification_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<AffectedResponse>> {
    let result = notifications::Entity::delete_many()
        .filter(notifications::Column::Id.eq(id))
        .filter(notifications::Column::UserId.eq(user.id))
        .exec(&state.db)
        .await?;

    Ok(Json(AffectedResponse {
        affected: result.rows_affected,
    }))
}

/// Delete all of the caller's notifications.
pub async fn clear_all_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<AffectedResponse>> {
    let result = notifications::Entity::delete_many()
        .filter(notifications::Column::UserId.eq(user.id))
        .exec(&state.db)
        .await?;

    info!(user_id = %user.id, deleted = result.rows_affected, "notifications cleared");

    Ok(Json(AffectedResponse {
        affected: result.rows_affected,
    }))
}

/// Send a custom notification to a role audience or explicit users.
pub async fn send_notification_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<SendNotificationRequest>,
) -> Result<Json<AffectedResponse>> {
    policy::require(user.role, Action::Notifications(NotificationAction::Send))?;
    req.validate()?;

    let kind = match &req.kind {
        Some(value) => parse_kind(value)?,
        None => NotificationType::Info,
    };

    let mut input = NotificationInput::new(req.title.clone(), req.message.clone(), kind);
    if let Some(service_record_id) = req.service_record_id {
        input = input.for_record(service_record_id);
    }

    let delivered = match (&req.roles, &req.user_ids) {
        (Some(roles), None) => {
            let roles: Vec<Role> = roles
                .iter()
                .map(|value| {
                    Role::from_string(value)
                        .ok_or_else(|| AppError::validation(format!("Invalid role '{}'", value)))
                })
                .collect::<Result<_>>()?;
            dispatcher::notify_by_role(&state.db, &state.push, &roles, &input).await?.len()
        },
        (None, Some(user_ids)) => {
            let mut count = 0;
            for user_id in user_ids {
                dispatcher::notify_user(&state.db, &state.push, *user_id, &input).await?;
                count += 1;
            }
            count
        },
        _ => {
            return Err(AppError::validation(
                "Provide exactly one of 'roles' or 'user_ids'",
            ));
        },
    };

    info!(sender = %user.id, delivered, title = %req.title, "custom notification sent");

    Ok(Json(AffectedResponse {
        affected: delivered as u64,
    }))
}

/// Purge old notifications (admin retention). Read-only by default.
pub async fn purge_notifications_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<PurgeQuery>,
) -> Result<Json<AffectedResponse>> {
    policy::require(user.role, Action::Notifications(NotificationAction::Purge))?;

    let cutoff = Utc::now() - Duration::days(query.older_than_days());
    let mut delete = notifications::Entity::delete_many().filter(notifications::Column::CreatedAt.lt(cutoff));
    if !query.include_unread() {
        delete = delete.filter(notifications::Column::IsRead.eq(true));
    }

    let result = delete.exec(&state.db).await?;

    info!(
        purged = result.rows_affected,
        older_than_days = query.older_than_days(),
        "old notifications purged"
    );

    Ok(Json(AffectedResponse {
        affected: result.rows_affected,
    }))
}

/// Notification statistics (admin).
pub async fn notification_statistics_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<NotificationStatisticsResponse>> {
    policy::require(user.role, Action::Notifications(NotificationAction::Stats))?;

    let total = notifications::Entity::find().count(&state.db).await?;
    let unread = notifications::Entity::find()
        .filter(notifications::Column::IsRead.eq(false))
        .count(&state.db)
        .await?;

    let mut by_type = Vec::with_capacity(NotificationType::VALID_VALUES.len());
    for value in NotificationType::VALID_VALUES {
        let kind = parse_kind(value)?;
        let count = notifications::Entity::find()
            .filter(notifications::Column::Type.eq(kind))
            .count(&state.db)
            .await?;
        by_type.push(TypeCount {
            kind: (*value).to_string(),
            count,
        });
    }

    Ok(Json(NotificationStatisticsResponse {
        total,
        unread,
        by_type,
    }))
}
