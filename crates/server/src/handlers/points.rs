//! # Point Handlers
//!
//! Follow-up action items on service records. Assignment changes notify the
//! new assignee; marking a point COMPLETED stamps `completed_at` (and
//! re-completing restamps it). The manual escalation check finds stale open
//! points and alerts the service heads.

use auth::{policy, Action, PointAction};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension,
    Json,
};
use chrono::{Duration, Utc};
use entity::{
    notifications::NotificationType,
    points::{self, PointPriority, PointStatus},
    service_records,
    users,
};
use error::{traits::ok_or_log, AppError, Result};
use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
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
        points::{
            CreatePointRequest,
            EscalationQuery,
            EscalationResponse,
            MyPointsQuery,
            PointListQuery,
            PointListResponse,
            PointResponse,
            PointStatisticsResponse,
            PointsByRecordResponse,
            StatusCount,
            UpdatePointRequest,
        },
        PaginationInfo,
    },
    middleware::auth::AuthenticatedUser,
    notify::dispatcher::{self, NotificationInput},
    AppState,
};

fn parse_status(value: &str) -> Result<PointStatus> {
    PointStatus::from_string(value).ok_or_else(|| {
        AppError::validation(format!(
            "Invalid status '{}', expected one of: {}",
            value,
            PointStatus::VALID_VALUES.join(", ")
        ))
    })
}

fn parse_priority(value: &str) -> Result<PointPriority> {
    PointPriority::from_string(value).ok_or_else(|| {
        AppError::validation(format!(
            "Invalid priority '{}', expected one of: {}",
            value,
            PointPriority::VALID_VALUES.join(", ")
        ))
    })
}

/// Create a point.
pub async fn create_point_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<CreatePointRequest>,
) -> Result<(StatusCode, Json<PointResponse>)> {
    policy::require(user.role, Action::Points(PointAction::Create))?;
    req.validate()?;

    service_records::Entity::find_by_id(req.service_record_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Service record not found"))?;

    if let Some(assignee_id) = req.assigned_to_id {
        users::Entity::find_by_id(assignee_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::not_found("Assignee not found"))?;
    }

    let priority = match &req.priority {
        Some(value) => parse_priority(value)?,
        None => PointPriority::Medium,
    };

    let now = Utc::now();
    let created = points::ActiveModel {
        id:                Set(Uuid::new_v4()),
        service_record_id: Set(req.service_record_id),
        title:             Set(req.title),
        description:       Set(req.description),
        status:            Set(PointStatus::Created),
        priority:          Set(priority),
        assigned_to_id:    Set(req.assigned_to_id),
        created_by_id:     Set(user.id),
        due_date:          Set(req.due_date),
        completed_at:      Set(None),
        created_at:        Set(now),
        updated_at:        Set(now),
    }
    .insert(&state.db)
    .await?;

    info!(point_id = %created.id, service_record_id = %created.service_record_id, "point created");

    if let Some(assignee_id) = created.assigned_to_id {
        let input = NotificationInput::new(
            "New Point Assigned",
            format!("You have been assigned: {} ({})", created.title, created.priority),
            NotificationType::Warning,
        )
        .for_record(created.service_record_id);
        ok_or_log(dispatcher::notify_user(&state.db, &state.push, assignee_id, &input).await);
    }

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// List points with filters.
pub async fn list_points_handler(
    State(state): State<AppState>,
    Query(query): Query<PointListQuery>,
) -> Result<Json<PointListResponse>> {
    let mut select = points::Entity::find();

    if let Some(service_record_id) = query.service_record_id {
        select = select.filter(points::Column::ServiceRecordId.eq(service_record_id));
    }
    if let Some(assigned_to) = query.assigned_to {
        select = select.filter(points::Column::AssignedToId.eq(assigned_to));
    }
    if let Some(created_by) = query.created_by {
        select = select.filter(points::Column::CreatedById.eq(created_by));
    }
    if let Some(status) = &query.status {
        select = select.filter(points::Column::Status.eq(parse_status(status)?));
    }
    if let Some(priority) = &query.priority {
        select = select.filter(points::Column::Priority.eq(parse_priority(priority)?));
    }

    let total = select.clone().count(&state.db).await?;
    let page = query.page();
    let per_page = query.per_page();

    let rows = select
        .order_by_desc(points::Column::CreatedAt)
        .offset((page - 1) * per_page)
        .limit(per_page)
        .all(&state.db)
        .await?;

    Ok(Json(PointListResponse {
        points:     rows.into_iter().map(Into::into).collect(),
        pagination: PaginationInfo::new(page, per_page, total),
    }))
}

/// The caller's assigned points. The `open` filter means status not in
/// {COMPLETED, CLOSED}; `completed` the inverse.
pub async fn my_points_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<MyPointsQuery>,
) -> Result<Json<PointListResponse>> {
    let mut select = points::Entity::find().filter(points::Column::AssignedToId.eq(user.id));

    match query.filter.as_deref() {
        Some("open") => {
            select = select.filter(points::Column::Status.is_not_in(PointStatus::closed_statuses()));
        },
        Some("completed") => {
            select = select.filter(points::Column::Status.is_in(PointStatus::closed_statuses()));
        },
        Some(other) => {
            return Err(AppError::validation(format!(
                "Invalid filter '{}', expected 'open' or 'completed'",
                other
            )));
        },
        None => {},
    }

    let total = select.clone().count(&state.db).await?;
    let page = query.page();
    let per_page = query.per_page();

    let rows = select
        .order_by_desc(points::Column::CreatedAt)
        .offset((page - 1) * per_page)
        .limit(per_page)
        .all(&state.db)
        .await?;

    Ok(Json(PointListResponse {
        points:     rows.into_iter().map(Into::into).collect(),
        pagination: PaginationInfo::new(page, per_page, total),
    }))
}

/// Fetch a point by id.
pub async fn get_point_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PointResponse>> {
    let point = points::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Point not found"))?;

    Ok(Json(point.into()))
}

/// Update a point. Manage-points roles, the assignee, or the creator.
pub async fn update_point_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePointRequest>,
) -> Result<Json<PointResponse>> {
    req.validate()?;

    let point = points::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Point not found"))?;

    let privileged = policy::allows(user.role, Action::Points(PointAction::Update));
    let involved = point.assigned_to_id == Some(user.id) || point.created_by_id == user.id;
    if !privileged && !involved {
        return Err(AppError::forbidden(
            "Only management, the assignee, or the creator may update this point",
        ));
    }

    let status = match &req.status {
        Some(value) => Some(parse_status(value)?),
        None => None,
    };
    let priority = match &req.priority {
        Some(value) => Some(parse_priority(value)?),
        None => None,
    };

    // Assignment-change notification decided against the previous state.
    let previous_assignee = point.assigned_to_id;
    let new_assignee = match req.assigned_to_id {
        Some(assignee_id) if previous_assignee != Some(assignee_id) => {
            users::Entity::find_by_id(assignee_id)
                .one(&state.db)
                .await?
                .ok_or_else(|| AppError::not_found("Assignee not found"))?;
            Some(assignee_id)
        },
        _ => None,
    };

    let mut active: points::ActiveModel = point.into();
    if let Some(title) = req.title {
        active.title = Set(title);
    }
    if let Some(description) = req.description {
        active.description = Set(Some(description));
    }
    if let Some(status) = status {
        if status == PointStatus::Completed {
            // Re-completing restamps the timestamp.
            active.completed_at = Set(Some(Utc::now()));
        }
        active.status = Set(status);
    }
    if let Some(priority) = priority {
        active.priority = Set(priority);
    }
    if let Some(assignee_id) = req.assigned_to_id {
        active.assigned_to_id = Set(Some(assignee_id));
    }
    if let Some(due_date) = req.due_date {
        active.due_date = Set(Some(due_date));
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(&state.db).await?;

    info!(point_id = %updated.id, status = %updated.status, "point updated");

    if let Some(assignee_id) = new_assignee {
        let (title, verb) = if previous_assignee.is_some() {
            ("Point Reassigned", "reassigned to")
        }
        else {
            ("Point Assigned", "assigned to")
        };
        let input = NotificationInput::new(
            title,
            format!("Point '{}' has been {} you", updated.title, verb),
            NotificationType::Warning,
        )
        .for_record(updated.service_record_id);
        ok_or_log(dispatcher::notify_user(&state.db, &state.push, assignee_id, &input).await);
    }

    Ok(Json(updated.into()))
}

/// Delete a point. Manage-points roles or the creator.
pub async fn delete_point_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let point = points::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Point not found"))?;

    if !policy::allows(user.role, Action::Points(PointAction::Delete)) && point.created_by_id != user.id {
        return Err(AppError::forbidden("Only management or the creator may delete this point"));
    }

    points::Entity::delete_by_id(point.id).exec(&state.db).await?;

    info!(point_id = %id, "point deleted");

    Ok(Json(json!({ "message": "Point deleted" })))
}

/// Points for one service record, with per-status counts.
pub async fn points_by_record_handler(
    State(state): State<AppState>,
    Path(service_record_id): Path<Uuid>,
) -> Result<Json<PointsByRecordResponse>> {
    let rows = points::Entity::find()
        .filter(points::Column::ServiceRecordId.eq(service_record_id))
        .order_by_desc(points::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let status_counts = PointStatus::VALID_VALUES
        .iter()
        .map(|value| {
            StatusCount {
                status: (*value).to_string(),
                count:  rows.iter().filter(|p| p.status.to_string() == *value).count() as u64,
            }
        })
        .collect();

    Ok(Json(PointsByRecordResponse {
        points: rows.into_iter().map(Into::into).collect(),
        status_counts,
    }))
}

/// Point statistics for the caller.
pub async fn point_statistics_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<PointStatisticsResponse>> {
    let db = &state.db;
    let now = Utc::now();
    let open = points::Column::Status.is_in(PointStatus::open_statuses());

    let total = points::Entity::find().count(db).await?;
    let my_assigned = points::Entity::find()
        .filter(points::Column::AssignedToId.eq(user.id))
        .count(db)
        .await?;
    let open_high_priority = points::Entity::find()
        .filter(open.clone())
        .filter(points::Column::Priority.eq(PointPriority::High))
        .count(db)
        .await?;
    let overdue = points::Entity::find()
        .filter(open)
        .filter(points::Column::DueDate.lt(now))
        .count(db)
        .await?;

    let mut by_status = Vec::with_capacity(PointStatus::VALID_VALUES.len());
    for value in PointStatus::VALID_VALUES {
        let status = parse_status(value)?;
        let count = points::Entity::find()
            .filter(points::Column::Status.eq(status))
            .count(db)
            .await?;
        by_status.push(StatusCount {
            status: (*value).to_string(),
            count,
        });
    }

    Ok(Json(PointStatisticsResponse {
        total,
        my_assigned,
        open_high_priority,
        overdue,
        by_status,
    }))
}

/// Manually check a service record for stale open points.
///
/// Open points created before `now - age_threshold_hours` trigger one
/// URGENT notification per active service head. No stale points means no
/// notification and `escalation_required = false`.
pub async fn check_escalation_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(service_record_id): Path<Uuid>,
    Query(query): Query<EscalationQuery>,
) -> Result<Json<EscalationResponse>> {
    policy::require(user.role, Action::Points(PointAction::Escalate))?;

    service_records::Entity::find_by_id(service_record_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Service record not found"))?;

    let threshold_hours = query.age_threshold_hours();
    let cutoff = Utc::now() - Duration::hours(threshold_hours);

    let stale = points::Entity::find()
        .filter(points::Column::ServiceRecordId.eq(service_record_id))
        .filter(points::Column::Status.is_not_in(PointStatus::closed_statuses()))
        .filter(points::Column::CreatedAt.lt(cutoff))
        .order_by_asc(points::Column::CreatedAt)
        .all(&state.db)
        .await?;

    if stale.is_empty() {
        return Ok(Json(EscalationResponse {
            escalation_required: false,
            points:              Vec::new(),
            notified:            0,
        }));
    }

    let delivered = dispatcher::notify_escalation(
        &state.db,
        &state.push,
        service_record_id,
        stale.len() as u64,
        threshold_hours,
    )
    .await?;

    info!(
        service_record_id = %service_record_id,
        stale = stale.len(),
        notified = delivered.len(),
        "escalation triggered"
    );

    Ok(Json(EscalationResponse {
        escalation_required: true,
        points:              stale.into_iter().map(Into::into).collect(),
        notified:            delivered.len() as u64,
    }))
}
